//! The farm scene, built from two flows.
//!
//! - [`Landscape`] configures camera, lights and clear colour and draws the
//!   floor and the trees, all of which exist from the first frame
//! - [`Homestead`] starts the asset loads and places each asset as it arrives
//!
//! Both share a [`SceneState`] that keeps count of the loads.

use instant::Instant;

pub mod homestead;
pub mod landscape;
pub mod layout;

pub use homestead::{Homestead, apply};
pub use landscape::Landscape;

/// Counts of asset loads, for logging only. Nothing waits on them.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    requested: usize,
    placed: usize,
    failed: usize,
    started: Option<Instant>,
}

impl LoadTracker {
    pub fn start(&mut self, count: usize) {
        self.requested += count;
        self.started.get_or_insert_with(Instant::now);
    }

    pub fn record_placed(&mut self) {
        self.placed += 1;
        self.report_if_settled();
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
        self.report_if_settled();
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn placed(&self) -> usize {
        self.placed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn pending(&self) -> usize {
        self.requested.saturating_sub(self.placed + self.failed)
    }

    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    fn report_if_settled(&self) {
        if !self.is_settled() {
            return;
        }
        let elapsed = self.started.map(|started| started.elapsed()).unwrap_or_default();
        log::info!(
            "{} of {} assets placed, {} failed, after {:?}",
            self.placed,
            self.requested,
            self.failed,
            elapsed
        );
    }
}

/// State shared by the farm's flows.
#[derive(Debug, Default)]
pub struct SceneState {
    pub loads: LoadTracker,
}
