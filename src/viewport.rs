//! Backing store sizing and per-frame scheduling decisions.
//!
//! These are kept free of GPU types so the resize and reschedule rules can be
//! checked without a surface.

use winit::dpi::PhysicalSize;

/// Extra resolution rendered on the web, on top of the device pixel ratio.
#[cfg(target_arch = "wasm32")]
pub const DEFAULT_PIXEL_RATIO: f32 = 2.0;
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_PIXEL_RATIO: f32 = 1.0;

/// Tracks the size of the surface's backing store relative to the displayed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pixel_ratio: f32,
    max_dimension: u32,
    backing: PhysicalSize<u32>,
}

impl Viewport {
    pub fn new(pixel_ratio: f32, max_dimension: u32) -> Self {
        Self {
            pixel_ratio: pixel_ratio.max(f32::MIN_POSITIVE),
            max_dimension: max_dimension.max(1),
            backing: PhysicalSize::new(0, 0),
        }
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// The current backing store size, zero until the first [`sync`](Self::sync).
    pub fn backing(&self) -> PhysicalSize<u32> {
        self.backing
    }

    /// Backing store size for a displayed size: scaled by the pixel ratio, at
    /// least one pixel and at most the device's texture limit per side.
    pub fn backing_size(&self, displayed: PhysicalSize<u32>) -> PhysicalSize<u32> {
        let scale = |side: u32| ((side as f32 * self.pixel_ratio).round() as u32).clamp(1, self.max_dimension);
        PhysicalSize::new(scale(displayed.width), scale(displayed.height))
    }

    /// Adopt the backing size for `displayed` and return it if it changed.
    ///
    /// A zero sized display (minimised window, hidden canvas) keeps the current size.
    pub fn sync(&mut self, displayed: PhysicalSize<u32>) -> Option<PhysicalSize<u32>> {
        if displayed.width == 0 || displayed.height == 0 {
            return None;
        }
        let target = self.backing_size(displayed);
        if target == self.backing {
            return None;
        }
        self.backing = target;
        Some(target)
    }
}

/// What a single frame does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// New backing size when the display changed since the last frame.
    pub resize: Option<PhysicalSize<u32>>,
    pub render: bool,
    /// Whether the next frame is requested.
    pub reschedule: bool,
}

/// Plan the next frame.
///
/// Outstanding asset loads are only reported: frames render and reschedule
/// regardless, so the scene is visible while assets stream in.
pub fn plan_frame(viewport: &mut Viewport, displayed: PhysicalSize<u32>, pending_loads: usize) -> FramePlan {
    let resize = viewport.sync(displayed);
    if let Some(size) = resize {
        log::debug!(
            "Backing store resized to {}x{} with {} loads pending",
            size.width,
            size.height,
            pending_loads
        );
    }
    FramePlan {
        resize,
        render: true,
        reschedule: true,
    }
}
