//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows hand to the engine each
//! frame. The engine uses `Render` to sort objects into an opaque and a
//! translucent batch so that each pipeline is bound once per frame.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (model + instance buffer)
//!

use crate::data_structures::model::Model;

/// Data for instanced object rendering: a model and its instance buffer.
///
/// The instance buffer contains per-instance transformation data in the
/// layout of [`crate::data_structures::instance::InstanceRaw`].
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single opaque instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque instanced objects
/// - `Transparent(Instanced)` renders a single alpha blended instanced object
/// - `Transparents(Vec<Instanced>)` renders a batch of alpha blended objects
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
///
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Transparent(Instanced<'a>),
    Transparents(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Sort this render tree into the opaque (`basics`) and blended (`trans`) batches.
    pub(crate) fn set_pipelines(self, basics: &mut Vec<Instanced<'a>>, trans: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Transparent(instanced) => trans.push(instanced),
            Render::Transparents(mut vec) => trans.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, trans)),
            Render::None => (),
        }
    }

    /// Number of instanced draws this render tree expands to.
    pub fn draw_count(&self) -> usize {
        match self {
            Render::None => 0,
            Render::Default(_) | Render::Transparent(_) => 1,
            Render::Defaults(vec) | Render::Transparents(vec) => vec.len(),
            Render::Composed(renders) => renders.iter().map(Render::draw_count).sum(),
        }
    }
}

impl<'a> From<&'a dyn crate::data_structures::scene_graph::SceneNode> for Render<'a> {
    fn from(sn: &'a dyn crate::data_structures::scene_graph::SceneNode) -> Self {
        Render::Defaults(sn.get_render())
    }
}
