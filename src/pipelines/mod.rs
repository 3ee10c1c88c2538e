//! Render pipelines and the bind group layouts they share.
//!
//! - `basic` draws opaque models and owns the material layout
//! - `transparent` draws blended models with the same shader
//! - `light` holds the light rig uniform bound at group 2

pub mod basic;
pub mod light;
pub mod transparent;

/// The pipelines a frame is drawn with.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
}
