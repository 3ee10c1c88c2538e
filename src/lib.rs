//! farmstead
//!
//! A small farm scene rendered with wgpu, natively and in the browser
//! (WASM + WebGL2). A floor, a ring of trees and three lights are there from
//! the first frame; eleven OBJ/MTL props load asynchronously and appear as
//! they arrive. An orbit camera circles the origin.
//!
//! High-level modules
//! - `assets`: the model assets, their placements and the per-asset load
//! - `camera`: camera types, orbit controller and uniforms for view/projection
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: engine data models (meshes, instances, textures, scene graph)
//! - `flow`: the event loop and the flows it drives
//! - `pipelines`: the opaque and translucent render pipelines and the light rig
//! - `resources`: helpers to fetch and parse models and their textures
//! - `render`: render composition for efficient pipeline reuse
//! - `scene`: the farm itself
//! - `viewport`: backing store sizing and frame scheduling
//!

pub mod assets;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod viewport;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::pin::Pin;

use crate::{
    assets::SceneEvent,
    context::InitContext,
    flow::{FlowConsturctor, GraphicsFlow},
    resources::ResourceDir,
    scene::{Homestead, Landscape, SceneState},
};

type SceneFlow = Box<dyn GraphicsFlow<SceneState, SceneEvent>>;

fn constructor<F>(build: F) -> FlowConsturctor<SceneState, SceneEvent>
where
    F: FnOnce(InitContext) -> SceneFlow + 'static,
{
    Box::new(move |ctx| -> Pin<Box<dyn Future<Output = SceneFlow>>> {
        Box::pin(async move { build(ctx) })
    })
}

/// Build the farm and run it until the window closes.
pub fn run() -> anyhow::Result<()> {
    flow::run(vec![
        constructor(|ctx| Box::new(Landscape::new(&ctx))),
        constructor(|ctx| Box::new(Homestead::new(ctx, ResourceDir::from_env()))),
    ])
}

/// Web entry point. Errors before the event loop starts are thrown to
/// JavaScript; later ones, such as a missing canvas, go to the console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run().map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
