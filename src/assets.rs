//! The farm's external model assets and how a single one is loaded.
//!
//! Every asset is an OBJ geometry file with an MTL material library, placed
//! once at a fixed position, scale and rotation. Loads run independently of
//! each other and report back with a [`SceneEvent`].

use std::f32::consts::FRAC_PI_2;

use crate::{
    context::InitContext,
    data_structures::{
        instance::{Instance, Placement},
        scene_graph::{ModelNode, SceneNode},
    },
    resources::{self, AssetSource, CpuAsset},
};

/// One asset to load: its scene-graph key, its two files and where it goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetRequest {
    pub name: &'static str,
    pub material: &'static str,
    pub geometry: &'static str,
    pub placement: Placement,
}

const fn uniform(scale: f32) -> [f32; 3] {
    [scale; 3]
}

/// `(-s, s, -s)`: scale `s` with a half turn about Y.
const fn turned(scale: f32) -> [f32; 3] {
    [-scale, scale, -scale]
}

pub const ASSETS: [AssetRequest; 11] = [
    AssetRequest {
        name: "cat",
        material: "cat.mtl",
        geometry: "cat.obj",
        placement: Placement::new([0.0, -0.4, -2.0], uniform(0.05), [-FRAC_PI_2, 0.0, 0.0]),
    },
    AssetRequest {
        name: "farmhouse",
        material: "FarmHouse.mtl",
        geometry: "FarmHouse.obj",
        placement: Placement::new([7.0, -0.4, -8.0], uniform(0.3), [0.0; 3]),
    },
    AssetRequest {
        name: "shrub",
        material: "shrub.mtl",
        geometry: "shrub.obj",
        placement: Placement::new([2.0, -0.4, -8.0], uniform(0.5), [0.0; 3]),
    },
    AssetRequest {
        name: "gym",
        material: "Gym_1269.mtl",
        geometry: "Gym_1269.obj",
        placement: Placement::new([-6.0, -0.4, -8.0], uniform(0.07), [0.0; 3]),
    },
    AssetRequest {
        name: "diner",
        material: "Diner.mtl",
        geometry: "Diner.obj",
        placement: Placement::new([6.0, -0.4, 9.0], turned(0.5), [0.0; 3]),
    },
    AssetRequest {
        name: "telephone_pole",
        material: "telephonePole.mtl",
        geometry: "telephonePole.obj",
        placement: Placement::new([11.0, -0.4, -3.0], turned(0.5), [0.0; 3]),
    },
    AssetRequest {
        name: "tractor",
        material: "Tractor.mtl",
        geometry: "Tractor(1).obj",
        placement: Placement::new([8.0, -0.4, 0.0], uniform(0.3), [0.0; 3]),
    },
    AssetRequest {
        name: "club",
        material: "Club_1260.mtl",
        geometry: "Club_1260.obj",
        placement: Placement::new([-6.0, -0.4, 7.0], turned(0.05), [0.0; 3]),
    },
    AssetRequest {
        name: "bison",
        material: "BisonPlains.mtl",
        geometry: "BisonPlains.obj",
        placement: Placement::new([4.0, -0.4, -2.0], uniform(0.2), [0.0; 3]),
    },
    AssetRequest {
        name: "badger",
        material: "Badger.mtl",
        geometry: "Badger.obj",
        placement: Placement::new([2.0, -0.4, -2.0], uniform(0.2), [0.0; 3]),
    },
    AssetRequest {
        name: "turtle",
        material: "turtle.mtl",
        geometry: "turtle.obj",
        placement: Placement::new([-2.0, -0.4, -2.0], uniform(0.1), [0.0; 3]),
    },
];

/// Look up an asset by its scene-graph key.
pub fn find(name: &str) -> Option<&'static AssetRequest> {
    ASSETS.iter().find(|request| request.name == name)
}

/// Outcome of one asset load, delivered through the event loop.
///
/// `N` is the loaded node; the running scene uses a GPU backed scene node.
pub enum SceneEvent<N = Box<dyn SceneNode>> {
    Placed { name: String, node: N },
    Failed { name: String, error: anyhow::Error },
}

impl<N> SceneEvent<N> {
    pub fn name(&self) -> &str {
        match self {
            SceneEvent::Placed { name, .. } | SceneEvent::Failed { name, .. } => name,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, SceneEvent::Placed { .. })
    }

    pub fn map<M>(self, f: impl FnOnce(N) -> M) -> SceneEvent<M> {
        match self {
            SceneEvent::Placed { name, node } => SceneEvent::Placed {
                name,
                node: f(node),
            },
            SceneEvent::Failed { name, error } => SceneEvent::Failed { name, error },
        }
    }
}

impl<N> std::fmt::Debug for SceneEvent<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneEvent::Placed { name, .. } => f.debug_struct("Placed").field("name", name).finish(),
            SceneEvent::Failed { name, error } => f
                .debug_struct("Failed")
                .field("name", name)
                .field("error", &format_args!("{error:#}"))
                .finish(),
        }
    }
}

/// Fetch and parse one asset, material library first.
pub async fn fetch<S: AssetSource>(source: &S, request: &AssetRequest) -> SceneEvent<CpuAsset> {
    let name = request.name.to_string();
    match resources::load_obj(source, request.material, request.geometry).await {
        Ok(asset) => {
            log::debug!(
                "Parsed {} ({} meshes, {} triangles)",
                name,
                asset.meshes.len(),
                asset.triangle_count()
            );
            SceneEvent::Placed { name, node: asset }
        }
        Err(error) => SceneEvent::Failed {
            name,
            error: error.context(format!("loading asset {}", request.name)),
        },
    }
}

/// Load one asset and turn it into a placed scene node.
pub async fn load<S: AssetSource>(ctx: InitContext, source: S, request: AssetRequest) -> SceneEvent {
    fetch(&source, &request).await.map(|asset| {
        let model = asset.upload(&ctx.device, &ctx.queue, &ctx.material_layout);
        let node = ModelNode::placed(&ctx.device, &ctx.queue, model, Instance::from(&request.placement));
        Box::new(node) as Box<dyn SceneNode>
    })
}
