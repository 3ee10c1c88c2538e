//! Fixed layout of the farm: camera, lights, floor and trees.
//!
//! Colours are `0xRRGGBB` in sRGB, lengths in world units.

use cgmath::Vector3;

use crate::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, SceneNode},
    },
    pipelines::light::{AmbientLight, DirectionalLight, HemisphereLight, Lights},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraLayout {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    /// The orbit controls rotate around this point.
    pub target: [f32; 3],
}

pub const CAMERA: CameraLayout = CameraLayout {
    fov_degrees: 75.0,
    near: 0.1,
    far: 200.0,
    position: [0.0, 0.0, 2.0],
    target: [0.0, 0.0, 0.0],
};

pub const LIGHTS: Lights = Lights {
    directional: DirectionalLight {
        colour: 0xffffff,
        intensity: 3.0,
        position: [-1.0, 2.0, 4.0],
    },
    ambient: AmbientLight {
        colour: 0xffff00,
        intensity: 3.0,
    },
    hemisphere: HemisphereLight {
        sky: 0x00bfff,
        ground: 0xb97a20,
        intensity: 3.0,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayout {
    pub size: [f32; 3],
    pub position: [f32; 3],
    pub colour: u32,
}

pub const FLOOR: BoxLayout = BoxLayout {
    size: [30.0, 0.1, 30.0],
    position: [0.0, -0.5, 0.0],
    colour: 0x654321,
};

/// A cylinder, or a cone when `radius_top` is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundLayout {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub colour: u32,
}

pub const TRUNK: RoundLayout = RoundLayout {
    radius_top: 0.3,
    radius_bottom: 0.3,
    height: 3.0,
    radial_segments: 8,
    colour: 0xD2B48C,
};

pub const CANOPY: RoundLayout = RoundLayout {
    radius_top: 0.0,
    radius_bottom: 2.0,
    height: 3.0,
    radial_segments: 10,
    colour: 0x228B22,
};

/// Canopy position relative to its trunk.
pub const CANOPY_OFFSET: [f32; 3] = [0.0, 2.0, 0.0];

/// Trunk positions along the edges of the floor.
pub const TREE_POSITIONS: [[f32; 3]; 20] = [
    [-14.0, 1.0, -14.0],
    [-9.0, 1.0, -14.0],
    [-4.0, 1.0, -14.0],
    [1.0, 1.0, -14.0],
    [6.0, 1.0, -14.0],
    [11.0, 1.0, -14.0],
    [13.0, 1.0, -9.0],
    [13.0, 1.0, -4.0],
    [13.0, 1.0, 1.0],
    [13.0, 1.0, 6.0],
    [13.0, 1.0, 11.0],
    [-14.0, 1.0, -9.0],
    [-14.0, 1.0, -4.0],
    [-14.0, 1.0, 1.0],
    [-14.0, 1.0, 6.0],
    [-14.0, 1.0, 11.0],
    [-10.0, 1.0, 13.0],
    [-4.0, 1.0, 13.0],
    [2.0, 1.0, 13.0],
    [8.0, 1.0, 13.0],
];

/// Group `trunk` and `canopy` into one tree per [`TREE_POSITIONS`] entry.
///
/// Both children get one instance per tree; the canopy's local transform is
/// [`CANOPY_OFFSET`]. World transforms are up to date on return, GPU buffers
/// still have to be written.
pub fn tree_group(mut trunk: Box<dyn SceneNode>, mut canopy: Box<dyn SceneNode>) -> ContainerNode {
    let count = TREE_POSITIONS.len();
    trunk.add_instances(vec![Instance::default(); count]);
    canopy.add_instances(vec![Instance::from(Vector3::from(CANOPY_OFFSET)); count]);

    let mut group = ContainerNode::new(count);
    for (idx, position) in TREE_POSITIONS.iter().enumerate() {
        group.set_local_transform(idx, Instance::from(Vector3::from(*position)));
    }
    group.add_child(trunk);
    group.add_child(canopy);
    group.update_world_transform_all();
    group
}
