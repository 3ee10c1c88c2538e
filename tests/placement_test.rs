use std::f32::consts::FRAC_PI_2;

use cgmath::{Quaternion, Rad, Rotation, Rotation3, Vector3};
use farmstead::{
    assets::{self, ASSETS},
    data_structures::instance::{Instance, Placement},
};

mod common;

use crate::common::approx3;

#[test]
fn should_declare_every_asset_once() {
    let mut names: Vec<_> = ASSETS.iter().map(|a| a.name).collect();
    names.sort();
    names.dedup();

    assert_eq!(names.len(), ASSETS.len());
    assert_eq!(ASSETS.len(), 11);
}

type Row = (&'static str, &'static str, &'static str, [f32; 3], [f32; 3], [f32; 3]);

const FARM: [Row; 11] = [
    ("cat", "cat.mtl", "cat.obj", [0.0, -0.4, -2.0], [0.05; 3], [-FRAC_PI_2, 0.0, 0.0]),
    ("farmhouse", "FarmHouse.mtl", "FarmHouse.obj", [7.0, -0.4, -8.0], [0.3; 3], [0.0; 3]),
    ("shrub", "shrub.mtl", "shrub.obj", [2.0, -0.4, -8.0], [0.5; 3], [0.0; 3]),
    ("gym", "Gym_1269.mtl", "Gym_1269.obj", [-6.0, -0.4, -8.0], [0.07; 3], [0.0; 3]),
    ("diner", "Diner.mtl", "Diner.obj", [6.0, -0.4, 9.0], [-0.5, 0.5, -0.5], [0.0; 3]),
    (
        "telephone_pole",
        "telephonePole.mtl",
        "telephonePole.obj",
        [11.0, -0.4, -3.0],
        [-0.5, 0.5, -0.5],
        [0.0; 3],
    ),
    ("tractor", "Tractor.mtl", "Tractor(1).obj", [8.0, -0.4, 0.0], [0.3; 3], [0.0; 3]),
    ("club", "Club_1260.mtl", "Club_1260.obj", [-6.0, -0.4, 7.0], [-0.05, 0.05, -0.05], [0.0; 3]),
    ("bison", "BisonPlains.mtl", "BisonPlains.obj", [4.0, -0.4, -2.0], [0.2; 3], [0.0; 3]),
    ("badger", "Badger.mtl", "Badger.obj", [2.0, -0.4, -2.0], [0.2; 3], [0.0; 3]),
    ("turtle", "turtle.mtl", "turtle.obj", [-2.0, -0.4, -2.0], [0.1; 3], [0.0; 3]),
];

#[test]
fn should_load_every_asset_from_its_files_at_its_placement() {
    for (asset, (name, material, geometry, position, scale, rotation)) in ASSETS.iter().zip(FARM) {
        assert_eq!(asset.name, name);
        assert_eq!(asset.material, material, "{name}");
        assert_eq!(asset.geometry, geometry, "{name}");
        assert_eq!(asset.placement, Placement::new(position, scale, rotation), "{name}");
        assert_eq!(assets::find(name), Some(asset));
    }
}

#[test]
fn should_pair_geometry_with_material_library() {
    for asset in ASSETS.iter() {
        assert!(asset.material.ends_with(".mtl"), "{}", asset.name);
        assert!(asset.geometry.ends_with(".obj"), "{}", asset.name);
    }
    assert_eq!(assets::find("tractor").unwrap().geometry, "Tractor(1).obj");
    assert_eq!(assets::find("tractor").unwrap().material, "Tractor.mtl");
}

#[test]
fn should_stand_every_asset_on_the_floor() {
    assert!(ASSETS.iter().all(|a| a.placement.position[1] == -0.4));
}

#[test]
fn should_place_assets_where_the_layout_says() {
    let farmhouse = assets::find("farmhouse").unwrap();
    assert_eq!(
        farmhouse.placement,
        Placement::new([7.0, -0.4, -8.0], [0.3; 3], [0.0; 3])
    );

    let diner = assets::find("diner").unwrap();
    assert_eq!(diner.placement.position, [6.0, -0.4, 9.0]);
    assert_eq!(diner.placement.scale, [-0.5, 0.5, -0.5]);

    let club = assets::find("club").unwrap();
    assert_eq!(club.placement.scale, [-0.05, 0.05, -0.05]);

    assert!(assets::find("windmill").is_none());
}

#[test]
fn should_lay_the_cat_on_its_side() {
    let cat = assets::find("cat").unwrap();
    assert_eq!(cat.placement.rotation, [-FRAC_PI_2, 0.0, 0.0]);

    let instance = Instance::from(&cat.placement);
    // The model's up axis ends up pointing along -Z
    let up = instance.rotation.rotate_vector(Vector3::unit_y());
    assert!(approx3(up.into(), [0.0, 0.0, -1.0]));
    assert!(approx3(instance.scale.into(), [0.05; 3]));
    assert!(approx3(instance.position.into(), [0.0, -0.4, -2.0]));
}

#[test]
fn should_apply_rotations_in_x_y_z_order() {
    let placement = Placement::new([0.0; 3], [1.0; 3], [0.3, 0.5, 0.7]);
    let expected = Quaternion::from_angle_x(Rad(0.3))
        * Quaternion::from_angle_y(Rad(0.5))
        * Quaternion::from_angle_z(Rad(0.7));

    let actual = placement.quaternion();

    let v = Vector3::new(1.0, 2.0, 3.0);
    assert!(approx3(actual.rotate_vector(v).into(), expected.rotate_vector(v).into()));
}

#[test]
fn should_compose_parent_and_child_instances() {
    let parent = Instance::from(&Placement::new([1.0, 0.0, 0.0], [2.0; 3], [0.0; 3]));
    let child = Instance::from(Vector3::new(0.0, 1.0, 0.0));

    let world = &parent * &child;

    assert!(approx3(world.position.into(), [1.0, 2.0, 0.0]));
    assert!(approx3(world.scale.into(), [2.0; 3]));
}
