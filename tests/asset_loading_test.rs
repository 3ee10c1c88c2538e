use futures::executor::block_on;

use farmstead::{
    assets::{self, ASSETS, AssetRequest, SceneEvent},
    data_structures::{colour, instance::Placement, scene_graph::SceneGraph},
    resources::{self, CpuAsset, materials},
    scene::{LoadTracker, apply},
};

use crate::common::{CRATE_MTL, CRATE_OBJ, MemorySource, approx, approx3};

mod common;

fn crate_source() -> MemorySource {
    MemorySource::new([
        ("crate.mtl", CRATE_MTL.as_bytes()),
        ("crate.obj", CRATE_OBJ.as_bytes()),
    ])
}

#[test]
fn should_not_request_geometry_when_material_library_is_missing() {
    let source = MemorySource::new([("crate.obj", CRATE_OBJ.as_bytes())]);

    let result = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj"));

    assert!(result.is_err());
    assert_eq!(source.requests(), vec!["crate.mtl".to_string()]);
}

#[test]
fn should_request_material_library_before_geometry() {
    let source = crate_source();

    block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    let requests = source.requests();
    assert_eq!(requests[0], "crate.mtl");
    assert_eq!(requests[1], "crate.obj");
}

#[test]
fn should_parse_meshes_and_materials() {
    let source = crate_source();

    let asset = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    assert_eq!(asset.meshes.len(), 2);
    assert_eq!(asset.triangle_count(), 3);
    assert_eq!(asset.materials.len(), 2);

    let wood = &asset.materials[0].descriptor;
    assert_eq!(wood.name, "Wood");
    assert!(approx3(wood.diffuse, [1.0, colour::srgb_to_linear(0.5), 0.0]));
    assert!(approx3(wood.specular, [colour::srgb_to_linear(0.5); 3]));
    assert!(approx(wood.shininess, 10.0));
    assert!(!wood.is_translucent());

    let glass = &asset.materials[1].descriptor;
    assert_eq!(glass.name, "Glass");
    assert!(approx3(glass.specular, colour::srgb_hex_to_linear(0x111111)));
    assert!(approx(glass.opacity, 0.25));
    assert_eq!(glass.diffuse_texture.as_deref(), Some("glass.png"));
}

#[test]
fn should_resolve_materials_when_geometry_names_no_library() {
    let obj = CRATE_OBJ.replace("mtllib crate.mtl\n", "");
    assert!(!obj.contains("mtllib"));
    let source = MemorySource::new([("crate.mtl", CRATE_MTL.as_bytes()), ("crate.obj", obj.as_bytes())]);

    let asset = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    let material_of = |mesh: &str| {
        let mesh = asset.meshes.iter().find(|m| m.name == mesh).unwrap();
        asset.materials[mesh.material].descriptor.name.as_str()
    };
    assert_eq!(material_of("Lid"), "Wood");
    assert_eq!(material_of("Pane"), "Glass");
}

#[test]
fn should_resolve_materials_against_the_requested_library() {
    let obj = CRATE_OBJ.replace("mtllib crate.mtl", "mtllib elsewhere.mtl");
    let source = MemorySource::new([("crate.mtl", CRATE_MTL.as_bytes()), ("crate.obj", obj.as_bytes())]);

    let asset = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    let pane = asset.meshes.iter().find(|m| m.name == "Pane").unwrap();
    assert_eq!(asset.materials[pane.material].descriptor.name, "Glass");
    assert!(!source.was_requested("elsewhere.mtl"));
}

#[test]
fn should_prepend_library_only_when_missing() {
    let bare = resources::with_material_library("o Lid\n".to_string(), "crate.mtl");
    let named = resources::with_material_library("mtllib other.mtl\no Lid\n".to_string(), "crate.mtl");

    assert_eq!(bare, "mtllib crate.mtl\no Lid\n");
    assert_eq!(named, "mtllib other.mtl\no Lid\n");
}

#[test]
fn should_flat_shade_meshes_without_normals() {
    let source = crate_source();

    let asset = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    let lid = asset.meshes.iter().find(|m| m.name == "Lid").unwrap();
    assert_eq!(lid.vertices.len(), 6);
    assert_eq!(lid.indices, (0..6).collect::<Vec<u32>>());
    assert!(lid.vertices.iter().all(|v| approx3(v.normal, [0.0, 1.0, 0.0])));

    let pane = asset.meshes.iter().find(|m| m.name == "Pane").unwrap();
    assert!(pane.vertices.iter().all(|v| approx3(v.normal, [0.0, 0.0, 1.0])));
    assert_eq!(pane.bounds(), Some(([0.0, 1.0, 0.0], [1.0, 2.0, 0.0])));
}

#[test]
fn should_keep_material_when_its_texture_is_missing() {
    let source = crate_source();

    let asset = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    assert!(source.was_requested("glass.png"));
    assert!(asset.materials[1].diffuse_image.is_none());
    assert!(asset.materials[0].diffuse_image.is_none());
}

#[test]
fn should_attach_fetched_texture_bytes() {
    let png: &[u8] = &[0x89, b'P', b'N', b'G'];
    let source = MemorySource::new([
        ("crate.mtl", CRATE_MTL.as_bytes()),
        ("crate.obj", CRATE_OBJ.as_bytes()),
        ("glass.png", png),
    ]);

    let asset = block_on(resources::load_obj(&source, "crate.mtl", "crate.obj")).unwrap();

    assert_eq!(asset.materials[1].diffuse_image.as_deref(), Some(png));
}

#[test]
fn should_add_white_material_when_library_is_empty() {
    let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    let source = MemorySource::new([("empty.mtl", &b""[..]), ("tri.obj", obj.as_bytes())]);

    let asset = block_on(resources::load_obj(&source, "empty.mtl", "tri.obj")).unwrap();

    assert_eq!(asset.materials.len(), 1);
    assert!(approx3(asset.materials[0].descriptor.diffuse, [1.0; 3]));
    assert_eq!(asset.meshes[0].material, 0);
}

#[test]
fn should_read_opacity_from_transparency_when_dissolve_is_absent() {
    let mut material = tobj::Material {
        name: "Haze".to_string(),
        ..Default::default()
    };
    material.unknown_param.insert("Tr".to_string(), "0.4".to_string());

    let descriptor = materials::descriptor(&material);

    assert!(approx(descriptor.opacity, 0.6));
    assert!(approx3(descriptor.diffuse, [1.0; 3]));
    assert!(approx(descriptor.shininess, 30.0));
}

fn request(name: &'static str, material: &'static str, geometry: &'static str) -> AssetRequest {
    AssetRequest {
        name,
        material,
        geometry,
        placement: Placement::at([0.0; 3]),
    }
}

#[test]
fn should_fail_only_the_asset_that_could_not_be_loaded() {
    let source = crate_source();
    let requests = [
        request("first", "crate.mtl", "crate.obj"),
        request("broken", "missing.mtl", "crate.obj"),
        request("second", "crate.mtl", "crate.obj"),
    ];
    let mut graph: SceneGraph<CpuAsset> = SceneGraph::new();
    let mut loads = LoadTracker::default();
    loads.start(requests.len());

    let events: Vec<SceneEvent<CpuAsset>> = requests
        .iter()
        .map(|r| block_on(assets::fetch(&source, r)))
        .collect();

    assert!(events[0].is_placed());
    assert!(!events[1].is_placed());
    assert_eq!(events[1].name(), "broken");
    assert!(events[2].is_placed());

    for event in events {
        apply(&mut graph, &mut loads, event);
    }

    assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["first", "second"]);
    assert_eq!(loads.placed(), 2);
    assert_eq!(loads.failed(), 1);
    assert!(loads.is_settled());
}

#[test]
fn should_place_events_in_arrival_order() {
    let source = crate_source();
    let late = request("late", "crate.mtl", "crate.obj");
    let early = request("early", "crate.mtl", "crate.obj");
    let mut graph: SceneGraph<CpuAsset> = SceneGraph::new();
    let mut loads = LoadTracker::default();
    loads.start(2);

    apply(&mut graph, &mut loads, block_on(assets::fetch(&source, &early)));
    assert_eq!(loads.pending(), 1);
    apply(&mut graph, &mut loads, block_on(assets::fetch(&source, &late)));

    assert_eq!(graph.keys().collect::<Vec<_>>(), vec!["early", "late"]);
    assert!(loads.is_settled());
}

#[test]
fn should_report_failure_for_every_asset_when_nothing_is_served() {
    let source = MemorySource::default();
    let mut graph: SceneGraph<CpuAsset> = SceneGraph::new();
    let mut loads = LoadTracker::default();
    loads.start(ASSETS.len());

    for request in ASSETS.iter() {
        let event = block_on(assets::fetch(&source, request));
        assert!(!event.is_placed(), "{} should fail", request.name);
        apply(&mut graph, &mut loads, event);
    }

    assert!(graph.is_empty());
    assert_eq!(loads.failed(), ASSETS.len());
    assert!(loads.is_settled());
    // Only material libraries were asked for
    assert!(source.requests().iter().all(|r| r.ends_with(".mtl")));
}
