#![cfg(feature = "integration-tests")]

use futures::executor::block_on;

use farmstead::{
    assets::{self, AssetRequest, SceneEvent},
    context::InitContext,
    data_structures::{instance::Placement, scene_graph::SceneGraph},
    flow::GraphicsFlow,
    pipelines::basic::material_layout,
    render::Render,
    resources::texture::diffuse_texture,
    scene::Landscape,
};

use crate::common::{CRATE_MTL, CRATE_OBJ, MemorySource};

mod common;

fn headless() -> InitContext {
    block_on(async {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .expect("no adapter for headless tests");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("no device for headless tests");
        let material_layout = material_layout(&device);
        InitContext {
            device,
            queue,
            material_layout,
        }
    })
}

#[test]
fn should_draw_floor_trunks_and_canopies() {
    let ctx = headless();

    let landscape = Landscape::new(&ctx);

    let Render::Composed(parts) = landscape.on_render() else {
        panic!("the landscape renders floor and trees together");
    };
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].draw_count(), 1);
    assert_eq!(parts[1].draw_count(), 2);
}

#[test]
fn should_upload_a_loaded_asset_into_the_blended_batch() {
    let ctx = headless();
    let source = MemorySource::new([
        ("crate.mtl", CRATE_MTL.as_bytes()),
        ("crate.obj", CRATE_OBJ.as_bytes()),
    ]);
    let request = AssetRequest {
        name: "crate",
        material: "crate.mtl",
        geometry: "crate.obj",
        placement: Placement::at([1.0, 0.0, 0.0]),
    };

    let event = block_on(assets::load(ctx.clone(), source, request));
    let SceneEvent::Placed { name, node } = event else {
        panic!("the crate should load");
    };
    let mut graph = SceneGraph::new();
    graph.insert(name, node).unwrap();

    let Render::Composed(batches) = graph.render() else {
        panic!("the graph renders an opaque and a blended batch");
    };
    assert_eq!(batches[0].draw_count(), 0);
    assert_eq!(batches[1].draw_count(), 1);
}

#[test]
fn should_fall_back_to_white_for_a_texture_above_the_device_limit() {
    let ctx = headless();
    let too_wide = ctx.device.limits().max_texture_dimension_2d + 1;
    let image = image::DynamicImage::new_rgba8(too_wide, 1);
    let mut png = std::io::Cursor::new(Vec::new());
    image.write_to(&mut png, image::ImageFormat::Png).unwrap();

    let texture = diffuse_texture(&ctx.device, &ctx.queue, Some("wide.png"), Some(png.get_ref()));

    assert_eq!(texture.texture.width(), 1);
    assert_eq!(texture.texture.height(), 1);
}
