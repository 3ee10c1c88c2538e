use cgmath::{Deg, Vector3};

use crate::{
    assets::SceneEvent,
    camera::{Camera, Projection},
    context::{Context, InitContext},
    data_structures::{
        colour::srgb_hex_to_linear,
        instance::Instance,
        model::{MaterialDescriptor, MeshData, Model},
        primitives,
        scene_graph::{ModelNode, SceneNode},
    },
    flow::{GraphicsFlow, Out},
    render::Render,
    resources::CpuAsset,
    scene::{
        SceneState,
        layout::{self, CAMERA, CANOPY, FLOOR, LIGHTS, TRUNK},
    },
};

/// Floor and trees, plus the camera, lights and clear colour of the scene.
pub struct Landscape {
    floor: Box<dyn SceneNode>,
    trees: Box<dyn SceneNode>,
}

fn solid_model(ctx: &InitContext, mesh: MeshData, colour: u32) -> Model {
    let material = MaterialDescriptor::coloured(&mesh.name, srgb_hex_to_linear(colour));
    CpuAsset::from((vec![mesh], vec![material])).upload(&ctx.device, &ctx.queue, &ctx.material_layout)
}

impl Landscape {
    pub fn new(ctx: &InitContext) -> Self {
        let [width, height, depth] = FLOOR.size;
        let floor = ModelNode::placed(
            &ctx.device,
            &ctx.queue,
            solid_model(ctx, primitives::cuboid("floor", width, height, depth), FLOOR.colour),
            Instance::from(Vector3::from(FLOOR.position)),
        );

        let trunk = solid_model(
            ctx,
            primitives::cylinder(
                "trunk",
                TRUNK.radius_top,
                TRUNK.radius_bottom,
                TRUNK.height,
                TRUNK.radial_segments,
            ),
            TRUNK.colour,
        );
        let canopy = solid_model(
            ctx,
            primitives::cone("canopy", CANOPY.radius_bottom, CANOPY.height, CANOPY.radial_segments),
            CANOPY.colour,
        );
        let mut trees = layout::tree_group(
            Box::new(ModelNode::from_model(0, &ctx.device, trunk)),
            Box::new(ModelNode::from_model(0, &ctx.device, canopy)),
        );
        trees.write_to_buffers(&ctx.queue, &ctx.device);
        log::info!("Planted {} trees", layout::TREE_POSITIONS.len());

        Self {
            floor: Box::new(floor),
            trees: Box::new(trees),
        }
    }
}

impl GraphicsFlow<SceneState, SceneEvent> for Landscape {
    fn on_init(&mut self, ctx: &mut Context, _state: &mut SceneState) -> Out<SceneEvent> {
        let displayed = ctx.window().inner_size();
        ctx.projection = Projection::new(
            displayed.width,
            displayed.height,
            Deg(CAMERA.fov_degrees),
            CAMERA.near,
            CAMERA.far,
        );
        ctx.camera
            .set_camera(Camera::new(CAMERA.position, CAMERA.target));
        ctx.light.set(&LIGHTS, &ctx.queue);
        ctx.clear_colour = wgpu::Color::TRANSPARENT;
        Out::Empty
    }

    fn on_custom_events(
        &mut self,
        _ctx: &Context,
        _state: &mut SceneState,
        event: SceneEvent,
    ) -> Option<SceneEvent> {
        Some(event)
    }

    fn on_render(&self) -> Render<'_> {
        Render::Composed(vec![
            Render::from(self.floor.as_ref()),
            Render::from(self.trees.as_ref()),
        ])
    }
}
