use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::{mk_model_pipeline_layout, mk_render_pipeline, shader},
};

/**
 * Pipeline for models with a material whose opacity is below `1.0`.
 *
 * Shares the shader of the basic pipeline. Fragments come out premultiplied,
 * so they are blended with premultiplied alpha and tested against, but never
 * written to, the depth buffer.
 */
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    sample_count: u32,
    material_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = mk_model_pipeline_layout(
        device,
        material_layout,
        camera_bind_group_layout,
        light_bind_group_layout,
    );
    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        false,
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader(),
        sample_count,
    )
}
