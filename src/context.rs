//! GPU and window context.
//!
//! [`Context`] owns the surface, device, queue, render targets, camera, lights
//! and pipelines. Flows may change it in `on_init`; everything else only reads
//! it. [`InitContext`] is the cheap subset handed to flow constructors and
//! asset loads, which need to create GPU resources but never touch the surface.

use std::sync::Arc;

use anyhow::Context as _;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::{Camera, CameraResources, OrbitController, Projection},
    data_structures::texture,
    pipelines::{
        Pipelines,
        basic::{material_layout, mk_basic_pipeline},
        light::{LightResources, Lights},
        transparent::mk_transparent_pipeline,
    },
    viewport::{DEFAULT_PIXEL_RATIO, Viewport},
};

/// Multisample count used when the surface format supports it.
pub const MSAA_SAMPLES: u32 = 4;

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub(crate) msaa_target: Option<texture::Texture>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    pub clear_colour: wgpu::Color,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub material_layout: wgpu::BindGroupLayout,
    pub viewport: Viewport,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let displayed = window.inner_size();

        // The instance is a handle to our GPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::default();

        let surface = instance
            .create_surface(window.clone())
            .context("creating the render surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can draw to the surface")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("requesting a device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // Shading happens in linear space and relies on the surface encoding to sRGB on write.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no texture formats")?;
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let sample_count = if adapter
            .get_texture_format_features(surface_format)
            .flags
            .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            log::warn!("{MSAA_SAMPLES}x multisampling is unsupported for {surface_format:?}");
            1
        };

        let mut viewport = Viewport::new(DEFAULT_PIXEL_RATIO, device.limits().max_texture_dimension_2d);
        let backing = viewport
            .sync(displayed)
            .unwrap_or_else(|| viewport.backing_size(displayed));
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: backing.width,
            height: backing.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let camera = Camera::new((0.0, 0.0, 2.0), (0.0, 0.0, 0.0));
        let projection = Projection::new(
            displayed.width,
            displayed.height,
            cgmath::Deg(45.0),
            0.1,
            100.0,
        );
        let controller = OrbitController::new(camera.target, displayed.height);
        let camera = CameraResources::new(&device, camera, controller, &projection);

        let light = LightResources::new(&Lights::default(), &device);

        let material_layout = material_layout(&device);
        let pipelines = Pipelines {
            basic: mk_basic_pipeline(
                &device,
                &config,
                sample_count,
                &material_layout,
                &camera.bind_group_layout,
                &light.bind_group_layout,
            ),
            transparent: mk_transparent_pipeline(
                &device,
                &config,
                sample_count,
                &material_layout,
                &camera.bind_group_layout,
                &light.bind_group_layout,
            ),
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            sample_count,
            "depth_texture",
        );
        let msaa_target = texture::Texture::create_msaa_target(&device, &config, sample_count);

        Ok(Self {
            window,
            depth_texture,
            msaa_target,
            surface,
            device,
            queue,
            config,
            sample_count,
            clear_colour: wgpu::Color::TRANSPARENT,
            camera,
            projection,
            light,
            pipelines,
            material_layout,
            viewport,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigure the surface and recreate the render targets at `backing` size.
    pub(crate) fn resize_backing(&mut self, backing: PhysicalSize<u32>) {
        if backing.width == 0 || backing.height == 0 {
            return;
        }
        self.config.width = backing.width;
        self.config.height = backing.height;
        self.reconfigure();
    }

    /// Configure the surface with the current config, e.g. after it was lost.
    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            self.sample_count,
            "depth_texture",
        );
        self.msaa_target =
            texture::Texture::create_msaa_target(&self.device, &self.config, self.sample_count);
    }

    /// Aspect ratio and orbit sensitivity follow the displayed size, not the backing store.
    pub(crate) fn set_displayed_size(&mut self, displayed: PhysicalSize<u32>) {
        if displayed.width == 0 || displayed.height == 0 {
            return;
        }
        self.projection.resize(displayed.width, displayed.height);
        self.camera.controller.resize(displayed.height);
    }
}

/// GPU handles needed to build models outside of the event loop.
///
/// Cloning is cheap as device and queue are reference counted internally.
#[derive(Debug, Clone)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub material_layout: wgpu::BindGroupLayout,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            material_layout: ctx.material_layout.clone(),
        }
    }
}
