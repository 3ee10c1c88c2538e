use cgmath::InnerSpace;
use wgpu::util::DeviceExt;

use crate::data_structures::colour::srgb_hex_to_linear;

/// A light shining from `position` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub colour: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub colour: u32,
    pub intensity: f32,
}

/// Sky colour from above, ground colour from below, blended by the normal's Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: u32,
    pub ground: u32,
    pub intensity: f32,
}

/// The fixed light rig of a scene. Colours are `0xRRGGBB` in sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub directional: DirectionalLight,
    pub ambient: AmbientLight,
    pub hemisphere: HemisphereLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            directional: DirectionalLight {
                colour: 0xffffff,
                intensity: 1.0,
                position: [0.0, 1.0, 0.0],
            },
            ambient: AmbientLight {
                colour: 0xffffff,
                intensity: 0.0,
            },
            hemisphere: HemisphereLight {
                sky: 0xffffff,
                ground: 0xffffff,
                intensity: 0.0,
            },
        }
    }
}

fn scaled(hex: u32, intensity: f32) -> [f32; 3] {
    srgb_hex_to_linear(hex).map(|c| c * intensity)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// Unit vector from the surface towards the directional light.
    direction: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    directional: [f32; 3],
    _padding2: u32,
    ambient: [f32; 3],
    _padding3: u32,
    sky: [f32; 3],
    _padding4: u32,
    ground: [f32; 3],
    _padding5: u32,
}

impl LightUniform {
    pub fn direction(&self) -> [f32; 3] {
        self.direction
    }

    pub fn directional(&self) -> [f32; 3] {
        self.directional
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    pub fn sky(&self) -> [f32; 3] {
        self.sky
    }

    pub fn ground(&self) -> [f32; 3] {
        self.ground
    }
}

impl From<&Lights> for LightUniform {
    fn from(lights: &Lights) -> Self {
        let position = cgmath::Vector3::from(lights.directional.position);
        let direction = if position.magnitude2() > 0.0 {
            position.normalize()
        } else {
            cgmath::Vector3::unit_y()
        };
        Self {
            direction: direction.into(),
            _padding: 0,
            directional: scaled(lights.directional.colour, lights.directional.intensity),
            _padding2: 0,
            ambient: scaled(lights.ambient.colour, lights.ambient.intensity),
            _padding3: 0,
            sky: scaled(lights.hemisphere.sky, lights.hemisphere.intensity),
            _padding4: 0,
            ground: scaled(lights.hemisphere.ground, lights.hemisphere.intensity),
            _padding5: 0,
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(lights: &Lights, device: &wgpu::Device) -> Self {
        let uniform = LightUniform::from(lights);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn set(&mut self, lights: &Lights, queue: &wgpu::Queue) {
        self.uniform = LightUniform::from(lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
