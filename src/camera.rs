//! Camera, projection and orbit controls.
//!
//! The [`Camera`] looks from a position at a target. [`Projection`] turns view
//! space into clip space and is resized with the surface. [`OrbitController`]
//! moves the camera on a sphere around its target from mouse input. All of it
//! ends up in [`CameraUniform`], which the shaders read at bind group 1.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use wgpu::util::DeviceExt;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keeps the polar angle away from the poles where `look_at` degenerates.
const POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).magnitude()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    Rotate,
    Dolly,
    Pan,
}

/// Orbits the camera around `target`.
///
/// Left drag rotates, middle drag and the wheel dolly, right drag pans. A
/// horizontal drag across the full viewport height turns the camera once
/// around the target. Input only accumulates; [`update`](Self::update)
/// applies it to the camera once per frame.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub target: Point3<f32>,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, 0 looks straight down.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    /// Fraction of the pending input applied per frame, `None` applies all of it at once.
    pub damping: Option<f32>,
    viewport_height: f32,
    drag: Option<Drag>,
    cursor: Option<PhysicalPosition<f64>>,
    theta_delta: f32,
    phi_delta: f32,
    pan_delta: (f32, f32),
    scale: f32,
}

impl OrbitController {
    pub fn new<T: Into<Point3<f32>>>(target: T, viewport_height: u32) -> Self {
        Self {
            target: target.into(),
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            damping: None,
            viewport_height: viewport_height.max(1) as f32,
            drag: None,
            cursor: None,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_delta: (0.0, 0.0),
            scale: 1.0,
        }
    }

    pub fn resize(&mut self, viewport_height: u32) {
        self.viewport_height = viewport_height.max(1) as f32;
    }

    /// Rotate by a cursor movement in physical pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.theta_delta -= 2.0 * PI * dx / self.viewport_height * self.rotate_speed;
        self.phi_delta -= 2.0 * PI * dy / self.viewport_height * self.rotate_speed;
    }

    /// Pan by a cursor movement in physical pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pan_delta.0 += dx * self.pan_speed;
        self.pan_delta.1 += dy * self.pan_speed;
    }

    /// Positive steps move towards the target, negative ones away from it.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95f32.powf(self.zoom_speed * steps);
    }

    /// Feed a window event to the controller. Returns whether it was used.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.drag = match (state, button) {
                    (ElementState::Pressed, MouseButton::Left) => Some(Drag::Rotate),
                    (ElementState::Pressed, MouseButton::Middle) => Some(Drag::Dolly),
                    (ElementState::Pressed, MouseButton::Right) => Some(Drag::Pan),
                    (ElementState::Released, _) => None,
                    _ => self.drag,
                };
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let last = self.cursor.replace(*position);
                let (Some(drag), Some(last)) = (self.drag, last) else {
                    return false;
                };
                let dx = (position.x - last.x) as f32;
                let dy = (position.y - last.y) as f32;
                match drag {
                    Drag::Rotate => self.rotate(dx, dy),
                    Drag::Pan => self.pan(dx, dy),
                    Drag::Dolly => self.zoom(-dy.signum()),
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => (*y / 100.0) as f32,
                };
                self.zoom(steps);
                true
            }
            WindowEvent::Resized(size) => {
                self.resize(size.height);
                false
            }
            _ => false,
        }
    }

    /// Apply the pending input to `camera`.
    pub fn update(&mut self, camera: &mut Camera, projection: &Projection) {
        let offset = camera.position - self.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let factor = self.damping.unwrap_or(1.0).clamp(0.0, 1.0);
        theta += self.theta_delta * factor;
        phi += self.phi_delta * factor;
        let scale = self.scale.powf(factor);
        let pan = (self.pan_delta.0 * factor, self.pan_delta.1 * factor);

        let (low, high) = (
            self.min_polar_angle.max(POLAR_EPSILON),
            self.max_polar_angle.min(PI - POLAR_EPSILON),
        );
        phi = phi.clamp(low, high.max(low));
        let new_radius = (radius * scale).clamp(self.min_distance, self.max_distance);

        // Pan along the view plane, scaled so the target tracks the cursor
        let forward = -offset / radius;
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);
        let target_distance = radius * (projection.fovy.0 / 2.0).tan();
        let pan_x = 2.0 * pan.0 * target_distance / self.viewport_height;
        let pan_y = 2.0 * pan.1 * target_distance / self.viewport_height;
        if right.x.is_finite() {
            self.target = self.target + right * -pan_x + up * pan_y;
        }

        let offset = Vector3::new(
            new_radius * phi.sin() * theta.sin(),
            new_radius * phi.cos(),
            new_radius * phi.sin() * theta.cos(),
        );
        camera.position = self.target + offset;
        camera.target = self.target;

        let keep = 1.0 - factor;
        self.theta_delta *= keep;
        self.phi_delta *= keep;
        self.pan_delta = (self.pan_delta.0 * keep, self.pan_delta.1 * keep);
        self.scale = self.scale.powf(keep);
    }
}

/// Everything the renderer needs to bind the camera.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: Camera,
        controller: OrbitController,
        projection: &Projection,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Move the camera by the pending controller input and upload the result.
    pub fn update(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.controller.update(&mut self.camera, projection);
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Replace the camera and aim the controller at its target.
    pub fn set_camera(&mut self, camera: Camera) {
        self.controller.target = camera.target;
        self.camera = camera;
    }
}
