use std::f32::consts::FRAC_PI_2;

use cgmath::Deg;
use farmstead::camera::{Camera, OrbitController, Projection};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceId, ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
};

mod common;

use crate::common::{approx, approx3};

const HEIGHT: u32 = 600;

fn setup() -> (Camera, OrbitController, Projection) {
    (
        Camera::new([0.0, 0.0, 2.0], [0.0, 0.0, 0.0]),
        OrbitController::new([0.0, 0.0, 0.0], HEIGHT),
        Projection::new(800, HEIGHT, Deg(75.0), 0.1, 200.0),
    )
}

fn device() -> DeviceId {
    // SAFETY: the id is only compared by the controller, never used to reach a device
    unsafe { DeviceId::dummy() }
}

#[test]
fn should_circle_target_at_constant_distance() {
    let (mut camera, mut controls, projection) = setup();

    controls.rotate(HEIGHT as f32 / 2.0, 0.0);
    controls.update(&mut camera, &projection);

    assert!(approx(camera.distance(), 2.0));
    assert!(approx3(camera.position.into(), [0.0, 0.0, -2.0]));
    assert!(approx3(camera.target.into(), [0.0; 3]));
}

#[test]
fn should_turn_once_for_a_drag_across_the_viewport_height() {
    let (mut camera, mut controls, projection) = setup();

    controls.rotate(HEIGHT as f32, 0.0);
    controls.update(&mut camera, &projection);

    assert!(approx3(camera.position.into(), [0.0, 0.0, 2.0]));
}

#[test]
fn should_stop_at_polar_limit() {
    let (mut camera, mut controls, projection) = setup();
    controls.max_polar_angle = FRAC_PI_2;

    controls.rotate(0.0, -10_000.0);
    controls.update(&mut camera, &projection);

    assert!(approx(camera.position.y, 0.0));
    assert!(approx(camera.distance(), 2.0));
}

#[test]
fn should_never_flip_over_the_pole() {
    let (mut camera, mut controls, projection) = setup();

    controls.rotate(0.0, 10_000.0);
    controls.update(&mut camera, &projection);

    assert!(camera.position.y > 0.0);
    assert!(approx(camera.distance(), 2.0));
    assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
}

#[test]
fn should_dolly_towards_target() {
    let (mut camera, mut controls, projection) = setup();

    controls.zoom(1.0);
    controls.update(&mut camera, &projection);

    assert!(approx(camera.distance(), 2.0 * 0.95));
}

#[test]
fn should_clamp_dolly_to_distance_limits() {
    let (mut camera, mut controls, projection) = setup();
    controls.min_distance = 1.5;
    controls.max_distance = 3.0;

    controls.zoom(100.0);
    controls.update(&mut camera, &projection);
    assert!(approx(camera.distance(), 1.5));

    controls.zoom(-200.0);
    controls.update(&mut camera, &projection);
    assert!(approx(camera.distance(), 3.0));
}

#[test]
fn should_pan_target_and_camera_together() {
    let (mut camera, mut controls, projection) = setup();

    controls.pan(100.0, 0.0);
    controls.update(&mut camera, &projection);

    assert!(controls.target.x < 0.0);
    assert!(approx(camera.position.x, controls.target.x));
    assert_eq!(camera.target, controls.target);
    assert!(approx(camera.distance(), 2.0));
}

#[test]
fn should_ease_towards_input_when_damped() {
    let (mut camera, mut controls, projection) = setup();
    controls.damping = Some(0.5);

    controls.rotate(HEIGHT as f32 / 4.0, 0.0);
    controls.update(&mut camera, &projection);
    let halfway = camera.position;
    for _ in 0..40 {
        controls.update(&mut camera, &projection);
    }

    assert!(approx(halfway.x, -(2.0f32.sqrt())));
    assert!(approx3(camera.position.into(), [-2.0, 0.0, 0.0]));
}

#[test]
fn should_rotate_while_left_button_is_held() {
    let (mut camera, mut controls, projection) = setup();
    let moved = |x: f64| WindowEvent::CursorMoved {
        device_id: device(),
        position: PhysicalPosition::new(x, 100.0),
    };

    assert!(!controls.handle_window_events(&moved(0.0)));
    assert!(controls.handle_window_events(&WindowEvent::MouseInput {
        device_id: device(),
        state: ElementState::Pressed,
        button: MouseButton::Left,
    }));
    assert!(controls.handle_window_events(&moved(HEIGHT as f64 / 2.0)));
    controls.handle_window_events(&WindowEvent::MouseInput {
        device_id: device(),
        state: ElementState::Released,
        button: MouseButton::Left,
    });
    assert!(!controls.handle_window_events(&moved(0.0)));
    controls.update(&mut camera, &projection);

    assert!(approx3(camera.position.into(), [0.0, 0.0, -2.0]));
}

#[test]
fn should_zoom_with_the_wheel() {
    let (mut camera, mut controls, projection) = setup();

    assert!(controls.handle_window_events(&WindowEvent::MouseWheel {
        device_id: device(),
        delta: MouseScrollDelta::LineDelta(0.0, 2.0),
        phase: TouchPhase::Moved,
    }));
    controls.update(&mut camera, &projection);

    assert!(approx(camera.distance(), 2.0 * 0.95 * 0.95));
}
