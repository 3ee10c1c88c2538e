use cgmath::Deg;
use farmstead::{
    camera::Projection,
    viewport::{FramePlan, Viewport, plan_frame},
};
use winit::dpi::PhysicalSize;

mod common;

use crate::common::approx;

#[test]
fn should_scale_backing_store_by_pixel_ratio() {
    let mut viewport = Viewport::new(2.0, 8192);

    let resized = viewport.sync(PhysicalSize::new(800, 600));

    assert_eq!(resized, Some(PhysicalSize::new(1600, 1200)));
    assert_eq!(viewport.backing(), PhysicalSize::new(1600, 1200));
}

#[test]
fn should_not_resize_when_display_is_unchanged() {
    let mut viewport = Viewport::new(2.0, 8192);
    viewport.sync(PhysicalSize::new(800, 600));

    assert_eq!(viewport.sync(PhysicalSize::new(800, 600)), None);
    assert_eq!(
        viewport.sync(PhysicalSize::new(1024, 600)),
        Some(PhysicalSize::new(2048, 1200))
    );
}

#[test]
fn should_keep_backing_store_while_display_is_hidden() {
    let mut viewport = Viewport::new(1.0, 8192);
    viewport.sync(PhysicalSize::new(640, 480));

    assert_eq!(viewport.sync(PhysicalSize::new(0, 480)), None);
    assert_eq!(viewport.sync(PhysicalSize::new(0, 0)), None);
    assert_eq!(viewport.backing(), PhysicalSize::new(640, 480));
}

#[test]
fn should_clamp_backing_store_to_texture_limit() {
    let viewport = Viewport::new(2.0, 2048);

    assert_eq!(
        viewport.backing_size(PhysicalSize::new(1920, 300)),
        PhysicalSize::new(2048, 600)
    );
    assert_eq!(
        Viewport::new(0.25, 2048).backing_size(PhysicalSize::new(1, 1)),
        PhysicalSize::new(1, 1)
    );
}

#[test]
fn should_render_and_reschedule_while_loads_are_pending() {
    let mut viewport = Viewport::new(1.0, 4096);

    let first = plan_frame(&mut viewport, PhysicalSize::new(300, 200), 11);
    let second = plan_frame(&mut viewport, PhysicalSize::new(300, 200), 4);

    assert_eq!(
        first,
        FramePlan {
            resize: Some(PhysicalSize::new(300, 200)),
            render: true,
            reschedule: true,
        }
    );
    assert_eq!(
        second,
        FramePlan {
            resize: None,
            render: true,
            reschedule: true,
        }
    );
}

#[test]
fn should_keep_rendering_once_loads_are_settled() {
    let mut viewport = Viewport::new(1.0, 4096);

    for _ in 0..3 {
        let plan = plan_frame(&mut viewport, PhysicalSize::new(300, 200), 0);
        assert!(plan.render);
        assert!(plan.reschedule);
    }
}

#[test]
fn should_match_projection_aspect_to_display() {
    let mut projection = Projection::new(800, 600, Deg(75.0), 0.1, 200.0);
    assert!(approx(projection.aspect(), 800.0 / 600.0));

    projection.resize(500, 1000);

    assert!(approx(projection.aspect(), 0.5));
}

#[test]
fn should_keep_pixel_ratio_positive() {
    assert_eq!(Viewport::new(2.0, 4096).pixel_ratio(), 2.0);
    assert!(Viewport::new(0.0, 4096).pixel_ratio() > 0.0);
    assert_eq!(farmstead::viewport::DEFAULT_PIXEL_RATIO, 1.0);
}
