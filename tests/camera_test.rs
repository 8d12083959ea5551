use cgmath::Deg;
use fruit_carousel::camera::{Camera, CameraUniform, Projection};

#[test]
fn should_follow_the_projection_after_a_resize() {
    let camera = Camera::new((0.0, 0.0, 50.0), (0.0, 0.0, 90.0));
    let mut projection = Projection::new(800, 600, Deg(75.0), 0.1, 1000.0);
    let mut uniform = CameraUniform::new();

    uniform.update_view_proj(&camera, &projection);
    let before = uniform.view_proj();

    projection.resize(400, 600);
    uniform.update_view_proj(&camera, &projection);
    let after = uniform.view_proj();

    assert_ne!(before, after);
    // x is scaled by 1 / aspect, y stays as it is
    assert!((after[0][0] - 2.0 * before[0][0]).abs() < 1e-4);
    assert_eq!(after[1][1], before[1][1]);
}

#[test]
fn should_guard_against_a_zero_sized_window() {
    let mut projection = Projection::new(0, 0, Deg(75.0), 0.1, 1000.0);
    assert_eq!(projection.aspect(), 1.0);
    projection.resize(300, 0);
    assert_eq!(projection.aspect(), 300.0);
}
