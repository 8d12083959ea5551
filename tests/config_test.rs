use cgmath::{Point3, Rad};
use fruit_carousel::{context::Viewport, showcase::config::ShowcaseConfig};

#[test]
fn should_scale_models_by_viewport_width() {
    let config = ShowcaseConfig::new().unwrap();
    assert_eq!(config.model_scale(Viewport::new(1024.0, 768.0)), 28.0);
    assert_eq!(config.model_scale(Viewport::new(1920.0, 1080.0)), 28.0);
    assert_eq!(config.model_scale(Viewport::new(1023.0, 768.0)), 20.0);
    assert_eq!(config.model_scale(Viewport::new(390.0, 844.0)), 20.0);
}

#[test]
fn should_size_the_page_by_viewport_width() {
    let config = ShowcaseConfig::new().unwrap();
    assert_eq!(config.page_height(Viewport::new(1024.0, 768.0)), 30000.0);
    assert_eq!(config.page_height(Viewport::new(800.0, 600.0)), 15000.0);
}

#[test]
fn should_pad_text_on_wide_viewports_only() {
    let config = ShowcaseConfig::new().unwrap();
    assert_eq!(config.text_padding(Viewport::new(1024.0, 768.0)), 20.0);
    assert_eq!(config.text_padding(Viewport::new(1025.0, 768.0)), 60.0);
}

#[test]
fn should_look_past_the_front_fruit() {
    let config = ShowcaseConfig::new().unwrap();
    let camera = config.camera();
    assert_eq!(camera.position, Point3::new(0.0, 0.0, 50.0));
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 90.0));
    assert!(config.radius > camera.position.z);

    let projection = config.projection(1600, 800);
    assert_eq!(projection.aspect(), 2.0);
    assert!((Rad::from(config.fov_y).0 - 75f32.to_radians()).abs() < 1e-6);
}

#[test]
fn should_light_from_the_upper_left() {
    let config = ShowcaseConfig::new().unwrap();
    assert_eq!(config.light.position, [-20.0, 50.0, 50.0]);
    assert_eq!(config.light.intensity, 14000.0);
    assert_eq!(config.light.ambient, 4.0);
    assert_eq!(config.spin.x, -0.01);
    assert_eq!(config.spin.y, -0.02);
}
