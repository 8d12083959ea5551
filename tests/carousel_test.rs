use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};
use fruit_carousel::{
    data_structures::scene_graph::ContainerNode,
    render::Render,
    showcase::{
        carousel::{self, Carousel, LoadedFruit, Orientation},
        config::Spin,
    },
};

const RADIUS: f32 = 70.0;

fn loaded(indices: &[usize]) -> Vec<LoadedFruit> {
    indices
        .iter()
        .map(|&index| LoadedFruit {
            index,
            node: Box::new(ContainerNode::new(1)),
        })
        .collect()
}

fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).magnitude() < 1e-3, "{a:?} != {b:?}");
}

#[test]
fn should_place_members_evenly_on_the_ring() {
    let positions = carousel::layout(5, RADIUS);
    assert_eq!(positions.len(), 5);
    assert_close(positions[0], Vector3::new(0.0, 0.0, RADIUS));
    for (k, position) in positions.iter().enumerate() {
        assert!((position.magnitude() - RADIUS).abs() < 1e-3);
        assert_eq!(position.y, 0.0);
        let angle = position.x.atan2(position.z);
        let expected = -(k as f32) * TAU / 5.0;
        let diff = (angle - expected).rem_euclid(TAU);
        assert!(diff < 1e-4 || TAU - diff < 1e-4, "member {k} at {angle}");
    }
}

#[test]
fn should_lay_out_nothing_for_no_members() {
    assert!(carousel::layout(0, RADIUS).is_empty());
}

#[test]
fn should_restore_catalogue_order_after_a_concurrent_load() {
    let carousel = Carousel::assemble(loaded(&[3, 0, 4, 1, 2]), 5, RADIUS, 28.0).unwrap();
    assert_eq!(carousel.len(), 5);
    assert_eq!(carousel.positions(), carousel::layout(5, RADIUS).as_slice());
    for (world, ring) in carousel.world_positions().iter().zip(carousel.positions()) {
        assert_close(*world, *ring);
    }
}

#[test]
fn should_reject_incomplete_or_duplicate_batches() {
    assert!(Carousel::assemble(loaded(&[0, 1, 2]), 5, RADIUS, 28.0).is_err());
    assert!(Carousel::assemble(loaded(&[0, 1, 1, 3, 4]), 5, RADIUS, 28.0).is_err());
    assert!(Carousel::assemble(loaded(&[0, 1, 2, 3, 7]), 5, RADIUS, 28.0).is_err());
}

#[test]
fn should_bring_each_member_to_the_front() {
    let mut carousel = Carousel::assemble(loaded(&[0, 1, 2, 3, 4]), 5, RADIUS, 20.0).unwrap();
    for k in 0..5 {
        carousel.set_rotation_y(TAU / 5.0 * k as f32);
        carousel.update_world_transforms();
        let world = carousel.world_positions();
        assert_close(world[k], Vector3::new(0.0, 0.0, RADIUS));
    }
}

#[test]
fn should_spin_by_a_fixed_step_per_frame() {
    let spin = Spin { x: -0.01, y: -0.02 };
    let mut carousel = Carousel::assemble(loaded(&[0, 1, 2]), 3, RADIUS, 28.0).unwrap();
    for _ in 0..10 {
        carousel.spin(spin);
    }
    for orientation in carousel.orientations() {
        assert!((orientation.x + 0.1).abs() < 1e-5);
        assert!((orientation.y + 0.2).abs() < 1e-5);
    }
}

#[test]
fn should_spin_independent_of_the_ring_rotation() {
    let spin = Spin { x: -0.01, y: -0.02 };
    let mut still = Carousel::assemble(loaded(&[0, 1]), 2, RADIUS, 28.0).unwrap();
    let mut turned = Carousel::assemble(loaded(&[0, 1]), 2, RADIUS, 28.0).unwrap();
    turned.set_rotation_y(1.3);
    still.spin(spin);
    turned.spin(spin);
    assert_eq!(still.orientations(), turned.orientations());

    // spinning a member in place keeps it on the ring
    turned.update_world_transforms();
    for position in turned.world_positions() {
        assert!((position.magnitude() - RADIUS).abs() < 1e-3);
    }
}

#[test]
fn should_compose_spin_around_x_then_y() {
    let mut orientation = Orientation::default();
    orientation.advance(Spin { x: 0.5, y: 0.25 });
    let q = orientation.to_quaternion();
    let expected = cgmath::Quaternion::from(cgmath::Euler::new(
        cgmath::Rad(0.5),
        cgmath::Rad(0.25),
        cgmath::Rad(0.0),
    ));
    assert!((q - expected).magnitude() < 1e-5);
}

#[test]
fn should_render_nothing_without_members() {
    let carousel = Carousel::empty();
    assert!(carousel.is_empty());
    assert!(matches!(carousel.render(), Render::None));
}
