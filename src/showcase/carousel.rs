//! The carousel: loaded fruits arranged on a ring under one group node.
//!
//! Member `k` of `n` sits at angle `-k * 2π/n` around the Y axis, so turning the
//! group by `k * 2π/n` brings member `k` to the front at `(0, 0, radius)`.
//! Every member also spins around its own axes once per frame.

use std::f32::consts::TAU;

use anyhow::ensure;
use cgmath::{One, Quaternion, Rad, Rotation3, Vector3};

use crate::{
    data_structures::{
        instance::Instance,
        scene_graph::{ContainerNode, SceneNode},
    },
    render::Render,
    showcase::config::Spin,
};

/// A loaded model tagged with the catalogue index of the fruit it came from.
pub struct LoadedFruit {
    pub index: usize,
    pub node: Box<dyn SceneNode>,
}

/// Evenly spaced positions on a circle of `radius` in the XZ plane.
pub fn layout(count: usize, radius: f32) -> Vec<Vector3<f32>> {
    if count == 0 {
        return Vec::new();
    }
    let step = TAU / count as f32;
    (0..count)
        .map(|k| {
            let angle = -(k as f32) * step;
            Vector3::new(angle.sin() * radius, 0.0, angle.cos() * radius)
        })
        .collect()
}

/// Euler angles (XYZ order) of one member's own spin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
}

impl Orientation {
    pub fn advance(&mut self, spin: Spin) {
        self.x += spin.x;
        self.y += spin.y;
    }

    pub fn to_quaternion(self) -> Quaternion<f32> {
        Quaternion::from_angle_x(Rad(self.x)) * Quaternion::from_angle_y(Rad(self.y))
    }
}

pub struct Carousel {
    group: ContainerNode,
    positions: Vec<Vector3<f32>>,
    orientations: Vec<Orientation>,
    scale: f32,
    rotation_y: f32,
}

impl Carousel {
    /// A carousel without members, used when the assets never arrived.
    pub fn empty() -> Self {
        Self {
            group: ContainerNode::new(1),
            positions: Vec::new(),
            orientations: Vec::new(),
            scale: 1.0,
            rotation_y: 0.0,
        }
    }

    /// Put the loaded fruits back into catalogue order and place them on the ring.
    ///
    /// `expected` is the catalogue size: every index in `0..expected` has to be
    /// present exactly once.
    pub fn assemble(
        mut loaded: Vec<LoadedFruit>,
        expected: usize,
        radius: f32,
        scale: f32,
    ) -> anyhow::Result<Self> {
        loaded.sort_by_key(|fruit| fruit.index);
        ensure!(
            loaded.len() == expected,
            "expected {} fruits, got {}",
            expected,
            loaded.len()
        );
        for (slot, fruit) in loaded.iter().enumerate() {
            ensure!(
                fruit.index == slot,
                "fruit index {} is duplicated or out of range",
                fruit.index
            );
        }

        let positions = layout(expected, radius);
        let mut group = ContainerNode::new(1);
        for (fruit, position) in loaded.into_iter().zip(&positions) {
            // The wrapper carries the ring placement so the model keeps its own root transform
            let mut member = ContainerNode::new(1);
            member.set_local_transform(0, Instance::placed(*position, Quaternion::one(), scale));
            member.add_child(fruit.node);
            group.add_child(Box::new(member));
        }

        let mut carousel = Self {
            group,
            orientations: vec![Orientation::default(); positions.len()],
            positions,
            scale,
            rotation_y: 0.0,
        };
        carousel.update_world_transforms();
        Ok(carousel)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Ring positions in the group's local space, in catalogue order.
    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn set_rotation_y(&mut self, rotation_y: f32) {
        self.rotation_y = rotation_y;
        self.group.set_local_transform(
            0,
            Instance {
                rotation: Quaternion::from_angle_y(Rad(rotation_y)),
                ..Default::default()
            },
        );
    }

    /// Advance every member's own spin by one frame.
    pub fn spin(&mut self, spin: Spin) {
        let scale = self.scale;
        for ((member, orientation), position) in self
            .group
            .children
            .iter_mut()
            .zip(self.orientations.iter_mut())
            .zip(&self.positions)
        {
            orientation.advance(spin);
            member.set_local_transform(
                0,
                Instance::placed(*position, orientation.to_quaternion(), scale),
            );
        }
    }

    pub fn update_world_transforms(&mut self) {
        self.group.update_world_transform_all();
    }

    /// World positions of the members after the last [`Self::update_world_transforms`].
    pub fn world_positions(&self) -> Vec<Vector3<f32>> {
        self.group
            .get_children()
            .iter()
            .filter_map(|member| member.get_world_transforms().first().map(|w| w.position))
            .collect()
    }

    pub fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.group.write_to_buffers(queue);
    }

    pub fn render(&self) -> Render<'_> {
        if self.is_empty() {
            return Render::None;
        }
        Render::Defaults(self.group.get_render())
    }
}
