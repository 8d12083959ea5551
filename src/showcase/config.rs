use cgmath::{Deg, Point3};

use crate::{
    camera::{Camera, Projection},
    context::Viewport,
    pipelines::light::LightUniform,
    showcase::fruit::{self, Fruit},
};

/// Everything that shapes the showcase. There is no config file, the defaults
/// are the showcase.
#[derive(Clone, Debug)]
pub struct ShowcaseConfig {
    pub fruits: Vec<Fruit>,
    /// Radius of the carousel ring.
    pub radius: f32,
    /// Viewports at least this wide (logical px) count as desktop.
    pub wide_breakpoint: f64,
    pub wide_scale: f32,
    pub narrow_scale: f32,
    /// Height of the scroll container, which sets how far one has to scroll.
    pub wide_page_height: f64,
    pub narrow_page_height: f64,
    /// Horizontal room left free when the fruit name is fitted to the width.
    pub wide_text_padding: f64,
    pub narrow_text_padding: f64,
    /// Per-frame spin of every member around its own X and Y axis (radians).
    pub spin: Spin,
    pub camera_position: Point3<f32>,
    pub camera_target: Point3<f32>,
    pub fov_y: Deg<f32>,
    pub z_near: f32,
    pub z_far: f32,
    pub light: LightUniform,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub x: f32,
    pub y: f32,
}

impl ShowcaseConfig {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            fruits: fruit::catalogue()?,
            radius: 70.0,
            wide_breakpoint: 1024.0,
            wide_scale: 28.0,
            narrow_scale: 20.0,
            wide_page_height: 30000.0,
            narrow_page_height: 15000.0,
            wide_text_padding: 60.0,
            narrow_text_padding: 20.0,
            spin: Spin { x: -0.01, y: -0.02 },
            camera_position: Point3::new(0.0, 0.0, 50.0),
            camera_target: Point3::new(0.0, 0.0, 90.0),
            fov_y: Deg(75.0),
            z_near: 0.1,
            z_far: 1000.0,
            light: LightUniform {
                position: [-20.0, 50.0, 50.0],
                intensity: 14000.0,
                color: [1.0, 1.0, 1.0],
                ambient: 4.0,
            },
        })
    }

    fn is_wide(&self, viewport: Viewport) -> bool {
        viewport.width >= self.wide_breakpoint
    }

    pub fn model_scale(&self, viewport: Viewport) -> f32 {
        if self.is_wide(viewport) {
            self.wide_scale
        } else {
            self.narrow_scale
        }
    }

    pub fn page_height(&self, viewport: Viewport) -> f64 {
        if self.is_wide(viewport) {
            self.wide_page_height
        } else {
            self.narrow_page_height
        }
    }

    // Only viewports strictly wider than the breakpoint get the wide padding.
    pub fn text_padding(&self, viewport: Viewport) -> f64 {
        if viewport.width > self.wide_breakpoint {
            self.wide_text_padding
        } else {
            self.narrow_text_padding
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.camera_position, self.camera_target)
    }

    pub fn projection(&self, width: u32, height: u32) -> Projection {
        Projection::new(width, height, self.fov_y, self.z_near, self.z_far)
    }
}
