//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn with a [`Render`] value. The engine walks
//! it once per frame, collects every [`Instanced`] object into one batch and
//! draws the batch with the shared model pipeline.

use crate::data_structures::{model::Model, scene_graph::SceneNode};

/// Data for instanced object rendering: a model, its instance buffer and an ID.
///
/// The instance buffer holds the world transforms of every instance of
/// `model` (see [`crate::data_structures::instance::InstanceRaw`]).
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub id: u32,
}

/// Specifies how a flow's objects should be rendered.
///
/// - `None` renders nothing (e.g. before the assets arrived)
/// - `Default(Instanced)` renders a single instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of instanced objects
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flatten `self` into the batch drawn by the model pipeline.
    pub(crate) fn collect_into(self, basics: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect_into(basics)),
            Render::None => (),
        }
    }
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(sn: &'a dyn SceneNode) -> Self {
        Render::Defaults(sn.get_render())
    }
}
