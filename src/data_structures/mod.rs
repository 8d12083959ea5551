//! Engine data structures: models, textures, scene graphs, and instances.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains the GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
