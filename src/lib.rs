//! fruit-carousel
//!
//! A scroll-driven 3D fruit carousel that runs natively and in the browser.
//! Fruit models are loaded from glTF files, arranged on a ring and turned to the
//! next fruit as the page scrolls, while the background colour and the fruit
//! name on the page follow along.
//!
//! High-level modules
//! - `camera`: camera, projection and the view/projection uniform
//! - `context`: central GPU and window context that owns device/queue/pipeline
//! - `data_structures`: engine data models (meshes, instances, textures, scene graph)
//! - `flow`: the event loop and the flow abstraction driving it
//! - `pipelines`: the lit model pipeline and its light uniform
//! - `resources`: helpers to load textures/models and create GPU resources
//! - `render`: render composition collected from the flows each frame
//! - `showcase`: the carousel itself, its timeline and the page around it
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod showcase;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
pub use winit::event::WindowEvent;
