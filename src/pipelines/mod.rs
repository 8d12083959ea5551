//! Render pipelines.
//!
//! - `basic` holds the lit, instanced model pipeline
//! - `light` holds the light uniform and its bind group

pub mod basic;
pub mod light;
