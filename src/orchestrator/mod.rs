//! Orchestration layer: wires config, input source, pipeline and rendering.

pub mod app;

pub use app::App;
