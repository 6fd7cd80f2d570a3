//! Rendering adapter: renderer-agnostic stages and shader composition.
//!
//! # Invariants
//! - Renderers read the scene; they never mutate it.
//! - Shader sources are assembled from named insertion points, never by
//!   searching and replacing text.

mod renderer;
pub mod shader;

pub use renderer::DebugTextRenderer;
pub use shader::{InsertionPoint, Segment, ShaderChunks, ShaderError, ShaderTemplate, compose};

pub fn crate_info() -> &'static str {
    "jellyscape-render v0.1.0"
}
