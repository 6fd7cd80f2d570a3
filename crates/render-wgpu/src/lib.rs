//! wgpu render backend for the jellyfish scene.
//!
//! Draws the creature and the sprite field into an offscreen target, then
//! runs the post pass onto the surface. All per-frame values are read from
//! the kernel [`Scene`](jellyscape_kernel::Scene).
//!
//! # Invariants
//! - The renderer never mutates scene state.
//! - GPU buffer sizes follow the scene's render target, resized by the host.

mod context;
mod error;
mod geometry;
mod gpu;
mod shaders;
mod stage;
mod texture;
mod uniforms;

pub use context::GpuContext;
pub use error::RenderError;
pub use geometry::{MeshData, MeshVertex, jellyfish_mesh};
pub use gpu::SceneRenderer;
pub use stage::{Overlay, SurfaceStage};
pub use texture::GpuTexture;
