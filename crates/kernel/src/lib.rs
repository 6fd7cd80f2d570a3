//! Scene kernel: the composition root and per-frame update pipeline.
//!
//! Everything here is GPU-free. Components hold the numbers a renderer
//! uploads (transforms, uniforms, instance data); the renderer reads them
//! through the [`RenderStage`] seam and never mutates them.
//!
//! # Invariants
//! - At most one [`Scene`] per [`SceneSlot`]; later initialisation requests
//!   return the existing scene untouched.
//! - Components only ever see the [`Clock`] and [`ViewportState`], never the root.
//! - Frame order is fixed: clock, camera, render, post effect, world.

pub mod camera;
pub mod clock;
pub mod component;
pub mod creature;
pub mod lights;
pub mod particles;
pub mod post;
pub mod prompt;
pub mod scene;
pub mod slot;
pub mod target;
pub mod viewport;
pub mod world;

pub use camera::FollowCamera;
pub use clock::Clock;
pub use component::SceneComponent;
pub use creature::Creature;
pub use lights::LightRig;
pub use particles::{Particle, ParticleField};
pub use post::PostEffect;
pub use prompt::{PromptState, PromptTimer};
pub use scene::{LoopState, RenderStage, Scene, SceneInit, Tuning};
pub use slot::SceneSlot;
pub use target::RenderTarget;
pub use viewport::ViewportState;
pub use world::World;
