//! Shared types for the jellyscape workspace: transforms, run mode, and the
//! tunable scene configuration.

mod config;
mod types;

pub use config::{CameraConfig, ConfigError, SceneConfig};
pub use types::{MODE_ENV, RunMode, Transform};
