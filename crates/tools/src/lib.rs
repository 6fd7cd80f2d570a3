//! Diagnostic tooling: scene inspector and frame-timing overlay data.
//!
//! # Invariants
//! - Tools only read the scene; nothing here is needed for correct rendering.

mod frame_stats;
mod inspector;

pub use frame_stats::FrameStats;
pub use inspector::{SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "jellyscape-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
