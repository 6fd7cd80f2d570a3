use jellyscape_common::RunMode;
use jellyscape_kernel::{LoopState, Scene};

/// Read-only queries against the running scene for the diagnostic panel
/// and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene) -> SceneSummary {
        let cam = scene.camera();
        let target = scene.target();
        SceneSummary {
            mode: scene.mode(),
            frame_index: scene.frame_index(),
            elapsed_ms: scene.clock().elapsed_ms(),
            phase: scene.world().phase(),
            camera_position: cam.position.to_array(),
            buffer_size: [target.buffer_width, target.buffer_height],
            pixel_ratio: target.pixel_ratio,
            sprite_count: scene.world().particles.len(),
            halted: scene.loop_state() == LoopState::Halted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub mode: RunMode,
    pub frame_index: u64,
    pub elapsed_ms: f64,
    pub phase: f32,
    pub camera_position: [f32; 3],
    pub buffer_size: [u32; 2],
    pub pixel_ratio: f32,
    pub sprite_count: usize,
    pub halted: bool,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: mode={} frames={} elapsed={:.0}ms phase={:.3} buffer={}x{}@{:.2} sprites={}{}",
            self.mode,
            self.frame_index,
            self.elapsed_ms,
            self.phase,
            self.buffer_size[0],
            self.buffer_size[1],
            self.pixel_ratio,
            self.sprite_count,
            if self.halted { " HALTED" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyscape_common::SceneConfig;
    use jellyscape_kernel::SceneInit;

    fn scene() -> Scene {
        Scene::new(SceneInit::new(
            SceneConfig::default(),
            RunMode::Normal,
            800.0,
            600.0,
            1.0,
        ))
    }

    #[test]
    fn summary_of_fresh_scene() {
        let summary = SceneInspector::summary(&scene());
        assert_eq!(summary.frame_index, 0);
        assert_eq!(summary.buffer_size, [800, 600]);
        assert_eq!(summary.sprite_count, 680);
        assert!(!summary.halted);
    }

    #[test]
    fn summary_display() {
        let s = format!("{}", SceneInspector::summary(&scene()));
        assert!(s.contains("mode=normal"));
        assert!(s.contains("buffer=800x600"));
        assert!(!s.contains("HALTED"));
    }
}
