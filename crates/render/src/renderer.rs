use jellyscape_kernel::{RenderStage, Scene};
use std::convert::Infallible;
use std::fmt::Write;

/// Debug text renderer: describes each frame instead of drawing it.
///
/// Used by the headless CLI and by tests of the frame pipeline.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
    last: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of the most recent frame.
    pub fn last_frame(&self) -> &str {
        &self.last
    }

    pub fn describe(scene: &Scene) -> String {
        let mut out = String::new();
        let clock = scene.clock();
        let vp = scene.viewport();
        let target = scene.target();
        let cam = scene.camera();
        let world = scene.world();

        let _ = writeln!(
            out,
            "=== Frame {} ({}) t={:.1}ms dt={:.1}ms ===",
            scene.frame_index(),
            scene.mode(),
            clock.elapsed_ms(),
            clock.delta_ms()
        );
        let _ = writeln!(
            out,
            "Viewport: {:.0}x{:.0} @{:.2} buffer={}x{} cursor=({:.2}, {:.2})",
            vp.width(),
            vp.height(),
            vp.pixel_ratio(),
            target.buffer_width,
            target.buffer_height,
            vp.cursor().x,
            vp.cursor().y
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) aspect={:.3}",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.target().x,
            cam.target().y,
            cam.target().z,
            cam.aspect
        );
        let p = world.creature.transform.position;
        let _ = writeln!(
            out,
            "Creature: phase={:.4} pos=({:.2}, {:.2}, {:.2})",
            world.creature.phase, p.x, p.y, p.z
        );
        let _ = writeln!(
            out,
            "Particles: motes={} bubbles={} phase={:.4}",
            world.particles.motes.len(),
            world.particles.bubbles.len(),
            world.particles.phase
        );
        let _ = writeln!(out, "Post: time={:.3}s", scene.post().time);
        out
    }
}

impl RenderStage for DebugTextRenderer {
    type Error = Infallible;

    fn render(&mut self, scene: &Scene) -> Result<(), Infallible> {
        self.last = Self::describe(scene);
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyscape_common::{RunMode, SceneConfig};
    use jellyscape_kernel::SceneInit;
    use std::time::Duration;

    #[test]
    fn describes_fresh_scene() {
        let scene = Scene::new(SceneInit::new(
            SceneConfig::default(),
            RunMode::Normal,
            800.0,
            600.0,
            1.0,
        ));
        let text = DebugTextRenderer::describe(&scene);
        assert!(text.contains("Frame 0 (normal)"));
        assert!(text.contains("Viewport: 800x600"));
        assert!(text.contains("motes=600 bubbles=80"));
    }

    #[test]
    fn records_each_frame() {
        let init = SceneInit::new(SceneConfig::default(), RunMode::Diagnostic, 640.0, 480.0, 2.0);
        let t0 = init.start;
        let mut scene = Scene::new(init);
        let mut renderer = DebugTextRenderer::new();

        for i in 1..=3u64 {
            scene
                .frame_at(t0 + Duration::from_millis(16 * i), &mut renderer)
                .unwrap();
        }
        assert_eq!(renderer.frames(), 3);
        assert!(renderer.last_frame().contains("Frame 2 (diagnostic)"));
        assert!(renderer.last_frame().contains("buffer=1280x960"));
    }
}
