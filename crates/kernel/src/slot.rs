use crate::scene::{Scene, SceneInit};

/// Holder for the session's single [`Scene`].
///
/// The host owns one slot and passes the scene down by reference. The first
/// `get_or_init` builds the scene; every later call returns that same scene
/// and ignores its arguments. There is no teardown short of dropping the slot.
#[derive(Default)]
pub struct SceneSlot {
    scene: Option<Scene>,
}

impl SceneSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_init(&mut self, init: SceneInit) -> &mut Scene {
        if self.scene.is_some() {
            tracing::trace!("scene already running, ignoring init");
        }
        self.scene.get_or_insert_with(|| {
            let scene = Scene::new(init);
            // Readiness is announced without waiting on the renderer.
            tracing::info!("scene ready");
            scene
        })
    }

    pub fn is_running(&self) -> bool {
        self.scene.is_some()
    }

    pub fn get(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jellyscape_common::{RunMode, SceneConfig};

    #[test]
    fn starts_uninitialized() {
        let slot = SceneSlot::new();
        assert!(!slot.is_running());
        assert!(slot.get().is_none());
    }

    #[test]
    fn second_init_returns_same_scene_untouched() {
        let mut slot = SceneSlot::new();

        let first = SceneInit::new(SceneConfig::default(), RunMode::Normal, 800.0, 600.0, 1.0);
        let a: *const Scene = slot.get_or_init(first);

        let other_config = SceneConfig {
            damping: 0.9,
            ..SceneConfig::default()
        };
        let second = SceneInit::new(other_config, RunMode::Diagnostic, 1920.0, 1080.0, 2.0);
        let b: *const Scene = slot.get_or_init(second);

        assert!(std::ptr::eq(a, b));
        let scene = slot.get().unwrap();
        assert_eq!(scene.config().damping, 0.5);
        assert_eq!(scene.mode(), RunMode::Normal);
        assert_eq!(scene.viewport().width(), 800.0);
    }
}
