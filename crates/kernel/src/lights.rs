use glam::Vec3;

use crate::component::SceneComponent;

/// Static lighting: an ambient term, a key light from above, and a cold
/// rim light from behind. Written once, never animated.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient: [f32; 4],
    pub key_direction: Vec3,
    pub key_color: [f32; 4],
    pub rim_direction: Vec3,
    pub rim_color: [f32; 4],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: [0.08, 0.14, 0.28, 1.0],
            key_direction: Vec3::new(0.2, 1.0, 0.4).normalize(),
            key_color: [0.75, 0.85, 1.0, 1.0],
            rim_direction: Vec3::new(-0.3, 0.2, -1.0).normalize(),
            rim_color: [0.5, 0.3, 0.9, 1.0],
        }
    }
}

impl SceneComponent for LightRig {}
