use glam::Vec3;
use jellyscape_common::Transform;

use crate::clock::Clock;
use crate::component::SceneComponent;

/// The jellyfish: a pulsing bell with trailing tentacles.
///
/// Geometry lives with the renderer; this holds the placement and the
/// uniforms its shader reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub transform: Transform,
    /// Unitless animation phase, `elapsed_ms / phase_divisor_ms`.
    pub phase: f32,
    pub phase_divisor_ms: f64,
    pub bell_radius: f32,
    pub tentacle_count: u32,
    pub tentacle_length: f32,
    /// Fraction of the bell radius the pulse contracts by.
    pub pulse_amplitude: f32,
    /// Vertical bob in world units.
    pub bob_amplitude: f32,
    pub bell_color: [f32; 4],
    pub glow_color: [f32; 4],
    rest_position: Vec3,
}

impl Creature {
    pub fn new(phase_divisor_ms: f64) -> Self {
        let rest_position = Vec3::new(0.0, 0.4, 0.0);
        Self {
            transform: Transform::from_position(rest_position),
            phase: 0.0,
            phase_divisor_ms,
            bell_radius: 1.0,
            tentacle_count: 12,
            tentacle_length: 2.6,
            pulse_amplitude: 0.12,
            bob_amplitude: 0.15,
            bell_color: [0.55, 0.75, 1.0, 0.55],
            glow_color: [0.9, 0.5, 1.0, 1.0],
            rest_position,
        }
    }
}

impl SceneComponent for Creature {
    fn update(&mut self, clock: &Clock) {
        self.phase = (clock.elapsed_ms() / self.phase_divisor_ms) as f32;
        self.transform.position =
            self.rest_position + Vec3::Y * (self.phase.sin() * self.bob_amplitude);
    }
}
