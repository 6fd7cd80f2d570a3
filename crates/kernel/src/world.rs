use jellyscape_common::SceneConfig;

use crate::clock::Clock;
use crate::component::SceneComponent;
use crate::creature::Creature;
use crate::lights::LightRig;
use crate::particles::ParticleField;

/// The visual contents of the scene.
///
/// Per-frame fan-out is fixed: creature, then particle field. Lights are
/// static. No component reads another's state during an update.
#[derive(Debug, Clone)]
pub struct World {
    pub creature: Creature,
    pub particles: ParticleField,
    pub lights: LightRig,
}

impl World {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            creature: Creature::new(config.phase_divisor_ms),
            particles: ParticleField::new(
                config.particle_count,
                config.bubble_count,
                config.seed,
                config.phase_divisor_ms,
            ),
            lights: LightRig::default(),
        }
    }

    /// Current animation phase shared by creature and particles.
    pub fn phase(&self) -> f32 {
        self.creature.phase
    }

    pub fn set_phase_divisor(&mut self, divisor_ms: f64) {
        self.creature.phase_divisor_ms = divisor_ms;
        self.particles.phase_divisor_ms = divisor_ms;
    }
}

impl SceneComponent for World {
    fn update(&mut self, clock: &Clock) {
        self.creature.update(clock);
        self.particles.update(clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn world_starts_at_phase_zero() {
        let world = World::new(&SceneConfig::default());
        assert_eq!(world.phase(), 0.0);
        assert_eq!(world.particles.len(), 680);
    }

    #[test]
    fn update_fans_out_to_creature_and_particles() {
        let mut world = World::new(&SceneConfig::default());
        let t0 = Instant::now();
        let mut clock = Clock::starting_at(t0);
        clock.update_at(t0 + Duration::from_millis(750));
        world.update(&clock);
        assert!((world.creature.phase - 0.5).abs() < 1e-6);
        assert_eq!(world.creature.phase, world.particles.phase);
    }

    #[test]
    fn lights_are_untouched_by_update() {
        let mut world = World::new(&SceneConfig::default());
        let before = world.lights.clone();
        let t0 = Instant::now();
        let mut clock = Clock::starting_at(t0);
        clock.update_at(t0 + Duration::from_secs(5));
        world.update(&clock);
        assert_eq!(world.lights, before);
    }

    #[test]
    fn phase_divisor_applies_to_both() {
        let mut world = World::new(&SceneConfig::default());
        world.set_phase_divisor(500.0);
        let t0 = Instant::now();
        let mut clock = Clock::starting_at(t0);
        clock.update_at(t0 + Duration::from_millis(1000));
        world.update(&clock);
        assert!((world.creature.phase - 2.0).abs() < 1e-6);
        assert!((world.particles.phase - 2.0).abs() < 1e-6);
    }
}
