use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::clock::Clock;
use crate::component::SceneComponent;

/// One sprite instance. The shader animates it from `phase` and `speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub size: f32,
    pub speed: f32,
    /// Per-particle phase offset so sprites do not move in lockstep.
    pub offset: f32,
}

/// Suspended motes drifting around the creature plus bubbles rising
/// through the water column.
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub motes: Vec<Particle>,
    pub bubbles: Vec<Particle>,
    pub phase: f32,
    pub phase_divisor_ms: f64,
    /// Half extents of the box sprites are scattered in.
    pub extent: Vec3,
    pub mote_color: [f32; 4],
    pub bubble_color: [f32; 4],
}

impl ParticleField {
    pub fn new(mote_count: u32, bubble_count: u32, seed: u64, phase_divisor_ms: f64) -> Self {
        let extent = Vec3::new(6.0, 4.0, 4.0);
        let mut rng = SmallRng::seed_from_u64(seed);
        let motes = (0..mote_count)
            .map(|_| scatter(&mut rng, extent, 0.02..0.08, 0.2..1.0))
            .collect();
        let bubbles = (0..bubble_count)
            .map(|_| scatter(&mut rng, extent, 0.05..0.18, 0.6..1.8))
            .collect();
        Self {
            motes,
            bubbles,
            phase: 0.0,
            phase_divisor_ms,
            extent,
            mote_color: [0.7, 0.85, 1.0, 0.6],
            bubble_color: [0.85, 0.95, 1.0, 0.45],
        }
    }

    pub fn len(&self) -> usize {
        self.motes.len() + self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motes.is_empty() && self.bubbles.is_empty()
    }
}

fn scatter(
    rng: &mut SmallRng,
    extent: Vec3,
    size: std::ops::Range<f32>,
    speed: std::ops::Range<f32>,
) -> Particle {
    Particle {
        position: Vec3::new(
            rng.gen_range(-extent.x..extent.x),
            rng.gen_range(-extent.y..extent.y),
            rng.gen_range(-extent.z..extent.z),
        ),
        size: rng.gen_range(size),
        speed: rng.gen_range(speed),
        offset: rng.gen_range(0.0..std::f32::consts::TAU),
    }
}

impl SceneComponent for ParticleField {
    fn update(&mut self, clock: &Clock) {
        self.phase = (clock.elapsed_ms() / self.phase_divisor_ms) as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let a = ParticleField::new(50, 10, 3, 1500.0);
        let b = ParticleField::new(50, 10, 3, 1500.0);
        assert_eq!(a.motes, b.motes);
        assert_eq!(a.bubbles, b.bubbles);
        assert_eq!(a.len(), 60);
    }

    #[test]
    fn different_seeds_differ() {
        let a = ParticleField::new(20, 0, 1, 1500.0);
        let b = ParticleField::new(20, 0, 2, 1500.0);
        assert_ne!(a.motes, b.motes);
    }

    #[test]
    fn particles_stay_inside_extent() {
        let field = ParticleField::new(500, 100, 11, 1500.0);
        for p in field.motes.iter().chain(&field.bubbles) {
            assert!(p.position.abs().cmple(field.extent).all());
            assert!(p.size > 0.0);
        }
    }

    #[test]
    fn empty_field() {
        let field = ParticleField::new(0, 0, 0, 1500.0);
        assert!(field.is_empty());
    }
}
