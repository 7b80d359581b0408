//! Particle state and integration.
//!
//! Particles live in a fixed pool owned by an [`Emitter`](crate::emitter::Emitter).
//! A slot is dead when `life <= 0`; dead slots are recycled by the emitter
//! rather than removed.

use glam::{Mat4, Vec3, Vec4};

use crate::math;
use crate::table::TableCursor;
use crate::transform::Transform;

/// One simulated particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub transform: Transform,
    /// Final matrix handed to the renderer.
    pub world_matrix: Mat4,

    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Force accumulated this tick, cleared by [`integrate`](Self::integrate).
    pub force: Vec3,
    pub mass: f32,

    pub colour: Vec4,
    pub colour_begin: Vec4,
    pub colour_end: Vec4,

    pub size_begin: f32,
    pub size_end: f32,

    pub speed_limit_begin: f32,
    pub speed_limit_end: f32,

    /// Seconds of life left.
    pub life: f32,
    /// Total life given at spawn.
    pub lifespan: f32,

    pub distance_along_path: f32,
    /// Last resolved path sample, reused by the next path lookup.
    pub path_cursor: TableCursor,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            world_matrix: Mat4::IDENTITY,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 1.0,
            colour: Vec4::ONE,
            colour_begin: Vec4::ONE,
            colour_end: Vec4::ONE,
            size_begin: 1.0,
            size_end: 1.0,
            speed_limit_begin: 0.0,
            speed_limit_end: 0.0,
            life: 0.0,
            lifespan: 0.0,
            distance_along_path: 0.0,
            path_cursor: TableCursor::default(),
        }
    }
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    /// How far through its life the particle is, in `[0, 1]`.
    ///
    /// Zero for a particle that never had a lifespan.
    pub fn normalized_life(&self) -> f32 {
        if self.lifespan > 0.0 {
            (1.0 - self.life / self.lifespan).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Fold accumulated force into velocity and clear the accumulators.
    ///
    /// Force is ignored for particles without positive mass.
    pub fn integrate(&mut self, dt: f32) {
        if self.mass > 0.0 {
            self.acceleration += self.force / self.mass;
        }
        self.velocity += self.acceleration * dt;

        self.force = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
    }

    /// Clamp speed to `limit`.
    pub fn limit_speed(&mut self, limit: f32) {
        self.velocity = math::limit_magnitude(self.velocity, limit);
    }

    /// Move by `velocity * dt`.
    pub fn advance(&mut self, dt: f32) {
        self.transform.translate(self.velocity * dt);
    }

    pub fn kill(&mut self) {
        self.life = -1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_particle_is_dead() {
        assert!(!Particle::default().is_alive());
    }

    #[test]
    fn test_integrate_applies_force_over_mass() {
        let mut p = Particle {
            mass: 2.0,
            force: Vec3::new(4.0, 0.0, 0.0),
            acceleration: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        p.integrate(0.5);
        assert_eq!(p.velocity, Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(p.force, Vec3::ZERO);
        assert_eq!(p.acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_integrate_massless_skips_force() {
        let mut p = Particle {
            mass: 0.0,
            force: Vec3::ONE,
            ..Default::default()
        };
        p.integrate(1.0);
        assert_eq!(p.velocity, Vec3::ZERO);
        assert!(p.velocity.is_finite());
    }

    #[test]
    fn test_normalized_life() {
        let mut p = Particle {
            life: 3.0,
            lifespan: 4.0,
            ..Default::default()
        };
        assert!((p.normalized_life() - 0.25).abs() < 1e-6);
        p.life = -1.0;
        assert_eq!(p.normalized_life(), 1.0);
        p.lifespan = 0.0;
        assert_eq!(p.normalized_life(), 0.0);
    }

    #[test]
    fn test_advance_and_limit() {
        let mut p = Particle {
            velocity: Vec3::new(0.0, 10.0, 0.0),
            ..Default::default()
        };
        p.limit_speed(2.0);
        p.advance(0.5);
        assert_eq!(p.position(), Vec3::new(0.0, 1.0, 0.0));
    }
}
