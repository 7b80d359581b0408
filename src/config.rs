//! Emitter configuration.
//!
//! [`EmitterConfig`] is plain data mutated between ticks by editors. With the
//! `serde` feature every type here derives `Serialize`/`Deserialize`, and
//! missing fields fall back to their defaults.
//!
//! # Example
//!
//! ```ignore
//! let mut config = EmitterConfig::default();
//! config.emission.shape = EmissionShape::Frustum;
//! config.life = ValueRange::new(0.5, 1.5);
//! config.path.mode = FollowMode::Direct;
//! ```

use glam::{Vec3, Vec4};
use rand::Rng;

use crate::emission::EmissionConfig;
use crate::steering::FollowMode;

/// Closed range that spawn values are drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range holding a single value.
    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        crate::math::lerp(self.min, self.max, t)
    }

    /// Uniform draw. Reversed ranges are fine.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.lerp(rng.gen::<f32>())
    }
}

/// Pair of colours a spawn colour is blended between.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColourRange {
    pub a: Vec4,
    pub b: Vec4,
}

impl ColourRange {
    pub const fn new(a: Vec4, b: Vec4) -> Self {
        Self { a, b }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec4 {
        self.a.lerp(self.b, rng.gen::<f32>())
    }
}

/// Playback state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Playback {
    pub playing: bool,
    pub looping: bool,
    /// Seconds to wait after the duration ends before restarting a loop.
    pub loop_delay: f32,
    /// Emission time per cycle; `None` emits forever.
    pub duration: Option<f32>,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            playing: true,
            looping: true,
            loop_delay: 0.0,
            duration: None,
        }
    }
}

/// Path-following settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathFollow {
    pub mode: FollowMode,
    /// How far ahead along the path corridor steering aims.
    pub look_ahead: f32,
    /// Corridor half-width.
    pub radius: f32,
    /// Steering strength in corridor mode, speed in direct mode.
    pub power: f32,
}

impl Default for PathFollow {
    fn default() -> Self {
        Self {
            mode: FollowMode::Off,
            look_ahead: 0.1,
            radius: 0.1,
            power: 200.0,
        }
    }
}

/// Targets and strengths for the steering behaviors.
///
/// `seeking` enables seek, gravitate and attract; `steering` enables steer
/// and arrive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringConfig {
    pub seeking: bool,
    pub steering: bool,

    pub seek_point: Vec3,
    pub seek_force: f32,

    pub steer_point: Vec3,
    pub steer_force: f32,
    pub steer_max: f32,

    pub gravitate_point: Vec3,
    pub gravitate_power: f32,
    pub gravitate_max: f32,

    pub attract_point: Vec3,
    pub attract_force: f32,
    pub attract_range: f32,

    pub arrive_point: Vec3,
    pub arrive_force: f32,
    pub arrive_range: f32,
    pub arrive_max: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            seeking: false,
            steering: false,
            seek_point: Vec3::ZERO,
            seek_force: 0.0,
            steer_point: Vec3::ZERO,
            steer_force: 0.0,
            steer_max: 1.0,
            gravitate_point: Vec3::ZERO,
            gravitate_power: 0.0,
            gravitate_max: 1.0,
            attract_point: Vec3::ZERO,
            attract_force: 0.0,
            attract_range: 10.0,
            arrive_point: Vec3::ZERO,
            arrive_force: 0.0,
            arrive_range: 10.0,
            arrive_max: 1.0,
        }
    }
}

/// Constant force and acceleration applied to every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GlobalEffects {
    pub enabled: bool,
    pub force: Vec3,
    pub acceleration: Vec3,
}

impl Default for GlobalEffects {
    fn default() -> Self {
        Self {
            enabled: false,
            force: Vec3::new(0.0, 10.0, 0.0),
            acceleration: Vec3::new(0.0, 0.0, -9.8),
        }
    }
}

/// Everything an emitter needs to spawn and move particles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmitterConfig {
    /// Size of the particle pool.
    pub particle_count: usize,

    /// Emitter spin in radians per second about X, Y and Z.
    pub rotational_velocity: Vec3,
    /// Added to every spawn position before the emitter transform.
    pub emitter_offset: Vec3,
    pub emission: EmissionConfig,
    pub playback: Playback,
    /// Keep particles in emitter space and apply the emitter matrix at
    /// render time instead of baking it in at spawn.
    pub parent_transforms: bool,

    pub path: PathFollow,
    pub steering: SteeringConfig,
    pub global: GlobalEffects,

    pub initial_speed: ValueRange,

    pub limit_speed_over_lifetime: bool,
    pub speed_limit_begin: ValueRange,
    pub speed_limit_end: ValueRange,

    /// Lifespan in seconds.
    pub life: ValueRange,

    pub size_over_lifetime: bool,
    pub size_begin: ValueRange,
    pub size_end: ValueRange,
    /// Drawn with the same random value as the sizes, so heavy particles are big.
    pub mass: ValueRange,

    pub colour_over_lifetime: bool,
    pub colour_begin: ColourRange,
    pub colour_end: ColourRange,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            rotational_velocity: Vec3::ZERO,
            emitter_offset: Vec3::ZERO,
            emission: EmissionConfig::default(),
            playback: Playback::default(),
            parent_transforms: false,
            path: PathFollow::default(),
            steering: SteeringConfig::default(),
            global: GlobalEffects::default(),
            initial_speed: ValueRange::new(100.0, 500.0),
            limit_speed_over_lifetime: false,
            speed_limit_begin: ValueRange::default(),
            speed_limit_end: ValueRange::default(),
            life: ValueRange::new(1.0, 4.0),
            size_over_lifetime: true,
            size_begin: ValueRange::new(10.0, 20.0),
            size_end: ValueRange::new(2.0, 3.0),
            mass: ValueRange::new(1.0, 2.0),
            colour_over_lifetime: true,
            colour_begin: ColourRange::new(
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(1.0, 0.27, 0.0, 1.0),
            ),
            colour_end: ColourRange::new(
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(0.35, 0.35, 0.35, 1.0),
            ),
        }
    }
}
