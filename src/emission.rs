//! Emission shapes.
//!
//! A shape produces a spawn position in emitter space plus a unit direction
//! for the initial velocity. The emitter scales the direction by the
//! initial speed and moves the result into world space.
//!
//! | Shape | Position | Direction |
//! |-------|----------|-----------|
//! | [`EmissionShape::Sphere`] | Uniform direction, radius in `[0, sphere_radius]` | Outward |
//! | [`EmissionShape::Cuboid`] | Uniform inside `box_size` | `+Z` |
//! | [`EmissionShape::Frustum`] | Between matching points on two rings | Spawn ring to target ring |

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Shape particles are emitted from.
///
/// The discriminants are the ids used by the binary file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EmissionShape {
    Sphere = 0,
    #[default]
    Cuboid = 1,
    Frustum = 2,
}

impl EmissionShape {
    /// Id stored in files.
    pub fn id(self) -> i32 {
        self as i32
    }

    /// Shape for a stored id.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Sphere),
            1 => Some(Self::Cuboid),
            2 => Some(Self::Frustum),
            _ => None,
        }
    }
}

/// Shape selection plus the parameters of every shape.
///
/// Parameters of inactive shapes are kept so switching shapes in an editor
/// does not lose them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EmissionConfig {
    pub shape: EmissionShape,
    /// Particles per second.
    pub rate: f32,
    /// Full extent of the cuboid.
    pub box_size: Vec3,
    pub sphere_radius: f32,
    /// Radius of the ring particles start on (`y = 0`).
    pub frustum_radius_spawn: f32,
    /// Radius of the ring particles head toward (`y = frustum_height`).
    pub frustum_radius_target: f32,
    pub frustum_height: f32,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            shape: EmissionShape::Cuboid,
            rate: 50.0,
            box_size: Vec3::splat(20.0),
            sphere_radius: 10.0,
            frustum_radius_spawn: 0.0,
            frustum_radius_target: 1.0,
            frustum_height: 2.0,
        }
    }
}

/// Sampled spawn position and unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionSample {
    pub position: Vec3,
    pub direction: Vec3,
}

impl EmissionConfig {
    /// Draw one spawn sample for the active shape.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EmissionSample {
        match self.shape {
            EmissionShape::Sphere => sample_sphere(rng, self.sphere_radius),
            EmissionShape::Cuboid => sample_cuboid(rng, self.box_size),
            EmissionShape::Frustum => sample_frustum(
                rng,
                self.frustum_radius_spawn,
                self.frustum_radius_target,
                self.frustum_height,
            ),
        }
    }
}

pub fn sample_cuboid<R: Rng + ?Sized>(rng: &mut R, size: Vec3) -> EmissionSample {
    let half = size * 0.5;
    let unit = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
    EmissionSample {
        position: -half + unit * size,
        direction: Vec3::Z,
    }
}

pub fn sample_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> EmissionSample {
    let polar = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    let azimuth = rng.gen::<f32>() * TAU;
    let (sin_p, cos_p) = polar.sin_cos();
    let (sin_a, cos_a) = azimuth.sin_cos();

    let direction = Vec3::new(sin_p * cos_a, cos_p, sin_p * sin_a);
    EmissionSample {
        position: direction * (rng.gen::<f32>() * radius),
        direction,
    }
}

pub fn sample_frustum<R: Rng + ?Sized>(
    rng: &mut R,
    radius_spawn: f32,
    radius_target: f32,
    height: f32,
) -> EmissionSample {
    let normalized_radius = rng.gen::<f32>();
    let angle = rng.gen::<f32>() * TAU;
    let (sin, cos) = angle.sin_cos();
    let ring = Vec3::new(cos, 0.0, sin) * normalized_radius;

    let spawn = ring * radius_spawn;
    let target = ring * radius_target + Vec3::new(0.0, height, 0.0);
    let delta = target - spawn;

    let length = delta.length();
    let direction = if length > 0.0 { delta / length } else { Vec3::Z };

    EmissionSample {
        position: spawn.lerp(target, rng.gen::<f32>()),
        direction,
    }
}
