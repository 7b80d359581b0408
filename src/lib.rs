//! # pathfx - path-driven particle effects
//!
//! Authoring core for particle effects that follow splines.
//!
//! pathfx turns user-placed spline nodes into distance-addressable lookup
//! tables and runs CPU particle emitters that spawn, steer and retire
//! thousands of particles per tick, optionally along those paths. Drawing is
//! left to the caller through a small render contract.
//!
//! ## Quick Start
//!
//! ```ignore
//! use pathfx::prelude::*;
//!
//! let mut builder = PathBuilder::new();
//! builder.add_catmull_rom(Vec3::ZERO);
//! builder.add_catmull_rom(Vec3::new(10.0, 5.0, 0.0));
//! builder.add_catmull_rom(Vec3::new(20.0, 0.0, 0.0));
//!
//! let mut config = EmitterConfig::default();
//! config.path.mode = FollowMode::Corridor;
//!
//! let mut emitter = Emitter::new(config);
//! emitter.set_path(builder.rebuild().clone());
//!
//! for _ in 0..60 {
//!     emitter.update(1.0 / 60.0, Mat4::IDENTITY);
//! }
//! println!("{} particles alive", emitter.live_count());
//! ```
//!
//! ## Core Concepts
//!
//! ### Paths
//!
//! A [`PathBuilder`] owns an ordered list of [`Node`]s. Each node is linear,
//! Bezier or Catmull-Rom and shapes the segment that starts at it.
//! [`PathBuilder::rebuild`] subdivides every segment until it is straight
//! within the builder's tolerance and produces a [`PathTable`].
//!
//! ### Tables
//!
//! A [`PathTable`] stores samples per node-to-node interval with their
//! cumulative distance. The same type, over `f32`, is used for motion
//! graphs that shape particle size, speed and colour over their lifetime.
//!
//! ### Emitters
//!
//! An [`Emitter`] owns a particle pool and an [`EmitterConfig`]. Each tick
//! it spawns into dead slots at the configured rate, applies steering and
//! path following, integrates physics and ages particles. A
//! [`ParticleSystem`] groups emitters into one effect.
//!
//! ## Feature Overview
//!
//! | Area | Items |
//! |------|-------|
//! | Curves | [`NodeKind::Linear`], [`NodeKind::Bezier`], [`NodeKind::CatmullRom`] |
//! | Emission | [`EmissionShape::Sphere`], [`EmissionShape::Cuboid`], [`EmissionShape::Frustum`] |
//! | Steering | [`steering::seek`], [`steering::attract`], [`steering::gravitate`], [`steering::steer`], [`steering::arrive`] |
//! | Path following | [`FollowMode::Corridor`], [`FollowMode::Direct`] |
//! | Files | [`persistence`] (`PFXP`, `PFXG`, `PFXE`, `PFXS`) |
//! | Rendering | [`RenderSink`], [`ParticleInstance`] |
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configuration types and nodes.

pub mod config;
pub mod emission;
pub mod emitter;
pub mod error;
pub mod math;
pub mod particle;
pub mod persistence;
pub mod render;
pub mod spline;
pub mod steering;
pub mod system;
pub mod table;
pub mod transform;

pub use bytemuck;
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

pub use config::{ColourRange, EmitterConfig, GlobalEffects, PathFollow, Playback, SteeringConfig, ValueRange};
pub use emission::{EmissionConfig, EmissionShape};
pub use emitter::Emitter;
pub use error::PathFxError;
pub use particle::Particle;
pub use persistence::PersistenceError;
pub use render::{ParticleInstance, RenderSink};
pub use spline::{Node, NodeKind, PathBuilder, ToleranceNudge};
pub use steering::FollowMode;
pub use system::ParticleSystem;
pub use table::{PathTable, TableCursor, TableEntry, TableError, TableValue};
pub use transform::Transform;

/// Convenient re-exports for typical use.
///
/// ```ignore
/// use pathfx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{EmitterConfig, Playback, ValueRange};
    pub use crate::emission::EmissionShape;
    pub use crate::emitter::Emitter;
    pub use crate::render::{ParticleInstance, RenderSink};
    pub use crate::spline::{Node, NodeKind, PathBuilder, ToleranceNudge};
    pub use crate::steering::FollowMode;
    pub use crate::system::ParticleSystem;
    pub use crate::table::PathTable;
    pub use crate::{Mat4, Vec2, Vec3, Vec4};
}
