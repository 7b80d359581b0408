//! Render contract.
//!
//! The core never issues draw calls. Renderers either implement
//! [`RenderSink`] and receive one callback per particle or path sample, or
//! pull [`ParticleInstance`] records and upload them as an instance buffer.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

use crate::table::PathTable;

/// Receives drawable items from emitters.
pub trait RenderSink {
    /// A live particle with its world matrix and colour.
    fn particle(&mut self, world: &Mat4, colour: Vec4);

    /// One sample of a spatial path.
    fn path_sample(&mut self, world: &Mat4, colour: Vec4);
}

/// GPU-ready per-particle record.
///
/// Layout: 16 floats of column-major world matrix, then RGBA colour.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub world: [[f32; 4]; 4],
    pub colour: [f32; 4],
}

impl ParticleInstance {
    pub fn new(world: Mat4, colour: Vec4) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            colour: colour.to_array(),
        }
    }
}

/// Feed every sample of `path` to `sink` with a uniform colour.
pub fn render_path<S: RenderSink + ?Sized>(path: &PathTable<Vec3>, colour: Vec4, sink: &mut S) {
    for entry in path.samples() {
        sink.path_sample(&Mat4::from_translation(entry.value), colour);
    }
}

/// Sink that just records what it was given. Handy for tests and tools.
#[derive(Clone, Debug, Default)]
pub struct CollectSink {
    pub particles: Vec<(Mat4, Vec4)>,
    pub path_samples: Vec<(Mat4, Vec4)>,
}

impl RenderSink for CollectSink {
    fn particle(&mut self, world: &Mat4, colour: Vec4) {
        self.particles.push((*world, colour));
    }

    fn path_sample(&mut self, world: &Mat4, colour: Vec4) {
        self.path_samples.push((*world, colour));
    }
}
