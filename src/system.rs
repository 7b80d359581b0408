//! Ordered collections of emitters forming one visual effect.

use glam::{Mat4, Vec4};

use crate::emitter::Emitter;
use crate::render::RenderSink;

/// Emitters updated together, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    emitters: Vec<Emitter>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_emitters(emitters: Vec<Emitter>) -> Self {
        Self { emitters }
    }

    /// Append an emitter and return its index.
    pub fn add_emitter(&mut self, emitter: Emitter) -> usize {
        self.emitters.push(emitter);
        self.emitters.len() - 1
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Emitter> {
        (index < self.emitters.len()).then(|| self.emitters.remove(index))
    }

    pub fn remove_last(&mut self) -> Option<Emitter> {
        self.emitters.pop()
    }

    pub fn clear(&mut self) {
        self.emitters.clear();
    }

    pub fn emitter(&self, index: usize) -> Option<&Emitter> {
        self.emitters.get(index)
    }

    pub fn emitter_mut(&mut self, index: usize) -> Option<&mut Emitter> {
        self.emitters.get_mut(index)
    }

    pub fn last(&self) -> Option<&Emitter> {
        self.emitters.last()
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn emitters_mut(&mut self) -> &mut [Emitter] {
        &mut self.emitters
    }

    pub fn into_emitters(self) -> Vec<Emitter> {
        self.emitters
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Live particles across every emitter.
    pub fn live_count(&self) -> usize {
        self.emitters.iter().map(Emitter::live_count).sum()
    }

    /// Tick every emitter under a shared parent matrix.
    pub fn update(&mut self, dt: f32, parent: Mat4) {
        for emitter in &mut self.emitters {
            emitter.update(dt, parent);
        }
    }

    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        for emitter in &self.emitters {
            emitter.render(sink);
        }
    }

    /// Render each emitter's path in one colour.
    pub fn render_paths<S: RenderSink + ?Sized>(&self, colour: Vec4, sink: &mut S) {
        for emitter in &self.emitters {
            emitter.render_path(colour, sink);
        }
    }
}
