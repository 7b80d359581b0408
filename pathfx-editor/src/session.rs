//! The editing session.
//!
//! [`EditorSession`] owns everything an editor front end mutates: the
//! effect's emitters, which emitter is selected, and the path currently
//! being drawn. Front ends call these methods between ticks and never touch
//! global state.
//!
//! File loads decode completely before anything is installed, so a bad file
//! leaves the session exactly as it was.
//!
//! ```ignore
//! let mut session = EditorSession::new();
//! session.add_preset_emitter("fire")?;
//! session.add_catmull_rom_node(Vec3::ZERO);
//! session.add_catmull_rom_node(Vec3::new(50.0, 20.0, 0.0));
//! session.rebuild_path();
//! session.apply_path()?;
//! ```

use std::path::Path;

use glam::{Mat4, Vec3, Vec4};
use pathfx::persistence;
use pathfx::render::RenderSink;
use pathfx::spline::{Node, NodeKind, PathBuilder, ToleranceNudge};
use pathfx::{Emitter, EmitterConfig, ParticleSystem, PathTable};

use crate::config::{JsonFile, NodeSet};
use crate::error::{EditorError, Result};
use crate::presets::Preset;

/// Which motion graph of an emitter to replace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphKind {
    Size,
    Speed,
    Colour,
}

pub struct EditorSession {
    system: ParticleSystem,
    selected: Option<usize>,
    builder: PathBuilder,
    /// Colour path samples are drawn with.
    pub path_colour: Vec4,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            system: ParticleSystem::new(),
            selected: None,
            builder: PathBuilder::new(),
            path_colour: Vec4::new(1.0, 1.0, 0.0, 1.0),
        }
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem {
        &mut self.system
    }

    // ========================================================================
    // Emitters
    // ========================================================================

    /// Add an emitter with the default config and select it.
    pub fn add_emitter(&mut self) -> usize {
        self.add_emitter_with(EmitterConfig::default())
    }

    /// Add an emitter and select it.
    pub fn add_emitter_with(&mut self, config: EmitterConfig) -> usize {
        let index = self.system.add_emitter(Emitter::new(config));
        self.selected = Some(index);
        index
    }

    /// Add an emitter configured from a named preset and select it.
    pub fn add_preset_emitter(&mut self, name: &str) -> Result<usize> {
        let preset = find_preset(name)?;
        Ok(self.add_emitter_with((preset.config)()))
    }

    /// Remove the emitter at `index`. The selection stays on the same
    /// emitter when it survives, and moves to the new last one otherwise.
    pub fn remove_emitter(&mut self, index: usize) -> Result<Emitter> {
        let len = self.system.len();
        let emitter = self
            .system
            .remove_at(index)
            .ok_or(EditorError::EmitterOutOfRange { index, len })?;
        self.selected = match self.selected {
            Some(s) if s > index => Some(s - 1),
            Some(s) if s == index => self.system.len().checked_sub(1),
            other => other,
        };
        Ok(emitter)
    }

    pub fn remove_last_emitter(&mut self) -> Option<Emitter> {
        let last = self.system.len().checked_sub(1)?;
        self.remove_emitter(last).ok()
    }

    pub fn clear_emitters(&mut self) {
        self.system.clear();
        self.selected = None;
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        let len = self.system.len();
        if index >= len {
            return Err(EditorError::EmitterOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Result<&Emitter> {
        self.selected
            .and_then(|i| self.system.emitter(i))
            .ok_or(EditorError::NoEmitterSelected)
    }

    pub fn current_mut(&mut self) -> Result<&mut Emitter> {
        self.selected
            .and_then(|i| self.system.emitter_mut(i))
            .ok_or(EditorError::NoEmitterSelected)
    }

    // ========================================================================
    // Configuration of the selected emitter
    // ========================================================================

    pub fn config(&self) -> Result<&EmitterConfig> {
        Ok(self.current()?.config())
    }

    pub fn set_config(&mut self, config: EmitterConfig) -> Result<()> {
        self.current_mut()?.set_config(config);
        Ok(())
    }

    /// Resize the selected emitter's pool. All of its particles are lost.
    pub fn set_particle_count(&mut self, count: usize) -> Result<()> {
        self.current_mut()?.set_particle_count(count);
        Ok(())
    }

    pub fn set_life_range(&mut self, min: f32, max: f32) -> Result<()> {
        self.current_mut()?.set_life_range(min, max);
        Ok(())
    }

    pub fn set_size_range_begin(&mut self, min: f32, max: f32) -> Result<()> {
        self.current_mut()?.set_size_range_begin(min, max);
        Ok(())
    }

    pub fn set_size_range_end(&mut self, min: f32, max: f32) -> Result<()> {
        self.current_mut()?.set_size_range_end(min, max);
        Ok(())
    }

    /// Replace the selected emitter's config with a named preset.
    pub fn apply_preset(&mut self, name: &str) -> Result<()> {
        let preset = find_preset(name)?;
        self.set_config((preset.config)())
    }

    // ========================================================================
    // Path nodes
    // ========================================================================

    pub fn builder(&self) -> &PathBuilder {
        &self.builder
    }

    pub fn nodes(&self) -> &[Node] {
        self.builder.nodes()
    }

    pub fn add_linear_node(&mut self, position: Vec3) -> usize {
        self.builder.add_linear(position)
    }

    pub fn add_bezier_node(&mut self, position: Vec3, rear: Vec3, front: Vec3) -> usize {
        self.builder.add_bezier(position, rear, front)
    }

    pub fn add_catmull_rom_node(&mut self, position: Vec3) -> usize {
        self.builder.add_catmull_rom(position)
    }

    /// Insert a node before `index`; `index == len` appends.
    pub fn insert_node(&mut self, index: usize, node: Node) -> Result<usize> {
        let len = self.builder.len();
        if index > len {
            return Err(EditorError::NodeOutOfRange { index, len });
        }
        Ok(self.builder.insert(index, node))
    }

    pub fn remove_node(&mut self, index: usize) -> Result<Node> {
        let len = self.builder.len();
        self.builder
            .remove(index)
            .ok_or(EditorError::NodeOutOfRange { index, len })
    }

    pub fn pop_node(&mut self) -> Option<Node> {
        self.builder.pop()
    }

    pub fn clear_nodes(&mut self) {
        self.builder.clear();
    }

    pub fn move_node(&mut self, index: usize, position: Vec3) -> Result<()> {
        let len = self.builder.len();
        if self.builder.set_position(index, position) {
            Ok(())
        } else {
            Err(EditorError::NodeOutOfRange { index, len })
        }
    }

    /// Set both handles of a Bezier node.
    pub fn set_bezier_handles(&mut self, index: usize, rear: Vec3, front: Vec3) -> Result<()> {
        let node = self.node_mut(index)?;
        match &mut node.kind {
            NodeKind::Bezier { rear: r, front: f } => {
                *r = rear;
                *f = front;
                Ok(())
            }
            _ => Err(EditorError::NotBezier(index)),
        }
    }

    pub fn rename_node(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.node_mut(index)?.name = name.into();
        Ok(())
    }

    fn node_mut(&mut self, index: usize) -> Result<&mut Node> {
        let len = self.builder.len();
        self.builder
            .node_mut(index)
            .ok_or(EditorError::NodeOutOfRange { index, len })
    }

    // ========================================================================
    // Tables
    // ========================================================================

    pub fn rebuild_path(&mut self) -> &PathTable<Vec3> {
        self.builder.rebuild()
    }

    pub fn rebuild_path_with(&mut self, tolerance: f32) -> &PathTable<Vec3> {
        self.builder.rebuild_with(tolerance)
    }

    /// Step the tolerance and rebuild. Returns the new tolerance.
    pub fn nudge_tolerance(&mut self, nudge: ToleranceNudge) -> f32 {
        let tolerance = self.builder.nudge_tolerance(nudge);
        self.builder.rebuild();
        tolerance
    }

    /// Give the selected emitter a copy of the last built path.
    pub fn apply_path(&mut self) -> Result<()> {
        let path = self.builder.table().clone();
        self.current_mut()?.set_path(path);
        Ok(())
    }

    pub fn set_graph(&mut self, kind: GraphKind, graph: PathTable<f32>) -> Result<()> {
        let emitter = self.current_mut()?;
        match kind {
            GraphKind::Size => emitter.set_size_graph(graph),
            GraphKind::Speed => emitter.set_speed_graph(graph),
            GraphKind::Colour => emitter.set_colour_graph(graph),
        }
        Ok(())
    }

    /// Load a motion-graph file into the selected emitter.
    pub fn load_graph(&mut self, kind: GraphKind, file: impl AsRef<Path>) -> Result<()> {
        self.current()?;
        let graph = persistence::load_graph(file)?;
        self.set_graph(kind, graph)
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Load a path file into the selected emitter.
    pub fn open_path(&mut self, file: impl AsRef<Path>) -> Result<()> {
        self.current()?;
        let path = persistence::load_path(file)?;
        self.current_mut()?.set_path(path);
        Ok(())
    }

    /// Save the last built path.
    pub fn save_path(&self, file: impl AsRef<Path>) -> Result<()> {
        persistence::save_path(file, self.builder.table())?;
        Ok(())
    }

    /// Load an emitter file as a new emitter and select it.
    pub fn open_emitter(&mut self, file: impl AsRef<Path>) -> Result<usize> {
        let emitter = persistence::load_emitter(file)?;
        let index = self.system.add_emitter(emitter);
        self.selected = Some(index);
        Ok(index)
    }

    pub fn save_emitter(&self, file: impl AsRef<Path>) -> Result<()> {
        persistence::save_emitter(file, self.current()?)?;
        Ok(())
    }

    /// Replace every emitter with the contents of a system file. The first
    /// emitter is selected.
    pub fn open_system(&mut self, file: impl AsRef<Path>) -> Result<()> {
        let system = persistence::load_system(file)?;
        self.selected = if system.is_empty() { None } else { Some(0) };
        self.system = system;
        Ok(())
    }

    pub fn save_system(&self, file: impl AsRef<Path>) -> Result<()> {
        persistence::save_system(file, &self.system)?;
        Ok(())
    }

    /// Replace the selected emitter's config with one read from JSON.
    pub fn import_config(&mut self, file: impl AsRef<Path>) -> Result<()> {
        self.current()?;
        let config = EmitterConfig::load(file)?;
        self.set_config(config)
    }

    pub fn export_config(&self, file: impl AsRef<Path>) -> Result<()> {
        self.config()?.save(file)
    }

    /// Replace the nodes being edited with a saved node set and rebuild.
    pub fn open_nodes(&mut self, file: impl AsRef<Path>) -> Result<()> {
        let mut builder = NodeSet::load(file)?.into_builder();
        builder.rebuild();
        self.builder = builder;
        Ok(())
    }

    pub fn save_nodes(&self, file: impl AsRef<Path>) -> Result<()> {
        NodeSet::from_builder(&self.builder).save(file)
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub fn update(&mut self, dt: f32) {
        self.system.update(dt, Mat4::IDENTITY);
    }

    /// Restart every emitter from an empty pool.
    pub fn restart(&mut self) {
        for emitter in self.system.emitters_mut() {
            emitter.restart();
        }
    }

    /// Draw every particle, then every emitter's path.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        self.system.render(sink);
        self.system.render_paths(self.path_colour, sink);
    }
}

fn find_preset(name: &str) -> Result<&'static Preset> {
    Preset::find(name).ok_or_else(|| EditorError::UnknownPreset(name.to_string()))
}
