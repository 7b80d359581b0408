//! JSON files.
//!
//! Emitter configs and node sets are stored as pretty-printed JSON so they
//! can be diffed and hand-edited. Missing fields fall back to their
//! defaults, so older files keep loading as fields are added.
//!
//! ```ignore
//! use pathfx_editor::JsonFile;
//!
//! let config = EmitterConfig::default();
//! config.save("fire.json")?;
//! let loaded = EmitterConfig::load("fire.json")?;
//! ```

use std::fs;
use std::path::Path;

use pathfx::emitter::MAX_PARTICLES;
use pathfx::spline::{Node, PathBuilder};
use pathfx::EmitterConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Save and load a value as a JSON file.
///
/// Loaded values pass through [`validate`](JsonFile::validate) before they
/// are returned.
pub trait JsonFile: Serialize + DeserializeOwned {
    /// Reject values that parse but cannot be used.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("saved {}", path.as_ref().display());
        Ok(())
    }

    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let value: Self = serde_json::from_str(&json)?;
        value.validate()?;
        log::info!("loaded {}", path.as_ref().display());
        Ok(value)
    }
}

impl JsonFile for EmitterConfig {
    fn validate(&self) -> Result<()> {
        if self.particle_count > MAX_PARTICLES {
            return Err(EditorError::PoolTooLarge {
                count: self.particle_count,
                max: MAX_PARTICLES,
            });
        }
        Ok(())
    }
}

fn default_tolerance() -> f32 {
    pathfx::spline::builder::DEFAULT_TOLERANCE
}

/// The editable form of a path: its nodes and build tolerance.
///
/// Path files only hold the built table, so this is what an editor keeps to
/// reopen a path for editing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeSet {
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Default for NodeSet {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            nodes: Vec::new(),
        }
    }
}

impl NodeSet {
    pub fn from_builder(builder: &PathBuilder) -> Self {
        Self {
            tolerance: builder.tolerance(),
            nodes: builder.nodes().to_vec(),
        }
    }

    /// A builder holding these nodes. The table is not built yet.
    pub fn into_builder(self) -> PathBuilder {
        let mut builder = PathBuilder::from_nodes(self.nodes);
        builder.set_tolerance(self.tolerance);
        builder
    }
}

impl JsonFile for NodeSet {}
