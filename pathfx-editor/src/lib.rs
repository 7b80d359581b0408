//! pathfx Editor - editing session and file tooling for pathfx effects
//!
//! This crate provides:
//! - [`EditorSession`], which owns an effect being edited: its emitters, the
//!   selected emitter and the path under construction
//! - JSON files for emitter configs and editable node sets
//! - Named presets
//! - A `pathfx-runner` binary that plays a saved effect headlessly

pub mod config;
pub mod error;
pub mod presets;
pub mod session;

pub use config::{JsonFile, NodeSet};
pub use error::EditorError;
pub use presets::{Preset, PRESETS};
pub use session::{EditorSession, GraphKind};
