//! Editor errors.

use pathfx::PathFxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Core(#[from] PathFxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("particle pool of {count} exceeds the limit of {max}")]
    PoolTooLarge { count: usize, max: usize },

    #[error("no emitter selected")]
    NoEmitterSelected,

    #[error("emitter {index} out of range ({len} emitters)")]
    EmitterOutOfRange { index: usize, len: usize },

    #[error("node {index} out of range ({len} nodes)")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("node {0} is not a Bezier node")]
    NotBezier(usize),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
