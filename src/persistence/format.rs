//! File format constants.

pub const PATH_MAGIC: [u8; 4] = *b"PFXP";
pub const GRAPH_MAGIC: [u8; 4] = *b"PFXG";
pub const EMITTER_MAGIC: [u8; 4] = *b"PFXE";
pub const SYSTEM_MAGIC: [u8; 4] = *b"PFXS";

pub const FORMAT_VERSION: u8 = 1;

/// 4 magic + 1 version.
pub const HEADER_SIZE: usize = 5;

/// Largest particle pool a file may request.
pub const MAX_PARTICLES: i32 = crate::emitter::MAX_PARTICLES as i32;

/// Relative disagreement between stored and recomputed table length that
/// is reported as a warning.
pub const LENGTH_WARN_TOLERANCE: f32 = 1e-3;
