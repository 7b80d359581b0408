//! Error types for pathfx.
//!
//! Each subsystem has its own error enum; [`PathFxError`] wraps them together
//! with I/O failures for callers that just want one type.

use thiserror::Error;

use crate::persistence::PersistenceError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum PathFxError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file was read but its contents are malformed.
    #[error("invalid file: {0}")]
    Persistence(#[from] PersistenceError),

    /// A motion graph could not be built from its keys.
    #[error("invalid curve: {0}")]
    Table(#[from] TableError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: PathFxError = PersistenceError::TruncatedData.into();
        assert_eq!(err.to_string(), "invalid file: truncated data");

        let err: PathFxError = TableError::TooFewKeys { found: 0 }.into();
        assert!(matches!(err, PathFxError::Table(_)));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(PathFxError::from(io), PathFxError::Io(_)));
    }
}
