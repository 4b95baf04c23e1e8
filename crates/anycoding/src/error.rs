//! Error types for value-tree addressing, encoding and decoding.

use crate::path::Path;
use crate::probe::ContainerKind;
use crate::types::ValueKind;
use thiserror::Error;

/// Errors that can occur while addressing, encoding or decoding a value tree.
///
/// Every variant raised by the engines carries the coding path at the point
/// of failure, so a failed top-level call tells you which nested field broke.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The requested shape could not be extracted at `path`.
    #[error("value of type {expected} not found at coding path {path}; found {found}")]
    ValueNotFound {
        expected: &'static str,
        path: Path,
        found: ValueKind,
    },

    /// A keyed container had no entry for `key`.
    #[error("no value found for key '{key}' at coding path {path}")]
    KeyNotFound { key: String, path: Path },

    /// A container of one kind was requested but the node holds another.
    #[error("expected a {expected} at coding path {path} but found {found}")]
    ContainerKindMismatch {
        expected: ValueKind,
        found: ValueKind,
        path: Path,
    },

    /// Path traversal reached a key or index that is not present.
    #[error("path {path} does not exist: {reason}")]
    PathDoesNotExist { path: Path, reason: String },

    /// A resolved sequence index fell outside the sequence.
    #[error("index {index} out of bounds for sequence of length {len} at {path}")]
    IndexOutOfBounds {
        path: Path,
        index: isize,
        len: usize,
    },

    /// No primitive conversion rule applied.
    #[error("cannot convert {from} {value} to {to} at coding path {path}")]
    ConversionFailure {
        from: ValueKind,
        to: &'static str,
        value: String,
        path: Path,
    },

    /// The tree holds something JSON text cannot represent.
    #[error("value is not valid for JSON serialization: {0}")]
    NotValidForSerialization(String),

    /// JSON text could not be parsed or printed.
    #[error("JSON error: {0}")]
    Json(String),

    /// Raised by hand-written `Decode`/`Encode` implementations.
    #[error("{message} at coding path {path}")]
    Custom { message: String, path: Path },

    /// Sentinel returned by container creation while probing a shape.
    /// Never escapes the functions in [`crate::probe`].
    #[error("container probe stopped at a {0} container")]
    Probed(ContainerKind),
}

impl Error {
    /// Build an application-level error at `path`.
    pub fn custom(path: &Path, message: impl Into<String>) -> Self {
        Error::Custom {
            message: message.into(),
            path: path.clone(),
        }
    }

    /// The coding path carried by this error, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::ValueNotFound { path, .. }
            | Error::KeyNotFound { path, .. }
            | Error::ContainerKindMismatch { path, .. }
            | Error::PathDoesNotExist { path, .. }
            | Error::IndexOutOfBounds { path, .. }
            | Error::ConversionFailure { path, .. }
            | Error::Custom { path, .. } => Some(path),
            Error::NotValidForSerialization(_) | Error::Json(_) | Error::Probed(_) => None,
        }
    }

    /// Whether this is the probe sentinel rather than a real failure.
    pub fn is_probe(&self) -> bool {
        matches!(self, Error::Probed(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

/// Convenience alias used throughout anycoding.
pub type Result<T> = std::result::Result<T, Error>;
