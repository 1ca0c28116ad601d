//! Error types for value construction, access, schema matching and the JSON codec.

use std::fmt;

use thiserror::Error;

/// Classification of a failure. The kind survives re-wrapping, so a nested
/// schema violation still reports `InvalidType` at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The constructor received an incompatible type, payload or default.
    InvalidState,
    /// Indexed read on a scalar, or a missing key/index.
    InvalidAccess,
    /// Indexed write on a scalar, or a path-set through a non-container.
    InvalidUpdate,
    /// Scalar type mismatch between a candidate and its schema.
    InvalidType,
    /// Container shape mismatch: unknown field or missing required field.
    InvalidObject,
    /// An argument the operation cannot work with.
    InvalidParameter,
    /// Malformed JSON text.
    ParseFailure,
    /// A payload the codec or operation does not know how to handle.
    UnsupportedType,
    /// A string that cannot be represented in the configured charset.
    Unencodable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidState => "invalid state",
            ErrorKind::InvalidAccess => "invalid access",
            ErrorKind::InvalidUpdate => "invalid update",
            ErrorKind::InvalidType => "invalid type",
            ErrorKind::InvalidObject => "invalid object",
            ErrorKind::InvalidParameter => "invalid parameter",
            ErrorKind::ParseFailure => "parse failure",
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::Unencodable => "unencodable",
        };
        f.write_str(name)
    }
}

/// An error raised by any fallible operation in valtree-core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ValueError {
    kind: ErrorKind,
    message: String,
}

impl ValueError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Re-wrap a nested error with the location it was found at.
    ///
    /// ```
    /// use valtree_core::{ErrorKind, ValueError};
    ///
    /// let err = ValueError::new(ErrorKind::InvalidType, "Value must be INTEGER but it's STRING")
    ///     .context("Item[2] is inappropriate");
    /// assert_eq!(err.kind(), ErrorKind::InvalidType);
    /// assert_eq!(err.message(), "Item[2] is inappropriate - Value must be INTEGER but it's STRING");
    /// ```
    pub fn context(self, prefix: impl fmt::Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{prefix} - {}", self.message),
        }
    }
}

impl From<serde_json::Error> for ValueError {
    fn from(err: serde_json::Error) -> Self {
        ValueError::new(ErrorKind::ParseFailure, err.to_string())
    }
}

/// Convenience alias used throughout valtree-core.
pub type Result<T> = std::result::Result<T, ValueError>;
