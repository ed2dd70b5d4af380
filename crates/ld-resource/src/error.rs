//! Error types for resource construction, normalization and persistence.

use thiserror::Error;

/// Error raised by a [`Normalizer`](crate::normalize::Normalizer).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("unknown context: {name}")]
    UnknownContext { name: String },

    #[error("invalid context: {message}")]
    InvalidContext { message: String },

    #[error("invalid document: {message}")]
    InvalidDocument { message: String },
}

/// Error raised by resource operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("context {name:?} could not be resolved: {source}")]
    ContextResolution {
        name: String,
        #[source]
        source: NormalizeError,
    },

    #[error("{operation} is not implemented for this store")]
    Unimplemented { operation: &'static str },

    #[error("normalization failed: {0}")]
    Normalization(#[from] NormalizeError),

    #[error("node definition must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("identifier key {key:?} cannot be set on an existing node")]
    IdentifierKey { key: String },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        ResourceError::Serialization(err.to_string())
    }
}

/// Shorthand for results of resource operations.
pub type Result<T> = std::result::Result<T, ResourceError>;
