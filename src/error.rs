//! Error types for freakmatch.
//!
//! Only data that crosses a boundary can fail: raw descriptor bytes, trees
//! assembled by an external provider, parallel feature arrays and
//! configuration. Capacity exhaustion and degenerate geometry are not errors;
//! they degrade silently and are reported through return values.

use thiserror::Error;

/// Errors that can occur while assembling inputs for search and matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// A descriptor was built from the wrong number of bytes.
    #[error("descriptor length mismatch: expected {expected} bytes, got {actual}")]
    DescriptorLength { expected: usize, actual: usize },

    /// Descriptor and point arrays of a feature store differ in length.
    #[error("feature store mismatch: {descriptors} descriptors but {points} points")]
    StoreMismatch { descriptors: usize, points: usize },

    /// The node arena does not describe a valid clustering tree.
    #[error("malformed tree: {0}")]
    MalformedTree(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Configuration could not be decoded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for MatchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for freakmatch operations.
pub type Result<T> = std::result::Result<T, MatchError>;
