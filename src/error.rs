//! Error types for the labeling pipeline
//!
//! Malformed classifier spans and text-tree drift are handled locally by
//! dropping the offending span; only scheduler-level failures (network,
//! classifier, serialization) surface through this enum, and only for the
//! request that is still current.

use thiserror::Error;

/// Main error type for Limn operations
#[derive(Error, Debug)]
pub enum LimnError {
    /// Classifier returned a non-success status or unusable payload
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Span failed structural validation
    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    /// Range could not be anchored onto the text tree
    #[error("Anchor error: {0}")]
    Anchor(#[from] crate::anchor::AnchorError),

    /// Cache layer failure (best-effort; callers fall through to a fresh
    /// classification)
    #[error("Cache error: {0}")]
    Cache(String),

    /// Request was superseded or cancelled before completion
    #[error("Request cancelled")]
    Cancelled,
}

/// Result type alias for Limn operations
pub type Result<T> = std::result::Result<T, LimnError>;
