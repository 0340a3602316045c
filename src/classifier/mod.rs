//! Classifier contract
//!
//! The labeling model is a black box behind this trait: request in, spans
//! out. Any transport that can deliver that shape and cooperate with
//! cancellation suffices; the crate ships an HTTP implementation.

pub mod http;

pub use http::{ClassifierConfig, HttpClassifier};

use crate::error::Result;
use crate::types::{LabelRequest, LabelResponse};
use async_trait::async_trait;

/// Black-box span classifier
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Label the request's text, returning raw (possibly malformed) spans
    async fn label(&self, request: &LabelRequest) -> Result<LabelResponse>;
}
