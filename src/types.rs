//! Core data structures for the labeling pipeline

use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};

/// Raw span as returned by the upstream classifier.
///
/// `start` and `end` are UTF-16 code-unit offsets into the source text at
/// labeling time; they are signed because classifier output is untrusted and
/// clamped during conversion. The label arrives either as a dotted taxonomy
/// `category` or a legacy `role` name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSpan {
    /// Classifier-assigned id, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Dotted taxonomy identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Legacy capitalized role name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Claimed quote text for this span
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// UTF-16 code-unit start offset
    pub start: i64,

    /// UTF-16 code-unit end offset (exclusive)
    pub end: i64,

    /// Classifier confidence (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl RawSpan {
    /// The effective label: `category` if present, else `role`
    pub fn label(&self) -> Option<&str> {
        self.category.as_deref().or(self.role.as_deref())
    }
}

/// Who produced a highlight's category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanSource {
    /// Category came directly from the classifier
    #[serde(rename = "llm")]
    Llm,
    /// Category was assigned by the validator fallback
    #[serde(rename = "validator")]
    Validator,
}

/// Rendering-ready highlight derived from a [`RawSpan`].
///
/// Raw offsets stay in the classifier's UTF-16 units; display offsets are
/// UTF-8 byte offsets valid against the currently rendered text, which may
/// differ from the text at labeling time if edits occurred since.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
    /// Stable id (classifier-supplied or deterministically derived)
    pub id: String,

    /// Resolved taxonomy category
    pub category: Category,

    /// Raw UTF-16 start offset, clamped
    pub raw_start: usize,

    /// Raw UTF-16 end offset, clamped
    pub raw_end: usize,

    /// Byte offset into the rendered text
    pub display_start: usize,

    /// Byte offset into the rendered text (exclusive)
    pub display_end: usize,

    /// The highlighted text itself
    pub quote: String,

    /// Up to 20 chars of context before the span
    pub left_ctx: String,

    /// Up to 20 chars of context after the span
    pub right_ctx: String,

    /// Grapheme-cluster index of the start boundary
    pub start_grapheme: usize,

    /// Grapheme-cluster index of the end boundary
    pub end_grapheme: usize,

    /// Where the category assignment came from
    pub source: SpanSource,

    /// Whether the span passed structural validation
    pub validator_pass: bool,

    /// Classifier confidence, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Request payload for the classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRequest {
    /// Source text to label
    pub text: String,

    /// Maximum number of spans to return
    pub max_spans: usize,

    /// Minimum confidence threshold
    pub min_confidence: f32,

    /// Labeling template version
    pub template_version: String,

    /// Labeling policy (opaque to this crate; serialized canonically for
    /// cache keys)
    pub policy: serde_json::Value,

    /// Stable caller id used to scope derived cache keys
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_id: Option<String>,
}

/// Response metadata reported by the classifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelMeta {
    /// Model identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Classifier-side latency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Response payload from the classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelResponse {
    /// Labeled spans (possibly malformed; validated during conversion)
    pub spans: Vec<RawSpan>,

    /// Response metadata
    #[serde(default)]
    pub meta: LabelMeta,
}

/// Which path produced a labeling result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultSource {
    /// Served from the labeling cache
    Cache,
    /// Fresh classifier round-trip
    Network,
    /// Optimistic immediate pass
    Immediate,
}

/// A deduplicated labeling result delivered to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelOutcome {
    /// The text these highlights were computed against
    pub text: String,

    /// Converted, merged highlights sorted by `(start, end)`
    pub highlights: Vec<Highlight>,

    /// Which path produced this result
    pub source: ResultSource,

    /// Unique key for downstream idempotent handling
    pub idempotency_key: String,

    /// Classifier metadata
    #[serde(default)]
    pub meta: LabelMeta,
}
