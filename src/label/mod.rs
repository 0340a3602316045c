//! Span validation, highlight conversion, and context derivation

pub mod context;
pub mod convert;
pub mod validate;

pub use context::{
    build_simplified_spans, find_nearby_spans, prepare_span_context, NearbyPosition, NearbySpan,
    SimplifiedSpan, SpanContext, SpanWindow,
};
pub use convert::convert_labeled_spans;
pub use validate::{validate_span, Validation, ValidationReason};
