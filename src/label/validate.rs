//! Structural span validation
//!
//! Validation is structural only: it trusts the classifier's semantic
//! judgment and checks that a span is usable at all. Failures are tagged
//! reasons, never errors; a bad span is dropped, not propagated.

use crate::taxonomy::{self, Category};
use crate::types::RawSpan;

/// Why a span failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// No span was supplied at all
    MissingSpan,
    /// The span's claimed text is empty
    EmptyText,
    /// The label resolves to nothing in the taxonomy (aliases included)
    InvalidTaxonomyId,
    /// The claimed quote does not appear in the source text
    TextNotInSource,
}

/// Outcome of validating a single span
#[derive(Debug, Clone)]
pub struct Validation {
    /// Whether the span passed all checks
    pub pass: bool,

    /// Resolved category when the label was recognized
    pub category: Option<Category>,

    /// Failure reason, if any
    pub reason: Option<ValidationReason>,
}

impl Validation {
    fn fail(reason: ValidationReason, category: Option<Category>) -> Self {
        Self {
            pass: false,
            category,
            reason: Some(reason),
        }
    }

    fn pass(category: Category) -> Self {
        Self {
            pass: true,
            category: Some(category),
            reason: None,
        }
    }
}

/// Validate one classifier span.
///
/// Checks in order: span exists, claimed text is non-empty, the label
/// resolves through the alias table into the closed taxonomy, and (when
/// `source_text` is supplied) the claimed quote actually occurs in it.
pub fn validate_span(span: Option<&RawSpan>, source_text: Option<&str>) -> Validation {
    let Some(span) = span else {
        return Validation::fail(ValidationReason::MissingSpan, None);
    };

    let quote = span.text.as_deref().unwrap_or("");
    if quote.is_empty() {
        return Validation::fail(ValidationReason::EmptyText, None);
    }

    let Some(category) = span.label().and_then(taxonomy::resolve) else {
        return Validation::fail(ValidationReason::InvalidTaxonomyId, None);
    };

    if let Some(source) = source_text {
        if !source.contains(quote) {
            return Validation::fail(ValidationReason::TextNotInSource, Some(category));
        }
    }

    Validation::pass(category)
}
