//! Highlight rendering onto a live text tree
//!
//! The composition root of the display side: snap spans to token
//! boundaries, sort, wrap each through the anchoring layer, skip overlaps
//! via coverage, attach category styling and metadata. A span that fails to
//! produce any wrapper (tree drift, detached root, zero width after
//! snapping) is dropped from the pass; partial results always beat a
//! crashed render.

pub mod coverage;
pub mod theme;

pub use coverage::CoverageSet;
pub use theme::CategoryTheme;

use crate::anchor::{wrap_range_segments, MarkId, MarkSpec, TextTree};
use crate::text::boundaries::snap_to_token_boundaries;
use crate::types::{Highlight, SpanSource};
use std::collections::BTreeMap;
use tracing::debug;

/// Options for one render pass
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Coverage carried over from a previous pass; pass the last report's
    /// coverage back in to make re-rendering idempotent
    pub coverage: Option<CoverageSet>,

    /// Snap highlight ranges to word boundaries (default true via
    /// [`PipelineSettings`](crate::settings::PipelineSettings))
    pub snap_to_word_boundaries: bool,

    /// Idempotency key of the outcome being rendered, stamped on every mark
    pub idempotency_key: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self {
            coverage: None,
            snap_to_word_boundaries: true,
            idempotency_key: None,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// What one render pass produced
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    /// Marks created, in processing order
    pub rendered: Vec<MarkId>,

    /// Spans skipped because their range was already covered
    pub skipped_overlap: usize,

    /// Spans that produced no wrapper (drift, degenerate after snapping)
    pub skipped_failed: usize,

    /// Final coverage, reusable for a follow-up pass
    pub coverage: CoverageSet,
}

/// Stable metadata attached to every highlight mark.
///
/// The dataset keys are integration surface; integrators key off them for
/// hover cards and span selection.
#[derive(Debug, Clone)]
pub struct MarkAttributes<'a> {
    pub highlight: &'a Highlight,
    pub display_start: usize,
    pub display_end: usize,
    pub idempotency_key: Option<&'a str>,
}

impl MarkAttributes<'_> {
    pub fn to_dataset(&self) -> BTreeMap<String, String> {
        let h = self.highlight;
        let mut dataset = BTreeMap::new();
        dataset.insert("category".to_string(), h.category.as_str().to_string());
        dataset.insert(
            "source".to_string(),
            match h.source {
                SpanSource::Llm => "llm".to_string(),
                SpanSource::Validator => "validator".to_string(),
            },
        );
        dataset.insert("spanId".to_string(), h.id.clone());
        dataset.insert("rawStart".to_string(), h.raw_start.to_string());
        dataset.insert("rawEnd".to_string(), h.raw_end.to_string());
        dataset.insert("displayStart".to_string(), self.display_start.to_string());
        dataset.insert("displayEnd".to_string(), self.display_end.to_string());
        dataset.insert("graphemeStart".to_string(), h.start_grapheme.to_string());
        dataset.insert("graphemeEnd".to_string(), h.end_grapheme.to_string());
        dataset.insert("validatorPass".to_string(), h.validator_pass.to_string());
        dataset.insert("quote".to_string(), h.quote.clone());
        dataset.insert("leftCtx".to_string(), h.left_ctx.clone());
        dataset.insert("rightCtx".to_string(), h.right_ctx.clone());
        if let Some(confidence) = h.confidence {
            dataset.insert("confidence".to_string(), confidence.to_string());
        }
        if let Some(key) = self.idempotency_key {
            dataset.insert("idempotencyKey".to_string(), key.to_string());
        }
        dataset
    }
}

/// Render highlights onto the tree.
///
/// `text` must equal the tree's concatenated text; callers re-validate
/// quotes against the display text before invoking the renderer after an
/// edit. Spans are processed in descending start order: wrapping splits
/// runs, and going right-to-left keeps the offsets of still-pending spans
/// valid. Each span wraps through a fresh run index so it sees the mutated
/// topology.
pub fn render_highlights(
    tree: &mut dyn TextTree,
    text: &str,
    highlights: &[Highlight],
    theme: &CategoryTheme,
    options: RenderOptions,
) -> RenderReport {
    let mut report = RenderReport {
        coverage: options.coverage.unwrap_or_default(),
        ..Default::default()
    };

    let mut candidates: Vec<(usize, usize, &Highlight)> = highlights
        .iter()
        .filter_map(|h| {
            if h.display_end <= h.display_start || h.display_start >= text.len() {
                return None;
            }
            let range = if options.snap_to_word_boundaries {
                snap_to_token_boundaries(text, h.display_start, h.display_end)?
            } else {
                h.display_start..h.display_end.min(text.len())
            };
            Some((range.start, range.end, h))
        })
        .collect();

    // Right-to-left so earlier wraps cannot invalidate pending offsets
    candidates.sort_by(|a, b| b.0.cmp(&a.0));

    for (start, end, highlight) in candidates {
        if report.coverage.overlaps(start, end) {
            report.skipped_overlap += 1;
            continue;
        }

        let attributes = MarkAttributes {
            highlight,
            display_start: start,
            display_end: end,
            idempotency_key: options.idempotency_key.as_deref(),
        };
        let spec = MarkSpec {
            dataset: attributes.to_dataset(),
            color: Some(theme.color_for(highlight.category.parent()).to_string()),
        };

        let marks = wrap_range_segments(tree, start, end, &spec, None);
        if marks.is_empty() {
            report.skipped_failed += 1;
            debug!(span = %highlight.id, start, end, "highlight produced no wrapper");
            continue;
        }
        report.rendered.extend(marks);
        report.coverage.add(start, end);
    }

    report
}
