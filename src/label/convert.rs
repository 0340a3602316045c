//! Raw span to highlight conversion and fragment merging
//!
//! Classifier output arrives in UTF-16 code units and may be malformed,
//! overlapping, or split across a line break. Conversion clamps offsets,
//! enriches each span with context windows and grapheme indices, then merges
//! neighbors of the same parent category separated only by whitespace.

use crate::label::validate::validate_span;
use crate::taxonomy::{self, Category};
use crate::text::units::{utf16_len, utf16_to_byte_clamped, GraphemeIndexer};
use crate::types::{Highlight, RawSpan, SpanSource};

const DEFAULT_CONTEXT_WINDOW: usize = 20;

/// Convert raw classifier spans into rendering-ready highlights.
///
/// Malformed spans are dropped, never errors. The result is sorted by
/// `(display_start, display_end)` and merged so no two highlights of the
/// same parent category are separated only by whitespace.
pub fn convert_labeled_spans(spans: &[RawSpan], text: &str) -> Vec<Highlight> {
    convert_labeled_spans_with(spans, text, DEFAULT_CONTEXT_WINDOW)
}

/// Conversion with an explicit context window size (chars per side)
pub fn convert_labeled_spans_with(
    spans: &[RawSpan],
    text: &str,
    context_window: usize,
) -> Vec<Highlight> {
    let indexer = GraphemeIndexer::new(text);
    let len16 = utf16_len(text) as i64;

    let mut highlights: Vec<Highlight> = spans
        .iter()
        .filter_map(|span| enrich_span(span, text, len16, &indexer, context_window))
        .collect();

    highlights.sort_by_key(|h| (h.display_start, h.display_end));
    merge_fragmented(highlights, text, context_window)
}

fn enrich_span(
    span: &RawSpan,
    text: &str,
    len16: i64,
    indexer: &GraphemeIndexer,
    context_window: usize,
) -> Option<Highlight> {
    let resolved = span.label().and_then(taxonomy::resolve);
    let source = if resolved.is_some() {
        SpanSource::Llm
    } else {
        SpanSource::Validator
    };
    let category = resolved.unwrap_or(Category::Subject);

    let raw_start = span.start.clamp(0, len16) as usize;
    let raw_end = span.end.clamp(0, len16) as usize;
    let display_start = utf16_to_byte_clamped(text, raw_start as i64);
    let display_end = utf16_to_byte_clamped(text, raw_end as i64);
    if display_end <= display_start {
        return None;
    }

    let quote = text[display_start..display_end].to_string();
    let id = span.id.clone().unwrap_or_else(|| {
        format!("{}:{}-{}", category.as_str(), raw_start, raw_end)
    });

    Some(Highlight {
        id,
        category,
        raw_start,
        raw_end,
        display_start,
        display_end,
        quote,
        left_ctx: window_before(text, display_start, context_window).to_string(),
        right_ctx: window_after(text, display_end, context_window).to_string(),
        start_grapheme: indexer.grapheme_index(display_start),
        end_grapheme: indexer.grapheme_index(display_end),
        source,
        validator_pass: validate_span(Some(span), Some(text)).pass,
        confidence: span.confidence,
    })
}

/// Up to `max_chars` chars of text ending at byte offset `end`
fn window_before(text: &str, end: usize, max_chars: usize) -> &str {
    let start = text[..end]
        .char_indices()
        .rev()
        .take(max_chars)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(end);
    &text[start..end]
}

/// Up to `max_chars` chars of text starting at byte offset `start`
fn window_after(text: &str, start: usize, max_chars: usize) -> &str {
    let end = text[start..]
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| start + i)
        .unwrap_or(text.len());
    &text[start..end]
}

/// Merge sorted highlights whose parent categories match and whose gap is
/// empty or whitespace-only.
///
/// Overlapping same-parent spans merge too (their gap slice is empty). The
/// merged highlight keeps the more specific dotted category, and its id
/// gains a monotonic `_m{n}` suffix so repeated merges stay unique within
/// the pass.
fn merge_fragmented(
    sorted: Vec<Highlight>,
    text: &str,
    context_window: usize,
) -> Vec<Highlight> {
    let mut merged: Vec<Highlight> = Vec::with_capacity(sorted.len());
    let mut merge_seq = 0usize;

    for next in sorted {
        let Some(current) = merged.last_mut() else {
            merged.push(next);
            continue;
        };

        let gap_is_whitespace = next.display_start <= current.display_end
            || text[current.display_end..next.display_start]
                .chars()
                .all(char::is_whitespace);

        if current.category.parent() != next.category.parent() || !gap_is_whitespace {
            merged.push(next);
            continue;
        }

        merge_seq += 1;
        current.display_end = current.display_end.max(next.display_end);
        current.raw_end = current.raw_end.max(next.raw_end);
        current.end_grapheme = current.end_grapheme.max(next.end_grapheme);
        current.quote = text[current.display_start..current.display_end].to_string();
        current.right_ctx = window_after(text, current.display_end, context_window).to_string();
        if next.category.is_specific() && !current.category.is_specific() {
            current.category = next.category;
        }
        current.validator_pass = current.validator_pass && next.validator_pass;
        current.id = format!("{}_m{}", current.id, merge_seq);
    }

    merged
}
