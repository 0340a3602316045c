//! Span context derivation for follow-up API calls
//!
//! A suggestion-generation call wants the surroundings of a selected span
//! without shipping the whole document: the other labeled spans nearby, and
//! a minimal sanitized payload of everything labeled.

use crate::types::Highlight;
use serde::{Deserialize, Serialize};

/// The selected span's display-offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanWindow {
    pub start: usize,
    pub end: usize,
}

/// Where a nearby span sits relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NearbyPosition {
    #[serde(rename = "before")]
    Before,
    #[serde(rename = "after")]
    After,
}

/// A span within the proximity threshold of the target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbySpan {
    /// The nearby highlight itself
    pub highlight: Highlight,

    /// Signed gap in bytes: negative before the target, positive after
    pub distance: i64,

    /// Which side of the target the span sits on
    pub position: NearbyPosition,
}

/// Minimal span payload for follow-up calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedSpan {
    pub text: String,

    /// Parent taxonomy segment
    pub role: String,

    /// Full dotted category
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

/// Context payload composed for a follow-up API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanContext {
    pub simplified: Vec<SimplifiedSpan>,
    pub nearby: Vec<NearbySpan>,
}

/// Find spans within `threshold` bytes before or after the target window.
///
/// The target itself (any span with an identical window) is excluded.
/// Results are annotated with signed distance and position, sorted by
/// proximity ascending.
pub fn find_nearby_spans(
    target: &SpanWindow,
    all: &[Highlight],
    threshold: usize,
) -> Vec<NearbySpan> {
    let mut nearby: Vec<NearbySpan> = all
        .iter()
        .filter(|h| !(h.display_start == target.start && h.display_end == target.end))
        .filter_map(|h| {
            if h.display_end <= target.start {
                let gap = target.start - h.display_end;
                (gap <= threshold).then(|| NearbySpan {
                    highlight: h.clone(),
                    distance: -(gap as i64),
                    position: NearbyPosition::Before,
                })
            } else if h.display_start >= target.end {
                let gap = h.display_start - target.end;
                (gap <= threshold).then(|| NearbySpan {
                    highlight: h.clone(),
                    distance: gap as i64,
                    position: NearbyPosition::After,
                })
            } else {
                // Overlapping span: zero distance, sided by start offset
                Some(NearbySpan {
                    highlight: h.clone(),
                    distance: 0,
                    position: if h.display_start < target.start {
                        NearbyPosition::Before
                    } else {
                        NearbyPosition::After
                    },
                })
            }
        })
        .collect();

    nearby.sort_by_key(|n| (n.distance.abs(), n.highlight.display_start));
    nearby
}

/// Sanitize highlights into minimal span payloads, dropping empty text
pub fn build_simplified_spans(spans: &[Highlight]) -> Vec<SimplifiedSpan> {
    spans
        .iter()
        .filter(|h| !h.quote.trim().is_empty())
        .map(|h| SimplifiedSpan {
            text: h.quote.clone(),
            role: h.category.parent().to_string(),
            category: h.category.as_str().to_string(),
            confidence: h.confidence,
            start: Some(h.display_start),
            end: Some(h.display_end),
        })
        .collect()
}

/// Compose the full context payload for a selected span
pub fn prepare_span_context(
    target: &SpanWindow,
    all: &[Highlight],
    threshold: usize,
) -> SpanContext {
    SpanContext {
        simplified: build_simplified_spans(all),
        nearby: find_nearby_spans(target, all, threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::convert::convert_labeled_spans;
    use crate::types::RawSpan;

    fn highlights() -> (String, Vec<Highlight>) {
        let text = "A cat runs through tall grass at dusk".to_string();
        // Distinct parents throughout, so conversion leaves all four intact
        let spans = vec![
            raw("subject", 2, 5),             // "cat"
            raw("motion", 6, 10),             // "runs"
            raw("scene.environment", 19, 29), // "tall grass"
            raw("lighting.mood", 33, 37),     // "dusk"
        ];
        let hs = convert_labeled_spans(&spans, &text);
        (text, hs)
    }

    fn raw(category: &str, start: i64, end: i64) -> RawSpan {
        RawSpan {
            id: None,
            category: Some(category.to_string()),
            role: None,
            text: None,
            start,
            end,
            confidence: Some(0.8),
        }
    }

    #[test]
    fn test_nearby_sorted_by_proximity() {
        let (_, hs) = highlights();
        // Target the "tall grass" span
        let target = SpanWindow { start: 19, end: 29 };
        let nearby = find_nearby_spans(&target, &hs, 100);
        assert_eq!(nearby.len(), 3);
        assert_eq!(nearby[0].highlight.quote, "dusk");
        assert_eq!(nearby[0].position, NearbyPosition::After);
        assert_eq!(nearby[0].distance, 4);
        assert_eq!(nearby[1].highlight.quote, "runs");
        assert_eq!(nearby[1].position, NearbyPosition::Before);
        assert!(nearby[1].distance < 0);
    }

    #[test]
    fn test_nearby_threshold_filters() {
        let (_, hs) = highlights();
        let target = SpanWindow { start: 19, end: 29 };
        let nearby = find_nearby_spans(&target, &hs, 5);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].highlight.quote, "dusk");
    }

    #[test]
    fn test_target_itself_excluded() {
        let (_, hs) = highlights();
        let target = SpanWindow { start: 2, end: 5 };
        let nearby = find_nearby_spans(&target, &hs, 100);
        assert!(nearby.iter().all(|n| n.highlight.quote != "cat"));
    }

    #[test]
    fn test_simplified_spans_shape() {
        let (_, hs) = highlights();
        let simplified = build_simplified_spans(&hs);
        assert_eq!(simplified.len(), 4);
        let action = simplified.iter().find(|s| s.text == "runs").unwrap();
        assert_eq!(action.role, "motion");
        assert_eq!(action.category, "motion");
        let mood = simplified.iter().find(|s| s.text == "dusk").unwrap();
        assert_eq!(mood.role, "lighting");
        assert_eq!(mood.category, "lighting.mood");
    }

    #[test]
    fn test_prepare_span_context() {
        let (_, hs) = highlights();
        let target = SpanWindow { start: 2, end: 5 };
        let ctx = prepare_span_context(&target, &hs, 100);
        assert_eq!(ctx.simplified.len(), 4);
        assert_eq!(ctx.nearby.len(), 3);
    }
}
