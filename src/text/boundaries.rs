//! Word-boundary detection and token-boundary snapping
//!
//! Highlight ranges produced by the classifier frequently start or end
//! mid-word. Snapping widens them to the nearest token boundaries so a
//! rendered highlight never splits a word.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static WORD_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w$").expect("valid word-char regex"));

fn is_word_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    WORD_CHAR.is_match(c.encode_utf8(&mut buf))
}

/// True when `idx` (a byte offset) sits on a word boundary of `text`.
///
/// String edges are always boundaries. Interior positions are boundaries
/// unless the characters on both sides are word characters (`\w`). An offset
/// inside a multi-byte char is never a boundary.
pub fn is_word_boundary(text: &str, idx: usize) -> bool {
    if idx == 0 || idx >= text.len() {
        return true;
    }
    if !text.is_char_boundary(idx) {
        return false;
    }
    let before = text[..idx].chars().next_back();
    let after = text[idx..].chars().next();
    match (before, after) {
        (Some(b), Some(a)) => !(is_word_char(b) && is_word_char(a)),
        _ => true,
    }
}

/// Snap `[start, end)` outward to the nearest token boundaries.
///
/// Offsets are clamped into range and aligned to char boundaries first, then
/// `start` walks backward and `end` walks forward until both sit on word
/// boundaries. Returns `None` when the input or the clamped range is
/// degenerate. The result never splits a word and is never empty or
/// inverted.
pub fn snap_to_token_boundaries(text: &str, start: usize, end: usize) -> Option<Range<usize>> {
    if text.is_empty() {
        return None;
    }
    let mut start = start.min(text.len());
    let mut end = end.min(text.len());
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    if end <= start {
        return None;
    }
    while start > 0 && !is_word_boundary(text, start) {
        start -= 1;
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }
    }
    while end < text.len() && !is_word_boundary(text, end) {
        end += 1;
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
    }
    if end <= start {
        return None;
    }
    Some(start..end)
}

/// Check if two half-open ranges overlap
pub fn ranges_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_edges_are_boundaries() {
        assert!(is_word_boundary("cat", 0));
        assert!(is_word_boundary("cat", 3));
        assert!(is_word_boundary("", 0));
    }

    #[test]
    fn test_interior_word_pair_is_not_boundary() {
        // c|a|t: both sides word chars
        assert!(!is_word_boundary("cat", 1));
        assert!(!is_word_boundary("cat", 2));
        // "a cat": space creates boundaries on both sides
        assert!(is_word_boundary("a cat", 1));
        assert!(is_word_boundary("a cat", 2));
    }

    #[test]
    fn test_snap_widens_to_word_edges() {
        // "A cat runs" - span inside "cat"
        let snapped = snap_to_token_boundaries("A cat runs", 3, 4).unwrap();
        assert_eq!(snapped, 2..5);
    }

    #[test]
    fn test_snap_clamps_out_of_range() {
        let snapped = snap_to_token_boundaries("cat", 1, 99).unwrap();
        assert_eq!(snapped, 0..3);
    }

    #[test]
    fn test_snap_rejects_collapsed_range() {
        assert!(snap_to_token_boundaries("cat", 2, 2).is_none());
        assert!(snap_to_token_boundaries("cat", 3, 1).is_none());
        assert!(snap_to_token_boundaries("", 0, 1).is_none());
    }

    #[test]
    fn test_snap_aligns_multibyte_chars() {
        // "héllo" - 'é' is two bytes (offsets 1..3)
        let text = "h\u{e9}llo";
        let snapped = snap_to_token_boundaries(text, 2, 4).unwrap();
        assert_eq!(snapped, 0..text.len());
        assert!(text.is_char_boundary(snapped.start));
        assert!(text.is_char_boundary(snapped.end));
    }

    #[test]
    fn test_ranges_overlap() {
        assert!(ranges_overlap(&(0..10), &(5..15)));
        assert!(ranges_overlap(&(0..10), &(0..10)));
        assert!(!ranges_overlap(&(0..10), &(10..20)));
        assert!(!ranges_overlap(&(0..10), &(15..20)));
    }

    proptest! {
        #[test]
        fn prop_snapped_endpoints_are_boundaries(
            text in "[a-zA-Z0-9_ .,\u{e9}\u{4e16}!-]{0,40}",
            start in 0usize..48,
            end in 0usize..48,
        ) {
            if let Some(range) = snap_to_token_boundaries(&text, start, end) {
                prop_assert!(range.start < range.end);
                prop_assert!(is_word_boundary(&text, range.start));
                prop_assert!(is_word_boundary(&text, range.end));
            }
        }
    }
}
