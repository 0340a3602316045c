//! Offset unit conversion between UTF-16 code units, UTF-8 bytes, and
//! grapheme clusters
//!
//! The classifier reports span offsets in UTF-16 code units (it was trained
//! against JavaScript string indices). Rust strings index by UTF-8 bytes,
//! and cursor math wants grapheme clusters. Conversion happens exactly once,
//! at the classifier boundary.

use unicode_segmentation::UnicodeSegmentation;

/// Length of `text` in UTF-16 code units
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 code-unit offset to a byte offset, clamping into
/// `[0, text.len()]`.
///
/// An offset landing inside a surrogate pair rounds forward to the next
/// char start.
pub fn utf16_to_byte_clamped(text: &str, idx16: i64) -> usize {
    if idx16 <= 0 {
        return 0;
    }
    let target = idx16 as usize;
    let mut pos16 = 0;
    for (byte_pos, c) in text.char_indices() {
        if pos16 >= target {
            return byte_pos;
        }
        pos16 += c.len_utf16();
    }
    text.len()
}

/// Convert a byte offset to a UTF-16 code-unit offset.
///
/// Offsets beyond the end (or inside a multi-byte char) round forward.
pub fn byte_to_utf16(text: &str, byte_idx: usize) -> usize {
    let mut pos16 = 0;
    for (byte_pos, c) in text.char_indices() {
        if byte_pos >= byte_idx {
            return pos16;
        }
        pos16 += c.len_utf16();
    }
    pos16
}

/// Maps byte offsets to grapheme-cluster indices for one text.
///
/// Built once per conversion pass; lookups are binary searches over the
/// grapheme start table.
#[derive(Debug, Clone)]
pub struct GraphemeIndexer {
    starts: Vec<usize>,
    text_len: usize,
}

impl GraphemeIndexer {
    pub fn new(text: &str) -> Self {
        Self {
            starts: text.grapheme_indices(true).map(|(i, _)| i).collect(),
            text_len: text.len(),
        }
    }

    /// Number of grapheme clusters in the text
    pub fn grapheme_count(&self) -> usize {
        self.starts.len()
    }

    /// Grapheme index for a byte offset.
    ///
    /// A byte at a cluster start maps to that cluster's index; a byte inside
    /// a cluster rounds down to the containing cluster; the end-of-text
    /// offset maps to the cluster count.
    pub fn grapheme_index(&self, byte_idx: usize) -> usize {
        if byte_idx >= self.text_len {
            return self.starts.len();
        }
        self.starts
            .partition_point(|&s| s <= byte_idx)
            .saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_len_ascii_and_astral() {
        assert_eq!(utf16_len("cat"), 3);
        // Astral emoji is one char, two UTF-16 units, four bytes
        assert_eq!(utf16_len("\u{1F431}"), 2);
        assert_eq!(utf16_len("a\u{1F431}b"), 4);
    }

    #[test]
    fn test_utf16_to_byte_ascii() {
        assert_eq!(utf16_to_byte_clamped("A cat", 2), 2);
        assert_eq!(utf16_to_byte_clamped("A cat", 0), 0);
    }

    #[test]
    fn test_utf16_to_byte_clamps() {
        assert_eq!(utf16_to_byte_clamped("cat", -5), 0);
        assert_eq!(utf16_to_byte_clamped("cat", 99), 3);
    }

    #[test]
    fn test_utf16_to_byte_across_astral() {
        let text = "a\u{1F431}b"; // bytes: a=0, cat-face=1..5, b=5
        assert_eq!(utf16_to_byte_clamped(text, 1), 1);
        assert_eq!(utf16_to_byte_clamped(text, 3), 5);
        assert_eq!(utf16_to_byte_clamped(text, 4), 6);
        // Mid-surrogate rounds forward to the next char start
        assert_eq!(utf16_to_byte_clamped(text, 2), 5);
    }

    #[test]
    fn test_byte_to_utf16_roundtrip() {
        let text = "a\u{1F431}b";
        assert_eq!(byte_to_utf16(text, 0), 0);
        assert_eq!(byte_to_utf16(text, 1), 1);
        assert_eq!(byte_to_utf16(text, 5), 3);
        assert_eq!(byte_to_utf16(text, 6), 4);
    }

    #[test]
    fn test_grapheme_indexer_combining_mark() {
        // "e" + combining acute is a single grapheme cluster
        let text = "xe\u{0301}y";
        let indexer = GraphemeIndexer::new(text);
        assert_eq!(indexer.grapheme_count(), 3);
        assert_eq!(indexer.grapheme_index(0), 0);
        assert_eq!(indexer.grapheme_index(1), 1);
        // Inside the cluster rounds down
        assert_eq!(indexer.grapheme_index(2), 1);
        assert_eq!(indexer.grapheme_index(3), 2);
        assert_eq!(indexer.grapheme_index(text.len()), 3);
    }
}
