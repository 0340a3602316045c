//! Synthetic text tree backed by an in-memory run list
//!
//! Mirrors the splitting semantics of DOM text nodes: wrapping a segment
//! splits its run into up to three runs (before, wrapped, after), with the
//! wrapped run carrying the mark. The concatenated text is invariant under
//! wrap and unwrap, which is what keeps logical offsets meaningful while the
//! topology mutates.

use super::{AnchorError, MarkId, MarkSpec, RunId, TextRun, TextTree};
use std::ops::Range;

#[derive(Debug, Clone)]
struct Fragment {
    id: RunId,
    text: String,
    mark: Option<(MarkId, MarkSpec)>,
}

/// In-memory [`TextTree`] implementation for headless rendering and tests
#[derive(Debug, Clone, Default)]
pub struct FragmentTree {
    fragments: Vec<Fragment>,
    next_run: u64,
    next_mark: u64,
}

impl FragmentTree {
    /// Tree with a single text run
    pub fn new(text: &str) -> Self {
        Self::from_runs(&[text])
    }

    /// Tree with one run per string, in document order
    pub fn from_runs(texts: &[&str]) -> Self {
        let mut tree = Self::default();
        for text in texts {
            let id = tree.fresh_run();
            tree.fragments.push(Fragment {
                id,
                text: (*text).to_string(),
                mark: None,
            });
        }
        tree
    }

    fn fresh_run(&mut self) -> RunId {
        let id = RunId(self.next_run);
        self.next_run += 1;
        id
    }

    /// Concatenated text of all runs; invariant under wrap/unwrap
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// Number of runs currently in the tree
    pub fn run_count(&self) -> usize {
        self.fragments.len()
    }

    /// Marks in document order
    pub fn marks(&self) -> Vec<(MarkId, &MarkSpec)> {
        self.fragments
            .iter()
            .filter_map(|f| f.mark.as_ref().map(|(id, spec)| (*id, spec)))
            .collect()
    }

    /// The wrapped text of a mark, if it still exists
    pub fn mark_text(&self, mark: MarkId) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| matches!(f.mark, Some((id, _)) if id == mark))
            .map(|f| f.text.as_str())
    }

    /// Remove a mark and re-join adjacent unmarked runs.
    ///
    /// Restores the unwrapped run structure; returns false when the mark no
    /// longer exists.
    pub fn unwrap_mark(&mut self, mark: MarkId) -> bool {
        let Some(idx) = self
            .fragments
            .iter()
            .position(|f| matches!(f.mark, Some((id, _)) if id == mark))
        else {
            return false;
        };
        self.fragments[idx].mark = None;
        self.coalesce();
        true
    }

    /// Merge adjacent unmarked fragments, keeping the left fragment's id
    fn coalesce(&mut self) {
        let mut merged: Vec<Fragment> = Vec::with_capacity(self.fragments.len());
        for fragment in self.fragments.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.mark.is_none() && fragment.mark.is_none() => {
                    prev.text.push_str(&fragment.text);
                }
                _ => merged.push(fragment),
            }
        }
        self.fragments = merged;
    }
}

impl TextTree for FragmentTree {
    fn runs(&self) -> Vec<TextRun> {
        self.fragments
            .iter()
            .filter(|f| !f.text.is_empty())
            .map(|f| TextRun {
                id: f.id,
                text: f.text.clone(),
            })
            .collect()
    }

    fn wrap_segment(
        &mut self,
        run: RunId,
        local: Range<usize>,
        spec: MarkSpec,
    ) -> Result<MarkId, AnchorError> {
        let idx = self
            .fragments
            .iter()
            .position(|f| f.id == run)
            .ok_or(AnchorError::RunNotFound(run))?;

        if self.fragments[idx].mark.is_some() {
            return Err(AnchorError::AlreadyMarked(run));
        }
        let len = self.fragments[idx].text.len();
        if local.start >= local.end || local.end > len {
            return Err(AnchorError::OutOfBounds {
                start: local.start,
                end: local.end,
                len,
            });
        }
        {
            let text = &self.fragments[idx].text;
            if !text.is_char_boundary(local.start) {
                return Err(AnchorError::NotCharBoundary(local.start));
            }
            if !text.is_char_boundary(local.end) {
                return Err(AnchorError::NotCharBoundary(local.end));
            }
        }

        let original = self.fragments.remove(idx);
        let mark_id = MarkId(self.next_mark);
        self.next_mark += 1;

        let mut replacements = Vec::with_capacity(3);
        // The leading remainder keeps the original run id, like splitText
        if local.start > 0 {
            replacements.push(Fragment {
                id: original.id,
                text: original.text[..local.start].to_string(),
                mark: None,
            });
        }
        let wrapped_id = self.fresh_run();
        replacements.push(Fragment {
            id: wrapped_id,
            text: original.text[local.start..local.end].to_string(),
            mark: Some((mark_id, spec)),
        });
        if local.end < len {
            let after_id = self.fresh_run();
            replacements.push(Fragment {
                id: after_id,
                text: original.text[local.end..].to_string(),
                mark: None,
            });
        }
        self.fragments.splice(idx..idx, replacements);

        Ok(mark_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_splits_run() {
        let mut tree = FragmentTree::new("A cat runs");
        let runs = tree.runs();
        let mark = tree
            .wrap_segment(runs[0].id, 2..5, MarkSpec::default())
            .unwrap();
        assert_eq!(tree.run_count(), 3);
        assert_eq!(tree.mark_text(mark), Some("cat"));
        assert_eq!(tree.text(), "A cat runs");
    }

    #[test]
    fn test_wrap_full_run_consumes_it() {
        let mut tree = FragmentTree::new("cat");
        let runs = tree.runs();
        let mark = tree
            .wrap_segment(runs[0].id, 0..3, MarkSpec::default())
            .unwrap();
        assert_eq!(tree.run_count(), 1);
        assert_eq!(tree.mark_text(mark), Some("cat"));
        // The original id is gone; wrapping it again reports drift
        let err = tree.wrap_segment(runs[0].id, 0..3, MarkSpec::default());
        assert_eq!(err, Err(AnchorError::RunNotFound(runs[0].id)));
    }

    #[test]
    fn test_wrap_rejects_bad_offsets() {
        let mut tree = FragmentTree::new("cat");
        let runs = tree.runs();
        assert!(matches!(
            tree.wrap_segment(runs[0].id, 2..2, MarkSpec::default()),
            Err(AnchorError::OutOfBounds { .. })
        ));
        assert!(matches!(
            tree.wrap_segment(runs[0].id, 1..9, MarkSpec::default()),
            Err(AnchorError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_wrap_rejects_non_char_boundary() {
        let mut tree = FragmentTree::new("h\u{e9}llo");
        let runs = tree.runs();
        assert_eq!(
            tree.wrap_segment(runs[0].id, 0..2, MarkSpec::default()),
            Err(AnchorError::NotCharBoundary(2))
        );
    }

    #[test]
    fn test_wrap_rejects_marked_run() {
        let mut tree = FragmentTree::new("A cat runs");
        let runs = tree.runs();
        tree.wrap_segment(runs[0].id, 2..5, MarkSpec::default())
            .unwrap();
        let marked = tree
            .runs()
            .into_iter()
            .find(|r| r.text == "cat")
            .map(|r| r.id)
            .unwrap();
        assert_eq!(
            tree.wrap_segment(marked, 0..3, MarkSpec::default()),
            Err(AnchorError::AlreadyMarked(marked))
        );
    }

    #[test]
    fn test_unwrap_restores_structure() {
        let mut tree = FragmentTree::new("A cat runs");
        let before = tree.text();
        let runs = tree.runs();
        let mark = tree
            .wrap_segment(runs[0].id, 2..5, MarkSpec::default())
            .unwrap();
        assert_eq!(tree.run_count(), 3);

        assert!(tree.unwrap_mark(mark));
        assert_eq!(tree.run_count(), 1);
        assert_eq!(tree.text(), before);
        // Unwrapping a stale mark is a no-op
        assert!(!tree.unwrap_mark(mark));
    }

    #[test]
    fn test_marks_in_document_order() {
        let mut tree = FragmentTree::from_runs(&["abc", "def"]);
        let runs = tree.runs();
        let second = tree
            .wrap_segment(runs[1].id, 0..2, MarkSpec::default())
            .unwrap();
        let first = tree
            .wrap_segment(runs[0].id, 0..2, MarkSpec::default())
            .unwrap();
        let marks: Vec<MarkId> = tree.marks().into_iter().map(|(id, _)| id).collect();
        assert_eq!(marks, vec![first, second]);
    }
}
