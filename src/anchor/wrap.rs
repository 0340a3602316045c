//! Multi-run-safe range wrapping

use super::{map_global_range, MarkId, MarkSpec, TextRunIndex, TextTree};
use tracing::debug;

/// Wrap every segment of `[start, end)` with a highlight mark.
///
/// A single highlight may span multiple runs (across inline formatting
/// boundaries), so the range is wrapped run by run: find the first run
/// overlapping `start`, iterate forward computing the per-run overlap, and
/// wrap each segment independently. A failure on one segment (tree drift,
/// detached run) is logged and skipped without aborting the rest.
///
/// Pass a prebuilt `index` only when the tree has not mutated since it was
/// built; with `None` a fresh index is built from the live tree.
///
/// Returns the marks that were actually created: possibly empty, possibly
/// more than one for a single logical highlight.
pub fn wrap_range_segments(
    tree: &mut dyn TextTree,
    start: usize,
    end: usize,
    spec: &MarkSpec,
    index: Option<&TextRunIndex>,
) -> Vec<MarkId> {
    let built;
    let index = match index {
        Some(index) => index,
        None => {
            built = TextRunIndex::build(&*tree);
            &built
        }
    };

    if end == 0 || end <= start {
        return Vec::new();
    }
    let end = end.min(index.len);

    let Some(first) = index.first_overlapping(start) else {
        return Vec::new();
    };

    let mut marks = Vec::new();
    for entry in &index.entries[first..] {
        if entry.start >= end {
            break;
        }
        let seg_start = start.max(entry.start) - entry.start;
        let seg_end = end.min(entry.end) - entry.start;
        if seg_end <= seg_start {
            continue;
        }
        match tree.wrap_segment(entry.run, seg_start..seg_end, spec.clone()) {
            Ok(mark) => marks.push(mark),
            Err(err) => {
                debug!(run = ?entry.run, %err, "skipping highlight segment");
            }
        }
    }
    marks
}

/// Single-run convenience wrapper.
///
/// Wraps the range only when it resolves within one run; returns `None`
/// otherwise (including on any tree error).
pub fn surround_range(
    tree: &mut dyn TextTree,
    start: usize,
    end: usize,
    spec: MarkSpec,
) -> Option<MarkId> {
    let index = TextRunIndex::build(&*tree);
    let resolved = map_global_range(&index, start, end)?;
    if resolved.start.run != resolved.end.run {
        return None;
    }
    tree.wrap_segment(resolved.start.run, resolved.start.local..resolved.end.local, spec)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::FragmentTree;

    fn spec() -> MarkSpec {
        MarkSpec::default()
    }

    #[test]
    fn test_wrap_single_run_segment() {
        let mut tree = FragmentTree::new("A cat runs fast");
        let marks = wrap_range_segments(&mut tree, 2, 5, &spec(), None);
        assert_eq!(marks.len(), 1);
        assert_eq!(tree.mark_text(marks[0]), Some("cat"));
        assert_eq!(tree.text(), "A cat runs fast");
    }

    #[test]
    fn test_wrap_across_runs_creates_one_mark_per_segment() {
        let mut tree = FragmentTree::from_runs(&["A cat ", "runs ", "fast"]);
        // "cat runs" spans runs 0 and 1
        let marks = wrap_range_segments(&mut tree, 2, 10, &spec(), None);
        assert_eq!(marks.len(), 2);
        assert_eq!(tree.mark_text(marks[0]), Some("cat "));
        assert_eq!(tree.mark_text(marks[1]), Some("runs"));
        assert_eq!(tree.text(), "A cat runs fast");
    }

    #[test]
    fn test_wrap_degenerate_range_is_empty() {
        let mut tree = FragmentTree::new("A cat");
        assert!(wrap_range_segments(&mut tree, 3, 3, &spec(), None).is_empty());
        assert!(wrap_range_segments(&mut tree, 3, 0, &spec(), None).is_empty());
        let mut empty = FragmentTree::new("");
        assert!(wrap_range_segments(&mut empty, 0, 4, &spec(), None).is_empty());
    }

    #[test]
    fn test_wrap_clamps_past_end() {
        let mut tree = FragmentTree::new("A cat");
        let marks = wrap_range_segments(&mut tree, 2, 99, &spec(), None);
        assert_eq!(marks.len(), 1);
        assert_eq!(tree.mark_text(marks[0]), Some("cat"));
    }

    #[test]
    fn test_wrap_skips_failed_segment_and_continues() {
        let mut tree = FragmentTree::from_runs(&["abc", "def", "ghi"]);
        let index = TextRunIndex::build(&tree);
        // Wrap the middle run first so the second pass fails on it
        let pre = wrap_range_segments(&mut tree, 3, 6, &spec(), None);
        assert_eq!(pre.len(), 1);
        // Stale index still names the original middle run; wrapping it again
        // fails, but the outer segments succeed
        let marks = wrap_range_segments(&mut tree, 0, 9, &spec(), Some(&index));
        assert_eq!(marks.len(), 2);
        assert_eq!(tree.text(), "abcdefghi");
    }

    #[test]
    fn test_surround_range_single_run_only() {
        let mut tree = FragmentTree::from_runs(&["A cat ", "runs"]);
        assert!(surround_range(&mut tree, 2, 5, spec()).is_some());
        // Crosses the run boundary
        assert!(surround_range(&mut tree, 2, 8, spec()).is_none());
    }
}
