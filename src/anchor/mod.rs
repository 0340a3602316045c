//! Text anchoring: mapping global offsets onto a live text tree
//!
//! Highlight offsets are computed against a flat logical string, but the
//! editor surface is a tree of text runs (DOM text nodes, editor fragments).
//! A correct highlighter must never assume a highlight lies within one run,
//! and must degrade gracefully when the tree and the offset model have
//! drifted under a concurrent edit: skip the segment, never crash the pass.
//!
//! The [`TextTree`] trait is the capability interface over that surface. A
//! browser adapter implements it against real DOM ranges; the built-in
//! [`FragmentTree`] implements it over an in-memory run list with the same
//! splitting semantics, so the mapping and wrapping logic is unit-testable
//! headlessly.

pub mod fragment;
pub mod index;
pub mod wrap;

pub use fragment::FragmentTree;
pub use index::{map_global_range, ResolvedPoint, ResolvedRange, RunEntry, TextRunIndex};
pub use wrap::{surround_range, wrap_range_segments};

use std::collections::BTreeMap;
use std::ops::Range;
use thiserror::Error;

/// Identifier for a text run within a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

/// Identifier for a highlight mark created by wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

/// A leaf text run in document order
#[derive(Debug, Clone)]
pub struct TextRun {
    pub id: RunId,
    pub text: String,
}

/// What to attach to a wrapped segment
#[derive(Debug, Clone, Default)]
pub struct MarkSpec {
    /// Stable metadata keys an integrator may depend on
    pub dataset: BTreeMap<String, String>,

    /// Category color, as a CSS-style hex string
    pub color: Option<String>,
}

/// Errors raised by a [`TextTree`] implementation.
///
/// These are expected under concurrent edits and are handled by skipping the
/// affected segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
    /// The run no longer exists (detached under a concurrent edit)
    #[error("text run {0:?} not found")]
    RunNotFound(RunId),

    /// Offsets fall outside the run
    #[error("offsets {start}..{end} out of bounds for run of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// Offset does not sit on a char boundary
    #[error("offset {0} is not a char boundary")]
    NotCharBoundary(usize),

    /// The target segment is already inside a mark
    #[error("text run {0:?} is already marked")]
    AlreadyMarked(RunId),
}

/// Capability interface over a live text tree.
///
/// Implementations own the text runs and perform the actual wrapping
/// mutation. Wrapping a segment splits its run the way a DOM
/// `surroundContents` splits text nodes; the tree's concatenated text is
/// invariant under wrapping.
pub trait TextTree {
    /// Non-empty text runs in document order
    fn runs(&self) -> Vec<TextRun>;

    /// Wrap `local` (byte offsets within the run) with a highlight mark.
    ///
    /// Splits the run; later calls see the mutated topology.
    fn wrap_segment(
        &mut self,
        run: RunId,
        local: Range<usize>,
        spec: MarkSpec,
    ) -> Result<MarkId, AnchorError>;
}
