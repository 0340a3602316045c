//! Limn - Span Labeling and Highlight Rendering for AI Prompt Editors
//!
//! A headless pipeline that takes raw character-offset spans produced by an
//! upstream classifier, validates and repairs them, and anchors them onto a
//! live text tree without corrupting cursor or selection state:
//! - Unicode-correct offset handling (UTF-16 code units, UTF-8 bytes,
//!   grapheme clusters)
//! - Reconciliation of malformed, overlapping, or whitespace-fragmented
//!   classifier output
//! - Debounced, cancellable scheduling with staleness detection so
//!   out-of-order responses never corrupt the UI
//! - Content-addressed caching of labeling results
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Text**: word boundaries, offset unit conversion, normalization
//! - **Anchor**: the [`TextTree`](anchor::TextTree) capability trait and
//!   multi-run-safe range wrapping
//! - **Label**: span validation, highlight conversion, context derivation
//! - **Render**: coverage tracking and the highlight render pass
//! - **Pipeline**: scheduler, cache, and result emission wired together
//!
//! # Example
//!
//! ```ignore
//! use limn::{LabelingPipeline, PipelineSettings, HttpClassifier, ClassifierConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> limn::Result<()> {
//!     let classifier = Arc::new(HttpClassifier::new(ClassifierConfig::default())?);
//!     let pipeline = LabelingPipeline::new(
//!         classifier,
//!         PipelineSettings::default(),
//!         |outcome| println!("{} highlights", outcome.highlights.len()),
//!         |err| eprintln!("labeling failed: {err}"),
//!     );
//!
//!     // Debounced; a newer edit supersedes this request.
//!     pipeline.request_labels("A cat runs fast through tall grass", false);
//!     Ok(())
//! }
//! ```

pub mod anchor;
pub mod classifier;
pub mod error;
pub mod label;
pub mod pipeline;
pub mod render;
pub mod settings;
pub mod taxonomy;
pub mod text;
pub mod types;

// Re-export commonly used types
pub use classifier::{Classifier, ClassifierConfig, HttpClassifier};
pub use error::{LimnError, Result};
pub use pipeline::{CacheKey, LabelCache, LabelScheduler, LabelingPipeline, LabelingSession};
pub use render::{render_highlights, CategoryTheme, RenderOptions, RenderReport};
pub use settings::{DebounceSettings, PipelineSettings};
pub use taxonomy::Category;
pub use types::{
    Highlight, LabelMeta, LabelOutcome, LabelRequest, LabelResponse, RawSpan, ResultSource,
    SpanSource,
};
