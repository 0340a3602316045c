//! Result deduplication
//!
//! Multiple paths can deliver "the same" result: a cache hit, a network
//! success, an optimistic immediate pass. The UI must react exactly once per
//! logically distinct result, so each pipeline instance owns a one-slot memo
//! of the last emitted `(text signature, source)` pair. One session per
//! editor instance; there is no process-wide state.

use crate::types::{LabelOutcome, ResultSource};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Per-editor-instance result deduplication state
#[derive(Debug, Default)]
pub struct LabelingSession {
    last_emitted: Option<(u64, ResultSource)>,
}

impl LabelingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the outcome should be delivered; false swallows an
    /// identical repeat of the last emission.
    pub fn emit(&mut self, outcome: &LabelOutcome) -> bool {
        let key = (signature(&outcome.text), outcome.source);
        if self.last_emitted == Some(key) {
            return false;
        }
        self.last_emitted = Some(key);
        true
    }

    /// Forget the memo, e.g. when the editor resets its document
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

fn signature(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelMeta;

    fn outcome(text: &str, source: ResultSource) -> LabelOutcome {
        LabelOutcome {
            text: text.to_string(),
            highlights: vec![],
            source,
            idempotency_key: "k".to_string(),
            meta: LabelMeta::default(),
        }
    }

    #[test]
    fn test_identical_repeat_swallowed() {
        let mut session = LabelingSession::new();
        assert!(session.emit(&outcome("cat", ResultSource::Network)));
        assert!(!session.emit(&outcome("cat", ResultSource::Network)));
    }

    #[test]
    fn test_source_change_fires_again() {
        let mut session = LabelingSession::new();
        assert!(session.emit(&outcome("cat", ResultSource::Network)));
        assert!(session.emit(&outcome("cat", ResultSource::Cache)));
    }

    #[test]
    fn test_text_change_fires_again() {
        let mut session = LabelingSession::new();
        assert!(session.emit(&outcome("cat", ResultSource::Network)));
        assert!(session.emit(&outcome("dog", ResultSource::Network)));
        // Only the last emission is memoized
        assert!(session.emit(&outcome("cat", ResultSource::Network)));
    }

    #[test]
    fn test_reset_clears_memo() {
        let mut session = LabelingSession::new();
        assert!(session.emit(&outcome("cat", ResultSource::Network)));
        session.reset();
        assert!(session.emit(&outcome("cat", ResultSource::Network)));
    }
}
