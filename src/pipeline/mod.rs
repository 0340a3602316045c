//! The labeling pipeline: scheduler, cache, classifier, and emission wired
//! together
//!
//! Control flow per text change: schedule (debounce / smart delay) -> cache
//! lookup -> on miss, classifier call -> validation + conversion -> dedup
//! through the session -> caller's callback. Cache failures fall through to
//! a fresh classification; errors surface once, and only for the request
//! that is still current.

pub mod cache;
pub mod emitter;
pub mod scheduler;

pub use cache::{CacheKey, CacheStats, LabelCache};
pub use emitter::LabelingSession;
pub use scheduler::{LabelScheduler, RequestRunner};

use crate::classifier::Classifier;
use crate::error::{LimnError, Result};
use crate::label::convert::convert_labeled_spans_with;
use crate::settings::PipelineSettings;
use crate::text::normalize::normalize_nfc;
use crate::types::{LabelOutcome, LabelRequest, ResultSource};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

struct PipelineRunner {
    cache: Arc<LabelCache>,
    classifier: Arc<dyn Classifier>,
    context_window: usize,
}

#[async_trait]
impl RequestRunner for PipelineRunner {
    async fn run(&self, request: LabelRequest, cancel: CancellationToken) -> Result<LabelOutcome> {
        let key = CacheKey::build(&request);
        if let Some(mut outcome) = self.cache.get(&key) {
            debug!(key = %key.as_str(), "labeling cache hit");
            outcome.source = ResultSource::Cache;
            return Ok(outcome);
        }

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(LimnError::Cancelled),
            response = self.classifier.label(&request) => response?,
        };

        let highlights =
            convert_labeled_spans_with(&response.spans, &request.text, self.context_window);
        let outcome = LabelOutcome {
            text: request.text,
            highlights,
            source: ResultSource::Network,
            idempotency_key: Uuid::new_v4().to_string(),
            meta: response.meta,
        };
        self.cache.put(key, outcome.clone());
        Ok(outcome)
    }
}

/// Composition root for the labeling side of the system.
///
/// One pipeline per editor instance. The result callback receives each
/// logically distinct [`LabelOutcome`] exactly once; the error callback
/// fires only for the request that is still current.
pub struct LabelingPipeline {
    scheduler: LabelScheduler,
    cache: Arc<LabelCache>,
    settings: PipelineSettings,
}

impl LabelingPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        settings: PipelineSettings,
        on_result: impl Fn(LabelOutcome) + Send + Sync + 'static,
        on_error: impl Fn(LimnError) + Send + Sync + 'static,
    ) -> Self {
        let cache = Arc::new(LabelCache::new(settings.cache_capacity));
        let session = Arc::new(Mutex::new(LabelingSession::new()));
        let runner = Arc::new(PipelineRunner {
            cache: Arc::clone(&cache),
            classifier,
            context_window: settings.context_window,
        });

        let on_result = Arc::new(on_result);
        let deduped = move |outcome: LabelOutcome| {
            let fire = session
                .lock()
                .map(|mut s| s.emit(&outcome))
                .unwrap_or(true);
            if fire {
                on_result(outcome);
            }
        };

        let scheduler = LabelScheduler::new(runner, settings.debounce.clone(), deduped, on_error);

        Self {
            scheduler,
            cache,
            settings,
        }
    }

    /// Request labels for the editor's current text.
    ///
    /// The text is NFC-normalized before labeling so classifier offsets and
    /// editor offsets agree on composed characters. Debounced unless
    /// `immediate`; a newer call always supersedes. Returns the request
    /// version for diagnostics.
    pub fn request_labels(&self, text: &str, immediate: bool) -> u64 {
        let request = LabelRequest {
            text: normalize_nfc(text),
            max_spans: self.settings.max_spans,
            min_confidence: self.settings.min_confidence,
            template_version: self.settings.template_version.clone(),
            policy: self.settings.policy.clone(),
            cache_id: self.settings.cache_id.clone(),
        };
        self.scheduler.schedule(request, immediate)
    }

    /// Cancel any pending or in-flight labeling request
    pub fn cancel_pending(&self) {
        self.scheduler.cancel_pending();
    }

    /// Labeling cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop all cached labeling results
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Settings this pipeline was built with
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }
}
