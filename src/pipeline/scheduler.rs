//! Debounced, cancellable request scheduling
//!
//! One logical in-flight request per scheduler. Every `schedule` supersedes
//! whatever is pending: the previous timer or request is cancelled and a
//! monotonic version is bumped. Every async continuation re-validates its
//! version against the current one before delivering, so an old, slow
//! response can never overwrite a newer edit's highlights. Stale errors are
//! discarded the same way; a cancelled request is swallowed entirely.
//!
//! State machine per instance: Idle -> Debouncing -> InFlight ->
//! (Success | Error | Superseded).

use crate::error::{LimnError, Result};
use crate::settings::DebounceSettings;
use crate::types::{LabelOutcome, LabelRequest};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// The work the scheduler dispatches once the debounce window closes.
///
/// Implementations check the cache, call the classifier, and convert the
/// response; they honor `cancel` at their own suspension points.
#[async_trait]
pub trait RequestRunner: Send + Sync {
    async fn run(&self, request: LabelRequest, cancel: CancellationToken) -> Result<LabelOutcome>;
}

struct SchedulerState {
    version: u64,
    current: Option<CancellationToken>,
}

/// Debouncing scheduler owning request identity and cancellation
pub struct LabelScheduler {
    state: Arc<Mutex<SchedulerState>>,
    runner: Arc<dyn RequestRunner>,
    on_success: Arc<dyn Fn(LabelOutcome) + Send + Sync>,
    on_error: Arc<dyn Fn(LimnError) + Send + Sync>,
    debounce: DebounceSettings,
}

impl LabelScheduler {
    pub fn new(
        runner: Arc<dyn RequestRunner>,
        debounce: DebounceSettings,
        on_success: impl Fn(LabelOutcome) + Send + Sync + 'static,
        on_error: impl Fn(LimnError) + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState {
                version: 0,
                current: None,
            })),
            runner,
            on_success: Arc::new(on_success),
            on_error: Arc::new(on_error),
            debounce,
        }
    }

    /// Schedule a labeling request, superseding any pending one.
    ///
    /// `immediate` skips the debounce delay; otherwise the delay scales with
    /// the payload's text length. Returns the request's version for
    /// diagnostics.
    pub fn schedule(&self, request: LabelRequest, immediate: bool) -> u64 {
        let (version, token) = {
            let Ok(mut state) = self.state.lock() else {
                return 0;
            };
            if let Some(previous) = state.current.take() {
                previous.cancel();
            }
            state.version += 1;
            let token = CancellationToken::new();
            state.current = Some(token.clone());
            (state.version, token)
        };

        let delay = if immediate {
            std::time::Duration::ZERO
        } else {
            self.debounce.delay_for(request.text.chars().count())
        };

        let state = Arc::clone(&self.state);
        let runner = Arc::clone(&self.runner);
        let on_success = Arc::clone(&self.on_success);
        let on_error = Arc::clone(&self.on_error);

        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = sleep(delay) => {}
                }
            }
            if token.is_cancelled() {
                return;
            }

            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = runner.run(request, token.clone()) => result,
            };

            // Staleness guard: deliver only if this request is still current
            let still_current = state
                .lock()
                .map(|s| s.version == version)
                .unwrap_or(false);
            if !still_current {
                debug!(version, "discarding stale labeling result");
                return;
            }

            match result {
                Ok(outcome) => on_success(outcome),
                Err(LimnError::Cancelled) => {}
                Err(err) => on_error(err),
            }
        });

        version
    }

    /// Cancel whatever is pending or in flight. Idempotent and always safe.
    pub fn cancel_pending(&self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(token) = state.current.take() {
                token.cancel();
            }
            state.version += 1;
        }
    }

    /// Current request version (diagnostics)
    pub fn current_version(&self) -> u64 {
        self.state.lock().map(|s| s.version).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelMeta;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowMarkerRunner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestRunner for SlowMarkerRunner {
        async fn run(
            &self,
            request: LabelRequest,
            _cancel: CancellationToken,
        ) -> Result<LabelOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.text.contains("slow") {
                sleep(Duration::from_millis(200)).await;
            }
            Ok(LabelOutcome {
                text: request.text,
                highlights: vec![],
                source: crate::types::ResultSource::Network,
                idempotency_key: "k".to_string(),
                meta: LabelMeta::default(),
            })
        }
    }

    fn request(text: &str) -> LabelRequest {
        LabelRequest {
            text: text.to_string(),
            max_spans: 24,
            min_confidence: 0.5,
            template_version: "v2".to_string(),
            policy: json!({}),
            cache_id: None,
        }
    }

    fn collecting_scheduler(
        runner: Arc<dyn RequestRunner>,
        debounce: DebounceSettings,
    ) -> (LabelScheduler, Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
        let results = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let results_sink = Arc::clone(&results);
        let errors_sink = Arc::clone(&errors);
        let scheduler = LabelScheduler::new(
            runner,
            debounce,
            move |outcome| {
                if let Ok(mut sink) = results_sink.lock() {
                    sink.push(outcome.text);
                }
            },
            move |err| {
                if let Ok(mut sink) = errors_sink.lock() {
                    sink.push(err.to_string());
                }
            },
        );
        (scheduler, results, errors)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_stale_response_never_fires() {
        let runner = Arc::new(SlowMarkerRunner {
            calls: AtomicUsize::new(0),
        });
        let (scheduler, results, errors) =
            collecting_scheduler(runner.clone(), DebounceSettings::default());

        let a = scheduler.schedule(request("slow first edit"), true);
        sleep(Duration::from_millis(30)).await;
        let b = scheduler.schedule(request("final edit"), true);
        assert!(b > a);

        // Wait past the slow request's completion
        sleep(Duration::from_millis(400)).await;

        let delivered = results.lock().unwrap().clone();
        assert_eq!(delivered, vec!["final edit".to_string()]);
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_debounce_supersedes_pending_timer() {
        let runner = Arc::new(SlowMarkerRunner {
            calls: AtomicUsize::new(0),
        });
        let debounce = DebounceSettings {
            override_ms: Some(80),
            ..Default::default()
        };
        let (scheduler, results, _) = collecting_scheduler(runner.clone(), debounce);

        scheduler.schedule(request("draft"), false);
        sleep(Duration::from_millis(20)).await;
        scheduler.schedule(request("draft two"), false);

        sleep(Duration::from_millis(300)).await;

        // The first request's timer was cancelled before dispatch
        assert_eq!(runner.calls.load(Ordering::SeqCst), 1);
        let delivered = results.lock().unwrap().clone();
        assert_eq!(delivered, vec!["draft two".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_pending_is_idempotent_and_silences() {
        let runner = Arc::new(SlowMarkerRunner {
            calls: AtomicUsize::new(0),
        });
        let (scheduler, results, errors) =
            collecting_scheduler(runner, DebounceSettings::default());

        scheduler.schedule(request("slow doomed"), true);
        sleep(Duration::from_millis(20)).await;
        scheduler.cancel_pending();
        scheduler.cancel_pending();

        sleep(Duration::from_millis(300)).await;
        assert!(results.lock().unwrap().is_empty());
        assert!(errors.lock().unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_version_monotonic() {
        let runner = Arc::new(SlowMarkerRunner {
            calls: AtomicUsize::new(0),
        });
        let (scheduler, _, _) = collecting_scheduler(runner, DebounceSettings::default());
        let v1 = scheduler.schedule(request("one"), true);
        let v2 = scheduler.schedule(request("two"), true);
        scheduler.cancel_pending();
        assert!(v2 > v1);
        assert!(scheduler.current_version() > v2);
    }
}
