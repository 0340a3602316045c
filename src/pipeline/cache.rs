//! Content-addressed caching of labeling results
//!
//! The key derives from everything that affects classifier output: the
//! request options, a canonical serialization of the labeling policy, and a
//! hash of the text itself. Identical inputs always produce byte-identical
//! keys, so invalidation is implicit. The LRU bound is a memory limit, not
//! a correctness mechanism.

use crate::text::normalize::canonical_json;
use crate::types::{LabelOutcome, LabelRequest};
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Stable cache key for a labeling request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the key for a request.
    ///
    /// Joins `max_spans`, `min_confidence`, `template_version`, the
    /// canonically-serialized policy, and a derived text id
    /// (`{cache_id|anon}::{sha256(text)}`).
    pub fn build(request: &LabelRequest) -> Self {
        let policy = canonical_json(&request.policy);
        let digest = Sha256::digest(request.text.as_bytes());
        let owner = request.cache_id.as_deref().unwrap_or("anon");
        Self(format!(
            "{}|{}|{}|{}|{}::{:x}",
            request.max_spans,
            request.min_confidence,
            request.template_version,
            policy,
            owner,
            digest,
        ))
    }

    /// The raw key string (diagnostics only)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Current number of entries
    pub size: usize,

    /// Maximum capacity
    pub capacity: usize,

    /// Lookup hits since creation
    pub hits: u64,

    /// Lookup misses since creation
    pub misses: u64,
}

/// Bounded LRU of labeling outcomes.
///
/// Best-effort: a poisoned lock degrades to miss behavior and the pipeline
/// falls through to a fresh classification.
pub struct LabelCache {
    inner: Mutex<LruCache<CacheKey, LabelOutcome>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LabelCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a prior outcome
    pub fn get(&self, key: &CacheKey) -> Option<LabelOutcome> {
        let outcome = self
            .inner
            .lock()
            .ok()
            .and_then(|mut cache| cache.get(key).cloned());
        match outcome {
            Some(outcome) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(outcome)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a successful outcome
    pub fn put(&self, key: CacheKey, outcome: LabelOutcome) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(key, outcome);
        }
    }

    /// Drop all entries
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (size, capacity) = self
            .inner
            .lock()
            .map(|cache| (cache.len(), cache.cap().get()))
            .unwrap_or((0, 0));
        CacheStats {
            size,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
