//! Configuration and settings for the labeling pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Debounce behavior for scheduling classifier requests
    pub debounce: DebounceSettings,

    /// Context window size (chars each side) for highlight enrichment
    pub context_window: usize,

    /// Distance threshold (chars) for nearby-span derivation
    pub nearby_threshold: usize,

    /// Snap highlight ranges to word boundaries before rendering
    pub snap_to_word_boundaries: bool,

    /// Bounded LRU capacity for labeling results
    pub cache_capacity: usize,

    /// Maximum number of spans requested from the classifier
    pub max_spans: usize,

    /// Minimum confidence threshold sent to the classifier
    pub min_confidence: f32,

    /// Labeling template version
    pub template_version: String,

    /// Labeling policy forwarded to the classifier and folded into cache keys
    pub policy: serde_json::Value,

    /// Stable caller id scoping derived cache keys
    pub cache_id: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            debounce: DebounceSettings::default(),
            context_window: 20,
            nearby_threshold: 100,
            snap_to_word_boundaries: true,
            cache_capacity: 128,
            max_spans: 24,
            min_confidence: 0.5,
            template_version: "v2".to_string(),
            policy: serde_json::Value::Object(serde_json::Map::new()),
            cache_id: None,
        }
    }
}

/// Debounce delay tiers scaled by payload text length.
///
/// Short prompts label almost immediately; long documents wait longer so a
/// typing burst coalesces into one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceSettings {
    /// Fixed delay override in milliseconds; bypasses the tiers when set
    pub override_ms: Option<u64>,

    /// Delay for texts under 100 chars
    pub short_ms: u64,

    /// Delay for texts under 500 chars
    pub medium_ms: u64,

    /// Delay for texts under 2000 chars
    pub long_ms: u64,

    /// Delay for anything longer
    pub max_ms: u64,
}

impl Default for DebounceSettings {
    fn default() -> Self {
        Self {
            override_ms: None,
            short_ms: 50,
            medium_ms: 150,
            long_ms: 300,
            max_ms: 450,
        }
    }
}

impl DebounceSettings {
    /// Effective delay for a payload of `text_len` chars
    pub fn delay_for(&self, text_len: usize) -> Duration {
        if let Some(ms) = self.override_ms {
            return Duration::from_millis(ms);
        }
        let ms = if text_len < 100 {
            self.short_ms
        } else if text_len < 500 {
            self.medium_ms
        } else if text_len < 2000 {
            self.long_ms
        } else {
            self.max_ms
        };
        Duration::from_millis(ms)
    }
}
