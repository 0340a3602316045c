//! HTTP classifier client

use super::Classifier;
use crate::error::{LimnError, Result};
use crate::types::{LabelRequest, LabelResponse};
use async_trait::async_trait;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP classifier
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Labeling endpoint URL
    pub endpoint: String,

    /// API key sent as `x-api-key`
    pub api_key: String,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: env::var("LIMN_CLASSIFIER_URL").unwrap_or_default(),
            api_key: env::var("LIMN_CLASSIFIER_API_KEY").unwrap_or_default(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Classifier backed by a JSON-over-HTTP labeling service
pub struct HttpClassifier {
    config: ClassifierConfig,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(LimnError::Classifier(
                "classifier endpoint not configured".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// Create with config from `LIMN_CLASSIFIER_URL` / `LIMN_CLASSIFIER_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(ClassifierConfig::default())
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn label(&self, request: &LabelRequest) -> Result<LabelResponse> {
        debug!(chars = request.text.chars().count(), "requesting span labels");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "classifier returned non-success status");
            return Err(LimnError::Classifier(format!(
                "classifier returned {status}"
            )));
        }

        let labeled: LabelResponse = response.json().await?;
        debug!(spans = labeled.spans.len(), "classifier response parsed");
        Ok(labeled)
    }
}
