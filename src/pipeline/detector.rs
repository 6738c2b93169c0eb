//! Language detection: remote classifier, then script heuristics, then English

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::PipelineContext;
use crate::core::errors::AdapterError;
use crate::core::models::{EndpointKind, LanguageCode};
use crate::core::script;

/// Best-effort language detector; never fails
#[derive(Clone)]
pub struct LanguageDetector {
    context: Arc<PipelineContext>,
}

impl LanguageDetector {
    /// Detector over `context`
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Language of `text`; never fails, defaults to `en`
    pub async fn detect(&self, text: &str) -> LanguageCode {
        if text.trim().is_empty() {
            return LanguageCode::english();
        }

        match self.detect_remote(text).await {
            Ok(language) => {
                info!("Detected language {} via remote classifier", language);
                return language;
            }
            Err(e) => warn!("Remote detection failed: {}, falling back to script heuristics", e),
        }

        match script::detect_by_script(text) {
            Some(language) => {
                debug!("Detected language {} from script ranges", language);
                language
            }
            None => {
                debug!("No script matched, defaulting to English");
                LanguageCode::english()
            }
        }
    }

    async fn detect_remote(&self, text: &str) -> Result<LanguageCode, AdapterError> {
        let endpoint = self.context.endpoints().detection();
        let payload = match endpoint.kind {
            EndpointKind::GoogleDetect => json!({ "q": text }),
            _ => json!({ "inputs": text }),
        };

        self.context.request(&endpoint, &payload).await?.best_detection()
    }
}
