//! Translation with a ranked fallback chain

use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::PipelineContext;
use crate::core::models::{Endpoint, EndpointKind, LanguageCode, TranslationResult};

/// Translator that never fails past its own boundary
///
/// Routes are tried in order: the provider's primary route for the language
/// pair, the multilingual model, then the unauthenticated public endpoint.
#[derive(Clone)]
pub struct Translator {
    context: Arc<PipelineContext>,
}

impl Translator {
    /// Translator over `context`
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Translate into the configured target language
    pub async fn translate(&self, text: &str, source: &LanguageCode) -> TranslationResult {
        let target = self.context.target_language().clone();
        self.translate_to(text, source, &target).await
    }

    /// Translate into `target`, trying each route in order
    pub async fn translate_to(&self, text: &str, source: &LanguageCode, target: &LanguageCode) -> TranslationResult {
        if source == target {
            debug!("Source already {}, returning input unchanged", target);
            return TranslationResult::unchanged(text, source.clone());
        }

        let mut last_error = None;

        for endpoint in self.routes(source, target) {
            let payload = Self::payload(&endpoint, text, source, target);

            match self
                .context
                .request(&endpoint, &payload)
                .await
                .and_then(|response| response.into_translation())
            {
                Ok(translation) => {
                    info!("Translated {} -> {} via {}", source, target, endpoint.name);
                    return TranslationResult {
                        text: translation,
                        source_language: source.clone(),
                        succeeded: true,
                        provider: Some(endpoint.name),
                    };
                }
                Err(e) => {
                    warn!("Translation via {} failed: {}", endpoint.name, e);
                    last_error = Some(e);
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no translation route available".to_string());
        TranslationResult::failed(source.clone(), reason)
    }

    fn routes(&self, source: &LanguageCode, target: &LanguageCode) -> Vec<Endpoint> {
        let endpoints = self.context.endpoints();
        endpoints
            .primary_translation(source, target)
            .into_iter()
            .chain([endpoints.multilingual(), endpoints.public_translation()])
            .collect()
    }

    fn payload(endpoint: &Endpoint, text: &str, source: &LanguageCode, target: &LanguageCode) -> Value {
        match endpoint.kind {
            EndpointKind::GoogleTranslate => json!({
                "q": text,
                "source": source.as_str(),
                "target": target.as_str(),
                "format": "text",
            }),
            EndpointKind::GooglePublic => json!({
                "client": "gtx",
                "sl": source.as_str(),
                "tl": target.as_str(),
                "dt": "t",
                "q": text,
            }),
            EndpointKind::HfMultilingual => json!({
                "inputs": text,
                "parameters": {
                    "src_lang": source.as_str(),
                    "tgt_lang": target.as_str(),
                },
            }),
            // Pair-specific models take the bare text
            _ => json!({ "inputs": text }),
        }
    }
}
