//! Detection → translation → transliteration pipeline

pub mod detector;
pub mod translator;
pub mod transliterator;

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::core::adapter::{HttpAdapter, RemoteService};
use crate::core::config::AppConfig;
use crate::core::credentials::Credentials;
use crate::core::endpoints::EndpointCatalog;
use crate::core::errors::{AdapterError, ConfigError};
use crate::core::models::{Endpoint, LanguageCode, Provider, TranslationResult, TransliterationResult};
use crate::core::providers::{self, ProviderResponse};
use crate::engine::{EngineCell, EngineLoader, KanaEngineLoader};

pub use detector::LanguageDetector;
pub use translator::Translator;
pub use transliterator::Transliterator;

/// Shared state every stage works against
///
/// Owns the adapter, the credentials and the engine cell so that no stage
/// touches process-wide mutable state directly.
pub struct PipelineContext {
    adapter: Arc<dyn RemoteService>,
    credentials: Arc<Credentials>,
    engine: Arc<EngineCell>,
    endpoints: EndpointCatalog,
    target_language: LanguageCode,
}

impl PipelineContext {
    /// Context over explicit collaborators
    pub fn new(
        config: AppConfig,
        adapter: Arc<dyn RemoteService>,
        credentials: Arc<Credentials>,
        loader: Arc<dyn EngineLoader>,
    ) -> Self {
        let target_language = LanguageCode::new(&config.target_language);
        Self {
            adapter,
            credentials,
            engine: Arc::new(EngineCell::new(loader)),
            endpoints: EndpointCatalog::new(config),
            target_language,
        }
    }

    /// Wire the HTTP adapter, configured credentials and the kana engine
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let adapter = HttpAdapter::from_config(&config).map_err(|e| ConfigError::Invalid {
            message: format!("cannot build HTTP client: {}", e),
        })?;
        let credentials = Credentials::from_config(&config)?;
        let loader = KanaEngineLoader::new(config.dictionary_path.clone());

        let credential_set = match config.provider {
            Provider::HuggingFace => credentials.huggingface.is_set(),
            Provider::Google => credentials.google.is_set(),
        };
        info!(
            "Pipeline configured for provider {} (credential set: {})",
            config.provider, credential_set
        );

        Ok(Self::new(config, Arc::new(adapter), Arc::new(credentials), Arc::new(loader)))
    }

    /// Resolve the endpoint's credential, call it and decode the body
    ///
    /// A missing credential fails here without touching the network.
    pub async fn request(&self, endpoint: &Endpoint, payload: &Value) -> Result<ProviderResponse, AdapterError> {
        let credential = self.credentials.resolve(endpoint.auth)?;
        let raw = self.adapter.call(endpoint, payload, credential).await?;
        providers::decode(endpoint.kind, raw)
    }

    /// Endpoint catalogue
    pub fn endpoints(&self) -> &EndpointCatalog {
        &self.endpoints
    }

    /// Shared transliteration engine
    pub fn engine(&self) -> &EngineCell {
        &self.engine
    }

    /// Configured translation target
    pub fn target_language(&self) -> &LanguageCode {
        &self.target_language
    }
}

/// Everything produced for one submitted text
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    /// Detected or forced source language
    pub source_language: LanguageCode,
    /// Translation into the configured target
    pub translation: TranslationResult,
    /// Katakana rendering
    pub transliteration: TransliterationResult,
}

/// Runs the three stages strictly in order for each request
pub struct Pipeline {
    context: Arc<PipelineContext>,
    detector: LanguageDetector,
    translator: Translator,
    transliterator: Transliterator,
}

impl Pipeline {
    /// Pipeline whose stages share `context`
    pub fn new(context: Arc<PipelineContext>) -> Self {
        let translator = Translator::new(context.clone());
        Self {
            detector: LanguageDetector::new(context.clone()),
            transliterator: Transliterator::new(context.clone(), translator.clone()),
            translator,
            context,
        }
    }

    /// Pipeline wired from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Arc::new(PipelineContext::from_config(config)?)))
    }

    /// Detect (unless `forced_source` is given), translate, then transliterate
    ///
    /// The translation follows the configured target language. When that
    /// target is not Japanese, transliteration works from its own Japanese
    /// translation.
    pub async fn run(&self, text: &str, forced_source: Option<LanguageCode>) -> PipelineOutcome {
        let source_language = match forced_source {
            Some(source) => source,
            None => self.detector.detect(text).await,
        };

        let translation = self.translator.translate(text, &source_language).await;
        let transliteration = if self.context.target_language().is_japanese() {
            self.transliterator
                .transliterate_with(text, &source_language, &translation)
                .await
        } else {
            self.transliterator.transliterate(text, &source_language).await
        };

        PipelineOutcome {
            source_language,
            translation,
            transliteration,
        }
    }

    /// Detection stage
    pub fn detector(&self) -> &LanguageDetector {
        &self.detector
    }

    /// Translation stage
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Transliteration stage
    pub fn transliterator(&self) -> &Transliterator {
        &self.transliterator
    }

    /// Shared context
    pub fn context(&self) -> &PipelineContext {
        &self.context
    }
}
