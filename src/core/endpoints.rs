//! Endpoint catalogue built from configuration

use crate::core::config::AppConfig;
use crate::core::models::{Auth, Endpoint, EndpointKind, LanguageCode, Provider, RequestStyle};

/// Every remote endpoint the pipeline may call
#[derive(Debug, Clone)]
pub struct EndpointCatalog {
    config: AppConfig,
}

impl EndpointCatalog {
    /// Catalogue over `config`
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn hf_model(&self, model: &str, kind: EndpointKind) -> Endpoint {
        let base = self.config.huggingface_base_url.trim_end_matches('/');
        Endpoint::new(model, format!("{}/models/{}", base, model), kind, Auth::HuggingFaceBearer)
    }

    /// Remote language classifier for the configured provider
    pub fn detection(&self) -> Endpoint {
        match self.config.provider {
            Provider::HuggingFace => self.hf_model(&self.config.detection_model, EndpointKind::HfClassification),
            Provider::Google => Endpoint::new(
                "google-detect",
                format!("{}/detect", self.config.google_translate_url.trim_end_matches('/')),
                EndpointKind::GoogleDetect,
                Auth::GoogleApiKey,
            ),
        }
    }

    /// Primary translation route for `source` → `target`
    ///
    /// The per-language model table only covers the `→ja` direction; other
    /// targets have no dedicated primary on the Hugging Face provider.
    pub fn primary_translation(&self, source: &LanguageCode, target: &LanguageCode) -> Option<Endpoint> {
        match self.config.provider {
            Provider::HuggingFace if target.is_japanese() => Some(self.hf_model(
                self.config.translation_model_for(source.as_str()),
                EndpointKind::HfTranslation,
            )),
            Provider::HuggingFace => None,
            Provider::Google => Some(Endpoint::new(
                "google-translate",
                self.config.google_translate_url.clone(),
                EndpointKind::GoogleTranslate,
                Auth::GoogleApiKey,
            )),
        }
    }

    /// General multilingual model, first fallback
    pub fn multilingual(&self) -> Endpoint {
        self.hf_model(&self.config.multilingual_model, EndpointKind::HfMultilingual)
    }

    /// Unauthenticated public endpoint, last fallback
    pub fn public_translation(&self) -> Endpoint {
        Endpoint::new(
            "google-public",
            self.config.public_translate_url.clone(),
            EndpointKind::GooglePublic,
            Auth::None,
        )
        .with_style(RequestStyle::Query)
    }

    /// Generative model prompted for katakana output
    pub fn transliteration(&self) -> Endpoint {
        self.hf_model(&self.config.transliteration_model, EndpointKind::HfGeneration)
    }

    /// Configuration the endpoints are derived from
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
