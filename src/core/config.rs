//! Configuration management

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::errors::ConfigError;
use crate::core::models::Provider;

/// Configuration for the translation pipeline and the proxy server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote provider for detection and primary translation
    pub provider: Provider,
    /// Language the translator produces
    pub target_language: String,
    /// Hugging Face Inference API token
    pub huggingface_api_key: Option<String>,
    /// Google Cloud Translation API key
    pub google_api_key: Option<String>,
    /// Base URL of the Hugging Face Inference API
    pub huggingface_base_url: String,
    /// Google Translation v2 URL
    pub google_translate_url: String,
    /// Unauthenticated translate endpoint
    pub public_translate_url: String,
    /// Language identification model
    pub detection_model: String,
    /// Many-to-many fallback translation model
    pub multilingual_model: String,
    /// Generative model prompted for katakana
    pub transliteration_model: String,
    /// Source language → `<source>→ja` model id
    pub translation_models: BTreeMap<String, String>,
    /// Model used for sources missing from `translation_models`
    pub default_translation_model: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Optional JSON/YAML map of surface form → kana reading for the kana engine
    pub dictionary_path: Option<PathBuf>,
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Default `<source>→ja` models
const DEFAULT_TRANSLATION_MODELS: &[(&str, &str)] = &[
    ("en", "Helsinki-NLP/opus-mt-en-jap"),
    ("fr", "Helsinki-NLP/opus-mt-fr-jap"),
    ("de", "Helsinki-NLP/opus-mt-de-jap"),
    ("zh", "Helsinki-NLP/opus-mt-zh-jap"),
    ("ko", "Helsinki-NLP/opus-mt-ko-jap"),
];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: Provider::HuggingFace,
            target_language: "ja".to_string(),
            huggingface_api_key: None,
            google_api_key: None,
            huggingface_base_url: "https://api-inference.huggingface.co".to_string(),
            google_translate_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
            public_translate_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            detection_model: "papluca/xlm-roberta-base-language-detection".to_string(),
            multilingual_model: "facebook/m2m100_418M".to_string(),
            transliteration_model: "facebook/m2m100_418M".to_string(),
            translation_models: DEFAULT_TRANSLATION_MODELS
                .iter()
                .map(|(lang, model)| (lang.to_string(), model.to_string()))
                .collect(),
            default_translation_model: "Helsinki-NLP/opus-mt-en-jap".to_string(),
            timeout_ms: 30000,
            dictionary_path: None,
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Read an env var, treating empty values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load from `KANA_CONFIG` if set, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env_var("KANA_CONFIG") {
            Some(path) => {
                info!("Loading configuration from {}", path);
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(provider) = env_var("TRANSLATION_PROVIDER") {
            self.provider = provider
                .parse()
                .map_err(|message| ConfigError::Invalid { message })?;
        }
        if let Some(target) = env_var("TARGET_LANGUAGE") {
            self.target_language = target;
        }
        if let Some(key) = env_var("HUGGINGFACE_API_KEY") {
            self.huggingface_api_key = Some(key);
        }
        if let Some(key) = env_var("GOOGLE_TRANSLATE_API_KEY") {
            self.google_api_key = Some(key);
        }
        if let Some(url) = env_var("HUGGINGFACE_BASE_URL") {
            self.huggingface_base_url = url;
        }
        if let Some(url) = env_var("GOOGLE_TRANSLATE_URL") {
            self.google_translate_url = url;
        }
        if let Some(url) = env_var("PUBLIC_TRANSLATE_URL") {
            self.public_translate_url = url;
        }
        if let Some(timeout) = env_var("REQUEST_TIMEOUT_MS") {
            self.timeout_ms = timeout.parse().map_err(|_| ConfigError::Invalid {
                message: format!("REQUEST_TIMEOUT_MS is not a number: {}", timeout),
            })?;
        }
        if let Some(path) = env_var("KANA_DICTIONARY_PATH") {
            self.dictionary_path = Some(PathBuf::from(path));
        }
        if let Some(port) = env_var("PORT") {
            self.port = port.parse().map_err(|_| ConfigError::Invalid {
                message: format!("PORT is not a valid port: {}", port),
            })?;
        }
        Ok(())
    }

    /// Load from a JSON or YAML file, picked by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "target_language is required".to_string(),
            });
        }

        for (name, url) in [
            ("huggingface_base_url", &self.huggingface_base_url),
            ("google_translate_url", &self.google_translate_url),
            ("public_translate_url", &self.public_translate_url),
        ] {
            if url.is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("{} is required", name),
                });
            }
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "timeout_ms must be greater than 0".to_string(),
            });
        }

        match self.provider {
            Provider::HuggingFace if self.huggingface_api_key.is_none() => {
                warn!("No Hugging Face token configured; only unauthenticated routes will work");
            }
            Provider::Google if self.google_api_key.is_none() => {
                warn!("No Google API key configured; only unauthenticated routes will work");
            }
            _ => {}
        }

        Ok(())
    }

    /// `<source>→ja` model for a source language, or the default model
    pub fn translation_model_for(&self, source: &str) -> &str {
        self.translation_models
            .get(source)
            .map(String::as_str)
            .unwrap_or(&self.default_translation_model)
    }
}
