//! Test doubles shared by the in-module test suites

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::adapter::RemoteService;
use crate::core::config::AppConfig;
use crate::core::credentials::Credentials;
use crate::core::errors::{AdapterError, EngineError, Result};
use crate::core::models::Endpoint;
use crate::engine::{EngineLoader, TransliterationEngine};
use crate::pipeline::PipelineContext;

/// Remote service answering from a table keyed by endpoint name
pub struct FakeService {
    responses: HashMap<String, Result<Value>>,
    fallback: Result<Value>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakeService {
    /// Every endpoint without an explicit response fails with `error`
    pub fn failing(error: AdapterError) -> Self {
        Self {
            responses: HashMap::new(),
            fallback: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(mut self, endpoint: &str, response: Result<Value>) -> Self {
        self.responses.insert(endpoint.to_string(), response);
        self
    }

    /// Endpoint names in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Payload of the first call to `endpoint`
    pub fn payload_for(&self, endpoint: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == endpoint)
            .map(|(_, payload)| payload.clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteService for FakeService {
    async fn call(&self, endpoint: &Endpoint, payload: &Value, _credential: Option<&str>) -> Result<Value> {
        self.calls.lock().unwrap().push((endpoint.name.clone(), payload.clone()));
        self.responses
            .get(&endpoint.name)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Engine that converts only the strings it was given
#[derive(Clone, Default)]
pub struct MappingEngine {
    katakana: HashMap<String, String>,
    romaji: HashMap<String, String>,
}

impl TransliterationEngine for MappingEngine {
    fn to_katakana(&self, text: &str) -> std::result::Result<String, EngineError> {
        self.katakana
            .get(text)
            .cloned()
            .ok_or_else(|| EngineError::Conversion(text.to_string()))
    }

    fn to_romaji(&self, text: &str) -> std::result::Result<String, EngineError> {
        self.romaji
            .get(text)
            .cloned()
            .ok_or_else(|| EngineError::Conversion(text.to_string()))
    }
}

/// Loader that always yields a [`MappingEngine`]
pub struct MappingLoader {
    engine: MappingEngine,
}

impl MappingLoader {
    pub fn new(katakana: &[(&str, &str)]) -> Arc<Self> {
        Self::with_romaji(katakana, &[])
    }

    pub fn with_romaji(katakana: &[(&str, &str)], romaji: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            engine: MappingEngine {
                katakana: pairs(katakana),
                romaji: pairs(romaji),
            },
        })
    }
}

fn pairs(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl EngineLoader for MappingLoader {
    async fn load(&self) -> std::result::Result<Arc<dyn TransliterationEngine>, EngineError> {
        Ok(Arc::new(self.engine.clone()))
    }
}

/// Loader whose setup always fails
pub struct FailingLoader;

impl FailingLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl EngineLoader for FailingLoader {
    async fn load(&self) -> std::result::Result<Arc<dyn TransliterationEngine>, EngineError> {
        Err(EngineError::Init("analyzer dictionary could not be loaded".to_string()))
    }
}

/// Default configuration with a transliteration model distinct from the multilingual one
pub fn config() -> AppConfig {
    AppConfig {
        transliteration_model: "katakana-generator".to_string(),
        ..Default::default()
    }
}

pub fn hf_credentials() -> Credentials {
    let credentials = Credentials::default();
    credentials.huggingface.set("hf_test_token").unwrap();
    credentials
}

pub fn context(
    service: Arc<dyn RemoteService>,
    loader: Arc<dyn EngineLoader>,
    credentials: Credentials,
) -> Arc<PipelineContext> {
    context_with(config(), service, loader, credentials)
}

pub fn context_with(
    config: AppConfig,
    service: Arc<dyn RemoteService>,
    loader: Arc<dyn EngineLoader>,
    credentials: Credentials,
) -> Arc<PipelineContext> {
    Arc::new(PipelineContext::new(config, service, Arc::new(credentials), loader))
}
