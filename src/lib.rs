//! Kana translator - language detection, Japanese translation and katakana transliteration
//!
//! Every stage is a fallback chain over remote services (Hugging Face Inference
//! API, Google Translate) that degrades gracefully instead of failing. The
//! crate also ships an HTTP proxy exposing the pipeline and a CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod engine;
pub mod pipeline;
pub mod server;

#[cfg(test)]
mod testing;

// Re-export key types for convenience
pub use crate::core::{
    adapter::{HttpAdapter, RemoteService},
    config::AppConfig,
    credentials::Credentials,
    errors::{AdapterError, ConfigError, EngineError, PipelineError},
    models::{LanguageCode, Provider, TranslationResult, TransliterationResult},
};

pub use engine::{EngineCell, EngineState, KanaEngine};
pub use pipeline::{LanguageDetector, Pipeline, PipelineContext, PipelineOutcome, Translator, Transliterator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
