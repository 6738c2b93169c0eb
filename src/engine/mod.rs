//! Stateful transliteration engine and its one-time initializer

pub mod cell;
pub mod kana;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::errors::EngineError;

/// Script conversion operations offered by a ready engine
pub trait TransliterationEngine: Send + Sync {
    /// Render Japanese text in katakana
    fn to_katakana(&self, text: &str) -> Result<String, EngineError>;

    /// Hepburn romanization of Japanese text
    fn to_romaji(&self, text: &str) -> Result<String, EngineError>;
}

/// Performs the expensive setup that produces an engine
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn TransliterationEngine>, EngineError>;
}

pub use cell::{EngineCell, EngineState};
pub use kana::{KanaEngine, KanaEngineLoader};
