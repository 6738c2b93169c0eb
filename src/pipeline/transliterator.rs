//! Katakana transliteration: engine first, generative model second

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{PipelineContext, Translator};
use crate::core::errors::{AdapterError, PipelineError};
use crate::core::models::{LanguageCode, TranslationResult, TransliterationResult};
use crate::core::script;

/// Produces katakana for text in any language; always returns a renderable result
#[derive(Clone)]
pub struct Transliterator {
    context: Arc<PipelineContext>,
    translator: Translator,
}

impl Transliterator {
    /// Transliterator using `translator` for its Japanese translation
    pub fn new(context: Arc<PipelineContext>, translator: Translator) -> Self {
        Self { context, translator }
    }

    /// Translate `text` into Japanese and render it in katakana
    ///
    /// The configured target language does not apply here; katakana is always
    /// derived from a Japanese translation.
    pub async fn transliterate(&self, text: &str, source: &LanguageCode) -> TransliterationResult {
        if source.is_japanese() {
            return TransliterationResult::no_conversion_needed();
        }

        let translation = self
            .translator
            .translate_to(text, source, &LanguageCode::japanese())
            .await;
        self.transliterate_with(text, source, &translation).await
    }

    /// Transliterate when the Japanese translation is already known
    pub async fn transliterate_with(
        &self,
        text: &str,
        source: &LanguageCode,
        translation: &TranslationResult,
    ) -> TransliterationResult {
        if source.is_japanese() {
            return TransliterationResult::no_conversion_needed();
        }

        if !translation.is_usable() {
            warn!("Skipping transliteration: {}", translation.text);
            return TransliterationResult::failed(PipelineError::NoTranslation);
        }

        match self.convert_with_engine(text, &translation.text).await {
            Ok(result) => return result,
            Err(e) => warn!("Engine conversion failed: {}, asking generative model", e),
        }

        match self.convert_with_model(text, source).await {
            Ok(katakana) => {
                info!("Katakana extracted from generative model output");
                TransliterationResult::converted(katakana, None)
            }
            Err(e) => {
                warn!("Generative transliteration failed: {}", e);
                TransliterationResult::untransliterated(&translation.text)
            }
        }
    }

    async fn convert_with_engine(&self, original: &str, translation: &str) -> Result<TransliterationResult, PipelineError> {
        let engine = self.context.engine().ensure_ready().await?;
        let primary = engine.to_katakana(translation)?;

        let romanize = if script::contains_japanese(original) {
            original
        } else {
            translation
        };
        let pronunciation_hint = match engine.to_romaji(romanize) {
            Ok(romaji) => Some(romaji),
            Err(e) => {
                debug!("No pronunciation hint: {}", e);
                None
            }
        };

        Ok(TransliterationResult::converted(primary, pronunciation_hint))
    }

    async fn convert_with_model(&self, original: &str, source: &LanguageCode) -> Result<String, PipelineError> {
        let endpoint = self.context.endpoints().transliteration();
        let payload = json!({
            "inputs": format!("以下の文をカタカナ発音に変換してください: \"{}\"", original),
            "parameters": {
                "source_lang": source.as_str(),
                "target_lang": "ja",
            },
        });

        let generated = self.context.request(&endpoint, &payload).await?.into_generated()?;

        script::extract_katakana(&generated).ok_or_else(|| {
            PipelineError::Adapter(AdapterError::InvalidResponse {
                message: format!("no katakana in {:?}", generated),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::testing::{self, FailingLoader, FakeService, MappingLoader};
    use crate::engine::EngineState;
    use std::sync::Arc;

    const PRIMARY: &str = "Helsinki-NLP/opus-mt-en-jap";
    const MULTILINGUAL: &str = "facebook/m2m100_418M";
    const GENERATOR: &str = "katakana-generator";

    fn offline() -> AdapterError {
        AdapterError::NetworkError { message: "offline".into() }
    }

    #[tokio::test]
    async fn test_japanese_source_needs_no_translator() {
        let service = Arc::new(FakeService::failing(offline()));
        let context = testing::context(service.clone(), MappingLoader::new(&[]), testing::hf_credentials());
        let transliterator = Transliterator::new(context.clone(), Translator::new(context.clone()));

        let result = transliterator.transliterate("東京", &LanguageCode::japanese()).await;

        assert_eq!(result, TransliterationResult::no_conversion_needed());
        assert_eq!(service.call_count(), 0);
        assert_eq!(context.engine().state(), EngineState::Uninitialized);
    }

    #[tokio::test]
    async fn test_engine_conversion_with_hint() {
        let service = Arc::new(
            FakeService::failing(offline()).respond(PRIMARY, Ok(json!([{ "translation_text": "こんにちは" }]))),
        );
        let loader = MappingLoader::with_romaji(&[("こんにちは", "コンニチハ")], &[("こんにちは", "konnichiha")]);
        let context = testing::context(service, loader, testing::hf_credentials());
        let transliterator = Transliterator::new(context.clone(), Translator::new(context));

        let result = transliterator.transliterate("Hello", &LanguageCode::english()).await;

        assert_eq!(result.primary, "コンニチハ");
        assert_eq!(result.pronunciation_hint.as_deref(), Some("konnichiha"));
        assert!(result.succeeded);
    }

    #[tokio::test]
    async fn test_engine_unavailable_uses_generative_model() {
        let service = Arc::new(
            FakeService::failing(offline())
                .respond(PRIMARY, Ok(json!([{ "translation_text": "こんにちは" }])))
                .respond(GENERATOR, Ok(json!([{ "generated_text": "Hello は ハロー です" }]))),
        );
        let context = testing::context(service.clone(), FailingLoader::new(), testing::hf_credentials());
        let transliterator = Transliterator::new(context.clone(), Translator::new(context.clone()));

        let result = transliterator.transliterate("Hello", &LanguageCode::english()).await;

        assert_eq!(result.primary, "ハロー");
        assert_eq!(result.pronunciation_hint, None);
        assert_eq!(context.engine().state(), EngineState::Failed);
        assert_eq!(service.calls(), vec![PRIMARY.to_string(), GENERATOR.to_string()]);
    }

    #[tokio::test]
    async fn test_no_katakana_returns_annotated_translation() {
        let service = Arc::new(
            FakeService::failing(offline())
                .respond(PRIMARY, Ok(json!([{ "translation_text": "こんにちは" }])))
                .respond(GENERATOR, Ok(json!([{ "generated_text": "hello" }]))),
        );
        let context = testing::context(service, FailingLoader::new(), testing::hf_credentials());
        let transliterator = Transliterator::new(context.clone(), Translator::new(context));

        let result = transliterator.transliterate("Hello", &LanguageCode::english()).await;

        assert!(!result.succeeded);
        assert_eq!(result.primary, "こんにちは (transliteration unavailable)");
    }

    #[tokio::test]
    async fn test_failed_translation_blocks_transliteration() {
        let service = Arc::new(FakeService::failing(AdapterError::Unauthorized {
            status: 401,
            body: String::new(),
        }));
        let context = testing::context(service.clone(), MappingLoader::new(&[]), testing::hf_credentials());
        let transliterator = Transliterator::new(context.clone(), Translator::new(context.clone()));

        let result = transliterator.transliterate("Hello", &LanguageCode::english()).await;

        assert!(!result.succeeded);
        assert_eq!(result.primary, "conversion failed: No translation available");
        // The engine is never started for a failed translation
        assert_eq!(context.engine().state(), EngineState::Uninitialized);
    }

    #[tokio::test]
    async fn test_non_japanese_target_still_renders_katakana() {
        for target in ["fr", "en"] {
            let config = AppConfig {
                target_language: target.to_string(),
                ..testing::config()
            };
            let service = Arc::new(
                FakeService::failing(offline())
                    .respond(PRIMARY, Ok(json!([{ "translation_text": "こんにちは" }])))
                    .respond(MULTILINGUAL, Ok(json!([{ "translation_text": "Bonjour" }]))),
            );
            let loader = MappingLoader::new(&[("こんにちは", "コンニチハ")]);
            let context = testing::context_with(config, service.clone(), loader, testing::hf_credentials());
            let transliterator = Transliterator::new(context.clone(), Translator::new(context));

            let result = transliterator.transliterate("Hello", &LanguageCode::english()).await;

            assert_eq!(result.primary, "コンニチハ", "target {}", target);
            assert!(result.succeeded);
            assert_eq!(service.calls(), vec![PRIMARY.to_string()]);
        }
    }
}
