//! Response decoders, one per remote provider shape

use serde::Deserialize;
use serde_json::Value;

use crate::core::errors::{AdapterError, Result};
use crate::core::models::{EndpointKind, LanguageCode};

/// One (language, confidence) pair from a classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Detected language
    pub language: LanguageCode,
    /// Score in `0.0..=1.0`
    pub confidence: f64,
}

/// Decoded provider payload
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    /// Ranked language guesses
    Detections(Vec<Detection>),
    /// Translated text, with the provider's own source guess when it gives one
    Translation {
        text: String,
        detected_source: Option<LanguageCode>,
    },
    /// Free-form generated text
    Generated(String),
}

impl ProviderResponse {
    /// Highest-confidence label
    pub fn best_detection(self) -> Result<LanguageCode> {
        match self {
            ProviderResponse::Detections(detections) => detections
                .into_iter()
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
                .map(|d| d.language)
                .ok_or_else(|| invalid("classifier returned no labels")),
            other => Err(invalid(format!("expected detections, got {:?}", other))),
        }
    }

    /// Translated text; blank output counts as a failure
    pub fn into_translation(self) -> Result<String> {
        match self {
            ProviderResponse::Translation { text, .. } | ProviderResponse::Generated(text) => {
                if text.trim().is_empty() {
                    Err(invalid("empty translation"))
                } else {
                    Ok(text)
                }
            }
            other => Err(invalid(format!("expected translation, got {:?}", other))),
        }
    }

    /// Generated text, or `InvalidResponse` for any other shape
    pub fn into_generated(self) -> Result<String> {
        match self {
            ProviderResponse::Generated(text) | ProviderResponse::Translation { text, .. } => Ok(text),
            other => Err(invalid(format!("expected generated text, got {:?}", other))),
        }
    }
}

fn invalid(message: impl Into<String>) -> AdapterError {
    AdapterError::InvalidResponse {
        message: message.into(),
    }
}

#[derive(Deserialize)]
struct HfLabel {
    label: String,
    score: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HfClassificationBody {
    Nested(Vec<Vec<HfLabel>>),
    Flat(Vec<HfLabel>),
}

#[derive(Deserialize)]
struct HfTextItem {
    #[serde(alias = "generated_text")]
    translation_text: String,
}

#[derive(Deserialize)]
struct GoogleEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct GoogleDetectData {
    detections: Vec<Vec<GoogleDetection>>,
}

#[derive(Deserialize)]
struct GoogleDetection {
    language: String,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Deserialize)]
struct GoogleTranslateData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
    #[serde(default)]
    detected_source_language: Option<String>,
}

fn parse<T: for<'de> Deserialize<'de>>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| invalid(format!("{}: {}", what, e)))
}

fn first_text(items: Vec<HfTextItem>, what: &str) -> Result<String> {
    items
        .into_iter()
        .next()
        .map(|item| item.translation_text)
        .ok_or_else(|| invalid(format!("{}: empty result list", what)))
}

/// Decode a raw JSON body according to the endpoint's shape
pub fn decode(kind: EndpointKind, value: Value) -> Result<ProviderResponse> {
    // Hugging Face reports model errors as `{ "error": "..." }`
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(invalid(message.to_string()));
    }

    match kind {
        EndpointKind::HfClassification => {
            let labels = match parse::<HfClassificationBody>(value, "classification")? {
                HfClassificationBody::Nested(rows) => rows.into_iter().flatten().collect::<Vec<_>>(),
                HfClassificationBody::Flat(labels) => labels,
            };
            Ok(ProviderResponse::Detections(
                labels
                    .into_iter()
                    .map(|l| Detection {
                        language: LanguageCode::new(l.label),
                        confidence: l.score,
                    })
                    .collect(),
            ))
        }
        EndpointKind::HfTranslation | EndpointKind::HfMultilingual => Ok(ProviderResponse::Translation {
            text: first_text(parse(value, "translation")?, "translation")?,
            detected_source: None,
        }),
        EndpointKind::HfGeneration => Ok(ProviderResponse::Generated(first_text(
            parse(value, "generation")?,
            "generation",
        )?)),
        EndpointKind::GoogleDetect => {
            let envelope: GoogleEnvelope<GoogleDetectData> = parse(value, "google detect")?;
            Ok(ProviderResponse::Detections(
                envelope
                    .data
                    .detections
                    .into_iter()
                    .flatten()
                    .map(|d| Detection {
                        language: LanguageCode::new(d.language),
                        confidence: d.confidence.unwrap_or(1.0),
                    })
                    .collect(),
            ))
        }
        EndpointKind::GoogleTranslate => {
            let envelope: GoogleEnvelope<GoogleTranslateData> = parse(value, "google translate")?;
            let first = envelope
                .data
                .translations
                .into_iter()
                .next()
                .ok_or_else(|| invalid("google translate: no translations"))?;
            Ok(ProviderResponse::Translation {
                text: first.translated_text,
                detected_source: first.detected_source_language.map(LanguageCode::new),
            })
        }
        EndpointKind::GooglePublic => decode_public(&value),
    }
}

/// `[[["訳文","原文",...],...],null,"en",...]`
fn decode_public(value: &Value) -> Result<ProviderResponse> {
    let segments = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("public translate: missing segment list"))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    let detected_source = value.get(2).and_then(Value::as_str).map(LanguageCode::new);

    Ok(ProviderResponse::Translation { text, detected_source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hf_classification_nested_picks_highest() {
        let body = json!([[
            { "label": "fr", "score": 0.12 },
            { "label": "en", "score": 0.85 },
            { "label": "de", "score": 0.03 }
        ]]);
        let lang = decode(EndpointKind::HfClassification, body).unwrap().best_detection().unwrap();
        assert_eq!(lang.as_str(), "en");
    }

    #[test]
    fn test_hf_classification_flat() {
        let body = json!([{ "label": "JA", "score": 0.4 }, { "label": "zh", "score": 0.6 }]);
        let lang = decode(EndpointKind::HfClassification, body).unwrap().best_detection().unwrap();
        assert_eq!(lang.as_str(), "zh");
    }

    #[test]
    fn test_hf_error_body_is_invalid_response() {
        let body = json!({ "error": "Model papluca/x is currently loading" });
        let err = decode(EndpointKind::HfClassification, body).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidResponse { ref message } if message.contains("loading")));
    }

    #[test]
    fn test_hf_translation_and_generation() {
        let text = decode(EndpointKind::HfTranslation, json!([{ "translation_text": "こんにちは" }]))
            .unwrap()
            .into_translation()
            .unwrap();
        assert_eq!(text, "こんにちは");

        let generated = decode(EndpointKind::HfGeneration, json!([{ "generated_text": "ハロー です" }]))
            .unwrap()
            .into_generated()
            .unwrap();
        assert_eq!(generated, "ハロー です");
    }

    #[test]
    fn test_empty_translation_rejected() {
        let response = decode(EndpointKind::HfTranslation, json!([{ "translation_text": " " }])).unwrap();
        assert!(response.into_translation().is_err());
        assert!(decode(EndpointKind::HfTranslation, json!([])).is_err());
    }

    #[test]
    fn test_google_shapes() {
        let detect = json!({ "data": { "detections": [[{ "language": "ko", "confidence": 0.98, "isReliable": false }]] } });
        let lang = decode(EndpointKind::GoogleDetect, detect).unwrap().best_detection().unwrap();
        assert_eq!(lang.as_str(), "ko");

        let translate = json!({ "data": { "translations": [{ "translatedText": "こんにちは", "detectedSourceLanguage": "en" }] } });
        match decode(EndpointKind::GoogleTranslate, translate).unwrap() {
            ProviderResponse::Translation { text, detected_source } => {
                assert_eq!(text, "こんにちは");
                assert_eq!(detected_source, Some(LanguageCode::english()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_public_endpoint_joins_segments() {
        let body = json!([[["こんにちは。", "Hello.", null, null, 10], ["世界", "world", null, null, 3]], null, "en"]);
        match decode(EndpointKind::GooglePublic, body).unwrap() {
            ProviderResponse::Translation { text, detected_source } => {
                assert_eq!(text, "こんにちは。世界");
                assert_eq!(detected_source.unwrap().as_str(), "en");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_kind_mismatch_is_invalid() {
        let response = decode(EndpointKind::HfTranslation, json!([{ "translation_text": "x" }])).unwrap();
        assert!(response.best_detection().is_err());
    }
}
