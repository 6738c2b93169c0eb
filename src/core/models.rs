//! Core data models for detection, translation and transliteration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of the placeholder text returned when every translation route fails
pub const TRANSLATION_ERROR_MARKER: &str = "[translation error]";

/// Short language identifier such as `en` or `ja`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Normalise a code: lowercase, trimmed, with Japanese aliases folded into `ja`
    pub fn new(code: impl AsRef<str>) -> Self {
        let code = code.as_ref().trim().to_lowercase();
        match code.as_str() {
            "japanese" | "jp" | "jpn" => Self("ja".to_string()),
            _ => Self(code),
        }
    }

    /// English, the default when nothing else is known
    pub fn english() -> Self {
        Self("en".to_string())
    }

    /// Japanese, the base language of the katakana script
    pub fn japanese() -> Self {
        Self("ja".to_string())
    }

    /// Lowercase code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ja`
    pub fn is_japanese(&self) -> bool {
        self.0 == "ja"
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Which remote stack backs detection and the primary translation route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Hugging Face Inference API models
    #[default]
    HuggingFace,
    /// Google Translate v2 REST API
    Google,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::HuggingFace => write!(f, "huggingface"),
            Provider::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Provider::HuggingFace),
            "google" => Ok(Provider::Google),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Response shape of a remote endpoint, used to pick the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    /// HF text-classification: `[[{label, score}]]` or `[{label, score}]`
    HfClassification,
    /// HF translation: `[{translation_text}]`
    HfTranslation,
    /// HF many-to-many translation taking `src_lang`/`tgt_lang`; same response as `HfTranslation`
    HfMultilingual,
    /// HF text generation: `[{generated_text}]`
    HfGeneration,
    /// Google v2 detect: `{data:{detections:[[{language, confidence}]]}}`
    GoogleDetect,
    /// Google v2 translate: `{data:{translations:[{translatedText}]}}`
    GoogleTranslate,
    /// Public `translate_a/single` endpoint: nested arrays
    GooglePublic,
}

/// How the credential is attached to the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <token>` with the Hugging Face token
    HuggingFaceBearer,
    /// `?key=<key>` with the Google API key
    GoogleApiKey,
    /// Unauthenticated
    None,
}

/// How the payload is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStyle {
    /// POST with the payload as JSON body
    JsonBody,
    /// GET with the payload object flattened into query parameters
    Query,
}

/// One remote endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Short name used in logs and results (model id or service name)
    pub name: String,
    /// Full request URL
    pub url: String,
    /// Response shape
    pub kind: EndpointKind,
    /// Credential kind
    pub auth: Auth,
    /// Where the payload goes
    pub style: RequestStyle,
}

impl Endpoint {
    /// JSON-body endpoint
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: EndpointKind, auth: Auth) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind,
            auth,
            style: RequestStyle::JsonBody,
        }
    }

    /// Override the request style
    pub fn with_style(mut self, style: RequestStyle) -> Self {
        self.style = style;
        self
    }
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Translated text, or the error marker
    pub text: String,
    /// Language of the input
    pub source_language: LanguageCode,
    /// Whether a route produced the text
    pub succeeded: bool,
    /// Endpoint that produced the text; `None` for short-circuits and failures
    pub provider: Option<String>,
}

impl TranslationResult {
    /// Input returned unchanged because it is already in the target language
    pub fn unchanged(text: impl Into<String>, source_language: LanguageCode) -> Self {
        Self {
            text: text.into(),
            source_language,
            succeeded: true,
            provider: None,
        }
    }

    /// Error-marked placeholder after every route failed
    pub fn failed(source_language: LanguageCode, reason: impl fmt::Display) -> Self {
        Self {
            text: format!("{} {}", TRANSLATION_ERROR_MARKER, reason),
            source_language,
            succeeded: false,
            provider: None,
        }
    }

    /// True when the result can feed downstream stages
    pub fn is_usable(&self) -> bool {
        self.succeeded && !self.text.trim().is_empty() && !self.text.starts_with(TRANSLATION_ERROR_MARKER)
    }
}

/// Transliteration result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransliterationResult {
    /// Katakana, or a renderable failure message
    pub primary: String,
    /// Romaji reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
    /// Whether `primary` holds katakana
    pub succeeded: bool,
}

impl TransliterationResult {
    /// Marker text for Japanese input
    pub const NO_CONVERSION_NEEDED: &'static str =
        "Text is already Japanese; no katakana conversion needed.";

    /// Marker for input that is already Japanese
    pub fn no_conversion_needed() -> Self {
        Self {
            primary: Self::NO_CONVERSION_NEEDED.to_string(),
            pronunciation_hint: None,
            succeeded: true,
        }
    }

    /// Successful conversion
    pub fn converted(primary: impl Into<String>, pronunciation_hint: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            pronunciation_hint,
            succeeded: true,
        }
    }

    /// Renderable failure text, never empty
    pub fn failed(reason: impl fmt::Display) -> Self {
        Self {
            primary: format!("conversion failed: {}", reason),
            pronunciation_hint: None,
            succeeded: false,
        }
    }

    /// The translation shown as-is because no katakana could be produced
    pub fn untransliterated(translation: &str) -> Self {
        Self {
            primary: format!("{} (transliteration unavailable)", translation),
            pronunciation_hint: None,
            succeeded: false,
        }
    }
}
