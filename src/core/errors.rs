//! Custom error types for remote calls, the kana engine and the pipeline

use thiserror::Error;

/// Errors raised by the remote service adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// No response was received (connect failure, timeout, reset)
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Credential rejected by the remote service
    #[error("Unauthorized: {status} - {body}")]
    Unauthorized {
        status: u16,
        body: String,
    },

    /// Model or endpoint unknown to the remote service
    #[error("Not found: {status} - {body}")]
    NotFound {
        status: u16,
        body: String,
    },

    /// Any other non-2xx status
    #[error("Service error: {status} - {body}")]
    ServiceError {
        status: u16,
        body: String,
    },

    /// 2xx response whose body does not have the expected shape
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
    },

    /// The endpoint needs a credential that was never provided
    #[error("Missing credential for {service}")]
    MissingCredential {
        service: String,
    },
}

impl AdapterError {
    /// Classify a non-2xx HTTP status and its body
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => AdapterError::Unauthorized { status, body },
            404 => AdapterError::NotFound { status, body },
            _ => AdapterError::ServiceError { status, body },
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AdapterError::Unauthorized { status, .. }
            | AdapterError::NotFound { status, .. }
            | AdapterError::ServiceError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AdapterError::InvalidResponse {
                message: err.to_string(),
            }
        } else {
            AdapterError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

/// Errors raised by the transliteration engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Setup failed; the engine stays unavailable for the process lifetime
    #[error("Engine initialization failed: {0}")]
    Init(String),

    /// A single conversion produced nothing usable
    #[error("Conversion failed: {0}")]
    Conversion(String),
}

/// Errors raised inside the detect/translate/transliterate pipeline
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// Engine initializer failed or has not produced an engine
    #[error("Transliteration engine unavailable: {reason}")]
    EngineUnavailable {
        reason: String,
    },

    /// Translation was empty or error-marked
    #[error("No translation available")]
    NoTranslation,

    /// Wrapped adapter failure
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Wrapped engine failure
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A field holds an unusable value
    #[error("Invalid configuration: {message}")]
    Invalid {
        message: String,
    },

    /// Credential set twice in the same session
    #[error("Credential for {service} is already set")]
    CredentialAlreadySet {
        service: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, AdapterError>;
