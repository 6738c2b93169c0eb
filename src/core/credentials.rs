//! Process-wide API credentials, each settable once per session

use std::sync::OnceLock;
use tracing::debug;

use crate::core::config::AppConfig;
use crate::core::errors::{AdapterError, ConfigError};
use crate::core::models::Auth;

/// A single credential value that can be written at most once
#[derive(Debug)]
pub struct CredentialSlot {
    service: &'static str,
    value: OnceLock<String>,
}

impl CredentialSlot {
    /// Empty slot for `service`
    pub const fn new(service: &'static str) -> Self {
        Self {
            service,
            value: OnceLock::new(),
        }
    }

    /// Store the credential; fails if it was already set
    pub fn set(&self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.value
            .set(value.into())
            .map_err(|_| ConfigError::CredentialAlreadySet {
                service: self.service.to_string(),
            })?;
        debug!("Credential for {} set", self.service);
        Ok(())
    }

    /// The credential, or `MissingCredential` if it was never set
    pub fn get(&self) -> Result<&str, AdapterError> {
        self.value
            .get()
            .map(String::as_str)
            .ok_or_else(|| AdapterError::MissingCredential {
                service: self.service.to_string(),
            })
    }

    /// Whether a value was stored
    pub fn is_set(&self) -> bool {
        self.value.get().is_some()
    }
}

/// Credentials for every authenticated remote service
#[derive(Debug)]
pub struct Credentials {
    /// Hugging Face bearer token
    pub huggingface: CredentialSlot,
    /// Google API key
    pub google: CredentialSlot,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            huggingface: CredentialSlot::new("huggingface"),
            google: CredentialSlot::new("google"),
        }
    }
}

impl Credentials {
    /// Seed the slots from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let credentials = Self::default();
        if let Some(key) = &config.huggingface_api_key {
            credentials.huggingface.set(key.clone())?;
        }
        if let Some(key) = &config.google_api_key {
            credentials.google.set(key.clone())?;
        }
        Ok(credentials)
    }

    /// Credential required by an endpoint's auth style
    pub fn resolve(&self, auth: Auth) -> Result<Option<&str>, AdapterError> {
        match auth {
            Auth::HuggingFaceBearer => self.huggingface.get().map(Some),
            Auth::GoogleApiKey => self.google.get().map(Some),
            Auth::None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_once() {
        let slot = CredentialSlot::new("huggingface");
        assert!(!slot.is_set());
        slot.set("hf_first").unwrap();
        assert!(matches!(
            slot.set("hf_second"),
            Err(ConfigError::CredentialAlreadySet { .. })
        ));
        assert_eq!(slot.get().unwrap(), "hf_first");
    }

    #[test]
    fn test_missing_credential_is_recoverable() {
        let credentials = Credentials::default();
        assert!(matches!(
            credentials.resolve(Auth::GoogleApiKey),
            Err(AdapterError::MissingCredential { .. })
        ));
        assert_eq!(credentials.resolve(Auth::None).unwrap(), None);
    }

    #[test]
    fn test_from_config() {
        let config = AppConfig {
            huggingface_api_key: Some("hf_token".to_string()),
            ..Default::default()
        };
        let credentials = Credentials::from_config(&config).unwrap();
        assert_eq!(credentials.resolve(Auth::HuggingFaceBearer).unwrap(), Some("hf_token"));
        assert!(!credentials.google.is_set());
    }
}
