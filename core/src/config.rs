//! Client configuration.

use crate::error::ConfigError;

/// Production endpoint root of the affiliate API.
pub const DEFAULT_BASE_URL: &str = "https://api.dmm.com/affiliate/v3";

pub const ENV_API_ID: &str = "DMM_API_ID";
pub const ENV_AFFILIATE_ID: &str = "DMM_AFFILIATE_ID";
pub const ENV_BASE_URL: &str = "DMM_API_BASE_URL";

/// Credentials and endpoint root shared by every request a client sends.
///
/// The identity keys are injected into each outgoing query; they are never
/// taken from per-call arguments.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_id: String,
    affiliate_id: String,
    base_url: String,
}

impl ClientConfig {
    pub fn new(api_id: &str, affiliate_id: &str) -> Result<Self, ConfigError> {
        if api_id.trim().is_empty() {
            return Err(ConfigError::Empty("api_id"));
        }
        if affiliate_id.trim().is_empty() {
            return Err(ConfigError::Empty("affiliate_id"));
        }
        Ok(Self {
            api_id: api_id.to_string(),
            affiliate_id: affiliate_id.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Read credentials from `DMM_API_ID` / `DMM_AFFILIATE_ID`, and the
    /// optional endpoint override from `DMM_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_id = std::env::var(ENV_API_ID).map_err(|_| ConfigError::MissingEnv(ENV_API_ID))?;
        let affiliate_id =
            std::env::var(ENV_AFFILIATE_ID).map_err(|_| ConfigError::MissingEnv(ENV_AFFILIATE_ID))?;
        let config = Self::new(&api_id, &affiliate_id)?;
        Ok(match std::env::var(ENV_BASE_URL) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(&url),
            _ => config,
        })
    }

    /// Point the client at a different endpoint root (e.g. a local mock).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub fn affiliate_id(&self) -> &str {
        &self.affiliate_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Credentials stay out of logs and panic messages.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_id", &"***")
            .field("affiliate_id", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_keys() {
        assert_eq!(ClientConfig::new("", "aff-990").unwrap_err(), ConfigError::Empty("api_id"));
        assert_eq!(
            ClientConfig::new("key", "  ").unwrap_err(),
            ConfigError::Empty("affiliate_id")
        );
    }

    #[test]
    fn defaults_to_production_endpoint() {
        let config = ClientConfig::new("key", "aff-990").unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_id(), "key");
        assert_eq!(config.affiliate_id(), "aff-990");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("key", "aff-990")
            .unwrap()
            .with_base_url("http://127.0.0.1:3000/");
        assert_eq!(config.base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn debug_output_hides_credentials() {
        let config = ClientConfig::new("secret-key", "secret-aff").unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("secret-key"));
        assert!(!shown.contains("secret-aff"));
    }
}
