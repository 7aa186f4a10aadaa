//! Client configuration.
//!
//! Base URLs and credentials for the signature provider, the business
//! registry and the model API. Defaults point to the public endpoints
//! (Dokobit's developer sandbox for signing). Override via environment
//! variables or explicit construction for tests.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use crate::retry::RetryPolicy;

/// Default Gemini model for receipt images.
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash-image";
/// Default Gemini model for text advice.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";

/// Configuration for the external services.
///
/// Custom `Debug` implementation redacts every secret.
#[derive(Clone)]
pub struct ClientConfig {
    /// Dokobit WS API base URL.
    pub dokobit_url: Url,
    /// Dokobit access token, sent as the `access_token` query parameter.
    pub dokobit_access_token: Zeroizing<String>,
    /// Public registry autocomplete endpoint.
    pub autocomplete_url: Url,
    /// Registry SOAP endpoint for detail lookups.
    pub registry_url: Url,
    pub registry_username: Zeroizing<String>,
    pub registry_password: Zeroizing<String>,
    /// Gemini API base URL.
    pub model_url: Url,
    /// Gemini API key. `None` switches the model client to placeholders.
    pub model_api_key: Option<Zeroizing<String>>,
    pub vision_model: String,
    pub text_model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for registry and model calls.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("dokobit_url", &self.dokobit_url)
            .field("dokobit_access_token", &"[REDACTED]")
            .field("autocomplete_url", &self.autocomplete_url)
            .field("registry_url", &self.registry_url)
            .field("registry_username", &"[REDACTED]")
            .field("registry_password", &"[REDACTED]")
            .field("model_url", &self.model_url)
            .field(
                "model_api_key",
                &self.model_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("vision_model", &self.vision_model)
            .field("text_model", &self.text_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DOKOBIT_API_URL` (default: `https://developers.dokobit.com`)
    /// - `DOKOBIT_ACCESS_TOKEN` (default: empty; see [`Self::require_dokobit_token`])
    /// - `RIK_AUTOCOMPLETE_URL` (default: `https://ariregister.rik.ee/est/api/autocomplete`)
    /// - `RIK_API_URL` (default: `https://ariregxmlv6.rik.ee/`)
    /// - `RIK_API_USERNAME`, `RIK_API_PASSWORD` (default: empty)
    /// - `GEMINI_API_URL` (default: `https://generativelanguage.googleapis.com`)
    /// - `GEMINI_API_KEY` (optional; absent means placeholder mode)
    /// - `GEMINI_VISION_MODEL`, `GEMINI_TEXT_MODEL`
    /// - `KLAAR_HTTP_TIMEOUT_SECS` (default: 30)
    /// - `KLAAR_HTTP_MAX_RETRIES` (default: 3), `KLAAR_HTTP_RETRY_BASE_MS` (default: 200)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dokobit_url: env_url("DOKOBIT_API_URL", "https://developers.dokobit.com")?,
            dokobit_access_token: env_secret("DOKOBIT_ACCESS_TOKEN"),
            autocomplete_url: env_url(
                "RIK_AUTOCOMPLETE_URL",
                "https://ariregister.rik.ee/est/api/autocomplete",
            )?,
            registry_url: env_url("RIK_API_URL", "https://ariregxmlv6.rik.ee/")?,
            registry_username: env_secret("RIK_API_USERNAME"),
            registry_password: env_secret("RIK_API_PASSWORD"),
            model_url: env_url("GEMINI_API_URL", "https://generativelanguage.googleapis.com")?,
            model_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(Zeroizing::new),
            vision_model: std::env::var("GEMINI_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            text_model: std::env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            timeout_secs: std::env::var("KLAAR_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            retry: RetryPolicy::from_env(),
        })
    }

    /// Configuration with every service pointing at one mock server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base` cannot be parsed.
    pub fn local_mock(base: &str, token: &str) -> Result<Self, ConfigError> {
        let url = |suffix: &str| -> Result<Url, ConfigError> {
            let raw = format!("{}{suffix}", base.trim_end_matches('/'));
            Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))
        };
        Ok(Self {
            dokobit_url: url("/")?,
            dokobit_access_token: Zeroizing::new(token.to_string()),
            autocomplete_url: url("/est/api/autocomplete")?,
            registry_url: url("/")?,
            registry_username: Zeroizing::new("test-user".to_string()),
            registry_password: Zeroizing::new("test-pass".to_string()),
            model_url: url("/")?,
            model_api_key: Some(Zeroizing::new(token.to_string())),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            timeout_secs: 5,
            retry: RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(10),
            },
        })
    }

    /// Fail unless a Dokobit access token is configured.
    pub fn require_dokobit_token(&self) -> Result<(), ConfigError> {
        if self.dokobit_access_token.trim().is_empty() {
            return Err(ConfigError::MissingVar("DOKOBIT_ACCESS_TOKEN"));
        }
        Ok(())
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_secret(var: &str) -> Zeroizing<String> {
    Zeroizing::new(std::env::var(var).unwrap_or_default())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = ClientConfig::local_mock("http://127.0.0.1:9000", "test-token").unwrap();
        assert_eq!(cfg.dokobit_access_token.as_str(), "test-token");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.retry.max_retries, 3);
        assert_eq!(cfg.retry.base_delay, Duration::from_millis(10));
        assert_eq!(cfg.dokobit_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(
            cfg.autocomplete_url.as_str(),
            "http://127.0.0.1:9000/est/api/autocomplete"
        );
        assert!(cfg.require_dokobit_token().is_ok());
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = ClientConfig::local_mock("http://127.0.0.1:9000", "s3cret-token").unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("s3cret-token"));
        assert!(!debug.contains("test-pass"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_token_is_rejected_when_required() {
        let mut cfg = ClientConfig::local_mock("http://127.0.0.1:9000", "t").unwrap();
        cfg.dokobit_access_token = Zeroizing::new("  ".to_string());
        assert!(matches!(
            cfg.require_dokobit_token(),
            Err(ConfigError::MissingVar("DOKOBIT_ACCESS_TOKEN"))
        ));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("KLAAR_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("KLAAR_TEST_BAD_URL", "not a url");
        let result = env_url("KLAAR_TEST_BAD_URL", "https://example.com");
        std::env::remove_var("KLAAR_TEST_BAD_URL");
        assert!(result.is_err());
    }
}
