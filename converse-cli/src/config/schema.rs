//! Configuration schema definitions.

use std::time::Duration;

use converse::chat::ChatOptions;
use converse::transport::{RetryConfig, TransportConfig};
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Retry policy for server errors.
    #[serde(default)]
    pub retry: RetrySettings,

    /// REPL settings.
    #[serde(default)]
    pub chat: ChatSettings,
}

/// Ollama server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL (default: <http://localhost:11434>).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for generation.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds. Absent means wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    TransportConfig::DEFAULT_BASE_URL.to_owned()
}

fn default_model() -> String {
    TransportConfig::DEFAULT_MODEL.to_owned()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: None,
        }
    }
}

/// Retry settings, mirrored into [`RetryConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff multiplier in seconds.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    /// Statuses that are retried.
    #[serde(default = "default_status_forcelist")]
    pub status_forcelist: Vec<u16>,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_backoff_factor() -> f64 {
    1.0
}

fn default_status_forcelist() -> Vec<u16> {
    RetryConfig::DEFAULT_STATUS_FORCELIST.to_vec()
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
            status_forcelist: default_status_forcelist(),
        }
    }
}

/// REPL settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatSettings {
    /// Input that ends the session (case-insensitive).
    #[serde(default = "default_quit_word")]
    pub quit_word: String,
}

fn default_quit_word() -> String {
    ChatOptions::DEFAULT_QUIT_WORD.to_owned()
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            quit_word: default_quit_word(),
        }
    }
}

impl AppConfig {
    /// Apply `OLLAMA_BASE_URL` and `OLLAMA_MODEL` when set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let server = TransportConfig::new()
            .base_url(self.server.base_url.clone())
            .model(self.server.model.clone())
            .with_env();
        self.server.base_url = server.base_url;
        self.server.model = server.model;
        self
    }

    /// Replace the base URL and model when given.
    #[must_use]
    pub fn with_overrides(mut self, base_url: Option<String>, model: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.server.base_url = url;
        }
        if let Some(model) = model {
            self.server.model = model;
        }
        self
    }

    /// Build the transport configuration.
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        let retry = RetryConfig::default()
            .max_retries(self.retry.max_retries)
            .backoff_factor(self.retry.backoff_factor)
            .status_forcelist(self.retry.status_forcelist.clone());

        let config = TransportConfig::new()
            .base_url(self.server.base_url.clone())
            .model(self.server.model.clone())
            .retry(retry);

        match self.server.timeout_secs {
            Some(secs) => config.timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Build the REPL options.
    #[must_use]
    pub fn chat_options(&self) -> ChatOptions {
        ChatOptions::default().quit_word(self.chat.quit_word.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.transport_config(), TransportConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            model = "llama3.2"
            timeout_secs = 30

            [chat]
            quit_word = "그만"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.server.base_url, "http://localhost:11434");
        let transport = config.transport_config();
        assert_eq!(transport.model, "llama3.2");
        assert_eq!(transport.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.chat_options().quit_word, "그만");
    }

    #[test]
    fn test_retry_section() {
        let config: AppConfig = toml::from_str(
            r"
            [retry]
            max_retries = 5
            backoff_factor = 0.5
            status_forcelist = [503]
            ",
        )
        .expect("config should parse");

        let retry = config.transport_config().retry;
        assert_eq!(retry.max_retries, 5);
        assert!(retry.is_retryable_status(503));
        assert!(!retry.is_retryable_status(500));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = toml::from_str::<AppConfig>("[server]\nmodle = \"typo\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_overrides(Some("http://gpu:11434".to_owned()), None);
        assert_eq!(config.server.base_url, "http://gpu:11434");
        assert_eq!(config.server.model, TransportConfig::DEFAULT_MODEL);
    }

    // The only test in this binary that touches these variables.
    #[test]
    #[allow(unsafe_code)]
    fn test_env_overrides_file_values() {
        let config = AppConfig::default().with_overrides(None, Some("file-model".to_owned()));

        unsafe { std::env::set_var(TransportConfig::MODEL_ENV, "env-model") };
        let config = config.with_env_overrides();
        unsafe { std::env::remove_var(TransportConfig::MODEL_ENV) };

        assert_eq!(config.server.model, "env-model");
    }
}
