//! Ollama transport configuration.

use std::time::Duration;

use super::retry::RetryConfig;

/// Configuration for [`OllamaTransport`](super::OllamaTransport).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model used for generation.
    pub model: String,
    /// Request timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    /// Retry policy for server errors.
    pub retry: RetryConfig,
}

impl TransportConfig {
    /// Default Ollama API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";
    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "anpigon/eeve-korean-10.8b";

    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment variable overriding the base URL.
    pub const BASE_URL_ENV: &'static str = "OLLAMA_BASE_URL";
    /// Environment variable overriding the model.
    pub const MODEL_ENV: &'static str = "OLLAMA_MODEL";

    /// Creates configuration from environment variables.
    ///
    /// Reads from:
    /// - `OLLAMA_BASE_URL` - Optional base URL
    /// - `OLLAMA_MODEL` - Optional model
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Replaces the base URL and model with `OLLAMA_BASE_URL` and
    /// `OLLAMA_MODEL` when they are set.
    #[must_use]
    pub fn with_env(self) -> Self {
        let config = match std::env::var(Self::BASE_URL_ENV) {
            Ok(url) => self.base_url(url),
            Err(_) => self,
        };
        match std::env::var(Self::MODEL_ENV) {
            Ok(model) => config.model(model),
            Err(_) => config,
        }
    }

    /// Sets the base URL. A trailing slash is dropped.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.base_url = url.trim_end_matches('/').to_owned();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout: None,
            retry: RetryConfig::default(),
        }
    }
}
