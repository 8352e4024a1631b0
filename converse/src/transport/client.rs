//! Ollama HTTP transport.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::error::TransportError;

use super::Transport;
use super::config::TransportConfig;
use super::types::{GenerateRequest, GenerateResponse, ModelInfo, OllamaErrorResponse, TagsResponse};

/// Ollama API transport over reqwest.
#[derive(Debug, Clone)]
pub struct OllamaTransport {
    config: Arc<TransportConfig>,
    http_client: Client,
}

impl OllamaTransport {
    /// Create a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
        })
    }

    /// Create a transport with default configuration.
    ///
    /// # Errors
    ///
    /// See [`OllamaTransport::new`].
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(TransportConfig::default())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.config.base_url)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url)
    }

    /// List the models installed on the server.
    ///
    /// [`Transport::probe`] is built on this call.
    ///
    /// # Errors
    ///
    /// Fails if the server is unreachable, answers with an error status, or
    /// returns a body that is not a tag listing.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, TransportError> {
        let response = self.send(|| self.http_client.get(self.tags_url())).await?;
        let response = Self::error_for_status(response).await?;
        let text = response.text().await?;
        let tags: TagsResponse = serde_json::from_str(&text)
            .map_err(|e| TransportError::decode(format!("tag listing: {e}")))?;
        Ok(tags.models)
    }

    /// Send a request, retrying on the statuses the retry policy lists.
    ///
    /// Connection errors return immediately. The returned response may still
    /// carry a non-success status that is not retryable.
    async fn send<F>(&self, request: F) -> Result<Response, TransportError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            let response = request().send().await?;
            let status = response.status().as_u16();

            if !retry.is_retryable_status(status) {
                return Ok(response);
            }
            if attempt >= retry.max_retries {
                debug!(status, attempts = attempt + 1, "retries exhausted");
                return Err(Self::into_error(response).await);
            }

            attempt += 1;
            let delay = retry.backoff(attempt);
            warn!(
                status,
                attempt,
                max_retries = retry.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "server error, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn error_for_status(response: Response) -> Result<Response, TransportError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::into_error(response).await)
        }
    }

    /// Build a `ServerError`, unwrapping Ollama's `{"error": "..."}` body.
    async fn into_error(response: Response) -> TransportError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<OllamaErrorResponse>(&body).map_or_else(
            |_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or_default().to_owned()
                } else {
                    body
                }
            },
            |e| e.error,
        );
        TransportError::server(status.as_u16(), message)
    }
}

#[async_trait]
impl Transport for OllamaTransport {
    async fn probe(&self) -> Result<(), TransportError> {
        match self.list_models().await {
            Ok(models) => {
                debug!(models = models.len(), "server is up");
                if !models.iter().any(|m| m.matches(self.model())) {
                    warn!(model = %self.model(), "model is not installed on the server");
                }
                Ok(())
            }
            Err(TransportError::ServerError { status, .. }) if status < 500 => {
                debug!(status, "server is up, tag listing unavailable");
                Ok(())
            }
            Err(TransportError::Decode(e)) => {
                debug!(error = %e, "server is up, tag listing not decoded");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        let url = self.generate_url();
        let body = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };
        debug!(model = %body.model, prompt_len = prompt.len(), "generate request");

        let response = self.send(|| self.http_client.post(&url).json(&body)).await?;
        let response = Self::error_for_status(response).await?;

        let text = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            TransportError::decode(format!("parse error: {e}, response: {text}"))
        })?;

        debug!(
            model = parsed.model.as_deref().unwrap_or_default(),
            done = parsed.done.unwrap_or_default(),
            done_reason = parsed.done_reason.as_deref().unwrap_or_default(),
            prompt_eval_count = parsed.prompt_eval_count.unwrap_or_default(),
            eval_count = parsed.eval_count.unwrap_or_default(),
            total_duration_ns = parsed.total_duration.unwrap_or_default(),
            "generate response"
        );
        Ok(parsed.response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
