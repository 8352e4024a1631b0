//! Transport to the local model server.
//!
//! [`Transport`] is the seam between the conversation logic and HTTP:
//! - [`OllamaTransport`]: the real client, with a bounded retry policy
//! - [`MockTransport`]: scripted replies for tests and demos

mod client;
mod config;
mod mock;
mod retry;
mod types;

use async_trait::async_trait;

use crate::error::TransportError;

pub use client::OllamaTransport;
pub use config::TransportConfig;
pub use mock::MockTransport;
pub use retry::RetryConfig;
pub use types::ModelInfo;

/// Capability to reach a text generation server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Lightweight liveness check.
    ///
    /// Succeeds when the server answered at all without a server error.
    async fn probe(&self) -> Result<(), TransportError>;

    /// Run one complete, non-streamed generation for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, TransportError>;

    /// Model used for generation.
    fn model(&self) -> &str;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn probe(&self) -> Result<(), TransportError> {
        (**self).probe().await
    }

    async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        (**self).generate(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}
