//! Mock transport for testing.
//!
//! [`MockTransport`] returns scripted results in order and records every
//! prompt it receives, so tests can check what would have gone over the wire.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::Transport;
use crate::error::TransportError;

/// A scripted transport.
///
/// # Example
///
/// ```rust,ignore
/// let transport = MockTransport::new()
///     .with_response("Hello!")
///     .with_failure(TransportError::server(503, "busy"));
/// // First generate returns "Hello!", second fails, later calls fail with `Mock`.
/// ```
#[derive(Debug)]
pub struct MockTransport {
    model: String,
    probe_result: Result<(), TransportError>,
    fixed: Option<String>,
    script: Mutex<VecDeque<Result<String, TransportError>>>,
    prompts: Mutex<Vec<String>>,
    probes: AtomicUsize,
}

impl MockTransport {
    /// Create a mock whose probe succeeds and which has no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: "mock-model".to_owned(),
            probe_result: Ok(()),
            fixed: None,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            probes: AtomicUsize::new(0),
        }
    }

    /// Create a mock that answers every prompt with `response`.
    #[must_use]
    pub fn fixed(response: impl Into<String>) -> Self {
        Self {
            fixed: Some(response.into()),
            ..Self::new()
        }
    }

    /// Make the probe fail as if nothing listened on the port.
    #[must_use]
    pub fn unreachable(mut self) -> Self {
        self.probe_result = Err(TransportError::connection("connection refused"));
        self
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue a failed call.
    #[must_use]
    pub fn with_failure(self, error: TransportError) -> Self {
        self.push(Err(error));
        self
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Prompts received so far, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of generate calls so far.
    #[must_use]
    pub fn generate_calls(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of probe calls so far.
    #[must_use]
    pub fn probe_calls(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    fn push(&self, result: Result<String, TransportError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(result);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn probe(&self) -> Result<(), TransportError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.probe_result.clone()
    }

    async fn generate(&self, prompt: &str) -> Result<String, TransportError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_owned());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match (scripted, &self.fixed) {
            (Some(result), _) => result,
            (None, Some(fixed)) => Ok(fixed.clone()),
            (None, None) => Err(TransportError::Mock("no scripted response".to_owned())),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_in_order() {
        let mock = MockTransport::new()
            .with_response("first")
            .with_failure(TransportError::server(500, "boom"));

        assert_eq!(mock.generate("a").await, Ok("first".to_owned()));
        assert_eq!(
            mock.generate("b").await,
            Err(TransportError::server(500, "boom"))
        );
        assert!(matches!(
            mock.generate("c").await,
            Err(TransportError::Mock(_))
        ));
        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_fixed_after_script() {
        let mock = MockTransport::fixed("same").with_response("scripted");
        assert_eq!(mock.generate("x").await, Ok("scripted".to_owned()));
        assert_eq!(mock.generate("y").await, Ok("same".to_owned()));
        assert_eq!(mock.generate("z").await, Ok("same".to_owned()));
    }

    #[tokio::test]
    async fn test_unreachable_probe() {
        let mock = MockTransport::new().unreachable();
        assert!(mock.probe().await.is_err_and(|e| e.is_connection()));
        assert_eq!(mock.probe_calls(), 1);
        assert_eq!(mock.generate_calls(), 0);
    }
}
