//! Error types for the converse crate.
//!
//! - [`TransportError`]: talking to the Ollama server failed
//! - [`ProcessingError`]: a graph node failed
//! - [`CompilationError`]: a state graph could not be built

/// Result type alias for converse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Transport error.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Graph node error.
    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    /// Graph compilation error.
    #[error("Graph error: {0}")]
    Compilation(#[from] CompilationError),

    /// I/O error on the session's input or output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for calls to the model server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server could not be reached at all.
    #[error("Connection failed: {0}")]
    ConnectionUnavailable(String),

    /// The server answered with an error status (after any retries).
    #[error("HTTP {status}: {message}")]
    ServerError {
        /// Final HTTP status code.
        status: u16,
        /// Error text from the response body.
        message: String,
    },

    /// The configured request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// The response body was not what the API documents.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Any other request failure (building the client, sending the body, ...).
    #[error("{0}")]
    Request(String),

    /// Failure scripted by [`MockTransport`](crate::transport::MockTransport).
    #[error("{0}")]
    Mock(String),
}

impl TransportError {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionUnavailable(message.into())
    }

    /// Create a server status error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Whether the server was unreachable, as opposed to answering badly.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::connection(err.to_string())
        } else if err.is_decode() {
            Self::decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

/// Error raised by a graph node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ProcessingError {
    /// The state had no message to act on, or the last one was blank.
    #[error("Last message is missing or empty")]
    EmptyMessage,

    /// An edge names a node the graph does not hold.
    #[error("node not found: {0}")]
    MissingNode(String),

    /// The graph run was already invoked once.
    #[error("Graph run was already invoked")]
    AlreadyInvoked,

    /// The model call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Error when compiling a state graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CompilationError {
    /// An edge names a node that was never added.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The graph has no edges, so it has no entry point.
    #[error("graph has no entry point")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = TransportError::server(503, "model is loading");
        assert_eq!(err.to_string(), "HTTP 503: model is loading");
        assert!(!err.is_connection());
    }

    #[test]
    fn test_connection_error_is_connection() {
        assert!(TransportError::connection("refused").is_connection());
    }

    #[test]
    fn test_processing_wraps_transport() {
        let err: ProcessingError = TransportError::Timeout.into();
        assert_eq!(err, ProcessingError::Transport(TransportError::Timeout));
        assert_eq!(err.to_string(), "Request timed out");
    }

    #[test]
    fn test_error_from_transport() {
        let err: Error = TransportError::connection("refused").into();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "Transport error: Connection failed: refused");
    }
}
