//! Converse - a minimal conversational client for a local Ollama server.
//!
//! Two usage modes share one [`Transport`](transport::Transport):
//! - [`chat`]: a REPL that resends the whole conversation as a transcript
//!   on every turn
//! - [`agent`]: a single generation call wrapped as the only node of a
//!   [`graph::StateGraph`]

pub mod agent;
pub mod chat;
pub mod conversation;
pub mod error;
pub mod graph;
pub mod message;
pub mod prelude;
pub mod transport;

pub use error::{CompilationError, Error, ProcessingError, Result, TransportError};
