//! Convenient re-exports of commonly used types.

pub use crate::agent::{AgentState, GenerateNode, run_single_shot, single_shot};
pub use crate::chat::{ChatOptions, ChatSession, ConversationClient, Input, SessionOutcome};
pub use crate::conversation::Conversation;
pub use crate::error::{CompilationError, Error, ProcessingError, Result, TransportError};
pub use crate::graph::{CompiledGraph, GraphRun, Node, RunStatus, StateGraph};
pub use crate::message::{Message, Role};
pub use crate::transport::{
    MockTransport, ModelInfo, OllamaTransport, RetryConfig, Transport, TransportConfig,
};
