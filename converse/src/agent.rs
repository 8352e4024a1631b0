//! Single-shot agent: one generation call as a one-node graph.
//!
//! Unlike [`ConversationClient`](crate::chat::ConversationClient), the node
//! sends only the raw content of the latest message, not a transcript.

use async_trait::async_trait;
use tracing::info;

use crate::conversation::Conversation;
use crate::error::{CompilationError, ProcessingError, Result};
use crate::graph::{CompiledGraph, Node, StateGraph};
use crate::message::{Message, Role};
use crate::transport::Transport;

/// State threaded through the agent graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentState {
    /// Messages so far.
    pub messages: Conversation,
}

impl AgentState {
    /// A state holding one user message.
    #[must_use]
    pub fn seeded(prompt: impl Into<String>) -> Self {
        let mut messages = Conversation::new();
        messages.push(Message::user(prompt));
        Self { messages }
    }

    /// Content of the last assistant message, if any.
    #[must_use]
    pub fn reply(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role() == Role::Assistant)
            .map(Message::content)
    }
}

/// Node that answers the latest message with one generation call.
#[derive(Debug)]
pub struct GenerateNode<T> {
    transport: T,
}

impl<T> GenerateNode<T> {
    /// Node id used in the graph.
    pub const ID: &'static str = "generate";

    /// Create the node over `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T: Transport> Node<AgentState> for GenerateNode<T> {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn run(&self, state: AgentState) -> std::result::Result<AgentState, ProcessingError> {
        let prompt = state
            .messages
            .last()
            .map(Message::content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProcessingError::EmptyMessage)?;

        let reply = self.transport.generate(prompt).await?;

        let mut messages = state.messages;
        messages.push(Message::assistant(reply));
        Ok(AgentState { messages })
    }
}

/// Build the one-node graph; `"generate"` is both entry and finish point.
///
/// # Errors
///
/// Never fails in practice; the error comes from [`StateGraph::compile`].
pub fn single_shot<T>(
    transport: T,
) -> std::result::Result<CompiledGraph<AgentState>, CompilationError>
where
    T: Transport + 'static,
{
    let mut graph = StateGraph::new();
    graph
        .add_node(GenerateNode::new(transport))
        .add_edge(GenerateNode::<T>::ID);
    graph.compile()
}

/// Seed `prompt` as the only user message and run the graph exactly once.
///
/// # Errors
///
/// Any node failure aborts the run and is returned as
/// [`Error::Processing`](crate::Error::Processing).
pub async fn run_single_shot<T>(transport: T, prompt: impl Into<String>) -> Result<AgentState>
where
    T: Transport + 'static,
{
    let graph = single_shot(transport)?;
    let state = graph.invoke(AgentState::seeded(prompt)).await?;
    info!(messages = state.messages.len(), "single-shot run done");
    Ok(state)
}
