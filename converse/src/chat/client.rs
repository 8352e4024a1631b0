//! Turn-level conversation client.

use tracing::debug;

use crate::conversation::Conversation;
use crate::error::TransportError;
use crate::message::Message;
use crate::transport::Transport;

/// Sends whole conversations to a transport, one turn at a time.
#[derive(Debug, Clone)]
pub struct ConversationClient<T> {
    transport: T,
}

impl<T: Transport> ConversationClient<T> {
    /// Create a client over `transport`.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Check that the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns the transport's probe error.
    pub async fn preflight(&self) -> Result<(), TransportError> {
        self.transport.probe().await
    }

    /// Run one turn and return the assistant's reply.
    ///
    /// The user message is appended first and the full transcript is sent as
    /// the prompt. On success the reply is appended as well.
    ///
    /// # Errors
    ///
    /// Returns the transport error. The user message of the failed turn
    /// stays in `conversation`; nothing else is added.
    pub async fn send_turn(
        &self,
        conversation: &mut Conversation,
        user_text: &str,
    ) -> Result<String, TransportError> {
        conversation.push(Message::user(user_text));
        let prompt = conversation.transcript();
        debug!(messages = conversation.len(), "sending turn");

        let reply = self.transport.generate(&prompt).await?;
        conversation.push(Message::assistant(reply.clone()));
        Ok(reply)
    }
}
