//! Conversation client: full-history chat with the model.
//!
//! [`ConversationClient::send_turn`] is the per-turn contract;
//! [`ChatSession`] wraps it in an interactive loop.

mod client;
mod input;
mod session;

pub use client::ConversationClient;
pub use input::Input;
pub use session::{ChatOptions, ChatSession, SessionOutcome};
