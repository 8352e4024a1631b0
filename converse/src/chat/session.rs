//! Interactive read-eval-print loop over a conversation.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::conversation::Conversation;
use crate::error::Result;
use crate::transport::Transport;

use super::client::ConversationClient;
use super::input::Input;

/// Display and control settings for a [`ChatSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOptions {
    /// Input that ends the session, compared case-insensitively.
    pub quit_word: String,
    /// Prompt label shown before user input.
    pub user_label: String,
    /// Label shown before each reply.
    pub assistant_label: String,
}

impl ChatOptions {
    /// Default quit token.
    pub const DEFAULT_QUIT_WORD: &'static str = "quit";

    /// Sets the quit token.
    #[must_use]
    pub fn quit_word(mut self, word: impl Into<String>) -> Self {
        self.quit_word = word.into();
        self
    }
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            quit_word: Self::DEFAULT_QUIT_WORD.to_owned(),
            user_label: "You".to_owned(),
            assistant_label: "Assistant".to_owned(),
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The preflight probe failed; the loop never started.
    ServerUnavailable,
    /// The user typed the quit token.
    Finished,
    /// The input stream reached end of file.
    InputClosed,
}

/// A REPL session owning its conversation.
#[derive(Debug)]
pub struct ChatSession<T> {
    client: ConversationClient<T>,
    conversation: Conversation,
    options: ChatOptions,
}

impl<T: Transport> ChatSession<T> {
    /// Create a session with an empty conversation.
    #[must_use]
    pub const fn new(transport: T, options: ChatOptions) -> Self {
        Self {
            client: ConversationClient::new(transport),
            conversation: Conversation::new(),
            options,
        }
    }

    /// History so far.
    #[must_use]
    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Consume the session, keeping its history.
    #[must_use]
    pub fn into_conversation(self) -> Conversation {
        self.conversation
    }

    /// Probe the server, then run the loop until quit or end of input.
    ///
    /// Transport failures during a turn are written to `output` and the loop
    /// continues with the history intact.
    ///
    /// # Errors
    ///
    /// Only I/O errors on `input` or `output` are returned. A line that is
    /// not valid UTF-8 is reported like a failed turn and skipped.
    pub async fn run<R, W>(&mut self, mut input: R, output: &mut W) -> Result<SessionOutcome>
    where
        R: AsyncBufRead + Unpin + Send,
        W: Write + Send,
    {
        if let Err(e) = self.client.preflight().await {
            debug!(error = %e, "server probe failed");
            writeln!(output, "Error: the Ollama server is not running ({e}).")?;
            writeln!(output, "Start the Ollama server first.")?;
            return Ok(SessionOutcome::ServerUnavailable);
        }

        writeln!(
            output,
            "Starting the conversation. Type '{}' to quit.",
            self.options.quit_word
        )?;

        let mut line = String::new();
        loop {
            write!(output, "\n{}: ", self.options.user_label)?;
            output.flush()?;

            line.clear();
            let read = match input.read_line(&mut line).await {
                Ok(read) => read,
                // The offending line is consumed; the next read starts after it.
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    debug!(error = %e, "unreadable input line");
                    writeln!(output, "\nAn error occurred: {e}")?;
                    writeln!(output, "Please try again.")?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if read == 0 {
                info!(messages = self.conversation.len(), "input closed");
                writeln!(output)?;
                return Ok(SessionOutcome::InputClosed);
            }

            let text = match Input::parse(&line, &self.options.quit_word) {
                Input::Empty => continue,
                Input::Quit => {
                    writeln!(output, "Ending the conversation.")?;
                    info!(messages = self.conversation.len(), "session finished");
                    return Ok(SessionOutcome::Finished);
                }
                Input::Text(text) => text,
            };

            writeln!(output, "\nWaiting for a response... (no time limit)")?;
            output.flush()?;

            match self.client.send_turn(&mut self.conversation, &text).await {
                Ok(reply) => writeln!(output, "\n{}: {reply}", self.options.assistant_label)?,
                Err(e) => {
                    debug!(error = %e, "turn failed");
                    writeln!(output, "\nAn error occurred: {e}")?;
                    writeln!(output, "Please try again.")?;
                }
            }
        }
    }
}
