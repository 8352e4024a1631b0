//! Integration tests for the interactive chat session.

#![allow(clippy::unwrap_used)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use converse::prelude::*;

async fn run_session(transport: Arc<MockTransport>, input: &str) -> (SessionOutcome, Conversation, String) {
    let mut session = ChatSession::new(transport, ChatOptions::default());
    let mut output = Vec::new();
    let outcome = session.run(input.as_bytes(), &mut output).await.unwrap();
    (
        outcome,
        session.into_conversation(),
        String::from_utf8(output).unwrap(),
    )
}

fn assert_alternates_from_user(conversation: &Conversation) {
    for (i, message) in conversation.iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(message.role(), expected, "message {i}");
    }
}

#[tokio::test]
async fn test_n_turns_give_2n_alternating_messages() {
    let transport = Arc::new(MockTransport::fixed("ok"));
    let (outcome, conversation, _) =
        run_session(Arc::clone(&transport), "one\ntwo\nthree\nquit\n").await;

    assert_eq!(outcome, SessionOutcome::Finished);
    assert_eq!(conversation.len(), 6);
    assert_alternates_from_user(&conversation);
    assert_eq!(transport.generate_calls(), 3);
}

#[tokio::test]
async fn test_quit_first_ends_with_empty_conversation() {
    let transport = Arc::new(MockTransport::fixed("unused"));
    let (outcome, conversation, output) = run_session(Arc::clone(&transport), "QUIT\n").await;

    assert_eq!(outcome, SessionOutcome::Finished);
    assert!(conversation.is_empty());
    assert_eq!(transport.generate_calls(), 0);
    assert!(output.contains("Ending the conversation."));
}

#[tokio::test]
async fn test_blank_lines_never_reach_transport() {
    let transport = Arc::new(MockTransport::fixed("unused"));
    let (outcome, conversation, _) = run_session(Arc::clone(&transport), "\n   \n\t\nquit\n").await;

    assert_eq!(outcome, SessionOutcome::Finished);
    assert!(conversation.is_empty());
    assert_eq!(transport.generate_calls(), 0);
}

#[tokio::test]
async fn test_failed_turn_keeps_history_and_loop_continues() {
    let transport = Arc::new(
        MockTransport::new()
            .with_response("first reply")
            .with_failure(TransportError::server(503, "model is loading"))
            .with_response("third reply"),
    );
    let mut session = ChatSession::new(Arc::clone(&transport), ChatOptions::default());
    let mut output = Vec::new();

    // Stop right after the failed second turn.
    session.run("one\ntwo\n".as_bytes(), &mut output).await.unwrap();
    assert_eq!(session.conversation().len(), 3);
    assert_eq!(
        session.conversation().last().map(Message::role),
        Some(Role::User)
    );

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("An error occurred: HTTP 503: model is loading"));
    assert!(text.contains("Please try again."));

    // The same session accepts the next turn.
    let mut output = Vec::new();
    let outcome = session.run("three\nquit\n".as_bytes(), &mut output).await.unwrap();
    assert_eq!(outcome, SessionOutcome::Finished);
    assert_eq!(session.conversation().len(), 5);
    assert_eq!(
        transport.prompts().last().unwrap(),
        "user: one\nassistant: first reply\nuser: two\nuser: three"
    );
}

#[tokio::test]
async fn test_unreachable_server_never_generates() {
    let transport = Arc::new(MockTransport::fixed("unused").unreachable());
    let (outcome, conversation, output) = run_session(Arc::clone(&transport), "hello\nquit\n").await;

    assert_eq!(outcome, SessionOutcome::ServerUnavailable);
    assert!(conversation.is_empty());
    assert_eq!(transport.probe_calls(), 1);
    assert_eq!(transport.generate_calls(), 0);
    assert!(output.contains("not running"));
}

#[tokio::test]
async fn test_transcript_is_sent_as_prompt() {
    let transport = Arc::new(MockTransport::new().with_response("B").with_response("D"));
    let (_, _, output) = run_session(Arc::clone(&transport), "A\nC\n").await;

    assert_eq!(transport.prompts(), vec!["user: A", "user: A\nassistant: B\nuser: C"]);
    assert!(output.contains("Assistant: B"));
    assert!(output.contains("Assistant: D"));
}

#[tokio::test]
async fn test_end_of_input_closes_session() {
    let transport = Arc::new(MockTransport::fixed("ok"));
    let (outcome, conversation, _) = run_session(transport, "hello").await;

    assert_eq!(outcome, SessionOutcome::InputClosed);
    assert_eq!(conversation.len(), 2);
}

#[tokio::test]
async fn test_custom_quit_word() {
    let transport = Arc::new(MockTransport::fixed("ok"));
    let mut session = ChatSession::new(transport, ChatOptions::default().quit_word("그만"));
    let mut output = Vec::new();

    let outcome = session.run("quit\n그만\n".as_bytes(), &mut output).await.unwrap();

    assert_eq!(outcome, SessionOutcome::Finished);
    assert_eq!(session.conversation().len(), 2);
    assert!(String::from_utf8(output).unwrap().contains("Type '그만' to quit."));
}

#[tokio::test]
async fn test_invalid_utf8_line_is_skipped() {
    let transport = Arc::new(MockTransport::fixed("ok"));
    let mut session = ChatSession::new(Arc::clone(&transport), ChatOptions::default());
    let mut output = Vec::new();

    let input: &[u8] = b"hello\n\xff\xfe\nagain\nquit\n";
    let outcome = session.run(input, &mut output).await.unwrap();

    assert_eq!(outcome, SessionOutcome::Finished);
    assert_eq!(session.conversation().len(), 4);
    assert_eq!(transport.generate_calls(), 2);
    assert_eq!(transport.prompts()[1], "user: hello\nassistant: ok\nuser: again");
    assert!(String::from_utf8(output).unwrap().contains("Please try again."));
}

/// Shared sink for formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_reported_failures_stay_below_warn_level() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let unreachable = Arc::new(MockTransport::fixed("unused").unreachable());
    let (outcome, _, _) = run_session(unreachable, "hello\n").await;
    assert_eq!(outcome, SessionOutcome::ServerUnavailable);

    let failing = Arc::new(MockTransport::new().with_failure(TransportError::server(500, "boom")));
    let (_, _, output) = run_session(failing, "hello\nquit\n").await;
    assert!(output.contains("An error occurred: HTTP 500: boom"));

    assert!(logs.0.lock().unwrap().is_empty());
}
