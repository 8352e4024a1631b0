//! Classification of a raw input line.

/// What a line typed at the prompt means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank or whitespace-only; re-prompt without a turn.
    Empty,
    /// The quit token; end the session.
    Quit,
    /// Text for a new turn, already trimmed.
    Text(String),
}

impl Input {
    /// Classify `line` against `quit_word`.
    ///
    /// The line is trimmed first. The quit comparison ignores case.
    #[must_use]
    pub fn parse(line: &str, quit_word: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            Self::Empty
        } else if text.to_lowercase() == quit_word.trim().to_lowercase() {
            Self::Quit
        } else {
            Self::Text(text.to_owned())
        }
    }
}
