//! The append-only investigation transcript.

use crate::markup;

/// Styling tag for one transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Text the user typed, echoed back.
    UserInput,
    /// Primary pipeline output.
    BotOutput,
    /// Ephemeral narration while an agent works.
    Thinking,
    /// A visible failure, pipeline-side or client-side.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

/// An append-only log of transcript lines. Lines are never edited or
/// removed once appended.
#[derive(Debug, Default)]
pub struct Transcript {
    lines: Vec<Line>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line, returning its index. Text is sanitized on the way
    /// in since it may originate from the backend.
    pub fn append(&mut self, kind: LineKind, text: impl Into<String>) -> usize {
        self.lines.push(Line {
            kind,
            text: markup::sanitize(&text.into()),
        });
        self.lines.len() - 1
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
