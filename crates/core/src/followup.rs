//! The follow-up question mode, unlocked once the final report arrives.

use crate::{markup, protocol::OutboundMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

/// The follow-up conversation. Starts absent; `activate` is a one-way,
/// idempotent transition. Turns are append-only.
#[derive(Debug, Default)]
pub struct FollowupSession {
    active: bool,
    turns: Vec<Turn>,
}

impl FollowupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates the session. Returns `true` only on the first call so the
    /// caller reveals the input area exactly once.
    pub fn activate(&mut self) -> bool {
        !std::mem::replace(&mut self.active, true)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Submits a user follow-up. Whitespace-only input is ignored, as is
    /// any submission before activation. On success the user turn is
    /// recorded and the outbound message returned for the connection to
    /// send; this module never writes to the channel itself.
    pub fn submit(&mut self, text: &str) -> Option<OutboundMessage> {
        if !self.active {
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.turns.push(Turn {
            speaker: Speaker::User,
            text: text.to_string(),
        });
        Some(OutboundMessage::Followup {
            content: text.to_string(),
        })
    }

    /// Appends a bot turn, returning its index. Bot text is sanitized on
    /// the way in since it originates from the backend.
    pub fn append_bot(&mut self, text: impl Into<String>) -> usize {
        self.turns.push(Turn {
            speaker: Speaker::Bot,
            text: markup::sanitize(&text.into()),
        });
        self.turns.len() - 1
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}
