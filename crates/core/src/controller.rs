//! The session controller: owns all mutable client state and routes every
//! inbound message to exactly one handler.
//!
//! All state lives in explicit fields here, not in module-level caches.
//! The controller is constructed once at startup and mutated only
//! from the single event loop, so handlers run to completion before the
//! next message is processed.

use crate::{
    cards::{CardRegistry, CardUpdate, REPORT_AGENT, VISUALIZATION_AGENT},
    followup::FollowupSession,
    protocol::{InboundMessage, OutboundMessage},
    timeline::Timeline,
    transcript::{LineKind, Transcript},
};
use tracing::warn;

/// What a dispatch changed, for the renderer. Indices point into the
/// corresponding append-only logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// `transcript.lines()[idx]` is new.
    TranscriptLine(usize),
    /// The card with this slug has fresh content and is now active.
    CardUpdated { slug: String },
    /// The timeline was re-derived and should be redrawn.
    TimelineUpdated,
    /// The follow-up area must be revealed (emitted at most once).
    FollowupOpened,
    /// `followup.turns()[idx]` is new.
    FollowupTurn(usize),
}

/// Owns the transcript, card registry, timeline, and follow-up session for
/// one client session.
#[derive(Debug)]
pub struct SessionController {
    pub transcript: Transcript,
    pub cards: CardRegistry,
    pub timeline: Option<Timeline>,
    pub followup: FollowupSession,
}

impl SessionController {
    pub fn new(cards: CardRegistry) -> Self {
        Self {
            transcript: Transcript::new(),
            cards,
            timeline: None,
            followup: FollowupSession::new(),
        }
    }

    /// Routes one raw channel frame. Total: every input, including
    /// malformed payloads and unknown kinds, maps to a defined outcome and
    /// never panics. Malformed payloads surface as a single error-tagged
    /// transcript line; unknown kinds are a log-only diagnostic.
    pub fn dispatch(&mut self, raw: &str) -> Vec<SessionEvent> {
        let msg = match InboundMessage::parse(raw) {
            Ok(msg) => msg,
            Err(err) => {
                let idx = self
                    .transcript
                    .append(LineKind::Error, format!("Error: {err}"));
                return vec![SessionEvent::TranscriptLine(idx)];
            }
        };

        match msg {
            InboundMessage::Thinking { content } => {
                let idx = self.transcript.append(LineKind::Thinking, content);
                vec![SessionEvent::TranscriptLine(idx)]
            }
            InboundMessage::BotOutput { content } => {
                let idx = self.transcript.append(LineKind::BotOutput, content);
                vec![SessionEvent::TranscriptLine(idx)]
            }
            InboundMessage::AgentUpdate { agent, content } => self.agent_update(&agent, &content),
            InboundMessage::FinalReport { content } => self.final_report(&content),
            InboundMessage::FollowupResponse { content } => {
                let idx = self.followup.append_bot(content);
                vec![SessionEvent::FollowupTurn(idx)]
            }
            InboundMessage::Error { content } => {
                let idx = self
                    .transcript
                    .append(LineKind::Error, format!("Error: {content}"));
                vec![SessionEvent::TranscriptLine(idx)]
            }
            InboundMessage::Unknown { kind } => {
                warn!(kind, "unknown message type from pipeline");
                vec![]
            }
        }
    }

    fn agent_update(&mut self, agent: &str, content: &str) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        match self.cards.update(agent, content) {
            CardUpdate::Applied { slug } => {
                events.push(SessionEvent::CardUpdated { slug });
                if agent == VISUALIZATION_AGENT {
                    // A payload that fails to parse leaves the previous
                    // timeline in place.
                    let today = chrono::Local::now().date_naive();
                    if let Some(timeline) = Timeline::from_content(content, today) {
                        self.timeline = Some(timeline);
                        events.push(SessionEvent::TimelineUpdated);
                    }
                }
            }
            // The registry already logs ignored updates.
            CardUpdate::Ignored => {}
        }
        events
    }

    fn final_report(&mut self, content: &str) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let CardUpdate::Applied { slug } = self.cards.update(REPORT_AGENT, content) {
            events.push(SessionEvent::CardUpdated { slug });
        }
        if self.followup.activate() {
            events.push(SessionEvent::FollowupOpened);
        }
        events
    }

    /// Submits a fresh investigation question. Whitespace-only input is a
    /// no-op. On success the question is echoed into the transcript and the
    /// outbound message returned for the connection to send.
    pub fn submit_question(&mut self, text: &str) -> Option<OutboundMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.transcript.append(LineKind::UserInput, text);
        Some(OutboundMessage::NewQuestion {
            content: text.to_string(),
        })
    }

    /// Submits a follow-up question; see [`FollowupSession::submit`].
    pub fn submit_followup(&mut self, text: &str) -> Option<OutboundMessage> {
        self.followup.submit(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::LineKind;

    fn controller() -> SessionController {
        SessionController::new(CardRegistry::for_pipeline())
    }

    #[test]
    fn dispatch_is_total_over_all_kinds() {
        let mut c = controller();
        let frames = [
            r#"{"type":"thinking","content":"hm"}"#,
            r#"{"type":"bot-output","content":"out"}"#,
            r#"{"type":"agent_update","agent":"Analyst Agent","content":"x"}"#,
            r#"{"type":"final_report","content":"report"}"#,
            r#"{"type":"followup_response","content":"more"}"#,
            r#"{"type":"error","content":"boom"}"#,
            r#"{"type":"never_heard_of_it","content":"x"}"#,
            "garbage that is not json",
        ];
        for frame in frames {
            c.dispatch(frame);
        }
        // thinking + bot-output + error + parse failure
        assert_eq!(c.transcript.len(), 4);
        assert_eq!(c.followup.turns().len(), 1);
        assert!(c.followup.is_active());
    }

    #[test]
    fn malformed_payload_yields_exactly_one_error_line() {
        let mut c = controller();
        let events = c.dispatch("{{{{");
        assert_eq!(events.len(), 1);
        assert_eq!(c.transcript.len(), 1);
        assert_eq!(c.transcript.lines()[0].kind, LineKind::Error);

        // The dispatcher stays alive afterwards.
        c.dispatch(r#"{"type":"thinking","content":"still here"}"#);
        assert_eq!(c.transcript.len(), 2);
    }

    #[test]
    fn unknown_kind_mutates_nothing() {
        let mut c = controller();
        let events = c.dispatch(r#"{"type":"visual_report","content":"x"}"#);
        assert!(events.is_empty());
        assert!(c.transcript.is_empty());
        assert_eq!(c.cards.active_slug(), None);
    }

    #[test]
    fn at_most_one_card_active_after_any_sequence() {
        let mut c = controller();
        for agent in ["Research Agent", "Analyst Agent", "Drafter Agent"] {
            c.dispatch(&format!(
                r#"{{"type":"agent_update","agent":"{agent}","content":"data"}}"#
            ));
        }
        let active = c.cards.cards().iter().filter(|card| card.active).count();
        assert_eq!(active, 1);
        assert_eq!(c.cards.active_slug(), Some("drafter-agent-card"));
    }

    #[test]
    fn visualization_update_derives_the_timeline() {
        let mut c = controller();
        let events = c.dispatch(
            r#"{"type":"agent_update","agent":"Visualization Agent","content":"{\"events\":[{\"date\":\"2024-01-01\",\"type\":\"claim\",\"title\":\"t\"}]}"}"#,
        );
        assert!(events.contains(&SessionEvent::TimelineUpdated));
        assert!(c.timeline.is_some());
    }

    #[test]
    fn bad_timeline_payload_keeps_the_previous_timeline() {
        let mut c = controller();
        c.dispatch(
            r#"{"type":"agent_update","agent":"Visualization Agent","content":"{\"events\":[{\"date\":\"2024-01-01\",\"type\":\"claim\",\"title\":\"t\"}]}"}"#,
        );
        let before = c.timeline.clone();
        let events = c.dispatch(
            r#"{"type":"agent_update","agent":"Visualization Agent","content":"plain prose, no events"}"#,
        );
        assert!(!events.contains(&SessionEvent::TimelineUpdated));
        assert_eq!(c.timeline, before);
    }

    #[test]
    fn final_report_opens_followup_exactly_once() {
        let mut c = controller();
        let first = c.dispatch(r##"{"type":"final_report","content":"# Report"}"##);
        assert!(first.contains(&SessionEvent::FollowupOpened));
        assert!(
            first
                .iter()
                .any(|e| matches!(e, SessionEvent::CardUpdated { slug } if slug == "feedback-card"))
        );

        let second = c.dispatch(r##"{"type":"final_report","content":"# Report again"}"##);
        assert!(!second.contains(&SessionEvent::FollowupOpened));
    }

    #[test]
    fn empty_question_produces_no_message_and_no_line() {
        let mut c = controller();
        assert_eq!(c.submit_question("   "), None);
        assert!(c.transcript.is_empty());
    }

    #[test]
    fn end_to_end_question_flow() {
        let mut c = controller();

        // User asks a question: one echoed transcript line plus the message.
        let msg = c.submit_question("Is X true?").unwrap();
        assert_eq!(
            msg,
            OutboundMessage::NewQuestion {
                content: "Is X true?".into()
            }
        );
        assert_eq!(c.transcript.lines()[0].kind, LineKind::UserInput);
        assert_eq!(c.transcript.lines()[0].text, "Is X true?");

        // An agent reports in: its card activates with rendered content.
        let mut c = SessionController::new(CardRegistry::with_agents(["Fact Checker"]));
        c.dispatch(r###"{"type":"agent_update","agent":"Fact Checker","content":"## Verdict"}"###);
        let card = c.cards.get("fact-checker-card").unwrap();
        assert!(card.active);
        assert!(card.content.is_some());

        // Final report: feedback card would activate and follow-up opens once.
        let events = c.dispatch(r#"{"type":"final_report","content":"done"}"#);
        assert!(events.contains(&SessionEvent::FollowupOpened));
        assert!(c.followup.is_active());
    }
}
