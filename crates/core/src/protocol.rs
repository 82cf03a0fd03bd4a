//! Defines the JSON message protocol between the client and the analysis pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw shape of every frame the pipeline sends, before classification.
#[derive(Deserialize, Debug)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: String,
    agent: Option<String>,
}

/// Errors raised while decoding an inbound frame.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed message payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("`agent_update` message is missing its `agent` field")]
    MissingAgent,
}

/// Messages sent from the pipeline to the client, classified by the `type`
/// discriminator.
///
/// Classification is total: a frame with an unrecognized discriminator
/// becomes [`InboundMessage::Unknown`] rather than an error, so the
/// dispatcher can log it and move on.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Ephemeral narration while an agent works.
    Thinking { content: String },
    /// A primary output line for the transcript.
    BotOutput { content: String },
    /// New content for one agent's result card.
    AgentUpdate { agent: String, content: String },
    /// The completed report; unlocks the follow-up session.
    FinalReport { content: String },
    /// A bot turn in the follow-up conversation.
    FollowupResponse { content: String },
    /// A pipeline-side error to surface in the transcript.
    Error { content: String },
    /// Any discriminator this client does not know.
    Unknown { kind: String },
}

impl InboundMessage {
    /// Parses one text frame from the channel.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let wire: WireMessage = serde_json::from_str(raw)?;
        Ok(match wire.kind.as_str() {
            "thinking" => Self::Thinking {
                content: wire.content,
            },
            "bot-output" => Self::BotOutput {
                content: wire.content,
            },
            "agent_update" => Self::AgentUpdate {
                agent: wire.agent.ok_or(ProtocolError::MissingAgent)?,
                content: wire.content,
            },
            "final_report" => Self::FinalReport {
                content: wire.content,
            },
            "followup_response" => Self::FollowupResponse {
                content: wire.content,
            },
            "error" => Self::Error {
                content: wire.content,
            },
            _ => Self::Unknown { kind: wire.kind },
        })
    }
}

/// Messages sent from the client to the pipeline.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Starts a fresh investigation of the given statement.
    NewQuestion { content: String },
    /// A follow-up question grounded in the completed report.
    Followup { content: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_kind() {
        let cases = [
            (r#"{"type":"thinking","content":"hm"}"#, "thinking"),
            (r#"{"type":"bot-output","content":"out"}"#, "bot-output"),
            (
                r#"{"type":"agent_update","agent":"Analyst Agent","content":"x"}"#,
                "agent_update",
            ),
            (r#"{"type":"final_report","content":"done"}"#, "final_report"),
            (
                r#"{"type":"followup_response","content":"more"}"#,
                "followup_response",
            ),
            (r#"{"type":"error","content":"boom"}"#, "error"),
        ];
        for (raw, kind) in cases {
            let msg = InboundMessage::parse(raw).unwrap();
            let matched = match (&msg, kind) {
                (InboundMessage::Thinking { .. }, "thinking") => true,
                (InboundMessage::BotOutput { .. }, "bot-output") => true,
                (InboundMessage::AgentUpdate { .. }, "agent_update") => true,
                (InboundMessage::FinalReport { .. }, "final_report") => true,
                (InboundMessage::FollowupResponse { .. }, "followup_response") => true,
                (InboundMessage::Error { .. }, "error") => true,
                _ => false,
            };
            assert!(matched, "{raw} classified as {msg:?}");
        }
    }

    #[test]
    fn unknown_kind_is_not_an_error() {
        let msg = InboundMessage::parse(r#"{"type":"visual_report","content":"x"}"#).unwrap();
        assert_eq!(
            msg,
            InboundMessage::Unknown {
                kind: "visual_report".into()
            }
        );
    }

    #[test]
    fn agent_update_requires_agent_field() {
        let err = InboundMessage::parse(r#"{"type":"agent_update","content":"x"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingAgent));
    }

    #[test]
    fn malformed_payload_is_a_protocol_error() {
        let err = InboundMessage::parse("not json at all").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed(_)));
    }

    #[test]
    fn missing_content_defaults_to_empty() {
        let msg = InboundMessage::parse(r#"{"type":"thinking"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Thinking { content: String::new() });
    }

    #[test]
    fn outbound_wire_format_is_stable() {
        let question = OutboundMessage::NewQuestion {
            content: "Is X true?".into(),
        };
        assert_eq!(
            serde_json::to_string(&question).unwrap(),
            r#"{"type":"new_question","content":"Is X true?"}"#
        );

        let followup = OutboundMessage::Followup {
            content: "And Y?".into(),
        };
        assert_eq!(
            serde_json::to_string(&followup).unwrap(),
            r#"{"type":"followup","content":"And Y?"}"#
        );
    }
}
