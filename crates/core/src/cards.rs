//! Per-agent result cards.
//!
//! Every pipeline agent has one card holding its latest output. Cards exist
//! for the whole session; an `agent_update` replaces a card's content and
//! makes it the single active card.

use crate::markup::{self, Document};
use tracing::{debug, warn};

/// The pipeline agent roster, in pipeline order. The final report renders
/// into the `Feedback` card.
pub const PIPELINE_AGENTS: &[&str] = &[
    "Clarification Agent",
    "Cognitive Reasoning Agent",
    "Claim Decomposition Agent",
    "Question Generation Agent",
    "Research Agent",
    "Analyst Agent",
    "Argumentation Mining Agent",
    "Drafter Agent",
    "Objectivity Agent",
    "Visualization Agent",
    "Feedback",
];

/// The agent whose card content carries the structured timeline payload.
pub const VISUALIZATION_AGENT: &str = "Visualization Agent";

/// The display name whose card receives the final report.
pub const REPORT_AGENT: &str = "Feedback";

/// Derives a card key from an agent display name: lowercase, spaces to
/// hyphens, `-card` suffix. Pure and total; distinct names that collide
/// are rejected at registry construction, not here.
pub fn card_slug(agent_name: &str) -> String {
    let mut slug = agent_name.to_lowercase().replace(' ', "-");
    slug.push_str("-card");
    slug
}

#[derive(Debug, Clone)]
pub struct AgentCard {
    pub name: String,
    pub slug: String,
    pub active: bool,
    /// Latest parsed content, `None` until the agent first reports.
    pub content: Option<Document>,
}

/// Outcome of an update attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardUpdate {
    /// The named card now holds the content and is the active card.
    Applied { slug: String },
    /// No card for this agent; the update was dropped.
    Ignored,
}

/// The fixed set of agent cards, with at most one active at a time.
#[derive(Debug)]
pub struct CardRegistry {
    cards: Vec<AgentCard>,
    active: Option<usize>,
}

impl CardRegistry {
    /// Builds a registry for the given agent names. A name whose slug
    /// duplicates an earlier one is skipped with a warning so card keys
    /// stay unambiguous.
    pub fn with_agents<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut cards: Vec<AgentCard> = Vec::new();
        for name in names {
            let slug = card_slug(name);
            if cards.iter().any(|c| c.slug == slug) {
                warn!(agent = name, slug, "duplicate card slug, skipping agent");
                continue;
            }
            cards.push(AgentCard {
                name: name.to_string(),
                slug,
                active: false,
                content: None,
            });
        }
        Self {
            cards,
            active: None,
        }
    }

    /// The full pipeline roster.
    pub fn for_pipeline() -> Self {
        Self::with_agents(PIPELINE_AGENTS.iter().copied())
    }

    /// Applies an `agent_update`: parses the markup into the card and moves
    /// activation to it, deactivating whichever card held it before. An
    /// unknown agent is a no-op; the pipeline may emit updates this
    /// client does not visualize.
    pub fn update(&mut self, agent_name: &str, content: &str) -> CardUpdate {
        let slug = card_slug(agent_name);
        let Some(idx) = self.cards.iter().position(|c| c.slug == slug) else {
            debug!(agent = agent_name, slug, "update for agent without a card");
            return CardUpdate::Ignored;
        };

        if let Some(prev) = self.active {
            if prev != idx {
                self.cards[prev].active = false;
            }
        }
        let card = &mut self.cards[idx];
        card.content = Some(markup::parse(content));
        card.active = true;
        self.active = Some(idx);
        CardUpdate::Applied { slug }
    }

    pub fn get(&self, slug: &str) -> Option<&AgentCard> {
        self.cards.iter().find(|c| c.slug == slug)
    }

    pub fn cards(&self) -> &[AgentCard] {
        &self.cards
    }

    /// Slug of the currently active card, if any.
    pub fn active_slug(&self) -> Option<&str> {
        self.active.map(|i| self.cards[i].slug.as_str())
    }
}
