//! Maps core session state to ANSI terminal output.
//!
//! Every function here is pure string construction; `main` does the actual
//! printing. Content reaching this module has already been sanitized by the
//! core, so styling is the only concern.

use claimlens_core::{
    SessionController, SessionEvent,
    cards::AgentCard,
    followup::{Speaker, Turn},
    markup::{Block, Document, Span, SpanStyle},
    timeline::{MarkerColor, Timeline},
    transcript::{Line, LineKind},
};
use colored::{ColoredString, Colorize};

/// Columns available to the timeline axis.
const TIMELINE_WIDTH: usize = 60;

/// Renders everything a batch of dispatch events made visible.
pub fn apply(controller: &SessionController, events: &[SessionEvent]) -> String {
    let mut out = String::new();
    for event in events {
        match event {
            SessionEvent::TranscriptLine(idx) => {
                out.push_str(&transcript_line(&controller.transcript.lines()[*idx]));
                out.push('\n');
            }
            SessionEvent::CardUpdated { slug } => {
                if let Some(card) = controller.cards.get(slug) {
                    out.push_str(&card_block(card));
                }
            }
            SessionEvent::TimelineUpdated => {
                if let Some(tl) = &controller.timeline {
                    out.push_str(&timeline_block(tl));
                }
            }
            SessionEvent::FollowupOpened => {
                out.push_str(&followup_banner());
            }
            SessionEvent::FollowupTurn(idx) => {
                out.push_str(&followup_turn(&controller.followup.turns()[*idx]));
                out.push('\n');
            }
        }
    }
    out
}

pub fn transcript_line(line: &Line) -> String {
    match line.kind {
        LineKind::UserInput => format!("{} {}", ">".bold(), line.text),
        LineKind::BotOutput => line.text.green().to_string(),
        LineKind::Thinking => format!("… {}", line.text).dimmed().to_string(),
        LineKind::Error => line.text.red().bold().to_string(),
    }
}

pub fn followup_turn(turn: &Turn) -> String {
    match turn.speaker {
        Speaker::User => format!("{} {}", ">".bold(), turn.text),
        Speaker::Bot => turn.text.green().to_string(),
    }
}

pub fn followup_banner() -> String {
    format!(
        "\n{}\n{}\n",
        "── Follow-up ─────────────────────────".cyan().bold(),
        "Ask follow-up questions about the report.".dimmed()
    )
}

/// A card header plus its latest rendered content.
pub fn card_block(card: &AgentCard) -> String {
    let header = if card.active {
        format!("── {} ──", card.name).cyan().bold()
    } else {
        format!("── {} ──", card.name).dimmed()
    };
    let mut out = format!("\n{header}\n");
    if let Some(doc) = &card.content {
        out.push_str(&document(doc));
    }
    out
}

pub fn document(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.blocks {
        match block {
            Block::Heading { level, spans } => {
                let text = spans_plain(spans);
                if *level <= 2 {
                    out.push_str(&format!("{}\n", text.bold().underline()));
                } else {
                    out.push_str(&format!("{}\n", text.bold()));
                }
            }
            Block::Bullet { spans } => {
                out.push_str(&format!("  • {}\n", spans_styled(spans)));
            }
            Block::Paragraph { spans } => {
                out.push_str(&format!("{}\n", spans_styled(spans)));
            }
        }
    }
    out
}

fn spans_plain(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn spans_styled(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| match s.style {
            SpanStyle::Plain => s.text.clone(),
            SpanStyle::Strong => s.text.bold().to_string(),
            SpanStyle::Emphasis => s.text.italic().to_string(),
            SpanStyle::Code => s.text.yellow().to_string(),
        })
        .collect()
}

/// The timeline: one axis row with colored markers, tick labels for the
/// domain endpoints, and a legend of event titles (the terminal stand-in
/// for hover tooltips).
pub fn timeline_block(tl: &Timeline) -> String {
    let markers = tl.layout(TIMELINE_WIDTH);

    let mut cells: Vec<Option<MarkerColor>> = vec![None; TIMELINE_WIDTH];
    for marker in &markers {
        cells[marker.x.min(TIMELINE_WIDTH - 1)] = Some(marker.color);
    }
    let axis: String = cells
        .iter()
        .map(|cell| match cell {
            Some(color) => paint('●', *color).to_string(),
            None => "─".dimmed().to_string(),
        })
        .collect();

    let (min, max) = tl.span();
    let min = min.format("%Y-%m-%d").to_string();
    let max = max.format("%Y-%m-%d").to_string();
    let gap = TIMELINE_WIDTH.saturating_sub(min.len() + max.len());
    let ticks = format!("{}{}{}", min, " ".repeat(gap), max);

    let mut out = format!(
        "\n{}\n{axis}\n{}\n",
        "── Timeline ──────────────────────────".cyan().bold(),
        ticks.dimmed()
    );
    for event in tl.events() {
        out.push_str(&format!(
            "  {} {}  {}\n",
            paint('●', event.kind.color()),
            event.date.format("%Y-%m-%d").to_string().dimmed(),
            event.title
        ));
    }
    out
}

fn paint(c: char, color: MarkerColor) -> ColoredString {
    let s = c.to_string();
    match color {
        MarkerColor::Green => s.green(),
        MarkerColor::Blue => s.blue(),
        MarkerColor::Yellow => s.yellow(),
        MarkerColor::Red => s.red(),
        MarkerColor::Magenta => s.magenta(),
        MarkerColor::Grey => s.bright_black(),
    }
}
