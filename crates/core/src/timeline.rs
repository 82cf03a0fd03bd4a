//! Derives a chronological event timeline from the Visualization Agent's
//! structured output.
//!
//! The agent's card content carries JSON of the form
//! `{"events": [{"date": "YYYY-MM-DD", "type": "...", "title": "..."}]}`.
//! The timeline is recomputed in full on every update and never persisted.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Marker color for one event kind. Fixed lookup; unrecognized kinds fall
/// back to grey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Green,
    Blue,
    Yellow,
    Red,
    Magenta,
    Grey,
}

/// Classification of a timeline event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Claim,
    Subclaim,
    Question,
    Result,
    Analysis,
    Other(String),
}

impl EventKind {
    fn from_wire(kind: &str) -> Self {
        match kind {
            "claim" => Self::Claim,
            "subclaim" => Self::Subclaim,
            "question" => Self::Question,
            "result" => Self::Result,
            "analysis" => Self::Analysis,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn color(&self) -> MarkerColor {
        match self {
            Self::Claim => MarkerColor::Green,
            Self::Subclaim => MarkerColor::Blue,
            Self::Question => MarkerColor::Yellow,
            Self::Result => MarkerColor::Red,
            Self::Analysis => MarkerColor::Magenta,
            Self::Other(_) => MarkerColor::Grey,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub title: String,
}

/// A marker positioned along the horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Column offset in `0..width`.
    pub x: usize,
    pub color: MarkerColor,
    pub title: String,
}

#[derive(Deserialize)]
struct WireTimeline {
    events: Vec<WireEvent>,
}

#[derive(Deserialize)]
struct WireEvent {
    #[serde(default)]
    date: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    title: String,
}

/// The derived timeline: events in arrival order plus the axis domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
    span: (NaiveDate, NaiveDate),
}

impl Timeline {
    /// Parses agent content into a timeline.
    ///
    /// Returns `None` when the content is not JSON with a non-empty
    /// `events` array; the caller keeps any previously derived timeline in
    /// that case. Unparseable dates substitute `today`, with a warning;
    /// the pipeline occasionally emits approximate or malformed dates and
    /// a bad event must not suppress the rest.
    pub fn from_content(content: &str, today: NaiveDate) -> Option<Self> {
        let wire: WireTimeline = match serde_json::from_str(content) {
            Ok(w) => w,
            Err(err) => {
                warn!(%err, "timeline content is not structured event data");
                return None;
            }
        };
        if wire.events.is_empty() {
            return None;
        }

        let events: Vec<TimelineEvent> = wire
            .events
            .into_iter()
            .map(|e| {
                let date = NaiveDate::parse_from_str(&e.date, DATE_FORMAT).unwrap_or_else(|_| {
                    warn!(date = %e.date, title = %e.title, "unparseable event date, using today");
                    today
                });
                TimelineEvent {
                    date,
                    kind: EventKind::from_wire(&e.kind),
                    title: e.title,
                }
            })
            .collect();

        let min = events.iter().map(|e| e.date).min().expect("non-empty");
        let max = events.iter().map(|e| e.date).max().expect("non-empty");
        Some(Self {
            events,
            span: (min, max),
        })
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    /// Axis domain: the earliest and latest event dates.
    pub fn span(&self) -> (NaiveDate, NaiveDate) {
        self.span
    }

    /// Lays events out along a single horizontal axis of `width` columns by
    /// linear date interpolation. With a single distinct date every marker
    /// sits at the origin.
    pub fn layout(&self, width: usize) -> Vec<Marker> {
        let width = width.max(1);
        let (min, max) = self.span;
        let range = (max - min).num_days();
        self.events
            .iter()
            .map(|e| {
                let x = if range == 0 {
                    0
                } else {
                    let offset = (e.date - min).num_days();
                    (offset as usize * (width - 1)) / range as usize
                };
                Marker {
                    x,
                    color: e.kind.color(),
                    title: e.title.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-06-01")
    }

    #[test]
    fn span_covers_min_and_max_regardless_of_order() {
        let content = r#"{"events":[
            {"date":"2024-03-01","type":"claim","title":"a"},
            {"date":"2024-01-15","type":"result","title":"b"},
            {"date":"2024-02-10","type":"question","title":"c"}
        ]}"#;
        let tl = Timeline::from_content(content, today()).unwrap();
        assert_eq!(tl.span(), (date("2024-01-15"), date("2024-03-01")));
        assert_eq!(tl.events().len(), 3);
    }

    #[test]
    fn non_json_content_yields_no_timeline() {
        assert!(Timeline::from_content("## just a report", today()).is_none());
    }

    #[test]
    fn missing_or_empty_events_yield_no_timeline() {
        assert!(Timeline::from_content(r#"{"summary":"x"}"#, today()).is_none());
        assert!(Timeline::from_content(r#"{"events":[]}"#, today()).is_none());
    }

    #[test]
    fn bad_date_falls_back_to_today() {
        let content = r#"{"events":[{"date":"sometime in march","type":"claim","title":"a"}]}"#;
        let tl = Timeline::from_content(content, today()).unwrap();
        assert_eq!(tl.events()[0].date, today());
    }

    #[test]
    fn colors_follow_the_fixed_lookup() {
        assert_eq!(EventKind::Claim.color(), MarkerColor::Green);
        assert_eq!(EventKind::Subclaim.color(), MarkerColor::Blue);
        assert_eq!(EventKind::Question.color(), MarkerColor::Yellow);
        assert_eq!(EventKind::Result.color(), MarkerColor::Red);
        assert_eq!(EventKind::Analysis.color(), MarkerColor::Magenta);
        assert_eq!(EventKind::Other("rumor".into()).color(), MarkerColor::Grey);
    }

    #[test]
    fn layout_is_monotone_in_date() {
        let content = r#"{"events":[
            {"date":"2024-01-01","type":"claim","title":"start"},
            {"date":"2024-01-16","type":"analysis","title":"middle"},
            {"date":"2024-01-31","type":"result","title":"end"}
        ]}"#;
        let tl = Timeline::from_content(content, today()).unwrap();
        let markers = tl.layout(61);
        assert_eq!(markers[0].x, 0);
        assert_eq!(markers[1].x, 30);
        assert_eq!(markers[2].x, 60);
    }

    #[test]
    fn single_date_domain_places_markers_at_origin() {
        let content = r#"{"events":[
            {"date":"2024-01-01","type":"claim","title":"a"},
            {"date":"2024-01-01","type":"result","title":"b"}
        ]}"#;
        let tl = Timeline::from_content(content, today()).unwrap();
        assert!(tl.layout(40).iter().all(|m| m.x == 0));
    }
}
