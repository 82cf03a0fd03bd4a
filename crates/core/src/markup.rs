//! A small parser for the lightweight markup the pipeline emits.
//!
//! Agent and report content arrives as text markup (headings, bullet lists,
//! emphasis), not as anything renderable directly. This module turns it into
//! a structured [`Document`] that the console can style, and strips control
//! characters first so backend-echoed user text cannot smuggle terminal
//! escape sequences into the output.

/// A parsed markup document: a flat list of blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// An ATX heading; `level` is clamped to 1..=6.
    Heading { level: u8, spans: Vec<Span> },
    /// One item of an unordered list (`-` or `*` prefix).
    Bullet { spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanStyle {
    Plain,
    /// `**text**`
    Strong,
    /// `*text*`
    Emphasis,
    /// `` `text` ``
    Code,
}

impl Span {
    fn new(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Removes ASCII control characters except newline and tab.
///
/// Content originates from the backend pipeline and may echo user text, so
/// it is never trusted to be free of escape sequences.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Parses markup into a [`Document`]. Total: any input yields a document.
pub fn parse(input: &str) -> Document {
    let clean = sanitize(input);
    let mut blocks = Vec::new();
    for line in clean.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(block) = heading(trimmed) {
            blocks.push(block);
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            blocks.push(Block::Bullet {
                spans: parse_inline(item.trim_start()),
            });
        } else {
            blocks.push(Block::Paragraph {
                spans: parse_inline(trimmed),
            });
        }
    }
    Document { blocks }
}

fn heading(line: &str) -> Option<Block> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = line[hashes..].strip_prefix(' ')?;
    Some(Block::Heading {
        level: hashes as u8,
        spans: parse_inline(rest.trim()),
    })
}

/// Splits a line into styled spans. Unterminated markers are literal text.
fn parse_inline(line: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let (marker, style): (&str, SpanStyle) = if chars[i..].starts_with(&['*', '*']) {
            ("**", SpanStyle::Strong)
        } else if chars[i] == '*' {
            ("*", SpanStyle::Emphasis)
        } else if chars[i] == '`' {
            ("`", SpanStyle::Code)
        } else {
            plain.push(chars[i]);
            i += 1;
            continue;
        };

        let start = i + marker.chars().count();
        match find_close(&chars, start, marker) {
            Some(end) if end > start => {
                if !plain.is_empty() {
                    spans.push(Span::new(std::mem::take(&mut plain), SpanStyle::Plain));
                }
                let inner: String = chars[start..end].iter().collect();
                spans.push(Span::new(inner, style));
                i = end + marker.chars().count();
            }
            _ => {
                // No closing marker (or empty run): keep the characters as-is.
                plain.push(chars[i]);
                i += 1;
            }
        }
    }

    if !plain.is_empty() {
        spans.push(Span::new(plain, SpanStyle::Plain));
    }
    spans
}

fn find_close(chars: &[char], from: usize, marker: &str) -> Option<usize> {
    let needle: Vec<char> = marker.chars().collect();
    let mut i = from;
    while i + needle.len() <= chars.len() {
        if chars[i..i + needle.len()] == needle[..] {
            return Some(i);
        }
        i += 1;
    }
    None
}
