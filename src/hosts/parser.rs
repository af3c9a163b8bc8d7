//! Line-oriented hosts file parser.
//!
//! Parsing is permissive: anything that does not look like `IP domain` is
//! classified as [`Line::Other`] and dropped by [`parse`].

use crate::entry::{EntryId, HostEntry};
use crate::validate::looks_like_ip;

use super::{COMMENT_MARKER, MANAGED_HEADER};

/// Classification of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    /// One of the managed header lines.
    Header,
    Entry(HostEntry),
    /// Free-standing comment or unparseable text, kept verbatim.
    Other(String),
}

/// Parse file text into entries, in physical order.
pub fn parse(text: &str) -> Vec<HostEntry> {
    parse_lines(text)
        .into_iter()
        .filter_map(|line| match line {
            Line::Entry(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// Classify every physical line. Index in the result equals the line index.
pub fn parse_lines(text: &str) -> Vec<Line> {
    text.split('\n')
        .enumerate()
        .map(|(index, raw)| classify(index, raw))
        .collect()
}

fn classify(index: usize, raw: &str) -> Line {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if MANAGED_HEADER.contains(&trimmed) {
        return Line::Header;
    }
    match parse_entry(index, trimmed) {
        Some(entry) => Line::Entry(entry),
        None => Line::Other(raw.to_string()),
    }
}

fn parse_entry(index: usize, trimmed: &str) -> Option<HostEntry> {
    let disabled = trimmed.starts_with(COMMENT_MARKER);
    let logical = if disabled {
        trimmed[COMMENT_MARKER.len_utf8()..].trim()
    } else {
        trimmed
    };

    let (content, project_tag) = split_project_tag(logical);

    let mut tokens = content.split_whitespace();
    let ip = tokens.next()?;
    let domain = tokens.next()?;
    let rest: Vec<&str> = tokens.collect();
    let comment = strip_comment_marker(&rest.join(" "));

    if !looks_like_ip(ip) {
        return None;
    }

    Some(HostEntry {
        id: EntryId::new(),
        ip: ip.to_string(),
        domain: domain.to_string(),
        project_tag,
        comment,
        enabled: !disabled,
        source_line: Some(index),
    })
}

/// Split a trailing `[Tag]` off the content. The tag must be non-empty and the last thing on the line.
///
/// The tag opens at the first `[` after the last `]` inside it, so `a [b [c]` yields `b [c`.
fn split_project_tag(content: &str) -> (&str, Option<String>) {
    let Some(inner) = content.strip_suffix(']') else {
        return (content, None);
    };
    let floor = inner.rfind(']').map_or(0, |i| i + 1);
    let Some(open) = inner[floor..].find('[').map(|i| floor + i) else {
        return (content, None);
    };
    let tag = &inner[open + 1..];
    if tag.is_empty() {
        return (content, None);
    }
    (content[..open].trim(), Some(tag.to_string()))
}

fn strip_comment_marker(s: &str) -> String {
    match s.strip_prefix(COMMENT_MARKER) {
        Some(rest) => rest.trim_start().to_string(),
        None => s.to_string(),
    }
}
