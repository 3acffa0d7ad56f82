//! Split a model's free-text reply into labeled plan sections.
//!
//! The completion API is asked to echo one header per section ("Restaurants:",
//! "Breakfast:", ...). Models mostly comply, so the primary path anchors on
//! those headers. When a reply contains none of them the text is divided
//! positionally on blank-line boundaries instead. Both paths degrade to empty
//! item lists rather than failing; callers decide whether an all-empty plan
//! is worth reporting.

use serde::Serialize;
use tracing::trace;

/// Section labels used when `PLAN_SECTIONS` is not configured, in display order.
pub const DEFAULT_LABELS: [&str; 4] = ["Restaurants", "Breakfast", "Dinner", "Workouts"];

/// One labeled run of items, in the order they appeared in the reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: String,
    pub items: Vec<String>,
}

/// The fully split plan. Every configured label is present; an empty item
/// list means nothing could be parsed for that section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedPlan {
    pub sections: Vec<Section>,
}

impl ParsedPlan {
    /// Items for a label, matched case-insensitively.
    pub fn items(&self, label: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|s| s.label.eq_ignore_ascii_case(label))
            .map(|s| s.items.as_slice())
    }

    /// True when no section produced a single item.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
///
/// ASCII-only case folding; a match of an ASCII needle can never start in the
/// middle of a multi-byte character, so the offset is always a valid slice
/// boundary.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Locate each label's header (`<label>:`) in the reply.
///
/// Returns one entry per label, parallel to `labels`: the byte offset of the
/// first occurrence, or `None` when the header never appears. Only the first
/// match per label is ever used.
pub fn locate_headers(text: &str, labels: &[String]) -> Vec<Option<usize>> {
    labels
        .iter()
        .map(|label| find_ci(text, &format!("{label}:")))
        .collect()
}

/// Cut the reply into one substring per label using located headers.
///
/// Each found section runs from just past its own header to the next found
/// header (in offset order, declaration order breaking ties), or to the end
/// of the text. Labels without a header map to the empty string.
pub fn slice_sections(text: &str, labels: &[String], positions: &[Option<usize>]) -> Vec<String> {
    let mut found: Vec<(usize, usize)> = positions
        .iter()
        .enumerate()
        .filter_map(|(idx, pos)| pos.map(|off| (off, idx)))
        .collect();
    found.sort_unstable();

    let mut sections = vec![String::new(); labels.len()];
    for (k, &(off, idx)) in found.iter().enumerate() {
        let start = (off + labels[idx].len() + 1).min(text.len());
        let end = found.get(k + 1).map_or(text.len(), |&(next, _)| next);
        if start < end {
            sections[idx] = text[start..end].to_string();
        }
    }
    sections
}

/// Strip a leading bullet marker or numbering, then surrounding whitespace.
fn strip_marker(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_whitespace() || c.is_ascii_digit() || matches!(c, '-' | '*' | '•' | '.' | ')' | ':')
    })
    .trim()
}

/// Split one section's text into clean item strings.
///
/// Lines are stripped of bullet markers and numbering and dropped when empty.
/// A single surviving line containing commas is treated as a comma-separated
/// list instead, which recovers replies like `"A, B, C"` on one line. Order
/// and duplicates are preserved.
pub fn itemize(section: &str) -> Vec<String> {
    let lines: Vec<&str> = section
        .lines()
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .collect();

    if let [only] = lines.as_slice() {
        if only.contains(',') {
            return only
                .split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    lines.into_iter().map(str::to_string).collect()
}

/// Split text into maximal runs of non-blank lines.
fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    chunks
}

/// Assign blank-line chunks to labels when no header was found.
///
/// With at least as many chunks as labels, the first N-1 chunks map one to
/// one and everything left over collapses into the final label. With fewer
/// chunks they are integer-divided into N contiguous groups, remainder to
/// the final group.
fn assign_chunks(chunks: Vec<String>, label_count: usize) -> Vec<String> {
    if label_count == 0 {
        return Vec::new();
    }
    if chunks.is_empty() {
        return vec![String::new(); label_count];
    }

    let mut assigned = Vec::with_capacity(label_count);
    if chunks.len() >= label_count {
        assigned.extend(chunks[..label_count - 1].iter().cloned());
        assigned.push(chunks[label_count - 1..].join("\n"));
    } else {
        let group_size = chunks.len() / label_count;
        let mut idx = 0;
        for _ in 0..label_count - 1 {
            assigned.push(chunks[idx..idx + group_size].join("\n"));
            idx += group_size;
        }
        assigned.push(chunks[idx..].join("\n"));
    }
    assigned
}

/// Partition a reply into a [`ParsedPlan`] for the given labels.
///
/// Header-anchored when at least one header is present, positional fallback
/// when none are. Never panics and never errors; unparseable input yields
/// empty item lists.
pub fn extract(text: &str, labels: &[String]) -> ParsedPlan {
    let positions = locate_headers(text, labels);
    let header_count = positions.iter().flatten().count();
    trace!(header_count, labels = labels.len(), "Locating section headers");

    let bodies = if header_count > 0 {
        slice_sections(text, labels, &positions)
    } else {
        assign_chunks(split_chunks(text), labels.len())
    };

    ParsedPlan {
        sections: labels
            .iter()
            .zip(bodies)
            .map(|(label, body)| Section {
                label: label.clone(),
                items: itemize(&body),
            })
            .collect(),
    }
}
