//! Payload protection across Markdown serialization
//!
//! Protects the LaTeX and callout text injected by the preprocessing passes
//! from htmd. Left as plain text, htmd would escape it (`\frac` → `\\frac`,
//! `x_1` → `x\_1`) and collapse its newlines, so display math and callout
//! fences would merge into the surrounding paragraph.
//!
//! Strategy:
//! 1. Swap each injected text node's content for a letters-and-digits token
//! 2. Let htmd convert the document; tokens pass through untouched
//! 3. Put the original payloads back into the Markdown, line by line, so a
//!    block payload inherits the blockquote or list container htmd put
//!    its token in

use kuchiki::NodeRef;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use super::dom::is_attached;
use crate::utils::{PAYLOAD_TOKEN_PREFIX, PAYLOAD_TOKEN_SUFFIX};

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[*+-]|\d{1,9}[.)]) +").expect("LIST_MARKER: hardcoded regex is valid")
});

/// Protected payload storage
#[derive(Debug)]
pub struct PayloadProtector {
    /// Token prefix, absent from the document being converted
    prefix: String,
    /// Maps placeholder token to original payload, in protection order
    payloads: Vec<(String, String)>,
    /// Counter for generating unique placeholders
    counter: usize,
}

impl Default for PayloadProtector {
    fn default() -> Self {
        Self {
            prefix: PAYLOAD_TOKEN_PREFIX.to_string(),
            payloads: Vec::new(),
            counter: 0,
        }
    }
}

impl PayloadProtector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Protector whose tokens cannot collide with anything in `document_html`.
    ///
    /// The prefix is extended until `document_html` no longer contains it, so
    /// restoring never rewrites text that was already in the source.
    #[must_use]
    pub fn avoiding(document_html: &str) -> Self {
        let mut prefix = PAYLOAD_TOKEN_PREFIX.to_string();
        while document_html.contains(&prefix) {
            prefix.push('X');
        }
        Self {
            prefix,
            ..Self::default()
        }
    }

    /// Replace the content of every attached text node in `nodes` with a token.
    ///
    /// Nodes that no longer hang off the document (for example math inside a
    /// question span that became a callout) are skipped: their text already
    /// lives inside another payload.
    pub fn protect(&mut self, nodes: &[NodeRef]) {
        for node in nodes {
            let Some(text) = node.as_text() else {
                continue;
            };
            if !is_attached(node) {
                continue;
            }

            let token = format!("{}{}{PAYLOAD_TOKEN_SUFFIX}", self.prefix, self.counter);
            self.counter += 1;

            let payload = text.replace(token.clone());
            self.payloads.push((token, payload));
        }
    }

    /// Number of payloads currently protected
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Restore original payloads from their tokens in `markdown`.
    ///
    /// - Inline payloads keep the spacing htmd laid out around the token.
    /// - Block payloads (those starting with a newline: display math,
    ///   callouts) go on their own lines, each carrying the blockquote
    ///   markers and list indentation of the line the token sat on.
    /// - On a table row every payload is flattened to one line with `|`
    ///   escaped, so the row keeps its cells.
    #[must_use]
    pub fn restore(&self, markdown: &str) -> String {
        if self.payloads.is_empty() {
            return markdown.to_string();
        }

        let lookup: HashMap<&str, &str> = self
            .payloads
            .iter()
            .map(|(token, payload)| (token.as_str(), payload.as_str()))
            .collect();

        let pattern = format!(
            r"[ \t]*{}\d+{PAYLOAD_TOKEN_SUFFIX}[ \t]*",
            regex::escape(&self.prefix)
        );
        let token_re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!("Payload token pattern failed to compile: {e}");
                return markdown.to_string();
            }
        };

        let mut restored = 0;
        let mut lines: Vec<String> = Vec::new();
        for line in markdown.split('\n') {
            if token_re.is_match(line) {
                restored += restore_line(line, &token_re, &lookup, &mut lines);
            } else {
                lines.push(line.to_string());
            }
        }

        if restored < self.payloads.len() {
            tracing::warn!(
                "Restored {} of {} protected payloads; the rest did not survive Markdown conversion",
                restored,
                self.payloads.len()
            );
        }

        lines.join("\n")
    }
}

/// Restore every known token on one Markdown line, pushing the resulting
/// line(s) to `out`. Returns how many payloads were restored.
fn restore_line(
    line: &str,
    token_re: &Regex,
    lookup: &HashMap<&str, &str>,
    out: &mut Vec<String>,
) -> usize {
    let table_row = line.trim_start().starts_with('|');
    let (marker_len, container) = container_prefix(line);
    let blank = container.trim_end().to_string();

    let mut current = String::new();
    // Bytes of `current` that are container markup rather than content
    let mut bare_len = marker_len;
    let mut last_end = 0;
    let mut had_block = false;
    let mut restored = 0;

    for found in token_re.find_iter(line) {
        let full_match = found.as_str();
        let token = full_match.trim_matches([' ', '\t']);
        let Some(payload) = lookup.get(token) else {
            continue;
        };
        restored += 1;

        current.push_str(&line[last_end..found.start()]);
        last_end = found.end();

        let leading = &full_match[..full_match.len() - full_match.trim_start_matches([' ', '\t']).len()];
        let trailing = &full_match[full_match.trim_end_matches([' ', '\t']).len()..];

        if table_row {
            current.push_str(leading);
            current.push_str(&table_cell_payload(payload));
            current.push_str(trailing);
        } else if payload.starts_with('\n') {
            let body: Vec<&str> = payload.trim_matches('\n').split('\n').collect();
            current.push_str(leading);
            let opener = if current.get(bare_len..).is_some_and(|rest| rest.trim().is_empty()) {
                // Token opens the line: the block takes over the list marker
                current.get(..bare_len).unwrap_or_default().to_string()
            } else {
                out.push(current.trim_end().to_string());
                out.push(blank.clone());
                container.clone()
            };

            for (i, body_line) in body.iter().enumerate() {
                let prefix = if i == 0 { &opener } else { &container };
                if body_line.is_empty() {
                    out.push(prefix.trim_end().to_string());
                } else {
                    out.push(format!("{prefix}{body_line}"));
                }
            }
            out.push(blank.clone());

            current = container.clone();
            bare_len = container.len();
            had_block = true;
        } else {
            current.push_str(leading);
            current.push_str(payload);
            current.push_str(trailing);
        }
    }

    current.push_str(&line[last_end..]);
    let only_container = current.get(bare_len..).is_some_and(|rest| rest.trim().is_empty());
    if !(had_block && only_container) {
        out.push(current);
    }
    restored
}

/// Split off the container markup at the start of a Markdown line.
///
/// Returns the byte length of that markup and the prefix that continues
/// the same container on a following line: blockquote markers as they
/// are, a list marker turned into indentation of equal width.
fn container_prefix(line: &str) -> (usize, String) {
    let bytes = line.as_bytes();
    let mut i = 0;
    let mut container = String::new();

    loop {
        while bytes.get(i) == Some(&b' ') {
            container.push(' ');
            i += 1;
        }
        if bytes.get(i) == Some(&b'>') {
            container.push('>');
            i += 1;
            if bytes.get(i) == Some(&b' ') {
                container.push(' ');
                i += 1;
            }
            continue;
        }
        break;
    }

    if let Some(marker) = LIST_MARKER.find(&line[i..]) {
        container.push_str(&" ".repeat(marker.len()));
        i += marker.len();
    }

    (i, container)
}

/// A payload as it may appear inside a GFM table cell.
fn table_cell_payload(payload: &str) -> String {
    payload
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
