//! Whitespace normalization for converted Markdown.
//!
//! Tidies what htmd and payload restoration leave behind (runs of blank
//! lines around callouts and display math, trailing spaces) while keeping
//! fenced regions byte for byte.

use super::code_fence_detection::{CodeFence, detect_code_fence, is_math_fence};

/// A fenced region whose lines pass through untouched
#[derive(Debug, Clone, Copy)]
enum OpenFence {
    /// ``` or ~~~ block, including callouts
    Code(CodeFence),
    /// `$$` display-math block
    Math { line_number: usize },
}

/// Normalize whitespace in markdown content
///
/// # Normalization Rules
///
/// 1. **Trailing Whitespace**: Removed from all lines outside fenced regions,
///    except a hard line break (two or more spaces) followed by more text on
///    the next line, which is kept as exactly two spaces
/// 2. **Consecutive Blank Lines**: Collapsed to a single blank line
/// 3. **Fenced Regions**: Code fences, callouts and `$$` blocks are kept
///    exactly, interior blank lines included
/// 4. **Document Edges**: Leading/trailing blank lines removed; non-empty
///    output ends with one newline
///
/// # Examples
///
/// ```rust
/// # use transcript_md::content_saver::markdown_converter::normalize_markdown_whitespace;
/// let input = "Intro\t\n\n\n\n$$\nx=1\n\n\ny=2\n$$\n\n\nEnd";
/// assert_eq!(
///     normalize_markdown_whitespace(input),
///     "Intro\n\n$$\nx=1\n\n\ny=2\n$$\n\nEnd\n"
/// );
/// ```
#[must_use]
pub fn normalize_markdown_whitespace(markdown: &str) -> String {
    let mut result: Vec<&str> = Vec::new();
    let mut open_fence: Option<OpenFence> = None;
    // Last pushed line is prose ending in a kept hard break
    let mut pending_break = false;

    for (i, line) in markdown.lines().enumerate() {
        match open_fence {
            Some(OpenFence::Code(fence)) => {
                if let Some((fence_char, fence_count)) = detect_code_fence(line)
                    && fence_char == fence.char
                    && fence_count >= fence.count
                    && line.trim_start()[fence_count..].trim().is_empty()
                {
                    open_fence = None;
                }
                result.push(line);
                continue;
            }
            Some(OpenFence::Math { .. }) => {
                if is_math_fence(line) {
                    open_fence = None;
                }
                result.push(line);
                continue;
            }
            None => {}
        }

        if let Some((fence_char, fence_count)) = detect_code_fence(line) {
            drop_hard_break(&mut result, &mut pending_break);
            open_fence = Some(OpenFence::Code(CodeFence {
                char: fence_char,
                count: fence_count,
                line_number: i,
            }));
            result.push(line.trim_end());
            continue;
        }

        if is_math_fence(line) {
            drop_hard_break(&mut result, &mut pending_break);
            open_fence = Some(OpenFence::Math { line_number: i });
            result.push(line.trim_end());
            continue;
        }

        if line.trim().is_empty() {
            drop_hard_break(&mut result, &mut pending_break);
            if result.last().is_some_and(|last| last.is_empty()) {
                continue;
            }
            result.push("");
            continue;
        }

        let (kept, hard_break) = trim_keeping_hard_break(line);
        result.push(kept);
        pending_break = hard_break;
    }
    drop_hard_break(&mut result, &mut pending_break);

    // Handle unclosed fence (best-effort recovery)
    match open_fence {
        Some(OpenFence::Code(fence)) => tracing::warn!(
            "Unclosed code fence starting at line {} (char: '{}', count: {})",
            fence.line_number,
            fence.char,
            fence.count
        ),
        Some(OpenFence::Math { line_number }) => {
            tracing::warn!("Unclosed display math block starting at line {line_number}");
        }
        None => {}
    }

    let start = result.iter().position(|l| !l.trim().is_empty());
    let end = result.iter().rposition(|l| !l.trim().is_empty());

    match (start, end) {
        (Some(start), Some(end)) => {
            let mut normalized = result[start..=end].join("\n");
            normalized.push('\n');
            normalized
        }
        _ => String::new(),
    }
}

/// Strip trailing whitespace, keeping a Markdown hard line break.
///
/// Returns the kept slice and whether it ends in a hard break.
fn trim_keeping_hard_break(line: &str) -> (&str, bool) {
    let content = line.trim_end();
    let trailing = &line[content.len()..];
    if trailing.len() >= 2 && trailing.bytes().all(|b| b == b' ') {
        (&line[..content.len() + 2], true)
    } else {
        (content, false)
    }
}

/// A hard break before a blank line, a fence or the document end breaks nothing.
fn drop_hard_break<'a>(result: &mut [&'a str], pending_break: &mut bool) {
    if *pending_break
        && let Some(last) = result.last_mut()
    {
        let trimmed: &'a str = (*last).trim_end();
        *last = trimmed;
    }
    *pending_break = false;
}
