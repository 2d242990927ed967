//! Whitespace normalization for LaTeX payloads lifted out of MathML annotations.
//!
//! Inline and display math follow different rules:
//! - Inline math sits inside prose, so it must stay on one line.
//! - Display math (`aligned`, `cases`, matrices) is line-oriented, so line
//!   structure is kept and only horizontal whitespace is tidied.

use regex::Regex;
use std::sync::LazyLock;

static ANY_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("ANY_WHITESPACE_RUN: hardcoded regex is valid")
});

static HORIZONTAL_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+").expect("HORIZONTAL_WHITESPACE_RUN: hardcoded regex is valid")
});

/// Normalize raw annotation text for inline (`display == false`) or display rendering.
///
/// # Rules
///
/// 1. `\r\n` and `\r` become `\n`; the whole string is trimmed
/// 2. Inline: every whitespace run, newlines included, becomes one space
/// 3. Display: per line, space/tab runs become one space and trailing
///    whitespace goes; leading and trailing empty lines are dropped and a
///    run of interior empty lines is kept as one empty line
///
/// The collapse in rule 3 is what turns `"\n\nx=1\n\n\ny=2\n\n"` into
/// `"x=1\n\ny=2"`. Keeping every empty line would leave two between the rows.
///
/// # Examples
///
/// ```rust
/// # use transcript_md::content_saver::markdown_converter::normalize_latex_whitespace;
/// assert_eq!(normalize_latex_whitespace("a\n   b", false), "a b");
/// assert_eq!(normalize_latex_whitespace("\n\nx=1\n\n\ny=2\n\n", true), "x=1\n\ny=2");
/// ```
#[must_use]
pub fn normalize_latex_whitespace(text: &str, display: bool) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = unified.trim();

    if !display {
        return ANY_WHITESPACE_RUN.replace_all(trimmed, " ").into_owned();
    }

    let mut lines: Vec<String> = Vec::new();
    for line in trimmed.split('\n') {
        let line = HORIZONTAL_WHITESPACE_RUN
            .replace_all(line, " ")
            .trim_end()
            .to_string();

        // One empty line is a row separator; more add nothing
        if line.is_empty() && lines.last().is_some_and(String::is_empty) {
            continue;
        }
        lines.push(line);
    }

    while lines.first().is_some_and(String::is_empty) {
        lines.remove(0);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_collapses_newlines() {
        assert_eq!(normalize_latex_whitespace("a\n   b", false), "a b");
    }

    #[test]
    fn inline_trims_and_collapses_tabs() {
        assert_eq!(
            normalize_latex_whitespace("  \\frac{1}{2}\t\t+  x  ", false),
            "\\frac{1}{2} + x"
        );
    }

    #[test]
    fn display_drops_outer_blank_lines() {
        assert_eq!(
            normalize_latex_whitespace("\n\nx=1\n\n\ny=2\n\n", true),
            "x=1\n\ny=2"
        );
    }

    #[test]
    fn display_keeps_single_interior_blank_line() {
        assert_eq!(normalize_latex_whitespace("a\n\nb", true), "a\n\nb");
    }

    #[test]
    fn display_collapses_interior_empty_line_runs() {
        assert_eq!(normalize_latex_whitespace("a\n\n\n \n\t\nb", true), "a\n\nb");
    }

    #[test]
    fn display_tidies_each_line() {
        let raw = "\\begin{aligned}\n  x  &=  1 \\\\   \n\ty &= 2\n\\end{aligned}";
        assert_eq!(
            normalize_latex_whitespace(raw, true),
            "\\begin{aligned}\n x &= 1 \\\\\n y &= 2\n\\end{aligned}"
        );
    }

    #[test]
    fn carriage_returns_become_newlines() {
        assert_eq!(normalize_latex_whitespace("a\r\nb\rc", true), "a\nb\nc");
        assert_eq!(normalize_latex_whitespace("a\r\nb\rc", false), "a b c");
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert_eq!(normalize_latex_whitespace(" \n\t ", true), "");
        assert_eq!(normalize_latex_whitespace(" \n\t ", false), "");
    }
}
