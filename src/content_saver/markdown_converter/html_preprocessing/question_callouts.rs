//! Question spans → fenced callout blocks.
//!
//! The transcript exporter marks each user turn with a classed span:
//! ```html
//! <span class="question-bM0Y3r"><div class="whitespace-pre-wrap">How do I
//! solve   this?</div><p>Second paragraph</p></span>
//! ```
//! Each span becomes a plain-text admonition:
//! ````text
//!
//! ```ad-bubble
//! How do I
//! solve this?
//!
//! Second paragraph
//! ```
//!
//! ````
//! The body is text, not Markdown. Markup inside a question (emphasis, code)
//! is flattened away, which is what the callout renderer expects.

use kuchiki::NodeRef;
use regex::Regex;
use std::sync::LazyLock;

use super::PassReport;
use super::dom::{is_attached, replace_with_text, select_all};
use crate::errors::ConvertResult;

static HORIZONTAL_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+").expect("HORIZONTAL_WHITESPACE_RUN: hardcoded regex is valid")
});

/// Replace every `span.<question_class>` with a `callout_type` callout block.
pub fn restructure_questions(
    document: &NodeRef,
    question_class: &str,
    callout_type: &str,
) -> ConvertResult<PassReport> {
    let selector = format!("span.{question_class}");
    let spans = select_all(document, &selector)?;
    let mut report = PassReport::default();

    for span in spans {
        let node = span.as_node();
        if !is_attached(node) {
            // Nested inside a question that was already replaced
            continue;
        }

        let text = normalize_paragraphs(&extract_question_text(node));
        if text.is_empty() {
            tracing::trace!("Dropping empty question span");
            node.detach();
            report.removed += 1;
            continue;
        }

        let callout = format!("\n\n```{callout_type}\n{text}\n```\n\n");
        report.injected.push(replace_with_text(node, &callout));
        report.replaced += 1;
    }

    tracing::debug!(
        "Restructured {} question spans into callouts, dropped {} empty",
        report.replaced,
        report.removed
    );
    Ok(report)
}

/// Flatten a question span to text.
///
/// Text chunks are trimmed and joined by `\n`. Where a paragraph-level
/// element boundary falls between two chunks the separator is `\n\n`.
fn extract_question_text(span: &NodeRef) -> String {
    let mut collector = ChunkCollector::default();
    collector.walk(span);
    collector.text
}

#[derive(Default)]
struct ChunkCollector {
    text: String,
    paragraph_break: bool,
}

impl ChunkCollector {
    fn walk(&mut self, node: &NodeRef) {
        for child in node.children() {
            if let Some(text) = child.as_text() {
                self.push_chunk(text.borrow().trim());
            } else if let Some(element) = child.as_element() {
                let paragraph = is_paragraph_element(&element.name.local);
                self.paragraph_break |= paragraph;
                self.walk(&child);
                self.paragraph_break |= paragraph;
            }
        }
    }

    fn push_chunk(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text
                .push_str(if self.paragraph_break { "\n\n" } else { "\n" });
        }
        self.text.push_str(chunk);
        self.paragraph_break = false;
    }
}

fn is_paragraph_element(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div" | "blockquote" | "pre" | "ul" | "ol" | "table"
            | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

/// Collapse intra-paragraph spacing and drop empty paragraphs.
///
/// Paragraphs are separated by `\n\n`; lone newlines inside a paragraph
/// are kept.
fn normalize_paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(|paragraph| {
            HORIZONTAL_WHITESPACE_RUN
                .replace_all(paragraph, " ")
                .trim()
                .to_string()
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_saver::markdown_converter::html_preprocessing::dom::{
        parse_document, serialize_document,
    };
    use crate::utils::{DEFAULT_CALLOUT_TYPE, DEFAULT_QUESTION_CLASS};

    fn restructure(html: &str) -> (NodeRef, PassReport) {
        let document = parse_document(html);
        let report =
            restructure_questions(&document, DEFAULT_QUESTION_CLASS, DEFAULT_CALLOUT_TYPE)
                .unwrap();
        (document, report)
    }

    #[test]
    fn two_paragraphs_in_text_become_callout() {
        let (document, report) = restructure(
            "<span class=\"question-bM0Y3r\">Hello   world\n\nSecond   line</span>",
        );

        assert_eq!(report.replaced, 1);
        assert_eq!(
            document.text_contents(),
            "\n\n```ad-bubble\nHello world\n\nSecond line\n```\n\n"
        );
    }

    #[test]
    fn paragraph_elements_keep_their_seams() {
        let (document, _) = restructure(
            r#"<span class="question-bM0Y3r"><p>Hello   world</p><p>Second   line</p></span>"#,
        );

        assert_eq!(
            document.text_contents(),
            "\n\n```ad-bubble\nHello world\n\nSecond line\n```\n\n"
        );
    }

    #[test]
    fn inline_children_join_with_single_newline() {
        let (document, _) = restructure(
            r#"<span class="question-bM0Y3r">What is <b>this</b> about?</span>"#,
        );

        assert_eq!(
            document.text_contents(),
            "\n\n```ad-bubble\nWhat is\nthis\nabout?\n```\n\n"
        );
    }

    #[test]
    fn whitespace_only_span_is_removed() {
        let (document, report) = restructure(
            "<p>before<span class=\"question-bM0Y3r\">  \n\t <b> </b></span>after</p>",
        );
        let html = serialize_document(&document).unwrap();

        assert_eq!(report.removed, 1);
        assert_eq!(report.replaced, 0);
        assert!(!html.contains("question-bM0Y3r"));
        assert!(!html.contains("ad-bubble"));
        assert_eq!(document.text_contents(), "beforeafter");
    }

    #[test]
    fn other_spans_are_untouched() {
        let (document, report) = restructure(
            r#"<span class="answer">keep</span><div class="question-bM0Y3r">not a span</div>"#,
        );

        assert_eq!(report.replaced + report.removed, 0);
        assert_eq!(document.text_contents(), "keepnot a span");
    }

    #[test]
    fn nested_question_is_absorbed_by_outer() {
        let (document, report) = restructure(
            r#"<span class="question-bM0Y3r">outer <span class="question-bM0Y3r">inner</span></span>"#,
        );

        assert_eq!(report.replaced, 1);
        assert_eq!(
            document.text_contents(),
            "\n\n```ad-bubble\nouter\ninner\n```\n\n"
        );
    }

    #[test]
    fn custom_class_and_callout_type() {
        let document = parse_document(r#"<span class="ask">Why?</span>"#);
        restructure_questions(&document, "ask", "ad-question").unwrap();

        assert_eq!(document.text_contents(), "\n\n```ad-question\nWhy?\n```\n\n");
    }

    #[test]
    fn normalize_paragraphs_drops_blank_paragraphs() {
        assert_eq!(normalize_paragraphs("a\t b\n\n \n\n\nc  "), "a b\n\nc");
    }
}
