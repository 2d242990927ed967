//! MathML → LaTeX rewriting.
//!
//! Every `<math>` element is replaced by the TeX source recorded in its
//! annotation:
//! ```html
//! <math display="block"><semantics><mrow>…</mrow>
//!   <annotation encoding="application/x-tex">a+b</annotation>
//! </semantics></math>
//! ```
//! becomes the literal text `"\n\n$$\na+b\n$$\n\n"`. Inline math becomes
//! `"$…$"`. A `<math>` without a usable TeX annotation is removed outright:
//! the presentation MathML alone cannot be turned back into LaTeX.

use kuchiki::{ElementData, NodeDataRef, NodeRef};

use super::PassReport;
use super::dom::{attribute, elements_by_tag, is_attached, replace_with_text};
use super::latex_whitespace::normalize_latex_whitespace;
use crate::utils::TEX_ENCODING_MARKER;

/// Rewrite every math element of `document` in document order.
pub fn rewrite_math(document: &NodeRef) -> PassReport {
    // Must collect before iteration because we'll detach nodes
    let math_elements = elements_by_tag(document, "math");
    let mut report = PassReport::default();

    for math in math_elements {
        let node = math.as_node();
        if !is_attached(node) {
            continue;
        }

        let Some(raw_latex) = find_tex_annotation(node).filter(|tex| !tex.trim().is_empty()) else {
            tracing::trace!("Dropping math element without a TeX annotation");
            node.detach();
            report.removed += 1;
            continue;
        };

        let display = is_display_math(&math, &raw_latex);
        let latex = normalize_latex_whitespace(&raw_latex, display);
        let replacement = delimit_latex(&latex, display);

        report.injected.push(replace_with_text(node, &replacement));
        report.replaced += 1;
    }

    tracing::debug!(
        "Rewrote {} math elements, dropped {} without TeX",
        report.replaced,
        report.removed
    );
    report
}

/// Text of the first descendant `annotation` whose encoding mentions TeX.
///
/// A missing encoding attribute never matches.
fn find_tex_annotation(math: &NodeRef) -> Option<String> {
    elements_by_tag(math, "annotation")
        .into_iter()
        .find(|annotation| {
            attribute(annotation, "encoding")
                .is_some_and(|encoding| encoding.to_ascii_lowercase().contains(TEX_ENCODING_MARKER))
        })
        .map(|annotation| annotation.as_node().text_contents())
}

/// Display iff `display="block"` or the raw source is multi-line.
///
/// Only a literal line feed counts; a `\\` row break on a single line does not.
fn is_display_math(math: &NodeDataRef<ElementData>, raw_latex: &str) -> bool {
    let block_attr = attribute(math, "display").is_some_and(|display| display.eq_ignore_ascii_case("block"));
    block_attr || raw_latex.contains('\n')
}

fn delimit_latex(latex: &str, display: bool) -> String {
    if display {
        format!("\n\n$$\n{latex}\n$$\n\n")
    } else {
        format!("${latex}$")
    }
}
