//! HTML preprocessing passes run before htmd conversion.
//!
//! Each pass takes the shared document tree, mutates it in place and
//! reports what it did:
//! - KaTeX visual rendering removal
//! - MathML → LaTeX rewriting
//! - Question span → callout restructuring
//!
//! The order is fixed by [`preprocess_document`].

pub mod dom;
pub mod katex_artifacts;
pub mod latex_whitespace;
pub mod math_rewriting;
pub mod payload_protection;
pub mod question_callouts;

pub use dom::{parse_document, serialize_document};
pub use katex_artifacts::strip_katex_html;
pub use latex_whitespace::normalize_latex_whitespace;
pub use math_rewriting::rewrite_math;
pub use payload_protection::PayloadProtector;
pub use question_callouts::restructure_questions;

use kuchiki::NodeRef;

use super::ConversionOptions;
use crate::errors::ConvertResult;

/// Outcome of one preprocessing pass
#[derive(Default)]
pub struct PassReport {
    /// Elements replaced by literal text
    pub replaced: usize,
    /// Elements removed without replacement
    pub removed: usize,
    /// Text nodes the pass inserted, in document order
    pub injected: Vec<NodeRef>,
}

impl PassReport {
    /// Fold a later pass's report into this one
    pub fn merge(&mut self, other: PassReport) {
        self.replaced += other.replaced;
        self.removed += other.removed;
        self.injected.extend(other.injected);
    }
}

/// Run all preprocessing passes over `document`.
///
/// Artifacts go first, then math, then questions: a callout's text is
/// read after its math has become `$…$`, so formulas inside questions
/// survive as LaTeX.
pub fn preprocess_document(
    document: &NodeRef,
    options: &ConversionOptions,
) -> ConvertResult<PassReport> {
    let mut report = strip_katex_html(document, &options.artifact_selector)?;
    report.merge(rewrite_math(document));
    report.merge(restructure_questions(
        document,
        &options.question_class,
        &options.callout_type,
    )?);
    Ok(report)
}
