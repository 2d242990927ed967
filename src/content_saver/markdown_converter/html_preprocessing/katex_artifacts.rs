//! Removal of KaTeX's visual HTML rendering.
//!
//! KaTeX renders each formula twice:
//! ```html
//! <span class="katex">
//!   <span class="katex-mathml"><math>…<annotation encoding="application/x-tex">x^2</annotation></math></span>
//!   <span class="katex-html" aria-hidden="true"><span class="base">…</span></span>
//! </span>
//! ```
//! The `katex-html` half is glyph soup for the screen. It sits next to the
//! `<math>` element rather than around it, so it can go before or after the
//! math rewrite. Left in place it turns into duplicated, garbled text.

use kuchiki::NodeRef;

use super::PassReport;
use super::dom::select_all;
use crate::errors::ConvertResult;

/// Detach every element matching `selector`, however deeply nested.
pub fn strip_katex_html(document: &NodeRef, selector: &str) -> ConvertResult<PassReport> {
    let matches = select_all(document, selector)?;
    let mut report = PassReport::default();

    for artifact in matches {
        artifact.as_node().detach();
        report.removed += 1;
    }

    tracing::debug!("Stripped {} KaTeX rendering artifacts", report.removed);
    Ok(report)
}
