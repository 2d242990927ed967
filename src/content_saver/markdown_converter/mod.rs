//! HTML transcript to Markdown conversion pipeline
//!
//! This module provides the complete pipeline for converting a chat transcript
//! export into Obsidian-flavoured Markdown:
//! 1. Remove the KaTeX visual rendering (`span.katex-html`)
//! 2. Rewrite MathML to delimited LaTeX from its TeX annotation
//! 3. Turn question spans into fenced callout blocks
//! 4. Convert to markdown using htmd, with the injected LaTeX and callouts
//!    protected from escaping
//! 5. Normalize markdown whitespace outside fenced regions
//!
//! # Usage
//!
//! ```rust
//! # use transcript_md::content_saver::markdown_converter::{convert_html_to_markdown_sync, ConversionOptions};
//! let html = r#"<p>Euler: <math><semantics><mi>e</mi>
//!     <annotation encoding="application/x-tex">e^{i\pi}+1=0</annotation>
//!     </semantics></math></p>"#;
//! let markdown = convert_html_to_markdown_sync(html, &ConversionOptions::default())?;
//! assert_eq!(markdown, "Euler: $e^{i\\pi}+1=0$\n");
//! # Ok::<(), transcript_md::errors::ConvertError>(())
//! ```
//!
//! ## Custom Configuration
//! ```rust
//! # use transcript_md::content_saver::markdown_converter::{convert_html_to_markdown_sync, ConversionOptions};
//! let options = ConversionOptions::new()
//!     .with_question_class("user-turn")
//!     .with_callout_type("ad-question");
//! let markdown = convert_html_to_markdown_sync(r#"<span class="user-turn">Why?</span>"#, &options)?;
//! assert_eq!(markdown, "```ad-question\nWhy?\n```\n");
//! # Ok::<(), transcript_md::errors::ConvertError>(())
//! ```

use rayon::prelude::*;

pub mod html_preprocessing;
pub mod html_to_markdown;
pub mod markdown_postprocessing;

pub use html_preprocessing::{
    PassReport, PayloadProtector, normalize_latex_whitespace, preprocess_document,
    restructure_questions, rewrite_math, strip_katex_html,
};
pub use html_to_markdown::MarkdownConverter;
pub use markdown_postprocessing::normalize_markdown_whitespace;

use crate::errors::ConvertResult;
use crate::utils::{DEFAULT_CALLOUT_TYPE, DEFAULT_QUESTION_CLASS, KATEX_HTML_SELECTOR};

/// Configuration options for transcript to Markdown conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Class marking question spans (default: `question-bM0Y3r`)
    pub question_class: String,

    /// Admonition type written after the callout fence (default: `ad-bubble`)
    pub callout_type: String,

    /// Selector for the KaTeX visual rendering to drop (default: `span.katex-html`)
    pub artifact_selector: String,

    /// Shield injected LaTeX and callouts from htmd (default: true)
    ///
    /// When disabled, htmd sees the injected text as ordinary prose: it
    /// escapes Markdown punctuation (`x_1` → `x\_1`) and reflows newlines.
    pub protect_payloads: bool,

    /// Normalize whitespace and blank lines (default: true)
    ///
    /// When enabled, removes trailing whitespace, collapses multiple blank lines
    /// and trims document edges. Preserves everything inside code fences,
    /// callouts and `$$` blocks.
    pub normalize_whitespace: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            question_class: DEFAULT_QUESTION_CLASS.to_string(),
            callout_type: DEFAULT_CALLOUT_TYPE.to_string(),
            artifact_selector: KATEX_HTML_SELECTOR.to_string(),
            protect_payloads: true,
            normalize_whitespace: true,
        }
    }
}

impl ConversionOptions {
    /// Create a new `ConversionOptions` with all features enabled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preprocess, then hand the tree to htmd and return its output untouched
    #[must_use]
    pub fn verbatim() -> Self {
        Self {
            protect_payloads: false,
            normalize_whitespace: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_question_class(mut self, class: impl Into<String>) -> Self {
        self.question_class = class.into();
        self
    }

    #[must_use]
    pub fn with_callout_type(mut self, callout_type: impl Into<String>) -> Self {
        self.callout_type = callout_type.into();
        self
    }

    #[must_use]
    pub fn with_artifact_selector(mut self, selector: impl Into<String>) -> Self {
        self.artifact_selector = selector.into();
        self
    }

    #[must_use]
    pub fn with_protect_payloads(mut self, protect: bool) -> Self {
        self.protect_payloads = protect;
        self
    }

    #[must_use]
    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }
}

/// Run the preprocessing passes and return the rewritten HTML.
///
/// The result contains no `math` elements, no KaTeX rendering spans and no
/// question spans. Running it again on its own output changes nothing.
pub fn preprocess_html(html: &str, options: &ConversionOptions) -> ConvertResult<String> {
    let document = html_preprocessing::parse_document(html);
    let report = preprocess_document(&document, options)?;
    tracing::debug!(
        "Preprocessed HTML: {} replaced, {} removed",
        report.replaced,
        report.removed
    );
    html_preprocessing::serialize_document(&document)
}

/// Convert a transcript export to Markdown synchronously
///
/// # Pipeline Stages
///
/// 1. **Preprocess** (always performed)
///    - Strips KaTeX rendering, rewrites math, restructures questions
/// 2. **Protect payloads** (optional, controlled by `options.protect_payloads`)
///    - Swaps injected LaTeX and callouts for placeholder tokens
/// 3. **Convert to Markdown** (always performed)
///    - Serializes the tree and runs htmd over it
/// 4. **Restore payloads** (with stage 2)
/// 5. **Normalize whitespace** (optional, controlled by `options.normalize_whitespace`)
///
/// # Errors
///
/// Returns an error if a configured selector does not parse, the tree
/// cannot be serialized, or htmd fails. Unusable math and empty questions
/// are dropped, never reported.
///
/// # Examples
///
/// ```rust
/// # use transcript_md::content_saver::markdown_converter::{convert_html_to_markdown_sync, ConversionOptions};
/// let html = r#"<span class="question-bM0Y3r">Hello   world</span>
///     <p>Answer with <math display="block"><annotation encoding="application/x-tex">a+b</annotation></math></p>"#;
///
/// let markdown = convert_html_to_markdown_sync(html, &ConversionOptions::default())?;
/// assert!(markdown.contains("```ad-bubble\nHello world\n```"));
/// assert!(markdown.contains("$$\na+b\n$$"));
/// # Ok::<(), transcript_md::errors::ConvertError>(())
/// ```
pub fn convert_html_to_markdown_sync(
    html: &str,
    options: &ConversionOptions,
) -> ConvertResult<String> {
    // Stage 1: DOM passes on one shared tree
    let document = html_preprocessing::parse_document(html);
    let report = preprocess_document(&document, options)?;
    tracing::debug!(
        "Preprocessing done: {} replaced, {} removed, {} payloads injected",
        report.replaced,
        report.removed,
        report.injected.len()
    );

    // Stage 2: Protect injected text from htmd escaping and reflow
    // Tokens must not already occur anywhere htmd could copy text from
    let mut protector = PayloadProtector::new();
    if options.protect_payloads {
        let unprotected_html = html_preprocessing::serialize_document(&document)?;
        protector = PayloadProtector::avoiding(&unprotected_html);
        protector.protect(&report.injected);
        tracing::trace!("Protected {} payloads", protector.len());
    }

    // Stage 3: Serialize and convert
    let preprocessed_html = html_preprocessing::serialize_document(&document)?;
    let markdown = MarkdownConverter::new().convert_sync(&preprocessed_html)?;

    // Stage 4: Restore protected payloads
    let markdown = if options.protect_payloads {
        protector.restore(&markdown)
    } else {
        markdown
    };

    // Stage 5: Whitespace normalization
    let markdown = if options.normalize_whitespace {
        normalize_markdown_whitespace(&markdown)
    } else {
        markdown
    };

    Ok(markdown)
}

/// Convert many documents in parallel.
///
/// Each document gets its own tree and protector; results keep the input order.
pub fn convert_batch<S>(documents: &[S], options: &ConversionOptions) -> Vec<ConvertResult<String>>
where
    S: AsRef<str> + Sync,
{
    tracing::debug!("Converting batch of {} documents", documents.len());
    documents
        .par_iter()
        .map(|html| convert_html_to_markdown_sync(html.as_ref(), options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = r#"<html><body>
        <span class="question-bM0Y3r">Hello   world

Second   line</span>
        <p>Sum: <span class="katex"><math display="block"><semantics><mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow>
            <annotation encoding="application/x-tex">a+b</annotation></semantics></math><span class="katex-html" aria-hidden="true">a+b</span></span></p>
        <p>Square: <span class="katex"><math><semantics><msup><mi>x</mi><mn>2</mn></msup>
            <annotation encoding="application/x-tex">x^2</annotation></semantics></math><span class="katex-html">x2</span></span> done</p>
        </body></html>"#;

    #[test]
    fn end_to_end_transcript() {
        let markdown = convert_html_to_markdown_sync(TRANSCRIPT, &ConversionOptions::default()).unwrap();

        assert!(
            markdown.contains("```ad-bubble\nHello world\n\nSecond line\n```"),
            "got: {markdown}"
        );
        assert!(markdown.contains("$$\na+b\n$$"), "got: {markdown}");
        assert!(markdown.contains("Square: $x^2$ done"), "got: {markdown}");
        assert!(!markdown.contains("x2"), "KaTeX rendering leaked: {markdown}");
        assert!(!markdown.contains("TRANSCRIPTMDPAYLOAD"));
    }

    #[test]
    fn latex_is_not_escaped() {
        let html = r#"<p><math><annotation encoding="application/x-tex">x_1 * \frac{a}{b}</annotation></math></p>"#;
        let markdown = convert_html_to_markdown_sync(html, &ConversionOptions::default()).unwrap();

        assert_eq!(markdown, "$x_1 * \\frac{a}{b}$\n");
    }

    #[test]
    fn preprocess_html_is_idempotent() {
        let options = ConversionOptions::default();
        let once = preprocess_html(TRANSCRIPT, &options).unwrap();
        let twice = preprocess_html(&once, &options).unwrap();

        assert_eq!(once, twice);
        assert!(!once.contains("<math"));
        assert!(!once.contains("katex-html"));
        assert!(!once.contains("question-bM0Y3r"));
    }

    #[test]
    fn empty_question_leaves_no_residue() {
        let html = "<p>before</p><span class=\"question-bM0Y3r\">  \n\t </span><p>after</p>";
        let markdown = convert_html_to_markdown_sync(html, &ConversionOptions::default()).unwrap();

        assert_eq!(markdown, "before\n\nafter\n");
    }

    #[test]
    fn verbatim_skips_normalization() {
        let options = ConversionOptions::verbatim();
        assert!(!options.protect_payloads);
        assert!(!options.normalize_whitespace);

        let markdown = convert_html_to_markdown_sync("<p>plain</p>", &options).unwrap();
        assert_eq!(markdown.trim(), "plain");
    }

    #[test]
    fn invalid_question_class_is_reported() {
        let options = ConversionOptions::new().with_question_class("bad[");
        let err = convert_html_to_markdown_sync("<p>x</p>", &options).unwrap_err();

        assert!(matches!(err, crate::errors::ConvertError::InvalidSelector(_)));
    }

    #[test]
    fn batch_keeps_input_order() {
        let documents = vec![
            "<p>one</p>".to_string(),
            "<p>two</p>".to_string(),
            "<p>three</p>".to_string(),
        ];
        let results = convert_batch(&documents, &ConversionOptions::default());
        let markdown: Vec<String> = results.into_iter().map(Result::unwrap).collect();

        assert_eq!(markdown, vec!["one\n", "two\n", "three\n"]);
    }
}
