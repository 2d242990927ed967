//! HTML to Markdown serialization via htmd.
//!
//! Preprocessing has already turned math and questions into text, so the
//! converter only needs htmd's stock element handlers. Document chrome that
//! carries no transcript content is skipped.

use htmd::HtmlToMarkdown;

use crate::errors::{ConvertError, ConvertResult};

/// Tags whose subtrees never reach the Markdown output
const SKIPPED_TAGS: [&str; 4] = ["head", "script", "style", "noscript"];

pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self {
            inner: HtmlToMarkdown::builder()
                .skip_tags(SKIPPED_TAGS.to_vec())
                .build(),
        }
    }
}

impl MarkdownConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a serialized HTML document to Markdown.
    ///
    /// The output is htmd's verbatim result; whitespace cleanup is a
    /// separate post-processing step.
    pub fn convert_sync(&self, html: &str) -> ConvertResult<String> {
        self.inner
            .convert(html)
            .map_err(|e| ConvertError::Markdown(e.to_string()))
    }
}
