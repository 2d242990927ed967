//! Shared configuration constants for transcript-md
//!
//! This module contains default values and markup markers used throughout
//! the codebase to ensure consistency and avoid magic strings.

/// Class marker of the user-question spans in exported transcripts
///
/// The exporting userscript wraps every user turn in
/// `<span class="question-bM0Y3r">`. The suffix is random so it never
/// collides with classes the chat frontend itself emits.
pub const DEFAULT_QUESTION_CLASS: &str = "question-bM0Y3r";

/// Callout type written on the opening fence of a question block
///
/// `ad-bubble` renders as a custom "bubble" admonition in Obsidian
/// (requires the admonition plugin).
pub const DEFAULT_CALLOUT_TYPE: &str = "ad-bubble";

/// Selector for KaTeX's visual HTML rendering
///
/// KaTeX emits `<span class="katex-mathml">` (semantic) and
/// `<span class="katex-html">` (screen rendering) side by side. Only the
/// MathML half carries the TeX annotation.
pub const KATEX_HTML_SELECTOR: &str = "span.katex-html";

/// Substring an `annotation` encoding must contain to count as TeX
///
/// Matches `application/x-tex` and the variants some renderers emit.
pub const TEX_ENCODING_MARKER: &str = "tex";

/// Prefix and suffix of payload placeholder tokens
///
/// Letters only, so htmd has nothing to escape and no line-start rule fires.
/// The prefix is a base: each conversion extends it until it is absent
/// from the document.
pub const PAYLOAD_TOKEN_PREFIX: &str = "TRANSCRIPTMDPAYLOAD";
pub const PAYLOAD_TOKEN_SUFFIX: &str = "END";
