//! Markdown post-processing applied to htmd output.

pub mod code_fence_detection;
pub mod whitespace_normalization;

pub use code_fence_detection::{CodeFence, detect_code_fence, is_math_fence};
pub use whitespace_normalization::normalize_markdown_whitespace;
