//! Error types for transcript conversion
//!
//! Only I/O and configuration problems are errors. Unusable math annotations
//! and empty question spans are dropped silently by the preprocessing passes.

use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Result type alias for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Error types for conversion operations
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file could not be read
    #[error("Failed to read input file '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written
    #[error("Failed to write output file '{}': {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document tree could not be serialized back to HTML
    #[error("Failed to serialize HTML: {0}")]
    Serialize(#[source] std::io::Error),

    /// Serialized HTML was not valid UTF-8
    #[error("Serialized HTML is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// htmd failed to convert the preprocessed HTML
    #[error("HTML to Markdown conversion failed: {0}")]
    Markdown(String),

    /// A configured class or selector is not valid CSS
    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

impl ConvertError {
    /// Check if the error came from the filesystem rather than the conversion
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ConvertError::ReadInput { .. } | ConvertError::WriteOutput { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_input_display_names_path() {
        let e = ConvertError::ReadInput {
            path: PathBuf::from("chat.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = e.to_string();
        assert!(msg.contains("chat.html"), "got: {msg}");
        assert!(msg.contains("missing"), "got: {msg}");
        assert!(e.is_io());
    }

    #[test]
    fn invalid_selector_is_not_io() {
        let e = ConvertError::InvalidSelector("span.".into());
        assert!(!e.is_io());
        assert!(e.to_string().contains("span."));
    }
}
