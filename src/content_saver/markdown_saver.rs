use std::fs;
use std::path::Path;

use crate::content_saver::markdown_converter::{ConversionOptions, convert_html_to_markdown_sync};
use crate::errors::{ConvertError, ConvertResult};

/// Read an HTML transcript export from disk
///
/// # Errors
///
/// `ConvertError::ReadInput` if the file is missing, unreadable or not UTF-8.
pub fn read_html_file(path: &Path) -> ConvertResult<String> {
    fs::read_to_string(path).map_err(|source| ConvertError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

/// Save markdown content to disk, creating parent directories as needed
///
/// # Arguments
///
/// * `path` - Destination file; overwritten if it exists
/// * `markdown_content` - The markdown text to save
pub fn save_markdown_content(path: &Path, markdown_content: &str) -> ConvertResult<()> {
    let write_error = |source: std::io::Error| ConvertError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, markdown_content).map_err(write_error)?;

    tracing::debug!(
        "Saved {} bytes of markdown to {}",
        markdown_content.len(),
        path.display()
    );
    Ok(())
}

/// Convert one HTML file and write the Markdown to `output`
///
/// Nothing is written if reading or conversion fails.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConversionOptions,
) -> ConvertResult<()> {
    let html = read_html_file(input)?;
    let markdown = convert_html_to_markdown_sync(&html, options)?;
    save_markdown_content(output, &markdown)
}
