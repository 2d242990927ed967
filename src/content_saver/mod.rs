//! Reading transcript exports and saving converted notes

pub mod markdown_converter;
mod markdown_saver;

// Re-export public API from markdown_saver module
pub use markdown_saver::{convert_file, read_html_file, save_markdown_content};
