pub mod content_saver;
pub mod errors;
pub mod utils;

pub use content_saver::markdown_converter::{
    ConversionOptions, MarkdownConverter, PassReport, convert_batch,
    convert_html_to_markdown_sync, normalize_latex_whitespace, preprocess_html,
};
pub use content_saver::{convert_file, read_html_file, save_markdown_content};
pub use errors::{ConvertError, ConvertResult};
