//! CLI binary for transcript-md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionOptions` and writes the result.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use transcript_md::{
    ConversionOptions, convert_file, convert_html_to_markdown_sync, read_html_file,
};

/// Convert a chat transcript HTML export to Obsidian Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "transcript-md",
    version,
    about = "Convert a chat transcript HTML export to Obsidian Markdown",
    long_about = "Convert a chat transcript HTML export to Obsidian Markdown. KaTeX/MathML \
formulas become $...$ and $$ blocks taken from their TeX annotation; question spans become \
fenced admonition callouts."
)]
struct Cli {
    /// HTML transcript to convert.
    input: Option<PathBuf>,

    /// Write Markdown to this file instead of stdout.
    output: Option<PathBuf>,

    /// Class marking question spans.
    #[arg(long, env = "TRANSCRIPT_MD_QUESTION_CLASS")]
    question_class: Option<String>,

    /// Admonition type for question callouts.
    #[arg(long, env = "TRANSCRIPT_MD_CALLOUT_TYPE")]
    callout_type: Option<String>,

    /// Emit htmd's output as-is: no payload protection, no whitespace cleanup.
    #[arg(long, env = "TRANSCRIPT_MD_VERBATIM")]
    verbatim: bool,

    /// Enable debug logging.
    #[arg(short, long, env = "TRANSCRIPT_MD_VERBOSE")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, env = "TRANSCRIPT_MD_QUIET")]
    quiet: bool,
}

impl Cli {
    fn conversion_options(&self) -> ConversionOptions {
        let mut options = if self.verbatim {
            ConversionOptions::verbatim()
        } else {
            ConversionOptions::default()
        };
        if let Some(class) = &self.question_class {
            options = options.with_question_class(class.clone());
        }
        if let Some(callout_type) = &self.callout_type {
            options = options.with_callout_type(callout_type.clone());
        }
        options
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let Some(input) = cli.input.as_deref() else {
        println!("{}", Cli::command().render_usage());
        return Ok(ExitCode::FAILURE);
    };

    let options = cli.conversion_options();
    match &cli.output {
        Some(output) => {
            convert_file(input, output, &options)
                .with_context(|| format!("Failed to convert {}", input.display()))?;
            tracing::info!("Wrote {}", output.display());
        }
        None => {
            let html = read_html_file(input)?;
            let markdown = convert_html_to_markdown_sync(&html, &options)
                .with_context(|| format!("Failed to convert {}", input.display()))?;
            println!("{markdown}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
