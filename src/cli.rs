//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::app::ExportFormat;
use crate::session::Orientation;
use crate::theme::ThemeId;

#[derive(Parser, Debug)]
#[command(name = "mdtofile", version)]
#[command(about = "Convert Markdown to themed PDF or self-contained HTML, with a live preview")]
pub struct Cli {
    /// Directory holding the saved session and the preview document
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Configuration file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the current document and preferences
    Status,

    /// Load a Markdown or text file as the document
    Open {
        file: PathBuf,
    },

    /// Replace the document with text read from stdin
    Write,

    /// Erase the document text
    Clear {
        /// Confirm erasing the document
        #[arg(long)]
        yes: bool,
    },

    /// Show or change the theme
    Theme {
        /// Theme key
        #[arg(value_parser = parse_theme)]
        key: Option<ThemeId>,

        /// List the available themes
        #[arg(long, conflicts_with = "key")]
        list: bool,
    },

    /// Show or change the export filename (without extension)
    Filename {
        name: Option<String>,
    },

    /// Append the current UTC time to the export filename
    Timestamp,

    /// Show or change the PDF page orientation
    Orientation {
        #[arg(value_enum)]
        value: Option<Orientation>,
    },

    /// Print the sanitized HTML of the document
    Render {
        /// Print the complete themed preview page instead of the fragment
        #[arg(long)]
        document: bool,
    },

    /// Report problems in the document
    Check,

    /// Export the document
    Export {
        #[arg(value_enum)]
        format: ExportFormat,

        /// Directory to write to; remembered for later exports
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Open the exported file afterwards
        #[arg(long)]
        open: bool,
    },

    /// Follow edits to a file and keep the preview document up to date
    Watch {
        file: PathBuf,

        /// Write the preview document here instead of the state directory
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Open the preview document in the browser
        #[arg(long)]
        open: bool,
    },

    /// Print the effective configuration and paths
    Config,
}

fn parse_theme(key: &str) -> Result<ThemeId, String> {
    ThemeId::parse(key).ok_or_else(|| {
        format!(
            "unknown theme '{}', expected one of: {}",
            key,
            ThemeId::keys().join(", ")
        )
    })
}
