//! CLI argument parsing for trackport
//!
//! Global flags: --root, --store, --format, --quiet, --verbose, --log-level, --log-json

pub mod format;
pub mod output;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use trackport_core::{Domain, ImportMode};

pub use output::OutputFormat;
use parse::{parse_domain, parse_mode};

/// Trackport - import, export and change tracking for tracker pages
#[derive(Parser, Debug)]
#[command(name = "trackport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store directory
    #[arg(long, global = true, env = "TRACKPORT_STORE")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new trackport store
    Init,

    /// List pages with their storage keys and current hashes
    Pages,

    /// Export one page, or all pages, as a JSON document
    Export {
        /// Page to export (all pages when omitted)
        #[arg(long, short, value_parser = parse_domain)]
        page: Option<Domain>,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Do not record a hash checkpoint after exporting
        #[arg(long)]
        no_checkpoint: bool,
    },

    /// Import a JSON document, detecting its format
    Import {
        /// Input file, or `-` for stdin
        input: String,

        /// Import into this page directly, skipping format detection
        #[arg(long, short, value_parser = parse_domain)]
        page: Option<Domain>,

        /// Import mode: replace or merge (default from config)
        #[arg(long, short, value_parser = parse_mode)]
        mode: Option<ImportMode>,
    },

    /// Show which format a JSON document is detected as
    Detect {
        /// Input file, or `-` for stdin
        input: String,
    },

    /// Show which pages changed since the last checkpoint
    Diff,

    /// Record the current page hashes as the checkpoint
    Checkpoint,
}
