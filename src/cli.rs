use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vs_core::config::BackendKind;
use vs_core::StageKind;

#[derive(Parser)]
#[command(name = "vidscribe")]
#[command(author, version, about = "Batch media analysis: download, transcribe, score and translate videos")]
pub struct Cli {
    /// Path to config file (default: ./vidscribe.json if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the pipeline over a list of sources
    Run {
        /// File with one source URL per line
        #[arg(required = true)]
        sources: PathBuf,

        /// Only run these stages (comma separated, e.g. "acquire,extract")
        #[arg(long, value_delimiter = ',')]
        stages: Vec<StageKind>,

        /// Execution backend for stage units
        #[arg(long)]
        backend: Option<BackendKind>,

        /// Directory for downloaded media and artifacts
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
