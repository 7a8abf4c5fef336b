//! CLI argument definitions

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use lintbridge_core::OutputFormat;

/// lintbridge - run analysis plugins over a codebase
#[derive(Parser)]
#[command(name = "lintbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Analyzer plugin module (.wasm); may be given more than once
    #[arg(short, long = "analyzers", value_name = "PATH")]
    pub analyzers: Vec<PathBuf>,

    /// Solution, project, directory or file to analyze
    #[arg(short, long, value_name = "PATH")]
    pub target: PathBuf,

    /// Output format (text, sarif)
    #[arg(short, long, default_value = "text", value_parser = OutputFormat::from_str)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print nothing but fatal errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exit with status 2 if any plugin failed to load or run
    #[arg(long)]
    pub fail_on_run_error: bool,
}
