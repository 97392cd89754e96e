//! CLI argument definitions

use crate::data::DEFAULT_SOURCE;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loot-report")]
#[command(about = "Analyze loot tables and report drop probabilities", long_about = None)]
pub struct Cli {
    /// Directory holding the datasheet files
    #[arg(short, long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Base URL the datasheets are downloaded from
    #[arg(short, long, default_value = DEFAULT_SOURCE, env = "LOOT_REPORT_SOURCE")]
    pub source: String,

    /// Download the datasheets even if they exist
    #[arg(short, long)]
    pub force_download: bool,

    /// Table to analyze, can be given multiple times (default: all)
    #[arg(short, long = "table")]
    pub tables: Vec<String>,

    /// JSONPath query run on the parsed datasheets before analysis
    #[arg(short, long)]
    pub parsed_query: Option<String>,

    /// JSONPath query run on the analyzed tables before output
    #[arg(short, long)]
    pub query: Option<String>,

    /// Analyzer configuration (TOML: context, options, tables)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Expand loot buckets with at most this many items
    #[arg(long)]
    pub threshold: Option<usize>,

    /// Merge duplicate items even without a context
    #[arg(long)]
    pub force_merge: bool,

    /// Skip analysis and write the parsed datasheets as JSON
    #[arg(long)]
    pub no_analysis: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,

    /// Output directory
    #[arg(short, long, default_value = "./docs")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}
