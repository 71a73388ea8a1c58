//! CLI argument parsing for lifetrace

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for the generated report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
    /// Standalone HTML report
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "lifetrace")]
#[command(version)]
#[command(
    about = "Component lifecycle and usage statistics from device diagnostic traces",
    long_about = None
)]
pub struct Cli {
    /// Lifecycle event trace (JSON)
    #[arg(short = 'e', long = "events", value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Usage history (JSON)
    #[arg(short = 'u', long = "usage", value_name = "FILE")]
    pub usage: Option<PathBuf>,

    /// Installed package inventory (JSON)
    #[arg(short = 'p', long = "packages", value_name = "FILE")]
    pub packages: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format [default: text]
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Reference time for usage ages, in ms since the Unix epoch
    #[arg(long = "now-ms", value_name = "MS")]
    pub now_ms: Option<i64>,

    /// Only report components matching this regex
    #[arg(long = "filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Sort the usage table on this column
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long = "desc")]
    pub descending: bool,

    /// Also write one CSV file per table into this directory
    #[arg(long = "csv-dir", value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
