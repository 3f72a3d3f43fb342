//! CLI argument parsing for criba

use clap::{Parser, ValueEnum};

use crate::pages::Page;

/// Output format for replay reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "criba")]
#[command(version)]
#[command(about = "Replay filter-form interactions and report every auto-submit they fire", long_about = None)]
pub struct Cli {
    /// Bind using a built-in page's trigger table (overrides the trace's page)
    #[arg(short = 'p', long = "page", value_enum, value_name = "PAGE")]
    pub page: Option<Page>,

    /// Custom binding expression (e.g., -e bind=q:debounce:300,order:change,rut:enter)
    #[arg(short = 'e', long = "expr", value_name = "EXPR")]
    pub expr: Option<String>,

    /// Debounce delay for rules without an explicit delay (default: 500)
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Show per-field statistics instead of individual submissions
    #[arg(short = 'c', long = "summary")]
    pub statistics: bool,

    /// Show the wait between each triggering event and its submission
    #[arg(short = 'T', long = "timing")]
    pub timing: bool,

    /// Output format (text, json, or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Replay on the wall clock with real timers instead of the trace clock
    #[arg(long = "live")]
    pub live: bool,

    /// Enable verbose engine logs on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Print the built-in page bindings and exit
    #[arg(long = "list-pages")]
    pub list_pages: bool,

    /// Interaction trace to replay (JSON file, or - for stdin)
    #[arg(value_name = "TRACE")]
    pub trace: Option<String>,
}
