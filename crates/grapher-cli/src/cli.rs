//! CLI argument definitions for the grapher tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use grapher_model::ToleranceStrategy;
use grapher_table::RollingAlignment;

#[derive(Parser)]
#[command(
    name = "grapher",
    version,
    about = "Inspect, transform and explore grapher tables",
    long_about = "Inspect delimited data as typed grapher columns, apply table transforms,\n\
                  and resolve explorer programs to a chart configuration."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// TOML file with table and resolver options.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize the typed columns of a delimited file.
    Inspect(InspectArgs),

    /// Apply transforms to a delimited file and print the result as CSV.
    Transform(TransformArgs),

    /// Resolve an explorer program's choices to one configuration row.
    Explore(ExploreArgs),
}

#[derive(Args)]
pub struct InputArgs {
    /// Delimited data file (comma or tab separated).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter (detected from the first line when omitted).
    #[arg(long = "delimiter", value_enum)]
    pub delimiter: Option<DelimiterArg>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print the transform lineage.
    #[arg(long = "lineage")]
    pub lineage: bool,
}

#[derive(Args)]
pub struct TransformArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Fill gaps in this column from the nearest value within tolerance.
    #[arg(long = "interpolate", value_name = "SLUG")]
    pub interpolate: Option<String>,

    /// Tolerance in time units for --interpolate.
    #[arg(long = "tolerance", value_name = "N")]
    pub tolerance: Option<i64>,

    /// Which side --interpolate may borrow from.
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Fill gaps in this column by linear interpolation.
    #[arg(long = "linear", value_name = "SLUG")]
    pub linear: Option<String>,

    /// Replace this column with its rolling average.
    #[arg(long = "rolling", value_name = "SLUG")]
    pub rolling: Option<String>,

    /// Window size in points for --rolling.
    #[arg(long = "window", value_name = "K", default_value_t = 3)]
    pub window: usize,

    /// Center the --rolling window instead of trailing it.
    #[arg(long = "center")]
    pub center: bool,

    /// Sort rows by this column.
    #[arg(long = "sort", value_name = "SLUG")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long = "desc")]
    pub desc: bool,

    /// Write the CSV here instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExploreArgs {
    /// Explorer program file.
    #[arg(value_name = "PROGRAM")]
    pub program: PathBuf,

    /// Start from a query string such as `Gas=CO₂&Count=Per capita`.
    #[arg(long = "query", value_name = "QUERY")]
    pub query: Option<String>,

    /// Set a choice, in order given (repeatable).
    #[arg(long = "choice", value_name = "NAME=VALUE")]
    pub choices: Vec<String>,

    /// Switch to this tab if the resolved row offers it.
    #[arg(long = "tab", value_name = "TAB")]
    pub tab: Option<String>,

    /// JSON object mapping catalog paths to ids (null when unresolved).
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Reset the tab to each new row's default instead of keeping it.
    #[arg(long = "no-preserve-tab")]
    pub no_preserve_tab: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DelimiterArg {
    Comma,
    Tab,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Closest,
    Backwards,
    Forwards,
}

impl From<StrategyArg> for ToleranceStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Closest => ToleranceStrategy::Closest,
            StrategyArg::Backwards => ToleranceStrategy::Backwards,
            StrategyArg::Forwards => ToleranceStrategy::Forwards,
        }
    }
}

impl TransformArgs {
    pub fn alignment(&self) -> RollingAlignment {
        if self.center {
            RollingAlignment::Center
        } else {
            RollingAlignment::Right
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
