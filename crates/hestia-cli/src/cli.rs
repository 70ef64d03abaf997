//! CLI argument definitions for `hestia-convert`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hestia-convert",
    version,
    about = "Rebuild flattened Hestia CSV exports into one row per record",
    long_about = "Rebuild flattened Hestia CSV exports into one row per record.\n\n\
                  Columns are split into entity groups by name prefix, rows holding the\n\
                  missing-value marker are dropped per group, and the groups are re-joined\n\
                  on their identifier columns."
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
    /// Convert a flattened export and write the result as CSV.
    Convert(ConvertArgs),

    /// Compare two tables after schema coercion.
    Compare(CompareArgs),

    /// Convert an export and compare the result with a reference table.
    Check(CheckArgs),

    /// Print the built-in conversion config as JSON.
    Config,
}

#[derive(Args)]
pub struct ConfigFileArg {
    /// JSON conversion config (default: built-in Hestia layout).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Flattened export to convert.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination CSV file.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub config: ConfigFileArg,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Table under test.
    #[arg(value_name = "ACTUAL")]
    pub actual: PathBuf,

    /// Reference table.
    #[arg(value_name = "EXPECTED")]
    pub expected: PathBuf,

    #[command(flatten)]
    pub config: ConfigFileArg,

    /// Maximum number of differing cells to list.
    #[arg(long = "max-mismatches", default_value_t = 20)]
    pub max_mismatches: usize,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Flattened export to convert.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Reference output for the export.
    #[arg(value_name = "EXPECTED")]
    pub expected: PathBuf,

    #[command(flatten)]
    pub config: ConfigFileArg,

    /// Maximum number of differing cells to list.
    #[arg(long = "max-mismatches", default_value_t = 20)]
    pub max_mismatches: usize,
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
