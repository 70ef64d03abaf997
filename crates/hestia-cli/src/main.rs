//! Hestia export converter CLI.

use clap::{ColorChoice, Parser};
use hestia_cli::commands::{load_config, run_check, run_compare, run_config, run_convert};
use hestia_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_compare_summary, print_convert_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli.command) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(command: &Command) -> anyhow::Result<i32> {
    match command {
        Command::Convert(args) => {
            let config = load_config(args.config.config.as_deref())?;
            let result = run_convert(&args.input, &args.output, &config)?;
            print_convert_summary(&result);
            Ok(0)
        }
        Command::Compare(args) => {
            let config = load_config(args.config.config.as_deref())?;
            let result = run_compare(&args.actual, &args.expected, &config, args.max_mismatches)?;
            print_compare_summary(&result);
            Ok(if result.is_equal() { 0 } else { 1 })
        }
        Command::Check(args) => {
            let config = load_config(args.config.config.as_deref())?;
            let result = run_check(&args.input, &args.expected, &config, args.max_mismatches)?;
            print_compare_summary(&result);
            Ok(if result.is_equal() { 0 } else { 1 })
        }
        Command::Config => {
            println!("{}", run_config()?);
            Ok(0)
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
