//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// pc - tick-driven polling counter
#[derive(Debug, Parser)]
#[command(name = "pc", author, version, about = "Tick-driven polling counter", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the count on every tick until it reaches a target
    Run {
        /// Count at which to stop
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        until: u64,

        /// Tick interval in milliseconds (overrides config)
        #[arg(short, long)]
        period_ms: Option<u64>,

        /// Make the callback fail when the count reaches this value
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        fail_at: Option<u64>,

        /// Output format for the final summary
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to this file instead of printing it
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },
}

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
