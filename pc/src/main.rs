//! pc - tick-driven polling counter
//!
//! CLI entry point for running a counter to a target count.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use pollcounter::cli::{Cli, Command, OutputFormat};
use pollcounter::config::Config;
use pollcounter::{CounterError, PollingCounter};

/// Failure injected by `--fail-at`
#[derive(Debug, Error)]
#[error("injected failure at count {0}")]
struct InjectedFailure(u64);

fn parse_level(s: &str) -> tracing::Level {
    match s.to_uppercase().as_str() {
        "TRACE" => tracing::Level::TRACE,
        "DEBUG" => tracing::Level::DEBUG,
        "INFO" => tracing::Level::INFO,
        "WARN" | "WARNING" => tracing::Level::WARN,
        "ERROR" => tracing::Level::ERROR,
        _ => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pollcounter")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = cli_log_level
        .or(config_log_level)
        .map(parse_level)
        .unwrap_or(tracing::Level::INFO);

    let log_file = fs::File::create(log_dir.join("pollcounter.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Run {
            until,
            period_ms,
            fail_at,
            format,
        } => cmd_run(&config, until, period_ms, fail_at, format).await,
        Command::Config { save } => cmd_config(&config, save.as_deref()),
    }
}

/// Run a counter that prints each count and stops at `until`
async fn cmd_run(
    config: &Config,
    until: u64,
    period_ms: Option<u64>,
    fail_at: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let mut counter_config = config.counter.clone();
    if let Some(period_ms) = period_ms {
        counter_config.period_ms = period_ms;
    }
    info!(until, period_ms = counter_config.period_ms, ?fail_at, "cmd_run: starting counter");

    let counter = PollingCounter::new(counter_config);
    let result = counter
        .try_run(|count| {
            if fail_at == Some(count) {
                return Err(InjectedFailure(count));
            }
            println!("{}", count);
            Ok(count == until)
        })
        .await;

    match result {
        Ok(outcome) => {
            match format {
                OutputFormat::Text => println!(
                    "{} Stopped at count {} after {}ms",
                    "✓".green(),
                    outcome.final_count.to_string().cyan(),
                    outcome.elapsed_ms
                ),
                OutputFormat::Json => println!("{}", serde_json::to_string(&outcome)?),
            }
            Ok(())
        }
        Err(e) => match format {
            OutputFormat::Text => Err(e).context("Counter run failed"),
            OutputFormat::Json => {
                // stderr carries a single JSON line, so skip the eyre report
                report_json_failure(&e)?;
                std::process::exit(1);
            }
        },
    }
}

fn report_json_failure(err: &CounterError) -> Result<()> {
    let value = serde_json::json!({
        "error": err.to_string(),
        "count": err.count(),
    });
    eprintln!("{}", serde_json::to_string(&value)?);
    Ok(())
}

/// Print the effective configuration, optionally writing it to a file
fn cmd_config(config: &Config, save: Option<&Path>) -> Result<()> {
    if let Some(path) = save {
        config.save(path)?;
        info!(path = %path.display(), "cmd_config: saved configuration");
        println!("{} Saved configuration to {}", "✓".green(), path.display());
        return Ok(());
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    print!("{}", yaml);
    Ok(())
}
