//! Smart store script runner.

mod config;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use interpreter::CommandProcessor;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, Config, LogFormat};

/// Installs the tracing subscriber. Logs go to stderr so stdout carries
/// only the report.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (text, json) = match config.log_format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    // 1. Layer configuration: environment first, flags on top
    let config = Config::from_env().merge(Cli::parse());

    // 2. Initialize tracing
    init_tracing(&config);

    // 3. Run the script
    let processor = CommandProcessor::new();
    let report = match &config.script {
        Some(path) => {
            tracing::info!(path = %path.display(), "running script");
            processor
                .process_file(path)
                .with_context(|| format!("cannot run script {}", path.display()))?
        }
        None => {
            tracing::info!("running script from stdin");
            processor.process_reader(std::io::stdin().lock())
        }
    };

    // 4. Print the report
    let mut out = std::io::stdout().lock();
    if config.pretty {
        serde_json::to_writer_pretty(&mut out, &report)?;
    } else {
        serde_json::to_writer(&mut out, &report)?;
    }
    writeln!(out)?;

    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.errors.len(),
        "script finished"
    );

    if config.strict && !report.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
