//! predval CLI — average prediction error over sliding hour windows.
//!
//! Usage: `predval <WINDOW_FILE> <ACTUAL_FILE> <PREDICTED_FILE> <OUTPUT_FILE>`
//!
//! Exactly four positional arguments; anything else prints usage and exits
//! non-zero. Optional settings come from the TOML file named by
//! `PREDVAL_CONFIG`; log verbosity from `RUST_LOG` (default `predval=info`).
//! Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use predval_runner::{run, RunPaths, RunSummary, RunnerConfig, CONFIG_ENV};

#[derive(Parser, Debug)]
#[command(
    name = "predval",
    about = "Average absolute prediction error per sliding hour window"
)]
struct Cli {
    /// File holding the window length in hours (a single positive integer).
    window_file: PathBuf,

    /// Actual prices, `hour|asset|price` per line, in non-decreasing hour order.
    actual_file: PathBuf,

    /// Predicted prices, `hour|asset|price` per line, any order.
    predicted_file: PathBuf,

    /// Destination for `start|end|average` lines. Replaced only on success.
    output_file: PathBuf,
}

impl Cli {
    fn paths(&self) -> RunPaths {
        RunPaths::new(
            &self.window_file,
            &self.actual_file,
            &self.predicted_file,
            &self.output_file,
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = RunnerConfig::from_env()
        .with_context(|| format!("failed to load config from ${CONFIG_ENV}"))?;
    tracing::debug!(?config, "configuration loaded");

    let summary = run(&cli.paths(), &config).context("comparison failed")?;
    print_summary(&summary);

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "predval=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_summary(summary: &RunSummary) {
    println!(
        "Wrote {} window(s) ({} NA) to {}",
        summary.windows_emitted,
        summary.na_windows,
        summary.output_path.display()
    );
}
