//! File-backed pipeline: window file, predicted and actual streams in, one
//! comparison file out.

use chrono::Utc;
use predval_core::{
    for_each_line, EngineError, ErrorSeries, Evaluation, PredictionIndexBuilder, Stream,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConfigError, RunnerConfig};
use crate::input::{open_stream, read_window};
use crate::output::write_windows;
use crate::summary::{RunSummary, StreamSummary, SCHEMA_VERSION};

/// Errors from a run. Nothing is written to the output path when any occurs.
///
/// `Summary` is only returned by [`RunSummary::save`]; `run` logs it instead.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot open {stream} file '{}': {source}", .path.display())]
    OpenInput {
        stream: Stream,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read window file '{}': {source}", .path.display())]
    ReadWindow {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("window file '{}': {source}", .path.display())]
    WindowFile { path: PathBuf, source: EngineError },

    #[error("cannot write output '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write run summary '{}': {source}", .path.display())]
    Summary {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The four files a run touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub window: PathBuf,
    pub actual: PathBuf,
    pub predicted: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    pub fn new(
        window: impl Into<PathBuf>,
        actual: impl Into<PathBuf>,
        predicted: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            window: window.into(),
            actual: actual.into(),
            predicted: predicted.into(),
            output: output.into(),
        }
    }
}

/// Run the whole pipeline from files.
///
/// The actual file must list records in non-decreasing hour order.
pub fn run(paths: &RunPaths, config: &RunnerConfig) -> Result<RunSummary, RunError> {
    let opts = config.parse_options();

    let window = read_window(&paths.window)?;
    tracing::debug!(window = window.hours(), "window loaded");

    let mut reader = open_stream(&paths.predicted, Stream::Predicted)?;
    let mut builder = PredictionIndexBuilder::new(opts);
    for_each_line(&mut reader, Stream::Predicted, |line| builder.push_line(line))?;
    let predicted = stream_summary(&paths.predicted, builder.records(), reader);
    let index = builder.finish();
    tracing::info!(
        path = %paths.predicted.display(),
        records = predicted.records,
        pairs = index.len(),
        hours = index.hour_count(),
        "prediction index loaded"
    );

    let mut reader = open_stream(&paths.actual, Stream::Actual)?;
    let series = ErrorSeries::read(&mut reader, &index, &opts)?;
    let actual = stream_summary(&paths.actual, series.records_seen(), reader);
    tracing::info!(
        path = %paths.actual.display(),
        records = actual.records,
        matched = series.matched(),
        max_hour = series.max_hour(),
        "error series built"
    );

    let evaluation = Evaluation::new(series, window, index.len());
    drop(index);

    let stats = write_windows(&paths.output, evaluation.windows())?;
    tracing::info!(
        path = %paths.output.display(),
        regime = ?evaluation.regime(),
        windows = stats.windows,
        na_windows = stats.na_windows,
        "comparison written"
    );

    let summary = RunSummary {
        schema_version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        output_path: paths.output.clone(),
        window: window.hours(),
        regime: evaluation.regime(),
        max_hour: evaluation.max_hour(),
        price_conversion: opts.conversion,
        predicted,
        actual,
        predicted_pairs: evaluation.predicted_pairs,
        matched_records: evaluation.series.matched(),
        windows_emitted: stats.windows,
        na_windows: stats.na_windows,
    };

    // Output is already persisted; summary failures are only logged.
    if let Some(path) = &config.output.summary_path {
        match summary.save(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "run summary saved"),
            Err(err) => tracing::warn!(error = %err, "run summary not saved"),
        }
    }

    Ok(summary)
}

fn stream_summary(
    path: &Path,
    records: u64,
    reader: std::io::BufReader<crate::input::FingerprintReader<std::fs::File>>,
) -> StreamSummary {
    StreamSummary {
        path: path.to_path_buf(),
        records,
        fingerprint: reader.into_inner().finish(),
    }
}
