//! predval runner — the file-backed pipeline around `predval-core`.
//!
//! This crate provides:
//! - TOML configuration (price conversion, blank-line handling, summary path)
//! - Input readers that fingerprint each stream with BLAKE3 while parsing
//! - Window-file parsing
//! - All-or-nothing output via a temporary file and atomic rename
//! - A JSON run summary

pub mod config;
pub mod input;
pub mod output;
pub mod runner;
pub mod summary;

pub use config::{ConfigError, RunnerConfig, CONFIG_ENV};
pub use input::{read_window, Fingerprint, FingerprintReader};
pub use output::{write_windows, OutputStats, WindowWriter};
pub use runner::{run, RunError, RunPaths};
pub use summary::{RunSummary, StreamSummary, SCHEMA_VERSION};
