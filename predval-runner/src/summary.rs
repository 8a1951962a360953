//! Run summary — provenance and counts for one run, persisted as JSON.

use chrono::{DateTime, Utc};
use predval_core::{PriceConversion, Regime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::input::Fingerprint;
use crate::runner::RunError;

/// Current schema version for persisted summaries.
pub const SCHEMA_VERSION: u32 = 1;

/// What was read from one input stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSummary {
    pub path: PathBuf,
    pub records: u64,
    pub fingerprint: Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub output_path: PathBuf,
    pub window: u64,
    pub regime: Regime,
    pub max_hour: u64,
    pub price_conversion: PriceConversion,
    pub predicted: StreamSummary,
    pub actual: StreamSummary,
    /// Distinct `(hour, asset)` pairs in the prediction index.
    pub predicted_pairs: usize,
    /// Actual records that had a prediction for the same hour and asset.
    pub matched_records: u64,
    pub windows_emitted: u64,
    pub na_windows: u64,
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), RunError> {
        let summary_err = |source: std::io::Error| RunError::Summary {
            path: path.to_path_buf(),
            source,
        };
        let json = self.to_json().map_err(|e| summary_err(e.into()))?;
        std::fs::write(path, json).map_err(summary_err)
    }

    /// Identical inputs processed identically, regardless of when or where.
    pub fn same_inputs(&self, other: &RunSummary) -> bool {
        self.window == other.window
            && self.price_conversion == other.price_conversion
            && self.predicted.fingerprint == other.predicted.fingerprint
            && self.actual.fingerprint == other.actual.fingerprint
    }
}
