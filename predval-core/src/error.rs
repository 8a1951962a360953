//! Engine error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::parse::ParseError;

/// Which input stream a record or read failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Predicted,
    Actual,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Predicted => f.write_str("predicted"),
            Stream::Actual => f.write_str("actual"),
        }
    }
}

/// Errors from the aggregation engine. Any of them aborts the whole run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed record in {stream} stream at line {line}: {source}")]
    MalformedRecord {
        stream: Stream,
        line: usize,
        source: ParseError,
    },

    #[error("invalid window: {0}")]
    InvalidWindow(String),

    #[error("failed to read {stream} stream: {source}")]
    Io {
        stream: Stream,
        source: std::io::Error,
    },
}
