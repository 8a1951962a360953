//! RecordParser — `hour|asset|decimal_price` lines into [`PriceRecord`]s.

use serde::{Deserialize, Serialize};
use std::io::BufRead;
use thiserror::Error;

use crate::domain::{Cents, Hour, PriceRecord};
use crate::error::{EngineError, Stream};

/// Field separator for input lines.
pub const FIELD_DELIMITER: char = '|';

/// Why a single line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 3 '|'-separated fields, found {0}")]
    FieldCount(usize),

    #[error("hour '{0}' is not a non-negative integer")]
    InvalidHour(String),

    #[error("price '{0}' is not a decimal number")]
    InvalidPrice(String),
}

/// How a decimal price becomes integer cents.
///
/// Both modes go through `f64`: the price is parsed, multiplied by 100 and
/// then converted. `Truncate` drops the fraction toward zero, so a value such
/// as `19.99` whose product lands just below the integer loses a cent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceConversion {
    #[default]
    Truncate,
    Round,
}

impl PriceConversion {
    pub fn to_cents(self, price: f64) -> Option<Cents> {
        let scaled = price * 100.0;
        let cents = match self {
            PriceConversion::Truncate => scaled.trunc(),
            PriceConversion::Round => scaled.round(),
        };
        // i64::MAX is not representable as f64; stay strictly inside the range.
        if cents.is_finite() && cents.abs() < 9.0e18 {
            Some(cents as Cents)
        } else {
            None
        }
    }
}

/// Options shared by both stream readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub conversion: PriceConversion,
    /// Skip lines that are empty after trimming instead of rejecting them.
    pub skip_blank_lines: bool,
}

/// Parse one input line.
///
/// The line is trimmed as a whole. Hour and price tolerate surrounding
/// whitespace; the asset id is taken verbatim, so `" A"` and `"A"` are
/// different assets and an empty id is valid.
pub fn parse_record(line: &str, conversion: PriceConversion) -> Result<PriceRecord, ParseError> {
    let fields: Vec<&str> = line.trim().split(FIELD_DELIMITER).collect();
    let [hour, asset, price] = fields.as_slice() else {
        return Err(ParseError::FieldCount(fields.len()));
    };

    let hour = hour.trim();
    let hour: Hour = hour
        .parse()
        .map_err(|_| ParseError::InvalidHour(hour.to_string()))?;

    let price_text = price.trim();
    let price = price_text
        .parse::<f64>()
        .ok()
        .and_then(|p| conversion.to_cents(p))
        .ok_or_else(|| ParseError::InvalidPrice(price_text.to_string()))?;

    Ok(PriceRecord {
        hour,
        asset: asset.to_string(),
        price,
    })
}

/// Parse a numbered line of `stream`. `Ok(None)` means the line was skipped.
pub(crate) fn parse_line(
    line: &str,
    line_no: usize,
    stream: Stream,
    opts: &ParseOptions,
) -> Result<Option<PriceRecord>, EngineError> {
    if opts.skip_blank_lines && line.trim().is_empty() {
        return Ok(None);
    }
    parse_record(line, opts.conversion)
        .map(Some)
        .map_err(|source| EngineError::MalformedRecord {
            stream,
            line: line_no,
            source,
        })
}

/// Feed every line of `reader` to `f`, reusing one buffer.
pub fn for_each_line<R, F>(mut reader: R, stream: Stream, mut f: F) -> Result<(), EngineError>
where
    R: BufRead,
    F: FnMut(&str) -> Result<(), EngineError>,
{
    let mut buf = String::new();
    loop {
        buf.clear();
        let n = reader
            .read_line(&mut buf)
            .map_err(|source| EngineError::Io { stream, source })?;
        if n == 0 {
            return Ok(());
        }
        f(&buf)?;
    }
}
