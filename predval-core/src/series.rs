//! ErrorSeries — per-hour `{count, error_sum}` from the actual stream.
//!
//! The builder is a single forward pass with an hour cursor. It relies on the
//! actual stream arriving in non-decreasing hour order; this is a caller
//! obligation and is not checked. A record whose hour is lower than the cursor
//! is accounted to the cursor's hour, which yields a wrong but well-formed
//! series.

use std::io::BufRead;

use crate::domain::{Hour, HourAggregate, PriceRecord};
use crate::error::{EngineError, Stream};
use crate::index::PredictionIndex;
use crate::parse::{for_each_line, parse_line, ParseOptions};

/// Contiguous per-hour aggregates for hours `0..=max_hour`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSeries {
    hours: Vec<HourAggregate>,
    records_seen: u64,
}

impl ErrorSeries {
    /// Build from in-memory actual lines against a finished index.
    pub fn build<I, S>(
        lines: I,
        index: &PredictionIndex,
        opts: &ParseOptions,
    ) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = ErrorSeriesBuilder::new(index, *opts);
        for line in lines {
            builder.push_line(line.as_ref())?;
        }
        Ok(builder.finish())
    }

    /// Build by reading the actual stream from `reader` to the end.
    pub fn read<R: BufRead>(
        reader: R,
        index: &PredictionIndex,
        opts: &ParseOptions,
    ) -> Result<Self, EngineError> {
        let mut builder = ErrorSeriesBuilder::new(index, *opts);
        for_each_line(reader, Stream::Actual, |line| builder.push_line(line))?;
        Ok(builder.finish())
    }

    /// Wrap precomputed aggregates; an empty vector becomes a single zero hour.
    pub fn from_aggregates(mut hours: Vec<HourAggregate>) -> Self {
        if hours.is_empty() {
            hours.push(HourAggregate::ZERO);
        }
        Self {
            hours,
            records_seen: 0,
        }
    }

    pub fn max_hour(&self) -> Hour {
        (self.hours.len() - 1) as Hour
    }

    pub fn get(&self, hour: Hour) -> Option<&HourAggregate> {
        usize::try_from(hour).ok().and_then(|h| self.hours.get(h))
    }

    pub fn as_slice(&self) -> &[HourAggregate] {
        &self.hours
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hour, &HourAggregate)> {
        self.hours.iter().enumerate().map(|(h, agg)| (h as Hour, agg))
    }

    /// Actual records consumed while building, matched or not.
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Actual records that had a prediction for the same hour and asset.
    pub fn matched(&self) -> u64 {
        self.hours.iter().map(|h| h.count).sum()
    }

    /// Aggregate over every hour, including hour 0.
    pub fn total(&self) -> HourAggregate {
        self.hours.iter().sum()
    }
}

/// Single-pass builder over the actual stream.
#[derive(Debug)]
pub struct ErrorSeriesBuilder<'a> {
    index: &'a PredictionIndex,
    opts: ParseOptions,
    hours: Vec<HourAggregate>,
    current_hour: Hour,
    acc: HourAggregate,
    line_no: usize,
    records_seen: u64,
}

impl<'a> ErrorSeriesBuilder<'a> {
    pub fn new(index: &'a PredictionIndex, opts: ParseOptions) -> Self {
        Self {
            index,
            opts,
            hours: Vec::new(),
            current_hour: 0,
            acc: HourAggregate::ZERO,
            line_no: 0,
            records_seen: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) -> Result<(), EngineError> {
        self.line_no += 1;
        if let Some(record) = parse_line(line, self.line_no, Stream::Actual, &self.opts)? {
            self.push_record(&record);
        }
        Ok(())
    }

    pub fn push_record(&mut self, record: &PriceRecord) {
        self.records_seen += 1;

        while self.current_hour < record.hour {
            self.hours.push(self.acc);
            self.acc = HourAggregate::ZERO;
            self.current_hour += 1;
        }

        if let Some(predicted) = self.index.get(record.hour, &record.asset) {
            self.acc.record(record.abs_error(predicted));
        }
    }

    pub fn finish(mut self) -> ErrorSeries {
        self.hours.push(self.acc);
        let series = ErrorSeries {
            hours: self.hours,
            records_seen: self.records_seen,
        };
        tracing::debug!(
            records = series.records_seen,
            matched = series.matched(),
            max_hour = series.max_hour(),
            "error series built"
        );
        series
    }
}
