//! PredictionIndex — predicted prices keyed by hour, then asset.
//!
//! Built once from the full predicted stream before the actual stream is
//! read, and read-only afterward. Input order does not matter; a repeated
//! `(hour, asset)` pair keeps the price from the later line.

use std::collections::HashMap;
use std::io::BufRead;

use crate::domain::{Cents, Hour, PriceRecord};
use crate::error::{EngineError, Stream};
use crate::parse::{for_each_line, parse_line, ParseOptions};

/// Lookup from `(hour, asset)` to predicted price.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionIndex {
    hours: HashMap<Hour, HashMap<String, Cents>>,
    pairs: usize,
}

impl PredictionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from in-memory lines. Aborts on the first malformed line.
    pub fn build<I, S>(lines: I, opts: &ParseOptions) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = PredictionIndexBuilder::new(*opts);
        for line in lines {
            builder.push_line(line.as_ref())?;
        }
        Ok(builder.finish())
    }

    /// Build by reading `reader` to the end.
    pub fn read<R: BufRead>(reader: R, opts: &ParseOptions) -> Result<Self, EngineError> {
        let mut builder = PredictionIndexBuilder::new(*opts);
        for_each_line(reader, Stream::Predicted, |line| builder.push_line(line))?;
        Ok(builder.finish())
    }

    /// Insert a prediction, returning the price it replaced, if any.
    pub fn insert(&mut self, record: PriceRecord) -> Option<Cents> {
        let previous = self
            .hours
            .entry(record.hour)
            .or_default()
            .insert(record.asset, record.price);
        if previous.is_none() {
            self.pairs += 1;
        }
        previous
    }

    pub fn get(&self, hour: Hour, asset: &str) -> Option<Cents> {
        self.hours.get(&hour)?.get(asset).copied()
    }

    pub fn contains_hour(&self, hour: Hour) -> bool {
        self.hours.contains_key(&hour)
    }

    /// Number of distinct hours with at least one prediction.
    pub fn hour_count(&self) -> usize {
        self.hours.len()
    }

    /// Number of distinct `(hour, asset)` pairs.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}

/// Incremental builder: feed predicted lines one at a time.
#[derive(Debug)]
pub struct PredictionIndexBuilder {
    index: PredictionIndex,
    opts: ParseOptions,
    line_no: usize,
    records: u64,
    overwrites: u64,
}

impl PredictionIndexBuilder {
    pub fn new(opts: ParseOptions) -> Self {
        Self {
            index: PredictionIndex::new(),
            opts,
            line_no: 0,
            records: 0,
            overwrites: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) -> Result<(), EngineError> {
        self.line_no += 1;
        if let Some(record) = parse_line(line, self.line_no, Stream::Predicted, &self.opts)? {
            self.push_record(record);
        }
        Ok(())
    }

    pub fn push_record(&mut self, record: PriceRecord) {
        self.records += 1;
        if self.index.insert(record).is_some() {
            self.overwrites += 1;
        }
    }

    /// Records consumed so far (skipped blank lines excluded).
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn finish(self) -> PredictionIndex {
        tracing::debug!(
            records = self.records,
            pairs = self.index.len(),
            hours = self.index.hour_count(),
            overwrites = self.overwrites,
            "prediction index built"
        );
        self.index
    }
}
