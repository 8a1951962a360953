//! predval core — prediction-error engine.
//!
//! Turns two line-delimited `hour|asset|price` streams into average absolute
//! prediction error per sliding hour window:
//! - Record parsing into integer cents
//! - Prediction index keyed by hour and asset
//! - Single-pass hourly error series over the actual stream
//! - Incremental sliding-window averages (O(max_hour) for any window length)
//!
//! File handling and output formatting live in `predval-runner`.

pub mod domain;
pub mod error;
pub mod index;
pub mod parse;
pub mod pipeline;
pub mod reference;
pub mod series;
pub mod window;

pub use domain::{AverageError, Cents, Hour, HourAggregate, PriceRecord};
pub use error::{EngineError, Stream};
pub use index::{PredictionIndex, PredictionIndexBuilder};
pub use parse::{
    for_each_line, parse_record, ParseError, ParseOptions, PriceConversion, FIELD_DELIMITER,
};
pub use pipeline::{evaluate, Evaluation};
pub use series::{ErrorSeries, ErrorSeriesBuilder};
pub use window::{Regime, Window, WindowAverages, WindowResult};
