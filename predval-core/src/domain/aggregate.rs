//! HourAggregate — the incremental `{count, error_sum}` accumulator.
//!
//! The same type serves as the per-hour bucket in the error series and as the
//! running sum of the sliding window: a window slides by `add`ing the hour that
//! enters and `remove`ing the hour that leaves, so each step is O(1).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Matched-record count and summed absolute error (cents) for a span of hours.
///
/// A single error can approach `u64::MAX` cents, so the sum is held in `u128`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourAggregate {
    pub count: u64,
    pub error_sum: u128,
}

impl HourAggregate {
    pub const ZERO: HourAggregate = HourAggregate {
        count: 0,
        error_sum: 0,
    };

    pub fn new(count: u64, error_sum: u128) -> Self {
        Self { count, error_sum }
    }

    /// Account for one matched record with the given absolute error.
    pub fn record(&mut self, abs_error: u64) {
        self.count += 1;
        self.error_sum += u128::from(abs_error);
    }

    /// Fold another aggregate into this one.
    pub fn add(&mut self, other: &HourAggregate) {
        self.count += other.count;
        self.error_sum += other.error_sum;
    }

    /// Undo a previous `add` of `other`.
    ///
    /// Only valid for aggregates that were previously added; removing anything
    /// else underflows.
    pub fn remove(&mut self, other: &HourAggregate) {
        self.count -= other.count;
        self.error_sum -= other.error_sum;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean absolute error over the matched records, or NA when nothing matched.
    pub fn average(&self) -> AverageError {
        if self.count == 0 {
            AverageError::NotAvailable
        } else {
            AverageError::Value {
                error_sum: self.error_sum,
                count: self.count,
            }
        }
    }
}

impl<'a> std::iter::Sum<&'a HourAggregate> for HourAggregate {
    fn sum<I: Iterator<Item = &'a HourAggregate>>(iter: I) -> Self {
        iter.fold(HourAggregate::ZERO, |mut acc, h| {
            acc.add(h);
            acc
        })
    }
}

/// Average absolute error of a window, kept as an exact rational.
///
/// `Value` is `error_sum / count` cents; converting to dollars and rounding
/// happens only when the value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AverageError {
    Value { error_sum: u128, count: u64 },
    NotAvailable,
}

impl AverageError {
    /// Output token for windows without any matched record.
    pub const NA_TOKEN: &'static str = "NA";

    pub fn is_available(&self) -> bool {
        matches!(self, AverageError::Value { .. })
    }

    /// Average in whole cents, rounded half-up.
    ///
    /// Computed in integer arithmetic so the result never depends on binary
    /// floating-point representation.
    pub fn rounded_cents(&self) -> Option<u128> {
        match *self {
            AverageError::Value { error_sum, count } => {
                let count = u128::from(count);
                let (whole, rem) = (error_sum / count, error_sum % count);
                Some(if 2 * rem >= count { whole + 1 } else { whole })
            }
            AverageError::NotAvailable => None,
        }
    }
}

/// Dollars with exactly two decimals (`0.50`), or `NA`.
impl fmt::Display for AverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rounded_cents() {
            Some(cents) => write!(f, "{}.{:02}", cents / 100, cents % 100),
            None => f.write_str(Self::NA_TOKEN),
        }
    }
}
