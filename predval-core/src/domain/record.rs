//! PriceRecord — one parsed `hour|asset|price` line.

use serde::{Deserialize, Serialize};

/// Opaque hour ordinal. Not a wall-clock value; only ordering matters.
pub type Hour = u64;

/// Price in minor currency units (cents).
pub type Cents = i64;

/// A single price observation for one asset in one hour.
///
/// Used for both the predicted and the actual stream; the stream a record
/// came from is tracked by the caller, not by the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRecord {
    pub hour: Hour,
    pub asset: String,
    pub price: Cents,
}

impl PriceRecord {
    pub fn new(hour: Hour, asset: impl Into<String>, price: Cents) -> Self {
        Self {
            hour,
            asset: asset.into(),
            price,
        }
    }

    /// Absolute difference to another price, in cents.
    pub fn abs_error(&self, other: Cents) -> u64 {
        self.price.abs_diff(other)
    }
}
