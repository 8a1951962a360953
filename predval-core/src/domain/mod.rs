//! Domain types shared by every pipeline stage.

pub mod aggregate;
pub mod record;

pub use aggregate::{AverageError, HourAggregate};
pub use record::{Cents, Hour, PriceRecord};
