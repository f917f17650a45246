//! Dimension-checked quantities and wire-timestamp parsing for Stride.
//!
//! The badge engine consumes these as collaborators: every threshold and
//! accumulator carries a [`Quantity`], and all arithmetic between them is
//! dimension-checked. Timestamp helpers decode the two wire shapes the
//! activity provider uses.

pub mod quantity;
pub mod timestamp;

pub use quantity::{
    count, days, hours, kilometers, meters, miles, minutes, seconds, Dimension, Quantity, Unit,
    UnitError,
};
pub use timestamp::{parse_local, parse_utc, TimestampError};
