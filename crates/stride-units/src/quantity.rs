//! Dimension-checked quantities.
//!
//! Badge thresholds and accumulators are numbers tagged with a unit.
//! Arithmetic and comparison convert through the dimension's base unit
//! and fail fast when the dimensions don't match, so a distance can
//! never be silently added to a duration.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Physical dimension of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Distance,
    Time,
    Dimensionless,
}

/// Units the badge catalog is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Meters,
    Kilometers,
    Miles,
    Seconds,
    Minutes,
    Hours,
    Days,
    /// Dimensionless count (pace-threshold and similar tallies).
    Count,
}

impl Unit {
    /// Dimension this unit measures.
    pub const fn dimension(self) -> Dimension {
        match self {
            Unit::Meters | Unit::Kilometers | Unit::Miles => Dimension::Distance,
            Unit::Seconds | Unit::Minutes | Unit::Hours | Unit::Days => Dimension::Time,
            Unit::Count => Dimension::Dimensionless,
        }
    }

    /// Scale factor to the dimension's base unit (meters, seconds, 1).
    pub const fn factor(self) -> f64 {
        match self {
            Unit::Meters => 1.0,
            Unit::Kilometers => 1000.0,
            Unit::Miles => 1609.344,
            Unit::Seconds => 1.0,
            Unit::Minutes => 60.0,
            Unit::Hours => 3600.0,
            Unit::Days => 86400.0,
            Unit::Count => 1.0,
        }
    }

    /// Short label for log lines and display.
    pub const fn label(self) -> &'static str {
        match self {
            Unit::Meters => "m",
            Unit::Kilometers => "km",
            Unit::Miles => "mi",
            Unit::Seconds => "s",
            Unit::Minutes => "min",
            Unit::Hours => "h",
            Unit::Days => "d",
            Unit::Count => "",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Raised when two quantities of different dimensions meet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("incompatible dimensions: cannot combine {lhs} ({lhs_dim:?}) with {rhs} ({rhs_dim:?})")]
    IncompatibleDimensions {
        lhs: Unit,
        lhs_dim: Dimension,
        rhs: Unit,
        rhs_dim: Dimension,
    },
}

/// A numeric value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn zero(unit: Unit) -> Self {
        Self { value: 0.0, unit }
    }

    /// Convert to another unit of the same dimension.
    pub fn to(self, unit: Unit) -> Result<Quantity, UnitError> {
        if self.unit.dimension() != unit.dimension() {
            return Err(UnitError::IncompatibleDimensions {
                lhs: self.unit,
                lhs_dim: self.unit.dimension(),
                rhs: unit,
                rhs_dim: unit.dimension(),
            });
        }
        Ok(Quantity::new(
            self.value * self.unit.factor() / unit.factor(),
            unit,
        ))
    }

    /// Value expressed in the given unit.
    pub fn value_in(self, unit: Unit) -> Result<f64, UnitError> {
        Ok(self.to(unit)?.value)
    }

    /// Left-to-right dimension check, so errors name the operands in
    /// the order they were written.
    fn same_dimension(self, rhs: Quantity) -> Result<(), UnitError> {
        if self.unit.dimension() != rhs.unit.dimension() {
            return Err(UnitError::IncompatibleDimensions {
                lhs: self.unit,
                lhs_dim: self.unit.dimension(),
                rhs: rhs.unit,
                rhs_dim: rhs.unit.dimension(),
            });
        }
        Ok(())
    }

    /// Sum, expressed in the left-hand unit.
    pub fn try_add(self, rhs: Quantity) -> Result<Quantity, UnitError> {
        self.same_dimension(rhs)?;
        let rhs = rhs.to(self.unit)?;
        Ok(Quantity::new(self.value + rhs.value, self.unit))
    }

    /// Ordering after conversion.
    pub fn try_cmp(self, rhs: Quantity) -> Result<Ordering, UnitError> {
        self.same_dimension(rhs)?;
        let rhs = rhs.to(self.unit)?;
        Ok(self
            .value
            .partial_cmp(&rhs.value)
            .unwrap_or(Ordering::Equal))
    }

    /// `self >= rhs` after conversion.
    pub fn at_least(self, rhs: Quantity) -> Result<bool, UnitError> {
        Ok(self.try_cmp(rhs)? != Ordering::Less)
    }

    /// `self > rhs` after conversion.
    pub fn exceeds(self, rhs: Quantity) -> Result<bool, UnitError> {
        Ok(self.try_cmp(rhs)? == Ordering::Greater)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit == Unit::Count {
            write!(f, "{:.0}", self.value)
        } else {
            write!(f, "{:.2} {}", self.value, self.unit)
        }
    }
}

pub const fn meters(value: f64) -> Quantity {
    Quantity::new(value, Unit::Meters)
}

pub const fn kilometers(value: f64) -> Quantity {
    Quantity::new(value, Unit::Kilometers)
}

pub const fn miles(value: f64) -> Quantity {
    Quantity::new(value, Unit::Miles)
}

pub const fn seconds(value: f64) -> Quantity {
    Quantity::new(value, Unit::Seconds)
}

pub const fn minutes(value: f64) -> Quantity {
    Quantity::new(value, Unit::Minutes)
}

pub const fn hours(value: f64) -> Quantity {
    Quantity::new(value, Unit::Hours)
}

pub const fn days(value: f64) -> Quantity {
    Quantity::new(value, Unit::Days)
}

pub const fn count(value: f64) -> Quantity {
    Quantity::new(value, Unit::Count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_conversion() {
        let q = kilometers(5.0).to(Unit::Meters).unwrap();
        assert_eq!(q.value, 5000.0);
        assert_eq!(q.unit, Unit::Meters);

        let mi = kilometers(1.609344).to(Unit::Miles).unwrap();
        assert!((mi.value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(hours(2.0).value_in(Unit::Minutes).unwrap(), 120.0);
        assert_eq!(days(1.0).value_in(Unit::Seconds).unwrap(), 86400.0);
    }

    #[test]
    fn test_mixed_dimensions_fail() {
        let err = miles(1.0).try_add(seconds(30.0)).unwrap_err();
        assert!(matches!(err, UnitError::IncompatibleDimensions { .. }));
        assert!(kilometers(1.0).try_cmp(hours(1.0)).is_err());
    }

    #[test]
    fn test_mismatch_error_keeps_operand_order() {
        let UnitError::IncompatibleDimensions { lhs, lhs_dim, rhs, rhs_dim } =
            kilometers(1.0).try_cmp(hours(1.0)).unwrap_err();
        assert_eq!((lhs, lhs_dim), (Unit::Kilometers, Dimension::Distance));
        assert_eq!((rhs, rhs_dim), (Unit::Hours, Dimension::Time));
    }

    #[test]
    fn test_add_keeps_lhs_unit() {
        let sum = miles(1.0).try_add(kilometers(1.609344)).unwrap();
        assert_eq!(sum.unit, Unit::Miles);
        assert!((sum.value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_comparisons() {
        assert!(kilometers(10.0).at_least(miles(6.0)).unwrap());
        assert!(!kilometers(10.0).at_least(miles(6.3)).unwrap());
        assert!(minutes(90.0).exceeds(hours(1.0)).unwrap());
        assert!(!hours(1.0).exceeds(minutes(60.0)).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(miles(26.2).to_string(), "26.20 mi");
        assert_eq!(count(10.0).to_string(), "10");
    }
}
