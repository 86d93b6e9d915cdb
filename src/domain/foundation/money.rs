//! Money value object for non-negative monetary amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A non-negative monetary amount in minor units (cents).
///
/// Used for plan prices and subscription price snapshots. Amounts never go
/// below zero; the constructor rejects negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a Money value, returning an error for negative amounts.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::negative("price", cents));
        }
        Ok(Self(cents))
    }

    /// Returns the amount in minor units.
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Adds two amounts, saturating at `i64::MAX`.
    pub fn add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_cents_accepts_zero() {
        assert_eq!(Money::from_cents(0).unwrap(), Money::ZERO);
    }

    #[test]
    fn from_cents_rejects_negative() {
        assert!(Money::from_cents(-1).is_err());
    }

    #[test]
    fn add_accumulates() {
        let a = Money::from_cents(100).unwrap();
        let b = Money::from_cents(50).unwrap();
        assert_eq!(a.add(b).cents(), 150);
    }

    #[test]
    fn add_saturates_instead_of_overflowing() {
        let a = Money::from_cents(i64::MAX).unwrap();
        let b = Money::from_cents(1).unwrap();
        assert_eq!(a.add(b).cents(), i64::MAX);
    }

    #[test]
    fn displays_with_two_decimal_places() {
        let m = Money::from_cents(12345).unwrap();
        assert_eq!(format!("{}", m), "123.45");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let m = Money::from_cents(9990).unwrap();
        assert_eq!(serde_json::to_string(&m).unwrap(), "9990");
    }
}
