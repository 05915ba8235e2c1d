//! Store-currency amounts in integer minor units.
//!
//! Catalog prices arrive as JSON decimals (`999.99`). They are converted once,
//! at the boundary, so cart arithmetic never accumulates floating point error.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const MINOR_PER_MAJOR: u64 = 100;

/// Largest decimal amount accepted from the catalog.
const MAX_DECIMAL: f64 = 1.0e13;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MoneyError {
    #[error("price must be a finite number")]
    NotFinite,
    #[error("price must not be negative (got {0})")]
    Negative(f64),
    #[error("price {0} is out of range")]
    OutOfRange(f64),
}

/// A non-negative amount in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole currency units (`Money::from_major(10)` is `$10.00`).
    #[must_use]
    pub const fn from_major(units: u64) -> Self {
        Self(units.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Convert a decimal amount, rounding to the nearest cent.
    pub fn from_decimal(amount: f64) -> Result<Self, MoneyError> {
        if !amount.is_finite() {
            return Err(MoneyError::NotFinite);
        }
        if amount < 0.0 {
            return Err(MoneyError::Negative(amount));
        }
        if amount > MAX_DECIMAL {
            return Err(MoneyError::OutOfRange(amount));
        }
        Ok(Self((amount * MINOR_PER_MAJOR as f64).round() as u64))
    }

    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    /// Line amount for `quantity` units.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Two-decimal rendering with a caller-chosen currency symbol.
    #[must_use]
    pub fn display_with(self, symbol: &str) -> String {
        format!(
            "{symbol}{}.{:02}",
            self.0 / MINOR_PER_MAJOR,
            self.0 % MINOR_PER_MAJOR
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_with("$"))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}
