//! Type-safe price representation using decimal arithmetic.
//!
//! All monetary amounts in the marketplace are carried as [`Price`], a thin
//! wrapper over `rust_decimal::Decimal`. Arithmetic stays at full decimal
//! precision; rounding to two places happens only when a value is displayed
//! or put on the wire, never between computation steps.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in the marketplace's single currency (USD).
///
/// Serializes as a decimal string (e.g., `"19.99"`) to preserve precision
/// across the wire and in the persisted cart file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a raw decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents (e.g., `1999` -> $19.99).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a price from a whole number of dollars.
    #[must_use]
    pub fn from_major(dollars: i64) -> Self {
        Self(Decimal::from(dollars))
    }

    /// The raw decimal amount, unrounded.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to two decimal places for display.
    ///
    /// Uses midpoint-away-from-zero rounding, the conventional behavior for
    /// retail price display.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtract, flooring the result at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        let result = self.0 - other.0;
        if result.is_sign_negative() {
            Self::ZERO
        } else {
            Self(result)
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.rounded())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
