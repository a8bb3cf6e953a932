//! Decimal-backed money type.
//!
//! All monetary amounts in the storefront flow through [`Money`] so that
//! line totals and discounts are computed with exact decimal arithmetic,
//! never floats.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store's single currency.
///
/// Serializes transparently as the underlying decimal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a money value from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a money value from a whole number of major units.
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply a unit price by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Apply a percentage discount (e.g. `10` means 10% off).
    ///
    /// Out-of-range percentages are clamped to `0..=100`.
    #[must_use]
    pub fn apply_discount_percent(&self, percent: Decimal) -> Self {
        let hundred = Decimal::ONE_HUNDRED;
        let percent = percent.clamp(Decimal::ZERO, hundred);
        Self(self.0 * (hundred - percent) / hundred)
    }

    /// Line total for a quantity at this unit price with a percentage
    /// discount applied.
    #[must_use]
    pub fn line_total(&self, quantity: u32, discount_percent: Decimal) -> Self {
        self.times(quantity).apply_discount_percent(discount_percent)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
