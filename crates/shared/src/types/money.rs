//! Money amounts with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use std::ops::Neg;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of fractional digits a stored amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// A signed monetary amount.
///
/// Wallet balances are never negative; transaction values are negative for
/// outgoing funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Largest amount a stored column holds: `NUMERIC(19, 2)`, i.e.
    /// `99999999999999999.99`.
    pub const MAX: Self = Self(Decimal::from_parts(
        2_313_682_943,
        2_328_306_436,
        0,
        false,
        MONEY_SCALE,
    ));

    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns a zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount has no more than two significant decimal places.
    ///
    /// Trailing zeros do not count: `10.500` fits, `10.505` does not.
    #[must_use]
    pub fn fits_cents(&self) -> bool {
        self.0.normalize().scale() <= MONEY_SCALE
    }

    /// Returns true if the magnitude fits a stored amount column.
    #[must_use]
    pub fn fits_storage(&self) -> bool {
        self.0.abs() <= Self::MAX.0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
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

impl std::str::FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s).map(Self)
    }
}
