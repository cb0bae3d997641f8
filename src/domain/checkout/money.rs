//! Money primitives for checkout line items.
//!
//! The processor expects integer amounts in the smallest currency unit.
//! Prices arrive as decimals, so conversion rounds half away from zero on the
//! exact decimal value (49.995 becomes 5000, never 4999).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::CheckoutError;

/// Currency accepted by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Eur,
}

impl Currency {
    /// Lowercase ISO code as the processor expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Eur => "eur",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Integer amount in minor currency units (cents for EUR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub const ZERO: Self = Self(0);

    /// Wrap a raw minor-unit count.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Convert a decimal major-unit amount into minor units.
    ///
    /// Computes `round(amount * 100)` with midpoints rounded away from zero.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidAmount` if the result does not fit in an
    /// `i64`.
    pub fn from_decimal(field: &'static str, amount: Decimal) -> Result<Self, CheckoutError> {
        let scaled = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| CheckoutError::invalid_amount(field, amount))?;

        scaled
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
            .ok_or_else(|| CheckoutError::invalid_amount(field, amount))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<MinorUnits> for i64 {
    fn from(amount: MinorUnits) -> Self {
        amount.0
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
