//! Checkout error types.
//!
//! Every variant collapses to the same HTTP 500 response at the edge; the
//! variants exist so logs and tests can tell the causes apart. `Display`
//! yields the bare message that is returned to the storefront.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building a checkout session.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request body could not be parsed into a purchase request.
    #[error("{0}")]
    MalformedInput(String),

    /// A monetary field is negative or cannot be expressed in minor units.
    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: &'static str, value: Decimal },

    /// The payment processor rejected a call or could not be reached.
    #[error("{0}")]
    Processor(String),
}

impl CheckoutError {
    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    pub fn invalid_amount(field: &'static str, value: Decimal) -> Self {
        Self::InvalidAmount { field, value }
    }

    pub fn processor(message: impl Into<String>) -> Self {
        Self::Processor(message.into())
    }

    /// Short machine-readable label, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckoutError::MalformedInput(_) => "malformed_input",
            CheckoutError::InvalidAmount { .. } => "invalid_amount",
            CheckoutError::Processor(_) => "processor_rejection",
        }
    }
}
