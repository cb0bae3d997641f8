//! Checkout session mode selection.

use serde::{Deserialize, Serialize};

use super::line_items::LineItem;

/// Charging mode of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Single one-time charge.
    Payment,

    /// At least one recurring charge.
    Subscription,
}

impl SessionMode {
    /// `Subscription` when there is more than one item or more than one
    /// installment, `Payment` otherwise.
    ///
    /// The installment count is consulted for every payment type, including
    /// plans whose line items ignored it.
    pub fn select(line_items: &[LineItem], installments_count: u32) -> Self {
        if line_items.len() > 1 || installments_count > 1 {
            SessionMode::Subscription
        } else {
            SessionMode::Payment
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Payment => "payment",
            SessionMode::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
