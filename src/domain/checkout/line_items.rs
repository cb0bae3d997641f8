//! Line-item construction for a purchase.
//!
//! # Rules
//!
//! - `enrollment`: a one-time item for the enrollment fee when it is positive,
//!   plus a monthly item when the monthly fee is positive and at least one
//!   installment is requested.
//! - `installments` (and any unknown payment type): exactly one monthly item,
//!   whatever the fee or installment count.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::CheckoutError;
use super::money::{Currency, MinorUnits};
use super::purchase::{PaymentType, PurchaseRequest};

/// Billing interval for recurring items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceInterval {
    Month,
}

impl RecurrenceInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceInterval::Month => "month",
        }
    }
}

/// Recurrence descriptor attached to a subscription item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub interval: RecurrenceInterval,
    pub interval_count: u32,
}

impl Recurrence {
    pub fn monthly() -> Self {
        Self {
            interval: RecurrenceInterval::Month,
            interval_count: 1,
        }
    }
}

/// One purchasable unit in a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub currency: Currency,
    pub name: String,
    pub unit_amount: MinorUnits,
    pub quantity: u32,
    pub recurring: Option<Recurrence>,
}

impl LineItem {
    /// One-time charge for the enrollment fee.
    pub fn enrollment(program_name: &str, fee: Decimal) -> Result<Self, CheckoutError> {
        Ok(Self {
            currency: Currency::Eur,
            name: format!("Enrollment - {}", program_name),
            unit_amount: MinorUnits::from_decimal("enrollmentFee", fee)?,
            quantity: 1,
            recurring: None,
        })
    }

    /// Monthly recurring charge.
    pub fn monthly_fee(program_name: &str, fee: Decimal) -> Result<Self, CheckoutError> {
        Ok(Self {
            currency: Currency::Eur,
            name: format!("Monthly Fee - {}", program_name),
            unit_amount: MinorUnits::from_decimal("monthlyFee", fee)?,
            quantity: 1,
            recurring: Some(Recurrence::monthly()),
        })
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }
}

/// Build the line items for a purchase.
///
/// The list is empty only for an `enrollment` purchase with no positive fee
/// to charge.
pub fn build_line_items(request: &PurchaseRequest) -> Result<Vec<LineItem>, CheckoutError> {
    let mut items = Vec::with_capacity(2);

    match request.payment_type {
        PaymentType::Enrollment => {
            if request.enrollment_fee > Decimal::ZERO {
                items.push(LineItem::enrollment(
                    &request.program_name,
                    request.enrollment_fee,
                )?);
            }

            if request.monthly_fee > Decimal::ZERO && request.installments_count > 0 {
                items.push(LineItem::monthly_fee(
                    &request.program_name,
                    request.monthly_fee,
                )?);
            }
        }
        PaymentType::Installments => {
            items.push(LineItem::monthly_fee(
                &request.program_name,
                request.monthly_fee,
            )?);
        }
    }

    Ok(items)
}
