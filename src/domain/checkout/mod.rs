//! Checkout module - turning a program purchase into processor line items.
//!
//! Pure pricing rules only; the processor calls live in the application layer.

mod errors;
mod line_items;
mod money;
mod purchase;
mod session_mode;

pub use errors::CheckoutError;
pub use line_items::{build_line_items, LineItem, Recurrence, RecurrenceInterval};
pub use money::{Currency, MinorUnits};
pub use purchase::{PaymentType, PurchaseRequest, NO_DISCOUNT_LABEL};
pub use session_mode::SessionMode;

#[cfg(test)]
pub(crate) use purchase::test_support;
