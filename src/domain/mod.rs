//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `checkout` - Purchase requests, money conversion, line items, session mode
//! - `notification` - Payment lifecycle notifications from the processor

pub mod checkout;
pub mod notification;
