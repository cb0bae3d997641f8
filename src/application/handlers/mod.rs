//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod checkout;
pub mod notification;

pub use checkout::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
};
pub use notification::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler,
    HandlePaymentNotificationResult,
};
