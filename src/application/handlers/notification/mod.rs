//! Notification handlers.
//!
//! Command handler for verified payment processor webhooks.

mod handle_payment_notification;

pub use handle_payment_notification::{
    HandlePaymentNotificationCommand, HandlePaymentNotificationHandler,
    HandlePaymentNotificationResult,
};
