//! Notification module - payment lifecycle events pushed by the processor.

mod errors;
mod kind;

pub use errors::NotificationError;
pub use kind::NotificationKind;
