//! Notification error types.

use thiserror::Error;

/// Errors that occur while receiving a processor notification.
///
/// Bad signature, wrong secret, stale timestamp and unparsable envelope all
/// share one failure path.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{0}")]
    VerificationFailed(String),
}

impl NotificationError {
    pub fn verification_failed(message: impl Into<String>) -> Self {
        Self::VerificationFailed(message.into())
    }
}
