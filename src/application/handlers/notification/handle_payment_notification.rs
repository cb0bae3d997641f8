//! HandlePaymentNotificationHandler - Command handler for processor webhooks.

use std::sync::Arc;

use crate::domain::notification::{NotificationError, NotificationKind};
use crate::ports::PaymentProvider;

/// Command to handle a payment notification.
#[derive(Debug, Clone)]
pub struct HandlePaymentNotificationCommand {
    /// Raw webhook payload, byte for byte as delivered.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header, if the request carried one.
    pub signature: Option<String>,
}

/// Result of notification processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentNotificationResult {
    /// A recognized lifecycle event was logged.
    Recorded {
        kind: NotificationKind,
        event_id: Option<String>,
        customer_id: Option<String>,
    },
    /// Event acknowledged without action.
    Ignored { event_type: String },
}

/// Handler for processor notifications.
///
/// Verifies the delivery, then logs recognized lifecycle events. No state is
/// kept, so redelivered events are logged again.
pub struct HandlePaymentNotificationHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl HandlePaymentNotificationHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentNotificationCommand,
    ) -> Result<HandlePaymentNotificationResult, NotificationError> {
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                NotificationError::verification_failed(
                    "No stripe-signature header value was provided.",
                )
            })?;

        // 1. Verify webhook signature and parse event
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, signature)
            .await
            .map_err(|e| NotificationError::verification_failed(e.message))?;

        // 2. Dispatch on event type
        let Some(kind) = NotificationKind::from_event_type(&event.event_type) else {
            return Ok(HandlePaymentNotificationResult::Ignored {
                event_type: event.event_type,
            });
        };

        let customer_id = event.customer_id().map(str::to_string);

        tracing::info!(
            event_id = event.id.as_deref().unwrap_or("-"),
            event_type = kind.event_type(),
            customer_id = customer_id.as_deref().unwrap_or("-"),
            "{}",
            kind.log_message()
        );

        Ok(HandlePaymentNotificationResult::Recorded {
            kind,
            event_id: event.id,
            customer_id,
        })
    }
}
