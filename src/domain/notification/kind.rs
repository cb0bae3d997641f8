//! Recognized payment lifecycle notifications.
//!
//! Each kind is handled on its own; no kind depends on events seen before it.

use serde::{Deserialize, Serialize};

/// Processor event types this service reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// `checkout.session.completed`
    EnrollmentCompleted,

    /// `invoice.paid`
    InstallmentPaid,

    /// `invoice.payment_failed`
    PaymentFailed,

    /// `customer.subscription.deleted`
    SubscriptionEnded,
}

impl NotificationKind {
    /// Map a processor event type tag. Unrecognized tags yield `None`.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "checkout.session.completed" => Some(NotificationKind::EnrollmentCompleted),
            "invoice.paid" => Some(NotificationKind::InstallmentPaid),
            "invoice.payment_failed" => Some(NotificationKind::PaymentFailed),
            "customer.subscription.deleted" => Some(NotificationKind::SubscriptionEnded),
            _ => None,
        }
    }

    /// Processor event type tag for this kind.
    pub fn event_type(&self) -> &'static str {
        match self {
            NotificationKind::EnrollmentCompleted => "checkout.session.completed",
            NotificationKind::InstallmentPaid => "invoice.paid",
            NotificationKind::PaymentFailed => "invoice.payment_failed",
            NotificationKind::SubscriptionEnded => "customer.subscription.deleted",
        }
    }

    /// Log message emitted when this notification is received.
    pub fn log_message(&self) -> &'static str {
        match self {
            NotificationKind::EnrollmentCompleted => "enrollment completed",
            NotificationKind::InstallmentPaid => "installment paid",
            NotificationKind::PaymentFailed => "payment failed",
            NotificationKind::SubscriptionEnded => "subscription ended",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [NotificationKind; 4] = [
        NotificationKind::EnrollmentCompleted,
        NotificationKind::InstallmentPaid,
        NotificationKind::PaymentFailed,
        NotificationKind::SubscriptionEnded,
    ];

    #[test]
    fn event_type_tags_map_back_to_kind() {
        for kind in ALL {
            assert_eq!(NotificationKind::from_event_type(kind.event_type()), Some(kind));
        }
    }

    #[test]
    fn unrecognized_tags_are_none() {
        assert_eq!(NotificationKind::from_event_type("customer.created"), None);
        assert_eq!(
            NotificationKind::from_event_type("customer.subscription.updated"),
            None
        );
        assert_eq!(NotificationKind::from_event_type(""), None);
    }

    #[test]
    fn log_messages() {
        assert_eq!(
            NotificationKind::EnrollmentCompleted.log_message(),
            "enrollment completed"
        );
        assert_eq!(NotificationKind::InstallmentPaid.log_message(), "installment paid");
        assert_eq!(NotificationKind::PaymentFailed.log_message(), "payment failed");
        assert_eq!(
            NotificationKind::SubscriptionEnded.log_message(),
            "subscription ended"
        );
    }
}
