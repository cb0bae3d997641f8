//! Payment provider port for external payment processing.
//!
//! Defines the contract for the payment gateway (Stripe). The service needs
//! exactly three capabilities from it: create a customer, create a checkout
//! session, and verify an inbound webhook.
//!
//! # Design
//!
//! - **Narrow**: only what the two endpoints call
//! - **Stateless**: no operation depends on a previous call
//! - **Substitutable**: tests use `MockPaymentProvider`

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::{LineItem, SessionMode};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer record in the payment system.
    ///
    /// Returns the provider's customer for later reference.
    async fn create_customer(&self, request: CreateCustomerRequest)
        -> Result<Customer, PaymentError>;

    /// Create a checkout session.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Verify a webhook signature and parse the event envelope.
    ///
    /// Returns the parsed event if valid, error if signature invalid.
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer name.
    pub name: String,

    /// Customer email address.
    pub email: String,

    /// Free-form metadata stored on the customer.
    pub metadata: BTreeMap<String, String>,
}

/// Customer in the payment system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: String,

    /// Customer email.
    pub email: Option<String>,

    /// Customer name.
    pub name: Option<String>,
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Provider's customer ID the session is attached to.
    pub customer_id: String,

    /// Items to charge, in display order.
    pub line_items: Vec<LineItem>,

    /// One-time payment or subscription.
    pub mode: SessionMode,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,

    /// Free-form metadata stored on the session.
    pub metadata: BTreeMap<String, String>,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,
}

/// Verified webhook event from the payment provider.
///
/// Only the type tag is interpreted; the payload object is kept opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider, when present.
    pub id: Option<String>,

    /// Event type tag (e.g. `invoice.paid`).
    pub event_type: String,

    /// The object affected by the event (`data.object`).
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// Customer the event refers to.
    ///
    /// Accepts both a plain customer id and an expanded customer object.
    pub fn customer_id(&self) -> Option<&str> {
        match self.object.get("customer")? {
            serde_json::Value::String(id) => Some(id.as_str()),
            serde_json::Value::Object(customer) => customer.get("id")?.as_str(),
            _ => None,
        }
    }
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message, verbatim from the provider when available.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create a generic provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Create an invalid webhook error.
    pub fn invalid_webhook(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidWebhook, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Provider rejected the request parameters.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Invalid webhook signature or envelope.
    InvalidWebhook,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Categorize an HTTP status returned by the provider.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => PaymentErrorCode::AuthenticationError,
            400 | 402 | 404 => PaymentErrorCode::InvalidRequest,
            429 => PaymentErrorCode::RateLimitExceeded,
            _ => PaymentErrorCode::ProviderError,
        }
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::InvalidWebhook => "invalid_webhook",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    fn event_with_object(object: serde_json::Value) -> WebhookEvent {
        WebhookEvent {
            id: Some("evt_1".to_string()),
            event_type: "invoice.paid".to_string(),
            object,
        }
    }

    #[test]
    fn customer_id_from_string() {
        let event = event_with_object(json!({"customer": "cus_123"}));
        assert_eq!(event.customer_id(), Some("cus_123"));
    }

    #[test]
    fn customer_id_from_expanded_object() {
        let event = event_with_object(json!({"customer": {"id": "cus_456", "object": "customer"}}));
        assert_eq!(event.customer_id(), Some("cus_456"));
    }

    #[test]
    fn customer_id_missing_or_null() {
        assert_eq!(event_with_object(json!({})).customer_id(), None);
        assert_eq!(event_with_object(json!({"customer": null})).customer_id(), None);
        assert_eq!(event_with_object(json!("not an object")).customer_id(), None);
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::invalid_request("Amount must be positive");
        assert!(err.to_string().contains("invalid_request"));
        assert!(err.to_string().contains("Amount must be positive"));
    }

    #[test]
    fn payment_error_with_provider_code() {
        let err = PaymentError::provider("boom").with_provider_code("resource_missing");
        assert_eq!(err.provider_code.as_deref(), Some("resource_missing"));
        assert_eq!(err.code, PaymentErrorCode::ProviderError);
    }

    #[test]
    fn error_code_from_status() {
        assert_eq!(
            PaymentErrorCode::from_status(401),
            PaymentErrorCode::AuthenticationError
        );
        assert_eq!(PaymentErrorCode::from_status(400), PaymentErrorCode::InvalidRequest);
        assert_eq!(
            PaymentErrorCode::from_status(429),
            PaymentErrorCode::RateLimitExceeded
        );
        assert_eq!(PaymentErrorCode::from_status(500), PaymentErrorCode::ProviderError);
    }
}
