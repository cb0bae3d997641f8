//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call and request tracking
//! - Webhook verification modes

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentProvider, WebhookEvent,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure responses
/// mock.set_checkout_session(CheckoutSession { id: "cs_1".into(), url: "...".into() });
///
/// // Inject errors
/// mock.set_method_error("create_customer", PaymentError::invalid_request("Bad email"));
///
/// // Assert on what was sent
/// let sent = mock.checkout_requests();
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Next customer to return.
    next_customer: Option<Customer>,

    /// Next checkout session to return.
    next_checkout: Option<CheckoutSession>,

    /// Next webhook event to return.
    next_webhook_event: Option<WebhookEvent>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Customer requests received, in order.
    customer_requests: Vec<CreateCustomerRequest>,

    /// Checkout requests received, in order.
    checkout_requests: Vec<CreateCheckoutRequest>,

    /// Webhook verification behavior.
    webhook_verify_mode: WebhookVerifyMode,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

/// How to handle webhook verification.
#[derive(Default, Clone)]
enum WebhookVerifyMode {
    /// Accept any signature.
    #[default]
    AcceptAll,

    /// Accept only this exact signature header.
    RequireSignature(String),

    /// Always fail verification.
    AlwaysFail,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    /// Create a mock that accepts only the given signature header.
    pub fn requiring_signature(signature: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().webhook_verify_mode =
            WebhookVerifyMode::RequireSignature(signature.into());
        mock
    }

    /// Create a mock whose customer creation fails.
    pub fn failing_customer(message: &str) -> Self {
        let mock = Self::new();
        mock.set_method_error("create_customer", PaymentError::invalid_request(message));
        mock
    }

    /// Create a mock whose checkout session creation fails.
    pub fn failing_checkout(message: &str) -> Self {
        let mock = Self::new();
        mock.set_method_error(
            "create_checkout_session",
            PaymentError::invalid_request(message),
        );
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the customer to return on next `create_customer` call.
    pub fn set_customer(&self, customer: Customer) {
        self.inner.lock().unwrap().next_customer = Some(customer);
    }

    /// Set the checkout session to return.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.inner.lock().unwrap().next_checkout = Some(session);
    }

    /// Set the webhook event to return on verification.
    pub fn set_webhook_event(&self, event: WebhookEvent) {
        self.inner.lock().unwrap().next_webhook_event = Some(event);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Customer requests received so far.
    pub fn customer_requests(&self) -> Vec<CreateCustomerRequest> {
        self.inner.lock().unwrap().customer_requests.clone()
    }

    /// Checkout requests received so far.
    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.inner.lock().unwrap().checkout_requests.clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        let mut state = self.inner.lock().unwrap();
        state.call_log.clear();
        state.customer_requests.clear();
        state.checkout_requests.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call(
            "create_customer",
            vec![request.name.clone(), request.email.clone()],
        );
        self.check_error("create_customer")?;

        let mut state = self.inner.lock().unwrap();
        let sequence = state.customer_requests.len() + 1;
        state.customer_requests.push(request.clone());

        Ok(state.next_customer.take().unwrap_or_else(|| Customer {
            id: format!("cus_mock_{}", sequence),
            email: Some(request.email),
            name: Some(request.name),
        }))
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![
                request.customer_id.clone(),
                request.mode.to_string(),
                request.line_items.len().to_string(),
            ],
        );
        self.check_error("create_checkout_session")?;

        let mut state = self.inner.lock().unwrap();
        let sequence = state.checkout_requests.len() + 1;
        state.checkout_requests.push(request);

        Ok(state.next_checkout.take().unwrap_or_else(|| {
            let id = format!("cs_mock_{}", sequence);
            CheckoutSession {
                url: format!("https://checkout.stripe.com/c/pay/{}", id),
                id,
            }
        }))
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.record_call(
            "verify_webhook",
            vec![
                String::from_utf8_lossy(payload).chars().take(50).collect(),
                signature.chars().take(20).collect(),
            ],
        );
        self.check_error("verify_webhook")?;

        let state = self.inner.lock().unwrap();

        // Check verification mode
        match &state.webhook_verify_mode {
            WebhookVerifyMode::AcceptAll => {}
            WebhookVerifyMode::RequireSignature(required) => {
                if signature != required {
                    return Err(PaymentError::invalid_webhook(
                        "No signatures found matching the expected signature for payload",
                    ));
                }
            }
            WebhookVerifyMode::AlwaysFail => {
                return Err(PaymentError::invalid_webhook("Verification disabled"));
            }
        }

        // Return configured event or parse from payload
        if let Some(event) = &state.next_webhook_event {
            return Ok(event.clone());
        }

        let parsed: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(format!("Invalid JSON: {}", e)))?;

        let event_type = parsed["type"]
            .as_str()
            .ok_or_else(|| PaymentError::invalid_webhook("Invalid JSON: missing field `type`"))?;

        Ok(WebhookEvent {
            id: parsed["id"].as_str().map(str::to_string),
            event_type: event_type.to_string(),
            object: parsed["data"]["object"].clone(),
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Test Helpers
// ════════════════════════════════════════════════════════════════════════════════

impl MockPaymentProvider {
    /// Build a webhook event for a customer.
    pub fn event_for_customer(event_type: &str, customer_id: &str) -> WebhookEvent {
        WebhookEvent {
            id: Some(format!("evt_{}", event_type.replace('.', "_"))),
            event_type: event_type.to_string(),
            object: serde_json::json!({ "customer": customer_id }),
        }
    }

    /// Create a checkout completed webhook event.
    pub fn checkout_completed_event(customer_id: &str) -> WebhookEvent {
        Self::event_for_customer("checkout.session.completed", customer_id)
    }

    /// Create a payment failed webhook event.
    pub fn payment_failed_event(customer_id: &str) -> WebhookEvent {
        Self::event_for_customer("invoice.payment_failed", customer_id)
    }

    /// Create a subscription deleted webhook event.
    pub fn subscription_deleted_event(customer_id: &str) -> WebhookEvent {
        Self::event_for_customer("customer.subscription.deleted", customer_id)
    }
}
