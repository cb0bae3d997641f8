//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API.
//! Handles customer creation, checkout sessions, and webhook verification.
//!
//! # Security
//!
//! - HMAC-SHA256 signature verification with constant-time comparison
//! - Timestamp tolerance (5 minutes) against replayed deliveries
//! - Secrets handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key, webhook_secret);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::PaymentConfig;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentErrorCode, PaymentProvider, WebhookEvent,
};

use super::webhook_types::{
    hex_encode, SignatureHeader, StripeCheckoutSession, StripeCustomer, StripeErrorResponse,
    StripeWebhookEvent,
};

type HmacSha256 = Hmac<Sha256>;

/// Default signature tolerance for webhook events (5 minutes).
const DEFAULT_TOLERANCE_SECS: i64 = 300;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Maximum accepted age of a signed webhook, in seconds.
    tolerance_secs: i64,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            webhook_secret: SecretString::new(webhook_secret.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the webhook timestamp tolerance.
    pub fn with_tolerance_secs(mut self, secs: i64) -> Self {
        self.tolerance_secs = secs;
        self
    }
}

impl From<&PaymentConfig> for StripeConfig {
    fn from(config: &PaymentConfig) -> Self {
        Self::new(
            config.stripe_secret_key.clone(),
            config.stripe_webhook_secret.clone(),
        )
        .with_base_url(config.stripe_api_base_url.clone())
    }
}

/// Stripe payment provider adapter.
///
/// Implements `PaymentProvider` for Stripe API integration.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Verify webhook signature using HMAC-SHA256.
    ///
    /// # Security
    ///
    /// - Uses constant-time comparison to prevent timing attacks
    /// - Rejects events signed longer ago than the tolerance
    fn verify_signature(&self, payload: &[u8], header: &SignatureHeader) -> Result<(), PaymentError> {
        // 1. Compute expected signature over "<timestamp>.<payload>"
        let mut mac = HmacSha256::new_from_slice(
            self.config.webhook_secret.expose_secret().as_bytes(),
        )
        .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;

        mac.update(header.timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        let expected = mac.finalize().into_bytes();
        let expected_bytes: &[u8] = expected.as_slice();

        // 2. Constant-time comparison against every v1 entry
        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| expected_bytes.ct_eq(provided.as_slice()).unwrap_u8() == 1);

        if !matched {
            tracing::warn!(
                timestamp = header.timestamp,
                provided = header.v1_signatures.len(),
                "Invalid webhook signature"
            );
            return Err(PaymentError::invalid_webhook(
                "No signatures found matching the expected signature for payload",
            ));
        }

        // 3. Validate timestamp (prevent replay attacks)
        let now = chrono::Utc::now().timestamp();
        let age = now - header.timestamp;

        if self.config.tolerance_secs > 0 && age > self.config.tolerance_secs {
            tracing::warn!(
                event_timestamp = header.timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old - possible replay attack"
            );
            return Err(PaymentError::invalid_webhook(
                "Timestamp outside the tolerance zone",
            ));
        }

        Ok(())
    }

    /// Parse the verified payload into the port's event type.
    fn parse_event(&self, payload: &[u8]) -> Result<WebhookEvent, PaymentError> {
        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        Ok(WebhookEvent {
            id: stripe_event.id,
            event_type: stripe_event.event_type,
            object: stripe_event.data.object,
        })
    }

    /// POST a form to the Stripe API and decode the JSON response.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(path, status = status.as_u16(), error = %error_text, "Stripe request failed");
            return Err(api_error(status.as_u16(), &error_text));
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

/// Build a `PaymentError` from a non-2xx Stripe response body.
///
/// Uses Stripe's own `error.message` when the body is a Stripe error envelope
/// and falls back to the raw body otherwise.
fn api_error(status: u16, body: &str) -> PaymentError {
    let code = PaymentErrorCode::from_status(status);

    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(StripeErrorResponse { error }) => {
            let message = error
                .message
                .unwrap_or_else(|| format!("Stripe API error ({})", status));
            let err = PaymentError::new(code, message);
            match error.code {
                Some(provider_code) => err.with_provider_code(provider_code),
                None => err,
            }
        }
        Err(_) if body.is_empty() => {
            PaymentError::new(code, format!("Stripe API error ({})", status))
        }
        Err(_) => PaymentError::new(code, body),
    }
}

/// Form parameters for `POST /v1/customers`.
fn customer_form_params(request: &CreateCustomerRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("name".to_string(), request.name.clone()),
        ("email".to_string(), request.email.clone()),
    ];

    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    params
}

/// Form parameters for `POST /v1/checkout/sessions`.
fn checkout_form_params(request: &CreateCheckoutRequest) -> Vec<(String, String)> {
    let mut params = vec![
        ("customer".to_string(), request.customer_id.clone()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("mode".to_string(), request.mode.as_str().to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        let prefix = format!("line_items[{}]", i);
        params.push((
            format!("{}[price_data][currency]", prefix),
            item.currency.as_str().to_string(),
        ));
        params.push((
            format!("{}[price_data][product_data][name]", prefix),
            item.name.clone(),
        ));
        params.push((
            format!("{}[price_data][unit_amount]", prefix),
            item.unit_amount.to_string(),
        ));
        if let Some(recurring) = &item.recurring {
            params.push((
                format!("{}[price_data][recurring][interval]", prefix),
                recurring.interval.as_str().to_string(),
            ));
            params.push((
                format!("{}[price_data][recurring][interval_count]", prefix),
                recurring.interval_count.to_string(),
            ));
        }
        params.push((format!("{}[quantity]", prefix), item.quantity.to_string()));
    }

    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    params
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let params = customer_form_params(&request);
        let stripe_customer: StripeCustomer = self.post_form("/v1/customers", &params).await?;

        tracing::debug!(customer_id = %stripe_customer.id, "Stripe customer created");

        Ok(Customer {
            id: stripe_customer.id,
            email: stripe_customer.email.or(Some(request.email)),
            name: stripe_customer.name.or(Some(request.name)),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = checkout_form_params(&request);
        let stripe_session: StripeCheckoutSession =
            self.post_form("/v1/checkout/sessions", &params).await?;

        let url = stripe_session.url.ok_or_else(|| {
            PaymentError::provider(format!(
                "Checkout session {} has no redirect URL",
                stripe_session.id
            ))
        })?;

        tracing::debug!(
            session_id = %stripe_session.id,
            mode = stripe_session.mode.as_deref().unwrap_or(request.mode.as_str()),
            "Stripe checkout session created"
        );

        Ok(CheckoutSession {
            id: stripe_session.id,
            url,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        // 1. Parse signature header
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        // 2. Verify signature (includes timestamp validation)
        self.verify_signature(payload, &header)?;

        // 3. Parse event envelope
        let webhook_event = self.parse_event(payload)?;

        tracing::debug!(
            event_id = webhook_event.id.as_deref().unwrap_or("-"),
            event_type = %webhook_event.event_type,
            "Webhook signature verified"
        );

        Ok(webhook_event)
    }
}

/// Build a `Stripe-Signature` header value for a payload.
///
/// Mirrors what Stripe sends; used by tests and local tooling that replay
/// events against the webhook endpoint.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let result = mac.finalize().into_bytes();

    format!("t={},v1={}", timestamp, hex_encode(&result))
}
