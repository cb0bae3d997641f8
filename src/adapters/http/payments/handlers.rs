//! HTTP handlers for the payment endpoints.
//!
//! These handlers connect Axum routes to the application layer command handlers.
//! Bodies are taken as raw bytes: the webhook needs the exact payload for
//! signature verification, and checkout parse failures must answer with the
//! same JSON error shape as processor failures.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, HandlePaymentNotificationCommand,
    HandlePaymentNotificationHandler,
};
use crate::config::CheckoutConfig;
use crate::domain::checkout::{CheckoutError, PurchaseRequest};
use crate::domain::notification::NotificationError;
use crate::ports::PaymentProvider;

use super::dto::{
    AckResponse, CheckoutUrlResponse, ErrorResponse, PreflightResponse, PurchaseRequestDto,
};

/// Header carrying the processor's webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; the provider is shared behind an `Arc`.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub checkout: CheckoutConfig,
}

impl PaymentsAppState {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, checkout: CheckoutConfig) -> Self {
        Self {
            payment_provider,
            checkout,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn create_checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(self.payment_provider.clone())
    }

    pub fn notification_handler(&self) -> HandlePaymentNotificationHandler {
        HandlePaymentNotificationHandler::new(self.payment_provider.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// CORS Headers
// ════════════════════════════════════════════════════════════════════════════════

fn allow_any_origin() -> [(HeaderName, &'static str); 1] {
    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")]
}

fn preflight_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
    ]
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// OPTIONS /create-checkout - CORS preflight
pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, preflight_headers(), Json(PreflightResponse::ok()))
}

/// POST /create-checkout - Open a hosted checkout page for a purchase
pub async fn create_checkout(
    State(state): State<PaymentsAppState>,
    body: Bytes,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let purchase = PurchaseRequestDto::from_slice(&body).and_then(PurchaseRequest::try_from)?;

    let cmd = CreateCheckoutSessionCommand {
        purchase,
        success_url: state.checkout.success_url(),
        cancel_url: state.checkout.cancel_url(),
    };

    let result = state.create_checkout_handler().handle(cmd).await?;

    let response = CheckoutUrlResponse {
        url: result.checkout_session.url,
    };
    Ok((StatusCode::OK, allow_any_origin(), Json(response)))
}

/// POST /webhook - Handle Stripe webhook events
pub async fn handle_webhook(
    State(state): State<PaymentsAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentNotificationCommand {
        payload: body.to_vec(),
        signature,
    };

    state.notification_handler().handle(cmd).await?;

    Ok(Json(AckResponse::received()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Checkout failure rendered as a 500 the storefront can read cross-origin.
#[derive(Debug)]
pub struct CheckoutApiError(CheckoutError);

impl From<CheckoutError> for CheckoutApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        let message = self.0.to_string();
        tracing::error!(kind = self.0.kind(), error = %message, "checkout failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            allow_any_origin(),
            Json(ErrorResponse::new(message)),
        )
            .into_response()
    }
}

/// Webhook failure; the processor retries on any non-2xx.
#[derive(Debug)]
pub struct WebhookApiError(NotificationError);

impl From<NotificationError> for WebhookApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(error = %self.0, "webhook verification failed");

        let body = ErrorResponse::new(format!("Webhook Error: {}", self.0));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
