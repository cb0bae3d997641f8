//! Axum router configuration for the payment endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_checkout, handle_webhook, preflight, PaymentsAppState};

/// Create the payments router.
///
/// # Routes
///
/// ## Storefront Endpoints (no auth, called cross-origin)
/// - `OPTIONS /create-checkout` - Preflight acknowledgment
/// - `POST /create-checkout` - Start checkout
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhook` - Handle Stripe webhooks
///
/// # Example
///
/// ```ignore
/// let app = payments_router().with_state(PaymentsAppState::new(provider, checkout));
/// ```
pub fn payments_router() -> Router<PaymentsAppState> {
    Router::new()
        .route("/create-checkout", post(create_checkout).options(preflight))
        .route("/webhook", post(handle_webhook))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::stripe::MockPaymentProvider;
    use crate::config::CheckoutConfig;

    fn app(mock: &MockPaymentProvider) -> Router {
        payments_router().with_state(PaymentsAppState::new(
            Arc::new(mock.clone()),
            CheckoutConfig::default(),
        ))
    }

    #[tokio::test]
    async fn options_route_is_wired() {
        let mock = MockPaymentProvider::new();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/create-checkout")
            .body(Body::empty())
            .unwrap();

        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"message":"OK"}"#);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn webhook_route_is_wired() {
        let mock = MockPaymentProvider::new();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/webhook")
            .header("stripe-signature", "t=1,v1=aa")
            .body(Body::from(
                r#"{"type":"invoice.paid","data":{"object":{"customer":"cus_1"}}}"#,
            ))
            .unwrap();

        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(mock.was_called("verify_webhook"));
    }

    #[tokio::test]
    async fn get_on_checkout_is_not_allowed() {
        let mock = MockPaymentProvider::new();
        let request = Request::builder()
            .method(Method::GET)
            .uri("/create-checkout")
            .body(Body::empty())
            .unwrap();

        let response = app(&mock).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
