//! HTTP adapter for the payment endpoints.
//!
//! - `OPTIONS /create-checkout` - CORS preflight
//! - `POST /create-checkout` - Create customer and checkout session, return redirect URL
//! - `POST /webhook` - Verify and acknowledge Stripe webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{
    create_checkout, handle_webhook, preflight, CheckoutApiError, PaymentsAppState,
    WebhookApiError, SIGNATURE_HEADER,
};
pub use routes::payments_router;
