//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum handlers exposing the checkout and webhook endpoints
//! - `stripe` - Stripe API client and a configurable test double

pub mod http;
pub mod stripe;

pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
