//! Checkout handlers.
//!
//! Command handler that turns a program purchase into a hosted checkout page.

mod create_checkout_session;

pub use create_checkout_session::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, CreateCheckoutSessionResult,
};
