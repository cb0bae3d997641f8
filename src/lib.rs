//! Milenio Checkout - Tuition payment service for Programa Milenio
//!
//! This crate turns a program purchase from the storefront into a Stripe
//! checkout session and receives Stripe's payment lifecycle webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
