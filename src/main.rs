use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use milenio_checkout::adapters::http::{payments_router, PaymentsAppState};
use milenio_checkout::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use milenio_checkout::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    config.validate()?;
    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        site_url = config.checkout.base_url(),
        "configuration loaded"
    );

    let payment_provider = StripePaymentAdapter::new(StripeConfig::from(&config.payment));
    let state = PaymentsAppState::new(Arc::new(payment_provider), config.checkout.clone());

    let app = payments_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// JSON lines in production, human-readable output otherwise.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
