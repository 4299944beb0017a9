//! # Astro Funnel
//!
//! Checkout service for the astrology report funnel.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export SHOPIFY_STORE_DOMAIN=your-store.myshopify.com
//! export SHOPIFY_STOREFRONT_TOKEN=...
//! export FORM_FORWARD_URL=https://forms.example.com/f/intake
//!
//! # Run the server
//! astro-funnel
//! ```

use funnel_api::{routes, AppConfig, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration first: it decides the log format
    let config = AppConfig::from_env();
    init_tracing(config.json_logs);

    // Initialize application state
    let state = AppState::from_config(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Plans loaded: {}", state.plans.len());
    info!(
        "Checkout handler: {}, mode: {}",
        state.config.handler.as_str(),
        state.config.mode.as_str()
    );
    if !state.forwarder.is_enabled() {
        info!("Form forwarding disabled (FORM_FORWARD_URL not set)");
    }

    // Create router
    let app = routes::create_router(state);

    info!("Astro funnel starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: GET http://{}/api/create-checkout?handle=...", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}
