//! # Routes
//!
//! Axum router configuration for the checkout funnel.

use crate::handlers;
use crate::state::{AppState, CheckoutHandler};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Checkout:
///   - GET  /api/create-checkout - cart handler (or legacy, per `CHECKOUT_HANDLER`)
///   - GET  /api/legacy/create-checkout - legacy single-line handler
///   - POST /api/checkout/{plan} - plan selection with intake form
///
/// - Storefront:
///   - GET /api/products/{handle} - product lookup
///
/// - Health:
///   - GET /health, GET /
pub fn create_router(state: AppState) -> Router {
    // The funnel pages are served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let create_checkout = match state.config.handler {
        CheckoutHandler::Cart => get(handlers::create_checkout_cart),
        CheckoutHandler::Legacy => get(handlers::create_checkout_legacy),
    };

    let api_routes = Router::new()
        .route("/create-checkout", create_checkout)
        .route(
            "/legacy/create-checkout",
            get(handlers::create_checkout_legacy),
        )
        .route("/checkout/{plan}", post(handlers::checkout_plan))
        .route("/products/{handle}", get(handlers::get_product));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
