//! # funnel-api
//!
//! HTTP API layer for astro-funnel.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout-creation endpoints redirecting to the hosted Shopify checkout
//! - Plan selection with best-effort intake form forwarding
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/create-checkout` | Create cart (or legacy checkout) and redirect |
//! | GET | `/api/legacy/create-checkout` | Legacy single-line checkout |
//! | POST | `/api/checkout/{plan}` | Select plan, forward intake form |
//! | GET | `/api/products/{handle}` | Product lookup |

pub mod forward;
pub mod handlers;
pub mod routes;
pub mod state;

pub use forward::{FormForwarder, IntakeSubmission};
pub use routes::create_router;
pub use state::{AppConfig, AppState, CheckoutHandler, CheckoutMode};
