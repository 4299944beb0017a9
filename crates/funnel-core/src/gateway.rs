//! # Storefront Gateway Trait
//!
//! The seam between the HTTP handlers and the commerce platform.
//! Handlers only ever talk to a `StorefrontGateway`; the Shopify
//! implementation lives in `funnel-shopify`.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          StorefrontGateway (trait)           │
//! │  ├── checkout_create()   legacy, one line    │
//! │  ├── cart_create()       cart, one line      │
//! │  └── first_variant_id()  product by handle   │
//! └──────────────────────────────────────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::merchandise::LineItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Validation message returned inside a mutation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    #[serde(default)]
    pub message: String,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// First non-empty message in a list of user errors
pub fn first_user_message(errors: &[UserError]) -> Option<&str> {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .find(|m| !m.is_empty())
}

/// Result of the legacy `checkoutCreate` mutation
#[derive(Debug, Clone, Default)]
pub struct RemoteCheckout {
    pub id: Option<String>,
    pub web_url: Option<String>,
    pub user_errors: Vec<UserError>,
    /// Raw upstream body, kept for diagnostics
    pub raw: String,
}

/// Result of the `cartCreate` mutation
#[derive(Debug, Clone, Default)]
pub struct RemoteCart {
    pub id: Option<String>,
    pub checkout_url: Option<String>,
    pub user_errors: Vec<UserError>,
}

impl RemoteCart {
    pub fn user_message(&self) -> Option<&str> {
        first_user_message(&self.user_errors)
    }
}

/// Commerce platform operations used by the checkout handlers.
///
/// One call per method, no retries. Transport failures come back as
/// `CheckoutError::Transport`.
#[async_trait]
pub trait StorefrontGateway: Send + Sync {
    /// Create a checkout holding a single line item.
    async fn checkout_create(&self, line: &LineItem) -> CheckoutResult<RemoteCheckout>;

    /// Create a cart holding a single line.
    async fn cart_create(&self, line: &LineItem) -> CheckoutResult<RemoteCart>;

    /// Look up a product by handle and return its first variant id.
    async fn first_variant_id(&self, handle: &str) -> CheckoutResult<Option<String>>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str {
        "shopify"
    }
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedGateway = Arc<dyn StorefrontGateway>;
