//! # funnel-shopify
//!
//! Shopify Storefront API integration for astro-funnel.
//!
//! This crate provides:
//!
//! 1. **StorefrontClient as a `StorefrontGateway`** - used by the checkout handlers
//!    - `checkoutCreate` with one line item (legacy handler)
//!    - `cartCreate` with one line (cart handler)
//!    - first-variant lookup by product handle
//!
//! 2. **Storefront helper** - best-effort convenience operations
//!    - `get_product`
//!    - `create_checkout`
//!    - `add_customer_to_checkout`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use funnel_shopify::StorefrontClient;
//! use funnel_core::{LineItem, StorefrontGateway};
//!
//! // Create client from environment
//! let client = StorefrontClient::from_env()?;
//!
//! // Create a cart and redirect to its checkout
//! let cart = client.cart_create(&LineItem::new(variant_gid, 1)).await?;
//! ```

pub mod client;
pub mod config;
pub mod gateway;
pub mod helper;
pub mod queries;

// Re-exports
pub use client::{GraphqlError, GraphqlResponse, StorefrontClient, ACCESS_TOKEN_HEADER};
pub use config::{ShopifyConfig, DEFAULT_API_VERSION};
pub use helper::{Checkout, CheckoutContact, Money, Product, ProductVariant};
