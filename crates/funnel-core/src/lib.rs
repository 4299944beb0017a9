//! # funnel-core
//!
//! Core types and traits for the astro-funnel checkout service.
//!
//! This crate provides:
//! - `StorefrontGateway` trait for the commerce platform calls
//! - `MerchandiseRef`, `LineItem` and quantity parsing for checkout requests
//! - `BirthData` and `format_birth_data_for_shopify` for custom attributes
//! - `Plan` and `PlanCatalog` for the report plans
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use funnel_core::{LineItem, MerchandiseRef, parse_quantity};
//!
//! let reference = MerchandiseRef::from_inputs(query.variant_gid.as_deref(), query.handle.as_deref());
//! let line = LineItem::new(variant_id, parse_quantity(query.quantity.as_deref()));
//!
//! let cart = gateway.cart_create(&line).await?;
//! // Redirect user to cart.checkout_url
//! ```

pub mod attributes;
pub mod error;
pub mod gateway;
pub mod merchandise;
pub mod plan;

// Re-exports for convenience
pub use attributes::{format_birth_data_for_shopify, Attribute, BirthData};
pub use error::{CheckoutError, CheckoutResult};
pub use gateway::{
    first_user_message, BoxedGateway, RemoteCart, RemoteCheckout, StorefrontGateway, UserError,
};
pub use merchandise::{parse_quantity, variant_gid, LineItem, MerchandiseRef, VARIANT_GID_PREFIX};
pub use plan::{
    Plan, PlanCatalog, CREATE_CHECKOUT_PATH, FULL_REPORT_HANDLE, MINI_REPORT_HANDLE,
};
