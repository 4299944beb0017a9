//! # Shopify Gateway
//!
//! `StorefrontGateway` implementation backed by the Storefront API.
//! Used by both checkout-creation handlers.

use crate::client::StorefrontClient;
use crate::queries;
use async_trait::async_trait;
use funnel_core::{
    CheckoutResult, LineItem, RemoteCart, RemoteCheckout, StorefrontGateway, UserError,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

#[async_trait]
impl StorefrontGateway for StorefrontClient {
    #[instrument(skip(self, line), fields(merchandise = %line.merchandise_id, quantity = line.quantity))]
    async fn checkout_create(&self, line: &LineItem) -> CheckoutResult<RemoteCheckout> {
        let variables = json!({
            "lines": [{ "variantId": line.merchandise_id, "quantity": line.quantity }]
        });

        let response = self
            .execute::<CheckoutCreateData>(queries::CHECKOUT_CREATE_LINES, variables)
            .await?;

        if let Some(message) = response.first_error() {
            warn!("checkoutCreate returned GraphQL errors: {}", message);
        }

        let payload = response.data.and_then(|d| d.checkout_create);
        let (checkout, user_errors) = match payload {
            Some(p) => (p.checkout, p.checkout_user_errors.unwrap_or_default()),
            None => (None, Vec::new()),
        };

        let checkout = RemoteCheckout {
            id: checkout.as_ref().and_then(|c| c.id.clone()),
            web_url: checkout.and_then(|c| c.web_url),
            user_errors,
            raw: response.raw,
        };

        info!(has_url = checkout.web_url.is_some(), "checkoutCreate completed");
        Ok(checkout)
    }

    #[instrument(skip(self, line), fields(merchandise = %line.merchandise_id, quantity = line.quantity))]
    async fn cart_create(&self, line: &LineItem) -> CheckoutResult<RemoteCart> {
        let variables = json!({
            "lines": [{ "merchandiseId": line.merchandise_id, "quantity": line.quantity }]
        });

        let response = self
            .execute::<CartCreateData>(queries::CART_CREATE, variables)
            .await?;

        if let Some(message) = response.first_error() {
            warn!("cartCreate returned GraphQL errors: {}", message);
        }

        let payload = response.data.and_then(|d| d.cart_create);
        let (cart, user_errors) = match payload {
            Some(p) => (p.cart, p.user_errors.unwrap_or_default()),
            None => (None, Vec::new()),
        };

        let cart = RemoteCart {
            id: cart.as_ref().and_then(|c| c.id.clone()),
            checkout_url: cart.and_then(|c| c.checkout_url),
            user_errors,
        };

        info!(
            has_url = cart.checkout_url.is_some(),
            user_errors = cart.user_errors.len(),
            "cartCreate completed"
        );
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn first_variant_id(&self, handle: &str) -> CheckoutResult<Option<String>> {
        let response = self
            .execute::<ProductVariantsData>(
                queries::PRODUCT_FIRST_VARIANT,
                json!({ "handle": handle }),
            )
            .await?;

        if let Some(message) = response.first_error() {
            warn!("product lookup returned GraphQL errors: {}", message);
        }

        let id = response
            .data
            .and_then(|d| d.product)
            .and_then(|p| p.variants.edges.into_iter().next())
            .map(|edge| edge.node.id);

        debug!(resolved = id.is_some(), "product lookup completed");
        Ok(id)
    }
}

// =============================================================================
// Storefront API Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutCreateData {
    checkout_create: Option<CheckoutCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutCreatePayload {
    checkout: Option<CheckoutNode>,
    checkout_user_errors: Option<Vec<UserError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutNode {
    id: Option<String>,
    web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartCreateData {
    cart_create: Option<CartCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartCreatePayload {
    cart: Option<CartNode>,
    user_errors: Option<Vec<UserError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartNode {
    id: Option<String>,
    checkout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProductVariantsData {
    product: Option<ProductVariants>,
}

#[derive(Debug, Deserialize)]
struct ProductVariants {
    variants: Connection<VariantId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub(crate) edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<T> {
    pub(crate) node: T,
}

#[derive(Debug, Deserialize)]
struct VariantId {
    id: String,
}
