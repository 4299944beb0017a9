//! # Storefront Helper
//!
//! Convenience operations over the Storefront API: product lookup, checkout
//! creation and attaching customer data to a checkout.
//!
//! These are best-effort. Failures are logged and come back as `None`;
//! only `create_checkout` lets transport failures through.

use crate::client::StorefrontClient;
use crate::gateway::Connection;
use crate::queries;
use funnel_core::{first_user_message, Attribute, CheckoutError, CheckoutResult, UserError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument, warn};

/// Money amount as returned by Shopify (decimal string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    pub price: Option<Money>,
    #[serde(default)]
    pub available_for_sale: bool,
}

/// Product with up to ten variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_range: Option<PriceRange>,
    #[serde(deserialize_with = "flatten_edges", default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutVariant {
    pub id: String,
    pub title: String,
    pub price: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub id: String,
    pub quantity: u32,
    pub variant: Option<CheckoutVariant>,
}

/// Checkout returned by `create_checkout`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub id: String,
    pub web_url: String,
    #[serde(deserialize_with = "flatten_edges", default)]
    pub line_items: Vec<CheckoutLine>,
    pub total_price: Option<Money>,
}

/// Checkout returned by the email update
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutContact {
    pub id: String,
    pub email: Option<String>,
    pub web_url: Option<String>,
}

fn flatten_edges<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    let connection = Connection::<T>::deserialize(deserializer)?;
    Ok(connection.edges.into_iter().map(|e| e.node).collect())
}

impl StorefrontClient {
    /// Fetch a product by handle. Any failure is logged and yields `None`.
    #[instrument(skip(self))]
    pub async fn get_product(&self, handle: &str) -> Option<Product> {
        let response = match self
            .execute::<ProductData>(queries::GET_PRODUCT, json!({ "handle": handle }))
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Error fetching product: {}", e);
                return None;
            }
        };

        if let Some(message) = response.first_error() {
            error!("Storefront API errors fetching product: {}", message);
            return None;
        }

        response.data.and_then(|d| d.product)
    }

    /// Create a checkout for one variant.
    ///
    /// Transport failures propagate. GraphQL errors, user errors and
    /// undecodable payloads are logged and yield `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn create_checkout(
        &self,
        variant_id: &str,
        quantity: u32,
    ) -> CheckoutResult<Option<Checkout>> {
        let variables = json!({
            "input": { "lineItems": [{ "variantId": variant_id, "quantity": quantity.max(1) }] }
        });

        let response = match self
            .execute::<CheckoutCreateData>(queries::CHECKOUT_CREATE, variables)
            .await
        {
            Ok(r) => r,
            Err(e @ CheckoutError::Transport(_)) => return Err(e),
            Err(e) => {
                error!("Error creating checkout: {}", e);
                return Ok(None);
            }
        };

        if let Some(message) = response.first_error() {
            error!("Storefront API errors creating checkout: {}", message);
            return Ok(None);
        }

        let Some(payload) = response.data.and_then(|d| d.checkout_create) else {
            return Ok(None);
        };

        let user_errors = payload.checkout_user_errors.unwrap_or_default();
        if !user_errors.is_empty() {
            error!(
                "Checkout errors: {}",
                first_user_message(&user_errors).unwrap_or("unknown")
            );
            return Ok(None);
        }

        if let Some(ref checkout) = payload.checkout {
            info!("Created checkout: id={}", checkout.id);
        }
        Ok(payload.checkout)
    }

    /// Attach an email and, when given, custom attributes to a checkout.
    ///
    /// Returns the email update result. The attributes update is best
    /// effort: its failures are logged and do not change the result.
    #[instrument(skip(self, email, attributes), fields(attribute_count = attributes.len()))]
    pub async fn add_customer_to_checkout(
        &self,
        checkout_id: &str,
        email: &str,
        attributes: &[Attribute],
    ) -> Option<CheckoutContact> {
        let response = match self
            .execute::<EmailUpdateData>(
                queries::CHECKOUT_EMAIL_UPDATE,
                json!({ "checkoutId": checkout_id, "email": email }),
            )
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("Error adding customer to checkout: {}", e);
                return None;
            }
        };

        if let Some(message) = response.first_error() {
            error!("Storefront API errors updating email: {}", message);
            return None;
        }

        let payload = response.data.and_then(|d| d.checkout_email_update_v2)?;
        let user_errors = payload.checkout_user_errors.unwrap_or_default();
        if !user_errors.is_empty() {
            error!(
                "Email update errors: {}",
                first_user_message(&user_errors).unwrap_or("unknown")
            );
            return None;
        }

        if !attributes.is_empty() {
            self.update_custom_attributes(checkout_id, attributes).await;
        }

        payload.checkout
    }

    async fn update_custom_attributes(&self, checkout_id: &str, attributes: &[Attribute]) {
        let variables = json!({
            "checkoutId": checkout_id,
            "input": { "customAttributes": attributes }
        });

        match self
            .execute::<serde_json::Value>(queries::CHECKOUT_ATTRIBUTES_UPDATE, variables)
            .await
        {
            Ok(response) => match response.first_error() {
                Some(message) => warn!("Custom attributes not saved: {}", message),
                None => info!(count = attributes.len(), "Custom attributes saved"),
            },
            Err(e) => warn!("Custom attributes not saved: {}", e),
        }
    }
}

// =============================================================================
// Storefront API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ProductData {
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutCreateData {
    checkout_create: Option<CheckoutCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutCreatePayload {
    checkout: Option<Checkout>,
    checkout_user_errors: Option<Vec<UserError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailUpdateData {
    #[serde(rename = "checkoutEmailUpdateV2")]
    checkout_email_update_v2: Option<EmailUpdatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailUpdatePayload {
    checkout: Option<CheckoutContact>,
    checkout_user_errors: Option<Vec<UserError>>,
}
