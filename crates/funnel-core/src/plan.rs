//! # Plan Catalog
//!
//! The report plans offered on the checkout page. Each plan points at a
//! Shopify product handle and, optionally, a pinned variant id.
//!
//! ## TOML
//!
//! ```toml
//! [[plans]]
//! id = "full"
//! name = "Full Report"
//! handle = "astrology-full-report"
//! variant_gid = "gid://shopify/ProductVariant/123"
//! ```

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Product handle for the complete report
pub const FULL_REPORT_HANDLE: &str = "astrology-full-report";

/// Product handle for the mini report
pub const MINI_REPORT_HANDLE: &str = "astrology-mini-report";

/// Path of the checkout-creation endpoint
pub const CREATE_CHECKOUT_PATH: &str = "/api/create-checkout";

/// A purchasable report plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan id used in URLs ("full", "mini")
    pub id: String,

    /// Display name
    pub name: String,

    /// Shopify product handle
    pub handle: String,

    /// Pinned variant id; when absent the handle is resolved at checkout time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_gid: Option<String>,

    #[serde(default)]
    pub description: String,
}

impl Plan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            handle: handle.into(),
            variant_gid: None,
            description: String::new(),
        }
    }

    /// Builder: pin a variant id
    pub fn with_variant(mut self, variant_gid: impl Into<String>) -> Self {
        self.variant_gid = Some(variant_gid.into());
        self
    }

    /// Query string understood by the cart-based checkout handler
    pub fn checkout_query(&self, quantity: u32) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        match &self.variant_gid {
            Some(gid) => query.append_pair("variantGid", gid),
            None => query.append_pair("handle", &self.handle),
        };
        query.append_pair("quantity", &quantity.max(1).to_string());
        query.finish()
    }

    /// `<endpoint>?<checkout_query>`
    pub fn checkout_link(&self, endpoint: &str, quantity: u32) -> String {
        format!("{}?{}", endpoint, self.checkout_query(quantity))
    }
}

/// Collection of plans, loaded from `config/plans.toml` or built in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanCatalog {
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in plans (handles only, no pinned variants)
    pub fn builtin() -> Self {
        Self {
            plans: vec![
                Plan {
                    description: "Complete astrological analysis".to_string(),
                    ..Plan::new("full", "Full Report", FULL_REPORT_HANDLE)
                },
                Plan {
                    description: "Perfect for first-timers".to_string(),
                    ..Plan::new("mini", "Mini Report", MINI_REPORT_HANDLE)
                },
            ],
        }
    }

    /// Parse a catalog from TOML
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn add(&mut self, plan: Plan) {
        self.plans.retain(|p| p.id != plan.id);
        self.plans.push(plan);
    }

    pub fn get(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
