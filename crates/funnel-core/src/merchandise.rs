//! # Merchandise Types
//!
//! Merchandise references, line items and quantity parsing for checkout requests.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// Prefix for Shopify product variant global ids
pub const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

/// What the caller asked to buy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MerchandiseRef {
    /// Fully-qualified variant id, ready for checkout creation
    Variant(String),
    /// Product handle; needs a lookup to find its first variant
    Handle(String),
}

impl MerchandiseRef {
    /// Build a reference from the optional query inputs.
    ///
    /// A variant id wins over a handle. Empty strings count as absent.
    pub fn from_inputs(variant_gid: Option<&str>, handle: Option<&str>) -> Option<Self> {
        let variant_gid = variant_gid.map(str::trim).filter(|s| !s.is_empty());
        let handle = handle.map(str::trim).filter(|s| !s.is_empty());

        match (variant_gid, handle) {
            (Some(gid), _) => Some(MerchandiseRef::Variant(gid.to_string())),
            (None, Some(handle)) => Some(MerchandiseRef::Handle(handle.to_string())),
            (None, None) => None,
        }
    }

    /// The resolved variant id, if this reference needs no lookup
    pub fn variant_id(&self) -> Option<&str> {
        match self {
            MerchandiseRef::Variant(id) => Some(id),
            MerchandiseRef::Handle(_) => None,
        }
    }
}

/// Build `gid://shopify/ProductVariant/<id>` from a numeric variant id
pub fn variant_gid(numeric_id: &str) -> CheckoutResult<String> {
    let id = numeric_id.trim();
    if id.is_empty() {
        return Err(CheckoutError::Validation(
            "Missing ?variant=NUMERIC_ID".to_string(),
        ));
    }
    Ok(format!("{}{}", VARIANT_GID_PREFIX, id))
}

/// Parse a quantity parameter. Absent, unparseable or non-positive values become 1.
pub fn parse_quantity(raw: Option<&str>) -> u32 {
    raw.and_then(|q| q.trim().parse::<i64>().ok())
        .filter(|q| *q >= 1)
        .map(|q| u32::try_from(q).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

/// A single line sent to checkout/cart creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Fully-qualified merchandise (variant) id
    pub merchandise_id: String,

    /// Quantity, always >= 1
    pub quantity: u32,
}

impl LineItem {
    pub fn new(merchandise_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            merchandise_id: merchandise_id.into(),
            quantity: quantity.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_gid() {
        assert_eq!(
            variant_gid("45314320957596").unwrap(),
            "gid://shopify/ProductVariant/45314320957596"
        );
        assert!(matches!(variant_gid(""), Err(CheckoutError::Validation(_))));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("3")), 3);
        assert_eq!(parse_quantity(Some(" 2 ")), 2);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-4")), 1);
    }

    #[test]
    fn test_merchandise_ref_prefers_variant() {
        let r = MerchandiseRef::from_inputs(
            Some("gid://shopify/ProductVariant/1"),
            Some("astrology-full-report"),
        );
        assert_eq!(
            r,
            Some(MerchandiseRef::Variant("gid://shopify/ProductVariant/1".into()))
        );
    }

    #[test]
    fn test_merchandise_ref_handle_and_empty() {
        assert_eq!(
            MerchandiseRef::from_inputs(Some(""), Some("astrology-mini-report")),
            Some(MerchandiseRef::Handle("astrology-mini-report".into()))
        );
        assert_eq!(MerchandiseRef::from_inputs(None, Some("  ")), None);
        assert!(MerchandiseRef::Handle("x".into()).variant_id().is_none());
    }

    #[test]
    fn test_line_item_clamps_quantity() {
        assert_eq!(LineItem::new("gid", 0).quantity, 1);
    }
}
