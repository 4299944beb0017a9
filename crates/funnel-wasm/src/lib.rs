//! # funnel-wasm
//!
//! WebAssembly bindings for astro-funnel.
//!
//! This crate provides browser-side helpers for the checkout page:
//! - Formatting intake form data as checkout custom attributes
//! - Building checkout links for a plan or a variant
//! - Validating variant ids before redirecting
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { format_birth_data_for_shopify, plan_checkout_url } from 'astro-funnel-wasm';
//!
//! await init();
//!
//! const attributes = format_birth_data_for_shopify(formData);
//! window.location.href = plan_checkout_url('https://api.example.com', 'full');
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use funnel_core::{
    format_birth_data_for_shopify as format_attributes, Attribute, BirthData, LineItem, Plan,
    PlanCatalog, CREATE_CHECKOUT_PATH, VARIANT_GID_PREFIX,
};
use wasm_bindgen::prelude::*;

/// Format intake form data (a plain JS object) as an ordered array of
/// `{ key, value }` custom attributes
#[wasm_bindgen]
pub fn format_birth_data_for_shopify(form: JsValue) -> Result<JsValue, JsValue> {
    let form: BirthData = if form.is_undefined() || form.is_null() {
        BirthData::default()
    } else {
        serde_wasm_bindgen::from_value(form)
            .map_err(|e| JsValue::from_str(&format!("Invalid form data: {}", e)))?
    };

    serde_wasm_bindgen::to_value(&format_attributes(&form))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Same as `format_birth_data_for_shopify`, over JSON strings
#[wasm_bindgen]
pub fn format_birth_data_json(form_json: &str) -> Result<String, JsValue> {
    attributes_json(form_json).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn attributes_json(form_json: &str) -> Result<String, serde_json::Error> {
    let form: BirthData = if form_json.trim().is_empty() {
        BirthData::default()
    } else {
        serde_json::from_str(form_json)?
    };
    let attributes: Vec<Attribute> = format_attributes(&form);
    serde_json::to_string(&attributes)
}

/// Checkout link for a built-in plan (`full`, `mini`), resolved by handle
#[wasm_bindgen]
pub fn plan_checkout_url(api_origin: &str, plan_id: &str) -> Option<String> {
    PlanCatalog::builtin()
        .get(plan_id)
        .map(|plan| link(api_origin, plan, 1))
}

/// Checkout link for an explicit variant id
#[wasm_bindgen]
pub fn variant_checkout_url(api_origin: &str, variant_gid: &str, quantity: u32) -> Option<String> {
    if !validate_variant_gid(variant_gid) {
        return None;
    }
    let line = LineItem::new(variant_gid, quantity);
    let plan = Plan::new("variant", "Variant", "").with_variant(line.merchandise_id);
    Some(link(api_origin, &plan, line.quantity))
}

fn link(api_origin: &str, plan: &Plan, quantity: u32) -> String {
    let endpoint = format!(
        "{}{}",
        api_origin.trim_end_matches('/'),
        CREATE_CHECKOUT_PATH
    );
    plan.checkout_link(&endpoint, quantity)
}

/// `gid://shopify/ProductVariant/<digits>`
#[wasm_bindgen]
pub fn validate_variant_gid(variant_gid: &str) -> bool {
    variant_gid
        .strip_prefix(VARIANT_GID_PREFIX)
        .is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
