//! # Birth Data Attributes
//!
//! Maps the intake form onto the custom attributes attached to a remote
//! cart/checkout for downstream report fulfillment.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Intake form fields, as posted by the multi-step form.
/// Unknown fields are ignored; every field is optional. A field of the
/// wrong type reads as absent without affecting the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BirthData {
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub birth_date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub birth_time: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub uncertain_time: bool,
    #[serde(deserialize_with = "lenient_string")]
    pub birth_city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub birth_country: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub favorite_color: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub consent: bool,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// checkboxes may arrive as "true"/"on" from plain HTML forms
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("on"),
        _ => false,
    })
}

/// A custom attribute key/value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Format intake form data as ordered Shopify custom attributes.
///
/// Always returns the same seven keys in the same order. Absent or empty
/// fields fall back to `""`, except `birth_time` (`"unknown"`).
pub fn format_birth_data_for_shopify(form: &BirthData) -> Vec<Attribute> {
    vec![
        Attribute::new("birth_name", or_default(&form.full_name, "")),
        Attribute::new("birth_date", or_default(&form.birth_date, "")),
        Attribute::new("birth_time", or_default(&form.birth_time, "unknown")),
        Attribute::new("birth_city", or_default(&form.birth_city, "")),
        Attribute::new("birth_country", or_default(&form.birth_country, "")),
        Attribute::new("favorite_color", or_default(&form.favorite_color, "")),
        Attribute::new(
            "uncertain_time",
            if form.uncertain_time { "true" } else { "false" },
        ),
    ]
}
