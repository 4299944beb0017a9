//! # Shopify Configuration
//!
//! Configuration for the Storefront API.
//! The store domain and access token come from the environment only.

use funnel_core::CheckoutError;
use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Storefront API version used when `SHOPIFY_API_VERSION` is unset
pub const DEFAULT_API_VERSION: &str = "2024-07";

/// Storefront API configuration
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store domain (your-store.myshopify.com)
    pub store_domain: String,

    /// Storefront API access token
    pub access_token: SecretString,

    /// API version (e.g. 2024-07)
    pub api_version: String,

    /// API base URL (for testing/mocking), defaults to `https://<store_domain>`
    pub api_base_url: String,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl ShopifyConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SHOPIFY_STORE_DOMAIN`
    /// - `SHOPIFY_STOREFRONT_TOKEN`
    ///
    /// Optional: `SHOPIFY_API_VERSION`, `SHOPIFY_API_BASE_URL`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckoutError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_domain = non_empty("SHOPIFY_STORE_DOMAIN").ok_or_else(|| {
            CheckoutError::Configuration("SHOPIFY_STORE_DOMAIN not set".to_string())
        })?;

        let access_token = non_empty("SHOPIFY_STOREFRONT_TOKEN").ok_or_else(|| {
            CheckoutError::Configuration("SHOPIFY_STOREFRONT_TOKEN not set".to_string())
        })?;

        let mut config = Self::new(store_domain.trim(), access_token);

        if let Some(version) = non_empty("SHOPIFY_API_VERSION") {
            config.api_version = version;
        }
        if let Some(base) = non_empty("SHOPIFY_API_BASE_URL") {
            config = config.with_api_base_url(base);
        }

        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(store_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        let store_domain = store_domain.into();
        Self {
            api_base_url: format!("https://{}", store_domain),
            store_domain,
            access_token: SecretString::from(access_token.into()),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// GraphQL endpoint: `<base>/api/<version>/graphql.json`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/{}/graphql.json",
            self.api_base_url.trim_end_matches('/'),
            self.api_version
        )
    }

    /// Raw token for the `X-Shopify-Storefront-Access-Token` header
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}
