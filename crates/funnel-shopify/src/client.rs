//! # Storefront API Client
//!
//! GraphQL transport for the Shopify Storefront API. One POST per call,
//! no retries, no caching.

use crate::config::ShopifyConfig;
use funnel_core::{CheckoutError, CheckoutResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Header carrying the public storefront token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// A top-level GraphQL error
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default)]
    pub message: String,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `errors` is a list on GraphQL failures but a bare string when the
/// request is rejected before execution (bad token, unknown shop).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorsField {
    List(Vec<GraphqlError>),
    Message(String),
}

impl From<ErrorsField> for Vec<GraphqlError> {
    fn from(field: ErrorsField) -> Self {
        match field {
            ErrorsField::List(errors) => errors,
            ErrorsField::Message(message) => vec![GraphqlError::new(message)],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<ErrorsField>,
}

/// Decoded GraphQL response, with the raw body kept for diagnostics
#[derive(Debug)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    pub errors: Vec<GraphqlError>,
    pub raw: String,
}

impl<T> GraphqlResponse<T> {
    /// First top-level error message, if any
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// Client for the Storefront API
#[derive(Clone)]
pub struct StorefrontClient {
    config: ShopifyConfig,
    client: Client,
}

impl StorefrontClient {
    /// Create a new client with its own HTTP connection pool
    pub fn new(config: ShopifyConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self::with_client(config, client))
    }

    /// Create a client that shares an existing `reqwest::Client`
    pub fn with_client(config: ShopifyConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        Self::new(ShopifyConfig::from_env()?)
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    /// POST `{query, variables}` and return the raw response body.
    ///
    /// Only network failures are errors here; the status code is logged and
    /// the body is handed back for the caller to interpret.
    pub async fn post(&self, query: &str, variables: Value) -> CheckoutResult<String> {
        let url = self.config.endpoint();

        let response = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, self.config.access_token())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Storefront API returned non-success status"
            );
        } else {
            debug!(status = %status, bytes = body.len(), "Storefront API response");
        }

        Ok(body)
    }

    /// POST and decode the GraphQL envelope into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> CheckoutResult<GraphqlResponse<T>> {
        let raw = self.post(query, variables).await?;
        decode(raw)
    }
}

/// Decode a raw GraphQL body
pub fn decode<T: DeserializeOwned>(raw: String) -> CheckoutResult<GraphqlResponse<T>> {
    let envelope: Envelope<T> = serde_json::from_str(&raw).map_err(|e| {
        error!(
            error = %e,
            body = %raw.chars().take(500).collect::<String>(),
            "Failed to parse Storefront response"
        );
        CheckoutError::Serialization(format!("Failed to parse Storefront response: {}", e))
    })?;

    Ok(GraphqlResponse {
        data: envelope.data,
        errors: envelope.errors.map(Vec::from).unwrap_or_default(),
        raw,
    })
}
