//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the storefront gateway, configuration, plan catalog and the
//! form forwarder.

use crate::forward::FormForwarder;
use funnel_core::{BoxedGateway, CheckoutError, CheckoutResult, PlanCatalog};
use funnel_shopify::{ShopifyConfig, StorefrontClient};
use std::sync::Arc;

/// Which handler answers `/api/create-checkout`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutHandler {
    /// Cart-based, resolvable by handle
    Cart,
    /// Single-line `checkoutCreate` by numeric variant id
    Legacy,
}

impl CheckoutHandler {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" => CheckoutHandler::Legacy,
            _ => CheckoutHandler::Cart,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutHandler::Cart => "cart",
            CheckoutHandler::Legacy => "legacy",
        }
    }
}

/// What the plan checkout entry point does after forwarding the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutMode {
    /// Redirect into the real checkout flow
    Redirect,
    /// Skip the commerce platform and go straight to the completion page
    Demo,
}

impl CheckoutMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "demo" => CheckoutMode::Demo,
            _ => CheckoutMode::Redirect,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Redirect => "redirect",
            CheckoutMode::Demo => "demo",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Handler mounted at `/api/create-checkout`
    pub handler: CheckoutHandler,
    /// Real or demo checkout for plan selection
    pub mode: CheckoutMode,
    /// Where demo mode sends the browser
    pub demo_redirect_url: String,
    /// Form-collection endpoint for intake submissions (disabled when unset)
    pub form_forward_url: Option<String>,
    /// Emit JSON logs
    pub json_logs: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            handler: var("CHECKOUT_HANDLER")
                .map(|v| CheckoutHandler::parse(&v))
                .unwrap_or(CheckoutHandler::Cart),
            mode: var("CHECKOUT_MODE")
                .map(|v| CheckoutMode::parse(&v))
                .unwrap_or(CheckoutMode::Redirect),
            demo_redirect_url: var("DEMO_REDIRECT_URL")
                .unwrap_or_else(|| "/thank-you".to_string()),
            form_forward_url: var("FORM_FORWARD_URL"),
            json_logs: var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Gateway used by the checkout handlers; `None` when Shopify is not configured
    pub gateway: Option<BoxedGateway>,
    /// Storefront client for product lookups; `None` when Shopify is not configured
    pub storefront: Option<StorefrontClient>,
    /// Plan catalog
    pub plans: Arc<PlanCatalog>,
    /// Intake form forwarder
    pub forwarder: FormForwarder,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create an AppState from an already loaded configuration.
    ///
    /// Missing Shopify configuration is not fatal at startup; checkout
    /// requests answer with a configuration error instead.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let plans = load_plan_catalog()?;
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let mut state = Self::unconfigured(config, http_client.clone()).with_plans(plans);

        match ShopifyConfig::from_env() {
            Ok(shopify) => {
                tracing::info!("Shopify store: {}", shopify.store_domain);
                state = state.with_storefront(StorefrontClient::with_client(shopify, http_client));
            }
            Err(e) => tracing::warn!("Shopify not configured: {}", e),
        }

        Ok(state)
    }

    /// State with no commerce backend and built-in plans
    pub fn unconfigured(config: AppConfig, http_client: reqwest::Client) -> Self {
        let forwarder = FormForwarder::new(http_client, config.form_forward_url.clone());
        Self {
            gateway: None,
            storefront: None,
            plans: Arc::new(PlanCatalog::builtin()),
            forwarder,
            config,
        }
    }

    /// Builder: use a Storefront client as both gateway and helper
    pub fn with_storefront(mut self, client: StorefrontClient) -> Self {
        self.gateway = Some(Arc::new(client.clone()) as BoxedGateway);
        self.storefront = Some(client);
        self
    }

    /// Builder: use an arbitrary gateway for the checkout handlers
    pub fn with_gateway(mut self, gateway: BoxedGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Builder: replace the plan catalog
    pub fn with_plans(mut self, plans: PlanCatalog) -> Self {
        self.plans = Arc::new(plans);
        self
    }

    /// The configured gateway, or a configuration error
    pub fn gateway(&self) -> CheckoutResult<&BoxedGateway> {
        self.gateway.as_ref().ok_or_else(|| {
            CheckoutError::Configuration(
                "SHOPIFY_STORE_DOMAIN and SHOPIFY_STOREFRONT_TOKEN must be set".to_string(),
            )
        })
    }
}

/// Load plan catalog from config file
fn load_plan_catalog() -> anyhow::Result<PlanCatalog> {
    let config_paths = [
        "config/plans.toml",
        "../config/plans.toml",
        "../../config/plans.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = PlanCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} plans from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No plan catalog found, using built-in plans");
    Ok(PlanCatalog::builtin())
}
