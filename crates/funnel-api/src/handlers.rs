//! # Request Handlers
//!
//! Axum request handlers for the checkout funnel.
//!
//! Two checkout-creation handlers share the `/api/create-checkout` contract
//! but keep their own status and message conventions:
//! - cart-based (canonical): `variantGid` or `handle`, generic `Error` on failure
//! - legacy: numeric `variant`, failure messages exposed

use crate::forward::IntakeSubmission;
use crate::state::{AppState, CheckoutMode};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use funnel_core::{
    first_user_message, parse_quantity, variant_gid, CheckoutError, CheckoutResult, LineItem,
    MerchandiseRef, CREATE_CHECKOUT_PATH,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request Types
// =============================================================================

/// Query for the legacy handler: `?variant=<numeric id>&qty=<n>`
#[derive(Debug, Default, Deserialize)]
pub struct LegacyCheckoutQuery {
    pub variant: Option<String>,
    pub qty: Option<String>,
}

/// Query for the cart handler: `?variantGid=<gid>&handle=<slug>&quantity=<n>`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCheckoutQuery {
    pub variant_gid: Option<String>,
    pub handle: Option<String>,
    pub quantity: Option<String>,
}

// =============================================================================
// Response helpers
// =============================================================================

/// 302 to the hosted checkout
fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn text(status: StatusCode, body: impl Into<String>) -> Response {
    (status, body.into()).into_response()
}

/// Status from the error's own mapping
fn status_of(err: &CheckoutError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn log_failure(handler: &str, err: &CheckoutError) {
    if err.is_local() {
        warn!("{} checkout rejected: {}", handler, err);
    } else {
        error!("{} checkout failed: {}", handler, err);
    }
}

/// A URL is usable only when non-blank
fn usable_url(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "astro-funnel",
        "version": env!("CARGO_PKG_VERSION"),
        "handler": state.config.handler.as_str(),
        "checkout_mode": state.config.mode.as_str(),
        "provider": state.gateway.as_ref().map(|g| g.provider_name()),
        "shopify_configured": state.gateway.is_some(),
    }))
}

/// Cart-based checkout: resolve the merchandise, create a cart, redirect.
///
/// Failures answer in plain text: validation and user errors verbatim,
/// a cart without checkout URL as 400, anything upstream as a bare `Error`.
#[instrument(skip(state, query), fields(variant_gid = ?query.variant_gid, handle = ?query.handle))]
pub async fn create_checkout_cart(
    State(state): State<AppState>,
    Query(query): Query<CartCheckoutQuery>,
) -> Response {
    match cart_checkout(&state, &query).await {
        Ok(url) => {
            info!("Redirecting to cart checkout");
            found(url)
        }
        Err(e) => {
            log_failure("Cart", &e);
            let status = match &e {
                // a cart without checkout URL is reported as a bad request here
                CheckoutError::Upstream { .. } => StatusCode::BAD_REQUEST,
                _ => status_of(&e),
            };
            let body = match e {
                CheckoutError::Configuration(_) => "Missing Shopify env".to_string(),
                CheckoutError::Validation(msg) | CheckoutError::UserError(msg) => msg,
                CheckoutError::Upstream { message, .. } => message,
                _ => "Error".to_string(),
            };
            text(status, body)
        }
    }
}

async fn cart_checkout(state: &AppState, query: &CartCheckoutQuery) -> CheckoutResult<String> {
    let gateway = state.gateway()?;
    let quantity = parse_quantity(query.quantity.as_deref());

    let variant_id = match MerchandiseRef::from_inputs(
        query.variant_gid.as_deref(),
        query.handle.as_deref(),
    ) {
        Some(MerchandiseRef::Variant(id)) => Some(id),
        Some(MerchandiseRef::Handle(handle)) => gateway.first_variant_id(&handle).await?,
        None => None,
    };

    let variant_id =
        variant_id.ok_or_else(|| CheckoutError::Validation("No variant".to_string()))?;

    let cart = gateway
        .cart_create(&LineItem::new(variant_id, quantity))
        .await?;

    if let Some(message) = cart.user_message() {
        return Err(CheckoutError::UserError(message.to_string()));
    }

    info!(provider = gateway.provider_name(), cart_id = ?cart.id, "Cart created");
    usable_url(cart.checkout_url).ok_or_else(|| CheckoutError::Upstream {
        message: "No checkoutUrl".to_string(),
        body: String::new(),
    })
}

/// Legacy checkout: numeric variant id, `checkoutCreate`, redirect to `webUrl`.
///
/// Failure messages are exposed: a checkout without URL echoes the raw
/// upstream body, anything else reports the error text.
#[instrument(skip(state, query), fields(variant = ?query.variant, qty = ?query.qty))]
pub async fn create_checkout_legacy(
    State(state): State<AppState>,
    Query(query): Query<LegacyCheckoutQuery>,
) -> Response {
    match legacy_checkout(&state, &query).await {
        Ok(url) => {
            info!("Redirecting to checkout");
            found(url)
        }
        Err(e) => {
            log_failure("Legacy", &e);
            let status = status_of(&e);
            match e {
                CheckoutError::Validation(msg) => text(status, msg),
                CheckoutError::Upstream { body, .. } => {
                    text(status, format!("Checkout error: {}", body))
                }
                e => text(status, format!("Server error: {}", e)),
            }
        }
    }
}

async fn legacy_checkout(state: &AppState, query: &LegacyCheckoutQuery) -> CheckoutResult<String> {
    let gid = variant_gid(query.variant.as_deref().unwrap_or_default())?;
    let quantity = parse_quantity(query.qty.as_deref());

    let gateway = state.gateway()?;
    let checkout = gateway
        .checkout_create(&LineItem::new(gid, quantity))
        .await?;

    if let Some(message) = first_user_message(&checkout.user_errors) {
        warn!("checkoutCreate user error: {}", message);
    }
    info!(provider = gateway.provider_name(), checkout_id = ?checkout.id, "Checkout created");

    usable_url(checkout.web_url).ok_or(CheckoutError::Upstream {
        message: "No webUrl".to_string(),
        body: checkout.raw,
    })
}

/// Plan selection: forward the intake form in the background, then send the
/// browser to the checkout (or the demo completion page).
#[instrument(skip(state, body), fields(plan = %plan_id))]
pub async fn checkout_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
    body: Bytes,
) -> Response {
    let Some(plan) = state.plans.get(&plan_id) else {
        return text(StatusCode::NOT_FOUND, format!("Plan not found: {}", plan_id));
    };

    let form = match parse_form(&body) {
        Ok(form) => form,
        Err(e) => return text(StatusCode::BAD_REQUEST, format!("Invalid form data: {}", e)),
    };

    if let Some(form) = form {
        // detached; the redirect does not wait for it
        let _ = state.forwarder.forward(IntakeSubmission::new(&plan.id, form));
    }

    let location = match state.config.mode {
        CheckoutMode::Redirect => plan.checkout_link(CREATE_CHECKOUT_PATH, 1),
        CheckoutMode::Demo => state.config.demo_redirect_url.clone(),
    };

    info!("Plan {} selected, redirecting", plan.id);
    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
}

fn parse_form(body: &[u8]) -> Result<Option<Map<String, Value>>, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some)
}

/// Product lookup by handle
#[instrument(skip(state))]
pub async fn get_product(State(state): State<AppState>, Path(handle): Path<String>) -> Response {
    let Some(client) = state.storefront.as_ref() else {
        return text(StatusCode::INTERNAL_SERVER_ERROR, "Missing Shopify env");
    };

    match client.get_product(&handle).await {
        Some(product) => Json(product).into_response(),
        None => text(
            StatusCode::NOT_FOUND,
            format!("Product not found: {}", handle),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use crate::state::{AppConfig, CheckoutHandler};
    use async_trait::async_trait;
    use axum_test::TestServer;
    use funnel_core::{
        Plan, PlanCatalog, RemoteCart, RemoteCheckout, StorefrontGateway, UserError,
    };
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CheckoutCreate(LineItem),
        CartCreate(LineItem),
        Lookup(String),
    }

    #[derive(Default)]
    struct MockGateway {
        calls: Mutex<Vec<Call>>,
        web_url: Option<String>,
        checkout_url: Option<String>,
        user_errors: Vec<UserError>,
        handle_variant: Option<String>,
        transport_error: Option<String>,
    }

    impl MockGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> CheckoutResult<()> {
            self.calls.lock().unwrap().push(call);
            match &self.transport_error {
                Some(msg) => Err(CheckoutError::Transport(msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl StorefrontGateway for MockGateway {
        async fn checkout_create(&self, line: &LineItem) -> CheckoutResult<RemoteCheckout> {
            self.record(Call::CheckoutCreate(line.clone()))?;
            Ok(RemoteCheckout {
                id: None,
                web_url: self.web_url.clone(),
                user_errors: Vec::new(),
                raw: r#"{"data":{"checkoutCreate":null}}"#.to_string(),
            })
        }

        async fn cart_create(&self, line: &LineItem) -> CheckoutResult<RemoteCart> {
            self.record(Call::CartCreate(line.clone()))?;
            Ok(RemoteCart {
                id: None,
                checkout_url: self.checkout_url.clone(),
                user_errors: self.user_errors.clone(),
            })
        }

        async fn first_variant_id(&self, handle: &str) -> CheckoutResult<Option<String>> {
            self.record(Call::Lookup(handle.to_string()))?;
            Ok(self.handle_variant.clone())
        }
    }

    fn server(config: AppConfig, gateway: Option<Arc<MockGateway>>) -> TestServer {
        let mut state = AppState::unconfigured(config, reqwest::Client::new());
        if let Some(gateway) = gateway {
            state = state.with_gateway(gateway);
        }
        TestServer::new(create_router(state)).unwrap()
    }

    fn legacy_config() -> AppConfig {
        AppConfig {
            handler: CheckoutHandler::Legacy,
            ..AppConfig::default()
        }
    }

    // ---- cart handler -------------------------------------------------------

    #[tokio::test]
    async fn test_cart_redirects_to_checkout_url() {
        let gateway = Arc::new(MockGateway {
            checkout_url: Some("https://shop.test/cart/c/1".into()),
            ..Default::default()
        });
        let server = server(AppConfig::default(), Some(gateway.clone()));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variantGid", "gid://shopify/ProductVariant/7")
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "https://shop.test/cart/c/1");
        assert_eq!(
            gateway.calls(),
            vec![Call::CartCreate(LineItem::new("gid://shopify/ProductVariant/7", 1))]
        );
    }

    #[tokio::test]
    async fn test_cart_resolves_handle_before_create() {
        let gateway = Arc::new(MockGateway {
            checkout_url: Some("https://shop.test/cart/c/2".into()),
            handle_variant: Some("gid://shopify/ProductVariant/111".into()),
            ..Default::default()
        });
        let server = server(AppConfig::default(), Some(gateway.clone()));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("handle", "astrology-full-report")
            .add_query_param("quantity", "2")
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(
            gateway.calls(),
            vec![
                Call::Lookup("astrology-full-report".into()),
                Call::CartCreate(LineItem::new("gid://shopify/ProductVariant/111", 2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_cart_unresolved_handle_is_no_variant() {
        let gateway = Arc::new(MockGateway::default());
        let server = server(AppConfig::default(), Some(gateway.clone()));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("handle", "missing-product")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("No variant");
        assert_eq!(gateway.calls(), vec![Call::Lookup("missing-product".into())]);
    }

    #[tokio::test]
    async fn test_cart_without_inputs_makes_no_calls() {
        let gateway = Arc::new(MockGateway::default());
        let server = server(AppConfig::default(), Some(gateway.clone()));

        let response = server.get("/api/create-checkout").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("No variant");
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cart_user_error_wins_over_url() {
        let gateway = Arc::new(MockGateway {
            checkout_url: Some("https://shop.test/cart/c/3".into()),
            user_errors: vec![UserError::new("The merchandise is sold out")],
            ..Default::default()
        });
        let server = server(AppConfig::default(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variantGid", "gid://shopify/ProductVariant/7")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("The merchandise is sold out");
    }

    #[tokio::test]
    async fn test_cart_without_checkout_url() {
        let gateway = Arc::new(MockGateway::default());
        let server = server(AppConfig::default(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variantGid", "gid://shopify/ProductVariant/7")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("No checkoutUrl");
    }

    #[tokio::test]
    async fn test_cart_blank_checkout_url_is_not_redirected() {
        let gateway = Arc::new(MockGateway {
            checkout_url: Some("  ".into()),
            ..Default::default()
        });
        let server = server(AppConfig::default(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variantGid", "gid://shopify/ProductVariant/7")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("No checkoutUrl");
    }

    #[tokio::test]
    async fn test_cart_missing_configuration() {
        let server = server(AppConfig::default(), None);

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variantGid", "gid://shopify/ProductVariant/7")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Missing Shopify env");
    }

    #[tokio::test]
    async fn test_cart_transport_error_is_generic() {
        let gateway = Arc::new(MockGateway {
            transport_error: Some("connection reset by peer".into()),
            ..Default::default()
        });
        let server = server(AppConfig::default(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variantGid", "gid://shopify/ProductVariant/7")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text("Error");
    }

    // ---- legacy handler -----------------------------------------------------

    #[tokio::test]
    async fn test_legacy_redirects_with_quantity() {
        let gateway = Arc::new(MockGateway {
            web_url: Some("https://shop.test/checkouts/abc".into()),
            ..Default::default()
        });
        let server = server(legacy_config(), Some(gateway.clone()));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variant", "45314320957596")
            .add_query_param("qty", "3")
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "https://shop.test/checkouts/abc");
        assert_eq!(
            gateway.calls(),
            vec![Call::CheckoutCreate(LineItem::new(
                "gid://shopify/ProductVariant/45314320957596",
                3
            ))]
        );
    }

    #[tokio::test]
    async fn test_legacy_default_quantity() {
        let gateway = Arc::new(MockGateway {
            web_url: Some("https://shop.test/checkouts/abc".into()),
            ..Default::default()
        });
        let server = server(AppConfig::default(), Some(gateway.clone()));

        // always reachable on the legacy path, whatever the toggle says
        let response = server
            .get("/api/legacy/create-checkout")
            .add_query_param("variant", "42")
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(
            gateway.calls(),
            vec![Call::CheckoutCreate(LineItem::new("gid://shopify/ProductVariant/42", 1))]
        );
    }

    #[tokio::test]
    async fn test_legacy_missing_variant() {
        let gateway = Arc::new(MockGateway::default());
        let server = server(legacy_config(), Some(gateway.clone()));

        let response = server.get("/api/create-checkout").add_query_param("qty", "2").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text("Missing ?variant=NUMERIC_ID");
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_missing_variant_checked_before_configuration() {
        let server = server(legacy_config(), None);
        let response = server.get("/api/create-checkout").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_legacy_without_web_url_exposes_body() {
        let gateway = Arc::new(MockGateway::default());
        let server = server(legacy_config(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variant", "42")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_text(r#"Checkout error: {"data":{"checkoutCreate":null}}"#);
    }

    #[tokio::test]
    async fn test_legacy_transport_error_exposes_message() {
        let gateway = Arc::new(MockGateway {
            transport_error: Some("connection reset by peer".into()),
            ..Default::default()
        });
        let server = server(legacy_config(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variant", "42")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.text();
        assert!(body.starts_with("Server error: "));
        assert!(body.contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn test_legacy_empty_web_url_is_not_redirected() {
        let gateway = Arc::new(MockGateway {
            web_url: Some(String::new()),
            ..Default::default()
        });
        let server = server(legacy_config(), Some(gateway));

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variant", "42")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().starts_with("Checkout error: "));
    }

    #[tokio::test]
    async fn test_legacy_rejected_token_echoes_upstream_body() {
        use funnel_shopify::{ShopifyConfig, StorefrontClient};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let shop = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2024-07/graphql.json"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": "[API] Invalid API key or access token (unrecognized login or wrong password)"
            })))
            .mount(&shop)
            .await;

        let client = StorefrontClient::new(
            ShopifyConfig::new("astro.myshopify.com", "bad-token").with_api_base_url(shop.uri()),
        )
        .unwrap();
        let state = AppState::unconfigured(legacy_config(), reqwest::Client::new())
            .with_storefront(client);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variant", "42")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.text();
        assert!(body.starts_with("Checkout error: "));
        assert!(body.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_legacy_missing_configuration() {
        let server = server(legacy_config(), None);

        let response = server
            .get("/api/create-checkout")
            .add_query_param("variant", "42")
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().contains("SHOPIFY_STORE_DOMAIN"));
    }

    // ---- plan checkout ------------------------------------------------------

    #[tokio::test]
    async fn test_plan_redirects_by_handle() {
        let server = server(AppConfig::default(), None);

        let response = server.post("/api/checkout/mini").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location"),
            "/api/create-checkout?handle=astrology-mini-report&quantity=1"
        );
    }

    #[tokio::test]
    async fn test_plan_redirects_by_pinned_variant() {
        let mut plans = PlanCatalog::new();
        plans.add(
            Plan::new("full", "Full Report", "astrology-full-report")
                .with_variant("gid://shopify/ProductVariant/45314320957596"),
        );
        let state = AppState::unconfigured(AppConfig::default(), reqwest::Client::new())
            .with_plans(plans);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.post("/api/checkout/full").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location"),
            "/api/create-checkout?variantGid=gid%3A%2F%2Fshopify%2FProductVariant%2F45314320957596&quantity=1"
        );
    }

    #[tokio::test]
    async fn test_plan_demo_mode() {
        let config = AppConfig {
            mode: CheckoutMode::Demo,
            ..AppConfig::default()
        };
        let server = server(config, None);

        let response = server
            .post("/api/checkout/full")
            .json(&serde_json::json!({ "fullName": "Ada" }))
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/thank-you");
    }

    #[tokio::test]
    async fn test_plan_unknown_and_invalid_body() {
        let server = server(AppConfig::default(), None);

        server
            .post("/api/checkout/deluxe")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/checkout/full")
            .text("not json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_plan_forwards_form_without_blocking() {
        use wiremock::matchers::{body_partial_json, method};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let forms = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({ "plan": "full", "fullName": "Ada" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&forms)
            .await;

        let config = AppConfig {
            form_forward_url: Some(forms.uri()),
            ..AppConfig::default()
        };
        let server = server(config, None);

        let response = server
            .post("/api/checkout/full")
            .json(&serde_json::json!({ "fullName": "Ada", "birthDate": "1815-12-10" }))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let mut forwarded = false;
        for _ in 0..100 {
            if !forms.received_requests().await.unwrap_or_default().is_empty() {
                forwarded = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(forwarded, "intake form was not forwarded");
    }

    // ---- misc ---------------------------------------------------------------

    #[tokio::test]
    async fn test_product_lookup_requires_configuration() {
        let server = server(AppConfig::default(), None);
        let response = server.get("/api/products/astrology-full-report").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_product_lookup() {
        use funnel_shopify::{ShopifyConfig, StorefrontClient};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let shop = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/2024-07/graphql.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "product": {
                    "id": "gid://shopify/Product/1",
                    "handle": "astrology-full-report",
                    "title": "Complete Astrology Report",
                    "variants": { "edges": [] }
                } }
            })))
            .mount(&shop)
            .await;

        let client = StorefrontClient::new(
            ShopifyConfig::new("astro.myshopify.com", "token").with_api_base_url(shop.uri()),
        )
        .unwrap();
        let state = AppState::unconfigured(AppConfig::default(), reqwest::Client::new())
            .with_storefront(client);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/api/products/astrology-full-report").await;
        response.assert_status_ok();
        let product: serde_json::Value = response.json();
        assert_eq!(product["title"], "Complete Astrology Report");
    }

    #[tokio::test]
    async fn test_health() {
        let legacy_server = server(legacy_config(), None);
        let response = legacy_server.get("/health").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["handler"], "legacy");
        assert_eq!(body["shopify_configured"], false);
        assert!(body["provider"].is_null());

        let server = server(AppConfig::default(), Some(Arc::new(MockGateway::default())));
        let body: serde_json::Value = server.get("/health").await.json();
        assert_eq!(body["provider"], "shopify");
        assert_eq!(body["shopify_configured"], true);
    }
}
