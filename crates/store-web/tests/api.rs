use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use std::path::PathBuf;
use store_core::{Catalog, StorefrontConfig};
use store_paypal::{PayPalConfig, WidgetConfig};
use store_web::{create_router, AppConfig, AppState};

fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        storefront_config: None,
        wasm_pkg_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/pkg"),
        probe_sdk: false,
    }
}

fn server(widget: WidgetConfig) -> TestServer {
    let state = AppState::with_parts(config(), Catalog::builtin().unwrap(), widget);
    TestServer::new(create_router(state)).unwrap()
}

fn paypal_server() -> TestServer {
    server(
        WidgetConfig::new(StorefrontConfig::default())
            .with_paypal(PayPalConfig::new("client-abc"), true),
    )
}

#[tokio::test]
async fn health_reports_checkout_provider() {
    let response = paypal_server().get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checkout"], "paypal");

    let body: Value = server(WidgetConfig::new(StorefrontConfig::default()))
        .get("/health")
        .await
        .json();
    assert_eq!(body["checkout"], "manual");
}

#[tokio::test]
async fn lists_baked_catalog() {
    let response = paypal_server().get("/api/v1/products").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["count"], 6);
    assert_eq!(body["products"][0]["id"], 1);
    assert_eq!(body["products"][0]["price"], 199.99);
}

#[tokio::test]
async fn gets_single_product() {
    let server = paypal_server();

    let response = server.get("/api/v1/products/3").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["price"], 89.99);

    server
        .get("/api/v1/products/99")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/api/v1/products/zero").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn widget_config_round_trips() {
    let response = paypal_server().get("/api/v1/widget").await;
    response.assert_status_ok();

    let widget: WidgetConfig = response.json();
    assert_eq!(widget.paypal.unwrap().client_id, "client-abc");
    assert!(widget.sdk_reachable);
    assert_eq!(widget.storefront.store_name, "Merchant Store");
}

#[tokio::test]
async fn page_has_first_paint() {
    let response = paypal_server().get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("Premium Wireless Headphones"));
    assert!(html.contains(r#"data-action="add""#));
    assert!(html.contains("paypal.com/sdk/js"));
    assert!(html.contains("/pkg/store_wasm.js"));
}

#[tokio::test]
async fn page_without_reachable_sdk_skips_script() {
    let html = server(
        WidgetConfig::new(StorefrontConfig::default())
            .with_paypal(PayPalConfig::new("client-abc"), false),
    )
    .get("/")
    .await
    .text();
    assert!(!html.contains("paypal.com/sdk/js"));
}

#[tokio::test]
async fn serves_widget_bundle() {
    let response = paypal_server().get("/pkg/store_wasm.js").await;
    response.assert_status_ok();
    assert!(response.text().contains("StorefrontApp"));

    paypal_server()
        .get("/pkg/missing.js")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
