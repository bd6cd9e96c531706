//! # Request Handlers
//!
//! Axum request handlers for the storefront host.
//! The page handler renders the first paint server-side; everything after
//! that happens in the browser.

use crate::page;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use store_core::{ProductId, StoreError, Storefront};
use tracing::{debug, instrument};

// =============================================================================
// Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn store_error_to_response(err: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION"),
        "checkout": state
            .delegate()
            .map(|d| d.provider_name())
            .unwrap_or("manual"),
        "sdk_reachable": state.widget.sdk_reachable,
    }))
}

/// Storefront page with the first render pass
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut store = Storefront::new(
        state.catalog.clone(),
        state.widget.storefront.clone(),
        state.delegate(),
        false,
    );
    let view = store.render();
    debug!(panel = store.panel().name(), "rendered first paint");
    Html(page::render_page(&state.widget, &view))
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products = state.catalog.products();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let id: ProductId = product_id.parse().map_err(|e: StoreError| {
        let (status, Json(body)) = store_error_to_response(e);
        (
            status,
            Json(body.with_details("product ids are positive integers")),
        )
    })?;

    let product = state
        .catalog
        .require(id)
        .map_err(store_error_to_response)?;

    Ok(Json(product.clone()))
}

/// Boot configuration for the wasm widget
pub async fn widget_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.widget.as_ref().clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400).with_details("more");
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert_eq!(err.details.as_deref(), Some("more"));
    }

    #[test]
    fn test_store_error_conversion() {
        let (status, _json) = store_error_to_response(StoreError::ProductNotFound { product_id: 42 });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _json) =
            store_error_to_response(StoreError::delegate_unavailable("paypal", "down"));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
