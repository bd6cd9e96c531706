//! # Routes
//!
//! Axum router configuration for the storefront host.

use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET /                      - Storefront page (first paint)
/// - GET /health                - Health check
/// - GET /api/v1/products       - List all products
/// - GET /api/v1/products/{id}  - Get product by ID
/// - GET /api/v1/widget         - Widget boot configuration
/// - GET /pkg/*                 - Compiled wasm widget
pub fn create_router(state: AppState) -> Router {
    // Catalog and widget config are public, read-only data
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        .route("/widget", get(handlers::widget_config));

    let pkg = ServeDir::new(&state.config.wasm_pkg_dir);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .nest("/api/v1", api_routes)
        .nest_service("/pkg", pkg)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
