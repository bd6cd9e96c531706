//! # store-web
//!
//! HTTP host for storefront-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Server-side first paint of the storefront page
//! - Catalog and widget configuration endpoints
//! - Static serving of the compiled wasm widget
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Storefront page |
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | List products |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/api/v1/widget` | Widget boot configuration |
//! | GET | `/pkg/*` | wasm-bindgen output |

pub mod handlers;
pub mod page;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
