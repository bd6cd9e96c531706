//! # storefront
//!
//! Serves the storefront page and the wasm widget.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_CLIENT_ID=your-sandbox-client-id
//! export PAYPAL_ENVIRONMENT=sandbox
//!
//! # Build the widget, then run the server
//! wasm-pack build crates/store-wasm --target web
//! storefront
//! ```

use store_web::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Print banner
    print_banner();

    // Initialize application state
    let state = AppState::new().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.len());
    match &state.widget.paypal {
        Some(paypal) => info!(
            "Checkout: PayPal ({}), SDK reachable: {}",
            paypal.environment, state.widget.sdk_reachable
        ),
        None => info!("Checkout: manual completion only"),
    }

    // Create router
    let app = routes::create_router(state.clone());

    // Start server
    info!("🛒 Storefront starting on http://{}", addr);

    if !is_prod {
        info!("📦 Catalog: GET http://{}/api/v1/products", addr);
        info!("🧩 Widget assets: {}", state.config.wasm_pkg_dir.display());
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Storefront RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Catalog, cart and PayPal checkout widget
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
