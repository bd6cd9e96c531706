//! # Application State
//!
//! Shared state for the Axum application.
//! Everything here is read-only once the server starts.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use store_core::{BoxedCheckoutDelegate, Catalog, StorefrontConfig};
use store_paypal::{PayPalButtons, PayPalConfig, WidgetConfig};
use tracing::{info, warn};

/// How long the startup SDK probe may take
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// TOML file overriding storefront timings
    pub storefront_config: Option<PathBuf>,
    /// Directory holding the wasm-bindgen output
    pub wasm_pkg_dir: PathBuf,
    /// Probe the PayPal SDK at startup
    pub probe_sdk: bool,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storefront_config: std::env::var("STOREFRONT_CONFIG").ok().map(PathBuf::from),
            wasm_pkg_dir: std::env::var("WASM_PKG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("crates/store-wasm/pkg")),
            probe_sdk: std::env::var("PROBE_SDK")
                .map(|v| !matches!(v.trim(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Product catalog
    pub catalog: Arc<Catalog>,
    /// Boot settings for the widget
    pub widget: Arc<WidgetConfig>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build state from the environment, probing the PayPal SDK if enabled
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let catalog = Catalog::builtin().context("baked catalog is invalid")?;
        let storefront = load_storefront_config(config.storefront_config.as_deref())?;

        let mut widget = WidgetConfig::new(storefront);
        match PayPalConfig::from_env() {
            Ok(paypal) => {
                let reachable = if config.probe_sdk {
                    probe(&paypal).await
                } else {
                    true
                };
                widget = widget.with_paypal(paypal, reachable);
            }
            Err(e) => warn!(error = %e, "PayPal not configured, checkout uses manual completion"),
        }

        Ok(Self::with_parts(config, catalog, widget))
    }

    /// Assemble state from explicit parts (for testing)
    pub fn with_parts(config: AppConfig, catalog: Catalog, widget: WidgetConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            widget: Arc::new(widget),
            config,
        }
    }

    /// Checkout delegate for server-side renders
    pub fn delegate(&self) -> Option<BoxedCheckoutDelegate> {
        self.widget.delegate()
    }
}

async fn probe(config: &PayPalConfig) -> bool {
    let buttons = PayPalButtons::new(config.clone());
    match buttons.probe_sdk(PROBE_TIMEOUT).await {
        Ok(()) => {
            info!(environment = %config.environment, "PayPal SDK reachable");
            true
        }
        Err(e) => {
            warn!(error = %e, "PayPal SDK probe failed, page boots with manual checkout");
            false
        }
    }
}

/// Load storefront overrides, or defaults when no file is configured
fn load_storefront_config(path: Option<&Path>) -> anyhow::Result<StorefrontConfig> {
    let Some(path) = path else {
        return Ok(StorefrontConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = StorefrontConfig::from_toml(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    info!(path = %path.display(), store = %config.store_name, "loaded storefront config");
    Ok(config)
}
