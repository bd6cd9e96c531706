//! # PayPal Buttons
//!
//! [`CheckoutDelegate`] backed by the PayPal JavaScript SDK.
//!
//! `prepare` does not talk to PayPal: it produces the options object the
//! host passes to `paypal.Buttons(...)`, with the order the `createOrder`
//! callback submits and the button style.

use crate::config::PayPalConfig;
use serde::Serialize;
use store_core::{CheckoutDelegate, DelegateMount, OrderDescription, StoreError, StoreResult};
use tracing::debug;

const PROVIDER: &str = "paypal";

/// Element id the buttons render into
pub const BUTTON_CONTAINER_ID: &str = "paypal-buttons";

/// Visual options for the rendered buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonStyle {
    pub color: String,
    pub shape: String,
    pub label: String,
    pub layout: String,
    pub height: u32,
    pub tagline: bool,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            shape: "rect".to_string(),
            label: "checkout".to_string(),
            layout: "vertical".to_string(),
            height: 45,
            tagline: false,
        }
    }
}

// Order payload as `actions.order.create` expects it

#[derive(Debug, Serialize)]
struct ButtonOptions<'a> {
    order: CreateOrder<'a>,
    style: &'a ButtonStyle,
}

#[derive(Debug, Serialize)]
struct CreateOrder<'a> {
    intent: &'static str,
    purchase_units: Vec<PurchaseUnit<'a>>,
}

#[derive(Debug, Serialize)]
struct PurchaseUnit<'a> {
    amount: Amount<'a>,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct Amount<'a> {
    value: String,
    currency_code: &'a str,
}

/// PayPal Buttons checkout delegate
#[derive(Debug, Clone)]
pub struct PayPalButtons {
    config: PayPalConfig,
    style: ButtonStyle,
    sdk_reachable: bool,
}

impl PayPalButtons {
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            config,
            style: ButtonStyle::default(),
            sdk_reachable: true,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> StoreResult<Self> {
        let config = PayPalConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Builder: override button style
    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder: record the outcome of an SDK probe. Unreachable buttons
    /// refuse every order.
    pub fn with_sdk_reachable(mut self, reachable: bool) -> Self {
        self.sdk_reachable = reachable;
        self
    }

    pub fn config(&self) -> &PayPalConfig {
        &self.config
    }

    pub fn is_sdk_reachable(&self) -> bool {
        self.sdk_reachable
    }

    fn unavailable(message: impl Into<String>) -> StoreError {
        StoreError::delegate_unavailable(PROVIDER, message)
    }

    /// Check that the SDK script is reachable. Any network error or
    /// non-success status means the buttons cannot load.
    #[cfg(feature = "probe")]
    #[tracing::instrument(skip(self), fields(environment = %self.config.environment))]
    pub async fn probe_sdk(&self, timeout: std::time::Duration) -> StoreResult<()> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Self::unavailable(format!("http client: {}", e)))?;

        let response = client
            .get(self.config.sdk_script_url())
            .send()
            .await
            .map_err(|e| Self::unavailable(format!("sdk unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "PayPal SDK probe failed");
            return Err(Self::unavailable(format!("sdk returned {}", status)));
        }

        debug!(%status, "PayPal SDK reachable");
        Ok(())
    }
}

impl CheckoutDelegate for PayPalButtons {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn label(&self) -> &str {
        "PayPal"
    }

    fn prepare(&self, order: &OrderDescription) -> StoreResult<DelegateMount> {
        if self.config.client_id.trim().is_empty() {
            return Err(Self::unavailable("client id is empty"));
        }
        if !self.sdk_reachable {
            return Err(Self::unavailable("sdk unreachable"));
        }
        if order.item_count == 0 || order.amount.is_zero() {
            return Err(Self::unavailable("order has nothing to charge"));
        }

        let options = ButtonOptions {
            order: CreateOrder {
                intent: "CAPTURE",
                purchase_units: vec![PurchaseUnit {
                    amount: Amount {
                        value: order.amount.to_decimal_string(),
                        currency_code: &order.currency_code,
                    },
                    description: &order.description,
                }],
            },
            style: &self.style,
        };

        debug!(
            amount = %order.amount,
            items = order.item_count,
            "preparing PayPal buttons"
        );

        Ok(DelegateMount {
            provider: PROVIDER.to_string(),
            label: self.label().to_string(),
            container_id: BUTTON_CONTAINER_ID.to_string(),
            script_url: self.config.sdk_script_url(),
            options: serde_json::to_value(&options)?,
        })
    }
}
