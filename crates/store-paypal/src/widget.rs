//! Boot configuration handed from the server host to the browser widget.

use crate::buttons::PayPalButtons;
use crate::config::PayPalConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store_core::{BoxedCheckoutDelegate, StorefrontConfig};

/// Everything the widget needs to boot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub storefront: StorefrontConfig,

    /// PayPal settings; `None` boots straight into manual checkout
    #[serde(default)]
    pub paypal: Option<PayPalConfig>,

    /// Result of the server-side SDK probe
    #[serde(default = "default_reachable")]
    pub sdk_reachable: bool,
}

fn default_reachable() -> bool {
    true
}

impl WidgetConfig {
    pub fn new(storefront: StorefrontConfig) -> Self {
        Self {
            storefront,
            paypal: None,
            sdk_reachable: true,
        }
    }

    /// Builder: attach PayPal settings
    pub fn with_paypal(mut self, config: PayPalConfig, sdk_reachable: bool) -> Self {
        self.paypal = Some(config);
        self.sdk_reachable = sdk_reachable;
        self
    }

    pub fn buttons(&self) -> Option<PayPalButtons> {
        self.paypal
            .clone()
            .map(|config| PayPalButtons::new(config).with_sdk_reachable(self.sdk_reachable))
    }

    /// Checkout delegate for a storefront built from this config
    pub fn delegate(&self) -> Option<BoxedCheckoutDelegate> {
        self.buttons()
            .map(|buttons| Arc::new(buttons) as BoxedCheckoutDelegate)
    }

    /// SDK script the page should load, if the buttons can be offered
    pub fn sdk_script_url(&self) -> Option<String> {
        self.paypal
            .as_ref()
            .filter(|_| self.sdk_reachable)
            .map(PayPalConfig::sdk_script_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_widget_config_json_shape() {
        let widget = WidgetConfig::new(StorefrontConfig::default())
            .with_paypal(PayPalConfig::new("client-abc"), true);
        let value = serde_json::to_value(&widget).unwrap();

        assert_eq!(value["paypal"]["client_id"], "client-abc");
        assert_eq!(value["paypal"]["environment"], "sandbox");
        assert_eq!(value["storefront"]["confirmation_delay_ms"], 3000);

        let back: WidgetConfig = serde_json::from_value(value).unwrap();
        assert_eq!(back, widget);
    }

    #[test]
    fn test_minimal_widget_config() {
        let widget: WidgetConfig = serde_json::from_value(json!({})).unwrap();
        assert!(widget.delegate().is_none());
        assert!(widget.sdk_script_url().is_none());
        assert_eq!(widget.storefront, StorefrontConfig::default());
    }

    #[test]
    fn test_unreachable_sdk_keeps_label_but_skips_script() {
        let widget = WidgetConfig::new(StorefrontConfig::default())
            .with_paypal(PayPalConfig::new("client-abc"), false);
        assert!(widget.sdk_script_url().is_none());

        let delegate = widget.delegate().unwrap();
        assert_eq!(delegate.label(), "PayPal");
    }
}
