//! # Storefront Configuration
//!
//! Timings and labels for the widget. Every field has a default so an empty
//! TOML document is a valid configuration.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Merchant name used in order descriptions
    pub store_name: String,

    /// A touch longer than this is a press, not a tap
    pub tap_max_duration_ms: f64,

    /// Pointer travel allowed between touch-start and touch-end
    pub tap_move_tolerance_px: f64,

    /// Touch-ends closer than this suppress double-tap zoom
    pub double_tap_window_ms: f64,

    /// How long the payment confirmation shows before the cart clears
    pub confirmation_delay_ms: u32,

    /// How long an add-to-cart button shows "Added!"
    pub added_feedback_ms: u32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_name: "Merchant Store".to_string(),
            tap_max_duration_ms: 500.0,
            tap_move_tolerance_px: 10.0,
            double_tap_window_ms: 300.0,
            confirmation_delay_ms: 3000,
            added_feedback_ms: 1000,
        }
    }
}

impl StorefrontConfig {
    /// Parse overrides from TOML and validate them
    pub fn from_toml(toml_str: &str) -> StoreResult<Self> {
        let config: StorefrontConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> StoreResult<()> {
        if self.store_name.trim().is_empty() {
            return Err(StoreError::Configuration("store_name is empty".into()));
        }
        let timings = [
            ("tap_max_duration_ms", self.tap_max_duration_ms),
            ("tap_move_tolerance_px", self.tap_move_tolerance_px),
            ("double_tap_window_ms", self.double_tap_window_ms),
        ];
        for (name, value) in timings {
            if !value.is_finite() || value < 0.0 {
                return Err(StoreError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = StorefrontConfig::from_toml("").unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.tap_max_duration_ms, 500.0);
        assert_eq!(config.confirmation_delay_ms, 3000);
    }

    #[test]
    fn test_partial_override() {
        let config = StorefrontConfig::from_toml(
            r#"
            store_name = "Corner Shop"
            confirmation_delay_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.confirmation_delay_ms, 1500);
        assert_eq!(config.added_feedback_ms, 1000);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(StorefrontConfig::from_toml("store_name = \"  \"").is_err());
        assert!(StorefrontConfig::from_toml("tap_max_duration_ms = -5.0").is_err());
        assert!(matches!(
            StorefrontConfig::from_toml("confirmation_delay_ms = \"soon\""),
            Err(StoreError::Serialization(_))
        ));
    }
}
