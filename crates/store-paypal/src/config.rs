//! # PayPal Configuration
//!
//! Configuration for the PayPal JavaScript SDK.
//! The client id is public (it ships in the page), but it is still loaded
//! from the environment so sandbox and live deployments differ only in env.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use store_core::{StoreError, StoreResult, CURRENCY_CODE};

const DEFAULT_SDK_BASE_URL: &str = "https://www.paypal.com/sdk/js";

/// PayPal account environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayPalEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => "sandbox",
            PayPalEnvironment::Live => "live",
        }
    }
}

impl fmt::Display for PayPalEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayPalEnvironment {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PayPalEnvironment::Sandbox),
            "live" | "production" => Ok(PayPalEnvironment::Live),
            other => Err(StoreError::Configuration(format!(
                "PAYPAL_ENVIRONMENT must be sandbox or live, got {:?}",
                other
            ))),
        }
    }
}

/// PayPal SDK configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPalConfig {
    /// REST app client id
    pub client_id: String,

    pub environment: PayPalEnvironment,

    /// SDK script base URL (for testing/mocking)
    pub sdk_base_url: String,

    /// Order intent passed to the SDK
    pub intent: String,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID`
    ///
    /// Optional:
    /// - `PAYPAL_ENVIRONMENT` (`sandbox` | `live`, default sandbox)
    pub fn from_env() -> StoreResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let client_id = env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| StoreError::Configuration("PAYPAL_CLIENT_ID not set".to_string()))?;

        if client_id.trim().is_empty() {
            return Err(StoreError::Configuration(
                "PAYPAL_CLIENT_ID is empty".to_string(),
            ));
        }

        let environment = match env::var("PAYPAL_ENVIRONMENT") {
            Ok(raw) => raw.parse()?,
            Err(_) => PayPalEnvironment::default(),
        };

        Ok(Self::new(client_id).with_environment(environment))
    }

    /// Create config with explicit values (for testing)
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            environment: PayPalEnvironment::Sandbox,
            sdk_base_url: DEFAULT_SDK_BASE_URL.to_string(),
            intent: "capture".to_string(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.environment == PayPalEnvironment::Live
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == PayPalEnvironment::Sandbox
    }

    /// SDK script URL the page must load before mounting buttons
    pub fn sdk_script_url(&self) -> String {
        format!(
            "{}?client-id={}&currency={}&intent={}",
            self.sdk_base_url,
            urlencoding::encode(&self.client_id),
            CURRENCY_CODE,
            self.intent
        )
    }

    /// Builder: set environment
    pub fn with_environment(mut self, environment: PayPalEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Builder: set custom SDK base URL (for testing)
    pub fn with_sdk_base_url(mut self, url: impl Into<String>) -> Self {
        self.sdk_base_url = url.into();
        self
    }
}
