//! # Storefront Error Types
//!
//! Typed error handling for the storefront widget.
//! Fallible operations return `Result<T, StoreError>`.
//!
//! Lookup misses on cart operations are not errors: they are silent no-ops.
//! `ProductNotFound` only surfaces from explicit catalog queries.

use thiserror::Error;

/// Core error type for catalog, configuration and checkout operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Product not found in catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: u32 },

    /// Baked catalog failed to parse or violates an invariant
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Negative or non-finite price
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Rendered trigger attributes could not be parsed
    #[error("Invalid trigger: {0}")]
    InvalidTrigger(String),

    /// Checkout widget could not be prepared or failed to load
    #[error("Checkout unavailable [{provider}]: {message}")]
    DelegateUnavailable { provider: String, message: String },

    /// Payment declined or errored inside the checkout widget
    #[error("Checkout failed: {reason}")]
    CheckoutFailed { reason: String },

    /// Configuration errors (missing keys, invalid values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns true if the user can retry the failed step from the UI
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::CheckoutFailed { .. } | StoreError::DelegateUnavailable { .. }
        )
    }

    /// Returns true if the error is shown to the shopper as a message.
    /// Everything else is logged only.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, StoreError::CheckoutFailed { .. })
    }

    /// HTTP status code for server hosts
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::ProductNotFound { .. } => 404,
            StoreError::InvalidTrigger(_) => 400,
            StoreError::InvalidPrice { .. } => 400,
            StoreError::DelegateUnavailable { .. } => 503,
            StoreError::CheckoutFailed { .. } => 402,
            StoreError::InvalidCatalog(_) => 500,
            StoreError::Configuration(_) => 500,
            StoreError::Serialization(_) => 500,
        }
    }

    pub fn delegate_unavailable(
        provider: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StoreError::DelegateUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for storefront operations
pub type StoreResult<T> = Result<T, StoreError>;
