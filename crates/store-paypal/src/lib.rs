//! # store-paypal
//!
//! PayPal Buttons checkout delegate for storefront-rs.
//!
//! The buttons are rendered by PayPal's JavaScript SDK in the browser. This
//! crate owns everything on our side of that boundary:
//!
//! 1. **PayPalConfig** - client id, environment and SDK script URL
//! 2. **PayPalButtons** - `CheckoutDelegate` producing the `paypal.Buttons`
//!    options (order payload + style)
//! 3. **FromCapture** - parses `actions.order.capture()` details into an
//!    `Approval`
//! 4. **WidgetConfig** - boot settings the server hands to the browser
//!
//! With the `probe` feature (default) `PayPalButtons::probe_sdk` checks the SDK
//! script is reachable, so a server host can boot the page straight into the
//! manual checkout path when it is not.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use store_core::{Catalog, Storefront, StorefrontConfig};
//! use store_paypal::PayPalButtons;
//!
//! let buttons = PayPalButtons::from_env()?;
//! let store = Storefront::new(
//!     Arc::new(Catalog::builtin()?),
//!     StorefrontConfig::default(),
//!     Some(Arc::new(buttons)),
//!     false,
//! );
//! ```

pub mod approval;
pub mod buttons;
pub mod config;
pub mod widget;

// Re-exports
pub use approval::{outcome_from_capture, outcome_from_error, FromCapture};
pub use buttons::{ButtonStyle, PayPalButtons, BUTTON_CONTAINER_ID};
pub use config::{PayPalConfig, PayPalEnvironment};
pub use widget::WidgetConfig;
