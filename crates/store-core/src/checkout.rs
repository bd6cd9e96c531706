//! # Checkout Delegate
//!
//! Boundary with the hosted payment-button widget.
//!
//! The widget is an external collaborator: the storefront hands it an
//! [`OrderDescription`] through [`CheckoutDelegate::prepare`] and later
//! receives a [`CheckoutOutcome`] from the host's callbacks. The cart store
//! never sees the widget.
//!
//! ```text
//! ┌──────────────┐  prepare(order)  ┌───────────────────┐
//! │  Storefront  │ ───────────────► │ CheckoutDelegate  │
//! │              │ ◄─────────────── │ (PayPal Buttons)  │
//! └──────────────┘  approve/error/  └───────────────────┘
//!                   cancel
//! ```

use crate::cart::Totals;
use crate::error::StoreResult;
use crate::product::{Price, CURRENCY_CODE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What the delegate is asked to charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDescription {
    pub amount: Price,
    pub currency_code: String,
    pub item_count: u32,
    pub description: String,
}

impl OrderDescription {
    /// Describe the current cart. `None` for an empty cart: there is nothing
    /// to check out.
    pub fn from_totals(store_name: &str, totals: Totals) -> Option<Self> {
        if totals.item_count == 0 {
            return None;
        }
        Some(Self {
            amount: totals.total_price,
            currency_code: CURRENCY_CODE.to_string(),
            item_count: totals.item_count,
            description: format!("{} Order - {} items", store_name, totals.item_count),
        })
    }
}

/// Everything the host needs to mount the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateMount {
    /// Provider name (e.g., "paypal")
    pub provider: String,
    /// Human label (e.g., "PayPal")
    pub label: String,
    /// Element id the widget renders into
    pub container_id: String,
    /// SDK script the host must have loaded
    pub script_url: String,
    /// Provider-specific widget options
    pub options: serde_json::Value,
}

/// Hosted payment widget.
///
/// `prepare` failing means the widget cannot be offered for this order and
/// the storefront degrades to its manual completion path.
pub trait CheckoutDelegate: Send + Sync {
    /// Provider name (for logging and mount data)
    fn provider_name(&self) -> &'static str;

    /// Label shown to the shopper
    fn label(&self) -> &str {
        self.provider_name()
    }

    /// Build the mount data for an order
    fn prepare(&self, order: &OrderDescription) -> StoreResult<DelegateMount>;
}

/// Type alias for a shared checkout delegate (dynamic dispatch)
pub type BoxedCheckoutDelegate = Arc<dyn CheckoutDelegate>;

/// Payment approved by the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// Provider order id
    pub order_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_given_name: Option<String>,

    /// Provider status (e.g., "COMPLETED")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

impl Approval {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            payer_given_name: None,
            status: None,
            captured_at: None,
        }
    }

    /// Builder: set payer given name
    pub fn with_payer(mut self, given_name: impl Into<String>) -> Self {
        self.payer_given_name = Some(given_name.into());
        self
    }
}

/// Terminal result reported by the widget's callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Approved(Approval),
    Failed { reason: String },
    Cancelled,
}

/// Current state of the checkout container
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutPanel {
    /// Cart is empty
    Empty,
    /// Widget prepared and waiting for the shopper
    Ready(DelegateMount),
    /// Payment approved, cart clear pending
    Confirmed(Approval),
    /// Widget reported an error; cart kept
    Failed { reason: String },
    /// Shopper closed the widget; cart kept
    Cancelled,
    /// Widget unavailable; manual completion offered
    Fallback { label: String, total: Price },
}

impl CheckoutPanel {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutPanel::Empty => "empty",
            CheckoutPanel::Ready(_) => "ready",
            CheckoutPanel::Confirmed(_) => "confirmed",
            CheckoutPanel::Failed { .. } => "failed",
            CheckoutPanel::Cancelled => "cancelled",
            CheckoutPanel::Fallback { .. } => "fallback",
        }
    }

    /// Panel for the current cart: empty, widget ready, or fallback when the
    /// delegate is missing or refuses the order
    pub fn for_order(
        delegate: Option<&dyn CheckoutDelegate>,
        order: Option<&OrderDescription>,
    ) -> StoreResult<Self> {
        let Some(order) = order else {
            return Ok(CheckoutPanel::Empty);
        };
        match delegate {
            Some(delegate) => delegate.prepare(order).map(CheckoutPanel::Ready),
            None => Ok(CheckoutPanel::fallback(None, order.amount)),
        }
    }

    pub fn fallback(delegate: Option<&dyn CheckoutDelegate>, total: Price) -> Self {
        CheckoutPanel::Fallback {
            label: delegate
                .map(|d| d.label().to_string())
                .unwrap_or_else(|| "Online".to_string()),
            total,
        }
    }

    /// The widget mount, if the host must (re)mount it
    pub fn mount(&self) -> Option<&DelegateMount> {
        match self {
            CheckoutPanel::Ready(mount) => Some(mount),
            _ => None,
        }
    }
}

/// One-shot confirmation shown after a completed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

impl Notice {
    /// Confirmation for the manual completion path; nothing was charged
    pub fn manual_order(total: Price) -> Self {
        Self {
            title: "Order placed".to_string(),
            body: format!(
                "Order total: {}. This is a demo checkout, no payment was captured.",
                total.display()
            ),
        }
    }
}
