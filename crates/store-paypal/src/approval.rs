//! # Capture Details
//!
//! Parsing of the object passed to `actions.order.capture().then(details)`.
//!
//! Only the fields the storefront shows are read:
//!
//! ```json
//! {
//!   "id": "5O190127TN364715T",
//!   "status": "COMPLETED",
//!   "create_time": "2024-05-01T12:00:00Z",
//!   "payer": { "name": { "given_name": "John", "surname": "Doe" } }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use store_core::{Approval, CheckoutOutcome, StoreError, StoreResult};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct CaptureDetails {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    create_time: Option<String>,
    #[serde(default)]
    payer: Option<Payer>,
}

#[derive(Debug, Deserialize)]
struct Payer {
    #[serde(default)]
    name: Option<PayerName>,
}

#[derive(Debug, Deserialize)]
struct PayerName {
    #[serde(default)]
    given_name: Option<String>,
}

/// Build an [`Approval`] from SDK capture details
pub trait FromCapture: Sized {
    fn from_capture(details: &Value) -> StoreResult<Self>;
}

impl FromCapture for Approval {
    fn from_capture(details: &Value) -> StoreResult<Self> {
        let details = CaptureDetails::deserialize(details)?;

        let order_id = details
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| StoreError::CheckoutFailed {
                reason: "capture details carry no order id".to_string(),
            })?;

        let captured_at = details.create_time.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| debug!(raw, error = %e, "unparseable create_time"))
                .ok()
        });

        Ok(Approval {
            order_id,
            payer_given_name: details
                .payer
                .and_then(|p| p.name)
                .and_then(|n| n.given_name),
            status: details.status,
            captured_at,
        })
    }
}

/// Outcome for an `onApprove` capture result
pub fn outcome_from_capture(details: &Value) -> CheckoutOutcome {
    match Approval::from_capture(details) {
        Ok(approval) => CheckoutOutcome::Approved(approval),
        Err(err) => {
            warn!(error = %err, "capture details rejected");
            CheckoutOutcome::Failed {
                reason: err.to_string(),
            }
        }
    }
}

/// Outcome for an `onError` callback
pub fn outcome_from_error(message: impl Into<String>) -> CheckoutOutcome {
    CheckoutOutcome::Failed {
        reason: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_capture() {
        let details = json!({
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "create_time": "2024-05-01T12:00:00Z",
            "payer": { "name": { "given_name": "John", "surname": "Doe" } },
            "purchase_units": []
        });

        let approval = Approval::from_capture(&details).unwrap();
        assert_eq!(approval.order_id, "5O190127TN364715T");
        assert_eq!(approval.payer_given_name.as_deref(), Some("John"));
        assert_eq!(approval.status.as_deref(), Some("COMPLETED"));
        assert_eq!(
            approval.captured_at.unwrap().to_rfc3339(),
            "2024-05-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_minimal_capture() {
        let approval = Approval::from_capture(&json!({ "id": "ABC" })).unwrap();
        assert_eq!(approval, Approval::new("ABC"));

        // Bad timestamp is dropped, not fatal
        let approval =
            Approval::from_capture(&json!({ "id": "ABC", "create_time": "yesterday" })).unwrap();
        assert!(approval.captured_at.is_none());
    }

    #[test]
    fn test_capture_without_id_fails() {
        let err = Approval::from_capture(&json!({ "status": "COMPLETED" })).unwrap_err();
        assert!(err.is_user_visible());

        assert!(matches!(
            outcome_from_capture(&json!({ "id": "  " })),
            CheckoutOutcome::Failed { .. }
        ));
    }

    #[test]
    fn test_capture_wrong_shape_is_serialization_error() {
        let err = Approval::from_capture(&json!({ "id": 42 })).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_outcome_from_error() {
        assert_eq!(
            outcome_from_error("popup closed"),
            CheckoutOutcome::Failed {
                reason: "popup closed".into()
            }
        );
    }
}
