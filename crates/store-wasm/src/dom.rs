//! DOM helpers: trigger lookup, touch positions and console mirroring.

use store_core::{DelegateMount, Point, Trigger};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, TouchEvent};

/// Raw events the widget listens for
pub(crate) const POINTER_EVENTS: [&str; 4] = ["click", "touchstart", "touchmove", "touchend"];

/// The trigger carried by `el` or its closest tagged ancestor.
/// Malformed triggers are dropped.
pub(crate) fn trigger_of(el: &Element) -> Option<Trigger> {
    let el = el.closest("[data-action]").ok().flatten()?;
    Trigger::parse(
        el.get_attribute("data-action").as_deref(),
        el.get_attribute("data-product-id").as_deref(),
        el.get_attribute("data-gen").as_deref(),
    )
    .map_err(|e| debug!(error = %e, "malformed trigger dropped"))
    .ok()
}

/// Viewport position of the first changed touch
pub(crate) fn touch_position(event: &Event) -> Option<Point> {
    let touch = event.dyn_ref::<TouchEvent>()?.changed_touches().get(0)?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

/// Best-effort message for a thrown JS value
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    err.as_string()
        .or_else(|| js_sys::JSON::stringify(err).ok().and_then(|s| s.as_string()))
        .unwrap_or_else(|| "unknown error".to_string())
}

pub(crate) fn warn(message: &str) {
    tracing::warn!("{}", message);
    web_sys::console::warn_1(&JsValue::from_str(message));
}

pub(crate) fn selector(container_id: &str) -> String {
    format!("#{}", container_id)
}

/// `setTimeout` takes an i32 delay
pub(crate) fn timeout_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}

/// Checkout container contents as last written to the page
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RenderedCheckout {
    pub html: String,
    pub mount: Option<DelegateMount>,
}

/// Replacing the container tears down mounted buttons, so identical
/// contents are left alone
pub(crate) fn needs_refresh(previous: Option<&RenderedCheckout>, next: &RenderedCheckout) -> bool {
    previous != Some(next)
}

/// Keep the newest `keep` entries
pub(crate) fn retain_recent<T>(items: &mut Vec<T>, keep: usize) {
    if items.len() > keep {
        items.drain(..items.len() - keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(html: &str, container: Option<&str>) -> RenderedCheckout {
        RenderedCheckout {
            html: html.to_string(),
            mount: container.map(|id| DelegateMount {
                provider: "paypal".into(),
                label: "PayPal".into(),
                container_id: id.into(),
                script_url: String::new(),
                options: serde_json::json!({}),
            }),
        }
    }

    #[test]
    fn test_needs_refresh() {
        let ready = rendered("<div id=\"paypal-buttons\"></div>", Some("paypal-buttons"));
        assert!(needs_refresh(None, &ready));
        assert!(!needs_refresh(Some(&ready), &ready.clone()));
        assert!(needs_refresh(
            Some(&ready),
            &rendered("<p>Payment was cancelled.</p>", None)
        ));
    }

    #[test]
    fn test_retain_recent() {
        let mut items = vec![1, 2, 3, 4];
        retain_recent(&mut items, 2);
        assert_eq!(items, vec![3, 4]);

        let mut short = vec![1];
        retain_recent(&mut short, 2);
        assert_eq!(short, vec![1]);
    }

    #[test]
    fn test_timeout_and_selector() {
        assert_eq!(timeout_ms(3000), 3000);
        assert_eq!(timeout_ms(u32::MAX), i32::MAX);
        assert_eq!(selector("paypal-buttons"), "#paypal-buttons");
    }
}
