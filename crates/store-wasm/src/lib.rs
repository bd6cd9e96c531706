//! # store-wasm
//!
//! WebAssembly entry point for the storefront widget.
//!
//! The page server hands out a [`WidgetConfig`] at `/api/v1/widget`; the
//! widget builds the catalog, cart and checkout delegate from it and takes
//! over the page containers.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { StorefrontApp } from '/pkg/store_wasm.js';
//!
//! await init();
//!
//! const widget = await (await fetch('/api/v1/widget')).json();
//! const app = new StorefrontApp(widget);
//! app.mount();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

mod app;
mod dom;
mod paypal;

use app::App;
use js_sys::Reflect;
use std::rc::Rc;
use std::sync::Arc;
use store_core::{Action, Catalog, ProductId, Storefront};
use store_paypal::WidgetConfig;
use tracing::info;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// The mounted widget
#[wasm_bindgen]
pub struct StorefrontApp {
    app: Rc<App>,
}

#[wasm_bindgen]
impl StorefrontApp {
    /// Build the widget from the server's widget config
    #[wasm_bindgen(constructor)]
    pub fn new(widget: JsValue) -> Result<StorefrontApp, JsValue> {
        let widget: WidgetConfig = serde_wasm_bindgen::from_value(widget)
            .map_err(|e| JsValue::from_str(&format!("Invalid widget config: {}", e)))?;
        widget.storefront.validate().map_err(js_error)?;

        let catalog = Catalog::builtin().map_err(js_error)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let touch_capable = Reflect::has(&window, &JsValue::from_str("ontouchstart"))?;

        let delegate = widget.delegate();
        if delegate.is_none() {
            info!("no PayPal configuration, manual completion only");
        }

        let store = Storefront::new(
            Arc::new(catalog),
            widget.storefront,
            delegate,
            touch_capable,
        );
        Ok(StorefrontApp {
            app: Rc::new(App::new(store, document)),
        })
    }

    /// Attach event listeners and render. Calling it again is a no-op.
    pub fn mount(&self) -> Result<(), JsValue> {
        self.app.mount()
    }

    /// Units in the cart
    #[wasm_bindgen(js_name = itemCount)]
    pub fn item_count(&self) -> u32 {
        self.app.store().totals().item_count
    }

    /// Cart total as a 2-decimal string
    pub fn total(&self) -> String {
        self.app.store().totals().total_price.to_decimal_string()
    }

    /// Add one unit of a catalog product
    pub fn add(&self, product_id: u32) -> Result<(), JsValue> {
        let id = ProductId::new(product_id)
            .ok_or_else(|| JsValue::from_str("product id must be positive"))?;
        self.app.store().catalog().require(id).map_err(js_error)?;
        self.app.dispatch(Action::Add(id));
        Ok(())
    }
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
