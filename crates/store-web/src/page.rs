//! # Storefront Page
//!
//! HTML shell with the first render pass filled in. The wasm widget takes
//! over the same containers once it boots; without it the page still shows
//! the catalog.

use store_core::render::escape_html;
use store_core::{containers, View};
use store_paypal::WidgetConfig;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6fa; color: #222; }
header { display: flex; justify-content: space-between; align-items: center; padding: 16px 24px; background: #1a1a2e; color: #fff; }
.cart-toggle { background: none; border: 0; color: inherit; font-size: 18px; cursor: pointer; }
.cart-count { background: #e94560; border-radius: 10px; padding: 2px 8px; font-size: 14px; }
main { display: grid; grid-template-columns: 1fr 360px; gap: 24px; padding: 24px; }
.products-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }
.product-card { background: #fff; border-radius: 12px; overflow: hidden; }
.product-image { width: 100%; height: 180px; object-fit: cover; }
.product-info { padding: 12px; }
.product-footer { display: flex; justify-content: space-between; align-items: center; }
.add-to-cart-btn, .fallback-checkout-btn, .retry-btn { background: #0070ba; color: #fff; border: 0; border-radius: 6px; padding: 8px 12px; touch-action: manipulation; }
.add-to-cart-btn.added { background: #28a745; }
.cart-section { background: #fff; border-radius: 12px; padding: 16px; align-self: start; }
.cart-item { display: flex; gap: 8px; align-items: center; margin-bottom: 12px; }
.cart-item-image { width: 56px; height: 56px; object-fit: cover; border-radius: 6px; }
.quantity-btn, .remove-item { touch-action: manipulation; }
@media (max-width: 800px) { main { grid-template-columns: 1fr; } }
"#;

/// Full page for one server-side render
pub fn render_page(widget: &WidgetConfig, view: &View) -> String {
    let store_name = escape_html(&widget.storefront.store_name);
    let sdk_script = widget
        .sdk_script_url()
        .map(|url| format!(r#"<script src="{}"></script>"#, escape_html(&url)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{store_name}</title>
<style>{style}</style>
{sdk_script}
</head>
<body>
<header>
  <h1>{store_name}</h1>
  <div id="{toggle_id}">{toggle}</div>
</header>
<div id="{notice_id}">{notice}</div>
<main>
  <section class="products-grid" id="{catalog_id}">{catalog}</section>
  <aside class="cart-section" id="{cart_section_id}">
    <h2>Your Cart</h2>
    <div id="{cart_items_id}">{cart}</div>
    <p class="cart-total">Total: $<span id="{cart_total_id}">{total}</span></p>
    <div id="{checkout_id}">{checkout}</div>
  </aside>
</main>
<script type="module">
  import init, {{ StorefrontApp }} from '/pkg/store_wasm.js';
  await init();
  const widget = await (await fetch('/api/v1/widget')).json();
  window.storefront = new StorefrontApp(widget);
  window.storefront.mount();
</script>
</body>
</html>
"#,
        store_name = store_name,
        style = STYLE,
        sdk_script = sdk_script,
        toggle_id = containers::CART_TOGGLE,
        toggle = view.toggle.to_html(),
        notice_id = containers::NOTICE,
        notice = view.notice.to_html(),
        catalog_id = containers::CATALOG,
        catalog = view.catalog.to_html(),
        cart_section_id = containers::CART_SECTION,
        cart_items_id = containers::CART_ITEMS,
        cart = view.cart.to_html(),
        cart_total_id = containers::CART_TOTAL,
        total = escape_html(&view.summary.total),
        checkout_id = containers::CHECKOUT,
        checkout = view.checkout.to_html(),
    )
}
