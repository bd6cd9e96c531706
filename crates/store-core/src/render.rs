//! # Render Layer
//!
//! Pure functions from storefront state to a markup tree.
//!
//! Containers are re-rendered by full replacement on every change. Each
//! interactive element carries its trigger as `data-action`,
//! `data-product-id` and `data-gen` attributes; the generation ties it to the
//! render pass that produced it.

use crate::cart::{CartStore, Totals};
use crate::checkout::{CheckoutPanel, Notice};
use crate::input::{ActionKind, Trigger};
use crate::product::{Catalog, ProductId};
use serde::Serialize;

/// Elements that never have children or a closing tag
const VOID_TAGS: &[&str] = &["img", "br", "hr", "input"];

/// Element ids of the page containers each render pass replaces
pub mod containers {
    pub const CART_TOGGLE: &str = "cartToggle";
    pub const CATALOG: &str = "productsGrid";
    pub const CART_SECTION: &str = "cartSection";
    pub const CART_ITEMS: &str = "cartItems";
    pub const CART_TOTAL: &str = "cartTotal";
    pub const CHECKOUT: &str = "paypal-button-container";
    pub const NOTICE: &str = "orderNotice";
}

/// Markup tree node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Element(Element),
    Text { text: String },
    /// Sibling nodes with no wrapper, used for container contents
    Fragment { children: Vec<Node> },
}

/// An element with ordered attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute (replaces an existing value)
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    /// Builder: tag as an interactive trigger
    pub fn trigger(self, trigger: Trigger) -> Self {
        let el = self
            .attr("data-action", trigger.kind.as_str())
            .attr("data-gen", trigger.generation.to_string());
        match trigger.product_id {
            Some(id) => el.attr("data-product-id", id.to_string()),
            None => el,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Parse the trigger this element carries, if any
    pub fn as_trigger(&self) -> Option<Trigger> {
        Trigger::parse(
            self.get_attr("data-action"),
            self.get_attr("data-product-id"),
            self.get_attr("data-gen"),
        )
        .ok()
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Node::Fragment { children }
    }

    /// Serialize to escaped HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text { text } => out.push_str(&escape_html(text)),
            Node::Fragment { children } => children.iter().for_each(|c| c.write_html(out)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag) {
                    return;
                }
                el.children.iter().for_each(|c| c.write_html(out));
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
            }
        }
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            Node::Fragment { children } => children.iter().map(Node::text_content).collect(),
            Node::Element(el) => el.children.iter().map(Node::text_content).collect(),
        }
    }

    /// All elements in document order
    pub fn elements(&self) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_elements(&mut found);
        found
    }

    fn collect_elements<'a>(&'a self, found: &mut Vec<&'a Element>) {
        match self {
            Node::Text { .. } => {}
            Node::Fragment { children } => children.iter().for_each(|c| c.collect_elements(found)),
            Node::Element(el) => {
                found.push(el);
                el.children.iter().for_each(|c| c.collect_elements(found));
            }
        }
    }

    /// Elements carrying a class
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.has_class(class))
            .collect()
    }

    /// All triggers in document order
    pub fn triggers(&self) -> Vec<Trigger> {
        self.elements()
            .into_iter()
            .filter_map(Element::as_trigger)
            .collect()
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Product grid: one card per product
pub fn render_catalog(catalog: &Catalog, recently_added: Option<ProductId>, generation: u64) -> Node {
    let cards = catalog
        .products()
        .iter()
        .map(|product| -> Node {
            let add = Trigger::new(ActionKind::Add, Some(product.id), generation);
            let mut button = Element::new("button").class("add-to-cart-btn").trigger(add);
            button = if recently_added == Some(product.id) {
                button
                    .class("add-to-cart-btn added")
                    .attr("disabled", "disabled")
                    .text("Added!")
            } else {
                button.text("Add to Cart")
            };

            Element::new("div")
                .class("product-card")
                .child(
                    Element::new("img")
                        .attr("src", product.image.as_str())
                        .attr("alt", product.name.as_str())
                        .class("product-image"),
                )
                .child(
                    Element::new("div")
                        .class("product-info")
                        .child(Element::new("h3").class("product-name").text(product.name.as_str()))
                        .child(
                            Element::new("p")
                                .class("product-description")
                                .text(product.description.as_str()),
                        )
                        .child(
                            Element::new("div")
                                .class("product-footer")
                                .child(
                                    Element::new("span")
                                        .class("product-price")
                                        .text(product.price.display()),
                                )
                                .child(button),
                        ),
                )
                .into()
        })
        .collect();
    Node::fragment(cards)
}

/// Cart panel: empty-state message or one row per line
pub fn render_cart(cart: &CartStore, generation: u64) -> Node {
    if cart.is_empty() {
        return Node::fragment(vec![Element::new("p")
            .class("empty-cart")
            .text("Your cart is empty")
            .into()]);
    }

    let rows = cart
        .lines()
        .iter()
        .filter_map(|line| -> Option<Node> {
            let product = cart.catalog().get(line.product_id())?;
            let id = Some(product.id);
            let decrease = Trigger::new(ActionKind::Decrease, id, generation);
            let increase = Trigger::new(ActionKind::Increase, id, generation);
            let remove = Trigger::new(ActionKind::Remove, id, generation);

            Some(
                Element::new("div")
                    .class("cart-item")
                    .child(
                        Element::new("img")
                            .attr("src", product.image.as_str())
                            .attr("alt", product.name.as_str())
                            .class("cart-item-image"),
                    )
                    .child(
                        Element::new("div")
                            .class("cart-item-details")
                            .child(Element::new("h4").text(product.name.as_str()))
                            .child(
                                Element::new("p")
                                    .class("cart-item-price")
                                    .text(product.price.display()),
                            )
                            .child(
                                Element::new("div")
                                    .class("quantity-controls")
                                    .child(
                                        Element::new("button")
                                            .class("quantity-btn")
                                            .trigger(decrease)
                                            .attr("aria-label", "Decrease quantity")
                                            .text("-"),
                                    )
                                    .child(
                                        Element::new("span")
                                            .class("quantity-display")
                                            .text(line.quantity().to_string()),
                                    )
                                    .child(
                                        Element::new("button")
                                            .class("quantity-btn")
                                            .trigger(increase)
                                            .attr("aria-label", "Increase quantity")
                                            .text("+"),
                                    ),
                            ),
                    )
                    .child(
                        Element::new("button")
                            .class("remove-item")
                            .trigger(remove)
                            .attr("aria-label", "Remove item")
                            .text("\u{00d7}"),
                    )
                    .into(),
            )
        })
        .collect();
    Node::fragment(rows)
}

/// Header badge and cart total text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: String,
    pub total: String,
}

pub fn render_summary(totals: Totals) -> CartSummary {
    CartSummary {
        item_count: totals.item_count.to_string(),
        total: totals.total_price.to_decimal_string(),
    }
}

/// Header cart button with the item-count badge
pub fn render_cart_toggle(totals: Totals, generation: u64) -> Node {
    Element::new("button")
        .class("cart-toggle")
        .trigger(Trigger::new(ActionKind::ToggleCart, None, generation))
        .attr("aria-label", "View cart")
        .text("\u{1f6d2} ")
        .child(
            Element::new("span")
                .class("cart-count")
                .text(totals.item_count.to_string()),
        )
        .into()
}

/// Checkout container for the current panel state
pub fn render_checkout(panel: &CheckoutPanel, generation: u64) -> Node {
    let retry = Trigger::new(ActionKind::RetryCheckout, None, generation);

    let content: Vec<Node> = match panel {
        CheckoutPanel::Empty => vec![Element::new("p")
            .class("checkout-message")
            .text("Add items to cart to checkout")
            .into()],
        CheckoutPanel::Ready(mount) => vec![
            Element::new("div")
                .class("checkout-header")
                .text(format!("Checkout with {}", mount.label))
                .into(),
            Element::new("div")
                .attr("id", mount.container_id.as_str())
                .attr("data-provider", mount.provider.as_str())
                .into(),
        ],
        CheckoutPanel::Confirmed(approval) => {
            let mut success = Element::new("div")
                .class("payment-success")
                .child(Element::new("h3").text("\u{2705} Payment Successful!"));
            if let Some(name) = &approval.payer_given_name {
                success = success.child(Element::new("p").text(format!("Thank you, {}!", name)));
            }
            vec![success
                .child(Element::new("p").text(format!("Order ID: {}", approval.order_id)))
                .into()]
        }
        CheckoutPanel::Failed { .. } => vec![Element::new("div")
            .class("payment-error")
            .child(Element::new("p").text("\u{274c} Payment failed. Please try again."))
            .child(
                Element::new("button")
                    .class("retry-btn")
                    .trigger(retry)
                    .text("Retry Payment"),
            )
            .into()],
        CheckoutPanel::Cancelled => vec![Element::new("div")
            .class("payment-cancelled")
            .child(Element::new("p").text("Payment was cancelled."))
            .child(
                Element::new("button")
                    .class("retry-btn")
                    .trigger(retry)
                    .text("Try Again"),
            )
            .into()],
        CheckoutPanel::Fallback { label, total } => vec![Element::new("div")
            .class("checkout-fallback")
            .child(Element::new("p").text(format!("{} checkout temporarily unavailable", label)))
            .child(
                Element::new("button")
                    .class("fallback-checkout-btn")
                    .trigger(Trigger::new(ActionKind::CompleteOrder, None, generation))
                    .text(format!("Complete Order ({})", total.display())),
            )
            .into()],
    };
    Node::fragment(content)
}

/// Order confirmation notice, or nothing
pub fn render_notice(notice: Option<&Notice>) -> Node {
    let children = notice
        .map(|n| -> Vec<Node> {
            vec![Element::new("div")
                .class("order-notice")
                .attr("role", "status")
                .child(Element::new("strong").text(n.title.as_str()))
                .child(Element::new("p").text(n.body.as_str()))
                .into()]
        })
        .unwrap_or_default();
    Node::fragment(children)
}
