//! # store-core
//!
//! Core types for the storefront widget.
//!
//! This crate provides:
//! - `Catalog` and `Product` for the fixed product list
//! - `CartStore` for the in-memory cart and its totals
//! - `render` functions that turn state into markup trees
//! - `InputClassifier` for tap / click de-duplication
//! - `CheckoutDelegate` trait for hosted payment widgets
//! - `Storefront`, the controller tying the pieces together
//! - `StoreError` for typed error handling
//!
//! Nothing here touches a DOM or the network; hosts (the wasm binding, the
//! HTTP server) feed events in and apply the rendered views.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use store_core::{Action, Catalog, ProductId, Storefront, StorefrontConfig};
//!
//! let catalog = Arc::new(Catalog::builtin()?);
//! let mut store = Storefront::new(catalog, StorefrontConfig::default(), None, false);
//!
//! let update = store.dispatch(Action::Add(ProductId::new(1).unwrap()));
//! println!("{}", update.view.cart.to_html());
//! ```

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod input;
pub mod product;
pub mod render;
pub mod storefront;

// Re-exports for convenience
pub use cart::{CartLine, CartStore, Totals};
pub use checkout::{
    Approval, BoxedCheckoutDelegate, CheckoutDelegate, CheckoutOutcome, CheckoutPanel,
    DelegateMount, Notice, OrderDescription,
};
pub use config::StorefrontConfig;
pub use error::{StoreError, StoreResult};
pub use input::{
    Action, ActionKind, Classification, InputClassifier, Point, PointerEvent, PointerKind,
    Trigger,
};
pub use product::{Catalog, Price, Product, ProductId, BAKED_CATALOG, CURRENCY_CODE};
pub use render::{containers, CartSummary, Element, Node};
pub use storefront::{Effect, PointerResponse, Storefront, Update, View};
