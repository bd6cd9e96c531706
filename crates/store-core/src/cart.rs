//! # Cart Store
//!
//! In-memory shopping cart. Lines keep first-added order, hold at most one
//! entry per product and never store a zero quantity.
//!
//! Aggregates are recomputed by full traversal on every [`CartStore::totals`]
//! call. Carts are bounded by the catalog size, so there is nothing to cache.

use crate::product::{Catalog, Price, ProductId};
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// One product-plus-quantity entry in the cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartLine {
    product_id: ProductId,
    quantity: NonZeroU32,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// Aggregates derived from the cart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub item_count: u32,
    pub total_price: Price,
}

/// Owned cart state. Mutated only through the operations below.
#[derive(Debug, Clone)]
pub struct CartStore {
    catalog: Arc<Catalog>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Create an empty cart over a catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            lines: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Add one unit of a product. Unknown ids are ignored.
    ///
    /// Returns true if the cart changed.
    pub fn add_item(&mut self, product_id: ProductId) -> bool {
        if self.catalog.get(product_id).is_none() {
            debug!(%product_id, "add_item: product not in catalog, ignoring");
            return false;
        }

        match self.position(product_id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine {
                product_id,
                quantity: NonZeroU32::MIN,
            }),
        }
        debug!(%product_id, quantity = self.quantity_of(product_id), "item added");
        true
    }

    /// Remove the line for a product, if present
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        let removed = self.lines.len() != before;
        if removed {
            debug!(%product_id, "item removed");
        }
        removed
    }

    /// Set a line's quantity. Zero or negative removes the line; a product
    /// with no line is left alone.
    pub fn set_quantity(&mut self, product_id: ProductId, new_quantity: i64) -> bool {
        let quantity = match u32::try_from(new_quantity).ok().and_then(NonZeroU32::new) {
            Some(q) => q,
            None if new_quantity <= 0 => return self.remove_item(product_id),
            // Larger than u32: clamp rather than drop the request
            None => NonZeroU32::MAX,
        };

        match self.position(product_id) {
            Some(idx) if self.lines[idx].quantity != quantity => {
                self.lines[idx].quantity = quantity;
                debug!(%product_id, quantity = quantity.get(), "quantity set");
                true
            }
            _ => false,
        }
    }

    /// Quantity + 1 for an existing line
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        match self.quantity_of(product_id) {
            0 => false,
            q => self.set_quantity(product_id, i64::from(q) + 1),
        }
    }

    /// Quantity - 1 for an existing line; the last unit removes the line
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        match self.quantity_of(product_id) {
            0 => false,
            q => self.set_quantity(product_id, i64::from(q) - 1),
        }
    }

    /// Empty the cart
    pub fn clear(&mut self) -> bool {
        if self.lines.is_empty() {
            return false;
        }
        self.lines.clear();
        debug!("cart cleared");
        true
    }

    /// Item count and total price, computed fresh
    pub fn totals(&self) -> Totals {
        self.lines
            .iter()
            .fold(Totals::default(), |acc, line| Totals {
                item_count: acc.item_count.saturating_add(line.quantity()),
                total_price: acc.total_price + self.line_total(line),
            })
    }

    /// Unit price × quantity for a line. Lines only exist for catalog products.
    pub fn line_total(&self, line: &CartLine) -> Price {
        self.catalog
            .get(line.product_id)
            .map(|p| p.price * line.quantity())
            .unwrap_or(Price::ZERO)
    }

    /// Quantity for a product, 0 when absent
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.position(product_id)
            .map(|idx| self.lines[idx].quantity())
            .unwrap_or(0)
    }

    /// Lines in first-added order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{demo_catalog, pid};

    fn cart() -> CartStore {
        CartStore::new(Arc::new(demo_catalog()))
    }

    #[test]
    fn test_repeated_add_keeps_one_line() {
        let mut cart = cart();
        for _ in 0..5 {
            assert!(cart.add_item(pid(1)));
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(pid(1)), 5);
    }

    #[test]
    fn test_add_unknown_product_is_noop() {
        let mut cart = cart();
        assert!(!cart.add_item(pid(99)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let mut cart = cart();
        cart.add_item(pid(2));
        cart.add_item(pid(1));
        cart.add_item(pid(2));

        let order: Vec<u32> = cart.lines().iter().map(|l| l.product_id().get()).collect();
        assert_eq!(order, vec![2, 1]);
    }

    #[test]
    fn test_totals_scenario() {
        let mut cart = cart();
        cart.add_item(pid(1)); // 10.00
        cart.add_item(pid(2)); // 5.00
        cart.add_item(pid(2));

        let totals = cart.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_price, Price::from_cents(2000));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = cart();
        cart.add_item(pid(1));
        cart.add_item(pid(2));

        assert!(cart.set_quantity(pid(1), 0));
        assert_eq!(cart.quantity_of(pid(1)), 0);
        assert!(cart.set_quantity(pid(2), -1));
        assert!(cart.is_empty());

        // Removing again is a no-op
        assert!(!cart.remove_item(pid(1)));
        assert!(!cart.set_quantity(pid(2), 0));
    }

    #[test]
    fn test_set_quantity_without_line_is_noop() {
        let mut cart = cart();
        assert!(!cart.set_quantity(pid(1), 4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = cart();
        cart.add_item(pid(3));
        assert!(cart.increment(pid(3)));
        assert_eq!(cart.quantity_of(pid(3)), 2);
        assert!(cart.decrement(pid(3)));
        assert!(cart.decrement(pid(3)));
        assert!(cart.is_empty());
        assert!(!cart.decrement(pid(3)));
        assert!(!cart.increment(pid(3)));
    }

    #[test]
    fn test_totals_after_interleaved_mutations() {
        let mut cart = cart();
        cart.add_item(pid(1));
        cart.add_item(pid(3));
        cart.set_quantity(pid(3), 4);
        cart.add_item(pid(2));
        cart.remove_item(pid(1));
        cart.add_item(pid(1));
        cart.set_quantity(pid(2), 3);

        let expected: Price = cart
            .lines()
            .iter()
            .map(|l| cart.catalog().get(l.product_id()).unwrap().price * l.quantity())
            .sum();
        let totals = cart.totals();
        assert_eq!(totals.total_price, expected);
        assert_eq!(totals.item_count, 1 + 4 + 3);
        assert_eq!(totals.total_price, Price::from_cents(1000 + 4 * 99 + 3 * 500));
    }

    #[test]
    fn test_clear() {
        let mut cart = cart();
        cart.add_item(pid(1));
        assert!(cart.clear());
        assert_eq!(cart.totals(), Totals::default());
        assert!(!cart.clear());
    }

    #[test]
    fn test_totals_saturate_on_oversized_quantities() {
        let mut cart = cart();
        cart.add_item(pid(1));
        cart.add_item(pid(2));
        cart.set_quantity(pid(1), i64::MAX);
        cart.set_quantity(pid(2), 5_000_000_000);

        let totals = cart.totals();
        assert_eq!(totals.item_count, u32::MAX);
        assert_eq!(
            totals.total_price,
            Price::from_cents(i64::from(u32::MAX) * (1000 + 500))
        );
    }
}
