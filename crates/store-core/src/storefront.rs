//! # Storefront
//!
//! The widget controller. Owns the catalog, the cart store, the input
//! classifier and the checkout panel, and re-renders every container after
//! each handled action.
//!
//! Hosts drive it with three kinds of input:
//! - raw pointer events ([`Storefront::handle_pointer`])
//! - checkout widget callbacks ([`Storefront::on_checkout_outcome`],
//!   [`Storefront::delegate_failed`])
//! - expired timers requested through [`Effect`]s
//!   ([`Storefront::complete_confirmation`],
//!   [`Storefront::reset_added_feedback`])
//!
//! Timer callbacks carry the token they were scheduled with; a stale or
//! repeated token is a no-op.

use crate::cart::{CartStore, Totals};
use crate::checkout::{
    BoxedCheckoutDelegate, CheckoutOutcome, CheckoutPanel, DelegateMount, Notice,
    OrderDescription,
};
use crate::config::StorefrontConfig;
use crate::input::{Action, InputClassifier, PointerEvent};
use crate::product::{Catalog, ProductId};
use crate::render::{self, CartSummary, Node};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fully rendered containers for one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub generation: u64,
    pub toggle: Node,
    pub catalog: Node,
    pub cart: Node,
    pub summary: CartSummary,
    pub checkout: Node,
    pub notice: Node,
    /// Widget to mount into the checkout container, if any
    pub mount: Option<DelegateMount>,
}

/// Host-side work requested by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Call [`Storefront::complete_confirmation`] after the delay
    ScheduleClear { token: u64, after_ms: u32 },
    /// Call [`Storefront::reset_added_feedback`] after the delay
    ResetAddedFeedback { token: u64, after_ms: u32 },
    /// Scroll the cart section into view
    ScrollToCart,
}

/// Result of handling one input
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub view: View,
    pub effects: Vec<Effect>,
}

/// Result of handling one raw pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct PointerResponse {
    pub prevent_default: bool,
    pub update: Option<Update>,
}

#[derive(Debug, Clone, Copy)]
struct AddedFeedback {
    product_id: ProductId,
    token: u64,
}

pub struct Storefront {
    config: StorefrontConfig,
    cart: CartStore,
    classifier: InputClassifier,
    delegate: Option<BoxedCheckoutDelegate>,
    panel: CheckoutPanel,
    notice: Option<Notice>,
    added: Option<AddedFeedback>,
    pending_clear: Option<u64>,
    generation: u64,
    next_token: u64,
}

impl Storefront {
    /// Create a storefront with an empty cart.
    ///
    /// Without a delegate, checkout is offered through manual completion.
    pub fn new(
        catalog: Arc<Catalog>,
        config: StorefrontConfig,
        delegate: Option<BoxedCheckoutDelegate>,
        touch_capable: bool,
    ) -> Self {
        let classifier = InputClassifier::new(&config, touch_capable);
        Self {
            config,
            cart: CartStore::new(catalog),
            classifier,
            delegate,
            panel: CheckoutPanel::Empty,
            notice: None,
            added: None,
            pending_clear: None,
            generation: 0,
            next_token: 0,
        }
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn catalog(&self) -> &Catalog {
        self.cart.catalog()
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn panel(&self) -> &CheckoutPanel {
        &self.panel
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn totals(&self) -> Totals {
        self.cart.totals()
    }

    /// Generation of the most recent render pass
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Order description for the current cart, `None` when empty
    pub fn order(&self) -> Option<OrderDescription> {
        OrderDescription::from_totals(&self.config.store_name, self.cart.totals())
    }

    /// Render every container. Starts a new generation: triggers from
    /// earlier passes are stale from here on.
    pub fn render(&mut self) -> View {
        self.generation += 1;
        let generation = self.generation;
        View {
            generation,
            toggle: render::render_cart_toggle(self.cart.totals(), generation),
            catalog: render::render_catalog(
                self.cart.catalog(),
                self.added.map(|a| a.product_id),
                generation,
            ),
            cart: render::render_cart(&self.cart, generation),
            summary: render::render_summary(self.cart.totals()),
            checkout: render::render_checkout(&self.panel, generation),
            notice: render::render_notice(self.notice.as_ref()),
            mount: self.panel.mount().cloned(),
        }
    }

    /// Classify a raw event and dispatch the resulting activation, if any
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerResponse {
        let classification = self.classifier.classify(event);
        let update = classification.activation.and_then(|trigger| {
            if trigger.generation != self.generation {
                debug!(
                    trigger_gen = trigger.generation,
                    current_gen = self.generation,
                    "stale trigger dropped"
                );
                return None;
            }
            let action = trigger.action()?;
            if let (Action::Add(id), Some(added)) = (action, self.added) {
                if added.product_id == id {
                    debug!(product_id = %id, "add trigger is showing feedback, ignoring");
                    return None;
                }
            }
            Some(self.dispatch(action))
        });

        PointerResponse {
            prevent_default: classification.prevent_default,
            update,
        }
    }

    /// Apply one logical action and re-render
    pub fn dispatch(&mut self, action: Action) -> Update {
        let mut effects = Vec::new();

        let cart_changed = match action {
            Action::Add(id) => {
                let changed = self.cart.add_item(id);
                if changed {
                    let token = self.next_token();
                    self.added = Some(AddedFeedback {
                        product_id: id,
                        token,
                    });
                    effects.push(Effect::ResetAddedFeedback {
                        token,
                        after_ms: self.config.added_feedback_ms,
                    });
                }
                changed
            }
            Action::Increase(id) => self.cart.increment(id),
            Action::Decrease(id) => self.cart.decrement(id),
            Action::Remove(id) => self.cart.remove_item(id),
            Action::RetryCheckout => {
                if matches!(
                    self.panel,
                    CheckoutPanel::Failed { .. } | CheckoutPanel::Cancelled
                ) {
                    info!("retrying checkout");
                    self.refresh_panel();
                }
                false
            }
            Action::CompleteOrder => {
                self.complete_manual_order();
                false
            }
            Action::ToggleCart => {
                effects.push(Effect::ScrollToCart);
                false
            }
        };

        if cart_changed {
            self.notice = None;
            self.refresh_panel();
        }

        Update {
            view: self.render(),
            effects,
        }
    }

    /// Outcome reported by the checkout widget
    pub fn on_checkout_outcome(&mut self, outcome: CheckoutOutcome) -> Update {
        let mut effects = Vec::new();

        if self.pending_clear.is_some() {
            debug!(?outcome, "confirmation already pending, ignoring outcome");
        } else {
            match outcome {
                CheckoutOutcome::Approved(approval) => {
                    info!(order_id = %approval.order_id, "payment approved");
                    let token = self.next_token();
                    self.pending_clear = Some(token);
                    self.panel = CheckoutPanel::Confirmed(approval);
                    effects.push(Effect::ScheduleClear {
                        token,
                        after_ms: self.config.confirmation_delay_ms,
                    });
                }
                CheckoutOutcome::Failed { reason } => {
                    warn!(%reason, "payment failed");
                    self.panel = CheckoutPanel::Failed { reason };
                }
                CheckoutOutcome::Cancelled => {
                    info!("payment cancelled");
                    self.panel = CheckoutPanel::Cancelled;
                }
            }
        }

        Update {
            view: self.render(),
            effects,
        }
    }

    /// The host could not load or render the widget
    pub fn delegate_failed(&mut self, reason: &str) -> Update {
        let provider = self
            .delegate
            .as_ref()
            .map(|d| d.provider_name())
            .unwrap_or("none");
        warn!(provider, %reason, "checkout widget failed to initialize, offering manual completion");

        if self.pending_clear.is_none() && !self.cart.is_empty() {
            self.panel =
                CheckoutPanel::fallback(self.delegate.as_deref(), self.cart.totals().total_price);
        }
        Update {
            view: self.render(),
            effects: Vec::new(),
        }
    }

    /// Timer callback: the confirmation delay has passed
    pub fn complete_confirmation(&mut self, token: u64) -> Option<Update> {
        if self.pending_clear != Some(token) {
            debug!(token, "stale confirmation timer");
            return None;
        }
        self.pending_clear = None;
        self.cart.clear();
        self.refresh_panel();
        Some(Update {
            view: self.render(),
            effects: Vec::new(),
        })
    }

    /// Timer callback: the "Added!" feedback has expired
    pub fn reset_added_feedback(&mut self, token: u64) -> Option<Update> {
        match self.added {
            Some(added) if added.token == token => {
                self.added = None;
                Some(Update {
                    view: self.render(),
                    effects: Vec::new(),
                })
            }
            _ => None,
        }
    }

    fn complete_manual_order(&mut self) {
        if !matches!(self.panel, CheckoutPanel::Fallback { .. }) || self.cart.is_empty() {
            debug!(panel = self.panel.name(), "manual completion not offered, ignoring");
            return;
        }
        let total = self.cart.totals().total_price;
        info!(total = %total, "manual order completed, no payment captured");
        self.cart.clear();
        self.notice = Some(Notice::manual_order(total));
        self.refresh_panel();
    }

    /// Re-evaluate the checkout panel for the current cart. A pending
    /// confirmation keeps its panel until the clear runs.
    fn refresh_panel(&mut self) {
        if self.pending_clear.is_some() {
            return;
        }
        let order = self.order();
        let delegate = self.delegate.as_deref();
        self.panel = match CheckoutPanel::for_order(delegate, order.as_ref()) {
            Ok(panel) => panel,
            Err(err) => {
                warn!(error = %err, "checkout widget unavailable, offering manual completion");
                CheckoutPanel::fallback(delegate, self.cart.totals().total_price)
            }
        };
    }

    fn next_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkout::Approval;
    use crate::input::{ActionKind, Point, Trigger};
    use crate::product::Price;
    use crate::testing::{demo_catalog, pid, StubDelegate};

    fn storefront(delegate: Option<StubDelegate>) -> Storefront {
        let mut store = Storefront::new(
            Arc::new(demo_catalog()),
            StorefrontConfig::default(),
            delegate.map(|d| Arc::new(d) as BoxedCheckoutDelegate),
            false,
        );
        store.render();
        store
    }

    fn click(store: &Storefront, kind: ActionKind, id: Option<u32>) -> PointerEvent {
        let trigger = Trigger::new(kind, id.map(pid), store.generation());
        PointerEvent::click(Some(trigger), 0.0)
    }

    #[test]
    fn test_add_scenario_totals_and_ready_panel() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(1)));
        store.dispatch(Action::Add(pid(2)));
        let update = store.dispatch(Action::Add(pid(2)));

        assert_eq!(store.totals().item_count, 3);
        assert_eq!(store.totals().total_price, Price::from_cents(2000));
        assert_eq!(update.view.summary.total, "20.00");
        let mount = update.view.mount.unwrap();
        assert_eq!(mount.options["amount"], "20.00");
    }

    #[test]
    fn test_add_then_remove_shows_empty_states() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(1)));
        let update = store.dispatch(Action::Remove(pid(1)));

        assert!(store.cart().is_empty());
        assert_eq!(update.view.cart.text_content(), "Your cart is empty");
        assert_eq!(
            update.view.checkout.text_content(),
            "Add items to cart to checkout"
        );
        assert!(update.view.mount.is_none());
    }

    #[test]
    fn test_every_render_bumps_generation() {
        let mut store = storefront(None);
        let before = store.generation();
        let update = store.dispatch(Action::Add(pid(1)));
        assert_eq!(update.view.generation, before + 1);
        assert!(update
            .view
            .cart
            .triggers()
            .iter()
            .all(|t| t.generation == update.view.generation));
    }

    #[test]
    fn test_stale_trigger_is_dropped() {
        let mut store = storefront(None);
        let stale = click(&store, ActionKind::Add, Some(1));
        store.dispatch(Action::Add(pid(2)));

        let response = store.handle_pointer(&stale);
        assert!(response.update.is_none());
        assert_eq!(store.cart().quantity_of(pid(1)), 0);
    }

    #[test]
    fn test_pointer_click_adds_and_shows_feedback() {
        let mut store = storefront(None);
        let event = click(&store, ActionKind::Add, Some(3));
        let response = store.handle_pointer(&event);

        let update = response.update.unwrap();
        assert!(response.prevent_default);
        assert_eq!(store.cart().quantity_of(pid(3)), 1);
        assert_eq!(update.view.catalog.find_by_class("added").len(), 1);
        assert!(matches!(
            update.effects.as_slice(),
            [Effect::ResetAddedFeedback { after_ms: 1000, .. }]
        ));
    }

    #[test]
    fn test_add_ignored_while_feedback_showing() {
        let mut store = storefront(None);
        let first = click(&store, ActionKind::Add, Some(1));
        store.handle_pointer(&first);
        let again = click(&store, ActionKind::Add, Some(1));
        assert!(store.handle_pointer(&again).update.is_none());
        assert_eq!(store.cart().quantity_of(pid(1)), 1);
    }

    #[test]
    fn test_feedback_reset_is_token_guarded() {
        let mut store = storefront(None);
        let first = store.dispatch(Action::Add(pid(1)));
        let Effect::ResetAddedFeedback { token: old, .. } = first.effects[0] else {
            panic!("expected feedback effect");
        };
        let second = store.dispatch(Action::Add(pid(2)));
        let Effect::ResetAddedFeedback { token: new, .. } = second.effects[0] else {
            panic!("expected feedback effect");
        };

        assert!(store.reset_added_feedback(old).is_none());
        let update = store.reset_added_feedback(new).unwrap();
        assert!(update.view.catalog.find_by_class("added").is_empty());
        assert!(store.reset_added_feedback(new).is_none());
    }

    #[test]
    fn test_quantity_controls_via_pointer() {
        let mut store = storefront(None);
        store.dispatch(Action::Add(pid(2)));
        let inc = click(&store, ActionKind::Increase, Some(2));
        store.handle_pointer(&inc);
        assert_eq!(store.cart().quantity_of(pid(2)), 2);

        let dec = click(&store, ActionKind::Decrease, Some(2));
        store.handle_pointer(&dec);
        let dec = click(&store, ActionKind::Decrease, Some(2));
        store.handle_pointer(&dec);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_tap_spanning_rerender_does_nothing() {
        let mut store = Storefront::new(
            Arc::new(demo_catalog()),
            StorefrontConfig::default(),
            None,
            true,
        );
        store.render();
        store.dispatch(Action::Add(pid(1)));
        let old = Trigger::new(ActionKind::Increase, Some(pid(1)), store.generation());
        store.handle_pointer(&PointerEvent::touch_start(Some(old), 0.0, Point::new(1.0, 1.0)));

        // Timer fires mid-touch and re-renders
        store.dispatch(Action::Add(pid(2)));
        let new = Trigger::new(ActionKind::Increase, Some(pid(1)), store.generation());
        let response =
            store.handle_pointer(&PointerEvent::touch_end(Some(new), 60.0, Some(Point::new(1.0, 1.0))));

        assert!(response.update.is_none());
        assert_eq!(store.cart().quantity_of(pid(1)), 1);
    }

    #[test]
    fn test_approval_clears_after_confirmation() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(1)));

        let update = store.on_checkout_outcome(CheckoutOutcome::Approved(
            Approval::new("ORDER-9").with_payer("Grace"),
        ));
        let [Effect::ScheduleClear { token, after_ms }] = update.effects.as_slice() else {
            panic!("expected one clear effect");
        };
        assert_eq!(*after_ms, 3000);
        assert!(update.view.checkout.text_content().contains("Thank you, Grace!"));
        assert!(!store.cart().is_empty());

        let cleared = store.complete_confirmation(*token).unwrap();
        assert!(store.cart().is_empty());
        assert_eq!(store.panel(), &CheckoutPanel::Empty);
        assert_eq!(cleared.view.cart.text_content(), "Your cart is empty");

        // Repeated timer is a no-op
        assert!(store.complete_confirmation(*token).is_none());
    }

    #[test]
    fn test_duplicate_approval_keeps_first_confirmation() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(1)));
        store.on_checkout_outcome(CheckoutOutcome::Approved(Approval::new("A")));
        let again = store.on_checkout_outcome(CheckoutOutcome::Approved(Approval::new("B")));
        assert!(again.effects.is_empty());
        assert_eq!(
            store.panel(),
            &CheckoutPanel::Confirmed(Approval::new("A"))
        );
    }

    #[test]
    fn test_error_keeps_cart_and_offers_retry() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(1)));
        store.dispatch(Action::Add(pid(1)));

        let update = store.on_checkout_outcome(CheckoutOutcome::Failed {
            reason: "INSTRUMENT_DECLINED".into(),
        });
        assert_eq!(store.cart().quantity_of(pid(1)), 2);
        assert!(update.effects.is_empty());
        let retry = update.view.checkout.triggers();
        assert_eq!(retry.len(), 1);
        assert_eq!(retry[0].kind, ActionKind::RetryCheckout);

        let event = PointerEvent::click(Some(retry[0]), 0.0);
        let update = store.handle_pointer(&event).update.unwrap();
        assert!(update.view.mount.is_some());
        assert_eq!(store.cart().quantity_of(pid(1)), 2);
    }

    #[test]
    fn test_cancel_offers_retry() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(3)));
        let update = store.on_checkout_outcome(CheckoutOutcome::Cancelled);
        assert!(update
            .view
            .checkout
            .text_content()
            .contains("Payment was cancelled."));
        store.dispatch(Action::RetryCheckout);
        assert_eq!(store.panel().name(), "ready");
    }

    #[test]
    fn test_unavailable_delegate_falls_back_to_manual_order() {
        let mut store = storefront(Some(StubDelegate::broken()));
        let update = store.dispatch(Action::Add(pid(1)));
        assert_eq!(store.panel().name(), "fallback");
        assert!(update
            .view
            .checkout
            .text_content()
            .contains("Complete Order ($10.00)"));

        let update = store.dispatch(Action::CompleteOrder);
        assert!(store.cart().is_empty());
        assert!(update.view.notice.text_content().contains("$10.00"));
        assert_eq!(store.panel(), &CheckoutPanel::Empty);

        // Next mutation dismisses the notice
        store.dispatch(Action::Add(pid(2)));
        assert!(store.notice().is_none());
    }

    #[test]
    fn test_host_reported_widget_failure() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(2)));
        store.delegate_failed("paypal is not defined");
        assert_eq!(
            store.panel(),
            &CheckoutPanel::Fallback {
                label: "Stub Pay".into(),
                total: Price::from_cents(500)
            }
        );
    }

    #[test]
    fn test_complete_order_ignored_unless_fallback() {
        let mut store = storefront(Some(StubDelegate::working()));
        store.dispatch(Action::Add(pid(1)));
        store.dispatch(Action::CompleteOrder);
        assert_eq!(store.cart().quantity_of(pid(1)), 1);
    }

    #[test]
    fn test_toggle_cart_requests_scroll() {
        let mut store = storefront(None);
        let update = store.dispatch(Action::ToggleCart);
        assert_eq!(update.effects, vec![Effect::ScrollToCart]);
    }
}
