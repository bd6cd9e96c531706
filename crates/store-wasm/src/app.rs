//! Browser host for the storefront controller.
//!
//! Owns the [`Storefront`], forwards document-level pointer events to it and
//! writes every rendered view back into the page containers. Store borrows
//! are released before any view is applied, so callbacks fired while
//! applying (SDK errors, timers) can re-enter.

use crate::dom::{self, RenderedCheckout};
use crate::paypal::{self, Callbacks};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use store_core::{containers, CheckoutOutcome, Effect, PointerEvent, PointerKind, Storefront, Update};
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

pub(crate) struct App {
    store: RefCell<Storefront>,
    document: Document,
    rendered_checkout: RefCell<Option<RenderedCheckout>>,
    listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
    pub(crate) sdk_callbacks: RefCell<Vec<Callbacks>>,
    /// Bumped on every buttons render; late SDK failures for older renders are ignored
    pub(crate) mount_serial: Cell<u64>,
}

impl App {
    pub(crate) fn new(store: Storefront, document: Document) -> Self {
        Self {
            store: RefCell::new(store),
            document,
            rendered_checkout: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            sdk_callbacks: RefCell::new(Vec::new()),
            mount_serial: Cell::new(0),
        }
    }

    pub(crate) fn store(&self) -> std::cell::Ref<'_, Storefront> {
        self.store.borrow()
    }

    /// Attach listeners and paint the first view
    pub(crate) fn mount(self: &Rc<Self>) -> Result<(), JsValue> {
        if !self.listeners.borrow().is_empty() {
            debug!("storefront already mounted");
            return Ok(());
        }

        for name in dom::POINTER_EVENTS {
            let app = Rc::clone(self);
            let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| app.on_event(event));
            self.document
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
            self.listeners.borrow_mut().push(listener);
        }

        let view = self.store.borrow_mut().render();
        self.apply(Update {
            view,
            effects: Vec::new(),
        });
        Ok(())
    }

    fn on_event(self: &Rc<Self>, event: Event) {
        let Ok(kind) = event.type_().parse::<PointerKind>() else {
            return;
        };
        let position = dom::touch_position(&event);

        // A touchend targets the element the touch started on; the trigger
        // under the finger is what decides the tap
        let target = match (kind, position) {
            (PointerKind::TouchEnd, Some(p)) => {
                self.document.element_from_point(p.x as f32, p.y as f32)
            }
            _ => event.target().and_then(|t| t.dyn_into::<Element>().ok()),
        };

        let pointer = PointerEvent {
            kind,
            trigger: target.as_ref().and_then(dom::trigger_of),
            timestamp_ms: event.time_stamp(),
            position,
        };

        let response = self.store.borrow_mut().handle_pointer(&pointer);
        if response.prevent_default {
            event.prevent_default();
        }
        if let Some(update) = response.update {
            self.apply(update);
        }
    }

    /// Programmatic add, same path as a tap on the product card
    pub(crate) fn dispatch(self: &Rc<Self>, action: store_core::Action) {
        let update = self.store.borrow_mut().dispatch(action);
        self.apply(update);
    }

    pub(crate) fn outcome(self: &Rc<Self>, outcome: CheckoutOutcome) {
        let update = self.store.borrow_mut().on_checkout_outcome(outcome);
        self.apply(update);
    }

    pub(crate) fn delegate_failed(self: &Rc<Self>, reason: &str) {
        dom::warn(&format!("PayPal rendering error: {}", reason));
        let update = self.store.borrow_mut().delegate_failed(reason);
        self.apply(update);
    }

    fn apply(self: &Rc<Self>, update: Update) {
        let view = update.view;
        self.set_html(containers::CART_TOGGLE, &view.toggle.to_html());
        self.set_html(containers::CATALOG, &view.catalog.to_html());
        self.set_html(containers::CART_ITEMS, &view.cart.to_html());
        self.set_text(containers::CART_TOTAL, &view.summary.total);
        self.set_html(containers::NOTICE, &view.notice.to_html());

        let checkout = RenderedCheckout {
            html: view.checkout.to_html(),
            mount: view.mount,
        };
        let refresh = dom::needs_refresh(self.rendered_checkout.borrow().as_ref(), &checkout);
        if refresh {
            self.set_html(containers::CHECKOUT, &checkout.html);
            let mount = checkout.mount.clone();
            *self.rendered_checkout.borrow_mut() = Some(checkout);

            if let Some(mount) = mount {
                if let Err(err) = paypal::render_buttons(self, &mount) {
                    self.delegate_failed(&dom::describe(&err));
                }
            }
        }

        for effect in update.effects {
            self.run(effect);
        }
    }

    fn run(self: &Rc<Self>, effect: Effect) {
        match effect {
            Effect::ScheduleClear { token, after_ms } => self.after(after_ms, move |app| {
                let update = app.store.borrow_mut().complete_confirmation(token);
                if let Some(update) = update {
                    app.apply(update);
                }
            }),
            Effect::ResetAddedFeedback { token, after_ms } => self.after(after_ms, move |app| {
                let update = app.store.borrow_mut().reset_added_feedback(token);
                if let Some(update) = update {
                    app.apply(update);
                }
            }),
            Effect::ScrollToCart => {
                if let Some(section) = self.document.get_element_by_id(containers::CART_SECTION) {
                    section.scroll_into_view();
                }
            }
        }
    }

    fn after(self: &Rc<Self>, ms: u32, f: impl FnOnce(&Rc<App>) + 'static) {
        let app = Rc::clone(self);
        let callback = Closure::once_into_js(move || f(&app));
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    dom::timeout_ms(ms),
                )
            });
        if let Err(err) = scheduled {
            dom::warn(&format!("timer not scheduled: {}", dom::describe(&err)));
        }
    }

    fn set_html(&self, id: &str, html: &str) {
        match self.document.get_element_by_id(id) {
            Some(el) => el.set_inner_html(html),
            None => debug!(id, "container missing"),
        }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}
