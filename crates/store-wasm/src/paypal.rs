//! Bridge to `window.paypal.Buttons`.
//!
//! ```text
//! paypal.Buttons({ createOrder, onApprove, onError, onCancel, style })
//!       .render('#paypal-buttons')
//! ```

use crate::app::App;
use crate::dom;
use js_sys::{Function, Object, Promise, Reflect};
use serde::Serialize;
use std::rc::Rc;
use store_core::{CheckoutOutcome, DelegateMount};
use store_paypal::{outcome_from_capture, outcome_from_error};
use tracing::info;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};

/// Callback sets kept alive: the current buttons and the previous ones, in
/// case a popup opened from them is still completing
const KEEP_CALLBACKS: usize = 2;

pub(crate) struct Callbacks {
    _create_order: Closure<dyn FnMut(JsValue, JsValue) -> JsValue>,
    _on_approve: Closure<dyn FnMut(JsValue, JsValue) -> JsValue>,
    _on_error: Closure<dyn FnMut(JsValue)>,
    _on_cancel: Closure<dyn FnMut(JsValue)>,
}

fn key(name: &str) -> JsValue {
    JsValue::from_str(name)
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

/// `target[object][method](arg)`, e.g. `actions.order.capture()`
fn invoke(
    target: &JsValue,
    object: &str,
    method: &str,
    arg: Option<&JsValue>,
) -> Result<JsValue, JsValue> {
    let object = Reflect::get(target, &key(object))?;
    let function: Function = Reflect::get(&object, &key(method))?.dyn_into()?;
    match arg {
        Some(arg) => function.call1(&object, arg),
        None => function.call0(&object),
    }
}

async fn capture(actions: JsValue) -> CheckoutOutcome {
    let promise = match invoke(&actions, "order", "capture", None)
        .and_then(|p| p.dyn_into::<Promise>())
    {
        Ok(promise) => promise,
        Err(err) => return outcome_from_error(dom::describe(&err)),
    };

    match JsFuture::from(promise).await {
        Ok(details) => match serde_wasm_bindgen::from_value::<serde_json::Value>(details) {
            Ok(details) => outcome_from_capture(&details),
            Err(e) => outcome_from_error(format!("unreadable capture details: {}", e)),
        },
        Err(err) => outcome_from_error(dom::describe(&err)),
    }
}

/// Render the buttons into the mount's container. A synchronous error means
/// the SDK is missing or threw; a rejected render reports through
/// [`App::delegate_failed`].
pub(crate) fn render_buttons(app: &Rc<App>, mount: &DelegateMount) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| key("no window"))?;
    let paypal = Reflect::get(&window, &key("paypal"))?;
    if paypal.is_undefined() || paypal.is_null() {
        return Err(key("paypal is not defined"));
    }
    let buttons_fn: Function = Reflect::get(&paypal, &key("Buttons"))?.dyn_into()?;

    let order = to_js(&mount.options["order"])?;
    let style = to_js(&mount.options["style"])?;

    let create_order = Closure::<dyn FnMut(JsValue, JsValue) -> JsValue>::new(
        move |_data: JsValue, actions: JsValue| {
            invoke(&actions, "order", "create", Some(&order))
                .unwrap_or_else(|err| wasm_bindgen::throw_val(err))
        },
    );

    let approve_app = Rc::clone(app);
    let on_approve = Closure::<dyn FnMut(JsValue, JsValue) -> JsValue>::new(
        move |_data: JsValue, actions: JsValue| {
            let app = Rc::clone(&approve_app);
            future_to_promise(async move {
                let outcome = capture(actions).await;
                if let CheckoutOutcome::Approved(approval) = &outcome {
                    info!(order_id = %approval.order_id, "transaction captured");
                }
                app.outcome(outcome);
                Ok(JsValue::UNDEFINED)
            })
            .into()
        },
    );

    let error_app = Rc::clone(app);
    let on_error = Closure::<dyn FnMut(JsValue)>::new(move |err: JsValue| {
        let reason = dom::describe(&err);
        dom::warn(&format!("PayPal error: {}", reason));
        error_app.outcome(outcome_from_error(reason));
    });

    let cancel_app = Rc::clone(app);
    let on_cancel = Closure::<dyn FnMut(JsValue)>::new(move |_data: JsValue| {
        cancel_app.outcome(CheckoutOutcome::Cancelled);
    });

    let options = Object::new();
    Reflect::set(&options, &key("createOrder"), create_order.as_ref())?;
    Reflect::set(&options, &key("onApprove"), on_approve.as_ref())?;
    Reflect::set(&options, &key("onError"), on_error.as_ref())?;
    Reflect::set(&options, &key("onCancel"), on_cancel.as_ref())?;
    Reflect::set(&options, &key("style"), &style)?;

    let buttons = buttons_fn.call1(&paypal, &options)?;
    let render: Function = Reflect::get(&buttons, &key("render"))?.dyn_into()?;
    let rendered = render.call1(&buttons, &key(&dom::selector(&mount.container_id)))?;

    {
        let mut callbacks = app.sdk_callbacks.borrow_mut();
        callbacks.push(Callbacks {
            _create_order: create_order,
            _on_approve: on_approve,
            _on_error: on_error,
            _on_cancel: on_cancel,
        });
        dom::retain_recent(&mut callbacks, KEEP_CALLBACKS);
    }

    let serial = app.mount_serial.get() + 1;
    app.mount_serial.set(serial);

    if let Ok(promise) = rendered.dyn_into::<Promise>() {
        let app = Rc::clone(app);
        spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                if app.mount_serial.get() == serial {
                    app.delegate_failed(&dom::describe(&err));
                }
            }
        });
    }
    Ok(())
}
