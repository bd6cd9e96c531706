//! # Interaction Layer
//!
//! Turns raw pointer and touch events into at most one logical activation per
//! user action.
//!
//! Devices can report the same press twice: a touch sequence followed by a
//! synthesized mouse click. The classifier keeps the touch path and drops the
//! click once the platform has signaled touch capability. A touch sequence is
//! a tap only when it is short, stays on one trigger and does not travel far
//! enough to be a scroll.
//!
//! ```text
//! touchstart(t=0, trigger A) ─┐
//! touchmove (t=80, +3px)      ├─► tap on A ──► activation(A)
//! touchend  (t=140, trigger A)┘
//! click     (t=160, trigger A) ──► ignored (touch-capable)
//! ```

use crate::config::StorefrontConfig;
use crate::error::{StoreError, StoreResult};
use crate::product::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// What a rendered trigger does, from its `data-action` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Add,
    Increase,
    Decrease,
    Remove,
    RetryCheckout,
    CompleteOrder,
    ToggleCart,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Add => "add",
            ActionKind::Increase => "increase",
            ActionKind::Decrease => "decrease",
            ActionKind::Remove => "remove",
            ActionKind::RetryCheckout => "retry-checkout",
            ActionKind::CompleteOrder => "complete-order",
            ActionKind::ToggleCart => "toggle-cart",
        }
    }

    /// Cart actions target one product; checkout and navigation actions do not
    pub fn needs_product(&self) -> bool {
        matches!(
            self,
            ActionKind::Add | ActionKind::Increase | ActionKind::Decrease | ActionKind::Remove
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(ActionKind::Add),
            "increase" => Ok(ActionKind::Increase),
            "decrease" => Ok(ActionKind::Decrease),
            "remove" => Ok(ActionKind::Remove),
            "retry-checkout" => Ok(ActionKind::RetryCheckout),
            "complete-order" => Ok(ActionKind::CompleteOrder),
            "toggle-cart" => Ok(ActionKind::ToggleCart),
            other => Err(StoreError::InvalidTrigger(format!("unknown action {:?}", other))),
        }
    }
}

/// A logical user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add(ProductId),
    Increase(ProductId),
    Decrease(ProductId),
    Remove(ProductId),
    RetryCheckout,
    CompleteOrder,
    ToggleCart,
}

/// An interactive element as rendered: action, product and render generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trigger {
    pub kind: ActionKind,
    pub product_id: Option<ProductId>,
    pub generation: u64,
}

impl Trigger {
    pub fn new(kind: ActionKind, product_id: Option<ProductId>, generation: u64) -> Self {
        Self {
            kind,
            product_id,
            generation,
        }
    }

    /// Parse the `data-action`, `data-product-id` and `data-gen` attributes
    pub fn parse(
        action: Option<&str>,
        product_id: Option<&str>,
        generation: Option<&str>,
    ) -> StoreResult<Self> {
        let kind: ActionKind = action
            .ok_or_else(|| StoreError::InvalidTrigger("missing data-action".into()))?
            .parse()?;

        let product_id = match product_id {
            Some(raw) => Some(raw.parse::<ProductId>()?),
            None => None,
        };
        if kind.needs_product() && product_id.is_none() {
            return Err(StoreError::InvalidTrigger(format!(
                "{} trigger without product id",
                kind
            )));
        }

        let generation = generation
            .ok_or_else(|| StoreError::InvalidTrigger("missing data-gen".into()))?
            .parse::<u64>()
            .map_err(|e| StoreError::InvalidTrigger(format!("bad data-gen: {}", e)))?;

        Ok(Self::new(kind, product_id, generation))
    }

    /// The logical action this trigger performs
    pub fn action(&self) -> Option<Action> {
        let action = match (self.kind, self.product_id) {
            (ActionKind::Add, Some(id)) => Action::Add(id),
            (ActionKind::Increase, Some(id)) => Action::Increase(id),
            (ActionKind::Decrease, Some(id)) => Action::Decrease(id),
            (ActionKind::Remove, Some(id)) => Action::Remove(id),
            (ActionKind::RetryCheckout, _) => Action::RetryCheckout,
            (ActionKind::CompleteOrder, _) => Action::CompleteOrder,
            (ActionKind::ToggleCart, _) => Action::ToggleCart,
            _ => return None,
        };
        Some(action)
    }
}

/// Raw event types the host forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Click,
    TouchStart,
    TouchMove,
    TouchEnd,
}

impl FromStr for PointerKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(PointerKind::Click),
            "touchstart" => Ok(PointerKind::TouchStart),
            "touchmove" => Ok(PointerKind::TouchMove),
            "touchend" => Ok(PointerKind::TouchEnd),
            other => Err(StoreError::InvalidTrigger(format!("unknown event type {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A raw pointer event, decoupled from any device API
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Trigger under the pointer, if any
    pub trigger: Option<Trigger>,
    /// Event timestamp in milliseconds
    pub timestamp_ms: f64,
    pub position: Option<Point>,
}

impl PointerEvent {
    pub fn click(trigger: Option<Trigger>, timestamp_ms: f64) -> Self {
        Self {
            kind: PointerKind::Click,
            trigger,
            timestamp_ms,
            position: None,
        }
    }

    pub fn touch_start(trigger: Option<Trigger>, timestamp_ms: f64, position: Point) -> Self {
        Self {
            kind: PointerKind::TouchStart,
            trigger,
            timestamp_ms,
            position: Some(position),
        }
    }

    pub fn touch_move(timestamp_ms: f64, position: Option<Point>) -> Self {
        Self {
            kind: PointerKind::TouchMove,
            trigger: None,
            timestamp_ms,
            position,
        }
    }

    pub fn touch_end(trigger: Option<Trigger>, timestamp_ms: f64, position: Option<Point>) -> Self {
        Self {
            kind: PointerKind::TouchEnd,
            trigger,
            timestamp_ms,
            position,
        }
    }
}

/// Result of classifying one raw event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    /// The trigger to activate, at most one per logical action
    pub activation: Option<Trigger>,
    /// Host should call `preventDefault()` on the raw event
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Copy)]
struct PendingTap {
    trigger: Trigger,
    started_ms: f64,
    origin: Option<Point>,
    moved: bool,
}

/// Stateful tap / click de-duplication
#[derive(Debug, Clone)]
pub struct InputClassifier {
    touch_capable: bool,
    tap_max_duration_ms: f64,
    tap_move_tolerance_px: f64,
    double_tap_window_ms: f64,
    pending: Option<PendingTap>,
    last_touch_end_ms: Option<f64>,
}

impl InputClassifier {
    pub fn new(config: &StorefrontConfig, touch_capable: bool) -> Self {
        Self {
            touch_capable,
            tap_max_duration_ms: config.tap_max_duration_ms,
            tap_move_tolerance_px: config.tap_move_tolerance_px,
            double_tap_window_ms: config.double_tap_window_ms,
            pending: None,
            last_touch_end_ms: None,
        }
    }

    pub fn is_touch_capable(&self) -> bool {
        self.touch_capable
    }

    /// Classify one raw event
    pub fn classify(&mut self, event: &PointerEvent) -> Classification {
        match event.kind {
            PointerKind::Click => self.on_click(event),
            PointerKind::TouchStart => {
                // A touch is the platform signaling touch capability
                self.touch_capable = true;
                self.pending = event.trigger.map(|trigger| PendingTap {
                    trigger,
                    started_ms: event.timestamp_ms,
                    origin: event.position,
                    moved: false,
                });
                Classification::default()
            }
            PointerKind::TouchMove => {
                if let Some(pending) = self.pending.as_mut() {
                    if Self::travelled(pending.origin, event.position, self.tap_move_tolerance_px) {
                        pending.moved = true;
                    }
                }
                Classification::default()
            }
            PointerKind::TouchEnd => self.on_touch_end(event),
        }
    }

    fn on_click(&self, event: &PointerEvent) -> Classification {
        if self.touch_capable {
            trace!("click ignored on touch-capable platform");
            return Classification::default();
        }
        Classification {
            activation: event.trigger,
            prevent_default: event.trigger.is_some(),
        }
    }

    fn on_touch_end(&mut self, event: &PointerEvent) -> Classification {
        let double_tap = self
            .last_touch_end_ms
            .map(|last| event.timestamp_ms - last <= self.double_tap_window_ms)
            .unwrap_or(false);
        self.last_touch_end_ms = Some(event.timestamp_ms);

        let activation = self.pending.take().and_then(|pending| {
            let same_trigger = event.trigger == Some(pending.trigger);
            let quick = event.timestamp_ms - pending.started_ms < self.tap_max_duration_ms;
            let moved = pending.moved
                || (event.position.is_some()
                    && Self::travelled(pending.origin, event.position, self.tap_move_tolerance_px));

            if same_trigger && quick && !moved {
                Some(pending.trigger)
            } else {
                trace!(same_trigger, quick, moved, "touch sequence is not a tap");
                None
            }
        });

        Classification {
            activation,
            prevent_default: event.trigger.is_some() || double_tap,
        }
    }

    /// Movement beyond tolerance. A move without a known position counts.
    fn travelled(origin: Option<Point>, position: Option<Point>, tolerance: f64) -> bool {
        match (origin, position) {
            (Some(origin), Some(position)) => origin.distance(position) > tolerance,
            _ => true,
        }
    }
}
