//! Pointer and touch adapter.
//!
//! Both device families share one flow:
//!
//! 1. press on a row arms a gesture at that row's current index
//! 2. motion past the device's threshold activates it; every later motion is
//!    hit-tested against the latest row layout
//! 3. release commits on a row, cancels outside every row, or is a plain
//!    click if the gesture never activated
//!
//! Touch gets a larger threshold than a mouse so that taps and scrolls are not
//! mistaken for drags. A touch interrupted by the system (an edge swipe, an
//! incoming call) cancels through [`PointerAdapter::interrupt`].

use super::{AdapterOutcome, InputContext};
use crate::domain::ItemId;
use crate::gesture::{Gesture, GestureTracker, InputOwner, Point};

/// Default movement, in view units, before a mouse press becomes a drag.
pub const DEFAULT_POINTER_THRESHOLD: f64 = 4.0;

/// Default movement, in view units, before a touch becomes a drag.
pub const DEFAULT_TOUCH_THRESHOLD: f64 = 10.0;

/// Translates pointer and touch events into gesture transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerAdapter {
    pointer_threshold: f64,
    touch_threshold: f64,
}

impl Default for PointerAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_POINTER_THRESHOLD, DEFAULT_TOUCH_THRESHOLD)
    }
}

impl PointerAdapter {
    /// Negative or non-finite thresholds are treated as zero.
    #[must_use]
    pub fn new(pointer_threshold: f64, touch_threshold: f64) -> Self {
        let sanitize = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };
        Self {
            pointer_threshold: sanitize(pointer_threshold),
            touch_threshold: sanitize(touch_threshold),
        }
    }

    #[must_use]
    pub const fn threshold(&self, owner: InputOwner) -> f64 {
        match owner {
            InputOwner::Pointer(_) => self.pointer_threshold,
            InputOwner::Touch(_) => self.touch_threshold,
            InputOwner::Keyboard => 0.0,
        }
    }

    /// Pointer-down or touch-start over the row of `item`.
    pub fn press(
        &self,
        tracker: &mut GestureTracker,
        ctx: &InputContext<'_>,
        owner: InputOwner,
        item: &ItemId,
        at: Point,
    ) -> AdapterOutcome {
        let Some(source_index) = ctx.collection.index_of(item) else {
            tracing::debug!(item = %item, "press on unknown item ignored");
            return AdapterOutcome::Ignored;
        };

        let gesture = Gesture::single(owner, source_index, item.clone())
            .with_selection(ctx.moving_ids(item))
            .with_origin(at);

        match tracker.arm(gesture) {
            Ok(()) => AdapterOutcome::Armed,
            Err(_) => AdapterOutcome::Conflict,
        }
    }

    /// Pointer or touch movement.
    pub fn motion(
        &self,
        tracker: &mut GestureTracker,
        ctx: &InputContext<'_>,
        owner: InputOwner,
        at: Point,
    ) -> AdapterOutcome {
        let Some(gesture) = tracker.current().filter(|gesture| gesture.owner == owner) else {
            return AdapterOutcome::Ignored;
        };

        if !tracker.is_active() {
            let travelled = gesture.origin.map_or(0.0, |origin| origin.distance(at));
            if travelled < self.threshold(owner) {
                return AdapterOutcome::Unchanged;
            }
            tracker.activate(owner);
            tracker.update_hover(owner, Self::resolve_hover(ctx, at));
            return AdapterOutcome::Activated;
        }

        if tracker.update_hover(owner, Self::resolve_hover(ctx, at)) {
            AdapterOutcome::HoverChanged
        } else {
            AdapterOutcome::Unchanged
        }
    }

    /// Pointer-up or touch-end.
    pub fn release(
        &self,
        tracker: &mut GestureTracker,
        ctx: &InputContext<'_>,
        owner: InputOwner,
        at: Point,
    ) -> AdapterOutcome {
        if let Some(gesture) = tracker.disarm(owner) {
            return AdapterOutcome::Clicked(gesture);
        }

        tracker.update_hover(owner, Self::resolve_hover(ctx, at));
        match tracker.commit(owner) {
            Some(gesture) if gesture.hover_index.is_some() => AdapterOutcome::Commit(gesture),
            Some(gesture) => {
                tracing::debug!(owner = ?owner, "released outside every drop target");
                AdapterOutcome::Cancelled(gesture)
            }
            None => AdapterOutcome::Ignored,
        }
    }

    /// The device lost the gesture (pointer capture lost, touch cancelled).
    pub fn interrupt(&self, tracker: &mut GestureTracker, owner: InputOwner) -> AdapterOutcome {
        tracker
            .cancel(owner)
            .map_or(AdapterOutcome::Ignored, AdapterOutcome::Cancelled)
    }

    /// Hit-tests `at` and maps the row to its index in the current order.
    fn resolve_hover(ctx: &InputContext<'_>, at: Point) -> Option<usize> {
        ctx.layout
            .hit_test(at.y)
            .and_then(|id| ctx.collection.index_of(id))
    }
}
