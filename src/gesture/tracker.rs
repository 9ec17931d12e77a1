//! The single-slot gesture state machine.
//!
//! ```text
//! Idle ──arm──▶ Armed ──activate──▶ Active ──commit──▶ (Committed) ─▶ Idle
//!   ▲             │                   │
//!   └──disarm─────┘                   └──cancel──▶ (Cancelled) ─▶ Idle
//! ```
//!
//! Every transition is keyed by the [`InputOwner`] that armed the gesture;
//! calls from any other owner are no-ops.

use super::state::{Gesture, GesturePhase, InputOwner};
use crate::domain::GestureConflict;

/// Holds at most one gesture and enforces the transition rules.
#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    phase: GesturePhase,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> &GesturePhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, GesturePhase::Idle)
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, GesturePhase::Active(_))
    }

    /// The gesture in the slot, armed or active.
    #[must_use]
    pub const fn current(&self) -> Option<&Gesture> {
        match &self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Armed(gesture) | GesturePhase::Active(gesture) => Some(gesture),
        }
    }

    /// The gesture in the slot, only if it is active.
    #[must_use]
    pub const fn active(&self) -> Option<&Gesture> {
        match &self.phase {
            GesturePhase::Active(gesture) => Some(gesture),
            _ => None,
        }
    }

    /// Returns `true` if `owner` holds the current gesture.
    #[must_use]
    pub fn is_owned_by(&self, owner: InputOwner) -> bool {
        self.current().is_some_and(|gesture| gesture.owner == owner)
    }

    /// Arms a new gesture.
    ///
    /// An armed gesture from another owner is replaced: it had not moved yet
    /// and was still indistinguishable from a click.
    ///
    /// # Errors
    ///
    /// Returns [`GestureConflict`] while another gesture is active. The
    /// tracker is left untouched.
    pub fn arm(&mut self, gesture: Gesture) -> Result<(), GestureConflict> {
        match &self.phase {
            GesturePhase::Active(active) => {
                tracing::debug!(
                    active_owner = ?active.owner,
                    rejected_owner = ?gesture.owner,
                    "gesture conflict, ignoring new gesture"
                );
                return Err(GestureConflict);
            }
            GesturePhase::Armed(armed) => {
                tracing::debug!(
                    previous_owner = ?armed.owner,
                    owner = ?gesture.owner,
                    "replacing armed gesture"
                );
            }
            GesturePhase::Idle => {}
        }

        tracing::debug!(
            owner = ?gesture.owner,
            source_index = gesture.source_index,
            source_id = %gesture.source_id,
            moving = gesture.selected_ids.len(),
            "gesture armed"
        );
        self.phase = GesturePhase::Armed(gesture);
        Ok(())
    }

    /// Promotes the armed gesture of `owner` to active.
    ///
    /// Returns `true` if the transition happened.
    pub fn activate(&mut self, owner: InputOwner) -> bool {
        match std::mem::take(&mut self.phase) {
            GesturePhase::Armed(gesture) if gesture.owner == owner => {
                tracing::debug!(owner = ?owner, source_index = gesture.source_index, "gesture active");
                self.phase = GesturePhase::Active(gesture);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Updates the drop candidate of the active gesture of `owner`.
    ///
    /// Returns `true` only if the hover index actually changed, so callers can
    /// skip redundant re-renders.
    pub fn update_hover(&mut self, owner: InputOwner, hover_index: Option<usize>) -> bool {
        let GesturePhase::Active(gesture) = &mut self.phase else {
            return false;
        };
        if gesture.owner != owner || gesture.hover_index == hover_index {
            return false;
        }

        tracing::trace!(owner = ?owner, from = ?gesture.hover_index, to = ?hover_index, "hover changed");
        gesture.hover_index = hover_index;
        true
    }

    /// Ends the active gesture of `owner` as committed and hands it over.
    ///
    /// The gesture leaves the tracker exactly once.
    pub fn commit(&mut self, owner: InputOwner) -> Option<Gesture> {
        match std::mem::take(&mut self.phase) {
            GesturePhase::Active(gesture) if gesture.owner == owner => {
                tracing::debug!(owner = ?owner, hover_index = ?gesture.hover_index, "gesture committed");
                Some(gesture)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Drops an armed gesture of `owner` that never became active (a click).
    pub fn disarm(&mut self, owner: InputOwner) -> Option<Gesture> {
        match std::mem::take(&mut self.phase) {
            GesturePhase::Armed(gesture) if gesture.owner == owner => {
                tracing::trace!(owner = ?owner, "gesture disarmed");
                Some(gesture)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// Cancels the gesture of `owner`, armed or active.
    pub fn cancel(&mut self, owner: InputOwner) -> Option<Gesture> {
        if !self.is_owned_by(owner) {
            return None;
        }
        self.cancel_any()
    }

    /// Cancels whatever gesture is in the slot (Escape, source item removed).
    pub fn cancel_any(&mut self) -> Option<Gesture> {
        match std::mem::take(&mut self.phase) {
            GesturePhase::Idle => None,
            GesturePhase::Armed(gesture) | GesturePhase::Active(gesture) => {
                tracing::debug!(owner = ?gesture.owner, "gesture cancelled");
                Some(gesture)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;

    fn gesture(owner: InputOwner, source: usize) -> Gesture {
        Gesture::single(owner, source, ItemId::new(format!("item-{source}")))
    }

    #[test]
    fn full_lifecycle_hands_gesture_over_once() {
        let mut tracker = GestureTracker::new();
        let owner = InputOwner::Pointer(1);

        tracker.arm(gesture(owner, 0)).unwrap();
        assert!(!tracker.is_active());
        assert!(tracker.activate(owner));
        assert!(tracker.update_hover(owner, Some(2)));

        let committed = tracker.commit(owner).unwrap();
        assert_eq!(committed.hover_index, Some(2));
        assert!(tracker.is_idle());
        assert!(tracker.commit(owner).is_none());
    }

    #[test]
    fn second_gesture_is_refused_while_active() {
        let mut tracker = GestureTracker::new();
        let first = InputOwner::Pointer(1);
        let second = InputOwner::Touch(7);

        tracker.arm(gesture(first, 0)).unwrap();
        tracker.activate(first);
        assert_eq!(tracker.arm(gesture(second, 3)), Err(GestureConflict));

        assert!(!tracker.update_hover(second, Some(1)));
        assert!(tracker.commit(second).is_none());
        assert!(tracker.update_hover(first, Some(1)));
        assert_eq!(tracker.commit(first).map(|g| g.source_index), Some(0));
    }

    #[test]
    fn armed_gesture_is_replaced_by_newer_one() {
        let mut tracker = GestureTracker::new();
        tracker.arm(gesture(InputOwner::Pointer(1), 0)).unwrap();
        tracker.arm(gesture(InputOwner::Pointer(2), 1)).unwrap();

        assert!(!tracker.activate(InputOwner::Pointer(1)));
        assert!(tracker.activate(InputOwner::Pointer(2)));
    }

    #[test]
    fn redundant_hover_updates_are_suppressed() {
        let mut tracker = GestureTracker::new();
        let owner = InputOwner::Keyboard;
        tracker.arm(gesture(owner, 1)).unwrap();
        tracker.activate(owner);

        assert!(tracker.update_hover(owner, Some(1)));
        assert!(!tracker.update_hover(owner, Some(1)));
        assert!(tracker.update_hover(owner, None));
    }

    #[test]
    fn cancel_respects_ownership() {
        let mut tracker = GestureTracker::new();
        let owner = InputOwner::Touch(3);
        tracker.arm(gesture(owner, 0)).unwrap();
        tracker.activate(owner);

        assert!(tracker.cancel(InputOwner::Touch(4)).is_none());
        assert!(tracker.cancel(owner).is_some());
        assert!(tracker.is_idle());
    }

    #[test]
    fn disarm_only_applies_to_armed_gestures() {
        let mut tracker = GestureTracker::new();
        let owner = InputOwner::Pointer(1);
        tracker.arm(gesture(owner, 0)).unwrap();
        tracker.activate(owner);
        assert!(tracker.disarm(owner).is_none());
        assert!(tracker.is_active());
    }
}
