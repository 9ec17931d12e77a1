//! Input adapters: translate raw device input into gesture transitions.
//!
//! - [`pointer`]: mouse/pen and touch, with movement thresholds and hit-testing
//! - [`keyboard`]: single-keystroke moves and the grab/step/drop mode
//! - [`layout`]: rendered row geometry used for hit-testing
//!
//! Adapters never touch the collection. They move the shared
//! [`GestureTracker`](crate::gesture::GestureTracker) through its states and
//! report what happened as an [`AdapterOutcome`]; the application handler
//! turns a committed gesture into a reorder.

pub mod keyboard;
pub mod layout;
pub mod pointer;

pub use keyboard::{Direction, KeyboardAdapter};
pub use layout::{RowBounds, RowLayout};
pub use pointer::PointerAdapter;

use crate::domain::{ItemId, OrderedCollection};
use crate::gesture::Gesture;
use crate::selection::SelectionSet;

/// Read-only view of the state an adapter needs to interpret input.
#[derive(Debug, Clone, Copy)]
pub struct InputContext<'a> {
    pub collection: &'a OrderedCollection,
    pub layout: &'a RowLayout,
    pub selection: &'a SelectionSet,
}

impl InputContext<'_> {
    /// Ids that move together when `id` is grabbed: the whole selection if
    /// `id` belongs to a multi-item selection, otherwise just `id`.
    #[must_use]
    pub fn moving_ids(&self, id: &ItemId) -> Vec<ItemId> {
        if self.selection.len() > 1 && self.selection.contains(id) {
            self.selection.ordered_ids(self.collection)
        } else {
            vec![id.clone()]
        }
    }

    /// Number of unselected items in front of the first moving item: the
    /// block's position in the sequence with the block removed.
    #[must_use]
    pub fn block_position(&self, moving: &[ItemId]) -> usize {
        self.collection
            .ids()
            .iter()
            .take_while(|id| !moving.contains(*id))
            .count()
    }
}

/// Result of feeding one input event to an adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutcome {
    /// The event did not concern the current gesture.
    Ignored,
    /// Starting a gesture was refused because another one is active.
    Conflict,
    /// A gesture was armed; it may still turn out to be a click.
    Armed,
    /// The armed gesture crossed its threshold and is now reordering.
    Activated,
    /// The drop candidate moved.
    HoverChanged,
    /// The event was valid but changed nothing (below threshold, same row).
    Unchanged,
    /// A keyboard move or step hit the start or end of the list.
    AtBoundary,
    /// The gesture ended without ever activating.
    Clicked(Gesture),
    /// The gesture completed; the handler must apply it.
    Commit(Gesture),
    /// The gesture ended without a reorder.
    Cancelled(Gesture),
}

impl AdapterOutcome {
    /// Returns `true` if the view needs to re-render after this outcome.
    #[must_use]
    pub const fn needs_render(&self) -> bool {
        matches!(
            self,
            Self::Activated | Self::HoverChanged | Self::Commit(_) | Self::Cancelled(_)
        )
    }
}
