//! Application state and view model computation.
//!
//! [`AppState`] is the single owner of everything the engine tracks for one
//! list: the collection, the gesture, the selection, the focused item, the
//! latest row layout and the pending-save bookkeeping. It is mutated only by
//! [`handle_event`](crate::app::handle_event).

use crate::domain::{Generation, ItemId, OrderedCollection};
use crate::gesture::{Gesture, GestureTracker, Modality};
use crate::input::{KeyboardAdapter, PointerAdapter, RowLayout};
use crate::persistence::PersistenceCoordinator;
use crate::selection::SelectionSet;
use crate::ui::{ListViewModel, RowViewModel};
use crate::Config;
use std::cmp::Ordering;

/// Central state container for one sortable list.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current order. Replaced only by a committed gesture, a rollback or an
    /// order loaded from the store.
    pub collection: OrderedCollection,

    /// The one gesture slot shared by every input modality.
    pub tracker: GestureTracker,

    /// Items picked for multi-item moves.
    pub selection: SelectionSet,

    /// Item with keyboard focus.
    pub focus: Option<ItemId>,

    /// Row geometry from the last render, used for hit-testing.
    pub layout: RowLayout,

    pub coordinator: PersistenceCoordinator,

    pub(crate) pointer: PointerAdapter,
    pub(crate) keyboard: KeyboardAdapter,
}

impl AppState {
    /// Creates state for `collection`, which is treated as the stored order
    /// until the store says otherwise.
    #[must_use]
    pub fn new(collection: OrderedCollection, config: &Config) -> Self {
        let coordinator = PersistenceCoordinator::new(&collection, Generation::ZERO);
        Self {
            collection,
            tracker: GestureTracker::new(),
            selection: SelectionSet::new(),
            focus: None,
            layout: RowLayout::default(),
            coordinator,
            pointer: PointerAdapter::new(config.pointer_drag_threshold, config.touch_drag_threshold),
            keyboard: KeyboardAdapter,
        }
    }

    /// Replaces the row layout.
    #[must_use]
    pub fn with_layout(mut self, layout: RowLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Builds the view model for the current state.
    ///
    /// Drag highlighting is only present while a gesture is Active.
    #[must_use]
    pub fn compute_viewmodel(&self) -> ListViewModel {
        let active = self.tracker.active();
        let drop_target = active.and_then(|gesture| self.drop_row(gesture));

        let rows = self
            .collection
            .iter()
            .enumerate()
            .map(|(index, item)| RowViewModel {
                id: item.id.clone(),
                label: item.label.clone(),
                is_dragging: active.is_some_and(|gesture| gesture.selected_ids.contains(&item.id)),
                is_drop_target: drop_target == Some(index),
                is_selected: self.selection.contains(&item.id),
                is_focused: self.focus.as_ref() == Some(&item.id),
            })
            .collect();

        ListViewModel {
            rows,
            focused_index: self.focus.as_ref().and_then(|id| self.collection.index_of(id)),
            is_reordering: active.is_some(),
            save_in_flight: self.coordinator.pending().is_some(),
        }
    }

    /// Row to mark as the drop target for `gesture`.
    ///
    /// Keyboard block moves count positions among the unselected rows only,
    /// so the position is mapped back to the row the block lands next to.
    fn drop_row(&self, gesture: &Gesture) -> Option<usize> {
        let hover = gesture.hover_index?;
        if gesture.modality() != Modality::Keyboard || !gesture.is_multi() {
            return Some(hover);
        }

        let ids = self.collection.ids();
        let lead = ids.iter().position(|id| gesture.selected_ids.contains(id))?;
        let rest: Vec<usize> = (0..ids.len())
            .filter(|&index| !gesture.selected_ids.contains(&ids[index]))
            .collect();

        match hover.cmp(&lead) {
            Ordering::Equal => Some(lead),
            Ordering::Less => rest.get(hover).copied(),
            Ordering::Greater => rest.get(hover - 1).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use crate::gesture::{Gesture, InputOwner};

    #[test]
    fn viewmodel_marks_source_and_target_only_while_active() {
        let collection = OrderedCollection::new(vec![Item::new("a", "A"), Item::new("b", "B"), Item::new("c", "C")]).unwrap();
        let mut state = AppState::new(collection, &Config::default());

        state
            .tracker
            .arm(Gesture::single(InputOwner::Pointer(1), 0, ItemId::from("a")))
            .unwrap();
        assert!(!state.compute_viewmodel().rows[0].is_dragging);

        state.tracker.activate(InputOwner::Pointer(1));
        state.tracker.update_hover(InputOwner::Pointer(1), Some(2));
        let vm = state.compute_viewmodel();
        assert_eq!(vm.ids(), [&ItemId::from("a"), &ItemId::from("b"), &ItemId::from("c")]);
        assert!(vm.is_reordering);
        assert!(vm.rows[0].is_dragging);
        assert_eq!(vm.drop_target().map(|row| row.id.as_str()), Some("c"));

        state.tracker.cancel_any();
        let vm = state.compute_viewmodel();
        assert!(vm.rows.iter().all(|row| !row.is_dragging && !row.is_drop_target));
    }
}
