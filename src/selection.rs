//! Multi-selection of items that move together.
//!
//! The selection stores ids, never indices, so it survives reorders. An anchor
//! remembers the last item explicitly toggled or selected, which range
//! extension (`shift+click` style) grows from.

use crate::domain::{ItemId, OrderedCollection};
use std::collections::HashSet;

/// Set of selected item ids with a range anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<ItemId>,
    anchor: Option<ItemId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Replaces the selection with a single item.
    pub fn select_only(&mut self, id: ItemId) {
        self.ids.clear();
        self.ids.insert(id.clone());
        self.anchor = Some(id);
    }

    /// Adds or removes one item. Returns `true` if the item is now selected.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        let selected = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        };
        self.anchor = Some(id);
        selected
    }

    /// Selects every item between the anchor and `id`, inclusive, in the
    /// current order. Without a usable anchor this behaves like
    /// [`select_only`](Self::select_only).
    pub fn extend_to(&mut self, id: ItemId, collection: &OrderedCollection) {
        let anchor_index = self.anchor.as_ref().and_then(|anchor| collection.index_of(anchor));
        let (Some(from), Some(to)) = (anchor_index, collection.index_of(&id)) else {
            self.select_only(id);
            return;
        };

        let (start, end) = if from <= to { (from, to) } else { (to, from) };
        self.ids.extend(collection.ids()[start..=end].iter().cloned());
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.anchor = None;
    }

    /// Drops ids the collection no longer contains.
    pub fn retain_existing(&mut self, collection: &OrderedCollection) {
        self.ids.retain(|id| collection.contains(id));
        if self.anchor.as_ref().is_some_and(|anchor| !collection.contains(anchor)) {
            self.anchor = None;
        }
    }

    /// Selected ids in current display order.
    #[must_use]
    pub fn ordered_ids(&self, collection: &OrderedCollection) -> Vec<ItemId> {
        collection
            .ids()
            .iter()
            .filter(|id| self.ids.contains(*id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    fn list() -> OrderedCollection {
        OrderedCollection::new(
            ["a", "b", "c", "d", "e"]
                .into_iter()
                .map(|id| Item::new(id, id))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("b".into()));
        assert!(selection.toggle("d".into()));
        assert!(!selection.toggle("b".into()));
        assert_eq!(selection.ordered_ids(&list()), vec![ItemId::from("d")]);
    }

    #[test]
    fn extend_selects_range_in_display_order() {
        let collection = list();
        let mut selection = SelectionSet::new();
        selection.select_only("d".into());
        selection.extend_to("b".into(), &collection);
        assert_eq!(
            selection.ordered_ids(&collection),
            vec![ItemId::from("b"), ItemId::from("c"), ItemId::from("d")]
        );
    }

    #[test]
    fn extend_without_anchor_selects_only_target() {
        let collection = list();
        let mut selection = SelectionSet::new();
        selection.extend_to("c".into(), &collection);
        assert_eq!(selection.ordered_ids(&collection), vec![ItemId::from("c")]);
    }

    #[test]
    fn retain_drops_vanished_items() {
        let mut selection = SelectionSet::new();
        selection.toggle("a".into());
        selection.toggle("zz".into());
        selection.retain_existing(&list());
        assert_eq!(selection.len(), 1);
        assert!(selection.contains(&"a".into()));
    }
}
