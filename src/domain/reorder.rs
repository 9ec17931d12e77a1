//! The reorder engine: pure permutation functions over [`OrderedCollection`].
//!
//! These functions define what "reordering" means. They never mutate their
//! input; they return a new collection that is always a permutation of it.
//!
//! Target indices are counted in the sequence *after* the moved element (or
//! block) has been removed. Moving index 0 to index 2 in `[A, B, C, D]`
//! therefore yields `[B, C, A, D]`: the moved item ends up at the index it
//! was dropped on.

use super::collection::OrderedCollection;
use super::error::{Result, SortableError};
use super::item::ItemId;
use std::collections::HashSet;

/// Moves the item at `source` so that it ends up at `target`.
///
/// `source == target` short-circuits and returns an equal collection, so
/// callers can compare the result with the input to skip downstream work.
///
/// # Errors
///
/// Returns [`SortableError::IndexOutOfRange`] if either index is not a valid
/// index into `collection`.
///
/// # Examples
///
/// ```
/// use sortable::{Item, OrderedCollection};
/// use sortable::domain::reorder::move_item;
///
/// let list = OrderedCollection::new(
///     ["A", "B", "C", "D"].into_iter().map(|id| Item::new(id, id)).collect(),
/// )?;
/// let moved = move_item(&list, 0, 2)?;
/// let ids: Vec<&str> = moved.ids().iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, ["B", "C", "A", "D"]);
/// # Ok::<(), sortable::SortableError>(())
/// ```
pub fn move_item(
    collection: &OrderedCollection,
    source: usize,
    target: usize,
) -> Result<OrderedCollection> {
    let len = collection.len();
    for index in [source, target] {
        if index >= len {
            return Err(SortableError::IndexOutOfRange { index, len });
        }
    }

    if source == target {
        return Ok(collection.clone());
    }

    let mut order = collection.ids().to_vec();
    let moved = order.remove(source);
    order.insert(target, moved);

    tracing::trace!(source, target, "item moved");
    Ok(collection.with_order(order))
}

/// Moves several items as one contiguous block.
///
/// The block keeps the items' current relative order (duplicates in
/// `source_ids` are ignored). After removing the block, it is inserted so its
/// first element lands at `target`; valid targets are
/// `0..=len - block_len`. An empty `source_ids` is a no-op.
///
/// # Errors
///
/// - [`SortableError::UnknownItem`] if an id is not in the collection
/// - [`SortableError::IndexOutOfRange`] if `target` is past the end of the
///   post-removal sequence
///
/// # Examples
///
/// ```
/// use sortable::{Item, ItemId, OrderedCollection};
/// use sortable::domain::reorder::move_many;
///
/// let list = OrderedCollection::new(
///     ["A", "B", "C", "D", "E"].into_iter().map(|id| Item::new(id, id)).collect(),
/// )?;
/// let moved = move_many(&list, &[ItemId::from("B"), ItemId::from("D")], 0)?;
/// let ids: Vec<&str> = moved.ids().iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, ["B", "D", "A", "C", "E"]);
/// # Ok::<(), sortable::SortableError>(())
/// ```
pub fn move_many(
    collection: &OrderedCollection,
    source_ids: &[ItemId],
    target: usize,
) -> Result<OrderedCollection> {
    let mut moving: HashSet<&ItemId> = HashSet::with_capacity(source_ids.len());
    for id in source_ids {
        if !collection.contains(id) {
            return Err(SortableError::UnknownItem(id.clone()));
        }
        moving.insert(id);
    }

    if moving.is_empty() {
        return Ok(collection.clone());
    }

    let (block, mut rest): (Vec<ItemId>, Vec<ItemId>) = collection
        .ids()
        .iter()
        .cloned()
        .partition(|id| moving.contains(id));

    if target > rest.len() {
        return Err(SortableError::IndexOutOfRange {
            index: target,
            len: rest.len() + 1,
        });
    }

    let tail = rest.split_off(target);
    let mut order = rest;
    order.extend(block);
    order.extend(tail);

    if order.as_slice() == collection.ids() {
        return Ok(collection.clone());
    }

    tracing::trace!(block_len = moving.len(), target, "block moved");
    Ok(collection.with_order(order))
}

/// Reconciles a persisted order with the live collection.
///
/// Ids present in both come first, in stored order. Live items the stored
/// order does not mention keep their relative order after them. Stored ids
/// that no longer exist are dropped. The result is a permutation of
/// `collection`.
#[must_use]
pub fn apply_stored_order(collection: &OrderedCollection, stored: &[ItemId]) -> OrderedCollection {
    let mut seen: HashSet<&ItemId> = HashSet::with_capacity(collection.len());
    let mut order = Vec::with_capacity(collection.len());

    for id in stored {
        if collection.contains(id) && seen.insert(id) {
            order.push(id.clone());
        }
    }

    let dropped = stored.len() - order.len();
    for id in collection.ids() {
        if !seen.contains(id) {
            order.push(id.clone());
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "stored order referenced unknown or repeated items");
    }

    if order.as_slice() == collection.ids() {
        return collection.clone();
    }
    collection.with_order(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::Item;

    fn list(ids: &[&str]) -> OrderedCollection {
        OrderedCollection::new(ids.iter().map(|id| Item::new(*id, *id)).collect()).unwrap()
    }

    fn ids(collection: &OrderedCollection) -> Vec<&str> {
        collection.ids().iter().map(ItemId::as_str).collect()
    }

    fn id_vec(ids: &[&str]) -> Vec<ItemId> {
        ids.iter().map(|id| ItemId::from(*id)).collect()
    }

    #[test]
    fn forward_move_counts_target_after_removal() {
        let moved = move_item(&list(&["A", "B", "C", "D"]), 0, 2).unwrap();
        assert_eq!(ids(&moved), ["B", "C", "A", "D"]);
    }

    #[test]
    fn backward_move_to_front() {
        let moved = move_item(&list(&["A", "B", "C", "D"]), 3, 0).unwrap();
        assert_eq!(ids(&moved), ["D", "A", "B", "C"]);
    }

    #[test]
    fn same_index_is_identity() {
        let original = list(&["A", "B", "C", "D"]);
        for i in 0..original.len() {
            assert_eq!(move_item(&original, i, i).unwrap(), original);
        }
    }

    #[test]
    fn every_valid_move_is_a_permutation() {
        let original = list(&["A", "B", "C", "D", "E"]);
        for source in 0..original.len() {
            for target in 0..original.len() {
                let moved = move_item(&original, source, target).unwrap();
                assert!(moved.is_permutation_of(&original), "{source}->{target}");
                assert_eq!(moved.ids()[target], original.ids()[source]);
            }
        }
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let original = list(&["A", "B"]);
        assert!(matches!(
            move_item(&original, 2, 0),
            Err(SortableError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            move_item(&original, 0, 5),
            Err(SortableError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(move_item(&list(&[]), 0, 0).is_err());
    }

    #[test]
    fn move_many_gathers_block_at_front() {
        let moved = move_many(&list(&["A", "B", "C", "D", "E"]), &id_vec(&["B", "D"]), 0).unwrap();
        assert_eq!(ids(&moved), ["B", "D", "A", "C", "E"]);
    }

    #[test]
    fn move_many_keeps_collection_order_within_block() {
        let moved = move_many(&list(&["A", "B", "C", "D", "E"]), &id_vec(&["E", "A", "E"]), 1).unwrap();
        assert_eq!(ids(&moved), ["B", "A", "E", "C", "D"]);
    }

    #[test]
    fn move_many_to_end() {
        let moved = move_many(&list(&["A", "B", "C", "D", "E"]), &id_vec(&["A", "B"]), 3).unwrap();
        assert_eq!(ids(&moved), ["C", "D", "E", "A", "B"]);
    }

    #[test]
    fn move_many_rejects_unknown_ids_and_far_targets() {
        let original = list(&["A", "B", "C"]);
        assert!(matches!(
            move_many(&original, &id_vec(&["Z"]), 0),
            Err(SortableError::UnknownItem(_))
        ));
        assert!(matches!(
            move_many(&original, &id_vec(&["A", "B"]), 2),
            Err(SortableError::IndexOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn move_many_without_ids_is_identity() {
        let original = list(&["A", "B", "C"]);
        assert_eq!(move_many(&original, &[], 0).unwrap(), original);
    }

    #[test]
    fn stored_order_is_reconciled_with_live_items() {
        let live = list(&["A", "B", "C", "D"]);
        let restored = apply_stored_order(&live, &id_vec(&["C", "X", "A", "C"]));
        assert_eq!(ids(&restored), ["C", "A", "B", "D"]);
        assert!(restored.is_permutation_of(&live));
    }
}
