//! The authoritative ordered list of items.

use super::error::{Result, SortableError};
use super::item::{Item, ItemId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Ordered sequence of item ids plus the payload lookup for each id.
///
/// Insertion order is display order. The collection guarantees that ids are
/// unique and that every id has an item. It exposes no mutators: a new order
/// can only be produced by the functions in [`crate::domain::reorder`], which
/// always return a permutation of their input.
///
/// The payload map is shared between the collections produced by successive
/// reorders, so a reorder only copies the id sequence.
///
/// # Examples
///
/// ```
/// use sortable::{Item, OrderedCollection};
///
/// let list = OrderedCollection::new(vec![Item::new("a", "A"), Item::new("b", "B")])?;
/// assert_eq!(list.len(), 2);
/// assert_eq!(list.index_of(&"b".into()), Some(1));
/// # Ok::<(), sortable::SortableError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedCollection {
    order: Vec<ItemId>,
    items: Arc<HashMap<ItemId, Item>>,
}

impl OrderedCollection {
    /// Builds a collection from items in display order.
    ///
    /// # Errors
    ///
    /// Returns [`SortableError::DuplicateItem`] if two items share an id.
    pub fn new(items: Vec<Item>) -> Result<Self> {
        let mut order = Vec::with_capacity(items.len());
        let mut map = HashMap::with_capacity(items.len());

        for item in items {
            if map.contains_key(&item.id) {
                return Err(SortableError::DuplicateItem(item.id));
            }
            order.push(item.id.clone());
            map.insert(item.id.clone(), item);
        }

        Ok(Self {
            order,
            items: Arc::new(map),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Item ids in display order.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.order
    }

    /// Current position of an item, if it is part of the collection.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<&ItemId> {
        self.order.get(index)
    }

    #[must_use]
    pub fn item_at(&self, index: usize) -> Option<&Item> {
        self.id_at(index).and_then(|id| self.items.get(id))
    }

    /// Iterates over the items in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Returns `true` if `other` holds exactly the same ids, in any order.
    #[must_use]
    pub fn is_permutation_of(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mine: HashSet<&ItemId> = self.order.iter().collect();
        other.order.iter().all(|id| mine.contains(id))
    }

    /// Produces a sibling collection with a new order over the same items.
    ///
    /// Only the reorder engine calls this, and only with a permutation of
    /// `self.order`.
    pub(crate) fn with_order(&self, order: Vec<ItemId>) -> Self {
        debug_assert_eq!(order.len(), self.order.len());
        Self {
            order,
            items: Arc::clone(&self.items),
        }
    }
}
