//! Storage record models for the persistence layer.
//!
//! These are the shapes written to and read from a backend. They only carry
//! ids and versions; item payloads belong to the caller.

use crate::domain::{Generation, ItemId};
use serde::{Deserialize, Serialize};

/// A persisted list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Item ids in display order.
    pub ids: Vec<ItemId>,

    /// Generation that produced this order.
    pub generation: Generation,

    /// Unix timestamp of the write.
    pub saved_at: i64,
}

impl OrderRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortable::storage::OrderRecord;
    /// use sortable::{Generation, ItemId};
    ///
    /// let record = OrderRecord::new(vec![ItemId::from("a")], Generation::new(3));
    /// assert_eq!(record.generation.get(), 3);
    /// assert!(record.saved_at > 0);
    /// ```
    #[must_use]
    pub fn new(ids: Vec<ItemId>, generation: Generation) -> Self {
        Self {
            ids,
            generation,
            saved_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// How a backend handled a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveReceipt {
    /// The order was written.
    Stored,
    /// The same generation was already stored; the retry was accepted as is.
    AlreadyCurrent,
    /// A newer generation is already stored; this save was discarded.
    Stale {
        /// Generation the backend holds.
        held: Generation,
    },
}

/// Decides whether a save for `generation` may replace `current`.
///
/// Generations never go backwards in storage: a repeated save of the held
/// generation is an idempotent retry, an older one is dropped.
#[must_use]
pub fn admit(current: Option<&OrderRecord>, generation: Generation) -> SaveReceipt {
    match current {
        Some(record) if record.generation > generation => SaveReceipt::Stale {
            held: record.generation,
        },
        Some(record) if record.generation == generation => SaveReceipt::AlreadyCurrent,
        _ => SaveReceipt::Stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admit_orders_by_generation() {
        let held = OrderRecord::new(vec![], Generation::new(4));
        assert_eq!(admit(None, Generation::new(1)), SaveReceipt::Stored);
        assert_eq!(admit(Some(&held), Generation::new(5)), SaveReceipt::Stored);
        assert_eq!(admit(Some(&held), Generation::new(4)), SaveReceipt::AlreadyCurrent);
        assert_eq!(
            admit(Some(&held), Generation::new(2)),
            SaveReceipt::Stale { held: Generation::new(4) }
        );
    }
}
