//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over persistence
//! backends. The engine needs exactly two operations: read the last persisted
//! order and write a new one tagged with its generation.

use crate::domain::error::Result;
use crate::domain::{Generation, ItemId};
use crate::storage::models::{OrderRecord, SaveReceipt};

/// Abstraction over persistent storage backends.
///
/// Saves must be idempotent: the engine does not assume at-most-once
/// delivery, and a backend may retry internally. Implementations order writes
/// by generation (see [`crate::storage::models::admit`]) so a late, older save
/// never replaces a newer order.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): in-process, with
///   failure injection
///
/// # Examples
///
/// ```no_run
/// use sortable::storage::{JsonStorage, Storage};
/// use sortable::{Generation, ItemId};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/order.json"))?;
/// storage.save_order(&[ItemId::from("b"), ItemId::from("a")], Generation::new(1))?;
/// let record = storage.load_order()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the last persisted order, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load_order(&self) -> Result<Option<OrderRecord>>;

    /// Persists `ids` as the order for `generation`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. Nothing is stored in that case.
    fn save_order(&mut self, ids: &[ItemId], generation: Generation) -> Result<SaveReceipt>;
}
