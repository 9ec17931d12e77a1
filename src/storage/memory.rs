//! In-process storage backend.
//!
//! Keeps the order in memory. Failures can be queued with
//! [`MemoryStorage::fail_next`] to exercise rollback paths without touching
//! the filesystem.

use crate::domain::error::{Result, SortableError};
use crate::domain::{Generation, ItemId};
use crate::storage::backend::Storage;
use crate::storage::models::{admit, OrderRecord, SaveReceipt};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    order: Option<OrderRecord>,
    failures: VecDeque<String>,
    writes: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already persisted order.
    #[must_use]
    pub fn with_order(ids: Vec<ItemId>, generation: Generation) -> Self {
        Self {
            order: Some(OrderRecord::new(ids, generation)),
            ..Self::default()
        }
    }

    /// Makes the next save fail with `reason`. Calls queue up.
    pub fn fail_next(&mut self, reason: impl Into<String>) {
        self.failures.push_back(reason.into());
    }

    /// Number of saves that actually wrote an order.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn load_order(&self) -> Result<Option<OrderRecord>> {
        Ok(self.order.clone())
    }

    fn save_order(&mut self, ids: &[ItemId], generation: Generation) -> Result<SaveReceipt> {
        if let Some(reason) = self.failures.pop_front() {
            tracing::debug!(%generation, %reason, "injected storage failure");
            return Err(SortableError::Storage(reason));
        }

        let receipt = admit(self.order.as_ref(), generation);
        if receipt == SaveReceipt::Stored {
            self.order = Some(OrderRecord::new(ids.to_vec(), generation));
            self.writes += 1;
        }
        Ok(receipt)
    }
}
