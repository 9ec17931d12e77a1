//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable storage implementation using
//! JSON serialization. It uses atomic file writes (write-to-temp + rename) so
//! the persisted order is never left half-written.

use crate::domain::error::{Result, SortableError};
use crate::domain::{Generation, ItemId};
use crate::storage::backend::Storage;
use crate::storage::models::{admit, OrderRecord, SaveReceipt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// The persisted order, absent until the first save.
    #[serde(default)]
    order: Option<OrderRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            order: None,
        }
    }
}

/// JSON file storage backend.
///
/// The document is kept in memory and written through on every accepted save.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "order": {
///     "ids": ["task-3", "task-1", "task-2"],
///     "generation": 7,
///     "saved_at": 1760500000
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory data cache, loaded on creation.
    data: StorageData,

    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON or an unknown format version
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads storage data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| SortableError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > FORMAT_VERSION {
            return Err(SortableError::Storage(format!(
                "unsupported storage format version {}",
                data.version
            )));
        }

        tracing::debug!(
            version = data.version,
            generation = ?data.order.as_ref().map(|order| order.generation),
            "loaded storage data"
        );

        Ok(data)
    }

    /// Saves storage data to disk using atomic write.
    ///
    /// Writes to a temporary file first, then renames it over the target path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write or the rename
    /// fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| SortableError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn load_order(&self) -> Result<Option<OrderRecord>> {
        let _span = tracing::debug_span!("json_load_order").entered();
        Ok(self.data.order.clone())
    }

    fn save_order(&mut self, ids: &[ItemId], generation: Generation) -> Result<SaveReceipt> {
        let _span = tracing::debug_span!("json_save_order",
            %generation,
            count = ids.len()
        ).entered();

        let receipt = admit(self.data.order.as_ref(), generation);
        if receipt != SaveReceipt::Stored {
            tracing::debug!(?receipt, "save not applied");
            return Ok(receipt);
        }

        let previous = self.data.order.replace(OrderRecord::new(ids.to_vec(), generation));
        self.dirty = true;

        if let Err(e) = self.save_to_file() {
            self.data.order = previous;
            self.dirty = false;
            return Err(e);
        }

        Ok(receipt)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|id| ItemId::from(*id)).collect()
    }

    #[test]
    fn order_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("order.json");

        {
            let mut storage = JsonStorage::new(path.clone()).unwrap();
            assert_eq!(storage.load_order().unwrap(), None);
            let receipt = storage.save_order(&ids(&["c", "a", "b"]), Generation::new(2)).unwrap();
            assert_eq!(receipt, SaveReceipt::Stored);
        }

        let storage = JsonStorage::new(path).unwrap();
        let record = storage.load_order().unwrap().unwrap();
        assert_eq!(record.ids, ids(&["c", "a", "b"]));
        assert_eq!(record.generation, Generation::new(2));
    }

    #[test]
    fn older_generation_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("order.json")).unwrap();

        storage.save_order(&ids(&["b", "a"]), Generation::new(5)).unwrap();
        let receipt = storage.save_order(&ids(&["a", "b"]), Generation::new(4)).unwrap();
        assert_eq!(receipt, SaveReceipt::Stale { held: Generation::new(5) });

        let retry = storage.save_order(&ids(&["b", "a"]), Generation::new(5)).unwrap();
        assert_eq!(retry, SaveReceipt::AlreadyCurrent);
        assert_eq!(storage.load_order().unwrap().unwrap().ids, ids(&["b", "a"]));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStorage::new(path).unwrap_err();
        assert!(matches!(err, SortableError::Storage(_)));
    }
}
