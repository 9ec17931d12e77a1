//! Error types for the sortable engine.
//!
//! This module defines the centralized error type [`SortableError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented with the
//! `thiserror` crate.
//!
//! Gesture conflicts are deliberately not part of [`SortableError`]: a second
//! gesture that tries to start while another one is active is rejected by the
//! gesture tracker with [`GestureConflict`] and then dropped by the input
//! adapters without surfacing anything to the user.

use crate::domain::item::ItemId;
use crate::domain::Generation;
use thiserror::Error;

/// The main error type for sortable operations.
///
/// # Examples
///
/// ```
/// use sortable::SortableError;
///
/// let err = SortableError::IndexOutOfRange { index: 7, len: 4 };
/// assert_eq!(err.to_string(), "index 7 out of range for collection of length 4");
/// ```
#[derive(Debug, Error)]
pub enum SortableError {
    /// A reorder was requested with an index outside the collection.
    ///
    /// This is a precondition violation: the input adapters clamp keyboard
    /// moves and bound hit-testing, so reaching this from an adapter is a bug.
    #[error("index {index} out of range for collection of length {len}")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Length of the collection at the time of the call.
        len: usize,
    },

    /// An item id was referenced that the collection does not contain.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// The same item id appeared twice while building a collection.
    #[error("duplicate item: {0}")]
    DuplicateItem(ItemId),

    /// The store rejected the save for a committed reorder.
    ///
    /// Always paired with a rollback of the optimistic order.
    #[error("failed to persist order generation {generation}: {reason}")]
    PersistFailed {
        /// Generation whose save failed.
        generation: Generation,
        /// Human-readable reason reported by the store.
        reason: String,
    },

    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the store worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A second gesture tried to start while another gesture is active.
///
/// Returned by [`GestureTracker::arm`](crate::gesture::GestureTracker::arm).
/// Adapters log it and otherwise ignore the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a gesture is already active")]
pub struct GestureConflict;

/// A specialized `Result` type for sortable operations.
pub type Result<T> = std::result::Result<T, SortableError>;
