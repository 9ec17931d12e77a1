//! Item identity and payload.
//!
//! Items are identified by [`ItemId`] and never by their position: indices are
//! view coordinates that change every time the list is reordered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of a list item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A list entry: identity, a display label and an arbitrary payload.
///
/// The label is what screen-reader announcements use to name the item. The
/// payload is carried untouched; the engine never inspects it.
///
/// # Examples
///
/// ```
/// use sortable::Item;
///
/// let item = Item::new("task-1", "Write release notes");
/// assert_eq!(item.id.as_str(), "task-1");
/// assert!(item.payload.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub label: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Item {
    /// Creates an item with an empty (`null`) payload.
    pub fn new(id: impl Into<ItemId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            payload: serde_json::Value::Null,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
