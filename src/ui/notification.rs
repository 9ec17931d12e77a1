//! User-facing announcements.
//!
//! Every committed move and every rollback produces one [`Notification`]. They
//! travel on a single channel so that an assistive-technology live region can
//! read them in the order they happened.

use crate::domain::{Generation, ItemId};
use serde::Serialize;

/// An announcement for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// An item (or the lead item of a moved block) landed at a new position.
    Moved {
        id: ItemId,
        label: String,
        /// 1-based position after the move.
        position: usize,
        len: usize,
        /// Number of items that moved together.
        count: usize,
    },

    /// A save failed and the order was restored.
    PersistFailed {
        generation: Generation,
        reason: String,
    },
}

impl Notification {
    /// Text to announce.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortable::ui::Notification;
    /// use sortable::ItemId;
    ///
    /// let moved = Notification::Moved {
    ///     id: ItemId::from("b"),
    ///     label: "Write report".into(),
    ///     position: 3,
    ///     len: 5,
    ///     count: 1,
    /// };
    /// assert_eq!(moved.message(), "Write report moved to position 3 of 5");
    /// ```
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Moved {
                label,
                position,
                len,
                count,
                ..
            } if *count > 1 => {
                format!("{label} and {} more moved to position {position} of {len}", count - 1)
            }
            Self::Moved { label, position, len, .. } => {
                format!("{label} moved to position {position} of {len}")
            }
            Self::PersistFailed { reason, .. } => {
                format!("Could not save the new order: {reason}. Order restored.")
            }
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::PersistFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_moves_mention_the_other_items() {
        let moved = Notification::Moved {
            id: ItemId::from("a"),
            label: "A".into(),
            position: 2,
            len: 5,
            count: 3,
        };
        assert_eq!(moved.message(), "A and 2 more moved to position 2 of 5");
    }

    #[test]
    fn rollback_message_names_the_reason() {
        let failed = Notification::PersistFailed {
            generation: Generation::new(1),
            reason: "disk full".into(),
        };
        assert!(failed.is_error());
        assert_eq!(failed.message(), "Could not save the new order: disk full. Order restored.");
    }
}
