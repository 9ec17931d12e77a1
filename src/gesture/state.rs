//! Gesture data: who owns the interaction, where it started, where it hovers.

use crate::domain::ItemId;
use serde::{Deserialize, Serialize};

/// Input device family that produced a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Pointer,
    Touch,
    Keyboard,
}

/// The input source that holds a gesture.
///
/// Pointer and touch sources are distinguished by their device-assigned id
/// so that a second finger or mouse cannot steer a gesture it did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOwner {
    Pointer(u64),
    Touch(u64),
    Keyboard,
}

impl InputOwner {
    #[must_use]
    pub const fn modality(self) -> Modality {
        match self {
            Self::Pointer(_) => Modality::Pointer,
            Self::Touch(_) => Modality::Touch,
            Self::Keyboard => Modality::Keyboard,
        }
    }
}

/// A position in the view's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One in-progress reorder attempt.
///
/// `source_index` and `source_id` are fixed when the gesture is armed.
/// `hover_index` is the current drop candidate, `None` while the input is
/// outside every drop target.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub owner: InputOwner,
    pub source_index: usize,
    pub source_id: ItemId,
    pub hover_index: Option<usize>,
    /// Items moving together, in collection order. Contains only
    /// `source_id` for a single-item gesture.
    pub selected_ids: Vec<ItemId>,
    /// Where a pointer or touch gesture started; `None` for keyboard.
    pub origin: Option<Point>,
}

impl Gesture {
    /// Creates a gesture that moves a single item.
    #[must_use]
    pub fn single(owner: InputOwner, source_index: usize, source_id: ItemId) -> Self {
        Self {
            owner,
            source_index,
            selected_ids: vec![source_id.clone()],
            source_id,
            hover_index: None,
            origin: None,
        }
    }

    /// Replaces the moving set with a multi-item selection.
    ///
    /// Ignored unless the selection contains the source item.
    #[must_use]
    pub fn with_selection(mut self, selected_ids: Vec<ItemId>) -> Self {
        if selected_ids.contains(&self.source_id) {
            self.selected_ids = selected_ids;
        }
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }

    #[must_use]
    pub const fn modality(&self) -> Modality {
        self.owner.modality()
    }

    /// Returns `true` if more than one item moves with this gesture.
    #[must_use]
    pub fn is_multi(&self) -> bool {
        self.selected_ids.len() > 1
    }
}

/// Lifecycle phase of the (single) gesture slot.
///
/// `Committed` and `Cancelled` are not stored: they are the two ways a
/// gesture leaves the tracker, see
/// [`GestureTracker::commit`](super::GestureTracker::commit) and
/// [`GestureTracker::cancel`](super::GestureTracker::cancel).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    /// Started but still ambiguous (could be a click or tap).
    Armed(Gesture),
    /// Reordering in progress.
    Active(Gesture),
}
