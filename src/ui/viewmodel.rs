//! View model types representing renderable list state.
//!
//! View models are computed from application state and contain display-ready
//! data only: which row is being dragged, which row is the drop candidate,
//! which rows are selected or focused. A view binds them to whatever widget
//! toolkit it uses; nothing here feeds back into the engine.
//!
//! # Architecture
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the view layer. Highlighting disappears as soon as a gesture ends because
//! the next view model simply no longer carries it.

use crate::domain::ItemId;
use serde::Serialize;

/// Complete view model for one sortable list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListViewModel {
    /// Rows in display order.
    pub rows: Vec<RowViewModel>,

    /// Index of the focused row, if the focused item is in the list.
    pub focused_index: Option<usize>,

    /// Whether a gesture is currently reordering the list.
    pub is_reordering: bool,

    /// Whether a save for the displayed order has not been confirmed yet.
    pub save_in_flight: bool,
}

impl ListViewModel {
    /// Ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<&ItemId> {
        self.rows.iter().map(|row| &row.id).collect()
    }

    /// The row marked as the drop target, if any.
    #[must_use]
    pub fn drop_target(&self) -> Option<&RowViewModel> {
        self.rows.iter().find(|row| row.is_drop_target)
    }
}

/// Display information for a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowViewModel {
    /// Stable item id.
    pub id: ItemId,

    /// Display label.
    pub label: String,

    /// The row is part of what an active gesture is moving.
    pub is_dragging: bool,

    /// The row is where the active gesture would drop.
    pub is_drop_target: bool,

    /// The row belongs to the multi-select set.
    pub is_selected: bool,

    /// The row has keyboard focus.
    pub is_focused: bool,
}
