//! Rendered row geometry and hit-testing.
//!
//! The view layer reports where each row was drawn; the pointer and touch
//! adapters resolve coordinates against the most recent report. Only the
//! vertical axis matters for a single-column list.

use crate::domain::ItemId;
use serde::{Deserialize, Serialize};

/// Vertical extent of one rendered row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowBounds {
    pub id: ItemId,
    pub top: f64,
    pub height: f64,
}

impl RowBounds {
    pub fn new(id: impl Into<ItemId>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }

    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

/// The rows currently on screen.
///
/// With virtualization only a window of the list is rendered; rows that are
/// not reported simply cannot be hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowLayout {
    rows: Vec<RowBounds>,
}

impl RowLayout {
    #[must_use]
    pub fn new(rows: Vec<RowBounds>) -> Self {
        Self { rows }
    }

    /// Lays out rows of equal height starting at `top`.
    #[must_use]
    pub fn uniform(ids: &[ItemId], top: f64, row_height: f64) -> Self {
        let rows = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                #[allow(clippy::cast_precision_loss)]
                let offset = i as f64 * row_height;
                RowBounds::new(id.clone(), top + offset, row_height)
            })
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[RowBounds] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolves a vertical coordinate to the row under it.
    ///
    /// A coordinate inside exactly one row resolves to that row. On a shared
    /// boundary, or in a gap between rows, the row whose midpoint is closer
    /// wins; equal distances resolve to the row reported first. Coordinates
    /// above the topmost or below the bottommost row hit nothing.
    #[must_use]
    pub fn hit_test(&self, y: f64) -> Option<&ItemId> {
        if !y.is_finite() {
            return None;
        }

        let top = self.rows.iter().map(|row| row.top).reduce(f64::min)?;
        let bottom = self.rows.iter().map(RowBounds::bottom).reduce(f64::max)?;
        if y < top || y > bottom {
            return None;
        }

        let containing = self.rows.iter().any(|row| row.contains(y));
        self.rows
            .iter()
            .filter(|row| !containing || row.contains(y))
            .fold(None::<&RowBounds>, |best, row| match best {
                Some(current) if (y - current.midpoint()).abs() <= (y - row.midpoint()).abs() => {
                    Some(current)
                }
                _ => Some(row),
            })
            .map(|row| &row.id)
    }
}
