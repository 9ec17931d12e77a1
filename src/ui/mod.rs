//! Presentation-side types.
//!
//! - `viewmodel`: display-ready list state computed from `AppState`
//! - `notification`: announcements for committed moves and rollbacks

pub mod notification;
pub mod viewmodel;

pub use notification::Notification;
pub use viewmodel::{ListViewModel, RowViewModel};
