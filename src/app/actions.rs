//! Actions representing side effects to be executed by the host.
//!
//! This module defines the [`Action`] type, the commands produced by the event
//! handler after processing input or store responses. Actions are the
//! boundary between state transitions and effectful work: talking to the
//! store worker, announcing moves, moving focus.
//!
//! # Example
//!
//! ```rust
//! use sortable::app::Action;
//! use sortable::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToStore(WorkerMessage::load_order())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::ItemId;
use crate::ui::Notification;
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Sends a request to the store worker.
    ///
    /// The host delivers the answer back as
    /// [`Event::WorkerResponse`](crate::app::Event::WorkerResponse).
    PostToStore(WorkerMessage),

    /// Announces something to the user.
    ///
    /// Committed moves and rollbacks share this channel; hosts usually route
    /// it to a polite live region.
    Notify(Notification),

    /// Moves keyboard focus to the item, wherever it now is.
    SetFocus(ItemId),
}
