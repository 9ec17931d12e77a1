//! Persistence coordination: optimistic updates, save ordering and rollback.
//!
//! The coordinator is transport-agnostic. The application handler asks it to
//! commit a new order, posts the resulting save request to the store worker,
//! and feeds the worker's answer back through [`PersistenceCoordinator::resolve`].

pub mod coordinator;

pub use coordinator::{PendingSave, PersistenceCoordinator, Resolution, SaveStatus};
