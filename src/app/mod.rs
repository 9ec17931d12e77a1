//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the host (a UI toolkit binding, or the replay
//! driver in `main.rs`) and the domain, input, persistence and worker layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Device Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                              ↑                                   ↓
//!                              └───────── Store Responses ─────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, startup_actions, Event, PointerKind};
pub use state::AppState;
