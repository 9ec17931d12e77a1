//! Store worker for persistence requests.
//!
//! The engine never calls storage directly. It emits a [`WorkerMessage`] as a
//! side effect and later receives the matching [`WorkerResponse`] as an event,
//! so a save can take as long as it needs while input keeps flowing.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::StoreWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
