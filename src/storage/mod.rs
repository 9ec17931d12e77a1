//! Storage layer for persisted list orders.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `memory`: In-process storage with failure injection
//! - `models`: Storage record types and generation admission

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::{admit, OrderRecord, SaveReceipt};
