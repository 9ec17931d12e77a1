//! Gesture tracking: the transient state of one reorder interaction.
//!
//! - [`state`]: gesture data, input owners and modalities
//! - [`tracker`]: the `Idle → Armed → Active → Committed | Cancelled` machine
//!
//! At most one gesture exists at a time. It is owned by the input source that
//! armed it and is discarded exactly once, on commit or cancel.

pub mod state;
pub mod tracker;

pub use state::{Gesture, GesturePhase, InputOwner, Modality, Point};
pub use tracker::GestureTracker;
