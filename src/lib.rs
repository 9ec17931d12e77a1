//! Sortable: a framework-agnostic reorder engine for sortable lists.
//!
//! The crate owns everything about reordering a list except drawing it:
//! - Pointer, touch and keyboard input resolved into one authoritative target
//! - A single in-progress gesture, with conflicting input ignored
//! - Exactly one mutation of the ordered collection per completed gesture
//! - Optimistic saves ordered by generation, with rollback on failure
//! - Announcements for every committed move and every rollback

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host (UI binding, or the replay driver main.rs)    │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ Event            ↑ Action
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action emission                                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Input         │   │ Persistence   │   │ Worker        │
//! │ (input/)      │   │ (persistence/)│   │ (worker/)     │
//! │ - Pointer     │   │ - Generations │   │ - Save/load   │
//! │ - Keyboard    │   │ - Rollback    │   │ - Trace ctx   │
//! │ - Hit-testing │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                                         │
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │ Gesture & Domain          │   │ Storage (storage/)        │
//! │ - Gesture tracker         │   │ - JSON file, in-memory    │
//! │ - Ordered collection      │   └───────────────────────────┘
//! │ - Reorder engine, errors  │
//! └───────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event handler, state and actions
//! - [`domain`]: Items, the ordered collection, the reorder functions, errors
//! - [`gesture`]: The single-slot gesture tracker
//! - [`input`]: Pointer/touch and keyboard adapters, row layout hit-testing
//! - [`persistence`]: Optimistic update bookkeeping and rollback
//! - [`selection`]: Multi-item selection
//! - [`storage`]: Persisted order backends
//! - [`worker`]: Store request/response protocol and executor
//! - [`ui`]: View models and notifications
//! - [`infrastructure`]: Data directory resolution
//! - [`observability`]: OpenTelemetry tracing to a rotating file
//!
//! # Examples
//!
//! ```rust
//! use sortable::app::{Action, Event};
//! use sortable::input::Direction;
//! use sortable::worker::StoreWorker;
//! use sortable::{handle_event, initialize, Config, Item, ItemId};
//!
//! let items = vec![Item::new("a", "Alpha"), Item::new("b", "Beta"), Item::new("c", "Gamma")];
//! let mut state = initialize(&Config::default(), items)?;
//! let mut worker = StoreWorker::in_memory();
//!
//! handle_event(&mut state, &Event::Focus { item: ItemId::from("a") })?;
//! let (_, actions) = handle_event(&mut state, &Event::KeyMove { direction: Direction::Down })?;
//!
//! for action in actions {
//!     match action {
//!         Action::PostToStore(message) => {
//!             let response = worker.handle_message(message);
//!             handle_event(&mut state, &Event::WorkerResponse { response })?;
//!         }
//!         Action::Notify(notification) => println!("{}", notification.message()),
//!         Action::SetFocus(_) => {}
//!     }
//! }
//!
//! assert_eq!(state.collection.ids()[1].as_str(), "a");
//! # Ok::<(), sortable::SortableError>(())
//! ```

pub mod app;
pub mod domain;
pub mod gesture;
pub mod infrastructure;
pub mod input;
pub mod persistence;
pub mod selection;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{Generation, Item, ItemId, OrderedCollection, Result, SortableError};

use crate::input::pointer::{DEFAULT_POINTER_THRESHOLD, DEFAULT_TOUCH_THRESHOLD};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default name of the store file inside the data directory.
pub const DEFAULT_STORE_FILE: &str = "sortable-order.json";

/// Name of the trace file inside the data directory.
pub const TRACE_FILE: &str = "sortable-trace.json";

/// Engine configuration.
///
/// # Example
///
/// ```toml
/// pointer_drag_threshold = 4.0
/// touch_drag_threshold = 12.0
/// data_dir = "~/.local/share/my-app"
/// store_file = "tasks-order.json"
/// trace_level = "sortable=debug"
/// trace_max_bytes = 1048576
/// trace_backups = 2
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Mouse/pen movement before a press becomes a drag. Default: `4.0`
    pub pointer_drag_threshold: f64,

    /// Touch movement before a press becomes a drag. Default: `10.0`
    pub touch_drag_threshold: f64,

    /// Directory for the store and trace files.
    ///
    /// Default: see [`infrastructure::paths::data_dir`].
    pub data_dir: Option<PathBuf>,

    /// Store file name, relative to the data directory.
    pub store_file: String,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: String,

    /// Trace file size that triggers rotation. Default: 10 MiB
    pub trace_max_bytes: u64,

    /// Rotated trace files to keep. Default: `3`
    pub trace_backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pointer_drag_threshold: DEFAULT_POINTER_THRESHOLD,
            touch_drag_threshold: DEFAULT_TOUCH_THRESHOLD,
            data_dir: None,
            store_file: DEFAULT_STORE_FILE.to_string(),
            trace_level: "info".to_string(),
            trace_max_bytes: 10 * 1024 * 1024,
            trace_backups: 3,
        }
    }
}

impl Config {
    /// Builds a configuration from flat string pairs, as handed over by a host
    /// configuration system.
    ///
    /// Values that do not parse fall back to their defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use sortable::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("touch_drag_threshold".to_string(), "16".to_string());
    /// map.insert("trace_backups".to_string(), "many".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.touch_drag_threshold, 16.0);
    /// assert_eq!(config.trace_backups, 3);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        fn parsed<T: std::str::FromStr>(config: &BTreeMap<String, String>, key: &str, fallback: T) -> T {
            config
                .get(key)
                .and_then(|value| value.trim().parse::<T>().ok())
                .unwrap_or(fallback)
        }

        let defaults = Self::default();
        let text = |key: &str, fallback: String| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map_or(fallback, String::from)
        };

        Self {
            pointer_drag_threshold: parsed(config, "pointer_drag_threshold", defaults.pointer_drag_threshold),
            touch_drag_threshold: parsed(config, "touch_drag_threshold", defaults.touch_drag_threshold),
            data_dir: config
                .get("data_dir")
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            store_file: text("store_file", defaults.store_file),
            trace_level: text("trace_level", defaults.trace_level),
            trace_max_bytes: parsed(config, "trace_max_bytes", defaults.trace_max_bytes),
            trace_backups: parsed(config, "trace_backups", defaults.trace_backups),
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SortableError::Config`] for malformed TOML, unknown keys or
    /// values of the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| SortableError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Full path of the store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        infrastructure::paths::data_dir(self).join(&self.store_file)
    }

    /// Full path of the trace file.
    #[must_use]
    pub fn trace_path(&self) -> PathBuf {
        infrastructure::paths::data_dir(self).join(TRACE_FILE)
    }
}

/// Creates engine state for `items` in their given order.
///
/// The caller should run [`app::startup_actions`] next so the stored order,
/// if any, replaces the given one.
///
/// # Errors
///
/// Returns [`SortableError::DuplicateItem`] if two items share an id.
pub fn initialize(config: &Config, items: Vec<Item>) -> Result<AppState> {
    tracing::debug!(
        items = items.len(),
        pointer_threshold = config.pointer_drag_threshold,
        touch_threshold = config.touch_drag_threshold,
        "initializing sortable list"
    );

    let collection = OrderedCollection::new(items)?;
    Ok(AppState::new(collection, config))
}
