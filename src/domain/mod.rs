//! Domain layer: items, the ordered collection and the reorder engine.
//!
//! Nothing in this module knows about input devices, views or storage. The
//! reorder functions are pure; the collection exposes no mutators of its own.
//!
//! # Organization
//!
//! - [`error`]: Error types and result alias
//! - [`item`]: Item identity and payload
//! - [`collection`]: The ordered, duplicate-free collection
//! - [`generation`]: Monotonic versions used to order saves
//! - [`reorder`]: Permutation functions (`move_item`, `move_many`)
//!
//! # Examples
//!
//! ```
//! use sortable::domain::{reorder, Item, OrderedCollection, Result};
//!
//! fn swap_first_two(list: &OrderedCollection) -> Result<OrderedCollection> {
//!     reorder::move_item(list, 0, 1)
//! }
//!
//! let list = OrderedCollection::new(vec![Item::new("a", "A"), Item::new("b", "B")])?;
//! assert_eq!(swap_first_two(&list)?.ids()[0].as_str(), "b");
//! # Ok::<(), sortable::SortableError>(())
//! ```

pub mod collection;
pub mod error;
pub mod generation;
pub mod item;
pub mod reorder;

pub use collection::OrderedCollection;
pub use error::{GestureConflict, Result, SortableError};
pub use generation::Generation;
pub use item::{Item, ItemId};
