//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes device input, view
//! updates and store responses, translating them into state changes and
//! action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the view layer or the store worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. Input events go through the pointer or keyboard adapter, which move the
//!    gesture tracker; a committed gesture is applied to the collection here
//! 4. Actions are collected and returned for execution
//!
//! The collection changes in exactly three places: a committed gesture, a
//! rollback after a failed save, and an order loaded from (or pushed by) the
//! outside.
//!
//! # Example
//!
//! ```rust
//! use sortable::app::{handle_event, AppState, Event};
//! use sortable::input::Direction;
//! use sortable::{Config, Item, ItemId, OrderedCollection};
//!
//! let items = vec![Item::new("a", "A"), Item::new("b", "B")];
//! let mut state = AppState::new(OrderedCollection::new(items)?, &Config::default());
//! handle_event(&mut state, &Event::Focus { item: ItemId::from("a") })?;
//! let (render, actions) = handle_event(&mut state, &Event::KeyMove { direction: Direction::Down })?;
//! assert!(render);
//! assert_eq!(actions.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::reorder::{apply_stored_order, move_item, move_many};
use crate::domain::{Item, ItemId, OrderedCollection};
use crate::gesture::{Gesture, InputOwner, Modality, Point};
use crate::input::{AdapterOutcome, Direction, InputContext, RowLayout};
use crate::persistence::Resolution;
use crate::storage::OrderRecord;
use crate::ui::Notification;
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};

/// Kind of device behind a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Mouse or pen.
    #[default]
    Mouse,
    Touch,
}

impl PointerKind {
    const fn owner(self, pointer_id: u64) -> InputOwner {
        match self {
            Self::Mouse => InputOwner::Pointer(pointer_id),
            Self::Touch => InputOwner::Touch(pointer_id),
        }
    }
}

/// Events from the view layer or the store worker.
///
/// Serialized with a `type` tag so hosts (and the replay driver) can feed
/// them as JSON, e.g. `{"type":"key_move","direction":"down"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Pointer-down or touch-start on the row of `item`.
    PointerDown {
        pointer_id: u64,
        #[serde(default)]
        kind: PointerKind,
        item: ItemId,
        x: f64,
        y: f64,
    },
    /// Pointer or touch movement.
    PointerMove {
        pointer_id: u64,
        #[serde(default)]
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    /// Pointer-up or touch-end.
    PointerUp {
        pointer_id: u64,
        #[serde(default)]
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    /// The system took the pointer or touch away.
    PointerCancel {
        pointer_id: u64,
        #[serde(default)]
        kind: PointerKind,
    },

    /// Move the focused item one position.
    KeyMove { direction: Direction },
    /// Pick up the focused item.
    KeyGrab,
    /// Move the drop position of the grabbed item.
    KeyStep { direction: Direction },
    /// Drop the grabbed item.
    KeyDrop,
    /// Cancel whatever gesture is in progress.
    Escape,

    /// Keyboard focus moved to `item`.
    Focus { item: ItemId },
    /// Add or remove `item` from the selection.
    ToggleSelect { item: ItemId },
    /// Select the range from the anchor to `item`.
    ExtendSelect { item: ItemId },
    ClearSelection,

    /// The view rendered and reports the new row geometry.
    LayoutChanged { layout: RowLayout },
    /// The host replaced the items (added, removed or edited some).
    ItemsChanged { items: Vec<Item> },

    /// Wraps a response from the store worker.
    WorkerResponse { response: WorkerResponse },
}

impl Event {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerCancel { .. } => "pointer_cancel",
            Self::KeyMove { .. } => "key_move",
            Self::KeyGrab => "key_grab",
            Self::KeyStep { .. } => "key_step",
            Self::KeyDrop => "key_drop",
            Self::Escape => "escape",
            Self::Focus { .. } => "focus",
            Self::ToggleSelect { .. } => "toggle_select",
            Self::ExtendSelect { .. } => "extend_select",
            Self::ClearSelection => "clear_selection",
            Self::LayoutChanged { .. } => "layout_changed",
            Self::ItemsChanged { .. } => "items_changed",
            Self::WorkerResponse { .. } => "worker_response",
        }
    }
}

/// Actions to run once when the list is shown: load the stored order.
#[must_use]
pub fn startup_actions() -> Vec<Action> {
    vec![Action::PostToStore(WorkerMessage::load_order())]
}

/// Processes an event, mutates state, and returns whether to re-render along
/// with the actions to execute.
///
/// # Errors
///
/// Returns an error if a committed gesture resolves to an invalid reorder
/// (an adapter bug) or if [`Event::ItemsChanged`] carries duplicate ids.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.kind_name()).entered();

    let outcome = match event {
        Event::PointerDown {
            pointer_id,
            kind,
            item,
            x,
            y,
        } => {
            let ctx = InputContext {
                collection: &state.collection,
                layout: &state.layout,
                selection: &state.selection,
            };
            state
                .pointer
                .press(&mut state.tracker, &ctx, kind.owner(*pointer_id), item, Point::new(*x, *y))
        }
        Event::PointerMove { pointer_id, kind, x, y } => {
            let ctx = InputContext {
                collection: &state.collection,
                layout: &state.layout,
                selection: &state.selection,
            };
            state
                .pointer
                .motion(&mut state.tracker, &ctx, kind.owner(*pointer_id), Point::new(*x, *y))
        }
        Event::PointerUp { pointer_id, kind, x, y } => {
            let ctx = InputContext {
                collection: &state.collection,
                layout: &state.layout,
                selection: &state.selection,
            };
            state
                .pointer
                .release(&mut state.tracker, &ctx, kind.owner(*pointer_id), Point::new(*x, *y))
        }
        Event::PointerCancel { pointer_id, kind } => {
            state.pointer.interrupt(&mut state.tracker, kind.owner(*pointer_id))
        }
        Event::KeyMove { direction } => {
            let Some(focused) = state.focus.clone() else {
                tracing::debug!("keyboard move without focus ignored");
                return Ok((false, vec![]));
            };
            let ctx = InputContext {
                collection: &state.collection,
                layout: &state.layout,
                selection: &state.selection,
            };
            state.keyboard.move_focused(&mut state.tracker, &ctx, &focused, *direction)
        }
        Event::KeyGrab => {
            let Some(focused) = state.focus.clone() else {
                tracing::debug!("keyboard grab without focus ignored");
                return Ok((false, vec![]));
            };
            let ctx = InputContext {
                collection: &state.collection,
                layout: &state.layout,
                selection: &state.selection,
            };
            state.keyboard.grab(&mut state.tracker, &ctx, &focused)
        }
        Event::KeyStep { direction } => {
            let ctx = InputContext {
                collection: &state.collection,
                layout: &state.layout,
                selection: &state.selection,
            };
            state.keyboard.step(&mut state.tracker, &ctx, *direction)
        }
        Event::KeyDrop => state.keyboard.drop_grabbed(&mut state.tracker),
        Event::Escape => state
            .tracker
            .cancel_any()
            .map_or(AdapterOutcome::Ignored, AdapterOutcome::Cancelled),

        Event::Focus { item } => return Ok(handle_focus(state, item)),
        Event::ToggleSelect { item } => {
            if !state.collection.contains(item) {
                return Ok((false, vec![]));
            }
            let selected = state.selection.toggle(item.clone());
            tracing::debug!(item = %item, selected, size = state.selection.len(), "selection toggled");
            return Ok((true, vec![]));
        }
        Event::ExtendSelect { item } => {
            if !state.collection.contains(item) {
                return Ok((false, vec![]));
            }
            state.selection.extend_to(item.clone(), &state.collection);
            tracing::debug!(item = %item, size = state.selection.len(), "selection extended");
            return Ok((true, vec![]));
        }
        Event::ClearSelection => {
            let had_selection = !state.selection.is_empty();
            state.selection.clear();
            return Ok((had_selection, vec![]));
        }

        Event::LayoutChanged { layout } => {
            tracing::trace!(rows = layout.rows().len(), "row layout updated");
            state.layout = layout.clone();
            return Ok((false, vec![]));
        }
        Event::ItemsChanged { items } => {
            let collection = OrderedCollection::new(items.clone())?;
            return Ok(replace_collection(state, collection));
        }

        Event::WorkerResponse { response } => return Ok(handle_worker_response(state, response)),
    };

    handle_outcome(state, outcome)
}

/// Turns an adapter outcome into a render decision and actions.
fn handle_outcome(state: &mut AppState, outcome: AdapterOutcome) -> Result<(bool, Vec<Action>)> {
    let render = outcome.needs_render();
    match outcome {
        AdapterOutcome::Commit(gesture) => {
            let actions = apply_gesture(state, &gesture)?;
            Ok((render, actions))
        }
        AdapterOutcome::Cancelled(gesture) => {
            tracing::debug!(owner = ?gesture.owner, source_id = %gesture.source_id, "gesture cancelled");
            Ok((render, vec![]))
        }
        AdapterOutcome::Clicked(gesture) => {
            tracing::debug!(source_id = %gesture.source_id, "press released without drag");
            Ok((render, vec![]))
        }
        AdapterOutcome::Conflict => {
            tracing::debug!("input ignored, another gesture is active");
            Ok((false, vec![]))
        }
        other => {
            tracing::trace!(outcome = ?other, "adapter outcome");
            Ok((render, vec![]))
        }
    }
}

/// Applies a committed gesture: reorder, optimistic update, save request and
/// announcement.
///
/// The source is looked up again by id; a rollback may have moved it since
/// the gesture was armed.
fn apply_gesture(state: &mut AppState, gesture: &Gesture) -> Result<Vec<Action>> {
    let Some(target) = gesture.hover_index else {
        return Ok(vec![]);
    };
    let Some(source_index) = state.collection.index_of(&gesture.source_id) else {
        tracing::debug!(source_id = %gesture.source_id, "source item is gone, gesture dropped");
        return Ok(vec![]);
    };

    let _span = tracing::debug_span!("apply_gesture",
        source_index,
        target,
        moving = gesture.selected_ids.len(),
        modality = ?gesture.modality()
    )
    .entered();

    let len = state.collection.len();
    let moving: Vec<ItemId> = gesture
        .selected_ids
        .iter()
        .filter(|id| state.collection.contains(id))
        .cloned()
        .collect();

    let next = if moving.len() > 1 {
        move_many(&state.collection, &moving, target.min(len - moving.len()))?
    } else {
        move_item(&state.collection, source_index, target.min(len.saturating_sub(1)))?
    };

    let Some(generation) = state.coordinator.commit(&mut state.collection, next) else {
        return Ok(vec![]);
    };

    let mut actions = vec![Action::PostToStore(WorkerMessage::save_order(
        state.collection.ids().to_vec(),
        generation,
    ))];

    // A block is announced by its first row.
    let lead = state
        .collection
        .ids()
        .iter()
        .find(|id| moving.contains(*id))
        .unwrap_or(&gesture.source_id);
    if let Some(notification) = moved_notification(&state.collection, lead, moving.len()) {
        tracing::info!(message = %notification.message(), %generation, "item moved");
        actions.push(Action::Notify(notification));
    }

    if gesture.modality() == Modality::Keyboard {
        state.focus = Some(gesture.source_id.clone());
        actions.push(Action::SetFocus(gesture.source_id.clone()));
    }

    Ok(actions)
}

fn moved_notification(collection: &OrderedCollection, id: &ItemId, count: usize) -> Option<Notification> {
    let index = collection.index_of(id)?;
    let item = collection.get(id)?;
    Some(Notification::Moved {
        id: id.clone(),
        label: item.label.clone(),
        position: index + 1,
        len: collection.len(),
        count: count.max(1),
    })
}

fn handle_focus(state: &mut AppState, item: &ItemId) -> (bool, Vec<Action>) {
    if !state.collection.contains(item) {
        tracing::debug!(item = %item, "focus on unknown item ignored");
        return (false, vec![]);
    }
    if state.focus.as_ref() == Some(item) {
        return (false, vec![]);
    }
    state.focus = Some(item.clone());
    (true, vec![])
}

/// Adopts a collection pushed by the host.
///
/// A gesture whose source item disappeared is cancelled; selection and focus
/// forget removed items. Outstanding saves are abandoned.
fn replace_collection(state: &mut AppState, collection: OrderedCollection) -> (bool, Vec<Action>) {
    let source_gone = state
        .tracker
        .current()
        .is_some_and(|gesture| !collection.contains(&gesture.source_id));
    if source_gone {
        if let Some(gesture) = state.tracker.cancel_any() {
            tracing::debug!(source_id = %gesture.source_id, "source item removed, gesture cancelled");
        }
    }

    state.selection.retain_existing(&collection);
    if state.focus.as_ref().is_some_and(|id| !collection.contains(id)) {
        state.focus = None;
    }

    let generation = state.coordinator.generation();
    state.coordinator.reset(&collection, generation);
    state.collection = collection;

    tracing::debug!(len = state.collection.len(), "collection replaced");
    (true, vec![])
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::OrderLoaded { record } => handle_order_loaded(state, record.as_ref()),
        WorkerResponse::OrderSaved { generation } => {
            let resolution = state.coordinator.resolve(&mut state.collection, *generation, Ok(()));
            (matches!(resolution, Resolution::Confirmed { .. }), vec![])
        }
        WorkerResponse::SaveFailed { generation, message } => {
            let resolution = state
                .coordinator
                .resolve(&mut state.collection, *generation, Err(message.clone()));
            match resolution {
                Resolution::RolledBack {
                    generation,
                    error,
                    resumed,
                } => {
                    tracing::warn!(error = %error, resumed = ?resumed, "order restored after failed save");
                    state.selection.retain_existing(&state.collection);
                    (
                        true,
                        vec![Action::Notify(Notification::PersistFailed {
                            generation,
                            reason: message.clone(),
                        })],
                    )
                }
                _ => (false, vec![]),
            }
        }
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            (false, vec![])
        }
    }
}

/// Applies the stored order, unless a local commit is already newer.
fn handle_order_loaded(state: &mut AppState, record: Option<&OrderRecord>) -> (bool, Vec<Action>) {
    let Some(record) = record else {
        tracing::debug!("no stored order, keeping initial order");
        return (false, vec![]);
    };

    if state.coordinator.generation() > record.generation {
        tracing::debug!(
            stored = %record.generation,
            local = %state.coordinator.generation(),
            "stored order is older than local commits, ignoring"
        );
        return (false, vec![]);
    }

    let loaded = apply_stored_order(&state.collection, &record.ids);
    let changed = loaded.ids() != state.collection.ids();
    state.coordinator.reset(&loaded, record.generation);
    state.collection = loaded;

    tracing::debug!(generation = %record.generation, changed, "stored order applied");
    (changed, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Generation;
    use crate::Config;

    fn state(ids: &[&str]) -> AppState {
        let items = ids.iter().map(|id| Item::new(*id, id.to_uppercase())).collect();
        let collection = OrderedCollection::new(items).unwrap();
        let layout = RowLayout::uniform(collection.ids(), 0.0, 20.0);
        AppState::new(collection, &Config::default()).with_layout(layout)
    }

    fn order(state: &AppState) -> Vec<&str> {
        state.collection.ids().iter().map(ItemId::as_str).collect()
    }

    fn saved_generation(actions: &[Action]) -> Generation {
        actions
            .iter()
            .find_map(|action| match action {
                Action::PostToStore(WorkerMessage::SaveOrder { generation, .. }) => Some(*generation),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn pointer_drag_commits_once() {
        let mut state = state(&["a", "b", "c", "d"]);

        let down = Event::PointerDown {
            pointer_id: 1,
            kind: PointerKind::Mouse,
            item: ItemId::from("a"),
            x: 5.0,
            y: 10.0,
        };
        handle_event(&mut state, &down).unwrap();
        handle_event(&mut state, &Event::PointerMove { pointer_id: 1, kind: PointerKind::Mouse, x: 5.0, y: 50.0 }).unwrap();
        let (render, actions) =
            handle_event(&mut state, &Event::PointerUp { pointer_id: 1, kind: PointerKind::Mouse, x: 5.0, y: 50.0 }).unwrap();

        assert!(render);
        assert_eq!(order(&state), ["b", "c", "a", "d"]);
        assert_eq!(saved_generation(&actions), Generation::new(1));
        assert!(actions.contains(&Action::Notify(Notification::Moved {
            id: ItemId::from("a"),
            label: "A".into(),
            position: 3,
            len: 4,
            count: 1,
        })));
        assert!(state.tracker.is_idle());
    }

    #[test]
    fn release_outside_rows_cancels() {
        let mut state = state(&["a", "b", "c"]);
        handle_event(
            &mut state,
            &Event::PointerDown { pointer_id: 1, kind: PointerKind::Touch, item: ItemId::from("b"), x: 0.0, y: 30.0 },
        )
        .unwrap();
        handle_event(&mut state, &Event::PointerMove { pointer_id: 1, kind: PointerKind::Touch, x: 0.0, y: 200.0 }).unwrap();
        let (_, actions) =
            handle_event(&mut state, &Event::PointerUp { pointer_id: 1, kind: PointerKind::Touch, x: 0.0, y: 200.0 }).unwrap();

        assert!(actions.is_empty());
        assert_eq!(order(&state), ["a", "b", "c"]);
    }

    #[test]
    fn failed_save_rolls_back_and_announces_once() {
        let mut state = state(&["a", "b", "c"]);
        handle_event(&mut state, &Event::Focus { item: ItemId::from("a") }).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::KeyMove { direction: Direction::Down }).unwrap();
        let generation = saved_generation(&actions);
        assert!(actions.contains(&Action::SetFocus(ItemId::from("a"))));

        let failed = Event::WorkerResponse {
            response: WorkerResponse::SaveFailed { generation, message: "offline".into() },
        };
        let (render, actions) = handle_event(&mut state, &failed).unwrap();
        assert!(render);
        assert_eq!(order(&state), ["a", "b", "c"]);
        assert_eq!(actions.len(), 1);

        let (render, actions) = handle_event(&mut state, &failed).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn removed_source_cancels_grab() {
        let mut state = state(&["a", "b", "c"]);
        handle_event(&mut state, &Event::Focus { item: ItemId::from("b") }).unwrap();
        handle_event(&mut state, &Event::KeyGrab).unwrap();
        assert!(state.tracker.is_active());

        let items = vec![Item::new("a", "A"), Item::new("c", "C")];
        handle_event(&mut state, &Event::ItemsChanged { items }).unwrap();
        assert!(state.tracker.is_idle());
        assert!(state.focus.is_none());

        let (_, actions) = handle_event(&mut state, &Event::KeyDrop).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn stored_order_is_applied_on_load() {
        let mut state = state(&["a", "b", "c"]);
        let record = OrderRecord::new(vec![ItemId::from("c"), ItemId::from("a")], Generation::new(4));
        let loaded = Event::WorkerResponse { response: WorkerResponse::OrderLoaded { record: Some(record) } };

        let (render, _) = handle_event(&mut state, &loaded).unwrap();
        assert!(render);
        assert_eq!(order(&state), ["c", "a", "b"]);
        assert_eq!(state.coordinator.generation(), Generation::new(4));
    }

    #[test]
    fn events_parse_from_tagged_json() {
        let event: Event = serde_json::from_str(r#"{"type":"key_move","direction":"down"}"#).unwrap();
        assert_eq!(event, Event::KeyMove { direction: Direction::Down });

        let event: Event =
            serde_json::from_str(r#"{"type":"pointer_down","pointer_id":2,"item":"a","x":1.0,"y":2.0}"#).unwrap();
        assert!(matches!(event, Event::PointerDown { kind: PointerKind::Mouse, .. }));
    }
}
