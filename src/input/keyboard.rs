//! Keyboard adapter.
//!
//! Two interaction styles are supported:
//!
//! - **Move keys** (`move_up` / `move_down`): one keystroke arms, activates and
//!   commits a gesture that shifts the focused item by one position.
//! - **Grab mode** (`grab`, `step`, `drop`, Escape): the focused item is picked
//!   up, the drop position is stepped with the arrow keys, and the move is
//!   committed on drop. This mirrors a pointer drag for users who cannot use
//!   one.
//!
//! Both clamp at the ends of the list: a move that would leave the list is a
//! no-op reported as [`AdapterOutcome::AtBoundary`].

use super::{AdapterOutcome, InputContext};
use crate::domain::ItemId;
use crate::gesture::{Gesture, GestureTracker, InputOwner};
use serde::{Deserialize, Serialize};

/// Direction of a keyboard move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Translates keyboard commands into gesture transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardAdapter;

impl KeyboardAdapter {
    const OWNER: InputOwner = InputOwner::Keyboard;

    /// Moves the focused item (or the selection block containing it) one
    /// position in `direction`, as a single atomic gesture.
    pub fn move_focused(
        &self,
        tracker: &mut GestureTracker,
        ctx: &InputContext<'_>,
        focused: &ItemId,
        direction: Direction,
    ) -> AdapterOutcome {
        let Some((gesture, position, last)) = Self::prepare(ctx, focused) else {
            return AdapterOutcome::Ignored;
        };

        let Some(target) = Self::neighbour(position, last, direction) else {
            tracing::debug!(item = %focused, ?direction, "keyboard move clamped at boundary");
            return AdapterOutcome::AtBoundary;
        };

        if tracker.arm(gesture).is_err() {
            return AdapterOutcome::Conflict;
        }
        tracker.activate(Self::OWNER);
        tracker.update_hover(Self::OWNER, Some(target));
        tracker
            .commit(Self::OWNER)
            .map_or(AdapterOutcome::Ignored, AdapterOutcome::Commit)
    }

    /// Picks up the focused item; the drop position starts where it is.
    pub fn grab(
        &self,
        tracker: &mut GestureTracker,
        ctx: &InputContext<'_>,
        focused: &ItemId,
    ) -> AdapterOutcome {
        let Some((gesture, position, _)) = Self::prepare(ctx, focused) else {
            return AdapterOutcome::Ignored;
        };

        if tracker.arm(gesture).is_err() {
            return AdapterOutcome::Conflict;
        }
        tracker.activate(Self::OWNER);
        tracker.update_hover(Self::OWNER, Some(position));
        AdapterOutcome::Activated
    }

    /// Moves the drop position of a grabbed item by one step.
    pub fn step(
        &self,
        tracker: &mut GestureTracker,
        ctx: &InputContext<'_>,
        direction: Direction,
    ) -> AdapterOutcome {
        let Some(gesture) = tracker.active().filter(|gesture| gesture.owner == Self::OWNER) else {
            return AdapterOutcome::Ignored;
        };

        let last = Self::last_position(ctx, gesture.selected_ids.len());
        let current = gesture.hover_index.unwrap_or(gesture.source_index).min(last);
        let Some(target) = Self::neighbour(current, last, direction) else {
            return AdapterOutcome::AtBoundary;
        };

        if tracker.update_hover(Self::OWNER, Some(target)) {
            AdapterOutcome::HoverChanged
        } else {
            AdapterOutcome::Unchanged
        }
    }

    /// Drops a grabbed item at its current drop position.
    pub fn drop_grabbed(&self, tracker: &mut GestureTracker) -> AdapterOutcome {
        tracker
            .commit(Self::OWNER)
            .map_or(AdapterOutcome::Ignored, AdapterOutcome::Commit)
    }

    /// Builds the gesture for `focused` and returns it with the current block
    /// position and the last valid position.
    fn prepare(ctx: &InputContext<'_>, focused: &ItemId) -> Option<(Gesture, usize, usize)> {
        let source_index = ctx.collection.index_of(focused)?;
        let moving = ctx.moving_ids(focused);
        let position = if moving.len() > 1 {
            ctx.block_position(&moving)
        } else {
            source_index
        };
        let last = Self::last_position(ctx, moving.len());

        let gesture = Gesture::single(Self::OWNER, source_index, focused.clone()).with_selection(moving);
        Some((gesture, position, last))
    }

    /// Highest position a block of `block_len` items can take.
    fn last_position(ctx: &InputContext<'_>, block_len: usize) -> usize {
        ctx.collection.len().saturating_sub(block_len.max(1))
    }

    const fn neighbour(position: usize, last: usize, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Up if position > 0 => Some(position - 1),
            Direction::Down if position < last => Some(position + 1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, OrderedCollection};
    use crate::input::RowLayout;
    use crate::selection::SelectionSet;

    fn collection() -> OrderedCollection {
        OrderedCollection::new(
            ["a", "b", "c", "d"].into_iter().map(|id| Item::new(id, id)).collect(),
        )
        .unwrap()
    }

    fn ctx<'a>(
        collection: &'a OrderedCollection,
        layout: &'a RowLayout,
        selection: &'a SelectionSet,
    ) -> InputContext<'a> {
        InputContext {
            collection,
            layout,
            selection,
        }
    }

    #[test]
    fn move_down_commits_in_one_keystroke() {
        let (list, layout, selection) = (collection(), RowLayout::default(), SelectionSet::new());
        let mut tracker = GestureTracker::new();

        let outcome = KeyboardAdapter.move_focused(
            &mut tracker,
            &ctx(&list, &layout, &selection),
            &"b".into(),
            Direction::Down,
        );
        let AdapterOutcome::Commit(gesture) = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert_eq!((gesture.source_index, gesture.hover_index), (1, Some(2)));
        assert!(tracker.is_idle());
    }

    #[test]
    fn moves_past_either_end_are_clamped() {
        let (list, layout, selection) = (collection(), RowLayout::default(), SelectionSet::new());
        let ctx = ctx(&list, &layout, &selection);
        let mut tracker = GestureTracker::new();

        assert_eq!(
            KeyboardAdapter.move_focused(&mut tracker, &ctx, &"a".into(), Direction::Up),
            AdapterOutcome::AtBoundary
        );
        assert_eq!(
            KeyboardAdapter.move_focused(&mut tracker, &ctx, &"d".into(), Direction::Down),
            AdapterOutcome::AtBoundary
        );
        assert!(tracker.is_idle());
    }

    #[test]
    fn selection_block_moves_by_block_position() {
        let (list, layout) = (collection(), RowLayout::default());
        let mut selection = SelectionSet::new();
        selection.toggle("c".into());
        selection.toggle("d".into());
        let ctx = ctx(&list, &layout, &selection);
        let mut tracker = GestureTracker::new();

        assert_eq!(
            KeyboardAdapter.move_focused(&mut tracker, &ctx, &"d".into(), Direction::Down),
            AdapterOutcome::AtBoundary
        );
        let AdapterOutcome::Commit(gesture) =
            KeyboardAdapter.move_focused(&mut tracker, &ctx, &"d".into(), Direction::Up)
        else {
            panic!("expected commit");
        };
        assert_eq!(gesture.hover_index, Some(1));
        assert_eq!(gesture.selected_ids.len(), 2);
    }

    #[test]
    fn grab_step_and_drop() {
        let (list, layout, selection) = (collection(), RowLayout::default(), SelectionSet::new());
        let ctx = ctx(&list, &layout, &selection);
        let mut tracker = GestureTracker::new();

        assert_eq!(KeyboardAdapter.grab(&mut tracker, &ctx, &"b".into()), AdapterOutcome::Activated);
        assert_eq!(KeyboardAdapter.step(&mut tracker, &ctx, Direction::Down), AdapterOutcome::HoverChanged);
        assert_eq!(KeyboardAdapter.step(&mut tracker, &ctx, Direction::Down), AdapterOutcome::HoverChanged);
        assert_eq!(KeyboardAdapter.step(&mut tracker, &ctx, Direction::Down), AdapterOutcome::AtBoundary);

        let AdapterOutcome::Commit(gesture) = KeyboardAdapter.drop_grabbed(&mut tracker) else {
            panic!("expected commit");
        };
        assert_eq!(gesture.hover_index, Some(3));
    }

    #[test]
    fn keyboard_cannot_grab_during_pointer_drag() {
        let (list, layout, selection) = (collection(), RowLayout::default(), SelectionSet::new());
        let ctx = ctx(&list, &layout, &selection);
        let mut tracker = GestureTracker::new();
        let pointer = InputOwner::Pointer(1);
        tracker.arm(Gesture::single(pointer, 0, "a".into())).unwrap();
        tracker.activate(pointer);

        assert_eq!(
            KeyboardAdapter.move_focused(&mut tracker, &ctx, &"c".into(), Direction::Up),
            AdapterOutcome::Conflict
        );
        assert!(tracker.is_owned_by(pointer));
    }
}
