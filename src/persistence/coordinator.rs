//! Optimistic persistence with generation-ordered rollback.
//!
//! A committed reorder is applied to the local collection immediately and a
//! save is requested for it. Every save remembers the order that was on
//! screen just before its gesture, so a failure can put that order back:
//!
//! - the *baseline*: the last order the store is known to hold
//! - one [`PendingSave`] for the most recent generation
//! - older saves a newer commit superseded, until they resolve
//!
//! Only the current save may change the collection when it resolves. A late
//! success for a superseded generation advances the baseline but never
//! touches the collection; a late failure for one is recorded, since the
//! newer save carries the full order.
//!
//! When the current save fails, the collection steps back to its pre-gesture
//! order. If that order belonged to an older save that also failed, the
//! rollback keeps stepping back; if it belongs to an older save still in
//! flight, that save becomes the current one again.

use crate::domain::{Generation, OrderedCollection, SortableError};
use std::collections::BTreeMap;

/// Lifecycle of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    InFlight,
    Committed,
    /// Rejected after a newer save superseded it.
    Failed,
    RolledBack,
}

/// The save for one committed reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSave {
    pub generation: Generation,
    /// Order on screen before the gesture; restored if this save fails.
    pub snapshot: OrderedCollection,
    /// Order the save asks the store to persist.
    pub result: OrderedCollection,
    pub status: SaveStatus,
}

/// What resolving a save response did.
#[derive(Debug)]
pub enum Resolution {
    /// The current save succeeded; nothing visible changes.
    Confirmed { generation: Generation },
    /// The current save failed and the collection was restored.
    ///
    /// `resumed` names the older save, still in flight, whose order is now on
    /// screen.
    RolledBack {
        generation: Generation,
        error: SortableError,
        resumed: Option<Generation>,
    },
    /// A response for a save that a newer commit superseded.
    Superseded {
        generation: Generation,
        succeeded: bool,
    },
    /// A response for an unknown or already resolved generation.
    Ignored { generation: Generation },
}

impl Resolution {
    /// Returns `true` if the collection changed.
    #[must_use]
    pub const fn changed_collection(&self) -> bool {
        matches!(self, Self::RolledBack { .. })
    }
}

/// Owns the pending-save bookkeeping for one collection.
#[derive(Debug, Clone)]
pub struct PersistenceCoordinator {
    generation: Generation,
    baseline: OrderedCollection,
    baseline_generation: Generation,
    pending: Option<PendingSave>,
    superseded: BTreeMap<Generation, PendingSave>,
}

impl PersistenceCoordinator {
    /// Starts tracking `collection`, which the store holds at `generation`.
    #[must_use]
    pub fn new(collection: &OrderedCollection, generation: Generation) -> Self {
        Self {
            generation,
            baseline: collection.clone(),
            baseline_generation: generation,
            pending: None,
            superseded: BTreeMap::new(),
        }
    }

    /// Last generation handed out.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Generation of the order the store is known to hold.
    #[must_use]
    pub const fn baseline_generation(&self) -> Generation {
        self.baseline_generation
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }

    /// Returns `true` while any save, current or superseded, is unresolved.
    #[must_use]
    pub fn has_unresolved_saves(&self) -> bool {
        self.pending.is_some()
            || self
                .superseded
                .values()
                .any(|save| save.status == SaveStatus::InFlight)
    }

    /// Re-anchors on an order loaded from the store.
    ///
    /// Outstanding saves are forgotten; their responses will be ignored.
    pub fn reset(&mut self, collection: &OrderedCollection, generation: Generation) {
        tracing::debug!(%generation, "persistence baseline reset");
        self.generation = self.generation.max(generation);
        self.baseline = collection.clone();
        self.baseline_generation = generation;
        self.pending = None;
        self.superseded.clear();
    }

    /// Applies `next` optimistically and records the save it needs.
    ///
    /// Returns the new generation, or `None` if `next` has the same order as
    /// the collection (nothing to save, nothing to announce).
    pub fn commit(
        &mut self,
        collection: &mut OrderedCollection,
        next: OrderedCollection,
    ) -> Option<Generation> {
        if next.ids() == collection.ids() {
            tracing::debug!("reorder produced the same order, skipping save");
            return None;
        }
        debug_assert!(next.is_permutation_of(collection));

        let generation = self.generation.next();
        self.generation = generation;

        if let Some(previous) = self.pending.take() {
            tracing::debug!(
                superseded = %previous.generation,
                by = %generation,
                "in-flight save superseded"
            );
            self.superseded.insert(previous.generation, previous);
        }

        let snapshot = std::mem::replace(collection, next.clone());
        self.pending = Some(PendingSave {
            generation,
            snapshot,
            result: next,
            status: SaveStatus::InFlight,
        });

        tracing::debug!(%generation, in_flight = self.superseded.len() + 1, "optimistic reorder applied");
        Some(generation)
    }

    /// Applies the store's answer for `generation`.
    ///
    /// `outcome` is `Err(reason)` when the store failed to persist the order.
    pub fn resolve(
        &mut self,
        collection: &mut OrderedCollection,
        generation: Generation,
        outcome: Result<(), String>,
    ) -> Resolution {
        let _span = tracing::debug_span!("resolve_save", %generation, ok = outcome.is_ok()).entered();

        match self.pending.take() {
            Some(mut pending) if pending.generation == generation => match outcome {
                Ok(()) => {
                    pending.status = SaveStatus::Committed;
                    self.baseline = pending.result;
                    self.baseline_generation = generation;
                    self.superseded.clear();
                    tracing::debug!(status = ?pending.status, "save confirmed");
                    Resolution::Confirmed { generation }
                }
                Err(reason) => {
                    pending.status = SaveStatus::RolledBack;
                    *collection = pending.snapshot;
                    let resumed = self.step_back(collection);
                    tracing::warn!(status = ?pending.status, %reason, ?resumed, "save failed, order rolled back");
                    Resolution::RolledBack {
                        generation,
                        error: SortableError::PersistFailed { generation, reason },
                        resumed,
                    }
                }
            },
            other => {
                self.pending = other;
                self.resolve_superseded(generation, outcome.is_ok())
            }
        }
    }

    /// Walks back past superseded saves that failed, restoring each one's
    /// pre-gesture order, until it reaches one still in flight. That save
    /// becomes current again.
    fn step_back(&mut self, collection: &mut OrderedCollection) -> Option<Generation> {
        while let Some((generation, save)) = self.superseded.pop_last() {
            if save.status == SaveStatus::InFlight {
                tracing::debug!(%generation, "older save still in flight, tracking it again");
                self.pending = Some(save);
                return Some(generation);
            }
            tracing::debug!(%generation, "older save failed too, stepping back past it");
            *collection = save.snapshot;
        }
        None
    }

    fn resolve_superseded(&mut self, generation: Generation, succeeded: bool) -> Resolution {
        let Some(save) = self
            .superseded
            .get_mut(&generation)
            .filter(|save| save.status == SaveStatus::InFlight)
        else {
            tracing::debug!("response for unknown or resolved generation ignored");
            return Resolution::Ignored { generation };
        };

        if !succeeded {
            save.status = SaveStatus::Failed;
            tracing::debug!("superseded save failed, newer save carries the order");
        } else if generation > self.baseline_generation {
            if let Some(save) = self.superseded.remove(&generation) {
                self.baseline = save.result;
                self.baseline_generation = generation;
            }
            self.superseded.retain(|older, _| *older > generation);
            tracing::debug!("superseded save succeeded, baseline advanced");
        } else {
            self.superseded.remove(&generation);
            tracing::debug!("superseded save older than baseline discarded");
        }

        Resolution::Superseded {
            generation,
            succeeded,
        }
    }
}
