use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::assets::decode::PreparedFrame;
use crate::assets::loader::{FrameLoader, LoadOutcome, LoadTicket};
use crate::assets::locator::FrameSet;
use crate::foundation::core::{FrameIndex, LoadGeneration};

/// Load state of one frame slot.
#[derive(Clone, Debug, Default)]
pub enum FrameSlot {
    /// Requested (or queued) but not yet resolved.
    #[default]
    Unloaded,
    /// Decoded and paintable.
    Loaded(PreparedFrame),
    /// Permanently failed for this frame set; renders as a blank frame.
    Failed,
}

impl FrameSlot {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unloaded)
    }
}

/// Load progress of a frame store. Failed slots count as settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readiness {
    pub loaded: u32,
    pub total: u32,
}

impl Readiness {
    /// Whole percentage, rounded down.
    pub fn percent(self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((u64::from(self.loaded) * 100) / u64::from(self.total)) as u32
    }

    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        f64::from(self.loaded) / f64::from(self.total)
    }

    pub fn is_complete(self) -> bool {
        self.loaded == self.total
    }
}

/// How a completion was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotUpdate {
    /// Written to its slot; `failed` marks a degraded frame.
    Applied {
        index: FrameIndex,
        failed: bool,
        readiness: Readiness,
    },
    /// Belongs to a frame set this store no longer tracks.
    Stale,
    /// The slot was already settled.
    Duplicate,
}

/// Limits on how frame requests are issued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadPolicy {
    /// Maximum outstanding requests. `None` requests every frame up front.
    pub max_in_flight: Option<NonZeroUsize>,
}

/// Ordered collection of frame slots for one frame set.
///
/// Slots are written by index, so completions may arrive in any order. `loaded_count` only grows
/// while the store is alive.
#[derive(Debug)]
pub struct FrameStore {
    frame_set: FrameSet,
    generation: LoadGeneration,
    policy: LoadPolicy,
    slots: Vec<FrameSlot>,
    loaded_count: u32,
    queue: VecDeque<FrameIndex>,
    in_flight: usize,
    torn_down: bool,
}

impl FrameStore {
    /// Create the store for `frame_set` and issue its frame requests.
    pub fn begin_load(
        frame_set: FrameSet,
        generation: LoadGeneration,
        policy: LoadPolicy,
        loader: &mut dyn FrameLoader,
    ) -> Self {
        let n = frame_set.frame_count().get() as usize;
        let mut store = Self {
            queue: frame_set.frame_count().indices().collect(),
            frame_set,
            generation,
            policy,
            slots: vec![FrameSlot::Unloaded; n],
            loaded_count: 0,
            in_flight: 0,
            torn_down: false,
        };
        tracing::debug!(
            generation = generation.0,
            frames = n,
            orientation = ?store.frame_set.orientation(),
            "begin frame set load"
        );
        store.pump(loader);
        store
    }

    fn pump(&mut self, loader: &mut dyn FrameLoader) {
        let cap = self
            .policy
            .max_in_flight
            .map_or(usize::MAX, NonZeroUsize::get);
        while self.in_flight < cap {
            let Some(index) = self.queue.pop_front() else {
                break;
            };
            let ticket = LoadTicket {
                generation: self.generation,
                index,
            };
            self.in_flight += 1;
            loader.request(ticket, &self.frame_set.locate(index));
        }
    }

    /// Record a completion. Late completions from other generations are ignored.
    pub fn on_slot_resolved(
        &mut self,
        ticket: LoadTicket,
        outcome: LoadOutcome,
        loader: &mut dyn FrameLoader,
    ) -> SlotUpdate {
        if self.torn_down || ticket.generation != self.generation {
            tracing::debug!(
                generation = ticket.generation.0,
                index = ticket.index.0,
                "ignoring completion for a discarded frame set"
            );
            return SlotUpdate::Stale;
        }
        let Some(slot) = self.slots.get_mut(ticket.index.as_usize()) else {
            return SlotUpdate::Stale;
        };
        if slot.is_settled() {
            return SlotUpdate::Duplicate;
        }

        let failed = match outcome {
            Ok(frame) => {
                *slot = FrameSlot::Loaded(frame);
                false
            }
            Err(e) => {
                tracing::warn!(
                    index = ticket.index.0,
                    error = %e,
                    "frame failed to load; it will render blank"
                );
                *slot = FrameSlot::Failed;
                true
            }
        };
        self.loaded_count += 1;
        self.in_flight = self.in_flight.saturating_sub(1);

        let readiness = self.readiness();
        tracing::debug!(percent = readiness.percent(), "loading frames");
        self.pump(loader);

        SlotUpdate::Applied {
            index: ticket.index,
            failed,
            readiness,
        }
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            loaded: self.loaded_count,
            total: self.frame_set.frame_count().get(),
        }
    }

    pub fn loaded_count(&self) -> u32 {
        self.loaded_count
    }

    /// Every slot has either loaded or failed.
    pub fn is_fully_settled(&self) -> bool {
        !self.torn_down && self.loaded_count == self.frame_set.frame_count().get()
    }

    pub fn frame_set(&self) -> &FrameSet {
        &self.frame_set
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// Requests issued and not yet resolved.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn slot(&self, index: FrameIndex) -> Option<&FrameSlot> {
        self.slots.get(index.as_usize())
    }

    /// Paintable image at `index`, available as soon as that slot loads.
    pub fn frame(&self, index: FrameIndex) -> Option<&PreparedFrame> {
        match self.slots.get(index.as_usize()) {
            Some(FrameSlot::Loaded(f)) => Some(f),
            _ => None,
        }
    }

    pub fn failed_indices(&self) -> Vec<FrameIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, FrameSlot::Failed))
            .map(|(i, _)| FrameIndex(i as u32))
            .collect()
    }

    /// Release every slot. Completions arriving afterwards are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.slots = Vec::new();
        self.queue.clear();
        self.in_flight = 0;
        self.loaded_count = 0;
        tracing::debug!(generation = self.generation.0, "frame store released");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
