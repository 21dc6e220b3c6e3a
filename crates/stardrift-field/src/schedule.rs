//! Scheduled-command queue: all deferred work in the engine is a
//! `(fire_at, command)` record popped by the single update loop. No
//! closures capture entity identity; every id-bearing command is
//! re-validated against the pool when it fires.

use stardrift_core::EntityId;
use std::collections::BinaryHeap;

/// Deferred work items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Attempt one factory creation + pool insertion
    SpawnUnit,
    /// FadingIn -> Active, then start the glitter sub-loop
    FinishFadeIn(EntityId),
    /// Begin one glitter perturbation and re-schedule the next
    GlitterPulse(EntityId),
    /// FadingOut -> deletion
    FinishFadeOut(EntityId),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    fire_at: f64,
    /// Insertion sequence; ties on `fire_at` fire in schedule order
    seq: u64,
    command: Command,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap, we want earliest-first
        other
            .fire_at
            .total_cmp(&self.fire_at)
            .then(other.seq.cmp(&self.seq))
    }
}

/// Min-heap of scheduled commands keyed by fire time
pub struct CommandQueue {
    heap: BinaryHeap<Scheduled>,
    seq: u64,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn schedule(&mut self, fire_at: f64, command: Command) {
        self.heap.push(Scheduled {
            fire_at,
            seq: self.seq,
            command,
        });
        self.seq += 1;
    }

    /// Pop the earliest command whose fire time has passed, together with
    /// that fire time. Consumers run the command at its scheduled instant,
    /// not at the frame time it happened to be drained on, so staggered
    /// work keeps distinct timestamps even when a slow frame makes several
    /// commands due at once.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, Command)> {
        if self.heap.peek().is_some_and(|s| s.fire_at <= now) {
            self.heap.pop().map(|s| (s.fire_at, s.command))
        } else {
            None
        }
    }

    /// Cancel all pending work (engine teardown)
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
