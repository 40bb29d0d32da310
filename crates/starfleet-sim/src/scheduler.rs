//! Scheduled-event queue keyed by the simulation clock.
//!
//! Replaces wall-clock timers: every delayed effect is pushed here with a due
//! time and drained by the engine at the start of each active tick. Each entry
//! remembers the mission epoch it was scheduled in, and `pop_due` silently
//! drops entries from an older epoch, so restarting a mission cancels every
//! pending effect of the previous one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use starfleet_core::components::EntityId;

/// A delayed effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Wave-clear pause is over; bring in the next wave.
    SpawnWave,
    /// The game-over beat after the player's hull reached zero.
    MissionFailed,
    TorpedoReloaded,
    KillCamEnd,
    /// Clear the shield bubble on an enemy or ally. No-op if it is gone.
    ShieldFlashEnd { entity: EntityId },
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due_ms: f64,
    seq: u64,
    epoch: u64,
    event: ScheduledEvent,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed: BinaryHeap is a max-heap and we want the earliest entry first,
    // ties broken by insertion order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-queue of scheduled events.
#[derive(Debug, Default)]
pub struct ScheduledQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    epoch: u64,
}

impl ScheduledQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, event: ScheduledEvent) {
        let entry = Entry {
            due_ms: now_ms + delay_ms.max(0.0),
            seq: self.next_seq,
            epoch: self.epoch,
            event,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    /// Pop the next event due at or before `now_ms` from the current epoch.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<ScheduledEvent> {
        while let Some(entry) = self.heap.peek() {
            if entry.due_ms > now_ms {
                return None;
            }
            let entry = self.heap.pop()?;
            if entry.epoch == self.epoch {
                return Some(entry.event);
            }
        }
        None
    }

    /// Start a new epoch. Everything scheduled before this call becomes stale.
    pub fn advance_epoch(&mut self) {
        self.epoch += 1;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Pending entries from the current epoch.
    pub fn pending(&self) -> usize {
        self.heap.iter().filter(|e| e.epoch == self.epoch).count()
    }

    pub fn is_scheduled(&self, event: ScheduledEvent) -> bool {
        self.heap
            .iter()
            .any(|e| e.epoch == self.epoch && e.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_due_order_then_insertion_order() {
        let mut queue = ScheduledQueue::new();
        queue.schedule(0.0, 300.0, ScheduledEvent::SpawnWave);
        queue.schedule(0.0, 100.0, ScheduledEvent::KillCamEnd);
        queue.schedule(0.0, 100.0, ScheduledEvent::TorpedoReloaded);

        assert_eq!(queue.pop_due(50.0), None);
        assert_eq!(queue.pop_due(100.0), Some(ScheduledEvent::KillCamEnd));
        assert_eq!(queue.pop_due(100.0), Some(ScheduledEvent::TorpedoReloaded));
        assert_eq!(queue.pop_due(100.0), None);
        assert_eq!(queue.pop_due(1000.0), Some(ScheduledEvent::SpawnWave));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn new_epoch_discards_pending_events() {
        let mut queue = ScheduledQueue::new();
        queue.schedule(0.0, 2000.0, ScheduledEvent::MissionFailed);
        assert!(queue.is_scheduled(ScheduledEvent::MissionFailed));

        queue.advance_epoch();
        assert!(!queue.is_scheduled(ScheduledEvent::MissionFailed));
        queue.schedule(0.0, 3000.0, ScheduledEvent::SpawnWave);
        assert_eq!(queue.pop_due(5000.0), Some(ScheduledEvent::SpawnWave));
        assert_eq!(queue.pop_due(5000.0), None);
    }
}
