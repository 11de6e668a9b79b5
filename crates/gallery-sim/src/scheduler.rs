//! Deferred actions keyed to session time.
//!
//! Removal delays, respawn delays and post-hit projectile releases are all
//! "do X when the session clock reaches T". The engine drains due actions
//! once per tick. `cancel_all` bumps the epoch; entries stamped with an
//! older epoch are dropped when they come due.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gallery_core::constants::TIME_EPSILON;
use gallery_core::types::{PoolHandle, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Removal delay elapsed: target goes back to its pool.
    ReleaseTarget(TargetId),
    /// Post-hit delay elapsed: embedded projectile goes back to its pool.
    ReleaseProjectile(PoolHandle),
    /// Respawn delay elapsed. Honored only if the token is still current.
    Respawn { token: u64 },
}

#[derive(Debug)]
struct Entry {
    due: f64,
    seq: u64,
    epoch: u64,
    action: DeferredAction,
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
    // Reversed so BinaryHeap pops the earliest due time, then the earliest scheduled.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    epoch: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: f64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            due,
            seq,
            epoch: self.epoch,
            action,
        });
    }

    /// Pop every action due at or before `now`, in due order.
    pub fn drain_due(&mut self, now: f64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        while self
            .queue
            .peek()
            .is_some_and(|e| e.due <= now + TIME_EPSILON)
        {
            let Some(entry) = self.queue.pop() else {
                break;
            };
            if entry.epoch == self.epoch {
                due.push(entry.action);
            }
        }
        due
    }

    /// Invalidate everything scheduled so far.
    pub fn cancel_all(&mut self) {
        self.epoch += 1;
        self.queue.clear();
    }

    /// Live (current-epoch) entries still waiting.
    pub fn pending(&self) -> usize {
        self.queue.iter().filter(|e| e.epoch == self.epoch).count()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2.0, DeferredAction::Respawn { token: 2 });
        scheduler.schedule(1.0, DeferredAction::Respawn { token: 1 });
        scheduler.schedule(3.0, DeferredAction::Respawn { token: 3 });

        assert!(scheduler.drain_due(0.5).is_empty());
        assert_eq!(
            scheduler.drain_due(2.0),
            vec![
                DeferredAction::Respawn { token: 1 },
                DeferredAction::Respawn { token: 2 }
            ]
        );
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_same_due_time_keeps_insertion_order() {
        let mut scheduler = Scheduler::new();
        for token in 0..4 {
            scheduler.schedule(1.0, DeferredAction::Respawn { token });
        }
        let tokens: Vec<u64> = scheduler
            .drain_due(1.0)
            .into_iter()
            .map(|a| match a {
                DeferredAction::Respawn { token } => token,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(tokens, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cancel_all_invalidates_pending() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, DeferredAction::Respawn { token: 0 });
        scheduler.cancel_all();
        assert!(scheduler.queue.is_empty());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.epoch(), 1);
        assert!(scheduler.drain_due(10.0).is_empty());

        scheduler.schedule(11.0, DeferredAction::Respawn { token: 1 });
        assert_eq!(scheduler.drain_due(11.0).len(), 1);
    }

    #[test]
    fn test_accumulated_float_time_still_fires() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1.0, DeferredAction::Respawn { token: 0 });
        let mut now = 0.0;
        for _ in 0..30 {
            now += 1.0 / 30.0;
        }
        assert_eq!(scheduler.drain_due(now).len(), 1);
    }
}
