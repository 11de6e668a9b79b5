//! Keeps a line of targets populated.
//!
//! The coordinator owns the authoritative active-target count. Every target
//! leaving Active must be reported through `notify_removed` exactly once; when
//! the count hits zero a single debounced respawn is scheduled.

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use gallery_core::config::SpawnConfig;
use gallery_core::enums::{MovementPattern, TargetKind};
use gallery_core::types::TargetId;

use crate::scheduler::{DeferredAction, Scheduler};
use crate::target::TargetPools;

/// What an evaluation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: Vec<TargetId>,
    /// Targets that were still Active when the line was swept back to the
    /// pools because the active count overshot the desired count.
    pub force_returned: usize,
}

#[derive(Debug, Clone)]
pub struct SpawnCoordinator {
    desired_count: u32,
    active_count: u32,
    running: bool,
    respawn_scheduled: bool,
    /// Bumped whenever a pending respawn must be invalidated.
    respawn_token: u64,
    line_center: DVec3,
    spacing: f64,
    respawn_delay: f64,
    moving_chance: f64,
}

impl SpawnCoordinator {
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            desired_count: config.desired_count,
            active_count: 0,
            running: false,
            respawn_scheduled: false,
            respawn_token: 0,
            line_center: config.line_center,
            spacing: config.spacing,
            respawn_delay: config.respawn_delay_secs,
            moving_chance: config.moving_chance,
        }
    }

    /// Begin spawning. A second call while running does nothing.
    pub fn start(&mut self, targets: &mut TargetPools, rng: &mut ChaCha8Rng) -> SpawnReport {
        if self.running {
            return SpawnReport::default();
        }
        self.running = true;
        self.evaluate(targets, rng)
    }

    /// Halt spawning and invalidate any pending respawn.
    pub fn stop(&mut self) {
        self.running = false;
        self.respawn_scheduled = false;
        self.respawn_token += 1;
    }

    /// Stop and forget the active count. Used after every target has been
    /// force-returned.
    pub fn reset(&mut self) {
        self.stop();
        self.active_count = 0;
    }

    /// Refill when empty; clear and refill when overfull.
    pub fn evaluate(&mut self, targets: &mut TargetPools, rng: &mut ChaCha8Rng) -> SpawnReport {
        let mut report = SpawnReport::default();
        if self.active_count > self.desired_count {
            warn!(
                active = self.active_count,
                desired = self.desired_count,
                "too many active targets, clearing the line"
            );
            report.force_returned = targets.force_return_all();
            self.active_count = 0;
        }
        if self.active_count == 0 {
            report.spawned = self.spawn_line(targets, rng);
        }
        report
    }

    /// One target left Active. Schedules the respawn when this empties the
    /// line. Returns true if a respawn was scheduled.
    pub fn notify_removed(&mut self, scheduler: &mut Scheduler, now: f64) -> bool {
        if self.active_count == 0 {
            warn!("target removal reported with no active targets");
        } else {
            self.active_count -= 1;
        }

        if self.active_count > 0 || !self.running || self.respawn_scheduled {
            return false;
        }
        self.respawn_scheduled = true;
        scheduler.schedule(
            now + self.respawn_delay,
            DeferredAction::Respawn {
                token: self.respawn_token,
            },
        );
        true
    }

    /// A respawn came due. Stale tokens and stopped coordinators are ignored.
    pub fn on_respawn_due(
        &mut self,
        token: u64,
        targets: &mut TargetPools,
        rng: &mut ChaCha8Rng,
    ) -> Option<SpawnReport> {
        if token != self.respawn_token || !self.running || !self.respawn_scheduled {
            return None;
        }
        self.respawn_scheduled = false;
        Some(self.evaluate(targets, rng))
    }

    /// Count a target spawned outside the line.
    pub fn register_spawn(&mut self) {
        self.active_count += 1;
    }

    /// Positions of an `n`-wide line centered on the line center along +x.
    pub fn layout(&self, n: u32) -> Vec<DVec3> {
        let half_width = f64::from(n.saturating_sub(1)) * self.spacing / 2.0;
        (0..n)
            .map(|i| self.line_center + DVec3::X * (f64::from(i) * self.spacing - half_width))
            .collect()
    }

    pub fn active_count(&self) -> u32 {
        self.active_count
    }

    pub fn desired_count(&self) -> u32 {
        self.desired_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn_scheduled
    }

    fn spawn_line(&mut self, targets: &mut TargetPools, rng: &mut ChaCha8Rng) -> Vec<TargetId> {
        let spawned: Vec<TargetId> = self
            .layout(self.desired_count)
            .into_iter()
            .map(|position| {
                let (kind, pattern) = if rng.gen_bool(self.moving_chance) {
                    let pattern = if rng.gen_bool(0.5) {
                        MovementPattern::Horizontal
                    } else {
                        MovementPattern::Diagonal
                    };
                    (TargetKind::Moving, pattern)
                } else {
                    (TargetKind::Stationary, MovementPattern::Horizontal)
                };
                targets.spawn(kind, position, pattern)
            })
            .collect();
        self.active_count += spawned.len() as u32;
        info!(count = spawned.len(), "spawned target line");
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::config::{MotionConfig, PoolConfig, TargetConfig};
    use gallery_core::definitions::TargetDefinition;
    use rand::SeedableRng;

    fn pools() -> TargetPools {
        TargetPools::new(
            &PoolConfig::default(),
            &TargetConfig::default(),
            &MotionConfig::default(),
            TargetDefinition::fallback_stationary(),
            TargetDefinition::fallback_moving(),
        )
    }

    fn coordinator() -> SpawnCoordinator {
        SpawnCoordinator::new(&SpawnConfig::default())
    }

    #[test]
    fn test_layout_is_centered() {
        let c = coordinator();
        let xs: Vec<f64> = c.layout(5).iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-5.0, -2.5, 0.0, 2.5, 5.0]);
        assert!(c.layout(5).iter().all(|p| p.y == 1.0 && p.z == -10.0));
        assert_eq!(c.layout(1), vec![DVec3::new(0.0, 1.0, -10.0)]);
        assert!(c.layout(0).is_empty());
    }

    #[test]
    fn test_start_spawns_once() {
        let mut c = coordinator();
        let mut t = pools();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(c.start(&mut t, &mut rng).spawned.len(), 5);
        assert!(c.start(&mut t, &mut rng).spawned.is_empty());
        assert_eq!(c.active_count(), 5);
        assert_eq!(t.alive_count(), 5);
    }

    #[test]
    fn test_last_removal_schedules_exactly_one_respawn() {
        let mut c = coordinator();
        let mut t = pools();
        let mut s = Scheduler::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        c.start(&mut t, &mut rng);

        for _ in 0..4 {
            assert!(!c.notify_removed(&mut s, 0.0));
        }
        assert!(c.notify_removed(&mut s, 2.0));
        assert!(!c.notify_removed(&mut s, 2.0), "underflow must not reschedule");
        assert_eq!(s.pending(), 1);

        let due = s.drain_due(3.0);
        let [DeferredAction::Respawn { token }] = due.as_slice() else {
            panic!("expected one respawn, got {due:?}");
        };
        let report = c.on_respawn_due(*token, &mut t, &mut rng).unwrap();
        assert_eq!(report.spawned.len(), 5);
        assert!(!c.respawn_pending());
    }

    #[test]
    fn test_stop_invalidates_pending_respawn() {
        let mut c = coordinator();
        let mut t = pools();
        let mut s = Scheduler::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        c.register_spawn();
        c.start(&mut t, &mut rng);
        assert_eq!(c.active_count(), 1, "a registered target suppresses the line");

        assert!(c.notify_removed(&mut s, 0.0));
        c.stop();
        let due = s.drain_due(10.0);
        let [DeferredAction::Respawn { token }] = due.as_slice() else {
            panic!("expected one respawn, got {due:?}");
        };
        assert!(c.on_respawn_due(*token, &mut t, &mut rng).is_none());
        assert_eq!(t.alive_count(), 0);
    }

    #[test]
    fn test_overfull_line_is_cleared_and_refilled() {
        let mut c = coordinator();
        let mut t = pools();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for i in 0..7 {
            t.spawn(TargetKind::Stationary, DVec3::X * f64::from(i), MovementPattern::Horizontal);
            c.register_spawn();
        }
        let report = c.start(&mut t, &mut rng);
        assert_eq!(report.force_returned, 7);
        assert_eq!(report.spawned.len(), 5);
        assert_eq!(c.active_count(), 5);
        assert_eq!(t.alive_count(), 5);
    }

    #[test]
    fn test_moving_chance_one_spawns_only_moving() {
        let mut c = SpawnCoordinator::new(&SpawnConfig {
            moving_chance: 1.0,
            ..SpawnConfig::default()
        });
        let mut t = pools();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let report = c.start(&mut t, &mut rng);
        assert!(report.spawned.iter().all(|id| id.kind == TargetKind::Moving));
    }
}
