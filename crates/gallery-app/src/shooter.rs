//! A scripted shooter that plays sessions without a human at the controls.

use glam::DVec3;

use gallery_core::commands::PlayerCommand;
use gallery_core::enums::{LifecycleState, SessionPhase};
use gallery_core::state::SessionSnapshot;

/// How far above a target a deliberate miss is aimed.
const MISS_OFFSET: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct ShooterConfig {
    pub origin: DVec3,
    /// Ticks between trigger pulls.
    pub fire_interval: u32,
    /// Every n-th shot is aimed over the target. `None` never misses on purpose.
    pub miss_every: Option<u32>,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            origin: DVec3::new(0.0, 1.0, 0.0),
            fire_interval: 10,
            miss_every: None,
        }
    }
}

/// Picks the active targets in turn, left to right, and fires at a fixed
/// cadence. Tops the magazine up while the line is empty.
#[derive(Debug, Clone)]
pub struct ScriptedShooter {
    config: ShooterConfig,
    cooldown: u32,
    shots: u32,
}

impl ScriptedShooter {
    pub fn new(config: ShooterConfig) -> Self {
        Self {
            cooldown: config.fire_interval,
            config,
            shots: 0,
        }
    }

    /// Commands to queue for the next tick, given the latest snapshot.
    pub fn commands(&mut self, snapshot: &SessionSnapshot) -> Vec<PlayerCommand> {
        if snapshot.phase != SessionPhase::Running {
            return Vec::new();
        }

        let mut active: Vec<DVec3> = snapshot
            .targets
            .iter()
            .filter(|t| t.state == LifecycleState::Active)
            .map(|t| t.position)
            .collect();

        if active.is_empty() {
            let ammo = snapshot.ammo;
            if !ammo.reloading && ammo.current < ammo.max {
                return vec![PlayerCommand::Reload];
            }
            return Vec::new();
        }

        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown > 0 || snapshot.ammo.reloading {
            return Vec::new();
        }
        self.cooldown = self.config.fire_interval.max(1);

        active.sort_by(|a, b| a.x.total_cmp(&b.x));
        let mut aim = active[self.shots as usize % active.len()];
        self.shots += 1;
        if self.config.miss_every.is_some_and(|n| n > 0 && self.shots % n == 0) {
            aim.y += MISS_OFFSET;
        }

        vec![PlayerCommand::Fire {
            origin: self.config.origin,
            direction: aim - self.config.origin,
        }]
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::enums::{MotionState, TargetKind};
    use gallery_core::state::{AmmoView, TargetView};
    use gallery_core::types::{PoolHandle, TargetId};

    fn running(targets: &[(f64, LifecycleState)], ammo: AmmoView) -> SessionSnapshot {
        SessionSnapshot {
            phase: SessionPhase::Running,
            ammo,
            targets: targets
                .iter()
                .enumerate()
                .map(|(i, &(x, state))| TargetView {
                    id: TargetId::new(TargetKind::Stationary, PoolHandle::new(i as u32, 0)),
                    state,
                    health: 1,
                    position: DVec3::new(x, 1.0, -10.0),
                    angular_velocity: DVec3::ZERO,
                    motion: MotionState::Idle,
                })
                .collect(),
            ..SessionSnapshot::default()
        }
    }

    fn full() -> AmmoView {
        AmmoView {
            current: 5,
            max: 5,
            reloading: false,
            reload_progress: 0.0,
        }
    }

    fn aim_of(commands: &[PlayerCommand]) -> DVec3 {
        match commands {
            [PlayerCommand::Fire { direction, .. }] => *direction,
            other => panic!("expected one shot, got {other:?}"),
        }
    }

    #[test]
    fn test_fires_on_cadence_left_to_right() {
        let mut shooter = ScriptedShooter::new(ShooterConfig {
            fire_interval: 2,
            ..ShooterConfig::default()
        });
        let snap = running(&[(2.5, LifecycleState::Active), (-2.5, LifecycleState::Active)], full());

        assert!(shooter.commands(&snap).is_empty());
        assert_eq!(aim_of(&shooter.commands(&snap)).x, -2.5);
        assert!(shooter.commands(&snap).is_empty());
        assert_eq!(aim_of(&shooter.commands(&snap)).x, 2.5);
        assert_eq!(shooter.shots(), 2);
    }

    #[test]
    fn test_skips_falling_targets() {
        let mut shooter = ScriptedShooter::new(ShooterConfig {
            fire_interval: 1,
            ..ShooterConfig::default()
        });
        let snap = running(&[(-2.5, LifecycleState::Destroyed), (0.0, LifecycleState::Active)], full());
        assert_eq!(aim_of(&shooter.commands(&snap)).x, 0.0);
    }

    #[test]
    fn test_deliberate_miss_aims_high() {
        let mut shooter = ScriptedShooter::new(ShooterConfig {
            fire_interval: 1,
            miss_every: Some(2),
            ..ShooterConfig::default()
        });
        let snap = running(&[(0.0, LifecycleState::Active)], full());
        assert_eq!(aim_of(&shooter.commands(&snap)).y, 0.0);
        assert_eq!(aim_of(&shooter.commands(&snap)).y, MISS_OFFSET);
    }

    #[test]
    fn test_reloads_while_line_is_empty() {
        let mut shooter = ScriptedShooter::new(ShooterConfig::default());
        let partial = AmmoView { current: 2, ..full() };
        let commands = shooter.commands(&running(&[], partial));
        assert!(matches!(commands.as_slice(), [PlayerCommand::Reload]));
        assert!(shooter.commands(&running(&[], full())).is_empty());
    }

    #[test]
    fn test_idle_outside_running_phase() {
        let mut shooter = ScriptedShooter::new(ShooterConfig {
            fire_interval: 1,
            ..ShooterConfig::default()
        });
        let mut snap = running(&[(0.0, LifecycleState::Active)], full());
        snap.phase = SessionPhase::Paused;
        assert!(shooter.commands(&snap).is_empty());
    }
}
