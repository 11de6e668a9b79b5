//! Moving target: slides back and forth along a fixed path while alive.
//!
//! While Active the body is kinematic: the motion curve owns its position
//! and impulses are ignored. Once it leaves Active the motion stops and the
//! body falls like any other.

use std::f64::consts::TAU;

use glam::DVec3;
use rand_chacha::ChaCha8Rng;

use gallery_core::config::{MotionConfig, TargetConfig};
use gallery_core::definitions::TargetDefinition;
use gallery_core::enums::{MotionState, MovementPattern};

use super::{DamageOutcome, DamageReceiver, TargetCore, TargetEntity};

/// Ping-pong path between `start` and `start + direction * range`.
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    state: MotionState,
    pattern: MovementPattern,
    start: DVec3,
    end: DVec3,
    timer: f64,
    period: f64,
}

impl Motion {
    pub fn idle(period: f64) -> Self {
        Self {
            state: MotionState::Idle,
            pattern: MovementPattern::Horizontal,
            start: DVec3::ZERO,
            end: DVec3::ZERO,
            timer: 0.0,
            period,
        }
    }

    pub fn begin(&mut self, start: DVec3, pattern: MovementPattern, range: f64) {
        self.state = MotionState::Moving;
        self.pattern = pattern;
        self.start = start;
        self.end = start + direction(pattern) * range;
        self.timer = 0.0;
    }

    pub fn stop(&mut self) {
        self.state = MotionState::Idle;
    }

    /// Position along the path. Starts at `start`, reaches `end` at half a
    /// period and eases in and out at both ends.
    pub fn sample(&self) -> DVec3 {
        let s = (1.0 - (TAU * self.timer / self.period).cos()) * 0.5;
        self.start.lerp(self.end, s)
    }

    /// Advance the timer; returns the new position while moving.
    pub fn advance(&mut self, dt: f64) -> Option<DVec3> {
        if self.state != MotionState::Moving {
            return None;
        }
        self.timer = (self.timer + dt) % self.period;
        Some(self.sample())
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn pattern(&self) -> MovementPattern {
        self.pattern
    }

    pub fn end(&self) -> DVec3 {
        self.end
    }
}

fn direction(pattern: MovementPattern) -> DVec3 {
    match pattern {
        MovementPattern::Horizontal => DVec3::X,
        MovementPattern::Diagonal => DVec3::new(1.0, 0.0, 1.0),
    }
}

#[derive(Debug, Clone)]
pub struct MovingTarget {
    core: TargetCore,
    motion: Motion,
    range: f64,
}

impl MovingTarget {
    pub fn new(def: &TargetDefinition, tuning: &TargetConfig, motion: &MotionConfig) -> Self {
        Self {
            core: TargetCore::new(def, tuning, tuning.moving_score),
            motion: Motion::idle(motion.period_secs),
            range: motion.range,
        }
    }

    /// Activate at `position` and start sliding along `pattern`.
    pub fn activate(&mut self, position: DVec3, pattern: MovementPattern) -> bool {
        if !self.core.activate(position) {
            return false;
        }
        self.motion.begin(position, pattern, self.range);
        true
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    fn is_kinematic(&self) -> bool {
        self.core.is_alive() && self.motion.state() == MotionState::Moving
    }
}

impl DamageReceiver for MovingTarget {
    fn take_damage(&mut self, amount: u32, rng: &mut ChaCha8Rng) -> DamageOutcome {
        let outcome = self.core.take_damage(amount, rng);
        if matches!(outcome, DamageOutcome::Killed { .. }) {
            self.motion.stop();
        }
        outcome
    }

    fn is_alive(&self) -> bool {
        self.core.is_alive()
    }

    fn apply_impulse_at(&mut self, impulse: DVec3, point: DVec3) {
        if !self.is_kinematic() {
            self.core.body_mut().apply_impulse_at(impulse, point);
        }
    }

    fn apply_torque_impulse(&mut self, torque: DVec3) {
        if !self.is_kinematic() {
            self.core.body_mut().apply_torque_impulse(torque);
        }
    }
}

impl TargetEntity for MovingTarget {
    fn core(&self) -> &TargetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TargetCore {
        &mut self.core
    }

    fn step(&mut self, dt: f64) {
        if !self.core.is_alive() {
            self.motion.stop();
        }
        match self.motion.advance(dt) {
            Some(position) => self.core.body_mut().position = position,
            None => self.core.integrate(dt),
        }
    }

    fn motion_state(&self) -> MotionState {
        self.motion.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::enums::LifecycleState;
    use rand::SeedableRng;

    const DT: f64 = 1.0 / 30.0;

    fn target() -> MovingTarget {
        MovingTarget::new(
            &TargetDefinition::fallback_moving(),
            &TargetConfig::default(),
            &MotionConfig::default(),
        )
    }

    #[test]
    fn test_motion_starts_at_spawn_and_reaches_end_at_half_period() {
        let mut motion = Motion::idle(3.0);
        motion.begin(DVec3::ZERO, MovementPattern::Horizontal, 4.0);
        assert!(motion.sample().distance(DVec3::ZERO) < 1e-12);
        let at_half = motion.advance(1.5).unwrap();
        assert!(at_half.distance(DVec3::new(4.0, 0.0, 0.0)) < 1e-9);
        let back = motion.advance(1.5).unwrap();
        assert!(back.distance(DVec3::ZERO) < 1e-9);
    }

    #[test]
    fn test_diagonal_path_moves_in_x_and_z() {
        let mut motion = Motion::idle(3.0);
        motion.begin(DVec3::ZERO, MovementPattern::Diagonal, 4.0);
        assert!(motion.end().distance(DVec3::new(4.0, 0.0, 4.0)) < 1e-9);
        let at_half = motion.advance(1.5).unwrap();
        assert!(at_half.distance(DVec3::new(4.0, 0.0, 4.0)) < 1e-9);
    }

    #[test]
    fn test_idle_motion_does_not_advance() {
        let mut motion = Motion::idle(3.0);
        assert_eq!(motion.advance(DT), None);
    }

    #[test]
    fn test_active_target_follows_path_within_range() {
        let mut t = target();
        let spawn = DVec3::new(0.0, 1.0, -10.0);
        assert!(t.activate(spawn, MovementPattern::Horizontal));
        assert_eq!(t.motion_state(), MotionState::Moving);
        for _ in 0..200 {
            t.step(DT);
            let offset = t.core().body().position - spawn;
            assert!(offset.x >= -1e-9 && offset.x <= 4.0 + 1e-9);
            assert!(offset.y.abs() < 1e-12);
        }
    }

    #[test]
    fn test_impulses_ignored_while_moving() {
        let mut t = target();
        t.activate(DVec3::ZERO, MovementPattern::Horizontal);
        t.apply_impulse_at(DVec3::new(0.0, 0.0, -50.0), DVec3::ZERO);
        assert_eq!(t.core().body().linear_velocity, DVec3::ZERO);
    }

    #[test]
    fn test_killing_stops_motion_and_drops_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut t = target();
        t.activate(DVec3::new(0.0, 1.0, 0.0), MovementPattern::Diagonal);
        t.step(DT);
        assert!(matches!(t.take_damage(10, &mut rng), DamageOutcome::Killed { score: 20 }));
        assert_eq!(t.motion_state(), MotionState::Idle);
        assert_eq!(t.core().state(), LifecycleState::Destroyed);

        let before = t.core().body().position;
        for _ in 0..30 {
            t.step(DT);
        }
        assert_ne!(t.core().body().position, before);
    }
}
