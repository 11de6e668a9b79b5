//! Target lifecycle.
//!
//! Both target variants are built on `TargetCore`, which owns the lifecycle
//! state, health and rigid body. The core's transition methods are the only
//! way the state changes, and each reports whether it actually fired so the
//! engine can run side effects (active-count bookkeeping, timers, score)
//! exactly once.

pub mod moving;
pub mod pools;
pub mod stationary;

use glam::DVec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use gallery_core::config::TargetConfig;
use gallery_core::constants::TARGET_FALL_TORQUE_FACTOR;
use gallery_core::definitions::TargetDefinition;
use gallery_core::enums::{LifecycleState, MotionState};

use crate::body::RigidBody;

pub use moving::{Motion, MovingTarget};
pub use pools::TargetPools;
pub use stationary::StationaryTarget;

/// Result of applying damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Receiver was not alive; nothing changed.
    Ignored,
    /// Survived the hit.
    Wounded { remaining_health: u32 },
    /// This hit killed it. Reported exactly once per lifetime.
    Killed { score: u32 },
}

/// Capability of anything a projectile can damage.
pub trait DamageReceiver {
    fn take_damage(&mut self, amount: u32, rng: &mut ChaCha8Rng) -> DamageOutcome;
    fn is_alive(&self) -> bool;
    fn apply_impulse_at(&mut self, impulse: DVec3, point: DVec3);
    fn apply_torque_impulse(&mut self, torque: DVec3);
}

/// What the pools and per-tick systems need from either target variant.
pub trait TargetEntity: DamageReceiver {
    fn core(&self) -> &TargetCore;
    fn core_mut(&mut self) -> &mut TargetCore;
    /// Advance motion or physics by `dt`.
    fn step(&mut self, dt: f64);

    fn motion_state(&self) -> MotionState {
        MotionState::Idle
    }
}

/// Shared state machine for all target variants.
#[derive(Debug, Clone)]
pub struct TargetCore {
    state: LifecycleState,
    health: u32,
    max_health: u32,
    spawn_position: DVec3,
    score_value: u32,
    fall_force: f64,
    boundary_distance: f64,
    body: RigidBody,
}

impl TargetCore {
    pub fn new(def: &TargetDefinition, tuning: &TargetConfig, score_value: u32) -> Self {
        Self {
            state: LifecycleState::Inactive,
            health: tuning.max_health,
            max_health: tuning.max_health,
            spawn_position: DVec3::ZERO,
            score_value,
            fall_force: tuning.fall_force,
            boundary_distance: tuning.boundary_distance,
            body: RigidBody::from_definition(def),
        }
    }

    /// Inactive -> Active at `position`. Returns false from any other state.
    pub fn activate(&mut self, position: DVec3) -> bool {
        if self.state != LifecycleState::Inactive {
            debug!(state = ?self.state, "activate ignored: target not inactive");
            return false;
        }
        self.health = self.max_health;
        self.spawn_position = position;
        self.body.reset(position);
        self.state = LifecycleState::Active;
        true
    }

    /// Apply damage. Only an active target reacts; the killing blow knocks
    /// it over with a random impulse and torque.
    pub fn take_damage(&mut self, amount: u32, rng: &mut ChaCha8Rng) -> DamageOutcome {
        if self.state != LifecycleState::Active {
            return DamageOutcome::Ignored;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health > 0 {
            return DamageOutcome::Wounded {
                remaining_health: self.health,
            };
        }

        self.state = LifecycleState::Destroyed;
        self.body.gravity = true;
        let (impulse, torque) = destruction_kick(rng, self.fall_force);
        self.body.apply_impulse(impulse);
        self.body.apply_torque_impulse(torque);
        DamageOutcome::Killed {
            score: self.score_value,
        }
    }

    /// Active -> OutOfBounds once the body strays past the boundary distance.
    pub fn check_boundary(&mut self) -> bool {
        if self.state != LifecycleState::Active {
            return false;
        }
        if self.body.position.distance(self.spawn_position) <= self.boundary_distance {
            return false;
        }
        self.state = LifecycleState::OutOfBounds;
        self.body.gravity = true;
        true
    }

    /// Destroyed/OutOfBounds -> PendingRemoval on touching the ground.
    pub fn land(&mut self) -> bool {
        if !matches!(
            self.state,
            LifecycleState::Destroyed | LifecycleState::OutOfBounds
        ) {
            return false;
        }
        self.state = LifecycleState::PendingRemoval;
        self.body.halt();
        self.body.gravity = false;
        true
    }

    /// Removal delay elapsed: back to Inactive, ready for the pool.
    pub fn finish_removal(&mut self) -> bool {
        if !self.state.is_removing() {
            return false;
        }
        self.deactivate();
        true
    }

    /// Unconditional return to Inactive (session end, restart, overflow cleanup).
    pub fn deactivate(&mut self) {
        self.state = LifecycleState::Inactive;
        self.body.halt();
        self.body.gravity = false;
    }

    /// Physics step for a free (non-kinematic) body. Landed bodies rest.
    pub fn integrate(&mut self, dt: f64) {
        if matches!(
            self.state,
            LifecycleState::Inactive | LifecycleState::PendingRemoval
        ) {
            return;
        }
        self.body.integrate(dt);
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.state == LifecycleState::Active
    }

    pub fn spawn_position(&self) -> DVec3 {
        self.spawn_position
    }

    pub fn score_value(&self) -> u32 {
        self.score_value
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.body
    }
}

/// Random knock-over: mostly upward impulse plus a tumble.
fn destruction_kick(rng: &mut ChaCha8Rng, fall_force: f64) -> (DVec3, DVec3) {
    let direction = DVec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(0.5..1.0),
        rng.gen_range(-1.0..1.0),
    )
    .normalize_or_zero();
    let torque = random_in_unit_sphere(rng) * fall_force * TARGET_FALL_TORQUE_FACTOR;
    (direction * fall_force, torque)
}

fn random_in_unit_sphere(rng: &mut ChaCha8Rng) -> DVec3 {
    loop {
        let p = DVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if p.length_squared() <= 1.0 {
            return p;
        }
    }
}
