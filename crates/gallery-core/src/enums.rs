//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Per-entity lifecycle stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Sitting in its pool.
    #[default]
    Inactive,
    /// Alive / in flight.
    Active,
    /// Killed by damage, falling.
    Destroyed,
    /// Drifted past the boundary distance from its spawn point.
    OutOfBounds,
    /// Landed; waiting for the removal timer before returning to the pool.
    PendingRemoval,
}

impl LifecycleState {
    /// Removed from play but not yet back in the pool.
    pub fn is_removing(self) -> bool {
        matches!(
            self,
            LifecycleState::Destroyed | LifecycleState::OutOfBounds | LifecycleState::PendingRemoval
        )
    }
}

/// Target variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Stationary,
    Moving,
}

/// Motion sub-state of a moving target, orthogonal to its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Idle,
    Moving,
}

/// Back-and-forth path shape of a moving target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Along +x.
    #[default]
    Horizontal,
    /// Along +x +z.
    Diagonal,
}

/// Top-level session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Constructed, not started.
    #[default]
    Idle,
    Running,
    Paused,
    /// Countdown reached zero.
    Ended,
}

/// Binary result of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Win,
    Lose,
}

/// Why a projectile went back to its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseReason {
    /// Lifetime ran out without a hit.
    Expired,
    /// Hit something that cannot take damage.
    Scenery,
    /// Post-hit delay elapsed after embedding in a target.
    AfterHit,
    /// Swept up by session end or restart.
    Forced,
}

/// Why a fire request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireRejection {
    Reloading,
    Empty,
    SessionNotRunning,
}
