//! Session snapshot: the complete visible state handed to presentation each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{PoolHandle, SimTime, TargetId};

/// Everything presentation needs after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub outcome: Option<SessionOutcome>,
    pub time_remaining_secs: f64,
    pub score: u32,
    /// Authoritative active-target count (drops at the moment of removal).
    pub active_targets: u32,
    pub ammo: AmmoView,
    pub targets: Vec<TargetView>,
    pub projectiles: Vec<ProjectileView>,
    /// Events raised during this tick, in order.
    pub events: Vec<SimEvent>,
}

/// One checked-out target, including ones falling or waiting for removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: TargetId,
    pub state: LifecycleState,
    pub health: u32,
    pub position: DVec3,
    pub angular_velocity: DVec3,
    pub motion: MotionState,
}

/// One checked-out projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub handle: PoolHandle,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Embedded in a target, waiting for its post-hit release.
    pub embedded: bool,
}

/// Magazine status for the ammo counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AmmoView {
    pub current: u32,
    pub max: u32,
    pub reloading: bool,
    /// 0.0 at reload start, 1.0 when done. 0.0 when not reloading.
    pub reload_progress: f64,
}
