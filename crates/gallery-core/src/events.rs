//! Notification events emitted by the simulation for presentation.
//!
//! The simulation never calls into audio or rendering; presentation reads
//! these out of each snapshot and decides what to play or draw.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{PoolHandle, TargetId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A round left the muzzle.
    Fired {
        projectile: PoolHandle,
        origin: DVec3,
        direction: DVec3,
        ammo_remaining: u32,
    },
    /// Trigger pulled but nothing was fired.
    FireRejected { reason: FireRejection },
    ReloadStarted { duration_secs: f64 },
    Reloaded { ammo: u32 },
    /// A projectile struck a target.
    Hit {
        target: TargetId,
        projectile: PoolHandle,
        point: DVec3,
        remaining_health: u32,
    },
    /// A target was killed by damage.
    Destroyed { target: TargetId, score_awarded: u32 },
    /// A target left its boundary.
    OutOfBounds { target: TargetId },
    /// A removed target touched the ground.
    Landed { target: TargetId },
    /// A target finished its removal delay and is back in its pool.
    TargetReturned { target: TargetId },
    ProjectileReleased {
        projectile: PoolHandle,
        reason: ReleaseReason,
    },
    /// A fresh line of targets was spawned.
    Respawn { count: u32 },
    SessionStarted { duration_secs: f64 },
    SessionEnded { outcome: SessionOutcome, score: u32 },
}
