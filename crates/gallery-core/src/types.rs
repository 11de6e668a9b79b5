//! Fundamental handle, geometry and time types.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::TargetKind;

/// Generation-tagged reference to a slot inside a pool.
///
/// A handle is only meaningful for the pool that issued it, and only while
/// its generation matches the slot's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PoolHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}g{}", self.index, self.generation)
    }
}

/// A target across both target pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId {
    pub kind: TargetKind,
    pub handle: PoolHandle,
}

impl TargetId {
    pub fn new(kind: TargetKind, handle: PoolHandle) -> Self {
        Self { kind, handle }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{}", self.kind, self.handle)
    }
}

/// Anything the external physics layer can report in a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityRef {
    Projectile { handle: PoolHandle },
    Target { id: TargetId },
    /// Static level geometry (walls, stands, props).
    Scenery { id: u32 },
    /// The floor. Falling targets landing on it count as ground contact.
    Ground,
}

impl EntityRef {
    pub fn projectile(handle: PoolHandle) -> Self {
        Self::Projectile { handle }
    }

    pub fn target(id: TargetId) -> Self {
        Self::Target { id }
    }
}

/// One overlap-onset event delivered by the external physics layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub a: EntityRef,
    pub b: EntityRef,
    pub contact_point: DVec3,
    pub contact_normal: DVec3,
}

impl CollisionEvent {
    pub fn new(a: EntityRef, b: EntityRef, contact_point: DVec3, contact_normal: DVec3) -> Self {
        Self {
            a,
            b,
            contact_point,
            contact_normal,
        }
    }
}

/// Session time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each running tick).
    pub tick: u64,
    /// Elapsed session time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
