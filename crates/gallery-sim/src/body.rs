//! Minimal rigid body state for pooled entities.
//!
//! Collision detection lives outside the simulation; this only carries the
//! velocities that impulses act on and integrates them each tick.

use glam::DVec3;

use gallery_core::constants::GRAVITY;
use gallery_core::definitions::TargetDefinition;

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: DVec3,
    pub linear_velocity: DVec3,
    pub angular_velocity: DVec3,
    pub mass: f64,
    pub linear_damping: f64,
    pub angular_damping: f64,
    /// Off while a target stands on its mount; on once it starts falling.
    pub gravity: bool,
}

impl RigidBody {
    pub fn from_definition(def: &TargetDefinition) -> Self {
        Self {
            position: DVec3::ZERO,
            linear_velocity: DVec3::ZERO,
            angular_velocity: DVec3::ZERO,
            mass: def.mass,
            linear_damping: def.linear_damping,
            angular_damping: def.angular_damping,
            gravity: false,
        }
    }

    /// Place at rest at `position`.
    pub fn reset(&mut self, position: DVec3) {
        self.position = position;
        self.linear_velocity = DVec3::ZERO;
        self.angular_velocity = DVec3::ZERO;
        self.gravity = false;
    }

    pub fn halt(&mut self) {
        self.linear_velocity = DVec3::ZERO;
        self.angular_velocity = DVec3::ZERO;
    }

    pub fn apply_impulse(&mut self, impulse: DVec3) {
        self.linear_velocity += impulse / self.mass;
    }

    /// Linear impulse at a world point; the lever arm also spins the body.
    /// Inertia is approximated by mass.
    pub fn apply_impulse_at(&mut self, impulse: DVec3, point: DVec3) {
        self.apply_impulse(impulse);
        self.apply_torque_impulse((point - self.position).cross(impulse));
    }

    pub fn apply_torque_impulse(&mut self, torque: DVec3) {
        self.angular_velocity += torque / self.mass;
    }

    /// Semi-implicit Euler step with linear drag-style damping.
    pub fn integrate(&mut self, dt: f64) {
        if self.gravity {
            self.linear_velocity.y -= GRAVITY * dt;
        }
        self.linear_velocity *= 1.0 / (1.0 + dt * self.linear_damping);
        self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);
        self.position += self.linear_velocity * dt;
    }
}
