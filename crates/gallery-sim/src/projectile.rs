//! Pooled projectiles: straight-line flight, lifetime expiry, first-hit
//! resolution.

use glam::DVec3;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use gallery_core::config::{PoolConfig, ProjectileConfig};
use gallery_core::constants::{PROJECTILE_HIT_TORQUE_FACTOR, TIME_EPSILON};
use gallery_core::definitions::ProjectileDefinition;
use gallery_core::enums::LifecycleState;
use gallery_core::state::ProjectileView;
use gallery_core::types::PoolHandle;

use crate::pool::Pool;
use crate::target::{DamageOutcome, DamageReceiver};

#[derive(Debug, Clone)]
pub struct Projectile {
    pub state: LifecycleState,
    pub position: DVec3,
    pub velocity: DVec3,
    pub remaining_lifetime: f64,
    pub mass: f64,
    pub radius: f64,
    /// Set by the first collision of a flight; later ones are ignored.
    pub resolved: bool,
}

impl Projectile {
    pub fn new(def: &ProjectileDefinition) -> Self {
        Self {
            state: LifecycleState::Inactive,
            position: DVec3::ZERO,
            velocity: DVec3::ZERO,
            remaining_lifetime: 0.0,
            mass: def.mass,
            radius: def.radius,
            resolved: false,
        }
    }

    fn deactivate(&mut self) {
        self.state = LifecycleState::Inactive;
        self.velocity = DVec3::ZERO;
        self.resolved = false;
    }
}

/// What a collision did to the projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResolution {
    /// Stale handle, not in flight, or already resolved.
    Ignored,
    /// Hit a damage receiver. The projectile is frozen in place and should
    /// be released after `release_after` seconds.
    Struck {
        outcome: DamageOutcome,
        release_after: f64,
    },
    /// Hit something that cannot take damage; already back in the pool.
    Released,
}

#[derive(Debug)]
pub struct ProjectileSimulator {
    pool: Pool<Projectile>,
    speed: f64,
    lifetime: f64,
    damage: u32,
    post_hit_delay: f64,
}

impl ProjectileSimulator {
    pub fn new(pools: &PoolConfig, tuning: &ProjectileConfig, def: ProjectileDefinition) -> Self {
        Self {
            pool: Pool::new(pools.projectile_capacity, pools.growth, move || {
                Projectile::new(&def)
            }),
            speed: tuning.speed,
            lifetime: tuning.lifetime_secs,
            damage: tuning.damage,
            post_hit_delay: tuning.post_hit_delay_secs,
        }
    }

    /// Check out a projectile and launch it from `origin` along `direction`.
    /// A zero direction fires along -z.
    pub fn fire(&mut self, origin: DVec3, direction: DVec3) -> PoolHandle {
        let handle = self.pool.acquire();
        let direction = direction.try_normalize().unwrap_or(DVec3::NEG_Z);
        if let Some(p) = self.pool.get_mut(handle) {
            p.state = LifecycleState::Active;
            p.position = origin;
            p.velocity = direction * self.speed;
            p.remaining_lifetime = self.lifetime;
            p.resolved = false;
        }
        debug!(%handle, ?origin, ?direction, "projectile fired");
        handle
    }

    /// Move free-flying projectiles and release any whose lifetime ran out.
    /// Returns the released handles.
    pub fn advance(&mut self, dt: f64) -> Vec<PoolHandle> {
        let mut expired = Vec::new();
        for (handle, p) in self.pool.iter_active_mut() {
            if p.state != LifecycleState::Active || p.resolved {
                continue;
            }
            p.position += p.velocity * dt;
            p.remaining_lifetime -= dt;
            if p.remaining_lifetime <= TIME_EPSILON {
                expired.push(handle);
            }
        }
        for &handle in &expired {
            self.release(handle);
        }
        expired
    }

    /// Apply the first collision of a flight.
    pub fn resolve_collision(
        &mut self,
        handle: PoolHandle,
        receiver: Option<&mut dyn DamageReceiver>,
        rng: &mut ChaCha8Rng,
        contact_point: DVec3,
        contact_normal: DVec3,
    ) -> HitResolution {
        let Some(p) = self.pool.get_mut(handle) else {
            debug!(%handle, "collision for stale projectile ignored");
            return HitResolution::Ignored;
        };
        if p.state != LifecycleState::Active || p.resolved {
            return HitResolution::Ignored;
        }
        p.resolved = true;

        let Some(receiver) = receiver else {
            self.release(handle);
            return HitResolution::Released;
        };

        let impulse = p.velocity * p.mass;
        let outcome = receiver.take_damage(self.damage, rng);
        receiver.apply_impulse_at(impulse, contact_point);
        receiver.apply_torque_impulse(impulse.cross(contact_normal) * PROJECTILE_HIT_TORQUE_FACTOR);

        p.velocity = DVec3::ZERO;
        p.position = contact_point;
        HitResolution::Struck {
            outcome,
            release_after: self.post_hit_delay,
        }
    }

    /// Return a projectile to the pool. Stale handles are logged and ignored.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if let Some(p) = self.pool.get_mut(handle) {
            p.deactivate();
        }
        match self.pool.release(handle) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "projectile release ignored");
                false
            }
        }
    }

    /// Release every projectile in flight or embedded. Returns the handles.
    pub fn release_all(&mut self) -> Vec<PoolHandle> {
        let handles = self.pool.active_handles();
        for (_, p) in self.pool.iter_active_mut() {
            p.deactivate();
        }
        self.pool.release_all();
        handles
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&Projectile> {
        self.pool.get(handle)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut Projectile> {
        self.pool.get_mut(handle)
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn pool(&self) -> &Pool<Projectile> {
        &self.pool
    }

    pub fn views(&self) -> Vec<ProjectileView> {
        self.pool
            .iter_active()
            .map(|(handle, p)| ProjectileView {
                handle,
                position: p.position,
                velocity: p.velocity,
                embedded: p.resolved,
            })
            .collect()
    }
}
