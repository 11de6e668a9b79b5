//! The two target pools behind one `TargetId`-addressed facade.

use glam::DVec3;

use gallery_core::config::{MotionConfig, PoolConfig, TargetConfig};
use gallery_core::definitions::TargetDefinition;
use gallery_core::enums::{LifecycleState, MotionState, MovementPattern, TargetKind};
use gallery_core::state::TargetView;
use gallery_core::types::TargetId;

use crate::pool::{Pool, PoolError};

use super::{DamageReceiver, MovingTarget, StationaryTarget, TargetCore, TargetEntity};

#[derive(Debug)]
pub struct TargetPools {
    stationary: Pool<StationaryTarget>,
    moving: Pool<MovingTarget>,
}

impl TargetPools {
    pub fn new(
        pools: &PoolConfig,
        tuning: &TargetConfig,
        motion: &MotionConfig,
        stationary_def: TargetDefinition,
        moving_def: TargetDefinition,
    ) -> Self {
        let stationary_tuning = tuning.clone();
        let moving_tuning = tuning.clone();
        let motion = motion.clone();
        Self {
            stationary: Pool::new(pools.stationary_capacity, pools.growth, move || {
                StationaryTarget::new(&stationary_def, &stationary_tuning)
            }),
            moving: Pool::new(pools.moving_capacity, pools.growth, move || {
                MovingTarget::new(&moving_def, &moving_tuning, &motion)
            }),
        }
    }

    /// Check a target out of its pool and activate it at `position`.
    /// `pattern` only matters for moving targets.
    pub fn spawn(&mut self, kind: TargetKind, position: DVec3, pattern: MovementPattern) -> TargetId {
        match kind {
            TargetKind::Stationary => {
                let handle = self.stationary.acquire();
                if let Some(t) = self.stationary.get_mut(handle) {
                    t.core_mut().activate(position);
                }
                TargetId::new(kind, handle)
            }
            TargetKind::Moving => {
                let handle = self.moving.acquire();
                if let Some(t) = self.moving.get_mut(handle) {
                    t.activate(position, pattern);
                }
                TargetId::new(kind, handle)
            }
        }
    }

    pub fn core(&self, id: TargetId) -> Option<&TargetCore> {
        match id.kind {
            TargetKind::Stationary => self.stationary.get(id.handle).map(TargetEntity::core),
            TargetKind::Moving => self.moving.get(id.handle).map(TargetEntity::core),
        }
    }

    pub fn core_mut(&mut self, id: TargetId) -> Option<&mut TargetCore> {
        match id.kind {
            TargetKind::Stationary => self.stationary.get_mut(id.handle).map(TargetEntity::core_mut),
            TargetKind::Moving => self.moving.get_mut(id.handle).map(TargetEntity::core_mut),
        }
    }

    pub fn receiver_mut(&mut self, id: TargetId) -> Option<&mut dyn DamageReceiver> {
        match id.kind {
            TargetKind::Stationary => self
                .stationary
                .get_mut(id.handle)
                .map(|t| t as &mut dyn DamageReceiver),
            TargetKind::Moving => self
                .moving
                .get_mut(id.handle)
                .map(|t| t as &mut dyn DamageReceiver),
        }
    }

    pub fn state(&self, id: TargetId) -> Option<LifecycleState> {
        self.core(id).map(TargetCore::state)
    }

    /// Deactivate and return a target to its pool.
    pub fn release(&mut self, id: TargetId) -> Result<(), PoolError> {
        if let Some(core) = self.core_mut(id) {
            core.deactivate();
        }
        match id.kind {
            TargetKind::Stationary => self.stationary.release(id.handle),
            TargetKind::Moving => self.moving.release(id.handle),
        }
    }

    /// Deactivate and release every checked-out target. Returns how many
    /// of them were still Active.
    pub fn force_return_all(&mut self) -> usize {
        let mut was_active = 0;
        for (_, t) in self.stationary.iter_active_mut() {
            was_active += usize::from(t.core().is_alive());
            t.core_mut().deactivate();
        }
        for (_, t) in self.moving.iter_active_mut() {
            was_active += usize::from(t.core().is_alive());
            t.core_mut().deactivate();
        }
        self.stationary.release_all();
        self.moving.release_all();
        was_active
    }

    /// Ids of every checked-out target, stationary first.
    pub fn checked_out(&self) -> Vec<TargetId> {
        self.stationary
            .active_handles()
            .into_iter()
            .map(|h| TargetId::new(TargetKind::Stationary, h))
            .chain(
                self.moving
                    .active_handles()
                    .into_iter()
                    .map(|h| TargetId::new(TargetKind::Moving, h)),
            )
            .collect()
    }

    /// Targets currently in the Active state.
    pub fn alive_count(&self) -> usize {
        let stationary = self
            .stationary
            .iter_active()
            .filter(|(_, t)| t.core().is_alive())
            .count();
        let moving = self
            .moving
            .iter_active()
            .filter(|(_, t)| t.core().is_alive())
            .count();
        stationary + moving
    }

    /// Run `f` over every checked-out target.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(TargetId, &mut dyn TargetEntity)) {
        for (handle, t) in self.stationary.iter_active_mut() {
            f(TargetId::new(TargetKind::Stationary, handle), t);
        }
        for (handle, t) in self.moving.iter_active_mut() {
            f(TargetId::new(TargetKind::Moving, handle), t);
        }
    }

    pub fn views(&self) -> Vec<TargetView> {
        let stationary = self
            .stationary
            .iter_active()
            .map(|(h, t)| view(TargetId::new(TargetKind::Stationary, h), t));
        let moving = self
            .moving
            .iter_active()
            .map(|(h, t)| view(TargetId::new(TargetKind::Moving, h), t));
        stationary.chain(moving).collect()
    }

    pub fn stationary_pool(&self) -> &Pool<StationaryTarget> {
        &self.stationary
    }

    pub fn moving_pool(&self) -> &Pool<MovingTarget> {
        &self.moving
    }
}

fn view<T: TargetEntity>(id: TargetId, target: &T) -> TargetView {
    let core = target.core();
    let motion = if core.is_alive() {
        target.motion_state()
    } else {
        MotionState::Idle
    };
    TargetView {
        id,
        state: core.state(),
        health: core.health(),
        position: core.body().position,
        angular_velocity: core.body().angular_velocity,
        motion,
    }
}
