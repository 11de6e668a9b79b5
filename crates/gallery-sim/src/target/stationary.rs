//! Stationary target: stands on its mount until knocked over.

use glam::DVec3;
use rand_chacha::ChaCha8Rng;

use gallery_core::config::TargetConfig;
use gallery_core::definitions::TargetDefinition;

use super::{DamageOutcome, DamageReceiver, TargetCore, TargetEntity};

#[derive(Debug, Clone)]
pub struct StationaryTarget {
    core: TargetCore,
}

impl StationaryTarget {
    pub fn new(def: &TargetDefinition, tuning: &TargetConfig) -> Self {
        Self {
            core: TargetCore::new(def, tuning, tuning.stationary_score),
        }
    }
}

impl DamageReceiver for StationaryTarget {
    fn take_damage(&mut self, amount: u32, rng: &mut ChaCha8Rng) -> DamageOutcome {
        self.core.take_damage(amount, rng)
    }

    fn is_alive(&self) -> bool {
        self.core.is_alive()
    }

    fn apply_impulse_at(&mut self, impulse: DVec3, point: DVec3) {
        self.core.body_mut().apply_impulse_at(impulse, point);
    }

    fn apply_torque_impulse(&mut self, torque: DVec3) {
        self.core.body_mut().apply_torque_impulse(torque);
    }
}

impl TargetEntity for StationaryTarget {
    fn core(&self) -> &TargetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TargetCore {
        &mut self.core
    }

    fn step(&mut self, dt: f64) {
        self.core.integrate(dt);
    }
}
