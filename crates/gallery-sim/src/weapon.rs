//! Magazine and reload timer gating fire requests.

use gallery_core::config::WeaponConfig;
use gallery_core::constants::TIME_EPSILON;
use gallery_core::enums::FireRejection;
use gallery_core::state::AmmoView;

/// A round was spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub ammo_remaining: u32,
    /// The magazine ran dry and an automatic reload began.
    pub reload_started: bool,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    ammo: u32,
    max_ammo: u32,
    reload_secs: f64,
    /// Seconds left on the current reload, if one is running.
    reload_remaining: Option<f64>,
}

impl Weapon {
    pub fn new(config: &WeaponConfig) -> Self {
        Self {
            ammo: config.max_ammo,
            max_ammo: config.max_ammo,
            reload_secs: config.reload_secs,
            reload_remaining: None,
        }
    }

    pub fn try_fire(&mut self) -> Result<Shot, FireRejection> {
        if self.is_reloading() {
            return Err(FireRejection::Reloading);
        }
        if self.ammo == 0 {
            return Err(FireRejection::Empty);
        }
        self.ammo -= 1;
        let reload_started = self.ammo == 0 && self.start_reload();
        Ok(Shot {
            ammo_remaining: self.ammo,
            reload_started,
        })
    }

    /// Manual reload. Ignored while reloading or with a full magazine.
    pub fn request_reload(&mut self) -> bool {
        if self.ammo >= self.max_ammo {
            return false;
        }
        self.start_reload()
    }

    /// Tick the reload timer. Returns true on the tick the magazine refills.
    pub fn advance(&mut self, dt: f64) -> bool {
        let Some(remaining) = self.reload_remaining.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining > TIME_EPSILON {
            return false;
        }
        self.reload_remaining = None;
        self.ammo = self.max_ammo;
        true
    }

    pub fn reset(&mut self) {
        self.ammo = self.max_ammo;
        self.reload_remaining = None;
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining.is_some()
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn reload_secs(&self) -> f64 {
        self.reload_secs
    }

    pub fn view(&self) -> AmmoView {
        let reload_progress = match self.reload_remaining {
            Some(remaining) if self.reload_secs > 0.0 => {
                (1.0 - remaining / self.reload_secs).clamp(0.0, 1.0)
            }
            _ => 0.0,
        };
        AmmoView {
            current: self.ammo,
            max: self.max_ammo,
            reloading: self.is_reloading(),
            reload_progress,
        }
    }

    fn start_reload(&mut self) -> bool {
        if self.is_reloading() {
            return false;
        }
        self.reload_remaining = Some(self.reload_secs);
        true
    }
}
