//! Session configuration.
//!
//! A plain data struct with named sections. Every section falls back to the
//! default tuning when absent from a JSON document, and the whole thing is
//! validated once before a session is constructed.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Configuration violations. These are fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be a finite number, zero or greater, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be non-zero")]
    Zero { field: &'static str },
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Countdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub duration_secs: f64,
    /// Start the session on the first tick without waiting for `StartSession`.
    pub auto_start: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: SESSION_DURATION_SECS,
            auto_start: false,
        }
    }
}

/// Target population and line layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub desired_count: u32,
    /// Center of the spawn line in world space.
    pub line_center: DVec3,
    /// Distance between neighbouring targets along +x.
    pub spacing: f64,
    pub respawn_delay_secs: f64,
    /// Probability that a spawned slot holds a moving target.
    pub moving_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            desired_count: DESIRED_TARGETS,
            line_center: DVec3::from_array(SPAWN_CENTER),
            spacing: TARGET_SPACING,
            respawn_delay_secs: RESPAWN_DELAY_SECS,
            moving_chance: 0.0,
        }
    }
}

/// Initial pool sizes and growth increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub projectile_capacity: usize,
    pub stationary_capacity: usize,
    pub moving_capacity: usize,
    /// Slots added when a pool runs dry.
    pub growth: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            projectile_capacity: PROJECTILE_POOL_CAPACITY,
            stationary_capacity: STATIONARY_POOL_CAPACITY,
            moving_capacity: MOVING_POOL_CAPACITY,
            growth: POOL_GROWTH,
        }
    }
}

/// Target health, destruction and removal tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub max_health: u32,
    pub fall_force: f64,
    pub boundary_distance: f64,
    pub removal_delay_secs: f64,
    pub stationary_score: u32,
    pub moving_score: u32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            max_health: TARGET_MAX_HEALTH,
            fall_force: TARGET_FALL_FORCE,
            boundary_distance: TARGET_BOUNDARY_DISTANCE,
            removal_delay_secs: TARGET_REMOVAL_DELAY_SECS,
            stationary_score: STATIONARY_SCORE,
            moving_score: MOVING_SCORE,
        }
    }
}

/// Moving target path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Length of the path from the start point.
    pub range: f64,
    /// Seconds per full out-and-back cycle.
    pub period_secs: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            range: MOTION_RANGE,
            period_secs: MOTION_PERIOD_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f64,
    pub lifetime_secs: f64,
    pub damage: u32,
    pub post_hit_delay_secs: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            lifetime_secs: PROJECTILE_LIFETIME_SECS,
            damage: PROJECTILE_DAMAGE,
            post_hit_delay_secs: PROJECTILE_POST_HIT_DELAY_SECS,
        }
    }
}

/// Magazine and reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub max_ammo: u32,
    pub reload_secs: f64,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            max_ammo: WEAPON_MAX_AMMO,
            reload_secs: WEAPON_RELOAD_SECS,
        }
    }
}

/// Configuration for a simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    /// Height of the built-in ground plane.
    pub ground_height: f64,
    pub session: SessionConfig,
    pub spawn: SpawnConfig,
    pub pools: PoolConfig,
    pub target: TargetConfig,
    pub motion: MotionConfig,
    pub projectile: ProjectileConfig,
    pub weapon: WeaponConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            ground_height: 0.0,
            session: SessionConfig::default(),
            spawn: SpawnConfig::default(),
            pools: PoolConfig::default(),
            target: TargetConfig::default(),
            motion: MotionConfig::default(),
            projectile: ProjectileConfig::default(),
            weapon: WeaponConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON document. Does not validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Check every field; the first violation wins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("time_scale", self.time_scale)?;
        finite("ground_height", self.ground_height)?;

        positive("session.duration_secs", self.session.duration_secs)?;

        non_zero("spawn.desired_count", self.spawn.desired_count as usize)?;
        if !self.spawn.line_center.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "spawn.line_center",
            });
        }
        non_negative("spawn.spacing", self.spawn.spacing)?;
        non_negative("spawn.respawn_delay_secs", self.spawn.respawn_delay_secs)?;
        unit_range("spawn.moving_chance", self.spawn.moving_chance)?;

        non_zero("pools.projectile_capacity", self.pools.projectile_capacity)?;
        non_zero("pools.stationary_capacity", self.pools.stationary_capacity)?;
        non_zero("pools.moving_capacity", self.pools.moving_capacity)?;
        non_zero("pools.growth", self.pools.growth)?;

        non_zero("target.max_health", self.target.max_health as usize)?;
        non_negative("target.fall_force", self.target.fall_force)?;
        positive("target.boundary_distance", self.target.boundary_distance)?;
        non_negative("target.removal_delay_secs", self.target.removal_delay_secs)?;

        non_negative("motion.range", self.motion.range)?;
        positive("motion.period_secs", self.motion.period_secs)?;

        positive("projectile.speed", self.projectile.speed)?;
        positive("projectile.lifetime_secs", self.projectile.lifetime_secs)?;
        non_zero("projectile.damage", self.projectile.damage as usize)?;
        non_negative(
            "projectile.post_hit_delay_secs",
            self.projectile.post_hit_delay_secs,
        )?;

        non_zero("weapon.max_ammo", self.weapon.max_ammo as usize)?;
        non_negative("weapon.reload_secs", self.weapon.reload_secs)?;

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn non_zero(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero { field })
    } else {
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}
