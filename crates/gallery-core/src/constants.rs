//! Simulation constants and default tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravity (m/s²) applied to falling bodies, along -y.
pub const GRAVITY: f64 = 9.81;

/// Slack used when comparing accumulated float timers against zero or a due time.
pub const TIME_EPSILON: f64 = 1e-6;

// --- Session ---

pub const SESSION_DURATION_SECS: f64 = 60.0;

// --- Spawning ---

pub const DESIRED_TARGETS: u32 = 5;
pub const TARGET_SPACING: f64 = 2.5;
/// Line center: 10 m in front of the shooter (-z), 1 m up.
pub const SPAWN_CENTER: [f64; 3] = [0.0, 1.0, -10.0];
pub const RESPAWN_DELAY_SECS: f64 = 1.0;

// --- Targets ---

pub const TARGET_MAX_HEALTH: u32 = 1;
/// Impulse magnitude applied to a target when it is destroyed.
pub const TARGET_FALL_FORCE: f64 = 20.0;
/// Torque factor relative to the fall force.
pub const TARGET_FALL_TORQUE_FACTOR: f64 = 0.5;
/// Distance from spawn beyond which an active target is invalidated.
pub const TARGET_BOUNDARY_DISTANCE: f64 = 30.0;
/// Seconds a removed target stays visible before returning to its pool.
pub const TARGET_REMOVAL_DELAY_SECS: f64 = 5.0;
pub const STATIONARY_SCORE: u32 = 10;
pub const MOVING_SCORE: u32 = 20;

// --- Moving targets ---

pub const MOTION_RANGE: f64 = 4.0;
/// Seconds for one full out-and-back cycle.
pub const MOTION_PERIOD_SECS: f64 = 3.0;

// --- Projectiles ---

pub const PROJECTILE_SPEED: f64 = 50.0;
pub const PROJECTILE_LIFETIME_SECS: f64 = 5.0;
pub const PROJECTILE_DAMAGE: u32 = 10;
/// Seconds a projectile stays embedded in a target after a hit.
pub const PROJECTILE_POST_HIT_DELAY_SECS: f64 = 0.5;
/// Secondary torque factor applied around the contact point on hit.
pub const PROJECTILE_HIT_TORQUE_FACTOR: f64 = 0.1;

// --- Weapon ---

pub const WEAPON_MAX_AMMO: u32 = 5;
pub const WEAPON_RELOAD_SECS: f64 = 2.0;

// --- Pools ---

pub const PROJECTILE_POOL_CAPACITY: usize = 50;
pub const STATIONARY_POOL_CAPACITY: usize = 20;
pub const MOVING_POOL_CAPACITY: usize = 10;
pub const POOL_GROWTH: usize = 5;

// --- Fallback entity definitions ---

pub const FALLBACK_TARGET_MASS: f64 = 2.0;
pub const FALLBACK_TARGET_DAMPING: f64 = 0.5;
pub const FALLBACK_STATIONARY_SIZE: [f64; 3] = [1.0, 2.0, 1.0];
pub const FALLBACK_MOVING_SIZE: [f64; 3] = [1.0, 2.0, 0.2];
pub const FALLBACK_PROJECTILE_MASS: f64 = 0.1;
pub const FALLBACK_PROJECTILE_RADIUS: f64 = 0.05;
