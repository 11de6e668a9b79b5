//! Simulation engine for the shooting gallery.
//!
//! Owns the entity pools, target lifecycle, spawn coordination, session clock
//! and weapon, runs them at a fixed tick rate, and produces
//! `SessionSnapshot`s for presentation. Collision detection is external:
//! contacts are fed in through `SimulationEngine::report_collision`.

pub mod body;
pub mod engine;
pub mod pool;
pub mod projectile;
pub mod scheduler;
pub mod session;
pub mod setup;
pub mod spawner;
pub mod systems;
pub mod target;
pub mod weapon;

pub use gallery_core as core;
pub use engine::SimulationEngine;
