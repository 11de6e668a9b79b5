//! Player commands sent from the input layer to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Weapon ---
    /// Trigger pull. Gated by the ammo/reload state.
    Fire { origin: DVec3, direction: DVec3 },
    /// Manual reload request.
    Reload,

    // --- Session control ---
    /// Start the countdown and the target spawner.
    StartSession,
    /// Sweep everything back into the pools and start over.
    Restart,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Set time scale (1.0 = normal, 2.0 = double, 0.0 = frozen).
    SetTimeScale { scale: f64 },
}
