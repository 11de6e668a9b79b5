//! Snapshot system: reads the engine's components and builds a `SessionSnapshot`.
//!
//! Read-only; never modifies simulation state.

use gallery_core::events::SimEvent;
use gallery_core::state::SessionSnapshot;
use gallery_core::types::SimTime;

use crate::projectile::ProjectileSimulator;
use crate::session::SessionClock;
use crate::spawner::SpawnCoordinator;
use crate::target::TargetPools;
use crate::weapon::Weapon;

/// Build a complete snapshot of the current session.
pub fn build_snapshot(
    time: &SimTime,
    clock: &SessionClock,
    coordinator: &SpawnCoordinator,
    weapon: &Weapon,
    targets: &TargetPools,
    projectiles: &ProjectileSimulator,
    events: Vec<SimEvent>,
) -> SessionSnapshot {
    SessionSnapshot {
        time: *time,
        phase: clock.phase(),
        outcome: clock.outcome(),
        time_remaining_secs: clock.remaining(),
        score: clock.score(),
        active_targets: coordinator.active_count(),
        ammo: weapon.view(),
        targets: targets.views(),
        projectiles: projectiles.views(),
        events,
    }
}
