//! Session setup: resolve entity definitions and build the pools.

use tracing::warn;

use gallery_core::config::SimConfig;
use gallery_core::definitions::{EntityDefinitions, ProjectileDefinition, TargetDefinition};

use crate::projectile::ProjectileSimulator;
use crate::target::TargetPools;

/// Definitions with every gap filled by a fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDefinitions {
    pub stationary_target: TargetDefinition,
    pub moving_target: TargetDefinition,
    pub projectile: ProjectileDefinition,
}

/// Substitute the built-in fallback for each missing definition.
pub fn resolve_definitions(defs: &EntityDefinitions) -> ResolvedDefinitions {
    let stationary_target = defs.stationary_target.clone().unwrap_or_else(|| {
        warn!("no stationary target definition, using fallback");
        TargetDefinition::fallback_stationary()
    });
    let moving_target = defs.moving_target.clone().unwrap_or_else(|| {
        warn!("no moving target definition, using fallback");
        TargetDefinition::fallback_moving()
    });
    let projectile = defs.projectile.clone().unwrap_or_else(|| {
        warn!("no projectile definition, using fallback");
        ProjectileDefinition::fallback()
    });
    ResolvedDefinitions {
        stationary_target,
        moving_target,
        projectile,
    }
}

pub fn build_target_pools(config: &SimConfig, defs: &ResolvedDefinitions) -> TargetPools {
    TargetPools::new(
        &config.pools,
        &config.target,
        &config.motion,
        defs.stationary_target.clone(),
        defs.moving_target.clone(),
    )
}

pub fn build_projectiles(config: &SimConfig, defs: &ResolvedDefinitions) -> ProjectileSimulator {
    ProjectileSimulator::new(&config.pools, &config.projectile, defs.projectile.clone())
}
