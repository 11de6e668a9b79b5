//! Physical entity definitions (the "prefabs" a pool builds its entities from).
//!
//! Every entry is optional. The simulation substitutes a programmatically
//! built fallback for any missing entry so a session stays playable.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error, PartialEq)]
pub enum DefinitionError {
    #[error("malformed entity definitions: {0}")]
    Malformed(String),
    #[error("{entity}.{field} must be a finite number greater than zero, got {value}")]
    NotPositive {
        entity: &'static str,
        field: &'static str,
        value: f64,
    },
}

/// Rigid body parameters for a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
    pub mass: f64,
    pub linear_damping: f64,
    pub angular_damping: f64,
    /// Full box extents.
    pub size: DVec3,
}

impl TargetDefinition {
    pub fn fallback_stationary() -> Self {
        Self {
            mass: FALLBACK_TARGET_MASS,
            linear_damping: FALLBACK_TARGET_DAMPING,
            angular_damping: FALLBACK_TARGET_DAMPING,
            size: DVec3::from_array(FALLBACK_STATIONARY_SIZE),
        }
    }

    pub fn fallback_moving() -> Self {
        Self {
            size: DVec3::from_array(FALLBACK_MOVING_SIZE),
            ..Self::fallback_stationary()
        }
    }

    fn validate(&self, entity: &'static str) -> Result<(), DefinitionError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(DefinitionError::NotPositive {
                entity,
                field: "mass",
                value: self.mass,
            });
        }
        Ok(())
    }
}

/// Rigid body parameters for a projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileDefinition {
    pub mass: f64,
    pub radius: f64,
}

impl ProjectileDefinition {
    pub fn fallback() -> Self {
        Self {
            mass: FALLBACK_PROJECTILE_MASS,
            radius: FALLBACK_PROJECTILE_RADIUS,
        }
    }
}

/// Definitions as loaded from disk; any entry may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDefinitions {
    pub stationary_target: Option<TargetDefinition>,
    pub moving_target: Option<TargetDefinition>,
    pub projectile: Option<ProjectileDefinition>,
}

impl EntityDefinitions {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let defs: Self =
            serde_json::from_str(json).map_err(|e| DefinitionError::Malformed(e.to_string()))?;
        defs.validate()?;
        Ok(defs)
    }

    pub fn validate(&self) -> Result<(), DefinitionError> {
        if let Some(def) = &self.stationary_target {
            def.validate("stationary_target")?;
        }
        if let Some(def) = &self.moving_target {
            def.validate("moving_target")?;
        }
        if let Some(def) = &self.projectile {
            if !(def.mass.is_finite() && def.mass > 0.0) {
                return Err(DefinitionError::NotPositive {
                    entity: "projectile",
                    field: "mass",
                    value: def.mass,
                });
            }
        }
        Ok(())
    }
}
