//! Loading configuration and entity definitions from JSON files.
//!
//! A path that does not exist falls back to the defaults with a warning.
//! Anything else that goes wrong (unreadable file, malformed JSON, a value
//! that fails validation) is returned as an error.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use gallery_core::config::SimConfig;
use gallery_core::definitions::EntityDefinitions;

use crate::error::AppError;

pub fn load_config(path: Option<&Path>) -> Result<SimConfig, AppError> {
    let config = match read_optional(path)? {
        Some(json) => SimConfig::from_json(&json)?,
        None => SimConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

pub fn load_definitions(path: Option<&Path>) -> Result<EntityDefinitions, AppError> {
    match read_optional(path)? {
        Some(json) => Ok(EntityDefinitions::from_json(&json)?),
        None => Ok(EntityDefinitions::default()),
    }
}

fn read_optional(path: Option<&Path>) -> Result<Option<String>, AppError> {
    let Some(path) = path else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(json) => {
            info!(path = %path.display(), "loaded settings file");
            Ok(Some(json))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "settings file not found, using defaults");
            Ok(None)
        }
        Err(source) => Err(AppError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::config::ConfigError;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gallery-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_no_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.spawn.desired_count, SimConfig::default().spawn.desired_count);
        assert!(load_definitions(None).unwrap().projectile.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("gallery-definitely-not-here.json");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.seed, SimConfig::default().seed);
    }

    #[test]
    fn test_partial_config_overrides_section() {
        let path = scratch_file("partial.json", r#"{ "seed": 99, "weapon": { "max_ammo": 8, "reload_secs": 1.0 } }"#);
        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.seed, 99);
        assert_eq!(config.weapon.max_ammo, 8);
        assert_eq!(config.session.duration_secs, SimConfig::default().session.duration_secs);
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let path = scratch_file("malformed.json", "{ seed: ");
        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::Config(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_invalid_value_is_fatal() {
        let path = scratch_file("invalid.json", r#"{ "session": { "duration_secs": 0.0, "auto_start": false } }"#);
        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, AppError::Config(ConfigError::NotPositive { .. })));
    }

    #[test]
    fn test_definitions_file() {
        let path = scratch_file("defs.json", r#"{ "projectile": { "mass": 0.25, "radius": 0.1 } }"#);
        let defs = load_definitions(Some(&path)).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(defs.projectile.unwrap().mass, 0.25);
        assert!(defs.stationary_target.is_none());
    }
}
