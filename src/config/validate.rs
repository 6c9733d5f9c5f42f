// src/config/validate.rs

use semver::Version;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DocdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::DocdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let floor = validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw, floor))
    }
}

/// Check the shape-level invariants and return the parsed version floor.
///
/// Validation of watch-group *task names* lives with the watch profiles,
/// which know which tasks exist.
fn validate_raw_config(cfg: &RawConfigFile) -> Result<Version> {
    validate_source(cfg)?;
    validate_fetch(cfg)?;
    validate_watch_groups(cfg)?;
    let floor = validate_versions(cfg)?;
    Ok(floor)
}

fn validate_source(cfg: &RawConfigFile) -> Result<()> {
    if cfg.source.repo.trim().is_empty() {
        return Err(DocdagError::ConfigError(
            "[source].repo is required".to_string(),
        ));
    }
    if cfg.source.path.trim().is_empty() {
        return Err(DocdagError::ConfigError(
            "[source].path must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_fetch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.fetch.poll_interval_ms == 0 {
        return Err(DocdagError::ConfigError(
            "[fetch].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_versions(cfg: &RawConfigFile) -> Result<Version> {
    let floor = Version::parse(&cfg.versions.floor).map_err(|e| {
        DocdagError::ConfigError(format!(
            "[versions].floor '{}' is not a version number: {}",
            cfg.versions.floor, e
        ))
    })?;

    // Alias keys must be version numbers, otherwise the entry can never
    // match a branch and is a typo.
    for key in cfg.versions.aliases.keys() {
        if Version::parse(key).is_err() {
            return Err(DocdagError::ConfigError(format!(
                "[versions.aliases] key '{}' is not a version number",
                key
            )));
        }
    }

    Ok(floor)
}

fn validate_watch_groups(cfg: &RawConfigFile) -> Result<()> {
    for (name, group) in cfg.watch.iter() {
        if group.files.is_empty() {
            return Err(DocdagError::ConfigError(format!(
                "[watch.{}] must list at least one file pattern",
                name
            )));
        }
        if group.tasks.is_empty() {
            return Err(DocdagError::ConfigError(format!(
                "[watch.{}] must list at least one task",
                name
            )));
        }
    }
    Ok(())
}
