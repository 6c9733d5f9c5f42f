// src/watch/patterns.rs

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::ConfigFile;
use crate::errors::{DocdagError, Result};
use crate::pipeline::WATCHABLE_TASKS;

/// Compiled patterns for one `[watch.<name>]` group.
///
/// The patterns are relative to the docs workspace root. The watcher
/// passes relative paths (e.g. `"sass/main.scss"`) into `matches`.
#[derive(Clone)]
pub struct WatchProfile {
    group: String,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
    tasks: Vec<String>,
    debounce: Duration,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("group", &self.group)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    /// Name of the config group this profile was built from.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Build tasks this group triggers.
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Whether this group is interested in the given path (relative to
    /// the workspace root).
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Compile a profile for each `[watch.<name>]` group in the config.
///
/// Group tasks must be build-only steps; referencing anything else (a
/// fetch task, a typo) is a configuration error caught here, before the
/// watcher starts.
pub fn build_watch_profiles(cfg: &ConfigFile) -> Result<Vec<WatchProfile>> {
    let mut profiles = Vec::with_capacity(cfg.watch.len());

    for (name, group) in cfg.watch.iter() {
        for task in &group.tasks {
            if !WATCHABLE_TASKS.contains(&task.as_str()) {
                return Err(DocdagError::ConfigError(format!(
                    "[watch.{}] references unknown task '{}'; watchable tasks are: {}",
                    name,
                    task,
                    WATCHABLE_TASKS.join(", ")
                )));
            }
        }

        let watch_set = build_globset(&group.files)
            .with_context(|| format!("building watch globset for group {}", name))?;

        let exclude_set = if group.exclude.is_empty() {
            None
        } else {
            Some(
                build_globset(&group.exclude)
                    .with_context(|| format!("building exclude globset for group {}", name))?,
            )
        };

        profiles.push(WatchProfile {
            group: name.clone(),
            watch_set,
            exclude_set,
            tasks: group.tasks.clone(),
            debounce: Duration::from_millis(group.debounce_ms),
        });
    }

    Ok(profiles)
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> AnyResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
