// src/watch/mod.rs

//! File watching and change-driven rebuilds.
//!
//! This module is responsible for:
//! - Compiling `files` / `exclude` glob patterns per watch group.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Debouncing change bursts and re-running the mapped build tasks.
//!
//! Rebuilds reuse the build-only flow, so a task triggered here runs
//! with its usual prerequisites. Failures are logged and the session
//! keeps watching.

pub mod patterns;
pub mod watcher;

pub use patterns::{build_watch_profiles, WatchProfile};
pub use watcher::{spawn_watcher, WatchTrigger, WatcherHandle};

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::Scheduler;
use crate::errors::{DocdagError, Result};
use crate::pipeline::{BuildPipeline, VersionSelector};

/// Watch the docs workspace and rebuild on changes until Ctrl-C.
pub async fn run_watch(
    pipeline: &BuildPipeline,
    selector: Option<&VersionSelector>,
) -> Result<()> {
    let profiles = build_watch_profiles(pipeline.config())?;
    if profiles.is_empty() {
        return Err(DocdagError::ConfigError(
            "watch mode needs at least one [watch.<name>] group".to_string(),
        ));
    }

    // Build the flow once up front so missing commands surface before
    // the first change instead of on every rebuild.
    {
        let graph = pipeline.build_only_flow(selector, false)?;
        for profile in &profiles {
            for task in profile.tasks() {
                if !graph.contains(task) {
                    return Err(DocdagError::ConfigError(format!(
                        "[watch.{}] triggers '{}' but its command is not configured",
                        profile.group(),
                        task
                    )));
                }
            }
        }
        Scheduler::new(graph)?;
    }

    let (trigger_tx, mut trigger_rx) = mpsc::unbounded_channel::<WatchTrigger>();
    let _watcher = spawn_watcher(".", profiles, trigger_tx)?;

    info!("watching for changes; press Ctrl-C to stop");

    loop {
        let first = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                return Ok(());
            }
            trigger = trigger_rx.recv() => match trigger {
                Some(trigger) => trigger,
                None => return Ok(()),
            },
        };

        // Let the quiet period pass, absorbing further triggers into the
        // same rebuild. Overlapping groups extend the window to their
        // own debounce.
        let mut tasks: Vec<String> = Vec::new();
        let mut debounce = first.debounce;
        merge_tasks(&mut tasks, first);
        loop {
            match tokio::time::timeout(debounce, trigger_rx.recv()).await {
                Ok(Some(trigger)) => {
                    debounce = debounce.max(trigger.debounce);
                    merge_tasks(&mut tasks, trigger);
                }
                Ok(None) => break,
                Err(_elapsed) => break,
            }
        }

        let requested: Vec<&str> = tasks.iter().map(String::as_str).collect();
        info!(tasks = ?requested, "change detected; rebuilding");

        let graph = pipeline.build_only_flow(selector, false)?;
        let scheduler = Scheduler::new(graph)?;
        match scheduler.run(&requested).await {
            Ok(report) => {
                debug!(tasks = report.executed.len(), "rebuild finished");
            }
            Err(err) => {
                error!(error = %err, "rebuild failed; still watching");
            }
        }
    }
}

fn merge_tasks(tasks: &mut Vec<String>, trigger: WatchTrigger) {
    for task in trigger.tasks {
        if !tasks.contains(&task) {
            tasks.push(task);
        }
    }
}
