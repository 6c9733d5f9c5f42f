// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::watch::patterns::WatchProfile;

/// One watch group firing for a changed path.
#[derive(Debug, Clone)]
pub struct WatchTrigger {
    pub group: String,
    pub tasks: Vec<String>,
    pub debounce: Duration,
}

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept
/// alive for as long as needed. Dropping this handle stops file
/// watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing `root` recursively.
///
/// Every changed path is matched against the group profiles; each match
/// sends a [`WatchTrigger`] on `trigger_tx`. Debouncing and the actual
/// rebuilds happen on the receiving side.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    profiles: Vec<WatchProfile>,
    trigger_tx: mpsc::UnboundedSender<WatchTrigger>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let profiles = Arc::new(profiles);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        {
            let event_tx = event_tx.clone();
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fall back to stderr.
                        eprintln!("docdag: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("docdag: file watch error: {err}");
                }
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards group triggers.
    let async_root = root.clone();
    let async_profiles = Arc::clone(&profiles);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            for path in event.paths {
                let Some(rel) = relative_to_root(&async_root, &path) else {
                    continue;
                };
                for profile in async_profiles.iter() {
                    if profile.matches(&rel) {
                        debug!(group = %profile.group(), path = %rel, "watch group matched");
                        let trigger = WatchTrigger {
                            group: profile.group().to_string(),
                            tasks: profile.tasks().to_vec(),
                            debounce: profile.debounce(),
                        };
                        if trigger_tx.send(trigger).is_err() {
                            // Receiver is gone; the watch session ended.
                            return;
                        }
                    }
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Path relative to the watch root, normalised to forward slashes for
/// glob matching.
fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = rel.to_string_lossy().replace('\\', "/");
    if rel.is_empty() {
        None
    } else {
        Some(rel)
    }
}
