// src/artifacts/mod.rs

//! Version artifacts written next to the generated site.
//!
//! Both writers consume the resolver's newest-first entry list. The byte
//! layouts here are load-bearing: the version selector script is sourced
//! by the published pages and the disallow fragment is spliced into
//! `robots.txt` by the deployment step.

use std::path::Path;

use tracing::info;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::version::VersionEntry;

/// Write the version selector script.
///
/// The payload is the entry list serialized as JSON, wrapped in a guarded
/// call so pages that don't define the hook ignore it:
/// `docVersions && docVersions([...])`. Entry order is preserved, so the
/// newest version stays first.
pub fn write_version_script(
    fs: &dyn FileSystem,
    path: &Path,
    entries: &[VersionEntry],
) -> Result<()> {
    let payload = serde_json::to_string(entries)?;
    let content = format!("docVersions && docVersions({})", payload);

    info!(
        path = %path.display(),
        versions = %join_labels(entries),
        "writing version list"
    );
    fs.write(path, content.as_bytes())?;
    Ok(())
}

/// Write the crawler disallow fragment.
///
/// Every version except the newest gets a `Disallow: /docs/<label>/`
/// line, using the public alias when one exists. The fragment starts
/// with one blank line and ends with two so it can be appended verbatim
/// to a `robots.txt`.
pub fn write_robots_disallow(
    fs: &dyn FileSystem,
    path: &Path,
    entries: &[VersionEntry],
) -> Result<()> {
    let lines: Vec<String> = entries
        .iter()
        .skip(1)
        .map(|entry| format!("Disallow: /docs/{}/", entry.display_label()))
        .collect();
    let content = format!("\n{}\n\n", lines.join("\n"));

    info!(
        path = %path.display(),
        excluded = lines.len(),
        "writing crawler disallow list"
    );
    fs.write(path, content.as_bytes())?;
    Ok(())
}

fn join_labels(entries: &[VersionEntry]) -> String {
    entries
        .iter()
        .map(VersionEntry::display_label)
        .collect::<Vec<_>>()
        .join(", ")
}
