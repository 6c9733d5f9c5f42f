// src/version/resolve.rs

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use serde::Serialize;
use tracing::debug;

/// Strict `MAJOR.MINOR.PATCH` shape. Pre-release or build suffixes never
/// pass, so `1.2.3-beta` is not a publishable version.
static VERSION_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("version shape pattern"));

/// Branches carrying this prefix hold in-progress docs and are never
/// published.
const DRAFT_PREFIX: &str = "draft-";

/// One published version.
///
/// Serializes to the wire shape the version selector script expects:
/// a bare entry becomes a JSON string, an aliased entry becomes a
/// two-element `[version, alias]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VersionEntry {
    /// Version published under its own number.
    Bare(String),
    /// Version published under an equivalent public alias.
    Aliased(String, String),
}

impl VersionEntry {
    /// The underlying version number.
    pub fn version(&self) -> &str {
        match self {
            VersionEntry::Bare(v) => v,
            VersionEntry::Aliased(v, _) => v,
        }
    }

    /// Label used in public paths; the alias wins when present.
    pub fn display_label(&self) -> &str {
        match self {
            VersionEntry::Bare(v) => v,
            VersionEntry::Aliased(_, alias) => alias,
        }
    }
}

/// Pure filter/alias/sort step from branch names to [`VersionEntry`]s.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    floor: Version,
    aliases: BTreeMap<String, String>,
}

impl VersionResolver {
    pub fn new(floor: Version, aliases: BTreeMap<String, String>) -> Self {
        Self { floor, aliases }
    }

    /// Resolve raw branch names into the publishable version list.
    ///
    /// Keeps names that look like a plain version number, are not drafts
    /// and are at or above the floor; orders the result newest-first by
    /// semantic version (so `10.0.0` sorts above `2.0.0`). Branch-list
    /// order never influences the output.
    pub fn resolve(&self, branches: &[String]) -> Vec<VersionEntry> {
        let mut versions: Vec<(Version, &str)> = branches
            .iter()
            .filter_map(|name| self.accept(name))
            .collect();

        versions.sort_by(|a, b| b.0.cmp(&a.0));

        let entries: Vec<VersionEntry> = versions
            .into_iter()
            .map(|(_, name)| self.entry_for(name))
            .collect();

        debug!(
            found = entries.len(),
            newest = entries.first().map(VersionEntry::version).unwrap_or("-"),
            "resolved publishable versions"
        );
        entries
    }

    fn accept<'a>(&self, name: &'a str) -> Option<(Version, &'a str)> {
        if !VERSION_SHAPE.is_match(name) || name.starts_with(DRAFT_PREFIX) {
            return None;
        }
        let parsed = Version::parse(name).ok()?;
        if parsed < self.floor {
            return None;
        }
        Some((parsed, name))
    }

    fn entry_for(&self, name: &str) -> VersionEntry {
        match self.aliases.get(name) {
            Some(alias) => VersionEntry::Aliased(name.to_string(), alias.clone()),
            None => VersionEntry::Bare(name.to_string()),
        }
    }
}
