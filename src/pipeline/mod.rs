// src/pipeline/mod.rs

//! Flow assembly: turns configuration and collaborators into runnable
//! task graphs.
//!
//! - [`flows`] builds the graphs for the full, build-only and clean
//!   flows.
//! - [`query`] holds the version context passed to the generator step.

mod flows;
pub mod query;

pub use query::GeneratorQuery;

use std::sync::Arc;

use crate::config::ConfigFile;
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use crate::host::SourceHost;

pub const CLEAN_SOURCE: &str = "clean-source";
pub const CLEAN_OUTPUT: &str = "clean-output";
pub const FETCH_SOURCE: &str = "fetch-source";
pub const WAIT_SOURCE: &str = "wait-source";
pub const COMPILE_STYLES: &str = "compile-styles";
pub const COPY_ASSETS: &str = "copy-assets";
pub const GENERATE_DOCS: &str = "generate-docs";
pub const GENERATE_TUTORIALS: &str = "generate-tutorials";
pub const EMIT_SITEMAP: &str = "emit-sitemap";
pub const VERSION_LIST: &str = "version-list";
pub const ROBOTS_DISALLOW: &str = "robots-disallow";

/// Tasks that watch groups are allowed to trigger.
pub const WATCHABLE_TASKS: &[&str] = &[
    COMPILE_STYLES,
    COPY_ASSETS,
    GENERATE_DOCS,
    GENERATE_TUTORIALS,
    EMIT_SITEMAP,
];

/// Version label used for draft builds.
pub const DRAFT_LABEL: &str = "next";

/// Version selector as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The configured default branch.
    Latest,
    /// Draft build of unreleased docs; only valid for build-only flows.
    Next,
    /// A specific branch name.
    Explicit(String),
}

impl VersionSelector {
    /// `None` when no selector was given; the pipeline then labels the
    /// build from the checkout itself.
    pub fn parse(arg: Option<&str>) -> Option<Self> {
        match arg {
            None => None,
            Some("latest") => Some(Self::Latest),
            Some(draft) if draft == DRAFT_LABEL => Some(Self::Next),
            Some(other) => Some(Self::Explicit(other.to_string())),
        }
    }
}

/// Shared collaborators plus config; hands out one task graph per flow.
///
/// Graphs are single-use: every run builds a fresh one, so repeating a
/// flow re-reads the branch list and rewrites the artifacts from
/// scratch.
pub struct BuildPipeline {
    config: Arc<ConfigFile>,
    host: Arc<dyn SourceHost>,
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CommandRunner>,
}

impl BuildPipeline {
    pub fn new(
        config: Arc<ConfigFile>,
        host: Arc<dyn SourceHost>,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            host,
            fs,
            runner,
        }
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Tasks to request for the full flow. Their prerequisites pull in
    /// the whole clean/fetch/wait/build chain.
    pub fn full_flow_requests() -> [&'static str; 2] {
        [VERSION_LIST, ROBOTS_DISALLOW]
    }

    /// Tasks to request for the build-only flow.
    pub fn build_only_requests(tutorials_only: bool) -> &'static [&'static str] {
        if tutorials_only {
            &[GENERATE_TUTORIALS]
        } else {
            &[EMIT_SITEMAP]
        }
    }

    /// Tasks to request for the clean flow.
    pub fn clean_requests() -> [&'static str; 2] {
        [CLEAN_OUTPUT, CLEAN_SOURCE]
    }
}
