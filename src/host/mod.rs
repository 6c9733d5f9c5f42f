// src/host/mod.rs

//! Source repository host collaborator.
//!
//! The pipeline only depends on the [`SourceHost`] trait; the production
//! implementation in [`github`] combines the GitHub API (branch and
//! release queries) with a `git` subprocess (clone, local branch
//! detection).

use async_trait::async_trait;

use crate::errors::Result;

pub mod github;

pub use github::GitHubHost;

/// Release metadata as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Human-visible release name, falling back to the tag name.
    pub name: String,
}

/// Queries and actions against the documented repository.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// All branch names of the source repository.
    async fn list_branches(&self) -> Result<Vec<String>>;

    /// The most recent published release.
    async fn latest_release(&self) -> Result<ReleaseInfo>;

    /// Clone the repository at `branch` into the configured source path.
    async fn clone_at(&self, branch: &str) -> Result<()>;

    /// Branch currently checked out in the docs workspace itself.
    async fn local_branch(&self) -> Result<String>;
}
