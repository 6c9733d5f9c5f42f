// src/host/github.rs

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use octocrab::Octocrab;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{DocdagError, Result};

use super::{ReleaseInfo, SourceHost};

/// GitHub-backed [`SourceHost`].
///
/// Branch and release queries go through the REST API; the clone and the
/// local branch lookup shell out to `git`, which handles authentication
/// for the clone the same way any local `git` invocation would.
pub struct GitHubHost {
    repo_url: String,
    owner: String,
    repo: String,
    token: Option<String>,
    /// Where `clone_at` puts the checkout.
    dest: PathBuf,
}

impl GitHubHost {
    /// `repo_url` must be a GitHub clone URL (SSH or HTTPS) so the owner
    /// and repository name can be derived for API calls.
    pub fn new(repo_url: &str, dest: impl Into<PathBuf>, token: Option<String>) -> Result<Self> {
        let (owner, repo) = parse_remote(repo_url).ok_or_else(|| {
            DocdagError::ConfigError(format!(
                "cannot derive owner/repo from source URL '{}'",
                repo_url
            ))
        })?;

        Ok(Self {
            repo_url: repo_url.to_string(),
            owner,
            repo,
            token,
            dest: dest.into(),
        })
    }

    fn client(&self) -> Result<Octocrab> {
        let mut builder = Octocrab::builder();
        if let Some(token) = &self.token {
            builder = builder.personal_token(token.clone());
        }
        builder
            .build()
            .map_err(|e| DocdagError::HostError(format!("creating GitHub client: {}", e)))
    }
}

#[async_trait]
impl SourceHost for GitHubHost {
    async fn list_branches(&self) -> Result<Vec<String>> {
        let client = self.client()?;
        let page = client
            .repos(&self.owner, &self.repo)
            .list_branches()
            .per_page(100)
            .send()
            .await
            .map_err(|e| {
                DocdagError::HostError(format!(
                    "listing branches of {}/{}: {}",
                    self.owner, self.repo, e
                ))
            })?;

        let branches = client.all_pages(page).await.map_err(|e| {
            DocdagError::HostError(format!(
                "paging branch list of {}/{}: {}",
                self.owner, self.repo, e
            ))
        })?;

        Ok(branches.into_iter().map(|b| b.name).collect())
    }

    async fn latest_release(&self) -> Result<ReleaseInfo> {
        let client = self.client()?;
        let release = client
            .repos(&self.owner, &self.repo)
            .releases()
            .get_latest()
            .await
            .map_err(|e| {
                DocdagError::HostError(format!(
                    "querying latest release of {}/{}: {}",
                    self.owner, self.repo, e
                ))
            })?;

        let name = release
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or(release.tag_name);
        Ok(ReleaseInfo { name })
    }

    async fn clone_at(&self, branch: &str) -> Result<()> {
        info!(
            branch = %branch,
            repo = %self.repo_url,
            dest = %self.dest.display(),
            "cloning source repository"
        );
        let dest = self.dest.as_os_str().to_string_lossy().to_string();
        run_git(
            "git clone",
            &["clone", "--branch", branch, &self.repo_url, &dest],
        )
        .await
    }

    async fn local_branch(&self) -> Result<String> {
        let output = capture_git("git rev-parse", &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(output.trim().to_string())
    }
}

/// Parse a GitHub remote URL into `(owner, repo)`.
fn parse_remote(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;

    let path = rest.strip_suffix(".git").unwrap_or(rest);
    let path = path.trim_end_matches('/');
    let (owner, repo) = path.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Run a `git` subcommand, streaming its stderr into the log.
async fn run_git(name: &str, args: &[&str]) -> Result<()> {
    let mut command = Command::new("git");
    command
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning {}", name))?;

    if let Some(stderr) = child.stderr.take() {
        let name = name.to_string();
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(step = %name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for {}", name))?;

    if status.success() {
        Ok(())
    } else {
        Err(DocdagError::CommandFailed {
            name: name.to_string(),
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Run a `git` subcommand and return its stdout.
async fn capture_git(name: &str, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .await
        .with_context(|| format!("running {}", name))?;

    if !output.status.success() {
        return Err(DocdagError::CommandFailed {
            name: name.to_string(),
            code: output.status.code().unwrap_or(-1),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
