use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docdag::errors::{DocdagError, Result};
use docdag::exec::CommandRunner;
use docdag::fs::MockFileSystem;
use docdag::host::{ReleaseInfo, SourceHost};

/// A fake source host driven entirely by canned data.
///
/// - answers branch/release queries from fixed lists
/// - records which branches were "cloned"
/// - optionally materialises a manifest file on clone, the way a real
///   checkout would
pub struct FakeHost {
    branches: Vec<String>,
    release: String,
    local: String,
    cloned: Arc<Mutex<Vec<String>>>,
    materialise: Option<(MockFileSystem, PathBuf, String)>,
    fail_branches: bool,
}

impl FakeHost {
    pub fn new(branches: &[&str], release: &str) -> Self {
        Self {
            branches: branches.iter().map(|b| b.to_string()).collect(),
            release: release.to_string(),
            local: "docs-edits".to_string(),
            cloned: Arc::new(Mutex::new(Vec::new())),
            materialise: None,
            fail_branches: false,
        }
    }

    /// Branch reported as checked out in the docs workspace.
    pub fn with_local_branch(mut self, branch: &str) -> Self {
        self.local = branch.to_string();
        self
    }

    /// On clone, write `contents` to `path` in `fs`, simulating the
    /// checkout appearing on disk.
    pub fn materialising(
        mut self,
        fs: &MockFileSystem,
        path: impl Into<PathBuf>,
        contents: &str,
    ) -> Self {
        self.materialise = Some((fs.clone(), path.into(), contents.to_string()));
        self
    }

    /// Make `list_branches` fail, for exercising error paths.
    pub fn failing_branch_list(mut self) -> Self {
        self.fail_branches = true;
        self
    }

    /// Shared handle to the clone log; grab it before handing the host
    /// to the pipeline.
    pub fn clone_recorder(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.cloned)
    }
}

#[async_trait]
impl SourceHost for FakeHost {
    async fn list_branches(&self) -> Result<Vec<String>> {
        if self.fail_branches {
            return Err(DocdagError::HostError(
                "branch list unavailable".to_string(),
            ));
        }
        Ok(self.branches.clone())
    }

    async fn latest_release(&self) -> Result<ReleaseInfo> {
        Ok(ReleaseInfo {
            name: self.release.clone(),
        })
    }

    async fn clone_at(&self, branch: &str) -> Result<()> {
        self.cloned.lock().unwrap().push(branch.to_string());
        if let Some((fs, path, contents)) = &self.materialise {
            fs.add_file(path, contents.clone());
        }
        Ok(())
    }

    async fn local_branch(&self) -> Result<String> {
        Ok(self.local.clone())
    }
}

/// A command runner that records invocations instead of spawning
/// processes. Steps listed via `failing_on` report exit code 1.
pub struct FakeRunner {
    invocations: Arc<Mutex<Vec<(String, String)>>>,
    fail_on: Vec<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            fail_on: Vec::new(),
        }
    }

    pub fn failing_on(mut self, step: &str) -> Self {
        self.fail_on.push(step.to_string());
        self
    }

    /// Shared handle to the `(step, cmd)` invocation log; grab it before
    /// handing the runner to the pipeline.
    pub fn recorder(&self) -> Arc<Mutex<Vec<(String, String)>>> {
        Arc::clone(&self.invocations)
    }
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, name: &str, cmd: &str) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.invocations
            .lock()
            .unwrap()
            .push((name.to_string(), cmd.to_string()));
        let fail = self.fail_on.iter().any(|s| s == name);
        let name = name.to_string();
        Box::pin(async move {
            if fail {
                Err(DocdagError::CommandFailed { name, code: 1 })
            } else {
                Ok(())
            }
        })
    }
}
