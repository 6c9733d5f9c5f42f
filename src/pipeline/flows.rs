// src/pipeline/flows.rs

//! Graph construction for the three flows.
//!
//! Each task body captures its collaborators up front, so a graph that
//! constructs successfully has everything it needs to run: command
//! strings are resolved here and a flow whose config lacks a needed
//! command fails before anything executes.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::artifacts;
use crate::dag::{task_action, TaskGraph};
use crate::errors::{DocdagError, Result};
use crate::fs::FileSystem;
use crate::host::SourceHost;
use crate::manifest::read_manifest;
use crate::readiness::ReadinessPoller;
use crate::version::VersionResolver;

use super::{
    BuildPipeline, GeneratorQuery, VersionSelector, CLEAN_OUTPUT, CLEAN_SOURCE, COMPILE_STYLES,
    COPY_ASSETS, DRAFT_LABEL, EMIT_SITEMAP, FETCH_SOURCE, GENERATE_DOCS, GENERATE_TUTORIALS,
    ROBOTS_DISALLOW, VERSION_LIST, WAIT_SOURCE,
};

impl BuildPipeline {
    /// Graph for the full flow: discard the previous checkout, fetch the
    /// requested branch, wait for the manifest, run the build steps and
    /// write both version artifacts.
    ///
    /// The draft selector is rejected here: a draft build documents
    /// uncommitted work, so there is nothing to fetch.
    pub fn full_flow(&self, selector: Option<&VersionSelector>) -> Result<TaskGraph> {
        let pinned_branch = match selector {
            Some(VersionSelector::Next) => {
                return Err(DocdagError::ConfigError(
                    "draft builds ('next') do not fetch the source; use the build command"
                        .to_string(),
                ));
            }
            Some(VersionSelector::Latest) => Some(self.config.source.default_branch.clone()),
            Some(VersionSelector::Explicit(branch)) => Some(branch.clone()),
            None => None,
        };

        let compile = required_command("compile_styles", &self.config.commands.compile_styles)?;
        let copy = required_command("copy_assets", &self.config.commands.copy_assets)?;
        let sitemap = required_command("emit_sitemap", &self.config.commands.emit_sitemap)?;

        let mut graph = TaskGraph::new();

        self.register_clean(&mut graph, CLEAN_SOURCE, self.config.source_path())?;

        {
            let host = Arc::clone(&self.host);
            graph.register(
                FETCH_SOURCE,
                &[CLEAN_SOURCE],
                task_action(move || async move {
                    let branch = match pinned_branch {
                        Some(branch) => branch,
                        None => host.local_branch().await?,
                    };
                    info!(branch = %branch, "fetching source repository");
                    host.clone_at(&branch).await
                }),
            )?;
        }

        {
            let fs = Arc::clone(&self.fs);
            let manifest_path = self.config.manifest_path();
            let poller =
                ReadinessPoller::new(self.config.poll_interval(), self.config.wait_timeout());
            graph.register(
                WAIT_SOURCE,
                &[FETCH_SOURCE],
                task_action(move || async move {
                    poller
                        .wait_until("source manifest", move || fs.is_file(&manifest_path))
                        .await
                }),
            )?;
        }

        self.register_step(&mut graph, COMPILE_STYLES, &[WAIT_SOURCE], compile)?;
        self.register_step(&mut graph, COPY_ASSETS, &[COMPILE_STYLES], copy)?;
        self.register_generate(&mut graph, GENERATE_DOCS, &[COPY_ASSETS], selector)?;
        self.register_step(&mut graph, EMIT_SITEMAP, &[GENERATE_DOCS], sitemap)?;

        {
            let host = Arc::clone(&self.host);
            let fs = Arc::clone(&self.fs);
            let resolver = self.resolver();
            let path = self.config.versions_script_path();
            graph.register(
                VERSION_LIST,
                &[EMIT_SITEMAP],
                task_action(move || async move {
                    let branches = host.list_branches().await?;
                    let entries = resolver.resolve(&branches);
                    artifacts::write_version_script(fs.as_ref(), &path, &entries)
                }),
            )?;
        }

        {
            let host = Arc::clone(&self.host);
            let fs = Arc::clone(&self.fs);
            let resolver = self.resolver();
            let path = self.config.robots_path();
            graph.register(
                ROBOTS_DISALLOW,
                &[EMIT_SITEMAP],
                task_action(move || async move {
                    let branches = host.list_branches().await?;
                    let entries = resolver.resolve(&branches);
                    artifacts::write_robots_disallow(fs.as_ref(), &path, &entries)
                }),
            )?;
        }

        Ok(graph)
    }

    /// Graph for the build-only flow: the compile/copy/generate/sitemap
    /// chain over a checkout that is already present.
    ///
    /// With `tutorials_only` the graph holds just the tutorial step.
    /// Otherwise the tutorial step rides along (without prerequisites)
    /// whenever its command is configured, so watch groups can trigger
    /// it.
    pub fn build_only_flow(
        &self,
        selector: Option<&VersionSelector>,
        tutorials_only: bool,
    ) -> Result<TaskGraph> {
        let mut graph = TaskGraph::new();

        if tutorials_only {
            self.register_generate(&mut graph, GENERATE_TUTORIALS, &[], selector)?;
            return Ok(graph);
        }

        let compile = required_command("compile_styles", &self.config.commands.compile_styles)?;
        let copy = required_command("copy_assets", &self.config.commands.copy_assets)?;
        let sitemap = required_command("emit_sitemap", &self.config.commands.emit_sitemap)?;

        self.register_step(&mut graph, COMPILE_STYLES, &[], compile)?;
        self.register_step(&mut graph, COPY_ASSETS, &[COMPILE_STYLES], copy)?;
        self.register_generate(&mut graph, GENERATE_DOCS, &[COPY_ASSETS], selector)?;
        self.register_step(&mut graph, EMIT_SITEMAP, &[GENERATE_DOCS], sitemap)?;

        if self.config.commands.generate_tutorials.is_some() {
            self.register_generate(&mut graph, GENERATE_TUTORIALS, &[], selector)?;
        }

        Ok(graph)
    }

    /// Graph for the clean flow: drop the generated output and the
    /// source checkout.
    pub fn clean_flow(&self) -> Result<TaskGraph> {
        let mut graph = TaskGraph::new();
        self.register_clean(&mut graph, CLEAN_OUTPUT, self.config.output_dir())?;
        self.register_clean(&mut graph, CLEAN_SOURCE, self.config.source_path())?;
        Ok(graph)
    }

    fn resolver(&self) -> VersionResolver {
        VersionResolver::new(
            self.config.floor().clone(),
            self.config.versions.aliases.clone(),
        )
    }

    fn register_clean(
        &self,
        graph: &mut TaskGraph,
        id: &'static str,
        path: PathBuf,
    ) -> Result<()> {
        let fs = Arc::clone(&self.fs);
        graph.register(
            id,
            &[],
            task_action(move || async move {
                info!(path = %path.display(), "removing directory");
                fs.remove_dir_all(&path)?;
                Ok(())
            }),
        )
    }

    /// Register a plain command step.
    fn register_step(
        &self,
        graph: &mut TaskGraph,
        id: &'static str,
        prerequisites: &[&str],
        cmd: String,
    ) -> Result<()> {
        let runner = Arc::clone(&self.runner);
        graph.register(
            id,
            prerequisites,
            task_action(move || async move { runner.run(id, &cmd).await }),
        )
    }

    /// Register a generator step; the version context is resolved when
    /// the task runs and appended to the command line.
    fn register_generate(
        &self,
        graph: &mut TaskGraph,
        id: &'static str,
        prerequisites: &[&str],
        selector: Option<&VersionSelector>,
    ) -> Result<()> {
        let base = match id {
            GENERATE_TUTORIALS => required_command(
                "generate_tutorials",
                &self.config.commands.generate_tutorials,
            )?,
            _ => required_command("generate", &self.config.commands.generate)?,
        };

        let selector = selector.cloned();
        let fs = Arc::clone(&self.fs);
        let host = Arc::clone(&self.host);
        let runner = Arc::clone(&self.runner);
        let default_branch = self.config.source.default_branch.clone();
        let manifest_path = self.config.manifest_path();

        graph.register(
            id,
            prerequisites,
            task_action(move || async move {
                let query =
                    resolve_query(selector, default_branch, manifest_path, fs, host).await?;
                let cmd = format!("{} --query '{}'", base, query.encode());
                runner.run(id, &cmd).await
            }),
        )
    }
}

/// Work out which version labels the generated pages carry.
///
/// With a selector the labels are fixed up front; without one the
/// current version comes from the fetched manifest and the latest from
/// the host's newest release.
async fn resolve_query(
    selector: Option<VersionSelector>,
    default_branch: String,
    manifest_path: PathBuf,
    fs: Arc<dyn FileSystem>,
    host: Arc<dyn SourceHost>,
) -> Result<GeneratorQuery> {
    match selector {
        Some(VersionSelector::Next) => Ok(GeneratorQuery::new(DRAFT_LABEL, DRAFT_LABEL)),
        Some(VersionSelector::Latest) => Ok(GeneratorQuery::new(
            default_branch.clone(),
            default_branch,
        )),
        Some(VersionSelector::Explicit(branch)) => {
            Ok(GeneratorQuery::new(branch.clone(), branch))
        }
        None => {
            let manifest = read_manifest(fs.as_ref(), &manifest_path)?;
            let release = host.latest_release().await?;
            Ok(GeneratorQuery::new(manifest.version, release.name))
        }
    }
}

fn required_command(name: &str, value: &Option<String>) -> Result<String> {
    value.clone().ok_or_else(|| {
        DocdagError::ConfigError(format!("[commands].{} is required for this flow", name))
    })
}
