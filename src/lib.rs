// src/lib.rs

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod host;
pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod readiness;
pub mod version;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::loader::load_and_validate;
use crate::dag::Scheduler;
use crate::exec::{CommandRunner, ShellRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::{GitHubHost, SourceHost};
use crate::pipeline::{BuildPipeline, VersionSelector};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the source host, filesystem and command runner collaborators
/// - flow selection per subcommand
/// - the scheduler run (or the watch loop)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = Arc::new(load_and_validate(&config_path)?);

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let runner: Arc<dyn CommandRunner> = Arc::new(ShellRunner);
    let host: Arc<dyn SourceHost> = Arc::new(GitHubHost::new(
        &cfg.source.repo,
        cfg.source_path(),
        cfg.token.clone(),
    )?);
    let pipeline = BuildPipeline::new(Arc::clone(&cfg), host, fs, runner);

    match args.command {
        Command::Generate {
            source_version,
            dry_run,
        } => {
            let selector = VersionSelector::parse(source_version.as_deref());
            let graph = pipeline.full_flow(selector.as_ref())?;
            let scheduler = Scheduler::new(graph)?;
            let requests = BuildPipeline::full_flow_requests();
            if dry_run {
                print_plan(&scheduler, &requests)?;
                return Ok(());
            }
            let report = scheduler.run(&requests).await?;
            info!(tasks = report.executed.len(), "documentation build finished");
            Ok(())
        }
        Command::Build {
            source_version,
            tutorials_only,
            dry_run,
        } => {
            let selector = VersionSelector::parse(source_version.as_deref());
            let graph = pipeline.build_only_flow(selector.as_ref(), tutorials_only)?;
            let scheduler = Scheduler::new(graph)?;
            let requests = BuildPipeline::build_only_requests(tutorials_only);
            if dry_run {
                print_plan(&scheduler, requests)?;
                return Ok(());
            }
            let report = scheduler.run(requests).await?;
            info!(tasks = report.executed.len(), "documentation build finished");
            Ok(())
        }
        Command::Clean => {
            let graph = pipeline.clean_flow()?;
            let scheduler = Scheduler::new(graph)?;
            let report = scheduler.run(&BuildPipeline::clean_requests()).await?;
            debug!(tasks = report.executed.len(), "clean finished");
            Ok(())
        }
        Command::Watch { source_version } => {
            let selector = VersionSelector::parse(source_version.as_deref());
            watch::run_watch(&pipeline, selector.as_ref()).await?;
            Ok(())
        }
    }
}

/// Print the tasks a run would execute, in order, without executing.
fn print_plan(scheduler: &Scheduler, requests: &[&str]) -> Result<()> {
    let order = scheduler.execution_order(requests)?;
    println!("docdag plan ({} tasks):", order.len());
    for id in &order {
        let prerequisites = scheduler.prerequisites_of(id);
        if prerequisites.is_empty() {
            println!("  - {id}");
        } else {
            println!("  - {id} (after: {})", prerequisites.join(", "));
        }
    }
    debug!("dry-run complete (no execution)");
    Ok(())
}
