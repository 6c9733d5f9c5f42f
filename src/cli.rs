// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `docdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "docdag",
    version,
    about = "Build versioned documentation from a source repository.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Docdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Docdag.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOCDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch the source repository, build the docs and write the version
    /// artifacts.
    Generate {
        /// Which source version to document: an explicit branch name or
        /// `latest`. Defaults to the branch checked out in this workspace.
        #[arg(long, value_name = "SELECTOR")]
        source_version: Option<String>,

        /// Print the task plan without executing any commands.
        #[arg(long)]
        dry_run: bool,
    },

    /// Build the docs from a source checkout that is already present,
    /// skipping the clean/fetch/wait steps.
    Build {
        /// Which source version to label the build with: an explicit branch
        /// name, `latest`, or `next` for a draft build.
        #[arg(long, value_name = "SELECTOR")]
        source_version: Option<String>,

        /// Regenerate the tutorial pages only.
        #[arg(long)]
        tutorials_only: bool,

        /// Print the task plan without executing any commands.
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove the generated output and the fetched source checkout.
    Clean,

    /// Watch doc inputs and re-run the mapped build steps on changes.
    Watch {
        /// Version selector used when rebuilding, same as for `build`.
        #[arg(long, value_name = "SELECTOR")]
        source_version: Option<String>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
