// src/exec/mod.rs

//! Process execution layer.
//!
//! The pipeline talks to a [`CommandRunner`] instead of spawning
//! processes directly, which makes it easy to swap in a recording runner
//! in tests.
//!
//! - [`runner`] holds the trait plus the production [`ShellRunner`],
//!   which runs each step command through the platform shell with
//!   `tokio::process::Command` and streams its output into the log.

pub mod runner;

pub use runner::{CommandRunner, ShellRunner};
