// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Source host error: {0}")]
    HostError(String),

    #[error("Gave up waiting for {what} after {waited:?}")]
    Stalled { what: String, waited: Duration },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task already registered: {0}")]
    DuplicateTask(String),

    #[error("Task '{task}' names unknown prerequisite '{prerequisite}'")]
    UnknownPrerequisite { task: String, prerequisite: String },

    #[error("Cycle detected in task graph: {0}")]
    GraphCycle(String),

    #[error("Task '{task}' failed: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: Box<DocdagError>,
    },

    #[error("Command for '{name}' exited with status {code}")]
    CommandFailed { name: String, code: i32 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DocdagError>;
