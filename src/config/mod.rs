// src/config/mod.rs

//! Configuration loading and validation for docdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants like a usable source repo and a parseable
//!   version floor (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, TOKEN_ENV_VAR};
pub use model::{
    CommandsSection, ConfigFile, FetchSection, OutputSection, RawConfigFile, SourceSection,
    VersionsSection, WatchGroup,
};
