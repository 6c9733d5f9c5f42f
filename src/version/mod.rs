// src/version/mod.rs

//! Turning raw branch names into the published version list.
//!
//! - [`resolve`] filters branch names down to publishable versions,
//!   applies public aliases and orders the result newest-first.

pub mod resolve;

pub use resolve::{VersionEntry, VersionResolver};
