// src/dag/mod.rs

//! Task graph representation and scheduling.
//!
//! - [`graph`] holds the directed acyclic graph of named tasks and their
//!   actions.
//! - [`scheduler`] validates a finished graph and runs the requested
//!   tasks sequentially in dependency order, stopping at the first
//!   failure.

pub mod graph;
pub mod scheduler;

pub use graph::{task_action, TaskAction, TaskFuture, TaskGraph};
pub use scheduler::{RunReport, Scheduler};
