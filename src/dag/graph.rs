// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::errors::{DocdagError, Result};

/// Future returned by a task action.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// A task body. Invoked at most once; completion is signalled through the
/// returned future.
pub type TaskAction = Box<dyn FnOnce() -> TaskFuture + Send>;

/// Box an async closure into a [`TaskAction`].
pub fn task_action<F, Fut>(f: F) -> TaskAction
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

pub(crate) struct TaskNode {
    pub(crate) id: String,
    pub(crate) prerequisites: Vec<String>,
    /// Taken out of the node when the task runs.
    pub(crate) action: Option<TaskAction>,
}

/// Named tasks with prerequisite edges, kept in registration order.
///
/// Registration is permissive about prerequisites that have not been
/// registered *yet*; the scheduler validates the finished graph (unknown
/// references, self-dependencies, cycles) before anything runs.
#[derive(Default)]
pub struct TaskGraph {
    nodes: Vec<TaskNode>,
    index: HashMap<String, usize>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task under a unique id.
    ///
    /// `prerequisites` are the ids of tasks that must have succeeded before
    /// this one starts.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        prerequisites: &[&str],
        action: TaskAction,
    ) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(DocdagError::DuplicateTask(id));
        }

        let node = TaskNode {
            id: id.clone(),
            prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
            action: Some(action),
        };
        self.index.insert(id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Task ids in registration order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Immediate prerequisites of a task; empty for unknown ids.
    pub fn prerequisites_of(&self, id: &str) -> &[String] {
        self.index
            .get(id)
            .map(|&i| self.nodes[i].prerequisites.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn node(&self, index: usize) -> &TaskNode {
        &self.nodes[index]
    }

    pub(crate) fn take_action(&mut self, index: usize) -> Option<TaskAction> {
        self.nodes[index].action.take()
    }
}

impl fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field("tasks", &self.nodes.iter().map(|n| &n.id).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
