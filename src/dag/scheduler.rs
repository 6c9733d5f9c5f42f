// src/dag/scheduler.rs

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, info, warn};

use crate::dag::graph::TaskGraph;
use crate::errors::{DocdagError, Result};

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Ids of the tasks that ran, in execution order.
    pub executed: Vec<String>,
}

/// One-shot sequential executor for a [`TaskGraph`].
///
/// Construction validates the graph; [`Scheduler::run`] then executes the
/// requested tasks plus their transitive prerequisites, one at a time, in
/// dependency order. The first failure aborts the run.
pub struct Scheduler {
    graph: TaskGraph,
}

impl Scheduler {
    /// Validate `graph` and wrap it for execution.
    ///
    /// Rejects unknown prerequisite references, self-dependencies and
    /// cycles, so a graph that constructs here always has an execution
    /// order.
    pub fn new(graph: TaskGraph) -> Result<Self> {
        validate_graph(&graph)?;
        Ok(Self { graph })
    }

    /// Task ids in registration order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.task_ids()
    }

    /// Immediate prerequisites of a task.
    pub fn prerequisites_of(&self, id: &str) -> &[String] {
        self.graph.prerequisites_of(id)
    }

    /// The order in which [`Scheduler::run`] would execute `requested`.
    ///
    /// Includes transitive prerequisites, lists every task exactly once,
    /// and breaks ties between unordered tasks by registration order, so
    /// the same graph always yields the same plan.
    pub fn execution_order(&self, requested: &[&str]) -> Result<Vec<String>> {
        let needed = self.collect_needed(requested)?;

        // Kahn's algorithm over the needed subgraph. The ready set is
        // keyed by registration index, which makes tie-breaking
        // deterministic.
        let mut indegree: HashMap<usize, usize> = HashMap::new();
        let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();

        for &idx in &needed {
            let mut degree = 0;
            for prereq in &self.graph.node(idx).prerequisites {
                // Validation guarantees the id resolves.
                let Some(prereq_idx) = self.graph.index_of(prereq) else {
                    continue;
                };
                if needed.contains(&prereq_idx) {
                    degree += 1;
                    dependents.entry(prereq_idx).or_default().push(idx);
                }
            }
            indegree.insert(idx, degree);
        }

        let mut ready: BTreeSet<usize> = indegree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&idx, _)| idx)
            .collect();

        let mut order = Vec::with_capacity(needed.len());
        while let Some(&idx) = ready.iter().next() {
            ready.remove(&idx);
            order.push(self.graph.node(idx).id.clone());

            for &dependent in dependents.get(&idx).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(degree) = indegree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        Ok(order)
    }

    /// Run `requested` and their prerequisites to completion.
    ///
    /// Tasks run strictly one after another; a task's action is not
    /// invoked until every prerequisite action has returned success. On
    /// the first failure the run stops and the error names the failed
    /// task, with the cause attached.
    pub async fn run(mut self, requested: &[&str]) -> Result<RunReport> {
        let order = self.execution_order(requested)?;
        info!(tasks = order.len(), "starting task run");

        let mut executed = Vec::with_capacity(order.len());
        for id in &order {
            let action = self
                .graph
                .index_of(id)
                .and_then(|idx| self.graph.take_action(idx));
            let Some(action) = action else {
                warn!(task = %id, "task has no action to run; skipping");
                continue;
            };

            debug!(task = %id, "task starting");
            let started = std::time::Instant::now();
            match action().await {
                Ok(()) => {
                    debug!(task = %id, elapsed = ?started.elapsed(), "task finished");
                    executed.push(id.clone());
                }
                Err(err) => {
                    warn!(task = %id, error = %err, "task failed; aborting run");
                    return Err(DocdagError::TaskFailed {
                        task: id.clone(),
                        source: Box::new(err),
                    });
                }
            }
        }

        info!(tasks = executed.len(), "task run finished");
        Ok(RunReport { executed })
    }

    /// Registration indices of `requested` plus transitive prerequisites.
    fn collect_needed(&self, requested: &[&str]) -> Result<HashSet<usize>> {
        let mut needed: HashSet<usize> = HashSet::new();
        let mut stack: Vec<usize> = Vec::new();

        for id in requested {
            let idx = self
                .graph
                .index_of(id)
                .ok_or_else(|| DocdagError::TaskNotFound(id.to_string()))?;
            if needed.insert(idx) {
                stack.push(idx);
            }
        }

        while let Some(idx) = stack.pop() {
            for prereq in &self.graph.node(idx).prerequisites {
                let Some(prereq_idx) = self.graph.index_of(prereq) else {
                    continue;
                };
                if needed.insert(prereq_idx) {
                    stack.push(prereq_idx);
                }
            }
        }

        Ok(needed)
    }
}

/// Check prerequisite references and acyclicity.
fn validate_graph(graph: &TaskGraph) -> Result<()> {
    for id in graph.task_ids() {
        for prereq in graph.prerequisites_of(id) {
            if prereq == id {
                return Err(DocdagError::GraphCycle(format!(
                    "task '{}' depends on itself",
                    id
                )));
            }
            if !graph.contains(prereq) {
                return Err(DocdagError::UnknownPrerequisite {
                    task: id.to_string(),
                    prerequisite: prereq.clone(),
                });
            }
        }
    }

    // Edge direction: prerequisite -> task. A topological sort fails
    // exactly when there is a cycle.
    let mut pg: DiGraphMap<&str, ()> = DiGraphMap::new();
    for id in graph.task_ids() {
        pg.add_node(id);
    }
    for id in graph.task_ids() {
        for prereq in graph.prerequisites_of(id) {
            pg.add_edge(prereq.as_str(), id, ());
        }
    }

    match toposort(&pg, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(DocdagError::GraphCycle(format!(
                "cycle involving task '{}'",
                node
            )))
        }
    }
}
