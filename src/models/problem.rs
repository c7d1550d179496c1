//! Problem instance model.
//!
//! Holds the task set, the precedence relation (stored in both
//! directions), takt time, tool limits and objective weights.
//!
//! The precedence relation is two independent adjacency maps kept in
//! lockstep by every mutator, so predecessor and successor lookups are
//! both O(1) without a shared graph object.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::Task;
use crate::error::{Error, Result};

/// Objective weights. Non-negative; normalized at scoring time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of the economic score.
    pub economic: f64,
    /// Weight of the social (balance) score.
    pub social: f64,
    /// Weight of the environmental (tool variety) score.
    pub environmental: f64,
}

impl Weights {
    /// Creates a weight triple.
    pub fn new(economic: f64, social: f64, environmental: f64) -> Self {
        Self {
            economic,
            social,
            environmental,
        }
    }

    /// Sum of the three weights.
    pub fn total(&self) -> f64 {
        self.economic + self.social + self.environmental
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// A directed must-come-before relation between two tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrecedenceEdge {
    /// Task that must come first.
    pub predecessor: String,
    /// Task that depends on it.
    pub successor: String,
}

impl PrecedenceEdge {
    /// Creates an edge.
    pub fn new(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
        }
    }
}

/// A line balancing problem instance.
///
/// Built incrementally; read-only while solutions are generated.
/// Task iteration order is insertion order, which keeps every
/// algorithm in the crate deterministic for a fixed seed.
///
/// # Example
/// ```
/// use u_linebalance::models::{ProblemConfig, Task};
///
/// let mut config = ProblemConfig::new(15)
///     .with_task(Task::new("T1", 10).with_tool("M1"))
///     .with_task(Task::new("T2", 10).with_tool("M1"));
/// config.add_precedence("T1", "T2").unwrap();
///
/// assert_eq!(config.successors("T1"), ["T2".to_string()]);
/// assert_eq!(config.tool_limit("M1"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct ProblemConfig {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    predecessors: HashMap<String, Vec<String>>,
    successors: HashMap<String, Vec<String>>,
    takt_time: i64,
    tool_limits: BTreeMap<String, u32>,
    weights: Weights,
    default_tool_limit: u32,
}

impl ProblemConfig {
    /// Limit assigned to a tool the first time a task uses it.
    pub const DEFAULT_TOOL_LIMIT: u32 = 1;

    /// Creates an empty problem with the given takt time.
    pub fn new(takt_time: i64) -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
            predecessors: HashMap::new(),
            successors: HashMap::new(),
            takt_time,
            tool_limits: BTreeMap::new(),
            weights: Weights::default(),
            default_tool_limit: Self::DEFAULT_TOOL_LIMIT,
        }
    }

    /// Adds a task (builder form of [`add_task`](Self::add_task)).
    pub fn with_task(mut self, task: Task) -> Self {
        self.add_task(task);
        self
    }

    /// Adds a precedence edge (builder form of [`add_precedence`](Self::add_precedence)).
    pub fn with_precedence(mut self, predecessor: &str, successor: &str) -> Result<Self> {
        self.add_precedence(predecessor, successor)?;
        Ok(self)
    }

    /// Sets the objective weights.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets a tool limit.
    pub fn with_tool_limit(mut self, tool: impl Into<String>, limit: u32) -> Self {
        self.set_tool_limit(tool, limit);
        self
    }

    /// Sets the limit used for newly seen tools.
    pub fn with_default_tool_limit(mut self, limit: u32) -> Self {
        self.default_tool_limit = limit;
        self
    }

    // ======================== Mutators ========================

    /// Inserts a task, replacing any task with the same id.
    ///
    /// Returns the replaced task. A tool seen for the first time gets the
    /// default tool limit; the limit of a tool no longer used is dropped.
    /// Precedence edges of a replaced task are kept.
    pub fn add_task(&mut self, task: Task) -> Option<Task> {
        if let Some(tool) = &task.tool_type {
            self.tool_limits
                .entry(tool.clone())
                .or_insert(self.default_tool_limit);
        }

        let replaced = match self.index.get(&task.id) {
            Some(&pos) => Some(std::mem::replace(&mut self.tasks[pos], task)),
            None => {
                self.index.insert(task.id.clone(), self.tasks.len());
                self.tasks.push(task);
                None
            }
        };

        if let Some(old) = &replaced {
            self.prune_tool_limit(old.tool_type.as_deref());
        }
        replaced
    }

    /// Removes a task with all its precedence edges.
    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let pos = self.index.remove(task_id)?;
        let task = self.tasks.remove(pos);
        for (i, t) in self.tasks.iter().enumerate().skip(pos) {
            self.index.insert(t.id.clone(), i);
        }

        for pred in self.predecessors.remove(task_id).unwrap_or_default() {
            if let Some(succs) = self.successors.get_mut(&pred) {
                succs.retain(|s| s != task_id);
            }
        }
        for succ in self.successors.remove(task_id).unwrap_or_default() {
            if let Some(preds) = self.predecessors.get_mut(&succ) {
                preds.retain(|p| p != task_id);
            }
        }

        self.prune_tool_limit(task.tool_type.as_deref());
        Some(task)
    }

    /// Adds a precedence edge to both adjacency maps.
    ///
    /// Adding an existing edge is a no-op. Cycles are accepted here and
    /// reported by validation before any solution is generated.
    ///
    /// # Errors
    /// [`Error::UnknownTask`] if either end is undefined,
    /// [`Error::SelfPrecedence`] for a self-loop.
    pub fn add_precedence(&mut self, predecessor: &str, successor: &str) -> Result<()> {
        for id in [predecessor, successor] {
            if !self.contains_task(id) {
                return Err(Error::UnknownTask(id.to_string()));
            }
        }
        if predecessor == successor {
            return Err(Error::SelfPrecedence(predecessor.to_string()));
        }

        let preds = self.predecessors.entry(successor.to_string()).or_default();
        if preds.iter().any(|p| p == predecessor) {
            return Ok(());
        }
        preds.push(predecessor.to_string());
        self.successors
            .entry(predecessor.to_string())
            .or_default()
            .push(successor.to_string());
        Ok(())
    }

    /// Removes a precedence edge from both adjacency maps.
    ///
    /// Returns whether the edge existed.
    pub fn remove_precedence(&mut self, predecessor: &str, successor: &str) -> bool {
        let Some(preds) = self.predecessors.get_mut(successor) else {
            return false;
        };
        let before = preds.len();
        preds.retain(|p| p != predecessor);
        if preds.len() == before {
            return false;
        }
        if let Some(succs) = self.successors.get_mut(predecessor) {
            succs.retain(|s| s != successor);
        }
        true
    }

    /// Sets the per-station limit for a tool.
    pub fn set_tool_limit(&mut self, tool: impl Into<String>, limit: u32) {
        self.tool_limits.insert(tool.into(), limit);
    }

    /// Removes a tool limit, making the tool unconstrained.
    pub fn remove_tool_limit(&mut self, tool: &str) -> Option<u32> {
        self.tool_limits.remove(tool)
    }

    /// Sets the takt time.
    pub fn set_takt_time(&mut self, takt_time: i64) {
        self.takt_time = takt_time;
    }

    /// Sets the objective weights.
    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    fn prune_tool_limit(&mut self, tool: Option<&str>) {
        if let Some(tool) = tool {
            if !self.tasks.iter().any(|t| t.tool_type.as_deref() == Some(tool)) {
                self.tool_limits.remove(tool);
            }
        }
    }

    // ======================== Views ========================

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.index.get(task_id).map(|&i| &self.tasks[i])
    }

    /// Whether the task is defined.
    pub fn contains_task(&self, task_id: &str) -> bool {
        self.index.contains_key(task_id)
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Direct predecessors of a task.
    pub fn predecessors(&self, task_id: &str) -> &[String] {
        self.predecessors
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Direct successors of a task.
    pub fn successors(&self, task_id: &str) -> &[String] {
        self.successors
            .get(task_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All precedence edges, grouped by successor in task order.
    pub fn edges(&self) -> Vec<PrecedenceEdge> {
        self.tasks
            .iter()
            .flat_map(|t| {
                self.predecessors(&t.id)
                    .iter()
                    .map(move |p| PrecedenceEdge::new(p.clone(), t.id.clone()))
            })
            .collect()
    }

    /// Number of precedence edges.
    pub fn edge_count(&self) -> usize {
        self.predecessors.values().map(Vec::len).sum()
    }

    /// Per-station time ceiling.
    pub fn takt_time(&self) -> i64 {
        self.takt_time
    }

    /// Tool → per-station limit.
    pub fn tool_limits(&self) -> &BTreeMap<String, u32> {
        &self.tool_limits
    }

    /// Limit for a tool key. `None` = unconstrained.
    pub fn tool_limit(&self, tool_key: &str) -> Option<u32> {
        self.tool_limits.get(tool_key).copied()
    }

    /// Objective weights.
    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Limit assigned to newly seen tools.
    pub fn default_tool_limit(&self) -> u32 {
        self.default_tool_limit
    }

    /// Sum of all processing times.
    pub fn total_processing_time(&self) -> i64 {
        self.tasks.iter().map(|t| t.processing_time).sum()
    }

    /// Longest single processing time.
    pub fn max_processing_time(&self) -> i64 {
        self.tasks
            .iter()
            .map(|t| t.processing_time)
            .max()
            .unwrap_or(0)
    }

    /// Lower bound on the station count: ⌈Σ time / takt⌉.
    ///
    /// Returns 0 for an empty problem or a non-positive takt time.
    pub fn theoretical_min_stations(&self) -> usize {
        let total = self.total_processing_time();
        if total <= 0 || self.takt_time <= 0 {
            return 0;
        }
        ((total + self.takt_time - 1) / self.takt_time) as usize
    }
}
