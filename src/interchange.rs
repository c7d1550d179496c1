//! Lossless JSON interchange for problems and solutions.
//!
//! Documents are plain serde structs; they carry ids rather than shared
//! task records, so a solution document is rebuilt against the problem
//! it belongs to.
//!
//! # Example
//! ```
//! use u_linebalance::interchange::ProblemDocument;
//! use u_linebalance::models::{ProblemConfig, Task};
//!
//! let config = ProblemConfig::new(15)
//!     .with_task(Task::new("T1", 10).with_tool("M1"))
//!     .with_task(Task::new("T2", 5))
//!     .with_precedence("T1", "T2")
//!     .unwrap();
//!
//! let json = ProblemDocument::from(&config).to_json().unwrap();
//! let restored = ProblemDocument::from_json(&json).unwrap().into_config().unwrap();
//! assert_eq!(restored.edges(), config.edges());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::feasibility;
use crate::models::{PrecedenceEdge, ProblemConfig, Scores, Solution, Station, Task, Weights};
use crate::validation::validate_definition;

fn default_tool_limit() -> u32 {
    ProblemConfig::DEFAULT_TOOL_LIMIT
}

/// Serialized form of a [`ProblemConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDocument {
    /// Cycle time per station.
    pub takt_time: i64,
    /// Tasks in definition order.
    pub tasks: Vec<Task>,
    /// Direct precedence edges.
    #[serde(default)]
    pub precedences: Vec<PrecedenceEdge>,
    /// Per-station tool limits; unlisted tools are unconstrained.
    #[serde(default)]
    pub tool_limits: BTreeMap<String, u32>,
    /// Objective weights.
    #[serde(default)]
    pub weights: Weights,
    /// Limit given to tools first seen by later `add_task` calls.
    #[serde(default = "default_tool_limit")]
    pub default_tool_limit: u32,
}

impl From<&ProblemConfig> for ProblemDocument {
    fn from(config: &ProblemConfig) -> Self {
        Self {
            takt_time: config.takt_time(),
            tasks: config.tasks().to_vec(),
            precedences: config.edges(),
            tool_limits: config.tool_limits().clone(),
            weights: config.weights(),
            default_tool_limit: config.default_tool_limit(),
        }
    }
}

impl ProblemDocument {
    /// Rebuilds the problem.
    ///
    /// Tool limits are restored exactly as stored; tools without a
    /// stored limit stay unconstrained.
    ///
    /// # Errors
    /// [`Error::InvalidProblem`] on duplicate ids, dangling edges or self-loops.
    pub fn into_config(self) -> Result<ProblemConfig> {
        validate_definition(&self.tasks, &self.precedences).map_err(Error::InvalidProblem)?;

        let mut config = ProblemConfig::new(self.takt_time)
            .with_default_tool_limit(self.default_tool_limit)
            .with_weights(self.weights);
        for task in self.tasks {
            config.add_task(task);
        }
        for edge in &self.precedences {
            config.add_precedence(&edge.predecessor, &edge.successor)?;
        }

        let implicit: Vec<String> = config
            .tool_limits()
            .keys()
            .filter(|tool| !self.tool_limits.contains_key(*tool))
            .cloned()
            .collect();
        for tool in implicit {
            config.remove_tool_limit(&tool);
        }
        for (tool, limit) in self.tool_limits {
            config.set_tool_limit(tool, limit);
        }
        Ok(config)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serialized form of a [`Solution`]: task ids per station, in line order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionDocument {
    /// Task ids per station, each in execution order.
    pub stations: Vec<Vec<String>>,
    /// Stored objective scores.
    pub scores: Scores,
    /// Stored feasibility flag.
    pub is_valid: bool,
    /// Construction label.
    #[serde(default)]
    pub origin: String,
}

impl From<&Solution> for SolutionDocument {
    fn from(solution: &Solution) -> Self {
        Self {
            stations: solution
                .stations
                .iter()
                .map(|s| s.task_ids().into_iter().map(String::from).collect())
                .collect(),
            scores: solution.scores,
            is_valid: solution.is_valid,
            origin: solution.origin.clone(),
        }
    }
}

impl SolutionDocument {
    /// Rebuilds the solution against its problem.
    ///
    /// Scores and the validity flag are restored as stored; the violation
    /// list is recomputed.
    ///
    /// # Errors
    /// [`Error::UnknownTask`] when an id is not part of `config`.
    pub fn into_solution(self, config: &ProblemConfig) -> Result<Solution> {
        let stations = self
            .stations
            .iter()
            .enumerate()
            .map(|(i, ids)| -> Result<Station> {
                let tasks = ids
                    .iter()
                    .map(|id| {
                        config
                            .task(id)
                            .cloned()
                            .ok_or_else(|| Error::UnknownTask(id.clone()))
                    })
                    .collect::<Result<Vec<Task>>>()?;
                Ok(Station::with_tasks(i + 1, tasks))
            })
            .collect::<Result<Vec<Station>>>()?;

        let mut solution = Solution::new(stations).with_origin(self.origin);
        solution.violations = feasibility::check_feasibility(&solution, config).violations;
        solution.scores = self.scores;
        solution.is_valid = self.is_valid;
        Ok(solution)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
