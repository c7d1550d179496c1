//! Balancing context for priority rule evaluation.

use std::collections::HashMap;

use crate::models::ProblemConfig;
use crate::precedence::{self, Direction, PositionalWeights};

/// Precomputed per-problem measures passed to priority rules.
///
/// Built once per problem and shared read-only by every construction
/// attempt, so the positional-weight memo has an explicit scope.
#[derive(Debug, Clone, Default)]
pub struct BalancingContext {
    /// Positional weight and slack per task.
    pub weights: PositionalWeights,
    /// Number of transitive successors per task.
    pub follower_counts: HashMap<String, usize>,
    /// Takt time of the problem (seconds).
    pub takt_time: i64,
    /// Relative weight gap under which the hybrid rule may swap neighbours.
    pub hybrid_tolerance: f64,
}

impl BalancingContext {
    /// Default hybrid tolerance (10 % relative positional weight).
    pub const DEFAULT_HYBRID_TOLERANCE: f64 = 0.10;

    /// Computes the context for a problem.
    pub fn for_problem(config: &ProblemConfig) -> Self {
        let follower_counts = config
            .tasks()
            .iter()
            .map(|t| {
                let n = precedence::transitive_closure(config, &t.id, Direction::Successors).len();
                (t.id.clone(), n)
            })
            .collect();

        Self {
            weights: PositionalWeights::compute(config),
            follower_counts,
            takt_time: config.takt_time(),
            hybrid_tolerance: Self::DEFAULT_HYBRID_TOLERANCE,
        }
    }

    /// Sets the hybrid tolerance.
    pub fn with_hybrid_tolerance(mut self, tolerance: f64) -> Self {
        self.hybrid_tolerance = tolerance;
        self
    }

    /// Positional weight of a task.
    pub fn positional_weight(&self, task_id: &str) -> i64 {
        self.weights.weight(task_id)
    }

    /// Slack of a task.
    pub fn slack(&self, task_id: &str) -> i64 {
        self.weights.slack(task_id)
    }

    /// Number of transitive successors of a task.
    pub fn followers(&self, task_id: &str) -> usize {
        self.follower_counts.get(task_id).copied().unwrap_or(0)
    }
}
