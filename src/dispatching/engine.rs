//! Rule engine for multi-criteria task prioritization.
//!
//! Rules are applied lexicographically: the first rule orders the tasks,
//! each later rule only decides between tasks every earlier rule ties on,
//! and a [`TieBreaker`] settles whatever is left.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{BalancingContext, PriorityRule, RuleScore};
use crate::models::Task;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Keep the input order (stable sort).
    #[default]
    InputOrder,
    /// Deterministic by task ID (lexicographic).
    ById,
}

/// A composable rule engine for task prioritization.
///
/// # Example
/// ```
/// use u_linebalance::dispatching::{rules, RuleEngine, TieBreaker};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Rpw)
///     .with_rule(rules::Lpt)
///     .with_final_tie_breaker(TieBreaker::ById);
/// assert_eq!(engine.rule_names(), vec!["RPW", "LPT"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn PriorityRule>>,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Later rules only separate tasks that all earlier
    /// rules score equally.
    pub fn with_rule<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts tasks by priority (highest priority first).
    ///
    /// Returns indices into the original slice. Every rule is evaluated
    /// once per task.
    pub fn sort_indices(&self, tasks: &[&Task], context: &BalancingContext) -> Vec<usize> {
        let keys: Vec<Vec<RuleScore>> = tasks
            .iter()
            .map(|task| self.rules.iter().map(|r| r.evaluate(task, context)).collect())
            .collect();

        let mut indices: Vec<usize> = (0..tasks.len()).collect();
        indices.sort_by(|&a, &b| {
            compare_keys(&keys[a], &keys[b]).then_with(|| self.final_tie(tasks[a], tasks[b]))
        });
        indices
    }

    /// Sorts task references by priority (highest priority first).
    pub fn sort<'a>(&self, tasks: &[&'a Task], context: &BalancingContext) -> Vec<&'a Task> {
        self.sort_indices(tasks, context)
            .into_iter()
            .map(|i| tasks[i])
            .collect()
    }

    fn final_tie(&self, a: &Task, b: &Task) -> Ordering {
        match self.tie_breaker {
            TieBreaker::InputOrder => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

/// Lexicographic comparison under `f64::total_cmp`, so the sort sees a
/// total order even if a rule yields NaN.
fn compare_keys(a: &[RuleScore], b: &[RuleScore]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
