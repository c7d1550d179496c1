//! Priority rules and rule engine for station filling.
//!
//! Provides priority rules (LPT, RPW, minimum slack, ...), a composable
//! rule engine for multi-criteria task ordering, and the
//! [`PriorityStrategy`] enumeration the greedy builder samples from.
//!
//! # Usage
//!
//! ```
//! use u_linebalance::dispatching::{rules, BalancingContext, RuleEngine};
//! use u_linebalance::models::{ProblemConfig, Task};
//!
//! let config = ProblemConfig::new(10)
//!     .with_task(Task::new("A", 3))
//!     .with_task(Task::new("B", 7));
//! let context = BalancingContext::for_problem(&config);
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Rpw)
//!     .with_rule(rules::Lpt);
//!
//! let tasks: Vec<_> = config.tasks().iter().collect();
//! assert_eq!(engine.sort(&tasks, &context)[0].id, "B");
//! ```
//!
//! # References
//!
//! - Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 4
//! - Talbot, Patterson & Gehrlein (1986), "A Comparative Evaluation of
//!   Heuristic Line Balancing Techniques"

mod context;
mod engine;
pub mod rules;
mod strategy;

pub use context::BalancingContext;
pub use engine::{RuleEngine, TieBreaker};
pub use strategy::PriorityStrategy;

use crate::models::Task;
use std::fmt::Debug;

/// Score returned by a priority rule.
///
/// Lower scores = higher priority (assigned first).
pub type RuleScore = f64;

/// A priority rule that evaluates how urgently a task should be assigned.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for tasks that should be placed first.
pub trait PriorityRule: Send + Sync + Debug {
    /// Rule name (e.g., "LPT", "RPW").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a task given the balancing context.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, task: &Task, context: &BalancingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
