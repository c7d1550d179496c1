//! Built-in priority rules.
//!
//! # Categories
//!
//! - **Time-based**: LPT
//! - **Precedence-based**: RPW, MST (minimum slack), MF (most followers)
//!
//! # Score Convention
//! All rules return lower scores for higher priority tasks.
//!
//! # References
//! - Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//!   Positional Weight Technique"
//! - Talbot, Patterson & Gehrlein (1986), "A Comparative Evaluation of
//!   Heuristic Line Balancing Techniques"

use super::{BalancingContext, PriorityRule, RuleScore};
use crate::models::Task;

// ======================== Time-based rules ========================

/// Largest Processing Time first.
///
/// Places long tasks while stations still have room.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl PriorityRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, task: &Task, _context: &BalancingContext) -> RuleScore {
        -(task.processing_time as f64)
    }

    fn description(&self) -> &'static str {
        "Largest Processing Time"
    }
}

// ======================== Precedence-based rules ========================

/// Ranked Positional Weight.
///
/// Prioritizes tasks carrying the most downstream work.
///
/// # Reference
/// Helgeson & Birnie (1961).
#[derive(Debug, Clone, Copy)]
pub struct Rpw;

impl PriorityRule for Rpw {
    fn name(&self) -> &'static str {
        "RPW"
    }

    fn evaluate(&self, task: &Task, context: &BalancingContext) -> RuleScore {
        -(context.positional_weight(&task.id) as f64)
    }

    fn description(&self) -> &'static str {
        "Ranked Positional Weight"
    }
}

/// Minimum Slack.
///
/// Slack = ⌈pw / takt⌉ · takt − pw. Prioritizes tasks whose downstream
/// chain fills its stations most tightly.
#[derive(Debug, Clone, Copy)]
pub struct MinSlack;

impl PriorityRule for MinSlack {
    fn name(&self) -> &'static str {
        "MST"
    }

    fn evaluate(&self, task: &Task, context: &BalancingContext) -> RuleScore {
        context.slack(&task.id) as f64
    }

    fn description(&self) -> &'static str {
        "Minimum Slack"
    }
}

/// Most Followers.
///
/// Prioritizes tasks with the most transitive successors.
#[derive(Debug, Clone, Copy)]
pub struct MostFollowers;

impl PriorityRule for MostFollowers {
    fn name(&self) -> &'static str {
        "MF"
    }

    fn evaluate(&self, task: &Task, context: &BalancingContext) -> RuleScore {
        -(context.followers(&task.id) as f64)
    }

    fn description(&self) -> &'static str {
        "Most Followers"
    }
}
