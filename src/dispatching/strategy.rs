//! Priority strategies used by the greedy builder.
//!
//! Deterministic strategies delegate to a [`RuleEngine`]; the random and
//! hybrid strategies draw from a caller-supplied RNG so runs can be
//! reproduced from a seed.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{rules, BalancingContext, RuleEngine, TieBreaker};
use crate::models::Task;

/// How available tasks are ordered before a station is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityStrategy {
    /// Descending processing time.
    LargestProcessingTime,
    /// Ascending slack.
    LeastSlack,
    /// Descending positional weight.
    PositionalWeight,
    /// Uniform random permutation.
    Random,
    /// Positional weight with random swaps between near-equal neighbours.
    Hybrid,
}

impl PriorityStrategy {
    /// All strategies, in a fixed order.
    pub const ALL: [PriorityStrategy; 5] = [
        Self::LargestProcessingTime,
        Self::LeastSlack,
        Self::PositionalWeight,
        Self::Random,
        Self::Hybrid,
    ];

    /// Short label (e.g. for solution origins).
    pub fn label(&self) -> &'static str {
        match self {
            Self::LargestProcessingTime => "LPT",
            Self::LeastSlack => "MST",
            Self::PositionalWeight => "RPW",
            Self::Random => "RANDOM",
            Self::Hybrid => "HYBRID",
        }
    }

    /// Whether the strategy consumes randomness.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::Random | Self::Hybrid)
    }

    /// Rule engine realising a deterministic strategy.
    ///
    /// `Random` has no engine; `Hybrid` uses the positional-weight engine
    /// before jittering.
    pub fn engine(&self) -> Option<RuleEngine> {
        let engine = match self {
            Self::LargestProcessingTime => RuleEngine::new()
                .with_rule(rules::Lpt)
                .with_rule(rules::Rpw),
            Self::LeastSlack => RuleEngine::new()
                .with_rule(rules::MinSlack)
                .with_rule(rules::Rpw),
            Self::PositionalWeight | Self::Hybrid => RuleEngine::new()
                .with_rule(rules::Rpw)
                .with_rule(rules::MostFollowers),
            Self::Random => return None,
        };
        Some(engine.with_final_tie_breaker(TieBreaker::ById))
    }

    /// Orders available tasks, highest priority first.
    pub fn order<'a, R: Rng>(
        &self,
        tasks: &[&'a Task],
        context: &BalancingContext,
        rng: &mut R,
    ) -> Vec<&'a Task> {
        match self {
            Self::Random => {
                let mut ordered = tasks.to_vec();
                ordered.shuffle(rng);
                ordered
            }
            Self::Hybrid => {
                let mut ordered = self.sorted(tasks, context);
                jitter_near_ties(&mut ordered, context, rng);
                ordered
            }
            _ => self.sorted(tasks, context),
        }
    }

    fn sorted<'a>(&self, tasks: &[&'a Task], context: &BalancingContext) -> Vec<&'a Task> {
        match self.engine() {
            Some(engine) => engine.sort(tasks, context),
            None => tasks.to_vec(),
        }
    }
}

impl fmt::Display for PriorityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Swaps adjacent tasks whose positional weights differ by at most the
/// context's relative tolerance, each with probability ½.
fn jitter_near_ties<R: Rng>(ordered: &mut [&Task], context: &BalancingContext, rng: &mut R) {
    for i in 1..ordered.len() {
        let a = context.positional_weight(&ordered[i - 1].id);
        let b = context.positional_weight(&ordered[i].id);
        let hi = a.max(b);
        if hi <= 0 {
            continue;
        }
        let gap = (a - b).abs() as f64 / hi as f64;
        if gap <= context.hybrid_tolerance && rng.random_bool(0.5) {
            ordered.swap(i - 1, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProblemConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample() -> ProblemConfig {
        ProblemConfig::new(50)
            .with_task(Task::new("A", 10))
            .with_task(Task::new("B", 30))
            .with_task(Task::new("C", 20))
            .with_task(Task::new("D", 5))
            .with_task(Task::new("E", 21))
            .with_precedence("D", "A")
            .unwrap()
    }

    fn ids(tasks: Vec<&Task>) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_lpt_order() {
        let c = sample();
        let ctx = BalancingContext::for_problem(&c);
        let tasks: Vec<&Task> = c.tasks().iter().collect();
        let mut rng = SmallRng::seed_from_u64(1);

        let order = PriorityStrategy::LargestProcessingTime.order(&tasks, &ctx, &mut rng);
        assert_eq!(ids(order), vec!["B", "E", "C", "A", "D"]);
    }

    #[test]
    fn test_positional_weight_order() {
        let c = sample();
        let ctx = BalancingContext::for_problem(&c);
        let tasks: Vec<&Task> = c.tasks().iter().collect();
        let mut rng = SmallRng::seed_from_u64(1);

        // pw: A 10, B 30, C 20, D 15, E 21
        let order = PriorityStrategy::PositionalWeight.order(&tasks, &ctx, &mut rng);
        assert_eq!(ids(order), vec!["B", "E", "C", "D", "A"]);
    }

    #[test]
    fn test_least_slack_order() {
        let c = sample();
        let ctx = BalancingContext::for_problem(&c);
        let tasks: Vec<&Task> = c.tasks().iter().collect();
        let mut rng = SmallRng::seed_from_u64(1);

        // slack (takt 50): A 40, B 20, C 30, D 35, E 29
        let order = PriorityStrategy::LeastSlack.order(&tasks, &ctx, &mut rng);
        assert_eq!(ids(order), vec!["B", "E", "C", "D", "A"]);
    }

    #[test]
    fn test_random_is_permutation_and_seeded() {
        let c = sample();
        let ctx = BalancingContext::for_problem(&c);
        let tasks: Vec<&Task> = c.tasks().iter().collect();

        let a = ids(PriorityStrategy::Random.order(&tasks, &ctx, &mut SmallRng::seed_from_u64(7)));
        let b = ids(PriorityStrategy::Random.order(&tasks, &ctx, &mut SmallRng::seed_from_u64(7)));
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_hybrid_only_swaps_near_ties() {
        let c = sample();
        let ctx = BalancingContext::for_problem(&c);
        let tasks: Vec<&Task> = c.tasks().iter().collect();

        // Only E(21) and C(20) are within 10 %; B stays first, D and A stay last
        for seed in 0..32 {
            let order = ids(PriorityStrategy::Hybrid.order(
                &tasks,
                &ctx,
                &mut SmallRng::seed_from_u64(seed),
            ));
            assert_eq!(order[0], "B");
            assert_eq!(&order[3..], &["D".to_string(), "A".to_string()]);
        }
    }

    #[test]
    fn test_hybrid_jitter_happens() {
        let c = sample();
        let ctx = BalancingContext::for_problem(&c);
        let tasks: Vec<&Task> = c.tasks().iter().collect();

        let swapped = (0..64).any(|seed| {
            let order = ids(PriorityStrategy::Hybrid.order(
                &tasks,
                &ctx,
                &mut SmallRng::seed_from_u64(seed),
            ));
            order[1] == "C"
        });
        assert!(swapped);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PriorityStrategy::Hybrid.to_string(), "HYBRID");
        assert!(PriorityStrategy::Random.engine().is_none());
        let engine = PriorityStrategy::LeastSlack.engine().unwrap();
        assert_eq!(engine.rule_names(), vec!["MST", "RPW"]);
        assert!(PriorityStrategy::Random.is_stochastic());
        assert!(!PriorityStrategy::LeastSlack.is_stochastic());
    }
}
