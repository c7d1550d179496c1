//! Multi-start search driver.
//!
//! # Algorithm
//!
//! 1. Validate the problem; fatal findings abort before any attempt.
//! 2. Plan attempts: every greedy strategy × its iteration budget, then
//!    every station count in the target range × its iteration budget.
//!    Each attempt carries its own seed derived from the base seed.
//! 3. Run attempts (in parallel on the rayon pool when enabled).
//! 4. Merge results in attempt order into the deduplicating population.
//! 5. Score every unique solution, on the same threads as step 3, and
//!    extract the Pareto front.
//!
//! Attempt seeds and the merge order are independent of thread
//! scheduling, so a fixed base seed always yields the same outcome.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use super::{GeneratorConfig, GreedyBuilder, Population, TargetedBuilder};
use crate::dispatching::{BalancingContext, PriorityStrategy};
use crate::error::{Error, Result};
use crate::models::{ProblemConfig, Solution};
use crate::pareto;
use crate::report::PopulationStats;
use crate::scoring::ObjectiveScorer;
use crate::validation::{validate_problem, ValidationError};

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// One independent construction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Greedy {
        strategy: PriorityStrategy,
        seed: u64,
    },
    Targeted {
        stations: usize,
        seed: u64,
    },
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Unique, scored solutions in attempt order.
    pub population: Vec<Solution>,
    /// Non-dominated valid solutions.
    pub front: Vec<Solution>,
    /// Population summary.
    pub stats: PopulationStats,
}

/// Runs greedy and targeted attempts over a problem and reduces them to
/// a Pareto front.
///
/// # Example
///
/// ```
/// use u_linebalance::generator::{BalancingSearch, GeneratorConfig};
/// use u_linebalance::models::{ProblemConfig, Task};
///
/// let config = ProblemConfig::new(15)
///     .with_task(Task::new("T1", 10).with_tool("M1"))
///     .with_task(Task::new("T2", 10).with_tool("M1"))
///     .with_task(Task::new("T3", 10).with_tool("M2"))
///     .with_precedence("T1", "T2")
///     .unwrap();
///
/// let outcome = BalancingSearch::new(&config, GeneratorConfig::default())
///     .run()
///     .unwrap();
/// assert!(!outcome.front.is_empty());
/// assert!(outcome.front.iter().all(|s| s.is_valid));
/// ```
#[derive(Debug, Clone)]
pub struct BalancingSearch<'a> {
    config: &'a ProblemConfig,
    generator: GeneratorConfig,
    scorer: Option<ObjectiveScorer>,
}

impl<'a> BalancingSearch<'a> {
    /// Creates a search over a problem.
    pub fn new(config: &'a ProblemConfig, generator: GeneratorConfig) -> Self {
        Self {
            config,
            generator,
            scorer: None,
        }
    }

    /// Overrides the default scorer ([`ObjectiveScorer::for_problem`]).
    pub fn with_scorer(mut self, scorer: ObjectiveScorer) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Inclusive station-count range for targeted attempts.
    ///
    /// Defaults to the theoretical minimum up to two more, capped at the
    /// task count. `None` when the range is empty.
    pub fn station_range(&self) -> Option<(usize, usize)> {
        let (min, max) = match self.generator.station_range {
            Some(range) => range,
            None => {
                let min = self.config.theoretical_min_stations().max(1);
                (min, (min + 2).min(self.config.task_count()))
            }
        };
        (min >= 1 && min <= max).then_some((min, max))
    }

    /// Runs the search.
    ///
    /// # Errors
    /// - [`Error::InvalidParameter`] for an out-of-domain generator setting.
    /// - [`Error::InvalidProblem`] when the problem has fatal validation
    ///   findings (cycles, dangling references, bad times or weights).
    pub fn run(&self) -> Result<SearchOutcome> {
        self.generator.validate()?;
        self.check_problem()?;

        let context = BalancingContext::for_problem(self.config)
            .with_hybrid_tolerance(self.generator.hybrid_tolerance);
        let greedy = GreedyBuilder::new(self.config).with_context(context.clone());
        let targeted = TargetedBuilder::new(self.config)
            .with_params(self.generator.targeted.clone())
            .with_context(context);

        let attempts = self.plan();
        let parallel = self.generator.parallel;
        let results = map_ordered(attempts.clone(), parallel, |attempt| match attempt {
            Attempt::Greedy { strategy, seed } => {
                greedy.build(strategy, &mut SmallRng::seed_from_u64(seed))
            }
            Attempt::Targeted { stations, seed } => targeted.build(stations, seed),
        });

        let stalled = results.iter().filter(|r| r.is_none()).count();
        let mut population = Population::new();
        population.extend(results.into_iter().flatten());

        let scorer = self
            .scorer
            .unwrap_or_else(|| ObjectiveScorer::for_problem(self.config));
        let config = self.config;
        let population = map_ordered(population.into_solutions(), parallel, |mut solution| {
            scorer.apply(&mut solution, config);
            solution
        });

        let front: Vec<Solution> = pareto::pareto_front(&population)
            .into_iter()
            .cloned()
            .collect();
        let stats = PopulationStats::from_solutions(&population);

        log::debug!(
            "{} attempts, {} stalled, {} unique, {} valid, front {}",
            attempts.len(),
            stalled,
            stats.count,
            stats.valid_count,
            front.len()
        );
        if front.is_empty() && self.config.task_count() > 0 {
            log::warn!("no feasible line balance found in {} attempts", attempts.len());
        }

        Ok(SearchOutcome {
            population,
            front,
            stats,
        })
    }

    fn check_problem(&self) -> Result<()> {
        let Err(errors) = validate_problem(self.config) else {
            return Ok(());
        };
        let (fatal, warnings): (Vec<ValidationError>, Vec<ValidationError>) =
            errors.into_iter().partition(|e| e.is_fatal());
        for warning in &warnings {
            log::warn!("{}", warning.message);
        }
        if fatal.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidProblem(fatal))
        }
    }

    /// Attempts in merge order, each with its own seed.
    ///
    /// Deterministic strategies run once: repeats would only produce
    /// duplicates.
    fn plan(&self) -> Vec<Attempt> {
        let g = &self.generator;
        let mut attempts = Vec::new();

        for &strategy in &g.strategies {
            let runs = if strategy.is_stochastic() {
                g.iterations_per_strategy
            } else {
                g.iterations_per_strategy.min(1)
            };
            for _ in 0..runs {
                let seed = derive_seed(g.seed, attempts.len());
                attempts.push(Attempt::Greedy { strategy, seed });
            }
        }

        if let Some((min, max)) = self.station_range() {
            for stations in min..=max {
                for _ in 0..g.iterations_per_count {
                    let seed = derive_seed(g.seed, attempts.len());
                    attempts.push(Attempt::Targeted { stations, seed });
                }
            }
        }

        attempts
    }
}

/// Maps `items` in order, on the rayon pool when `parallel` is set and on
/// the calling thread otherwise.
fn map_ordered<T, U, F>(items: Vec<T>, parallel: bool, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    if parallel {
        items.into_par_iter().map(f).collect()
    } else {
        items.into_iter().map(f).collect()
    }
}

fn derive_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64).wrapping_add(1).wrapping_mul(SEED_MIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::validation::ValidationErrorKind;

    fn make_tool_problem() -> ProblemConfig {
        ProblemConfig::new(15)
            .with_task(Task::new("T1", 10).with_tool("M1"))
            .with_task(Task::new("T2", 10).with_tool("M1"))
            .with_task(Task::new("T3", 10).with_tool("M2"))
            .with_precedence("T1", "T2")
            .unwrap()
    }

    fn make_mixed_problem() -> ProblemConfig {
        ProblemConfig::new(12)
            .with_task(Task::new("A", 4).with_tool("M1"))
            .with_task(Task::new("B", 3).with_tool("M2"))
            .with_task(Task::new("C", 5))
            .with_task(Task::new("D", 6).with_tool("M1"))
            .with_task(Task::new("E", 2).with_tool("M2"))
            .with_task(Task::new("F", 4))
            .with_precedence("A", "C")
            .unwrap()
            .with_precedence("B", "C")
            .unwrap()
            .with_precedence("C", "F")
            .unwrap()
            .with_tool_limit("M1", 2)
            .with_tool_limit("M2", 2)
    }

    #[test]
    fn test_plan_counts() {
        let c = make_tool_problem();
        let g = GeneratorConfig::default()
            .with_iterations_per_strategy(4)
            .with_iterations_per_count(3)
            .with_station_range(2, 3);
        let search = BalancingSearch::new(&c, g);
        let plan = search.plan();

        // 3 deterministic × 1 + 2 stochastic × 4 + 2 counts × 3
        assert_eq!(plan.len(), 3 + 8 + 6);
        let mut seeds: Vec<u64> = plan
            .iter()
            .map(|a| match a {
                Attempt::Greedy { seed, .. } | Attempt::Targeted { seed, .. } => *seed,
            })
            .collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), plan.len());
    }

    #[test]
    fn test_default_station_range() {
        let c = make_tool_problem();
        // ⌈30 / 15⌉ = 2, capped at 3 tasks
        let search = BalancingSearch::new(&c, GeneratorConfig::default());
        assert_eq!(search.station_range(), Some((2, 3)));

        let empty = ProblemConfig::new(10);
        let search = BalancingSearch::new(&empty, GeneratorConfig::default());
        assert_eq!(search.station_range(), None);
    }

    #[test]
    fn test_run_tool_problem() {
        let c = make_tool_problem();
        let outcome = BalancingSearch::new(&c, GeneratorConfig::default())
            .run()
            .unwrap();

        assert!(!outcome.front.is_empty());
        for s in &outcome.front {
            assert!(s.is_valid);
            assert_eq!(s.station_count(), 3);
            assert!(s.scores.economic > 0.0);
        }
        assert_eq!(outcome.stats.count, outcome.population.len());
    }

    #[test]
    fn test_population_unique() {
        let c = make_mixed_problem();
        let outcome = BalancingSearch::new(&c, GeneratorConfig::default())
            .run()
            .unwrap();
        let mut hashes: Vec<String> = outcome
            .population
            .iter()
            .map(|s| s.canonical_hash())
            .collect();
        let n = hashes.len();
        hashes.sort();
        hashes.dedup();
        assert_eq!(hashes.len(), n);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let c = make_mixed_problem();
        let g = GeneratorConfig::default().with_seed(9);
        let par = BalancingSearch::new(&c, g.clone()).run().unwrap();
        let ser = BalancingSearch::new(&c, g.with_parallel(false))
            .run()
            .unwrap();

        let hashes = |o: &SearchOutcome| -> Vec<String> {
            o.population.iter().map(|s| s.canonical_hash()).collect()
        };
        assert_eq!(hashes(&par), hashes(&ser));
    }

    #[test]
    fn test_serial_mapping_stays_on_caller_thread() {
        let caller = std::thread::current().id();
        let threads = map_ordered((0..64).collect(), false, |_: u32| std::thread::current().id());
        assert!(threads.iter().all(|id| *id == caller));

        let squares = map_ordered((0..64_u64).collect(), true, |x| x * x);
        assert_eq!(squares, (0..64_u64).map(|x| x * x).collect::<Vec<_>>());
    }

    #[test]
    fn test_cycle_is_fatal() {
        let c = make_tool_problem().with_precedence("T2", "T1").unwrap();
        let err = BalancingSearch::new(&c, GeneratorConfig::default())
            .run()
            .unwrap_err();
        match err {
            Error::InvalidProblem(errors) => assert!(errors
                .iter()
                .any(|e| e.kind == ValidationErrorKind::CyclicDependency)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_task_over_takt_is_not_fatal() {
        let c = ProblemConfig::new(5)
            .with_task(Task::new("A", 3))
            .with_task(Task::new("B", 8));
        let outcome = BalancingSearch::new(&c, GeneratorConfig::default())
            .run()
            .unwrap();
        assert!(outcome.front.is_empty());
        assert!(outcome.population.is_empty());
    }

    #[test]
    fn test_invalid_generator_config() {
        let c = make_tool_problem();
        let g = GeneratorConfig::default().with_station_range(4, 1);
        assert!(matches!(
            BalancingSearch::new(&c, g).run(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_custom_scorer() {
        let c = make_tool_problem();
        let outcome = BalancingSearch::new(&c, GeneratorConfig::default())
            .with_scorer(ObjectiveScorer::new(0.0))
            .run()
            .unwrap();
        // All station times equal (10) → balanced even with zero ceiling
        assert!(outcome
            .front
            .iter()
            .all(|s| (s.scores.social - 1.0).abs() < 1e-10));
    }
}
