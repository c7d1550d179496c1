//! Priority-driven greedy station filling.
//!
//! # Algorithm
//!
//! 1. Open station 1.
//! 2. Compute the available tasks (all predecessors assigned). None → stall.
//! 3. Order them by the active [`PriorityStrategy`].
//! 4. Admit the first task that passes [`can_add_task`] into the open station.
//! 5. If none passes: close the station and open the next one, then retry
//!    with the same available set. An empty station that admits nothing
//!    is a stall.
//! 6. Repeat until every task is assigned, then run the full feasibility check.
//!
//! # Complexity
//! O(n² · log n) per build, n = task count.
//!
//! # Reference
//! Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//! Positional Weight Technique"

use std::collections::HashSet;

use rand::Rng;

use crate::dispatching::{BalancingContext, PriorityStrategy};
use crate::feasibility::{self, can_add_task};
use crate::models::{ProblemConfig, Solution, Station};
use crate::precedence;

/// Greedy line balance builder.
///
/// # Example
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_linebalance::dispatching::PriorityStrategy;
/// use u_linebalance::generator::GreedyBuilder;
/// use u_linebalance::models::{ProblemConfig, Task};
///
/// let config = ProblemConfig::new(10)
///     .with_task(Task::new("A", 6))
///     .with_task(Task::new("B", 4))
///     .with_task(Task::new("C", 7))
///     .with_precedence("A", "B")
///     .unwrap();
///
/// let builder = GreedyBuilder::new(&config);
/// let mut rng = SmallRng::seed_from_u64(1);
/// let solution = builder
///     .build(PriorityStrategy::PositionalWeight, &mut rng)
///     .unwrap();
/// assert!(solution.is_valid);
/// assert_eq!(solution.station_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GreedyBuilder<'a> {
    config: &'a ProblemConfig,
    context: BalancingContext,
}

impl<'a> GreedyBuilder<'a> {
    /// Creates a builder with a freshly computed context.
    pub fn new(config: &'a ProblemConfig) -> Self {
        Self {
            config,
            context: BalancingContext::for_problem(config),
        }
    }

    /// Uses a precomputed context.
    pub fn with_context(mut self, context: BalancingContext) -> Self {
        self.context = context;
        self
    }

    /// The balancing context in use.
    pub fn context(&self) -> &BalancingContext {
        &self.context
    }

    /// Builds one solution. Returns `None` on a stall.
    pub fn build<R: Rng>(&self, strategy: PriorityStrategy, rng: &mut R) -> Option<Solution> {
        let config = self.config;
        let total = config.task_count();
        let mut assigned: HashSet<String> = HashSet::with_capacity(total);
        let mut stations: Vec<Station> = Vec::new();
        let mut current = Station::new(1);

        while assigned.len() < total {
            let available = precedence::available_tasks(config, &assigned);
            if available.is_empty() {
                log::trace!("{strategy}: no available task with {} assigned", assigned.len());
                return None;
            }

            let ordered = strategy.order(&available, &self.context, rng);
            let admitted = ordered
                .into_iter()
                .find(|task| can_add_task(task, &current, config, &assigned).is_ok());

            match admitted {
                Some(task) => {
                    assigned.insert(task.id.clone());
                    current.push_task(task.clone());
                }
                None if current.is_empty() => {
                    log::trace!(
                        "{strategy}: nothing fits empty station {} ({} tasks left)",
                        current.id(),
                        total - assigned.len()
                    );
                    return None;
                }
                None => {
                    let next = Station::new(current.id() + 1);
                    stations.push(std::mem::replace(&mut current, next));
                }
            }
        }

        if !current.is_empty() {
            stations.push(current);
        }

        let mut solution = Solution::new(stations).with_origin(strategy.label());
        feasibility::validate(&mut solution, config);
        Some(solution)
    }
}
