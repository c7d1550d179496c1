//! Precedence graph analysis.
//!
//! Cycle detection, topological ordering, available-task queries,
//! transitive closure, and the positional-weight / slack measures used
//! by the priority rules.
//!
//! All traversals are iterative (explicit stacks and queues), so deep
//! precedence chains cannot exhaust the call stack.
//!
//! # References
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)
//! - Kahn (1962), "Topological sorting of large networks"
//! - Helgeson & Birnie (1961), "Assembly Line Balancing Using the Ranked
//!   Positional Weight Technique"

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{ProblemConfig, Task};

/// Which side of the precedence relation to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow predecessor edges (tasks that must come first).
    Predecessors,
    /// Follow successor edges (tasks that depend on this one).
    Successors,
}

/// Whether the precedence graph contains a cycle.
///
/// # Algorithm
/// DFS over the successor relation, tracking the active path. Every
/// unvisited task is used as a root; the search stops at the first edge
/// back into the active path.
pub fn has_cycle(config: &ProblemConfig) -> bool {
    find_cycle_root(config).is_some()
}

/// Root of the first DFS tree that closes a cycle, if any.
pub(crate) fn find_cycle_root(config: &ProblemConfig) -> Option<&str> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut in_stack: HashSet<&str> = HashSet::new();

    for root in config.tasks() {
        let root = root.id.as_str();
        if visited.contains(root) {
            continue;
        }

        // (node, index of next successor to explore)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        visited.insert(root);
        in_stack.insert(root);

        while let Some((node, next)) = stack.last_mut() {
            let succs = config.successors(node);
            if let Some(succ) = succs.get(*next) {
                *next += 1;
                let succ = succ.as_str();
                if in_stack.contains(succ) {
                    return Some(root); // Back edge → cycle
                }
                if visited.insert(succ) {
                    in_stack.insert(succ);
                    stack.push((succ, 0));
                }
            } else {
                in_stack.remove(*node);
                stack.pop();
            }
        }
    }

    None
}

/// Topological order of all tasks.
///
/// # Algorithm
/// Kahn's algorithm with a FIFO queue seeded in task insertion order.
///
/// # Returns
/// `None` if the graph has a cycle (not every task could be ordered).
pub fn topological_order(config: &ProblemConfig) -> Option<Vec<&Task>> {
    let mut in_degree: HashMap<&str, usize> = config
        .tasks()
        .iter()
        .map(|t| (t.id.as_str(), config.predecessors(&t.id).len()))
        .collect();

    let mut queue: VecDeque<&str> = config
        .tasks()
        .iter()
        .filter(|t| in_degree[t.id.as_str()] == 0)
        .map(|t| t.id.as_str())
        .collect();

    let mut order = Vec::with_capacity(config.task_count());
    while let Some(id) = queue.pop_front() {
        if let Some(task) = config.task(id) {
            order.push(task);
        }
        for succ in config.successors(id) {
            if let Some(deg) = in_degree.get_mut(succ.as_str()) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(succ.as_str());
                }
            }
        }
    }

    (order.len() == config.task_count()).then_some(order)
}

/// Unassigned tasks whose direct predecessors are all assigned.
///
/// Returned in task insertion order; callers apply their own priority.
pub fn available_tasks<'a>(
    config: &'a ProblemConfig,
    assigned: &HashSet<String>,
) -> Vec<&'a Task> {
    config
        .tasks()
        .iter()
        .filter(|t| !assigned.contains(&t.id))
        .filter(|t| config.predecessors(&t.id).iter().all(|p| assigned.contains(p)))
        .collect()
}

/// All tasks reachable from `task_id` in the given direction.
///
/// Breadth-first; the start task itself is excluded. Unknown ids and
/// isolated tasks yield an empty set.
pub fn transitive_closure(
    config: &ProblemConfig,
    task_id: &str,
    direction: Direction,
) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([task_id]);
    while let Some(id) = queue.pop_front() {
        let neighbors = match direction {
            Direction::Predecessors => config.predecessors(id),
            Direction::Successors => config.successors(id),
        };
        for next in neighbors {
            if next != task_id && seen.insert(next.clone()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Positional weight: own processing time plus that of every task that
/// transitively depends on it (each counted once).
///
/// Unknown ids weigh 0.
pub fn positional_weight(config: &ProblemConfig, task_id: &str) -> i64 {
    let Some(task) = config.task(task_id) else {
        return 0;
    };
    let downstream: i64 = transitive_closure(config, task_id, Direction::Successors)
        .iter()
        .filter_map(|id| config.task(id))
        .map(|t| t.processing_time)
        .sum();
    task.processing_time + downstream
}

/// Slack: stations needed for the task's chain times takt, minus its
/// positional weight.
///
/// A heuristic urgency proxy (smaller = more urgent), not a schedule slack.
pub fn slack(config: &ProblemConfig, task_id: &str) -> i64 {
    slack_from_weight(positional_weight(config, task_id), config.takt_time())
}

fn slack_from_weight(weight: i64, takt_time: i64) -> i64 {
    if takt_time <= 0 {
        return 0;
    }
    let stations = (weight + takt_time - 1) / takt_time;
    stations * takt_time - weight
}

/// Positional weights for every task, computed once per problem.
///
/// # Algorithm
/// Walks tasks in reverse topological order with an explicit result
/// map: a task's downstream set is the union of its successors and
/// their (already computed) downstream sets. Falls back to one BFS per
/// task when the graph is cyclic.
#[derive(Debug, Clone, Default)]
pub struct PositionalWeights {
    weights: HashMap<String, i64>,
    takt_time: i64,
}

impl PositionalWeights {
    /// Computes weights for every task in the problem.
    pub fn compute(config: &ProblemConfig) -> Self {
        let weights = match topological_order(config) {
            Some(order) => {
                let mut downstream: HashMap<&str, HashSet<&str>> = HashMap::new();
                let mut weights = HashMap::with_capacity(order.len());

                for task in order.iter().rev() {
                    let mut set: HashSet<&str> = HashSet::new();
                    for succ in config.successors(&task.id) {
                        set.insert(succ.as_str());
                        if let Some(below) = downstream.get(succ.as_str()) {
                            set.extend(below.iter().copied());
                        }
                    }
                    let weight = task.processing_time
                        + set
                            .iter()
                            .filter_map(|id| config.task(id))
                            .map(|t| t.processing_time)
                            .sum::<i64>();
                    weights.insert(task.id.clone(), weight);
                    downstream.insert(task.id.as_str(), set);
                }
                weights
            }
            None => config
                .tasks()
                .iter()
                .map(|t| (t.id.clone(), positional_weight(config, &t.id)))
                .collect(),
        };

        Self {
            weights,
            takt_time: config.takt_time(),
        }
    }

    /// Positional weight of a task (0 if unknown).
    pub fn weight(&self, task_id: &str) -> i64 {
        self.weights.get(task_id).copied().unwrap_or(0)
    }

    /// Slack of a task against the problem's takt time.
    pub fn slack(&self, task_id: &str) -> i64 {
        slack_from_weight(self.weight(task_id), self.takt_time)
    }

    /// Number of tasks covered.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no weights were computed.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A → B → D, A → C → D (diamond), E isolated.
    fn diamond() -> ProblemConfig {
        ProblemConfig::new(10)
            .with_task(Task::new("A", 3))
            .with_task(Task::new("B", 4))
            .with_task(Task::new("C", 5))
            .with_task(Task::new("D", 2))
            .with_task(Task::new("E", 6))
            .with_precedence("A", "B")
            .unwrap()
            .with_precedence("A", "C")
            .unwrap()
            .with_precedence("B", "D")
            .unwrap()
            .with_precedence("C", "D")
            .unwrap()
    }

    fn cyclic() -> ProblemConfig {
        diamond().with_precedence("D", "A").unwrap()
    }

    #[test]
    fn test_no_cycle_in_dag() {
        assert!(!has_cycle(&diamond()));
    }

    #[test]
    fn test_cycle_detected() {
        assert!(has_cycle(&cyclic()));
        assert_eq!(find_cycle_root(&cyclic()), Some("A"));
    }

    #[test]
    fn test_two_node_cycle() {
        let c = ProblemConfig::new(10)
            .with_task(Task::new("X", 1))
            .with_task(Task::new("Y", 1))
            .with_precedence("X", "Y")
            .unwrap()
            .with_precedence("Y", "X")
            .unwrap();
        assert!(has_cycle(&c));
        assert!(topological_order(&c).is_none());
    }

    #[test]
    fn test_topological_order_fifo() {
        let c = diamond();
        let order: Vec<&str> = topological_order(&c)
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        // Roots A, E in insertion order; then B, C; then D
        assert_eq!(order, vec!["A", "E", "B", "C", "D"]);
    }

    #[test]
    fn test_topological_order_cycle_fails() {
        assert!(topological_order(&cyclic()).is_none());
    }

    #[test]
    fn test_available_tasks() {
        let c = diamond();
        let mut assigned = HashSet::new();
        let ids = |v: Vec<&Task>| v.iter().map(|t| t.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(available_tasks(&c, &assigned)), vec!["A", "E"]);

        assigned.insert("A".to_string());
        assert_eq!(ids(available_tasks(&c, &assigned)), vec!["B", "C", "E"]);

        assigned.insert("B".to_string());
        // D still waits for C
        assert_eq!(ids(available_tasks(&c, &assigned)), vec!["C", "E"]);
    }

    #[test]
    fn test_transitive_closure() {
        let c = diamond();
        let succ = transitive_closure(&c, "A", Direction::Successors);
        assert_eq!(succ.len(), 3);
        assert!(succ.contains("D"));

        let pred = transitive_closure(&c, "D", Direction::Predecessors);
        let expected: HashSet<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(pred, expected);

        assert!(transitive_closure(&c, "E", Direction::Successors).is_empty());
        assert!(transitive_closure(&c, "nope", Direction::Successors).is_empty());
    }

    #[test]
    fn test_transitive_closure_on_cycle_terminates() {
        let succ = transitive_closure(&cyclic(), "B", Direction::Successors);
        // B → D → A → C, never B itself
        assert_eq!(succ.len(), 3);
        assert!(!succ.contains("B"));
    }

    #[test]
    fn test_positional_weight_counts_shared_descendants_once() {
        let c = diamond();
        // A(3) + B(4) + C(5) + D(2) = 14, D counted once
        assert_eq!(positional_weight(&c, "A"), 14);
        assert_eq!(positional_weight(&c, "B"), 6);
        assert_eq!(positional_weight(&c, "D"), 2);
        assert_eq!(positional_weight(&c, "E"), 6);
        assert_eq!(positional_weight(&c, "nope"), 0);
    }

    #[test]
    fn test_slack() {
        let c = diamond();
        // pw(A) = 14, takt 10 → 2 stations → 20 - 14 = 6
        assert_eq!(slack(&c, "A"), 6);
        // pw(B) = 6 → 1 station → 4
        assert_eq!(slack(&c, "B"), 4);
    }

    #[test]
    fn test_positional_weights_match_direct_computation() {
        let c = diamond();
        let pw = PositionalWeights::compute(&c);
        assert_eq!(pw.len(), 5);
        for task in c.tasks() {
            assert_eq!(pw.weight(&task.id), positional_weight(&c, &task.id));
            assert_eq!(pw.slack(&task.id), slack(&c, &task.id));
        }
    }

    #[test]
    fn test_positional_weights_on_cycle_fallback() {
        let c = cyclic();
        let pw = PositionalWeights::compute(&c);
        // Every task reaches every other task in the cycle A-B-C-D
        assert_eq!(pw.weight("A"), 14);
        assert_eq!(pw.weight("E"), 6);
    }
}
