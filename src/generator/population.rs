//! Deduplicating solution population.

use std::collections::HashSet;

use crate::models::Solution;

/// Solutions keyed by canonical hash, in insertion order.
///
/// A solution whose hash is already present is discarded on insert, so
/// duplicates never reach scoring.
#[derive(Debug, Clone, Default)]
pub struct Population {
    solutions: Vec<Solution>,
    seen: HashSet<String>,
}

impl Population {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a solution unless its partition is already present.
    ///
    /// Returns whether the solution was added.
    pub fn insert(&mut self, solution: Solution) -> bool {
        if !self.seen.insert(solution.canonical_hash()) {
            return false;
        }
        self.solutions.push(solution);
        true
    }

    /// Whether a partition with this hash is present.
    pub fn contains(&self, hash: &str) -> bool {
        self.seen.contains(hash)
    }

    /// Number of unique solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Solutions in insertion order.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// Number of feasible solutions.
    pub fn valid_count(&self) -> usize {
        self.solutions.iter().filter(|s| s.is_valid).count()
    }

    /// Consumes the population.
    pub fn into_solutions(self) -> Vec<Solution> {
        self.solutions
    }
}

impl Extend<Solution> for Population {
    fn extend<I: IntoIterator<Item = Solution>>(&mut self, iter: I) {
        for solution in iter {
            self.insert(solution);
        }
    }
}
