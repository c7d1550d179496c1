//! Multi-objective scoring.
//!
//! Three normalized scores, each in [0, 1] with 1 = best:
//!
//! | Objective | Formula |
//! |-----------|---------|
//! | Economic | Σ time / (takt × stations), capped at 1 |
//! | Social | (σ_max − min(σ, σ_max)) / σ_max over station times |
//! | Environmental | (N − used) / (N − stations), used = Σ distinct tool kinds per station |
//!
//! The weighted score is the weight-normalized mean of the three.
//!
//! Degenerate inputs return a sentinel instead of failing: no stations
//! → economic 0; non-positive σ_max → social 1 if balanced else 0;
//! non-positive environmental denominator → 1; zero total weight →
//! weighted 0.

use serde::{Deserialize, Serialize};

use crate::models::{ProblemConfig, Scores, Solution, Weights};

/// Computes objective scores for valid solutions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveScorer {
    /// Station-time standard deviation at which the social score hits 0.
    pub max_allowed_stdev: f64,
}

impl ObjectiveScorer {
    /// Default σ_max as a fraction of takt time.
    pub const DEFAULT_STDEV_RATIO: f64 = 0.5;

    /// Creates a scorer with an explicit σ_max.
    pub fn new(max_allowed_stdev: f64) -> Self {
        Self { max_allowed_stdev }
    }

    /// Creates a scorer with σ_max = half the problem's takt time.
    pub fn for_problem(config: &ProblemConfig) -> Self {
        Self::new(config.takt_time() as f64 * Self::DEFAULT_STDEV_RATIO)
    }

    /// Scores a solution. Invalid solutions score all zeros.
    pub fn evaluate(&self, solution: &Solution, config: &ProblemConfig) -> Scores {
        if !solution.is_valid {
            return Scores::default();
        }
        let mut scores = Scores {
            economic: economic_score(solution, config),
            social: social_score(solution, self.max_allowed_stdev),
            environmental: environmental_score(solution),
            weighted: 0.0,
        };
        scores.weighted = weighted_score(&scores, &config.weights());
        scores
    }

    /// Scores a solution in place.
    pub fn apply(&self, solution: &mut Solution, config: &ProblemConfig) {
        solution.scores = self.evaluate(solution, config);
    }
}

/// Utilization: total task time over takt × station count, capped at 1.
pub fn economic_score(solution: &Solution, config: &ProblemConfig) -> f64 {
    let capacity = config.takt_time() as f64 * solution.station_count() as f64;
    if capacity <= 0.0 {
        return 0.0;
    }
    (config.total_processing_time() as f64 / capacity).min(1.0)
}

/// Workload balance from the population stdev of station times.
pub fn social_score(solution: &Solution, max_allowed_stdev: f64) -> f64 {
    let stdev = solution.station_time_stdev();
    if max_allowed_stdev <= 0.0 {
        return if stdev <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    (max_allowed_stdev - stdev.min(max_allowed_stdev)) / max_allowed_stdev
}

/// Tool variety: fewer distinct tool categories per station is better.
///
/// "No tool" counts as its own category.
pub fn environmental_score(solution: &Solution) -> f64 {
    let total_possible = solution.task_count() as f64;
    let minimum_possible = solution.station_count() as f64;
    let denominator = total_possible - minimum_possible;
    if denominator <= 0.0 {
        return 1.0;
    }
    let used: usize = solution.stations.iter().map(|s| s.distinct_tools()).sum();
    ((total_possible - used as f64) / denominator).clamp(0.0, 1.0)
}

/// Weight-normalized mean of the three objective scores.
pub fn weighted_score(scores: &Scores, weights: &Weights) -> f64 {
    let total = weights.total();
    if total <= 0.0 {
        return 0.0;
    }
    (scores.economic * weights.economic
        + scores.social * weights.social
        + scores.environmental * weights.environmental)
        / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Station, Task};

    fn valid(stations: Vec<Station>) -> Solution {
        let mut s = Solution::new(stations);
        s.is_valid = true;
        s
    }

    #[test]
    fn test_single_task_scores() {
        let config = ProblemConfig::new(10).with_task(Task::new("T1", 10).with_tool("M1"));
        let s = valid(vec![Station::with_tasks(1, vec![Task::new("T1", 10).with_tool("M1")])]);
        let scores = ObjectiveScorer::for_problem(&config).evaluate(&s, &config);

        assert!((scores.economic - 1.0).abs() < 1e-10);
        assert!((scores.social - 1.0).abs() < 1e-10);
        // N = 1, stations = 1 → degenerate denominator
        assert!((scores.environmental - 1.0).abs() < 1e-10);
        assert!((scores.weighted - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_economic() {
        let config = ProblemConfig::new(15)
            .with_task(Task::new("A", 10))
            .with_task(Task::new("B", 10))
            .with_task(Task::new("C", 10));
        let s = valid(vec![
            Station::with_tasks(1, vec![Task::new("A", 10)]),
            Station::with_tasks(2, vec![Task::new("B", 10)]),
            Station::with_tasks(3, vec![Task::new("C", 10)]),
        ]);
        // 30 / (15 * 3)
        assert!((economic_score(&s, &config) - 30.0 / 45.0).abs() < 1e-10);
        assert!((economic_score(&Solution::default(), &config) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_social_zero_variance() {
        let s = valid(vec![
            Station::with_tasks(1, vec![Task::new("A", 20)]),
            Station::with_tasks(2, vec![Task::new("B", 20)]),
        ]);
        for max in [0.5, 3.0, 100.0] {
            assert!((social_score(&s, max) - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_social_partial_and_capped() {
        let s = valid(vec![
            Station::with_tasks(1, vec![Task::new("A", 20)]),
            Station::with_tasks(2, vec![Task::new("B", 10)]),
        ]);
        // stdev 5
        assert!((social_score(&s, 10.0) - 0.5).abs() < 1e-10);
        assert!((social_score(&s, 4.0) - 0.0).abs() < 1e-10);
        assert!((social_score(&s, 0.0) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_environmental() {
        // Station 1: M1, M1 → 1 kind. Station 2: M2, none → 2 kinds.
        let s = valid(vec![
            Station::with_tasks(
                1,
                vec![Task::new("A", 1).with_tool("M1"), Task::new("B", 1).with_tool("M1")],
            ),
            Station::with_tasks(2, vec![Task::new("C", 1).with_tool("M2"), Task::new("D", 1)]),
        ]);
        // (4 - 3) / (4 - 2)
        assert!((environmental_score(&s) - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_weighted() {
        let scores = Scores {
            economic: 1.0,
            social: 0.5,
            environmental: 0.0,
            weighted: 0.0,
        };
        let w = Weights::new(2.0, 2.0, 0.0);
        assert!((weighted_score(&scores, &w) - 0.75).abs() < 1e-10);
        assert!((weighted_score(&scores, &Weights::new(0.0, 0.0, 0.0)) - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_invalid_solution_scores_zero() {
        let config = ProblemConfig::new(10).with_task(Task::new("T1", 5));
        let mut s = Solution::new(vec![Station::with_tasks(1, vec![Task::new("T1", 5)])]);
        ObjectiveScorer::new(5.0).apply(&mut s, &config);
        assert_eq!(s.scores, Scores::default());
    }
}
