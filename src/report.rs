//! Result reporting: population statistics, station tables and
//! per-solution breakdowns for renderers and CSV writers.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ProblemConfig, Scores, Solution};
use crate::scoring::LineKpi;

/// Minimum and maximum of one objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl ScoreRange {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(Self { min: v, max: v }),
            Some(r) => Some(Self {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

/// Summary of a population.
///
/// Score extrema and the station-count range cover valid solutions only;
/// they are `None` when there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    /// Unique solutions.
    pub count: usize,
    /// Feasible solutions.
    pub valid_count: usize,
    /// Economic score extrema.
    pub economic: Option<ScoreRange>,
    /// Social score extrema.
    pub social: Option<ScoreRange>,
    /// Environmental score extrema.
    pub environmental: Option<ScoreRange>,
    /// Weighted score extrema.
    pub weighted: Option<ScoreRange>,
    /// Fewest stations in a valid solution.
    pub min_stations: Option<usize>,
    /// Most stations in a valid solution.
    pub max_stations: Option<usize>,
}

impl PopulationStats {
    /// Computes statistics over a population.
    pub fn from_solutions(solutions: &[Solution]) -> Self {
        let valid: Vec<&Solution> = solutions.iter().filter(|s| s.is_valid).collect();
        let range = |f: fn(&Scores) -> f64| ScoreRange::of(valid.iter().map(|s| f(&s.scores)));

        Self {
            count: solutions.len(),
            valid_count: valid.len(),
            economic: range(|s| s.economic),
            social: range(|s| s.social),
            environmental: range(|s| s.environmental),
            weighted: range(|s| s.weighted),
            min_stations: valid.iter().map(|s| s.station_count()).min(),
            max_stations: valid.iter().map(|s| s.station_count()).max(),
        }
    }
}

/// One row of the flat station table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRow {
    /// Station id (1-based).
    pub station_id: usize,
    /// Task ids sorted by natural numeric key (`T2` before `T10`).
    pub task_ids: Vec<String>,
    /// Station time.
    pub total_time: i64,
}

/// Flat station → task table, one row per station.
pub fn station_table(solution: &Solution) -> Vec<StationRow> {
    solution
        .stations
        .iter()
        .map(|station| {
            let mut task_ids: Vec<String> =
                station.task_ids().into_iter().map(String::from).collect();
            task_ids.sort_by(|a, b| natural_cmp(a, b));
            StationRow {
                station_id: station.id(),
                task_ids,
                total_time: station.total_time(),
            }
        })
        .collect()
}

/// Orders ids by their first run of digits, then lexically.
///
/// Ids without digits sort after numbered ones.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (numeric_key(a), numeric_key(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn numeric_key(id: &str) -> Option<u64> {
    let digits: String = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Per-station view for report rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationBreakdown {
    /// Station id (1-based).
    pub station_id: usize,
    /// Task ids in line order.
    pub task_ids: Vec<String>,
    /// Station time.
    pub total_time: i64,
    /// Takt time minus station time.
    pub idle_time: i64,
    /// Tool key → task count.
    pub tools: BTreeMap<String, usize>,
}

/// Read-only view of one solution for report rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionBreakdown {
    /// Partition key, see [`Solution::canonical_hash`].
    pub canonical_hash: String,
    /// Construction that produced the solution.
    pub origin: String,
    /// Result of the last feasibility check.
    pub is_valid: bool,
    /// Objective scores.
    pub scores: Scores,
    /// Busy time over station capacity.
    pub line_efficiency: f64,
    /// Smoothness index against the busiest station.
    pub smoothness_index: f64,
    /// Station count equals the theoretical minimum.
    pub station_optimal: bool,
    /// Stations in line order.
    pub stations: Vec<StationBreakdown>,
    /// Violation messages of the last feasibility check.
    pub violations: Vec<String>,
}

impl SolutionBreakdown {
    /// Builds the breakdown of a solution.
    pub fn new(solution: &Solution, config: &ProblemConfig) -> Self {
        let kpi = LineKpi::calculate(solution, config);
        let takt = config.takt_time();
        Self {
            canonical_hash: solution.canonical_hash(),
            origin: solution.origin.clone(),
            is_valid: solution.is_valid,
            scores: solution.scores,
            line_efficiency: kpi.line_efficiency,
            smoothness_index: kpi.smoothness_index,
            station_optimal: kpi.is_station_optimal(),
            stations: solution
                .stations
                .iter()
                .map(|s| StationBreakdown {
                    station_id: s.id(),
                    task_ids: s.task_ids().into_iter().map(String::from).collect(),
                    total_time: s.total_time(),
                    idle_time: s.idle_time(takt),
                    tools: s.tools().clone(),
                })
                .collect(),
            violations: solution
                .violation_messages()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Station, Task};

    fn make_solution(valid: bool, stations: usize, economic: f64) -> Solution {
        let mut s = Solution::new(
            (1..=stations)
                .map(|i| Station::with_tasks(i, vec![Task::new(format!("T{i}"), 5)]))
                .collect(),
        );
        s.is_valid = valid;
        s.scores.economic = economic;
        s
    }

    #[test]
    fn test_population_stats() {
        let solutions = vec![
            make_solution(true, 2, 0.9),
            make_solution(true, 4, 0.4),
            make_solution(false, 1, 0.0),
        ];
        let stats = PopulationStats::from_solutions(&solutions);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.valid_count, 2);
        assert_eq!(stats.min_stations, Some(2));
        assert_eq!(stats.max_stations, Some(4));
        let eco = stats.economic.unwrap();
        assert!((eco.min - 0.4).abs() < 1e-10);
        assert!((eco.max - 0.9).abs() < 1e-10);
    }

    #[test]
    fn test_population_stats_empty() {
        let stats = PopulationStats::from_solutions(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.economic.is_none());
        assert!(stats.min_stations.is_none());
    }

    #[test]
    fn test_station_table_natural_order() {
        let s = Solution::new(vec![
            Station::with_tasks(
                1,
                vec![Task::new("T10", 1), Task::new("T2", 1), Task::new("T1", 1)],
            ),
            Station::with_tasks(2, vec![Task::new("weld", 1), Task::new("T3", 2)]),
        ]);
        let rows = station_table(&s);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].task_ids, vec!["T1", "T2", "T10"]);
        assert_eq!(rows[0].total_time, 3);
        assert_eq!(rows[1].station_id, 2);
        assert_eq!(rows[1].task_ids, vec!["T3", "weld"]);
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("T9", "T10"), Ordering::Less);
        assert_eq!(natural_cmp("A1", "B1"), Ordering::Less);
        assert_eq!(natural_cmp("x", "T1"), Ordering::Greater);
        assert_eq!(natural_cmp("a", "b"), Ordering::Less);
    }

    #[test]
    fn test_breakdown() {
        let config = ProblemConfig::new(10)
            .with_task(Task::new("T1", 6).with_tool("M1"))
            .with_task(Task::new("T2", 4));
        let s = Solution::new(vec![Station::with_tasks(
            1,
            vec![Task::new("T1", 6).with_tool("M1"), Task::new("T2", 4)],
        )])
        .with_origin("LPT");
        let b = SolutionBreakdown::new(&s, &config);

        assert_eq!(b.canonical_hash, "T1,T2");
        assert_eq!(b.origin, "LPT");
        assert_eq!(b.stations[0].idle_time, 0);
        assert_eq!(b.stations[0].tools.get("M1"), Some(&1));
        assert_eq!(b.stations[0].tools.get("none"), Some(&1));
        assert!((b.line_efficiency - 1.0).abs() < 1e-10);
        assert!(b.station_optimal);
    }

    #[test]
    fn test_breakdown_above_minimum_stations() {
        let config = ProblemConfig::new(10)
            .with_task(Task::new("T1", 3))
            .with_task(Task::new("T2", 3));
        let s = Solution::new(vec![
            Station::with_tasks(1, vec![Task::new("T1", 3)]),
            Station::with_tasks(2, vec![Task::new("T2", 3)]),
        ]);
        let b = SolutionBreakdown::new(&s, &config);

        // 6s of work fits one station
        assert!(!b.station_optimal);
        assert_eq!(b.stations[1].idle_time, 7);
    }
}
