//! Solution (line balance) model.
//!
//! A solution is an ordered list of stations, the objective scores
//! computed for it, and the feasibility verdict with every violation
//! found.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Station;

/// A candidate line balance.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    /// Stations in line order.
    pub stations: Vec<Station>,
    /// Objective scores (all zero until scored).
    pub scores: Scores,
    /// Whether the last feasibility check passed.
    pub is_valid: bool,
    /// Violations found by the last feasibility check.
    pub violations: Vec<Violation>,
    /// Which construction produced this solution (informational).
    pub origin: String,
}

/// Normalized objective scores. Each lies in [0, 1], 1 = best.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Station utilization against takt time.
    pub economic: f64,
    /// Workload balance across stations.
    pub social: f64,
    /// Tool variety per station (fewer categories = better).
    pub environmental: f64,
    /// Weighted aggregate of the three.
    pub weighted: f64,
}

/// A feasibility violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity (task id or station id).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of feasibility violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A task appears in no station.
    Unassigned,
    /// A task appears more than once.
    DuplicateAssignment,
    /// A station holds a task the problem does not define.
    UnknownTask,
    /// Station time exceeds takt time.
    TaktExceeded,
    /// Station uses a tool more often than its limit.
    ToolLimitExceeded,
    /// A task is placed before one of its predecessors.
    PrecedenceViolation,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }

    /// Creates an unassigned-task violation.
    pub fn unassigned(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::Unassigned, task_id, message)
    }

    /// Creates a duplicate-assignment violation.
    pub fn duplicate(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::DuplicateAssignment, task_id, message)
    }

    /// Creates an unknown-task violation.
    pub fn unknown_task(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::UnknownTask, task_id, message)
    }

    /// Creates a takt-exceeded violation.
    pub fn takt_exceeded(station_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::TaktExceeded, station_id, message)
    }

    /// Creates a tool-limit violation.
    pub fn tool_limit(station_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::ToolLimitExceeded, station_id, message)
    }

    /// Creates a precedence violation.
    pub fn precedence(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::PrecedenceViolation, task_id, message)
    }
}

fn push_escaped(key: &mut String, id: &str) {
    for c in id.chars() {
        if matches!(c, ',' | '|' | '\\') {
            key.push('\\');
        }
        key.push(c);
    }
}

impl Solution {
    /// Creates an unscored, unchecked solution from stations.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            ..Default::default()
        }
    }

    /// Records which construction produced this solution.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Canonical partition key.
    ///
    /// Each station's task ids are sorted and comma-joined; stations are
    /// joined with `|` in line order. `,`, `|` and `\\` inside an id are
    /// escaped with a backslash, so equal keys mean equal partitions
    /// regardless of how the solutions were built.
    pub fn canonical_hash(&self) -> String {
        let mut key = String::new();
        for (i, station) in self.stations.iter().enumerate() {
            if i > 0 {
                key.push('|');
            }
            let mut ids = station.task_ids();
            ids.sort_unstable();
            for (j, id) in ids.into_iter().enumerate() {
                if j > 0 {
                    key.push(',');
                }
                push_escaped(&mut key, id);
            }
        }
        key
    }

    /// Number of stations.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Number of task placements across all stations.
    pub fn task_count(&self) -> usize {
        self.stations.iter().map(|s| s.len()).sum()
    }

    /// Sum of all station times.
    pub fn total_time(&self) -> i64 {
        self.stations.iter().map(|s| s.total_time()).sum()
    }

    /// Largest station time (0 when empty).
    pub fn max_station_time(&self) -> i64 {
        self.stations
            .iter()
            .map(|s| s.total_time())
            .max()
            .unwrap_or(0)
    }

    /// Population standard deviation of station times (0 when empty).
    pub fn station_time_stdev(&self) -> f64 {
        let n = self.stations.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.total_time() as f64 / n as f64;
        let var = self
            .stations
            .iter()
            .map(|s| {
                let d = s.total_time() as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        var.sqrt()
    }

    /// Index of the station holding a task (first occurrence).
    pub fn station_of(&self, task_id: &str) -> Option<usize> {
        self.stations.iter().position(|s| s.contains(task_id))
    }

    /// Task id → station index, first occurrence wins.
    pub fn station_index_map(&self) -> HashMap<&str, usize> {
        let mut map = HashMap::new();
        for (idx, station) in self.stations.iter().enumerate() {
            for task in station.tasks() {
                map.entry(task.id.as_str()).or_insert(idx);
            }
        }
        map
    }

    /// Violation messages of the last feasibility check.
    pub fn violation_messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }
}
