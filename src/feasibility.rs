//! Feasibility checking for line balances.
//!
//! Two entry points:
//! - [`check_feasibility`] validates a complete solution. It runs four
//!   independent passes (completeness, capacity, tool limits, precedence)
//!   and reports every violation found, never just the first.
//! - [`can_add_task`] is the incremental check used during construction.
//!   It stops at the first failing condition, since a builder only needs
//!   one reason to skip a task.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::models::{ProblemConfig, Solution, Station, Task, Violation};

/// Outcome of a full feasibility check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeasibilityReport {
    /// Every violation found, in pass order.
    pub violations: Vec<Violation>,
}

impl FeasibilityReport {
    /// Whether no violation was found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable violation descriptions.
    pub fn messages(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.message.as_str()).collect()
    }
}

/// Why a task cannot join a station right now.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Station time would exceed takt time.
    #[error("Adding '{task_id}' would bring station {station_id} to {new_total}s, over takt time {takt_time}s")]
    TaktExceeded {
        task_id: String,
        station_id: usize,
        new_total: i64,
        takt_time: i64,
    },
    /// Station would use a tool more often than allowed.
    #[error("Adding '{task_id}' would use tool '{tool}' {count} times in station {station_id}, limit {limit}")]
    ToolLimitExceeded {
        task_id: String,
        station_id: usize,
        tool: String,
        count: usize,
        limit: u32,
    },
    /// A direct predecessor has not been assigned yet.
    #[error("Task '{task_id}' waits for predecessor '{predecessor}'")]
    PredecessorPending { task_id: String, predecessor: String },
}

/// Validates a complete solution against the problem.
///
/// # Passes
/// 1. **Completeness**: every task assigned exactly once; unknown ids flagged.
/// 2. **Capacity**: each station's total time ≤ takt time.
/// 3. **Tool limits**: each station's per-tool count ≤ its limit
///    (tools without a limit are unconstrained).
/// 4. **Precedence**: a predecessor sits in an earlier station, or earlier
///    in the same station.
pub fn check_feasibility(solution: &Solution, config: &ProblemConfig) -> FeasibilityReport {
    let mut violations = Vec::new();
    check_completeness(solution, config, &mut violations);
    check_capacity(solution, config, &mut violations);
    check_tool_limits(solution, config, &mut violations);
    check_precedence(solution, config, &mut violations);
    FeasibilityReport { violations }
}

/// Runs [`check_feasibility`] and stores the verdict on the solution.
///
/// Returns whether the solution is valid.
pub fn validate(solution: &mut Solution, config: &ProblemConfig) -> bool {
    let report = check_feasibility(solution, config);
    solution.is_valid = report.is_valid();
    solution.violations = report.violations;
    solution.is_valid
}

/// Whether `task` may be appended to `station` now.
///
/// Checks takt time, then the task's tool limit, then that every direct
/// predecessor is in `assigned`. Returns the first failure.
pub fn can_add_task(
    task: &Task,
    station: &Station,
    config: &ProblemConfig,
    assigned: &HashSet<String>,
) -> Result<(), Rejection> {
    let new_total = station.total_time() + task.processing_time;
    if new_total > config.takt_time() {
        return Err(Rejection::TaktExceeded {
            task_id: task.id.clone(),
            station_id: station.id(),
            new_total,
            takt_time: config.takt_time(),
        });
    }

    let tool = task.tool_key();
    if let Some(limit) = config.tool_limit(tool) {
        let count = station.tool_count(tool) + 1;
        if count > limit as usize {
            return Err(Rejection::ToolLimitExceeded {
                task_id: task.id.clone(),
                station_id: station.id(),
                tool: tool.to_string(),
                count,
                limit,
            });
        }
    }

    if let Some(pending) = config
        .predecessors(&task.id)
        .iter()
        .find(|p| !assigned.contains(*p))
    {
        return Err(Rejection::PredecessorPending {
            task_id: task.id.clone(),
            predecessor: pending.clone(),
        });
    }

    Ok(())
}

fn check_completeness(solution: &Solution, config: &ProblemConfig, out: &mut Vec<Violation>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut unknown: Vec<(&str, usize)> = Vec::new();

    for station in &solution.stations {
        for task in station.tasks() {
            *counts.entry(task.id.as_str()).or_insert(0) += 1;
            if !config.contains_task(&task.id) && !unknown.iter().any(|(id, _)| *id == task.id) {
                unknown.push((task.id.as_str(), station.id()));
            }
        }
    }

    for task in config.tasks() {
        match counts.get(task.id.as_str()).copied().unwrap_or(0) {
            0 => out.push(Violation::unassigned(
                &task.id,
                format!("Task '{}' is never assigned", task.id),
            )),
            1 => {}
            n => out.push(Violation::duplicate(
                &task.id,
                format!("Task '{}' is assigned {} times", task.id, n),
            )),
        }
    }

    for (id, station_id) in unknown {
        out.push(Violation::unknown_task(
            id,
            format!("Station {station_id} holds unknown task '{id}'"),
        ));
    }
}

fn check_capacity(solution: &Solution, config: &ProblemConfig, out: &mut Vec<Violation>) {
    let takt = config.takt_time();
    for station in &solution.stations {
        if station.total_time() > takt {
            out.push(Violation::takt_exceeded(
                station.id().to_string(),
                format!(
                    "Station {} time {}s exceeds takt time {}s",
                    station.id(),
                    station.total_time(),
                    takt
                ),
            ));
        }
    }
}

fn check_tool_limits(solution: &Solution, config: &ProblemConfig, out: &mut Vec<Violation>) {
    for station in &solution.stations {
        for (tool, &count) in station.tools() {
            if let Some(limit) = config.tool_limit(tool) {
                if count > limit as usize {
                    out.push(Violation::tool_limit(
                        station.id().to_string(),
                        format!(
                            "Station {} uses tool '{}' {} times, limit {}",
                            station.id(),
                            tool,
                            count,
                            limit
                        ),
                    ));
                }
            }
        }
    }
}

fn check_precedence(solution: &Solution, config: &ProblemConfig, out: &mut Vec<Violation>) {
    // task → (station index, position in station), first occurrence wins
    let mut placement: HashMap<&str, (usize, usize)> = HashMap::new();
    for (si, station) in solution.stations.iter().enumerate() {
        for (pi, task) in station.tasks().iter().enumerate() {
            placement.entry(task.id.as_str()).or_insert((si, pi));
        }
    }

    for task in config.tasks() {
        let Some(&(si, pi)) = placement.get(task.id.as_str()) else {
            continue;
        };
        for pred in config.predecessors(&task.id) {
            let Some(&(sp, pp)) = placement.get(pred.as_str()) else {
                continue;
            };
            if sp > si {
                out.push(Violation::precedence(
                    &task.id,
                    format!(
                        "Task '{}' in station {} comes before its predecessor '{}' in station {}",
                        task.id,
                        solution.stations[si].id(),
                        pred,
                        solution.stations[sp].id()
                    ),
                ));
            } else if sp == si && pp > pi {
                out.push(Violation::precedence(
                    &task.id,
                    format!(
                        "Task '{}' runs before its predecessor '{}' within station {}",
                        task.id,
                        pred,
                        solution.stations[si].id()
                    ),
                ));
            }
        }
    }
}
