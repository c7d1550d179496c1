//! Station-count targeted construction.
//!
//! Fills stations toward a target load of Σ time / target, picking at
//! each step the admissible task with the highest score:
//!
//! ```text
//! score = w_fit · fit + w_succ · fan_out + w_tool · reuse + w_perturb · noise
//! ```
//!
//! - `fit`: 1 when the task exactly fills the remaining target load,
//!   decreasing with leftover room, negative when it overshoots.
//! - `fan_out`: transitive successor count / (n − 1).
//! - `reuse`: 1 when the station already uses the task's tool kind.
//! - `noise`: uniform [0, 1) keyed by (seed, processing time). This is
//!   the only source of diversity between calls with the same target.
//!
//! A station closes once it reaches the target load or admits nothing
//! more. The distinct-tool cap is enforced during construction; the
//! time and stdev ceilings reject the finished solution.

use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::TargetedParams;
use crate::dispatching::BalancingContext;
use crate::feasibility::{self, can_add_task};
use crate::models::{ProblemConfig, Solution, Station, Task};
use crate::precedence;

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Builder aiming at a given number of stations.
#[derive(Debug, Clone)]
pub struct TargetedBuilder<'a> {
    config: &'a ProblemConfig,
    params: TargetedParams,
    context: BalancingContext,
}

impl<'a> TargetedBuilder<'a> {
    /// Creates a builder with default parameters.
    pub fn new(config: &'a ProblemConfig) -> Self {
        Self {
            config,
            params: TargetedParams::default(),
            context: BalancingContext::for_problem(config),
        }
    }

    /// Sets the builder parameters.
    pub fn with_params(mut self, params: TargetedParams) -> Self {
        self.params = params;
        self
    }

    /// Uses a precomputed context.
    pub fn with_context(mut self, context: BalancingContext) -> Self {
        self.context = context;
        self
    }

    /// Builds one solution aiming at `target_stations`.
    ///
    /// Returns `None` on a stall or when a late rejection filter fires.
    pub fn build(&self, target_stations: usize, seed: u64) -> Option<Solution> {
        if target_stations == 0 {
            return None;
        }
        let config = self.config;
        let total = config.task_count();
        let target_load = config.total_processing_time() as f64 / target_stations as f64;

        let mut assigned: HashSet<String> = HashSet::with_capacity(total);
        let mut stations: Vec<Station> = Vec::new();
        let mut current = Station::new(1);

        while assigned.len() < total {
            let available = precedence::available_tasks(config, &assigned);
            if available.is_empty() {
                log::trace!("target {target_stations}: no available task");
                return None;
            }

            let best = available
                .into_iter()
                .filter(|task| self.admits(task, &current, &assigned))
                .map(|task| (task, self.score(task, &current, target_load, seed)))
                .fold(None::<(&Task, f64)>, |best, (task, score)| match best {
                    Some((_, s)) if s >= score => best,
                    _ => Some((task, score)),
                });

            match best {
                Some((task, _)) => {
                    assigned.insert(task.id.clone());
                    current.push_task(task.clone());
                    if current.total_time() as f64 >= target_load {
                        let next = Station::new(current.id() + 1);
                        stations.push(std::mem::replace(&mut current, next));
                    }
                }
                None if current.is_empty() => {
                    log::trace!(
                        "target {target_stations}: nothing fits empty station {}",
                        current.id()
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

        let mut solution =
            Solution::new(stations).with_origin(format!("TARGET-{target_stations}"));

        let ceiling = self.params.time_ceiling.unwrap_or(config.takt_time());
        if solution.max_station_time() > ceiling {
            log::trace!(
                "target {target_stations}: max station time {} over ceiling {ceiling}",
                solution.max_station_time()
            );
            return None;
        }
        if let Some(max_stdev) = self.params.max_stdev {
            let stdev = solution.station_time_stdev();
            if stdev > max_stdev {
                log::trace!("target {target_stations}: stdev {stdev:.3} over {max_stdev:.3}");
                return None;
            }
        }

        feasibility::validate(&mut solution, config);
        Some(solution)
    }

    fn admits(&self, task: &Task, station: &Station, assigned: &HashSet<String>) -> bool {
        if can_add_task(task, station, self.config, assigned).is_err() {
            return false;
        }
        match self.params.max_distinct_tools {
            Some(cap) if station.tool_count(task.tool_key()) == 0 => {
                station.distinct_tools() < cap
            }
            _ => true,
        }
    }

    fn score(&self, task: &Task, station: &Station, target_load: f64, seed: u64) -> f64 {
        let p = &self.params;
        let time = task.processing_time as f64;
        let remaining = target_load - station.total_time() as f64;

        let fit = if target_load <= 0.0 {
            0.0
        } else if time <= remaining {
            1.0 - (remaining - time) / target_load
        } else {
            -(time - remaining) / target_load
        };

        let n = self.config.task_count();
        let fan_out = if n > 1 {
            self.context.followers(&task.id) as f64 / (n - 1) as f64
        } else {
            0.0
        };

        let reuse = if station.tool_count(task.tool_key()) > 0 {
            1.0
        } else {
            0.0
        };

        p.fit_weight * fit
            + p.successor_weight * fan_out
            + p.tool_reuse_weight * reuse
            + p.perturbation_weight * perturbation(seed, task.processing_time)
    }
}

/// Deterministic noise in [0, 1) for a (seed, processing time) pair.
fn perturbation(seed: u64, processing_time: i64) -> f64 {
    let key = seed.wrapping_mul(SEED_MIX) ^ processing_time as u64;
    SmallRng::seed_from_u64(key).random::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chain(times: &[i64], takt: i64) -> ProblemConfig {
        let mut c = ProblemConfig::new(takt);
        for (i, &t) in times.iter().enumerate() {
            c.add_task(Task::new(format!("T{}", i + 1), t));
        }
        for i in 1..times.len() {
            c.add_precedence(&format!("T{i}"), &format!("T{}", i + 1))
                .unwrap();
        }
        c
    }

    #[test]
    fn test_target_two_stations() {
        let c = make_chain(&[5, 5, 5, 5], 10);
        let s = TargetedBuilder::new(&c).build(2, 1).unwrap();
        assert_eq!(s.canonical_hash(), "T1,T2|T3,T4");
        assert!(s.is_valid);
        assert_eq!(s.origin, "TARGET-2");
    }

    #[test]
    fn test_target_closes_at_load() {
        let c = make_chain(&[5, 5, 5, 5], 10);
        let s = TargetedBuilder::new(&c).build(4, 1).unwrap();
        assert_eq!(s.station_count(), 4);
    }

    #[test]
    fn test_zero_target() {
        let c = make_chain(&[5, 5], 10);
        assert!(TargetedBuilder::new(&c).build(0, 1).is_none());
    }

    #[test]
    fn test_distinct_tool_cap() {
        let c = ProblemConfig::new(10)
            .with_task(Task::new("A", 1).with_tool("M1"))
            .with_task(Task::new("B", 1).with_tool("M2"))
            .with_task(Task::new("C", 1).with_tool("M1"))
            .with_tool_limit("M1", 5);
        let params = TargetedParams::default().with_max_distinct_tools(1);
        let s = TargetedBuilder::new(&c).with_params(params).build(1, 9).unwrap();

        assert!(s.is_valid);
        assert!(s.stations.iter().all(|st| st.distinct_tools() <= 1));
        assert_eq!(s.canonical_hash(), "A,C|B");
    }

    #[test]
    fn test_time_ceiling_rejects() {
        let c = make_chain(&[5, 5, 5, 5], 10);
        let strict = TargetedParams::default().with_time_ceiling(4);
        assert!(TargetedBuilder::new(&c).with_params(strict).build(4, 1).is_none());

        let loose = TargetedParams::default().with_time_ceiling(5);
        assert!(TargetedBuilder::new(&c).with_params(loose).build(4, 1).is_some());
    }

    #[test]
    fn test_stdev_ceiling_rejects() {
        // Load 5: [T1=6] closes, [T2=4, T3=5] closes → times 6 and 9, stdev 1.5
        let c = make_chain(&[6, 4, 5], 10);
        let builder = TargetedBuilder::new(&c);

        let s = builder.build(3, 1).unwrap();
        assert!((s.station_time_stdev() - 1.5).abs() < 1e-10);

        let strict = builder
            .clone()
            .with_params(TargetedParams::default().with_max_stdev(1.0));
        assert!(strict.build(3, 1).is_none());

        let loose = builder.with_params(TargetedParams::default().with_max_stdev(2.0));
        assert!(loose.build(3, 1).is_some());
    }

    #[test]
    fn test_seed_reproducible() {
        let c = ProblemConfig::new(12)
            .with_task(Task::new("A", 3))
            .with_task(Task::new("B", 4))
            .with_task(Task::new("C", 5))
            .with_task(Task::new("D", 6))
            .with_task(Task::new("E", 2));
        let builder = TargetedBuilder::new(&c);
        for seed in 0..8 {
            let a = builder.build(2, seed).map(|s| s.canonical_hash());
            let b = builder.build(2, seed).map(|s| s.canonical_hash());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_perturbation_range() {
        for seed in 0..16 {
            for t in [1, 5, 100] {
                let v = perturbation(seed, t);
                assert!((0.0..1.0).contains(&v));
                assert!((v - perturbation(seed, t)).abs() < 1e-15);
            }
        }
    }
}
