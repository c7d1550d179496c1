//! Line balance quality metrics (KPIs).
//!
//! Computes the classic line balancing indicators from a solution and
//! its problem.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Line Efficiency | Σ t_i / (m × c) |
//! | Balance Delay | 1 − line efficiency |
//! | Smoothness Index | √Σ (t_max − t_i)² |
//! | Total Idle Time | m × c − Σ t_i |
//! | Realized Cycle Time | t_max |
//!
//! where m = station count, c = takt time, t_i = station times.
//!
//! # Reference
//! Scholl (1999), "Balancing and Sequencing of Assembly Lines", Ch. 2.2

use crate::models::{ProblemConfig, Solution};

/// Line balance performance indicators.
///
/// All time values are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LineKpi {
    /// Number of stations.
    pub station_count: usize,
    /// Lower bound ⌈Σ time / takt⌉.
    pub theoretical_min_stations: usize,
    /// Largest station time.
    pub realized_cycle_time: i64,
    /// Total idle time across stations.
    pub total_idle_time: i64,
    /// Σ station time / (stations × takt) (0.0..1.0 when within takt).
    pub line_efficiency: f64,
    /// 1 − line efficiency.
    pub balance_delay: f64,
    /// √Σ (t_max − t_i)².
    pub smoothness_index: f64,
}

impl LineKpi {
    /// Computes KPIs from a solution and its problem.
    pub fn calculate(solution: &Solution, config: &ProblemConfig) -> Self {
        let station_count = solution.station_count();
        let takt = config.takt_time();
        let busy = solution.total_time();
        let capacity = takt * station_count as i64;
        let t_max = solution.max_station_time();

        let line_efficiency = if capacity <= 0 {
            0.0
        } else {
            busy as f64 / capacity as f64
        };

        let smoothness_index = solution
            .stations
            .iter()
            .map(|s| {
                let d = (t_max - s.total_time()) as f64;
                d * d
            })
            .sum::<f64>()
            .sqrt();

        Self {
            station_count,
            theoretical_min_stations: config.theoretical_min_stations(),
            realized_cycle_time: t_max,
            total_idle_time: capacity - busy,
            line_efficiency,
            balance_delay: if capacity <= 0 { 0.0 } else { 1.0 - line_efficiency },
            smoothness_index,
        }
    }

    /// Whether the station count equals the theoretical lower bound.
    pub fn is_station_optimal(&self) -> bool {
        self.station_count == self.theoretical_min_stations
    }
}
