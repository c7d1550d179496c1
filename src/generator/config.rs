//! Search configuration.

use serde::{Deserialize, Serialize};

use crate::dispatching::{BalancingContext, PriorityStrategy};
use crate::error::{Error, Result};

/// Parameters of the targeted (station-count driven) builder.
///
/// Scores are summed; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetedParams {
    /// Late rejection when the largest station time exceeds this (None = takt time).
    pub time_ceiling: Option<i64>,
    /// Late rejection when station-time stdev exceeds this (None = off).
    pub max_stdev: Option<f64>,
    /// Maximum distinct tool kinds per station (None = unlimited).
    pub max_distinct_tools: Option<usize>,
    /// Weight of the fit-to-target-load term.
    pub fit_weight: f64,
    /// Weight of the successor fan-out term.
    pub successor_weight: f64,
    /// Weight of the tool-reuse term.
    pub tool_reuse_weight: f64,
    /// Weight of the seeded perturbation term.
    pub perturbation_weight: f64,
}

impl Default for TargetedParams {
    fn default() -> Self {
        Self {
            time_ceiling: None,
            max_stdev: None,
            max_distinct_tools: None,
            fit_weight: 1.0,
            successor_weight: 0.5,
            tool_reuse_weight: 0.3,
            perturbation_weight: 0.4,
        }
    }
}

impl TargetedParams {
    /// Sets the time ceiling.
    pub fn with_time_ceiling(mut self, ceiling: i64) -> Self {
        self.time_ceiling = Some(ceiling);
        self
    }

    /// Sets the stdev ceiling.
    pub fn with_max_stdev(mut self, max_stdev: f64) -> Self {
        self.max_stdev = Some(max_stdev);
        self
    }

    /// Sets the distinct-tool cap.
    pub fn with_max_distinct_tools(mut self, cap: usize) -> Self {
        self.max_distinct_tools = Some(cap);
        self
    }

    /// Sets the four scoring weights (fit, successor, tool reuse, perturbation).
    pub fn with_weights(mut self, fit: f64, successor: f64, tool_reuse: f64, perturbation: f64) -> Self {
        self.fit_weight = fit;
        self.successor_weight = successor;
        self.tool_reuse_weight = tool_reuse;
        self.perturbation_weight = perturbation;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(ceiling) = self.time_ceiling {
            if ceiling <= 0 {
                return Err(Error::InvalidParameter(format!(
                    "time ceiling must be positive, got {ceiling}"
                )));
            }
        }
        if let Some(max) = self.max_stdev {
            if !(max >= 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "stdev ceiling must be non-negative, got {max}"
                )));
            }
        }
        if self.max_distinct_tools == Some(0) {
            return Err(Error::InvalidParameter(
                "distinct-tool cap must be at least 1".into(),
            ));
        }
        let weights = [
            self.fit_weight,
            self.successor_weight,
            self.tool_reuse_weight,
            self.perturbation_weight,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(Error::InvalidParameter(
                "targeted scoring weights must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Multi-start search configuration.
///
/// # Example
/// ```
/// use u_linebalance::dispatching::PriorityStrategy;
/// use u_linebalance::generator::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_strategies(vec![PriorityStrategy::PositionalWeight])
///     .with_iterations_per_strategy(10)
///     .with_seed(7);
/// assert_eq!(config.strategies.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Greedy strategies to sample.
    pub strategies: Vec<PriorityStrategy>,
    /// Greedy attempts per strategy.
    pub iterations_per_strategy: usize,
    /// Base seed; every attempt derives its own seed from it.
    pub seed: u64,
    /// Inclusive station-count range for targeted attempts
    /// (None = theoretical minimum .. minimum + 2).
    pub station_range: Option<(usize, usize)>,
    /// Targeted attempts per station count (0 disables targeted search).
    pub iterations_per_count: usize,
    /// Targeted builder parameters.
    pub targeted: TargetedParams,
    /// Run attempts on the rayon pool.
    pub parallel: bool,
    /// Relative positional-weight gap for hybrid jitter.
    pub hybrid_tolerance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategies: PriorityStrategy::ALL.to_vec(),
            iterations_per_strategy: 50,
            seed: 42,
            station_range: None,
            iterations_per_count: 20,
            targeted: TargetedParams::default(),
            parallel: true,
            hybrid_tolerance: BalancingContext::DEFAULT_HYBRID_TOLERANCE,
        }
    }
}

impl GeneratorConfig {
    /// Sets the greedy strategies.
    pub fn with_strategies(mut self, strategies: Vec<PriorityStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Sets the greedy attempts per strategy.
    pub fn with_iterations_per_strategy(mut self, n: usize) -> Self {
        self.iterations_per_strategy = n;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the targeted station-count range (inclusive).
    pub fn with_station_range(mut self, min: usize, max: usize) -> Self {
        self.station_range = Some((min, max));
        self
    }

    /// Sets the targeted attempts per station count.
    pub fn with_iterations_per_count(mut self, n: usize) -> Self {
        self.iterations_per_count = n;
        self
    }

    /// Sets the targeted builder parameters.
    pub fn with_targeted(mut self, params: TargetedParams) -> Self {
        self.targeted = params;
        self
    }

    /// Enables or disables parallel attempts.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the hybrid jitter tolerance.
    pub fn with_hybrid_tolerance(mut self, tolerance: f64) -> Self {
        self.hybrid_tolerance = tolerance;
        self
    }

    /// Checks parameter domains.
    pub fn validate(&self) -> Result<()> {
        if let Some((min, max)) = self.station_range {
            if min == 0 || min > max {
                return Err(Error::InvalidParameter(format!(
                    "station range {min}..={max} is empty or starts at 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.hybrid_tolerance) {
            return Err(Error::InvalidParameter(format!(
                "hybrid tolerance must lie in [0, 1], got {}",
                self.hybrid_tolerance
            )));
        }
        self.targeted.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = GeneratorConfig::default();
        assert_eq!(c.strategies.len(), 5);
        assert_eq!(c.seed, 42);
        assert!(c.station_range.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid_station_range() {
        let c = GeneratorConfig::default().with_station_range(3, 2);
        assert!(matches!(c.validate(), Err(Error::InvalidParameter(_))));
        let c = GeneratorConfig::default().with_station_range(0, 2);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_invalid_targeted() {
        let c = GeneratorConfig::default()
            .with_targeted(TargetedParams::default().with_max_distinct_tools(0));
        assert!(c.validate().is_err());

        let c = GeneratorConfig::default()
            .with_targeted(TargetedParams::default().with_max_stdev(f64::NAN));
        assert!(c.validate().is_err());

        let c = GeneratorConfig::default().with_hybrid_tolerance(-0.1);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = GeneratorConfig::default()
            .with_station_range(2, 4)
            .with_targeted(TargetedParams::default().with_time_ceiling(30));
        let json = serde_json::to_string(&c).unwrap();
        let back: GeneratorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strategies, c.strategies);
        assert_eq!(back.station_range, Some((2, 4)));
        assert_eq!(back.targeted.time_ceiling, Some(30));
        assert!((back.hybrid_tolerance - c.hybrid_tolerance).abs() < 1e-10);
    }
}
