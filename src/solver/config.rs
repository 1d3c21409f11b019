//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::search::{DecaySchedule, RecreateKind, RuinKind};

/// Worker thread count used when none is configured: available hardware
/// parallelism plus a little headroom.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        + 2
}

/// Configuration for the concurrent ruin-and-recreate search.
///
/// All search-control knobs are explicit here: operator weights, ruin-size
/// bounds, the acceptance decay schedule, budgets, and seeds. Nothing is
/// hard-coded in the engine.
///
/// # Examples
///
/// ```
/// use vrp_lns::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_threads(4)
///     .with_max_iterations(20_000)
///     .with_seed(42);
/// assert_eq!(config.threads, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Number of parallel workers.
    pub threads: usize,
    /// Iteration budget shared by all workers. Zero means unbounded
    /// (a time limit is then required).
    pub max_iterations: u64,
    /// Optional wall-clock budget.
    pub time_limit: Option<Duration>,
    /// Base random seed; worker `i` is seeded with `seed + i`.
    /// `None` picks a fixed default seed.
    pub seed: Option<u64>,
    /// Ruin operator selection weights.
    pub ruin_weights: Vec<(RuinKind, f64)>,
    /// Recreate operator selection weights.
    pub recreate_weights: Vec<(RecreateKind, f64)>,
    /// Bounds on the ruined fraction of currently assigned requests,
    /// `0 < min <= max <= 1`. At least one request is always ruined.
    pub ruin_fraction: (f64, f64),
    /// Initial acceptance threshold as a fraction of the worker's initial
    /// solution cost.
    pub initial_threshold_ratio: f64,
    /// How the acceptance threshold decays over the iteration budget.
    pub decay_schedule: DecaySchedule,
    /// Cost charged per unassigned request.
    pub unassigned_penalty: f64,
    /// Capacity K of the best-solution pool.
    pub pool_capacity: usize,
    /// Notify progress listeners every this many iterations.
    pub notify_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            max_iterations: 2_000,
            time_limit: None,
            seed: None,
            ruin_weights: vec![
                (RuinKind::Random, 1.0),
                (RuinKind::Proximity, 1.0),
                (RuinKind::Worst, 1.0),
            ],
            recreate_weights: vec![
                (RecreateKind::Greedy, 1.0),
                (RecreateKind::Regret { k: 2 }, 1.0),
            ],
            ruin_fraction: (0.1, 0.4),
            initial_threshold_ratio: 0.05,
            decay_schedule: DecaySchedule::default(),
            unassigned_penalty: 10_000.0,
            pool_capacity: 5,
            notify_interval: 100,
        }
    }
}

impl SolverConfig {
    /// Sets the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the ruin operator weight table.
    pub fn with_ruin_weights(mut self, weights: Vec<(RuinKind, f64)>) -> Self {
        self.ruin_weights = weights;
        self
    }

    /// Sets the recreate operator weight table.
    pub fn with_recreate_weights(mut self, weights: Vec<(RecreateKind, f64)>) -> Self {
        self.recreate_weights = weights;
        self
    }

    /// Sets the ruin fraction bounds.
    pub fn with_ruin_fraction(mut self, min: f64, max: f64) -> Self {
        self.ruin_fraction = (min, max);
        self
    }

    /// Sets the initial acceptance threshold ratio.
    pub fn with_initial_threshold_ratio(mut self, ratio: f64) -> Self {
        self.initial_threshold_ratio = ratio;
        self
    }

    /// Sets the acceptance decay schedule.
    pub fn with_decay_schedule(mut self, schedule: DecaySchedule) -> Self {
        self.decay_schedule = schedule;
        self
    }

    /// Sets the penalty per unassigned request.
    pub fn with_unassigned_penalty(mut self, penalty: f64) -> Self {
        self.unassigned_penalty = penalty;
        self
    }

    /// Sets the solution pool capacity.
    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Sets the listener notification interval.
    pub fn with_notify_interval(mut self, interval: u64) -> Self {
        self.notify_interval = interval.max(1);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a zero thread count, an empty
    /// budget, out-of-range ruin fractions, bad weight tables, or a zero
    /// pool capacity.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.threads == 0 {
            return Err(ConfigurationError::NoThreads);
        }
        if self.max_iterations == 0 && self.time_limit.is_none() {
            return Err(ConfigurationError::NoBudget);
        }
        let (min, max) = self.ruin_fraction;
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max || max > 1.0 {
            return Err(ConfigurationError::InvalidRuinFraction { min, max });
        }
        if self.ruin_weights.is_empty()
            || self
                .ruin_weights
                .iter()
                .any(|&(_, w)| !w.is_finite() || w <= 0.0)
        {
            return Err(ConfigurationError::InvalidWeights { table: "ruin" });
        }
        if self.recreate_weights.is_empty()
            || self
                .recreate_weights
                .iter()
                .any(|&(_, w)| !w.is_finite() || w <= 0.0)
        {
            return Err(ConfigurationError::InvalidWeights { table: "recreate" });
        }
        if self.pool_capacity == 0 {
            return Err(ConfigurationError::EmptyPool);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
        assert!(SolverConfig::default().threads >= 3);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = SolverConfig::default().with_threads(0);
        assert_eq!(config.validate(), Err(ConfigurationError::NoThreads));
    }

    #[test]
    fn test_empty_budget_rejected() {
        let config = SolverConfig::default().with_max_iterations(0);
        assert_eq!(config.validate(), Err(ConfigurationError::NoBudget));

        let config = SolverConfig::default()
            .with_max_iterations(0)
            .with_time_limit(Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_ruin_fraction_rejected() {
        for (min, max) in [(0.0, 0.4), (0.5, 0.2), (0.1, 1.5), (f64::NAN, 0.4)] {
            let config = SolverConfig::default().with_ruin_fraction(min, max);
            assert!(config.validate().is_err(), "({min}, {max}) accepted");
        }
    }

    #[test]
    fn test_bad_weights_rejected() {
        let config = SolverConfig::default().with_ruin_weights(vec![]);
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::InvalidWeights { table: "ruin" })
        );

        let config = SolverConfig::default()
            .with_recreate_weights(vec![(RecreateKind::Greedy, -1.0)]);
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::InvalidWeights { table: "recreate" })
        );
    }

    #[test]
    fn test_zero_pool_rejected() {
        let config = SolverConfig::default().with_pool_capacity(0);
        assert_eq!(config.validate(), Err(ConfigurationError::EmptyPool));
    }

    #[test]
    fn test_notify_interval_clamped() {
        let config = SolverConfig::default().with_notify_interval(0);
        assert_eq!(config.notify_interval, 1);
    }
}
