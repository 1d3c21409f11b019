//! Threshold-accepting search control.
//!
//! Schrimpf-style acceptance: a candidate replacing the worker's current
//! solution is accepted when its cost delta stays below a threshold that
//! decays toward zero over the iteration budget, so the search tolerates
//! uphill moves early and behaves greedily late.
//!
//! # Reference
//!
//! Schrimpf, G. et al. (2000). "Record Breaking Optimization Results Using
//! the Ruin and Recreate Principle", *Journal of Computational Physics*
//! 159(2), 139-171.

use serde::{Deserialize, Serialize};

/// How the acceptance threshold decays over the iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecaySchedule {
    /// Halves the threshold every `half_life_fraction` of the budget.
    Exponential {
        /// Fraction of the budget after which the threshold has halved.
        half_life_fraction: f64,
    },
    /// Decays linearly from the initial threshold to zero.
    Linear,
}

impl Default for DecaySchedule {
    fn default() -> Self {
        DecaySchedule::Exponential {
            half_life_fraction: 0.1,
        }
    }
}

/// Per-worker acceptance policy.
///
/// Holds no solution state: the worker owns `current`, this type only
/// answers whether a candidate's `delta` is acceptable at an iteration.
/// Improving candidates (`delta <= 0`) are always accepted.
///
/// # Examples
///
/// ```
/// use vrp_lns::search::{DecaySchedule, ThresholdAcceptance};
///
/// let policy = ThresholdAcceptance::new(10.0, DecaySchedule::Linear, 100);
/// assert!(policy.accepts(0, -1.0));
/// assert!(policy.accepts(0, 9.0));
/// assert!(!policy.accepts(99, 9.0));
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdAcceptance {
    initial_threshold: f64,
    schedule: DecaySchedule,
    budget: u64,
}

impl ThresholdAcceptance {
    /// Creates a policy decaying from `initial_threshold` over `budget`
    /// iterations.
    pub fn new(initial_threshold: f64, schedule: DecaySchedule, budget: u64) -> Self {
        Self {
            initial_threshold: initial_threshold.max(0.0),
            schedule,
            budget: budget.max(1),
        }
    }

    /// The acceptance threshold at the given (worker-local) iteration.
    ///
    /// Monotonically non-increasing in `iteration`.
    pub fn threshold(&self, iteration: u64) -> f64 {
        let progress = (iteration as f64 / self.budget as f64).min(1.0);
        match self.schedule {
            DecaySchedule::Exponential { half_life_fraction } => {
                let half_lives = progress / half_life_fraction.max(f64::EPSILON);
                self.initial_threshold * 0.5_f64.powf(half_lives)
            }
            DecaySchedule::Linear => self.initial_threshold * (1.0 - progress),
        }
    }

    /// Returns `true` if a candidate with the given cost delta relative to
    /// the worker's current solution should be accepted.
    pub fn accepts(&self, iteration: u64, delta: f64) -> bool {
        delta <= 0.0 || delta <= self.threshold(iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improving_always_accepted() {
        let policy = ThresholdAcceptance::new(0.0, DecaySchedule::Linear, 10);
        assert!(policy.accepts(0, -5.0));
        assert!(policy.accepts(9, -0.001));
        assert!(policy.accepts(9, 0.0));
    }

    #[test]
    fn test_threshold_monotone_non_increasing() {
        for schedule in [
            DecaySchedule::Exponential {
                half_life_fraction: 0.1,
            },
            DecaySchedule::Linear,
        ] {
            let policy = ThresholdAcceptance::new(100.0, schedule, 1000);
            let mut prev = f64::INFINITY;
            for i in 0..=1000 {
                let t = policy.threshold(i);
                assert!(t <= prev, "threshold rose at iteration {i}");
                prev = t;
            }
        }
    }

    #[test]
    fn test_exponential_half_life() {
        let policy = ThresholdAcceptance::new(
            100.0,
            DecaySchedule::Exponential {
                half_life_fraction: 0.1,
            },
            1000,
        );
        assert!((policy.threshold(0) - 100.0).abs() < 1e-10);
        assert!((policy.threshold(100) - 50.0).abs() < 1e-9);
        assert!((policy.threshold(200) - 25.0).abs() < 1e-9);
        // near-greedy at the end of the budget
        assert!(policy.threshold(1000) < 0.1);
    }

    #[test]
    fn test_linear_reaches_zero() {
        let policy = ThresholdAcceptance::new(100.0, DecaySchedule::Linear, 100);
        assert!((policy.threshold(100) - 0.0).abs() < 1e-10);
        assert!(!policy.accepts(100, 0.001));
    }

    #[test]
    fn test_worsening_accepted_only_under_threshold() {
        let policy = ThresholdAcceptance::new(10.0, DecaySchedule::Linear, 100);
        assert!(policy.accepts(0, 9.99));
        assert!(!policy.accepts(0, 10.01));
        // halfway: threshold 5.0
        assert!(policy.accepts(50, 4.99));
        assert!(!policy.accepts(50, 5.01));
    }

    #[test]
    fn test_past_budget_clamps() {
        let policy = ThresholdAcceptance::new(10.0, DecaySchedule::Linear, 100);
        assert_eq!(policy.threshold(1_000), 0.0);
    }
}
