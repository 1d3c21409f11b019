//! Error types.

use thiserror::Error;

/// Raised when a problem or solver configuration is unusable before the
/// search starts.
///
/// The search engine never receives a problem that is unsolvable by
/// construction: [`ProblemBuilder::build`](crate::models::ProblemBuilder::build)
/// and [`SolverConfig::validate`](crate::solver::SolverConfig::validate)
/// fail fast with one of these variants instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The problem has no vehicles.
    #[error("problem has no vehicles")]
    NoVehicles,

    /// The problem has no requests.
    #[error("problem has no requests")]
    NoRequests,

    /// A request id does not match its position in the builder.
    #[error("request id {found} at position {expected} (ids must be dense, starting at 0)")]
    RequestIdMismatch {
        /// Position in insertion order.
        expected: usize,
        /// Id carried by the request.
        found: usize,
    },

    /// A vehicle id does not match its position in the builder.
    #[error("vehicle id {found} at position {expected} (ids must be dense, starting at 0)")]
    VehicleIdMismatch {
        /// Position in insertion order.
        expected: usize,
        /// Id carried by the vehicle.
        found: usize,
    },

    /// A request demand exceeds the capacity of every vehicle.
    #[error("request {id} demand {demand} exceeds every vehicle capacity (max {max_capacity})")]
    DemandExceedsCapacity {
        /// Request id.
        id: usize,
        /// Demand of the request.
        demand: i32,
        /// Largest capacity in the fleet.
        max_capacity: i32,
    },

    /// Ruin fraction bounds are outside `0 < min <= max <= 1`.
    #[error("ruin fraction bounds ({min}, {max}) must satisfy 0 < min <= max <= 1")]
    InvalidRuinFraction {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// An operator weight table is empty or contains a non-positive weight.
    #[error("{table} operator weights must be non-empty and positive")]
    InvalidWeights {
        /// Which weight table was rejected.
        table: &'static str,
    },

    /// The worker thread count is zero.
    #[error("thread count must be positive")]
    NoThreads,

    /// The iteration budget is zero and no time limit is set.
    #[error("either a positive iteration budget or a time limit is required")]
    NoBudget,

    /// The solution pool capacity is zero.
    #[error("solution pool capacity must be positive")]
    EmptyPool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigurationError::NoVehicles.to_string(),
            "problem has no vehicles"
        );
        let e = ConfigurationError::DemandExceedsCapacity {
            id: 3,
            demand: 120,
            max_capacity: 80,
        };
        assert_eq!(
            e.to_string(),
            "request 3 demand 120 exceeds every vehicle capacity (max 80)"
        );
    }
}
