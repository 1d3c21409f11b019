//! Distance and travel time lookups.
//!
//! Provides a dense distance matrix shared read-only by all workers
//! during the search.

mod matrix;

pub use matrix::DistanceMatrix;
