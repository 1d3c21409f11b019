//! Domain model types for vehicle routing problems.
//!
//! Provides the core abstractions: service requests with demands and time
//! windows, vehicles with shared capacity/cost types and per-vehicle depots,
//! an immutable problem built once before the search, and the solution
//! representation the search operators mutate.

mod problem;
mod request;
mod solution;
mod vehicle;

pub use problem::{FleetSize, Problem, ProblemBuilder};
pub use request::{Request, TimeWindow};
pub use solution::{Route, Solution};
pub use vehicle::{Vehicle, VehicleType};
