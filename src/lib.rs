//! # vrp-lns
//!
//! Concurrent ruin-and-recreate solver for capacitated vehicle routing
//! with optional time windows, multiple depots, and heterogeneous fleets.
//!
//! Multiple worker threads run independent large-neighborhood-search
//! trajectories over a shared problem, feeding a bounded pool of the best
//! solutions found. Acceptance follows a Schrimpf-style decaying threshold.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Request, Vehicle, Route, Solution, Problem)
//! - [`distance`] — Distance and travel time matrix
//! - [`evaluation`] — Route feasibility checking and cost evaluation
//! - [`search`] — Ruin/recreate operators, acceptance, operator selection
//! - [`solver`] — The concurrent engine, configuration, pool, and listeners
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use vrp_lns::models::{Problem, Request, Vehicle, VehicleType};
//! use vrp_lns::solver::{Solver, SolverConfig};
//!
//! let vehicle_type = Arc::new(VehicleType::new(0, 100));
//! let problem = Problem::builder()
//!     .add_request(Request::new(0, 2.0, 3.0, 10, 0.0))
//!     .add_request(Request::new(1, 5.0, 1.0, 20, 0.0))
//!     .add_vehicle(Vehicle::new(0, 0.0, 0.0, vehicle_type))
//!     .build()?;
//!
//! let config = SolverConfig::default()
//!     .with_threads(2)
//!     .with_max_iterations(500)
//!     .with_seed(42);
//! let solver = Solver::new(problem, config)?;
//! let solutions = solver.solve();
//! assert!(!solutions.is_empty());
//! # Ok::<(), vrp_lns::ConfigurationError>(())
//! ```

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod search;
pub mod solver;

pub use error::ConfigurationError;
