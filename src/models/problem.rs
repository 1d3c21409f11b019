//! Problem definition and builder.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::ConfigurationError;

use super::{Request, Vehicle};

/// Whether each vehicle is usable at most once or without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetSize {
    /// Each vehicle instance serves at most one route.
    Finite,
    /// Each vehicle entry is a template that may serve any number of routes.
    Infinite,
}

impl Default for FleetSize {
    fn default() -> Self {
        FleetSize::Finite
    }
}

/// An immutable vehicle routing problem instance.
///
/// Built once via [`ProblemBuilder`], then shared read-only by all search
/// workers. Location indices cover requests first (`0..num_requests`) and
/// vehicle depots after (`num_requests..num_requests + num_vehicles`).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vrp_lns::models::{FleetSize, Problem, Request, Vehicle, VehicleType};
///
/// let vt = Arc::new(VehicleType::new(0, 80));
/// let problem = Problem::builder()
///     .add_request(Request::new(0, 1.0, 0.0, 10, 0.0))
///     .add_request(Request::new(1, 2.0, 0.0, 10, 0.0))
///     .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
///     .fleet_size(FleetSize::Finite)
///     .build()
///     .unwrap();
/// assert_eq!(problem.num_requests(), 2);
/// assert!((problem.distance(problem.depot_location(0), 0) - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug)]
pub struct Problem {
    requests: Vec<Request>,
    vehicles: Vec<Vehicle>,
    fleet_size: FleetSize,
    matrix: DistanceMatrix,
    has_time_windows: bool,
}

impl Problem {
    /// Starts building a problem.
    pub fn builder() -> ProblemBuilder {
        ProblemBuilder::new()
    }

    /// All requests, indexed by id.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    /// All vehicles, indexed by id.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Number of requests.
    pub fn num_requests(&self) -> usize {
        self.requests.len()
    }

    /// Number of vehicles (or vehicle templates under `Infinite`).
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// The fleet-size policy.
    pub fn fleet_size(&self) -> FleetSize {
        self.fleet_size
    }

    /// Returns `true` if any request or vehicle carries a time window.
    ///
    /// Lets insertion search skip the full timing sweep on purely
    /// capacitated instances.
    pub fn has_time_windows(&self) -> bool {
        self.has_time_windows
    }

    /// Location index of a request (identical to its id).
    pub fn request_location(&self, request: usize) -> usize {
        request
    }

    /// Location index of a vehicle's depot.
    pub fn depot_location(&self, vehicle: usize) -> usize {
        self.requests.len() + vehicle
    }

    /// Travel distance between two location indices.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// Travel time between two location indices.
    ///
    /// Distances double as travel times (speed = 1).
    pub fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }
}

/// Builder for [`Problem`], with fail-fast validation.
///
/// Requests and vehicles must be added in id order (dense ids from 0), so
/// that ids double as indices everywhere in the engine.
#[derive(Debug, Default)]
pub struct ProblemBuilder {
    requests: Vec<Request>,
    vehicles: Vec<Vehicle>,
    fleet_size: FleetSize,
    matrix: Option<DistanceMatrix>,
}

impl ProblemBuilder {
    /// Creates an empty builder with a finite fleet.
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            vehicles: Vec::new(),
            fleet_size: FleetSize::Finite,
            matrix: None,
        }
    }

    /// Adds a request. Ids must arrive densely, starting at 0.
    pub fn add_request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    /// Adds a vehicle. Ids must arrive densely, starting at 0.
    pub fn add_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    /// Sets the fleet-size policy (default: finite).
    pub fn fleet_size(mut self, fleet_size: FleetSize) -> Self {
        self.fleet_size = fleet_size;
        self
    }

    /// Supplies an explicit distance matrix over the problem's location
    /// index space (requests first, then vehicle depots).
    ///
    /// When omitted, Euclidean distances are computed from coordinates.
    pub fn distance_matrix(mut self, matrix: DistanceMatrix) -> Self {
        self.matrix = Some(matrix);
        self
    }

    /// Validates and builds the problem.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the problem has no requests or
    /// no vehicles, ids are not dense, or some request demand exceeds
    /// every vehicle capacity.
    pub fn build(self) -> Result<Problem, ConfigurationError> {
        if self.vehicles.is_empty() {
            return Err(ConfigurationError::NoVehicles);
        }
        if self.requests.is_empty() {
            return Err(ConfigurationError::NoRequests);
        }
        for (expected, request) in self.requests.iter().enumerate() {
            if request.id() != expected {
                return Err(ConfigurationError::RequestIdMismatch {
                    expected,
                    found: request.id(),
                });
            }
        }
        for (expected, vehicle) in self.vehicles.iter().enumerate() {
            if vehicle.id() != expected {
                return Err(ConfigurationError::VehicleIdMismatch {
                    expected,
                    found: vehicle.id(),
                });
            }
        }

        let max_capacity = self
            .vehicles
            .iter()
            .map(|v| v.capacity())
            .max()
            .unwrap_or(0);
        for request in &self.requests {
            if request.demand() > max_capacity {
                return Err(ConfigurationError::DemandExceedsCapacity {
                    id: request.id(),
                    demand: request.demand(),
                    max_capacity,
                });
            }
        }

        let matrix = match self.matrix {
            Some(matrix) => matrix,
            None => {
                let points: Vec<(f64, f64)> = self
                    .requests
                    .iter()
                    .map(|r| (r.x(), r.y()))
                    .chain(self.vehicles.iter().map(|v| v.depot()))
                    .collect();
                DistanceMatrix::from_points(&points)
            }
        };

        let has_time_windows = self.requests.iter().any(|r| r.time_window().is_some())
            || self.vehicles.iter().any(|v| v.operating_window().is_some());

        Ok(Problem {
            requests: self.requests,
            vehicles: self.vehicles,
            fleet_size: self.fleet_size,
            matrix,
            has_time_windows,
        })
    }
}
