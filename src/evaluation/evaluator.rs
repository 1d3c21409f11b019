//! Route evaluator computing timing, load, cost, and feasibility.

use crate::models::{Problem, Solution};

/// The result of evaluating one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEvaluation {
    /// Monetary cost of the route (distance, duration, and fixed cost).
    pub cost: f64,
    /// `false` if any constraint (capacity, time window, operating window)
    /// is violated.
    pub feasible: bool,
    /// Total travel distance, depot to depot.
    pub total_distance: f64,
    /// Total elapsed time from departure to return, including waiting and
    /// service.
    pub total_duration: f64,
    /// Total load carried.
    pub total_load: i32,
}

/// Scores a route for a given vehicle.
///
/// Implementations must be pure with respect to their inputs: evaluating
/// the same route twice yields identical results, and concurrent calls
/// from multiple worker threads share no mutable state.
pub trait CostEvaluator: Send + Sync {
    /// Evaluates the route a vehicle would drive through the given request
    /// sequence.
    fn evaluate_route(&self, problem: &Problem, vehicle: usize, requests: &[usize])
        -> RouteEvaluation;

    /// Total cost of a solution: route costs plus a penalty per unassigned
    /// request.
    fn solution_cost(&self, problem: &Problem, solution: &Solution, unassigned_penalty: f64) -> f64 {
        let route_cost: f64 = solution
            .routes()
            .iter()
            .map(|r| self.evaluate_route(problem, r.vehicle(), r.requests()).cost)
            .sum();
        route_cost + solution.unassigned().len() as f64 * unassigned_penalty
    }
}

/// The default evaluator: distance-matrix lookups, forward time-window
/// propagation with waiting, capacity and operating-window checks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vrp_lns::evaluation::{CostEvaluator, MatrixEvaluator};
/// use vrp_lns::models::{Problem, Request, Vehicle, VehicleType};
///
/// let vt = Arc::new(VehicleType::new(0, 80));
/// let problem = Problem::builder()
///     .add_request(Request::new(0, 3.0, 4.0, 10, 0.0))
///     .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
///     .build()
///     .unwrap();
///
/// let eval = MatrixEvaluator.evaluate_route(&problem, 0, &[0]);
/// assert!(eval.feasible);
/// assert!((eval.total_distance - 10.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixEvaluator;

impl CostEvaluator for MatrixEvaluator {
    fn evaluate_route(
        &self,
        problem: &Problem,
        vehicle: usize,
        requests: &[usize],
    ) -> RouteEvaluation {
        let vehicle = &problem.vehicles()[vehicle];
        let depot = problem.depot_location(vehicle.id());
        let start_time = vehicle.operating_window().map_or(0.0, |w| w.ready());

        let mut feasible = true;
        let mut time = start_time;
        let mut load: i32 = 0;
        let mut distance = 0.0;
        let mut prev = depot;

        for &rid in requests {
            let loc = problem.request_location(rid);
            let travel = problem.travel_time(prev, loc);
            distance += problem.distance(prev, loc);
            let arrival = time + travel;

            let request = &problem.requests()[rid];
            let service_start = match request.time_window() {
                Some(tw) => {
                    if tw.is_violated(arrival) {
                        feasible = false;
                    }
                    arrival + tw.waiting_time(arrival)
                }
                None => arrival,
            };

            time = service_start + request.service_duration();
            load += request.demand();
            prev = loc;
        }

        let return_travel = problem.travel_time(prev, depot);
        distance += problem.distance(prev, depot);
        let return_time = time + return_travel;

        if load > vehicle.capacity() {
            feasible = false;
        }
        if let Some(w) = vehicle.operating_window() {
            if return_time > w.due() {
                feasible = false;
            }
        }

        let duration = return_time - start_time;
        let cost = if requests.is_empty() {
            0.0
        } else {
            distance * vehicle.cost_per_distance()
                + duration * vehicle.cost_per_time()
                + vehicle.fixed_cost()
        };

        RouteEvaluation {
            cost,
            feasible,
            total_distance: distance,
            total_duration: duration,
            total_load: load,
        }
    }
}
