//! Recreate operators: reinsert unassigned requests at their cheapest
//! feasible positions.
//!
//! # Operators
//!
//! - [`RecreateKind::Greedy`] — repeatedly inserts the request with the
//!   cheapest feasible (vehicle, position) across the whole solution
//! - [`RecreateKind::Regret`] — inserts first the request that would become
//!   most expensive if delayed (largest gap between its best and k-th best
//!   insertion)
//!
//! Insertion cost is the marginal distance cost of splicing the request
//! between its neighbors, plus the vehicle's fixed cost when a new route is
//! opened. Feasibility (capacity, time windows, operating window) is
//! checked through the [`CostEvaluator`] boundary. Requests with no
//! feasible insertion stay unassigned and are penalized by the solution
//! cost, never treated as an error.
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use serde::{Deserialize, Serialize};

use crate::evaluation::CostEvaluator;
use crate::models::{FleetSize, Problem, Route, Solution};

/// The closed set of recreate strategies, dispatched through one selection
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecreateKind {
    /// Cheapest-insertion-first.
    Greedy,
    /// Largest-regret-first.
    Regret {
        /// How many best alternatives enter the regret value (>= 2).
        k: usize,
    },
}

/// Where a request would be inserted.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InsertionTarget {
    /// Position within an existing route (route index in the solution).
    Existing(usize),
    /// A fresh route for the given vehicle.
    NewRoute(usize),
}

#[derive(Debug, Clone, Copy)]
struct Insertion {
    target: InsertionTarget,
    pos: usize,
    cost: f64,
}

/// Applies recreate strategies to a solution.
///
/// Also serves as the initial construction heuristic: greedy insertion
/// applied to a solution with every request unassigned.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vrp_lns::evaluation::MatrixEvaluator;
/// use vrp_lns::models::{Problem, Request, Solution, Vehicle, VehicleType};
/// use vrp_lns::search::{Recreate, RecreateKind};
///
/// let vt = Arc::new(VehicleType::new(0, 80));
/// let problem = Problem::builder()
///     .add_request(Request::new(0, 1.0, 0.0, 10, 0.0))
///     .add_request(Request::new(1, 2.0, 0.0, 10, 0.0))
///     .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
///     .build()
///     .unwrap();
///
/// let evaluator = MatrixEvaluator;
/// let mut sol = Solution::with_unassigned(vec![0, 1]);
/// Recreate::new(&problem, &evaluator).apply(RecreateKind::Greedy, &mut sol);
/// assert!(sol.unassigned().is_empty());
/// assert_eq!(sol.assigned_count(), 2);
/// ```
pub struct Recreate<'a> {
    problem: &'a Problem,
    evaluator: &'a dyn CostEvaluator,
}

impl<'a> Recreate<'a> {
    /// Creates a recreate dispatcher over the given problem and evaluator.
    pub fn new(problem: &'a Problem, evaluator: &'a dyn CostEvaluator) -> Self {
        Self { problem, evaluator }
    }

    /// Reinserts as many unassigned requests as feasibly possible.
    pub fn apply(&self, kind: RecreateKind, solution: &mut Solution) {
        match kind {
            RecreateKind::Greedy => self.recreate_greedy(solution),
            RecreateKind::Regret { k } => self.recreate_regret(solution, k.max(2)),
        }
    }

    fn recreate_greedy(&self, solution: &mut Solution) {
        loop {
            let mut chosen: Option<(usize, Insertion)> = None;
            for &rid in solution.unassigned() {
                if let Some(ins) = self.best_insertion(solution, rid) {
                    let better = match &chosen {
                        None => true,
                        Some((crid, cins)) => {
                            ins.cost < cins.cost || (ins.cost == cins.cost && rid < *crid)
                        }
                    };
                    if better {
                        chosen = Some((rid, ins));
                    }
                }
            }
            match chosen {
                Some((rid, ins)) => self.insert(solution, rid, ins),
                None => break,
            }
        }
    }

    fn recreate_regret(&self, solution: &mut Solution, k: usize) {
        loop {
            // (regret, best cost, request, insertion)
            let mut chosen: Option<(f64, f64, usize, Insertion)> = None;
            for &rid in solution.unassigned() {
                let options = self.insertion_options(solution, rid);
                let Some(&best_option) = options.first() else {
                    continue;
                };
                let best_cost = best_option.cost;
                let regret = if options.len() < k {
                    // fewer alternatives than k: insert before anything else
                    f64::INFINITY
                } else {
                    options[1..k].iter().map(|o| o.cost - best_cost).sum()
                };
                let better = match &chosen {
                    None => true,
                    Some((cr, cbc, crid, _)) => {
                        regret > *cr
                            || (regret == *cr
                                && (best_cost < *cbc || (best_cost == *cbc && rid < *crid)))
                    }
                };
                if better {
                    chosen = Some((regret, best_cost, rid, best_option));
                }
            }
            match chosen {
                Some((_, _, rid, ins)) => self.insert(solution, rid, ins),
                None => break,
            }
        }
    }

    fn insert(&self, solution: &mut Solution, rid: usize, insertion: Insertion) {
        let idx = solution
            .unassigned()
            .iter()
            .position(|&u| u == rid)
            .expect("insertion chosen from the unassigned set");
        let rid = solution.take_unassigned(idx);
        match insertion.target {
            InsertionTarget::Existing(route) => {
                solution.insert_request(route, insertion.pos, rid);
            }
            InsertionTarget::NewRoute(vehicle) => {
                solution.push_route(Route::new(vehicle));
                let route = solution.num_routes() - 1;
                solution.insert_request(route, 0, rid);
            }
        }
    }

    /// The single cheapest feasible insertion across existing routes and
    /// fleet-policy-legal new routes. Ties resolve to the earliest route,
    /// earliest position, lowest new-route vehicle id.
    fn best_insertion(&self, solution: &Solution, rid: usize) -> Option<Insertion> {
        let mut best: Option<Insertion> = None;
        for ins in self.insertion_options_iter(solution, rid) {
            if best.is_none_or(|b| ins.cost < b.cost) {
                best = Some(ins);
            }
        }
        best
    }

    /// Best feasible insertion per target (each existing route, each legal
    /// new-route vehicle), sorted by ascending cost.
    fn insertion_options(&self, solution: &Solution, rid: usize) -> Vec<Insertion> {
        let mut options: Vec<Insertion> = self.insertion_options_iter(solution, rid).collect();
        options.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        options
    }

    fn insertion_options_iter<'s>(
        &'s self,
        solution: &'s Solution,
        rid: usize,
    ) -> impl Iterator<Item = Insertion> + 's {
        let existing = solution
            .routes()
            .iter()
            .enumerate()
            .filter_map(move |(ri, route)| {
                self.best_in_route(route, rid).map(|(pos, cost)| Insertion {
                    target: InsertionTarget::Existing(ri),
                    pos,
                    cost,
                })
            });
        let fresh = self
            .new_route_vehicles(solution)
            .into_iter()
            .filter_map(move |vehicle| {
                self.new_route_cost(vehicle, rid).map(|cost| Insertion {
                    target: InsertionTarget::NewRoute(vehicle),
                    pos: 0,
                    cost,
                })
            });
        existing.chain(fresh)
    }

    /// Cheapest feasible position within one existing route.
    fn best_in_route(&self, route: &Route, rid: usize) -> Option<(usize, f64)> {
        let vehicle = &self.problem.vehicles()[route.vehicle()];
        let demand = self.problem.requests()[rid].demand();
        let load: i32 = route
            .requests()
            .iter()
            .map(|&r| self.problem.requests()[r].demand())
            .sum();
        if load + demand > vehicle.capacity() {
            return None;
        }

        let depot = self.problem.depot_location(route.vehicle());
        let loc = self.problem.request_location(rid);
        let requests = route.requests();
        let mut best: Option<(usize, f64)> = None;

        for pos in 0..=requests.len() {
            let prev = if pos == 0 {
                depot
            } else {
                self.problem.request_location(requests[pos - 1])
            };
            let next = if pos == requests.len() {
                depot
            } else {
                self.problem.request_location(requests[pos])
            };
            let marginal = self.problem.distance(prev, loc) + self.problem.distance(loc, next)
                - self.problem.distance(prev, next);
            let cost = marginal * vehicle.cost_per_distance();

            if best.is_some_and(|(_, c)| cost >= c) {
                continue;
            }
            if self.problem.has_time_windows() && !self.feasible_with(route, rid, pos) {
                continue;
            }
            best = Some((pos, cost));
        }
        best
    }

    /// Full evaluator check of the route with `rid` spliced in at `pos`.
    ///
    /// Only consulted when the problem carries time data; on purely
    /// capacitated problems the load arithmetic above is already exact.
    fn feasible_with(&self, route: &Route, rid: usize, pos: usize) -> bool {
        let mut candidate = route.requests().to_vec();
        candidate.insert(pos, rid);
        self.evaluator
            .evaluate_route(self.problem, route.vehicle(), &candidate)
            .feasible
    }

    /// Vehicles that may open a new route under the fleet-size policy.
    fn new_route_vehicles(&self, solution: &Solution) -> Vec<usize> {
        match self.problem.fleet_size() {
            FleetSize::Finite => (0..self.problem.num_vehicles())
                .filter(|&v| !solution.uses_vehicle(v))
                .collect(),
            FleetSize::Infinite => (0..self.problem.num_vehicles()).collect(),
        }
    }

    /// Cost of opening a new route for `rid` with the given vehicle, if
    /// feasible.
    fn new_route_cost(&self, vehicle: usize, rid: usize) -> Option<f64> {
        let v = &self.problem.vehicles()[vehicle];
        if self.problem.requests()[rid].demand() > v.capacity() {
            return None;
        }
        if self.problem.has_time_windows() {
            let feasible = self
                .evaluator
                .evaluate_route(self.problem, vehicle, &[rid])
                .feasible;
            if !feasible {
                return None;
            }
        }
        let depot = self.problem.depot_location(vehicle);
        let loc = self.problem.request_location(rid);
        let round_trip = self.problem.distance(depot, loc) + self.problem.distance(loc, depot);
        Some(round_trip * v.cost_per_distance() + v.fixed_cost())
    }
}
