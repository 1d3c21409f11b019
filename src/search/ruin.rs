//! Ruin operators: move a subset of assigned requests back into the
//! unassigned set.
//!
//! # Operators
//!
//! - [`RuinKind::Random`] — removes uniformly sampled requests
//! - [`RuinKind::Proximity`] — removes a random anchor and its nearest
//!   neighbors, restructuring one region of the plan
//! - [`RuinKind::Worst`] — removes the requests whose marginal cost
//!   contribution to their route is highest
//!
//! Removal never worsens a route's feasibility, so a ruined solution is at
//! least as feasible as its parent. Ties (equal distance or marginal cost)
//! break toward the lowest request id, keeping a seeded worker replayable.
//!
//! # Reference
//!
//! Shaw, P. (1998). "Using Constraint Programming and Local Search Methods
//! to Solve Vehicle Routing Problems", *CP-98*, LNCS 1520, 417-431.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{Problem, Solution};

/// The closed set of ruin strategies, dispatched through one selection
/// table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuinKind {
    /// Remove uniformly random requests.
    Random,
    /// Remove a random anchor and its geometrically nearest neighbors.
    Proximity,
    /// Remove the requests with the highest marginal route cost.
    Worst,
}

/// Applies ruin strategies to a solution.
///
/// # Examples
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use std::sync::Arc;
/// use vrp_lns::models::{Problem, Request, Route, Solution, Vehicle, VehicleType};
/// use vrp_lns::search::{Ruin, RuinKind};
///
/// let vt = Arc::new(VehicleType::new(0, 80));
/// let problem = Problem::builder()
///     .add_request(Request::new(0, 1.0, 0.0, 10, 0.0))
///     .add_request(Request::new(1, 2.0, 0.0, 10, 0.0))
///     .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
///     .build()
///     .unwrap();
///
/// let mut sol = Solution::with_unassigned(vec![0, 1]);
/// sol.push_route(Route::new(0));
/// let r = sol.take_unassigned(0);
/// sol.insert_request(0, 0, r);
/// let r = sol.take_unassigned(0);
/// sol.insert_request(0, 1, r);
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// Ruin::new(&problem).apply(RuinKind::Random, &mut sol, 1, &mut rng);
/// assert_eq!(sol.unassigned().len(), 1);
/// assert_eq!(sol.assigned_count(), 1);
/// ```
pub struct Ruin<'a> {
    problem: &'a Problem,
}

impl<'a> Ruin<'a> {
    /// Creates a ruin dispatcher over the given problem.
    pub fn new(problem: &'a Problem) -> Self {
        Self { problem }
    }

    /// Moves up to `count` assigned requests into the unassigned set.
    ///
    /// A no-op when `count` is zero or nothing is assigned. Empty routes
    /// left behind are dropped, freeing their vehicles.
    pub fn apply<R: Rng>(
        &self,
        kind: RuinKind,
        solution: &mut Solution,
        count: usize,
        rng: &mut R,
    ) {
        if count == 0 || solution.assigned_count() == 0 {
            return;
        }
        match kind {
            RuinKind::Random => self.ruin_random(solution, count, rng),
            RuinKind::Proximity => self.ruin_proximity(solution, count, rng),
            RuinKind::Worst => self.ruin_worst(solution, count),
        }
        solution.remove_empty_routes();
    }

    fn ruin_random<R: Rng>(&self, solution: &mut Solution, count: usize, rng: &mut R) {
        let mut assigned = assigned_requests(solution);
        for _ in 0..count {
            if assigned.is_empty() {
                break;
            }
            let idx = rng.random_range(0..assigned.len());
            let victim = assigned.swap_remove(idx);
            solution.unassign(victim);
        }
    }

    fn ruin_proximity<R: Rng>(&self, solution: &mut Solution, count: usize, rng: &mut R) {
        let mut assigned = assigned_requests(solution);
        let anchor = assigned.swap_remove(rng.random_range(0..assigned.len()));
        solution.unassign(anchor);

        let anchor_loc = self.problem.request_location(anchor);
        assigned.sort_by(|&a, &b| {
            let da = self.problem.distance(anchor_loc, self.problem.request_location(a));
            let db = self.problem.distance(anchor_loc, self.problem.request_location(b));
            da.total_cmp(&db).then(a.cmp(&b))
        });

        for &victim in assigned.iter().take(count.saturating_sub(1)) {
            solution.unassign(victim);
        }
    }

    fn ruin_worst(&self, solution: &mut Solution, count: usize) {
        for _ in 0..count {
            let mut best: Option<(f64, usize, usize, usize)> = None; // (saving, rid, route, pos)
            for (ri, route) in solution.routes().iter().enumerate() {
                let vehicle = &self.problem.vehicles()[route.vehicle()];
                for pos in 0..route.len() {
                    let saving = self.removal_saving(route.requests(), route.vehicle(), pos)
                        * vehicle.cost_per_distance();
                    let rid = route.requests()[pos];
                    let better = match best {
                        None => true,
                        Some((s, r, _, _)) => saving > s || (saving == s && rid < r),
                    };
                    if better {
                        best = Some((saving, rid, ri, pos));
                    }
                }
            }
            match best {
                Some((_, _, route, pos)) => {
                    solution.unassign_at(route, pos);
                }
                None => break,
            }
        }
    }

    /// Distance saved by removing the request at `pos` from the sequence.
    fn removal_saving(&self, requests: &[usize], vehicle: usize, pos: usize) -> f64 {
        let depot = self.problem.depot_location(vehicle);
        let loc = self.problem.request_location(requests[pos]);
        let prev = if pos == 0 {
            depot
        } else {
            self.problem.request_location(requests[pos - 1])
        };
        let next = if pos == requests.len() - 1 {
            depot
        } else {
            self.problem.request_location(requests[pos + 1])
        };
        self.problem.distance(prev, loc) + self.problem.distance(loc, next)
            - self.problem.distance(prev, next)
    }
}

/// All assigned request ids, in route iteration order.
fn assigned_requests(solution: &Solution) -> Vec<usize> {
    solution
        .routes()
        .iter()
        .flat_map(|r| r.requests().iter().copied())
        .collect()
}
