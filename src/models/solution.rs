//! Solution and route types.
//!
//! Routes are stored as request-id sequences per vehicle with a separate
//! list of unassigned requests. This allows efficient insertion and removal
//! during ruin and recreate without rebuilding timing state; the cached
//! total cost is invalidated by every mutation and recomputed by the
//! evaluator before any consumer reads it.

use serde::{Deserialize, Serialize};

/// An ordered sequence of requests assigned to a single vehicle.
///
/// A route starts and ends at its vehicle's depot (not stored in the
/// sequence). A route never exists outside a [`Solution`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    vehicle: usize,
    requests: Vec<usize>,
}

impl Route {
    /// Creates an empty route for the given vehicle.
    pub fn new(vehicle: usize) -> Self {
        Self {
            vehicle,
            requests: Vec::new(),
        }
    }

    /// The vehicle serving this route.
    pub fn vehicle(&self) -> usize {
        self.vehicle
    }

    /// The request ids in visit order.
    pub fn requests(&self) -> &[usize] {
        &self.requests
    }

    /// Number of requests on this route.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if this route serves no requests.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Position of a request on this route, if present.
    pub fn position_of(&self, request: usize) -> Option<usize> {
        self.requests.iter().position(|&r| r == request)
    }

    fn insert(&mut self, pos: usize, request: usize) {
        self.requests.insert(pos, request);
    }

    fn remove(&mut self, pos: usize) -> usize {
        self.requests.remove(pos)
    }
}

/// A complete candidate solution: a vehicle→route mapping plus the set of
/// currently unassigned requests and a cached total cost.
///
/// Invariant: every request of the problem appears in exactly one route or
/// exactly once in the unassigned set, never duplicated, never omitted.
/// All mutating methods clear the cost cache; [`Solution::cost`] returns
/// `None` until [`Solution::set_cost`] is called again.
///
/// # Examples
///
/// ```
/// use vrp_lns::models::{Route, Solution};
///
/// let mut sol = Solution::with_unassigned(vec![0, 1, 2]);
/// sol.push_route(Route::new(0));
/// let r = sol.pop_unassigned().unwrap();
/// sol.insert_request(0, 0, r);
/// assert_eq!(sol.assigned_count(), 1);
/// assert_eq!(sol.unassigned().len(), 2);
/// assert!(sol.cost().is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    unassigned: Vec<usize>,
    cost: Option<f64>,
}

impl Solution {
    /// Creates an empty solution with no routes and no unassigned requests.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            unassigned: Vec::new(),
            cost: None,
        }
    }

    /// Creates a solution with all given requests unassigned.
    ///
    /// This is the seed for the initial construction heuristic.
    pub fn with_unassigned(requests: Vec<usize>) -> Self {
        Self {
            routes: Vec::new(),
            unassigned: requests,
            cost: None,
        }
    }

    /// The routes of this solution. Vehicles without a route are unused.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The currently unassigned request ids.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    /// The cached total cost, or `None` if a mutation invalidated it.
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    /// Caches the total cost computed by the evaluator.
    pub fn set_cost(&mut self, cost: f64) {
        self.cost = Some(cost);
    }

    /// Number of requests assigned across all routes.
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Number of routes (vehicles in use).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if any route is served by the given vehicle.
    pub fn uses_vehicle(&self, vehicle: usize) -> bool {
        self.routes.iter().any(|r| r.vehicle == vehicle)
    }

    /// Appends a new route to this solution.
    pub fn push_route(&mut self, route: Route) {
        self.cost = None;
        self.routes.push(route);
    }

    /// Inserts a request into a route at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `route` or `pos` is out of bounds.
    pub fn insert_request(&mut self, route: usize, pos: usize, request: usize) {
        self.cost = None;
        self.routes[route].insert(pos, request);
    }

    /// Removes the request at the given route position and marks it
    /// unassigned.
    ///
    /// # Panics
    ///
    /// Panics if `route` or `pos` is out of bounds.
    pub fn unassign_at(&mut self, route: usize, pos: usize) -> usize {
        self.cost = None;
        let request = self.routes[route].remove(pos);
        self.unassigned.push(request);
        request
    }

    /// Removes a request from whichever route serves it and marks it
    /// unassigned. Returns `false` if no route serves it.
    pub fn unassign(&mut self, request: usize) -> bool {
        for ri in 0..self.routes.len() {
            if let Some(pos) = self.routes[ri].position_of(request) {
                self.unassign_at(ri, pos);
                return true;
            }
        }
        false
    }

    /// Removes and returns the last unassigned request, if any.
    pub fn pop_unassigned(&mut self) -> Option<usize> {
        self.cost = None;
        self.unassigned.pop()
    }

    /// Removes and returns the unassigned request at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn take_unassigned(&mut self, index: usize) -> usize {
        self.cost = None;
        self.unassigned.remove(index)
    }

    /// Drops routes that serve no requests, freeing their vehicles.
    pub fn remove_empty_routes(&mut self) {
        if self.routes.iter().any(|r| r.is_empty()) {
            self.cost = None;
            self.routes.retain(|r| !r.is_empty());
        }
    }

    /// Returns `true` if both solutions assign the same requests to the
    /// same vehicles in the same order. Ignores the cost cache.
    pub fn same_assignment(&self, other: &Solution) -> bool {
        self.routes == other.routes && self.unassigned == other.unassigned
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}
