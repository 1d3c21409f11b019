//! Observer hooks into a running search.

use log::info;

use crate::models::{Problem, Solution};

/// Receives notifications from a running search.
///
/// All methods default to no-ops, so implementors override only what they
/// need. Callbacks run synchronously on solver threads and must be cheap;
/// a panicking listener is isolated and never aborts the search.
pub trait SearchListener: Send + Sync {
    /// Called once before any worker starts.
    fn on_search_started(&self, _problem: &Problem) {}

    /// Called periodically with the global iteration count and the best
    /// cost found so far.
    fn on_iteration_complete(&self, _iteration: u64, _best_cost: f64) {}

    /// Called once after all workers have stopped, with the best solution
    /// if one was found.
    fn on_search_ended(&self, _best: Option<&Solution>) {}

    /// Called when a worker's iteration panicked and the worker restarted
    /// from a fresh construction.
    fn on_worker_failure(&self, _worker: usize, _message: &str) {}
}

/// A listener that reports search progress through the [`log`] facade.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vrp_lns::solver::{ProgressLogger, SearchListener};
///
/// let listener: Arc<dyn SearchListener> = Arc::new(ProgressLogger);
/// listener.on_iteration_complete(100, 42.5);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressLogger;

impl SearchListener for ProgressLogger {
    fn on_search_started(&self, problem: &Problem) {
        info!(
            "search started: {} requests, {} vehicles, fleet {:?}",
            problem.num_requests(),
            problem.num_vehicles(),
            problem.fleet_size()
        );
    }

    fn on_iteration_complete(&self, iteration: u64, best_cost: f64) {
        info!("iteration {iteration}: best cost {best_cost:.3}");
    }

    fn on_search_ended(&self, best: Option<&Solution>) {
        match best.and_then(|s| s.cost()) {
            Some(cost) => info!("search ended: best cost {cost:.3}"),
            None => info!("search ended without a solution"),
        }
    }

    fn on_worker_failure(&self, worker: usize, message: &str) {
        info!("worker {worker} restarted: {message}");
    }
}
