//! The concurrent ruin-and-recreate search engine.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::ConfigurationError;
use crate::evaluation::{CostEvaluator, MatrixEvaluator};
use crate::models::{Problem, Solution};
use crate::search::{
    Recreate, RecreateKind, Ruin, RuinKind, ThresholdAcceptance, WeightedSelector,
};

use super::{SearchListener, SolutionPool, SolverConfig};

/// Seed used when the configuration does not pin one.
const DEFAULT_SEED: u64 = 0;

/// Decay horizon for workers bounded only by a time limit.
const NOMINAL_LOCAL_BUDGET: u64 = 10_000;

/// Runs the concurrent ruin-and-recreate search over a [`Problem`].
///
/// Each worker thread owns an independent trajectory: its own RNG (seeded
/// `base_seed + worker_index`), its own current solution, and its own
/// acceptance schedule. Workers communicate only through the shared
/// [`SolutionPool`] and the global iteration counter, so adding threads
/// changes which solutions are found but never the correctness of any.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vrp_lns::models::{Problem, Request, Vehicle, VehicleType};
/// use vrp_lns::solver::{Solver, SolverConfig};
///
/// let vt = Arc::new(VehicleType::new(0, 100));
/// let problem = Problem::builder()
///     .add_request(Request::new(0, 1.0, 0.0, 10, 0.0))
///     .add_request(Request::new(1, 0.0, 1.0, 10, 0.0))
///     .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
///     .build()
///     .unwrap();
/// let config = SolverConfig::default()
///     .with_threads(1)
///     .with_max_iterations(50)
///     .with_seed(1);
/// let solver = Solver::new(problem, config).unwrap();
/// let solutions = solver.solve();
/// assert!(!solutions.is_empty());
/// ```
pub struct Solver {
    problem: Arc<Problem>,
    evaluator: Arc<dyn CostEvaluator>,
    config: SolverConfig,
    listeners: Vec<Arc<dyn SearchListener>>,
}

impl Solver {
    /// Creates a solver for the given problem.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the configuration fails
    /// [`SolverConfig::validate`].
    pub fn new(problem: Problem, config: SolverConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            problem: Arc::new(problem),
            evaluator: Arc::new(MatrixEvaluator),
            config,
            listeners: Vec::new(),
        })
    }

    /// Replaces the default [`MatrixEvaluator`] with a custom cost model.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn CostEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Registers a listener notified of search progress.
    pub fn add_listener(&mut self, listener: Arc<dyn SearchListener>) {
        self.listeners.push(listener);
    }

    /// The problem being solved.
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Runs the search to its budget and returns the pool's best solutions
    /// in ascending cost order.
    ///
    /// Blocks until every worker has stopped; no worker touches the pool
    /// after this returns. Solutions carry their evaluated cost.
    pub fn solve(&self) -> Vec<Solution> {
        let pool = SolutionPool::new(self.config.pool_capacity);
        let iterations = AtomicU64::new(0);
        let stop = AtomicBool::new(false);
        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);
        let base_seed = self.config.seed.unwrap_or(DEFAULT_SEED);

        self.notify(|l| l.on_search_started(&self.problem));
        info!(
            "search starting: {} workers, {} iterations budget",
            self.config.threads, self.config.max_iterations
        );

        thread::scope(|scope| {
            for worker in 0..self.config.threads {
                let pool = &pool;
                let iterations = &iterations;
                let stop = &stop;
                let seed = base_seed.wrapping_add(worker as u64);
                scope.spawn(move || {
                    self.run_worker(worker, seed, pool, iterations, stop, deadline);
                });
            }
        });

        let best = pool.best();
        info!(
            "search finished: {} iterations, best cost {:?}",
            iterations.load(Ordering::Relaxed),
            pool.best_cost()
        );
        self.notify(|l| l.on_search_ended(best.as_ref()));
        pool.best_n(self.config.pool_capacity)
    }

    fn run_worker(
        &self,
        worker: usize,
        seed: u64,
        pool: &SolutionPool,
        iterations: &AtomicU64,
        stop: &AtomicBool,
        deadline: Option<Instant>,
    ) {
        let problem = &*self.problem;
        let evaluator = &*self.evaluator;
        let ruin = Ruin::new(problem);
        let recreate = Recreate::new(problem, evaluator);
        // tables are checked by SolverConfig::validate before workers spawn
        let ruin_selector = WeightedSelector::new(self.config.ruin_weights.clone())
            .expect("ruin weights validated at construction");
        let recreate_selector = WeightedSelector::new(self.config.recreate_weights.clone())
            .expect("recreate weights validated at construction");

        let mut rng = SmallRng::seed_from_u64(seed);
        let Some(mut current) =
            self.initial_guarded(worker, &recreate, iterations, stop, deadline)
        else {
            return;
        };
        let mut current_cost = current.cost().unwrap_or(f64::INFINITY);
        pool.offer(&current);

        let local_budget = if self.config.max_iterations > 0 {
            (self.config.max_iterations / self.config.threads as u64).max(1)
        } else {
            NOMINAL_LOCAL_BUDGET
        };
        let acceptance = ThresholdAcceptance::new(
            self.config.initial_threshold_ratio * current_cost.max(0.0),
            self.config.decay_schedule,
            local_budget,
        );
        debug!(
            "worker {worker}: seed {seed}, initial cost {current_cost:.3}, \
             threshold {:.3}",
            acceptance.threshold(0)
        );

        let mut local_iter: u64 = 0;
        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            if self.config.max_iterations > 0
                && iterations.load(Ordering::Relaxed) >= self.config.max_iterations
            {
                stop.store(true, Ordering::Relaxed);
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stop.store(true, Ordering::Relaxed);
                break;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| {
                self.one_cycle(
                    &ruin,
                    &recreate,
                    &ruin_selector,
                    &recreate_selector,
                    &current,
                    &mut rng,
                )
            }));

            match outcome {
                Ok((candidate, cost)) => {
                    let delta = cost - current_cost;
                    if acceptance.accepts(local_iter, delta) {
                        current = candidate;
                        current_cost = cost;
                        pool.offer(&current);
                    }
                }
                Err(_) => {
                    warn!("worker {worker}: iteration panicked, restarting from scratch");
                    self.notify(|l| {
                        l.on_worker_failure(worker, "iteration panicked; worker restarted")
                    });
                    match self.initial_guarded(worker, &recreate, iterations, stop, deadline) {
                        Some(solution) => {
                            current_cost = solution.cost().unwrap_or(f64::INFINITY);
                            current = solution;
                            pool.offer(&current);
                        }
                        None => break,
                    }
                }
            }

            local_iter += 1;
            let done = iterations.fetch_add(1, Ordering::Relaxed) + 1;
            if done % self.config.notify_interval.max(1) == 0 {
                if let Some(best_cost) = pool.best_cost() {
                    self.notify(|l| l.on_iteration_complete(done, best_cost));
                }
            }
        }
    }

    /// One ruin-and-recreate step on a copy of the worker's current
    /// solution. Returns the candidate with its evaluated cost.
    fn one_cycle(
        &self,
        ruin: &Ruin<'_>,
        recreate: &Recreate<'_>,
        ruin_selector: &WeightedSelector<RuinKind>,
        recreate_selector: &WeightedSelector<RecreateKind>,
        current: &Solution,
        rng: &mut SmallRng,
    ) -> (Solution, f64) {
        let mut candidate = current.clone();

        let assigned = candidate.assigned_count();
        if assigned > 0 {
            let (min, max) = self.config.ruin_fraction;
            let fraction = rng.random_range(min..=max);
            let count = ((assigned as f64 * fraction).round() as usize).max(1);
            let kind = ruin_selector.pick(rng);
            ruin.apply(kind, &mut candidate, count, rng);
        }

        let kind = recreate_selector.pick(rng);
        recreate.apply(kind, &mut candidate);

        let cost = self
            .evaluator
            .solution_cost(&self.problem, &candidate, self.config.unassigned_penalty);
        candidate.set_cost(cost);
        (candidate, cost)
    }

    /// Builds a starting solution under panic isolation, retrying while the
    /// budget allows. Failed attempts draw down the shared iteration budget
    /// so a persistently faulty cost model cannot spin forever. Returns
    /// `None` when the budget ran out first.
    fn initial_guarded(
        &self,
        worker: usize,
        recreate: &Recreate<'_>,
        iterations: &AtomicU64,
        stop: &AtomicBool,
        deadline: Option<Instant>,
    ) -> Option<Solution> {
        loop {
            if stop.load(Ordering::Relaxed) {
                return None;
            }
            if self.config.max_iterations > 0
                && iterations.load(Ordering::Relaxed) >= self.config.max_iterations
            {
                return None;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            match catch_unwind(AssertUnwindSafe(|| self.construct_initial(recreate))) {
                Ok(solution) => return Some(solution),
                Err(_) => {
                    iterations.fetch_add(1, Ordering::Relaxed);
                    warn!("worker {worker}: construction panicked, retrying");
                    self.notify(|l| {
                        l.on_worker_failure(worker, "construction panicked; retrying")
                    });
                }
            }
        }
    }

    /// Builds a worker's starting point: greedy insertion from an all
    /// unassigned state.
    fn construct_initial(&self, recreate: &Recreate<'_>) -> Solution {
        let mut solution = Solution::with_unassigned((0..self.problem.num_requests()).collect());
        recreate.apply(RecreateKind::Greedy, &mut solution);
        let cost = self
            .evaluator
            .solution_cost(&self.problem, &solution, self.config.unassigned_penalty);
        solution.set_cost(cost);
        solution
    }

    /// Invokes a callback on every listener, isolating panics.
    fn notify(&self, f: impl Fn(&dyn SearchListener)) {
        for listener in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| f(listener.as_ref()))).is_err() {
                warn!("listener panicked; continuing");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::evaluation::RouteEvaluation;
    use crate::models::{FleetSize, Request, TimeWindow, Vehicle, VehicleType};
    use crate::search::DecaySchedule;

    use super::*;

    fn unit_square_problem() -> Problem {
        let vt = Arc::new(VehicleType::new(0, 10));
        Problem::builder()
            .add_request(Request::new(0, 0.0, 1.0, 1, 0.0))
            .add_request(Request::new(1, 1.0, 1.0, 1, 0.0))
            .add_request(Request::new(2, 1.0, 0.0, 1, 0.0))
            .add_request(Request::new(3, 0.5, 0.5, 1, 0.0))
            .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
            .build()
            .expect("valid problem")
    }

    fn cluster_problem(vehicles: usize) -> Problem {
        let vt = Arc::new(VehicleType::new(0, 40));
        let mut builder = Problem::builder();
        for i in 0..10 {
            let x = if i < 5 { 1.0 } else { 20.0 } + i as f64 * 0.1;
            builder = builder.add_request(Request::new(i, x, 0.0, 10, 0.0));
        }
        for v in 0..vehicles {
            builder = builder.add_vehicle(Vehicle::new(v, 0.0, 0.0, vt.clone()));
        }
        builder
            .fleet_size(FleetSize::Finite)
            .build()
            .expect("valid problem")
    }

    fn small_config() -> SolverConfig {
        SolverConfig::default()
            .with_threads(1)
            .with_max_iterations(300)
            .with_seed(7)
    }

    #[test]
    fn test_unit_square_reaches_optimum() {
        // unit-square corners with the depot on one of them: the optimal
        // tour walks the perimeter, cost 4.0
        let vt = Arc::new(VehicleType::new(0, 10));
        let problem = Problem::builder()
            .add_request(Request::new(0, 0.0, 0.0, 1, 0.0))
            .add_request(Request::new(1, 1.0, 0.0, 1, 0.0))
            .add_request(Request::new(2, 0.0, 1.0, 1, 0.0))
            .add_request(Request::new(3, 1.0, 1.0, 1, 0.0))
            .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
            .build()
            .expect("valid problem");

        let solver = Solver::new(problem, small_config()).expect("valid config");
        let solutions = solver.solve();
        assert!(!solutions.is_empty());
        let best = &solutions[0];
        assert!(best.unassigned().is_empty());
        let cost = best.cost().expect("evaluated");
        assert!((cost - 4.0).abs() < 1e-9, "cost = {cost}");
    }

    #[test]
    fn test_all_requests_served_when_capacity_allows() {
        let solver = Solver::new(unit_square_problem(), small_config()).expect("valid config");
        let solutions = solver.solve();
        let best = &solutions[0];
        assert!(best.unassigned().is_empty());
        assert_eq!(best.assigned_count(), 4);
    }

    #[test]
    fn test_deterministic_per_seed_single_thread() {
        let run = || {
            let solver =
                Solver::new(unit_square_problem(), small_config()).expect("valid config");
            solver.solve()
        };
        let a = run();
        let b = run();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.cost(), y.cost());
            assert!(x.same_assignment(y));
        }
    }

    #[test]
    fn test_finite_fleet_bound_holds_in_results() {
        let solver = Solver::new(cluster_problem(2), small_config()).expect("valid config");
        for solution in solver.solve() {
            assert!(solution.num_routes() <= 2);
            let mut vehicles: Vec<usize> =
                solution.routes().iter().map(|r| r.vehicle()).collect();
            vehicles.sort_unstable();
            vehicles.dedup();
            assert_eq!(vehicles.len(), solution.num_routes());
        }
    }

    #[test]
    fn test_results_sorted_ascending() {
        let config = small_config().with_pool_capacity(5);
        let solver = Solver::new(cluster_problem(3), config).expect("valid config");
        let solutions = solver.solve();
        let costs: Vec<f64> = solutions.iter().filter_map(|s| s.cost()).collect();
        assert_eq!(costs.len(), solutions.len());
        for pair in costs.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_multiple_threads_produce_results() {
        let config = SolverConfig::default()
            .with_threads(4)
            .with_max_iterations(1_000)
            .with_seed(3);
        let solver = Solver::new(cluster_problem(3), config).expect("valid config");
        let solutions = solver.solve();
        assert!(!solutions.is_empty());
        assert!(solutions[0].unassigned().is_empty());
    }

    #[test]
    fn test_time_limit_stops_search() {
        let config = SolverConfig::default()
            .with_threads(2)
            .with_max_iterations(0)
            .with_time_limit(Duration::from_millis(50))
            .with_seed(1);
        let solver = Solver::new(cluster_problem(3), config).expect("valid config");
        let start = Instant::now();
        let solutions = solver.solve();
        assert!(!solutions.is_empty());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SolverConfig::default().with_threads(0);
        assert!(Solver::new(unit_square_problem(), config).is_err());
    }

    #[derive(Default)]
    struct Recording {
        started: AtomicUsize,
        ended: AtomicUsize,
        failures: AtomicUsize,
        progress: Mutex<Vec<(u64, f64)>>,
    }

    impl SearchListener for Recording {
        fn on_search_started(&self, _problem: &Problem) {
            self.started.fetch_add(1, Ordering::Relaxed);
        }
        fn on_iteration_complete(&self, iteration: u64, best_cost: f64) {
            self.progress.lock().push((iteration, best_cost));
        }
        fn on_search_ended(&self, _best: Option<&Solution>) {
            self.ended.fetch_add(1, Ordering::Relaxed);
        }
        fn on_worker_failure(&self, _worker: usize, _message: &str) {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_listeners_observe_lifecycle() {
        let recording = Arc::new(Recording::default());
        let config = small_config().with_notify_interval(50);
        let mut solver = Solver::new(unit_square_problem(), config).expect("valid config");
        solver.add_listener(recording.clone());
        solver.solve();

        assert_eq!(recording.started.load(Ordering::Relaxed), 1);
        assert_eq!(recording.ended.load(Ordering::Relaxed), 1);
        let progress = recording.progress.lock();
        assert!(!progress.is_empty());
        // best cost never worsens over time
        for pair in progress.windows(2) {
            assert!(pair[1].1 <= pair[0].1);
        }
    }

    struct Panicking;

    impl SearchListener for Panicking {
        fn on_search_started(&self, _problem: &Problem) {
            panic!("listener bug");
        }
    }

    #[test]
    fn test_panicking_listener_does_not_abort_search() {
        let recording = Arc::new(Recording::default());
        let mut solver =
            Solver::new(unit_square_problem(), small_config()).expect("valid config");
        solver.add_listener(Arc::new(Panicking));
        solver.add_listener(recording.clone());
        let solutions = solver.solve();
        assert!(!solutions.is_empty());
        assert_eq!(recording.started.load(Ordering::Relaxed), 1);
    }

    /// Panics on its first route evaluation, then defers to the real cost
    /// model.
    struct FlakyEvaluator {
        remaining_failures: AtomicUsize,
    }

    impl CostEvaluator for FlakyEvaluator {
        fn evaluate_route(
            &self,
            problem: &Problem,
            vehicle: usize,
            requests: &[usize],
        ) -> RouteEvaluation {
            if self
                .remaining_failures
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                .is_ok()
            {
                panic!("transient evaluator fault");
            }
            MatrixEvaluator.evaluate_route(problem, vehicle, requests)
        }
    }

    #[test]
    fn test_worker_panic_restarts_worker() {
        let recording = Arc::new(Recording::default());
        let mut solver = Solver::new(unit_square_problem(), small_config())
            .expect("valid config")
            .with_evaluator(Arc::new(FlakyEvaluator {
                remaining_failures: AtomicUsize::new(1),
            }));
        solver.add_listener(recording.clone());
        let solutions = solver.solve();

        assert!(!solutions.is_empty());
        assert!(recording.failures.load(Ordering::Relaxed) >= 1);
        assert!(solutions[0].unassigned().is_empty());
    }

    #[test]
    fn test_time_windows_respected_in_best_solution() {
        let vt = Arc::new(VehicleType::new(0, 10));
        let tw = TimeWindow::new(0.0, 100.0).expect("valid window");
        let problem = Problem::builder()
            .add_request(Request::new(0, 1.0, 0.0, 1, 0.0).with_time_window(tw))
            .add_request(Request::new(1, 2.0, 0.0, 1, 0.0).with_time_window(tw))
            .add_vehicle(Vehicle::new(0, 0.0, 0.0, vt))
            .build()
            .expect("valid problem");

        let solver = Solver::new(problem, small_config()).expect("valid config");
        let solutions = solver.solve();
        assert!(solutions[0].unassigned().is_empty());
    }

    #[test]
    fn test_linear_schedule_also_converges() {
        let config = small_config().with_decay_schedule(DecaySchedule::Linear);
        let solver = Solver::new(unit_square_problem(), config).expect("valid config");
        let solutions = solver.solve();
        assert!(solutions[0].unassigned().is_empty());
    }
}
