//! Thread-safe bounded pool of the best solutions found so far.

use log::debug;
use parking_lot::Mutex;

use crate::models::Solution;

struct PoolEntry {
    solution: Solution,
    cost: f64,
    seq: u64,
}

struct PoolInner {
    entries: Vec<PoolEntry>,
    offered: u64,
}

/// A bounded collection of the K best distinct solutions, ordered by
/// ascending cost with insertion order breaking ties.
///
/// All workers share one pool. Offers are linearizable: each offer takes the
/// pool lock, decides admission, and releases. Solutions are cloned on
/// admission so callers keep ownership of their working copies.
///
/// # Examples
///
/// ```
/// use vrp_lns::models::Solution;
/// use vrp_lns::solver::SolutionPool;
///
/// let pool = SolutionPool::new(2);
/// let mut sol = Solution::new();
/// sol.set_cost(7.0);
/// assert!(pool.offer(&sol));
/// assert_eq!(pool.best_cost(), Some(7.0));
/// ```
pub struct SolutionPool {
    capacity: usize,
    inner: Mutex<PoolInner>,
}

impl SolutionPool {
    /// Creates an empty pool holding at most `capacity` solutions.
    /// A zero capacity is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(PoolInner {
                entries: Vec::new(),
                offered: 0,
            }),
        }
    }

    /// Offers a solution to the pool, returning `true` if it was admitted.
    ///
    /// Rejected when the solution carries no evaluated cost, duplicates an
    /// entry (same cost and same assignment), or the pool is full and the
    /// cost does not beat the current worst entry.
    pub fn offer(&self, solution: &Solution) -> bool {
        let Some(cost) = solution.cost() else {
            log::warn!("solution offered without an evaluated cost; rejected");
            return false;
        };

        let mut inner = self.inner.lock();
        inner.offered += 1;
        let seq = inner.offered;

        if inner
            .entries
            .iter()
            .any(|e| e.cost == cost && e.solution.same_assignment(solution))
        {
            return false;
        }
        if inner.entries.len() >= self.capacity
            && inner
                .entries
                .last()
                .is_some_and(|worst| cost >= worst.cost)
        {
            return false;
        }

        // strict `<` keeps equal-cost entries in offer order
        let pos = inner
            .entries
            .iter()
            .position(|e| cost < e.cost)
            .unwrap_or(inner.entries.len());
        inner.entries.insert(
            pos,
            PoolEntry {
                solution: solution.clone(),
                cost,
                seq,
            },
        );
        inner.entries.truncate(self.capacity);

        if pos == 0 {
            debug!("new best solution: cost {cost:.3} (offer {seq})");
        }
        true
    }

    /// The best solution, if any.
    pub fn best(&self) -> Option<Solution> {
        self.inner
            .lock()
            .entries
            .first()
            .map(|e| e.solution.clone())
    }

    /// The best solution's cost, if any.
    pub fn best_cost(&self) -> Option<f64> {
        self.inner.lock().entries.first().map(|e| e.cost)
    }

    /// The `n` best solutions in ascending cost order.
    pub fn best_n(&self, n: usize) -> Vec<Solution> {
        self.inner
            .lock()
            .entries
            .iter()
            .take(n)
            .map(|e| e.solution.clone())
            .collect()
    }

    /// Number of solutions currently held.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns `true` if the pool holds no solutions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of solutions the pool retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
