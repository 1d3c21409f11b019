//! Weighted operator selection.

use rand::Rng;

/// A cumulative-weight roulette over a closed set of operator variants.
///
/// Keeps the search loop allocation-free: variants are `Copy` enum tags,
/// picked by one random draw per iteration.
///
/// # Examples
///
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use vrp_lns::search::WeightedSelector;
///
/// let selector = WeightedSelector::new(vec![("a", 3.0), ("b", 1.0)]).unwrap();
/// let mut rng = SmallRng::seed_from_u64(7);
/// let picked = selector.pick(&mut rng);
/// assert!(picked == "a" || picked == "b");
/// ```
#[derive(Debug, Clone)]
pub struct WeightedSelector<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T: Copy> WeightedSelector<T> {
    /// Creates a selector from `(variant, weight)` pairs.
    ///
    /// Returns `None` if the table is empty or any weight is non-positive
    /// or non-finite.
    pub fn new(entries: Vec<(T, f64)>) -> Option<Self> {
        if entries.is_empty() || entries.iter().any(|&(_, w)| !w.is_finite() || w <= 0.0) {
            return None;
        }
        let total = entries.iter().map(|&(_, w)| w).sum();
        Some(Self { entries, total })
    }

    /// Picks a variant with probability proportional to its weight.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> T {
        let draw = rng.random_range(0.0..self.total);
        let mut acc = 0.0;
        for &(variant, weight) in &self.entries {
            acc += weight;
            if draw < acc {
                return variant;
            }
        }
        // Floating-point rounding can leave `draw` at the upper edge.
        self.entries[self.entries.len() - 1].0
    }
}
