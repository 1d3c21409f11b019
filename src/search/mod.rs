//! Search operators and control policies.
//!
//! - [`ruin`] — removal strategies ([`RuinKind`])
//! - [`recreate`] — insertion strategies ([`RecreateKind`])
//! - [`acceptance`] — threshold-accepting policy ([`ThresholdAcceptance`])
//! - [`selection`] — weighted operator selection ([`WeightedSelector`])

pub mod acceptance;
pub mod recreate;
pub mod ruin;
pub mod selection;

pub use acceptance::{DecaySchedule, ThresholdAcceptance};
pub use recreate::{Recreate, RecreateKind};
pub use ruin::{Ruin, RuinKind};
pub use selection::WeightedSelector;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::evaluation::MatrixEvaluator;
    use crate::models::{FleetSize, Problem, Request, Solution, Vehicle, VehicleType};

    fn grid_problem(n: usize, capacity: i32, vehicles: usize) -> Problem {
        let vt = Arc::new(VehicleType::new(0, capacity));
        let mut builder = Problem::builder();
        for i in 0..n {
            let x = (i % 4) as f64 * 3.0;
            let y = (i / 4) as f64 * 3.0;
            builder = builder.add_request(Request::new(i, x, y, 10, 0.0));
        }
        for v in 0..vehicles {
            builder = builder.add_vehicle(Vehicle::new(v, 0.0, 0.0, vt.clone()));
        }
        builder
            .fleet_size(FleetSize::Finite)
            .build()
            .expect("valid problem")
    }

    fn assert_partition(solution: &Solution, n: usize) {
        let mut seen: Vec<usize> = solution
            .routes()
            .iter()
            .flat_map(|r| r.requests().iter().copied())
            .chain(solution.unassigned().iter().copied())
            .collect();
        seen.sort_unstable();
        let expected: Vec<usize> = (0..n).collect();
        assert_eq!(seen, expected, "requests duplicated or dropped");
    }

    proptest! {
        /// Any sequence of ruin/recreate applications keeps every request
        /// in exactly one route or the unassigned set.
        #[test]
        fn prop_partition_invariant_under_operator_sequences(
            seed in any::<u64>(),
            steps in proptest::collection::vec((0u8..3, 0u8..2, 1usize..6), 1..20),
        ) {
            let n = 12;
            let problem = grid_problem(n, 40, 4);
            let evaluator = MatrixEvaluator;
            let ruin = Ruin::new(&problem);
            let recreate = Recreate::new(&problem, &evaluator);
            let mut rng = SmallRng::seed_from_u64(seed);

            let mut sol = Solution::with_unassigned((0..n).collect());
            recreate.apply(RecreateKind::Greedy, &mut sol);
            assert_partition(&sol, n);

            for (ruin_tag, recreate_tag, count) in steps {
                let ruin_kind = match ruin_tag {
                    0 => RuinKind::Random,
                    1 => RuinKind::Proximity,
                    _ => RuinKind::Worst,
                };
                let recreate_kind = match recreate_tag {
                    0 => RecreateKind::Greedy,
                    _ => RecreateKind::Regret { k: 2 },
                };
                ruin.apply(ruin_kind, &mut sol, count, &mut rng);
                assert_partition(&sol, n);
                recreate.apply(recreate_kind, &mut sol);
                assert_partition(&sol, n);
            }
        }

        /// The finite fleet bound holds through any operator sequence.
        #[test]
        fn prop_finite_fleet_never_exceeded(
            seed in any::<u64>(),
            steps in proptest::collection::vec(1usize..5, 1..12),
        ) {
            let n = 8;
            let problem = grid_problem(n, 40, 2);
            let evaluator = MatrixEvaluator;
            let ruin = Ruin::new(&problem);
            let recreate = Recreate::new(&problem, &evaluator);
            let mut rng = SmallRng::seed_from_u64(seed);

            let mut sol = Solution::with_unassigned((0..n).collect());
            recreate.apply(RecreateKind::Greedy, &mut sol);

            for count in steps {
                ruin.apply(RuinKind::Random, &mut sol, count, &mut rng);
                recreate.apply(RecreateKind::Greedy, &mut sol);

                prop_assert!(sol.num_routes() <= 2);
                let mut vehicles: Vec<usize> =
                    sol.routes().iter().map(|r| r.vehicle()).collect();
                vehicles.sort_unstable();
                vehicles.dedup();
                prop_assert_eq!(vehicles.len(), sol.num_routes(), "vehicle reused");
            }
        }
    }
}
