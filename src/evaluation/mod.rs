//! Route cost and feasibility evaluation.
//!
//! The search operators call a pluggable [`CostEvaluator`]; the default
//! [`MatrixEvaluator`] scores routes from the problem's distance matrix.

mod evaluator;

pub use evaluator::{CostEvaluator, MatrixEvaluator, RouteEvaluation};
