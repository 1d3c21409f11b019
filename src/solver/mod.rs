//! The search engine: configuration, worker coordination, the shared
//! solution pool, and progress listeners.
//!
//! - [`config`] — search-control knobs ([`SolverConfig`])
//! - [`coordinator`] — the concurrent engine ([`Solver`])
//! - [`pool`] — bounded best-solution collection ([`SolutionPool`])
//! - [`listener`] — progress observation ([`SearchListener`])

pub mod config;
pub mod coordinator;
pub mod listener;
pub mod pool;

pub use config::{default_threads, SolverConfig};
pub use coordinator::Solver;
pub use listener::{ProgressLogger, SearchListener};
pub use pool::SolutionPool;
