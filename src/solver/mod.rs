//! Solver collaborator and the solve pipeline.
//!
//! - [`SearchParameters`] — first-solution strategy, metaheuristic and budget
//! - [`SolverBackend`] — the search engine seam; [`LocalSearchBackend`] is built in
//! - [`decode`] — raw per-vehicle paths to a [`Solution`](crate::models::Solution)
//! - [`solve`] — backend, decode, audit; yields a [`SolveOutcome`]

mod backend;
mod decode;
mod local;
mod outcome;
mod params;

pub use backend::{
    BackendResponse, RawResult, RawSolution, SearchStats, SolverBackend, StopReason,
};
pub use decode::decode;
pub use local::LocalSearchBackend;
pub use outcome::{solve, SolveOutcome, SolveReport};
pub use params::{FirstSolutionStrategy, LocalSearchMetaheuristic, SearchParameters};
