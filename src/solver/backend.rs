//! Seam between the formulator and the search engine.

use std::time::Duration;

use crate::formulation::Formulation;

use super::SearchParameters;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No improving move or penalty left.
    Converged,
    /// The round limit was reached.
    IterationLimit,
    /// The wall-clock budget ran out.
    TimeLimit,
    /// No complete first solution exists under the constraints.
    NoFirstSolution,
}

/// Counters of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStats {
    /// Improvement rounds completed.
    pub iterations: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
    /// Why the search stopped.
    pub stop_reason: StopReason,
    /// Cost of the first complete solution, if any.
    pub initial_cost: Option<f64>,
    /// Cost of the returned solution, if any.
    pub best_cost: Option<f64>,
}

/// Per-vehicle node sequences as returned by a backend.
///
/// `paths[v]` is `[start, c…, end]` for vehicle `v`; a vehicle that stays
/// home has the path `[start, end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    /// One path per vehicle, in fleet order.
    pub paths: Vec<Vec<usize>>,
    /// Objective value the backend reports.
    pub objective: f64,
}

/// What a backend found.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResponse {
    /// An assignment of customers to vehicles.
    Solved(RawSolution),
    /// No assignment satisfying the constraints was found.
    NoSolution {
        /// Human-readable cause.
        reason: String,
    },
}

/// Response plus run counters.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    /// What was found.
    pub response: BackendResponse,
    /// How the search went.
    pub stats: SearchStats,
}

/// A search engine that solves a formulation.
///
/// Implementations must honour every dimension of the formulation during
/// the search, including end minimums. Returned paths are decoded and
/// audited by [`solve`](super::solve), so a backend that cuts corners is
/// reported as degraded rather than trusted.
pub trait SolverBackend {
    /// Searches for routes under the given directives.
    fn solve(&self, formulation: &Formulation, params: &SearchParameters) -> RawResult;
}
