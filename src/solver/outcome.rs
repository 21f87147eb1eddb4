//! Solving a formulation and auditing what comes back.

use tracing::{info, warn};

use crate::error::DecodeError;
use crate::evaluation::RouteEvaluator;
use crate::formulation::Formulation;
use crate::models::{Solution, Violation};

use super::{decode, BackendResponse, SearchParameters, SearchStats, SolverBackend};

/// Result of a solve, after decoding and auditing.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Every customer served once and every bound held.
    Feasible(Solution),
    /// Best effort that breaks at least one constraint.
    Degraded {
        /// Decoded routes as returned.
        solution: Solution,
        /// What the audit found.
        violations: Vec<Violation>,
    },
    /// The backend found no assignment.
    NoSolution {
        /// Cause reported by the backend.
        reason: String,
    },
}

impl SolveOutcome {
    /// The decoded solution, unless none was found.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Feasible(solution) | Self::Degraded { solution, .. } => Some(solution),
            Self::NoSolution { .. } => None,
        }
    }

    /// Returns `true` for [`SolveOutcome::Feasible`].
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }
}

/// Outcome plus search counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// What was found.
    pub outcome: SolveOutcome,
    /// How the search went.
    pub stats: SearchStats,
}

/// Runs `backend` on the formulation, decodes its paths and audits them.
///
/// No retry or relaxation takes place: an infeasible instance yields
/// [`SolveOutcome::NoSolution`], and routes that break a bound yield
/// [`SolveOutcome::Degraded`] with the violations.
///
/// # Errors
///
/// [`DecodeError`] when the backend returns paths that do not fit the
/// formulation.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::solver::{solve, LocalSearchBackend, SearchParameters};
///
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 1.0, 0.0),
///     Location::customer(2, "C2", 0.0, 1.0),
/// ])
/// .vehicles(vec![0, 0])
/// .build()
/// .unwrap();
///
/// let params = SearchParameters::default()
///     .with_time_limit(Duration::from_secs(5))
///     .with_iteration_limit(10)
///     .with_seed(7);
/// let report = solve(&formulation, &params, &LocalSearchBackend).unwrap();
/// assert!(report.outcome.is_feasible());
/// ```
pub fn solve<B: SolverBackend + ?Sized>(
    formulation: &Formulation,
    params: &SearchParameters,
    backend: &B,
) -> Result<SolveReport, DecodeError> {
    let result = backend.solve(formulation, params);
    let outcome = match result.response {
        BackendResponse::NoSolution { reason } => {
            info!(%reason, "no solution found");
            SolveOutcome::NoSolution { reason }
        }
        BackendResponse::Solved(raw) => {
            let solution = decode(&raw, formulation)?;
            let (total, violations) = RouteEvaluator::new(formulation).evaluate_solution(&solution);
            if violations.is_empty() {
                info!(
                    total_distance = total,
                    active = solution.num_active(),
                    "feasible solution"
                );
                SolveOutcome::Feasible(solution)
            } else {
                warn!(
                    total_distance = total,
                    violations = violations.len(),
                    "solution breaks constraints"
                );
                SolveOutcome::Degraded {
                    solution,
                    violations,
                }
            }
        }
    };
    Ok(SolveReport {
        outcome,
        stats: result.stats,
    })
}
