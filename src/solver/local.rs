//! Built-in search engine: construction, descent, guided local search.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::constructive::{construct, repair, Construction};
use crate::formulation::Formulation;
use crate::local_search::{descend, solution_cost, Deadline, GuidedLocalSearch, EPSILON};

use super::backend::{
    BackendResponse, RawResult, RawSolution, SearchStats, SolverBackend, StopReason,
};
use super::{LocalSearchMetaheuristic, SearchParameters};

/// Local search backend.
///
/// 1. Builds a first solution with the configured strategy. Vehicles that
///    may not stay idle are seeded first, the most constrained one first.
///    If customers are left over or a vehicle stays below its minimum, the
///    first solution is repaired by ruin and recreate within the time limit.
/// 2. Descends to a local optimum with relocate, swap, 2-opt and 2-opt*.
/// 3. With [`LocalSearchMetaheuristic::GuidedLocalSearch`], repeatedly
///    penalises the local optimum and descends on the augmented cost,
///    keeping the best solution by true distance.
///
/// The customer scan order and the repair are driven by a [`StdRng`] seeded
/// from [`SearchParameters::seed`]. A time limit too large to represent is
/// treated as no time limit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::solver::{
///     BackendResponse, LocalSearchBackend, SearchParameters, SolverBackend,
/// };
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
///     .with_iteration_limit(20)
///     .with_seed(1);
/// let result = LocalSearchBackend.solve(&formulation, &params);
/// let BackendResponse::Solved(raw) = result.response else { panic!("no solution") };
/// assert_eq!(raw.paths.len(), 2);
/// assert!(raw.paths.iter().all(|p| p.len() == 3));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSearchBackend;

impl SolverBackend for LocalSearchBackend {
    fn solve(&self, formulation: &Formulation, params: &SearchParameters) -> RawResult {
        let start = Instant::now();
        let deadline = Deadline::after(start, params.time_limit);
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let distances = formulation.distances();

        let no_solution = |reason: String| {
            info!(%reason, "no first solution");
            RawResult {
                response: BackendResponse::NoSolution { reason },
                stats: SearchStats {
                    iterations: 0,
                    elapsed: start.elapsed(),
                    stop_reason: StopReason::NoFirstSolution,
                    initial_cost: None,
                    best_cost: None,
                },
            }
        };
        if let Some(reason) = provably_infeasible(formulation) {
            return no_solution(reason);
        }

        let mut construction = construct(formulation, params.first_solution);
        if !construction.is_feasible(formulation) {
            let rounds = repair(formulation, &mut construction, &mut rng, deadline);
            if !construction.is_feasible(formulation) {
                return no_solution(shortfall_reason(formulation, &construction, rounds));
            }
            debug!(rounds, "first solution repaired");
        }
        let mut routes = construction.routes;

        let initial_cost = solution_cost(distances, formulation, &routes);
        let mut order = formulation.customers();
        order.shuffle(&mut rng);
        let moves = descend(&mut routes, formulation, distances, &order, deadline);
        let mut best = routes.clone();
        let mut best_cost = solution_cost(distances, formulation, &best);
        debug!(initial_cost, best_cost, moves, "first local optimum");

        let mut iterations = 1;
        let stop_reason = match params.metaheuristic {
            LocalSearchMetaheuristic::GreedyDescent => {
                if deadline.passed() {
                    StopReason::TimeLimit
                } else {
                    StopReason::Converged
                }
            }
            LocalSearchMetaheuristic::GuidedLocalSearch => {
                let mut gls = GuidedLocalSearch::new(formulation);
                gls.calibrate(best_cost, formulation);
                loop {
                    if params.iteration_limit.is_some_and(|limit| iterations >= limit) {
                        break StopReason::IterationLimit;
                    }
                    if deadline.passed() {
                        break StopReason::TimeLimit;
                    }
                    if gls.penalize(&routes, formulation) == 0 {
                        break StopReason::Converged;
                    }
                    order.shuffle(&mut rng);
                    descend(&mut routes, formulation, &gls.cost(distances), &order, deadline);
                    iterations += 1;

                    let cost = solution_cost(distances, formulation, &routes);
                    if cost < best_cost - EPSILON {
                        debug!(iteration = iterations, cost, "new best solution");
                        best.clone_from(&routes);
                        best_cost = cost;
                    }
                }
            }
        };

        let elapsed = start.elapsed();
        info!(
            iterations,
            initial_cost,
            best_cost,
            ?stop_reason,
            elapsed_ms = elapsed.as_millis() as u64,
            "search finished"
        );

        let paths = formulation
            .vehicles()
            .iter()
            .zip(&best)
            .map(|(vehicle, route)| {
                let depot = vehicle.depot();
                let mut path = Vec::with_capacity(route.len() + 2);
                path.push(depot);
                path.extend_from_slice(route);
                path.push(depot);
                path
            })
            .collect();

        RawResult {
            response: BackendResponse::Solved(RawSolution {
                paths,
                objective: best_cost,
            }),
            stats: SearchStats {
                iterations,
                elapsed,
                stop_reason,
                initial_cost: Some(initial_cost),
                best_cost: Some(best_cost),
            },
        }
    }
}

/// Explains why no assignment can exist, when that follows from the
/// formulation alone.
///
/// Two cases are detected: customers that break some bound of every
/// vehicle even when served alone, and more vehicles with a minimum load
/// than customers to give them.
fn provably_infeasible(formulation: &Formulation) -> Option<String> {
    let constraints = formulation.constraints();
    let distances = formulation.distances();

    let stranded: Vec<&str> = formulation
        .customers()
        .into_iter()
        .filter(|&c| {
            (0..formulation.num_vehicles()).all(|v| !constraints.within_capacities(v, &[c], distances))
        })
        .map(|c| formulation.location(c).name())
        .collect();
    if !stranded.is_empty() {
        return Some(format!(
            "{} customer(s) exceed the bounds of every vehicle even when served alone: {}",
            stranded.len(),
            stranded.join(", ")
        ));
    }

    let needy = (0..formulation.num_vehicles())
        .filter(|&v| !constraints.route_feasible(v, &[], distances))
        .count();
    if needy > formulation.num_customers() {
        return Some(format!(
            "{needy} vehicles must each serve a customer but only {} customer(s) exist",
            formulation.num_customers()
        ));
    }
    None
}

/// Describes what a repaired first solution still lacks.
fn shortfall_reason(formulation: &Formulation, construction: &Construction, rounds: usize) -> String {
    let mut missing = Vec::new();
    if !construction.unassigned.is_empty() {
        let names: Vec<&str> = construction
            .unassigned
            .iter()
            .map(|&c| formulation.location(c).name())
            .collect();
        missing.push(format!(
            "{} customer(s) unplaced ({})",
            names.len(),
            names.join(", ")
        ));
    }
    let constraints = formulation.constraints();
    let short: Vec<String> = construction
        .routes
        .iter()
        .enumerate()
        .filter(|(v, r)| !constraints.route_feasible(*v, r, formulation.distances()))
        .map(|(v, _)| v.to_string())
        .collect();
    if !short.is_empty() {
        missing.push(format!("vehicle(s) {} below their bounds", short.join(", ")));
    }
    format!(
        "no complete assignment found after {rounds} repair round(s): {}",
        missing.join("; ")
    )
}
