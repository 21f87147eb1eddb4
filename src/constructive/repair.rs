//! Repair of incomplete first solutions.
//!
//! # Algorithm
//!
//! Ruin and recreate. Each round removes a few random customers from the
//! current routes, reseeds vehicles whose end minimum is unmet, and then
//! reinserts every unplaced customer with [`constrained_insertion`]. The
//! candidate replaces the current routes unless it has a larger shortfall
//! (unplaced customers plus vehicles below their minimum). Equal shortfalls
//! are accepted so the search can drift across plateaus.
//!
//! Rounds stop once the shortfall is zero, or when the deadline or
//! [`MAX_ROUNDS`] is reached.
//!
//! # Reference
//!
//! Schrimpf, G., Schneider, J., Stamm-Wilbrandt, H. & Dueck, G. (2000).
//! "Record Breaking Optimization Results Using the Ruin and Recreate
//! Principle", *Journal of Computational Physics* 159(2), 139-171.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::formulation::Formulation;
use crate::local_search::Deadline;

use super::{seed_minimum_loads, Construction};

/// Upper bound on ruin and recreate rounds per repair.
pub const MAX_ROUNDS: usize = 1000;

/// Smallest upper bound on the customers removed per round.
const MIN_RUIN: usize = 3;

/// Inserts unplaced customers, the most constrained one first.
///
/// At every step each unplaced customer's feasible (vehicle, position)
/// options are counted. The customer with the fewest options goes to its
/// cheapest one; ties prefer the smaller distance increase. Customers with
/// no option stay unplaced.
pub fn constrained_insertion(
    formulation: &Formulation,
    routes: &mut [Vec<usize>],
    assigned: &mut [bool],
) {
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let customers = formulation.customers();

    loop {
        // (options, delta, customer, vehicle, position)
        let mut pick: Option<(usize, f64, usize, usize, usize)> = None;

        for &c in &customers {
            if assigned[c] {
                continue;
            }
            let mut options = 0;
            let mut cheapest: Option<(f64, usize, usize)> = None;
            for (v, vehicle) in constraints.vehicles().iter().enumerate() {
                let depot = vehicle.depot();
                for pos in 0..=routes[v].len() {
                    routes[v].insert(pos, c);
                    let fits = constraints.within_capacities(v, &routes[v], distances);
                    routes[v].remove(pos);
                    if !fits {
                        continue;
                    }
                    options += 1;
                    let prev = if pos == 0 { depot } else { routes[v][pos - 1] };
                    let next = routes[v].get(pos).copied().unwrap_or(depot);
                    let delta = distances.get(prev, c) + distances.get(c, next)
                        - distances.get(prev, next);
                    if cheapest.is_none_or(|(d, ..)| delta < d) {
                        cheapest = Some((delta, v, pos));
                    }
                }
            }

            let Some((delta, v, pos)) = cheapest else {
                continue;
            };
            let better = pick.is_none_or(|(o, d, ..)| options < o || (options == o && delta < d));
            if better {
                pick = Some((options, delta, c, v, pos));
            }
        }

        match pick {
            Some((.., c, v, pos)) => {
                assigned[c] = true;
                routes[v].insert(pos, c);
            }
            None => break,
        }
    }
}

/// Unplaced customers plus vehicles whose route breaks a bound.
pub fn shortfall(formulation: &Formulation, routes: &[Vec<usize>]) -> usize {
    let assigned = assignment(formulation, routes);
    let unplaced = formulation.customers().into_iter().filter(|&c| !assigned[c]).count();
    let constraints = formulation.constraints();
    let broken = routes
        .iter()
        .enumerate()
        .filter(|(v, r)| !constraints.route_feasible(*v, r, formulation.distances()))
        .count();
    unplaced + broken
}

/// Ruins and recreates `construction` until it is feasible or the budget
/// runs out.
///
/// Returns the number of rounds spent. `construction.unassigned` is
/// refreshed from the final routes.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::constructive::{construct, repair};
/// use collab_routing::local_search::Deadline;
/// use collab_routing::solver::FirstSolutionStrategy;
///
/// // C2 can only be served from Depot A, but A's vehicle grabs C1 first.
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot A", 0.0, 0.0),
///     Location::depot(1, "Depot B", 10.0, 0.0),
///     Location::customer(2, "C1", 5.0, 0.0),
///     Location::customer(3, "C2", -5.5, 0.0),
/// ])
/// .vehicles(vec![0, 1])
/// .max_distance(12.0)
/// .minimum_load(false)
/// .build()
/// .unwrap();
///
/// let mut c = construct(&formulation, FirstSolutionStrategy::PathCheapestArc);
/// assert!(!c.is_complete());
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let deadline = Deadline::after(Instant::now(), Duration::from_secs(5));
/// repair(&formulation, &mut c, &mut rng, deadline);
/// assert_eq!(c.routes, vec![vec![3], vec![2]]);
/// ```
pub fn repair<R: Rng>(
    formulation: &Formulation,
    construction: &mut Construction,
    rng: &mut R,
    deadline: Deadline,
) -> usize {
    let mut current = construction.routes.clone();
    let mut assigned = assignment(formulation, &current);
    constrained_insertion(formulation, &mut current, &mut assigned);
    let mut score = shortfall(formulation, &current);

    let mut rounds = 0;
    while score > 0 && rounds < MAX_ROUNDS && !deadline.passed() {
        rounds += 1;
        let mut candidate = current.clone();
        ruin(&mut candidate, rng);
        let mut assigned = assignment(formulation, &candidate);
        seed_minimum_loads(formulation, &mut candidate, &mut assigned);
        constrained_insertion(formulation, &mut candidate, &mut assigned);

        let s = shortfall(formulation, &candidate);
        if s <= score {
            current = candidate;
            score = s;
        }
    }

    let assigned = assignment(formulation, &current);
    construction.unassigned = formulation
        .customers()
        .into_iter()
        .filter(|&c| !assigned[c])
        .collect();
    construction.routes = current;
    debug!(rounds, shortfall = score, "repair finished");
    rounds
}

/// Removes between one and a quarter of the placed customers, at least
/// [`MIN_RUIN`] when that many are placed.
fn ruin<R: Rng>(routes: &mut [Vec<usize>], rng: &mut R) {
    let mut placed: Vec<usize> = routes.iter().flatten().copied().collect();
    if placed.is_empty() {
        return;
    }
    let most = (placed.len() / 4).max(MIN_RUIN).min(placed.len());
    let k = rng.random_range(1..=most);
    placed.shuffle(rng);
    let removed = &placed[..k];
    for route in routes.iter_mut() {
        route.retain(|c| !removed.contains(c));
    }
}

/// Marks depots and routed customers.
fn assignment(formulation: &Formulation, routes: &[Vec<usize>]) -> Vec<bool> {
    let mut assigned: Vec<bool> = formulation
        .locations()
        .iter()
        .map(|l| l.is_depot())
        .collect();
    for &c in routes.iter().flatten() {
        assigned[c] = true;
    }
    assigned
}
