//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions (i, j) in a route, compute the change from
//! reversing the segment between them:
//!
//! ```text
//! delta = c(prev_i, r[j]) + c(r[i], next_j) - c(prev_i, r[i]) - c(r[j], next_j)
//! ```
//!
//! The formula assumes a symmetric arc cost. The best improving reversal
//! over all routes whose result stays feasible is applied.
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::formulation::Formulation;

use super::{ArcCost, EPSILON};

/// Applies the best improving segment reversal.
///
/// Returns `true` if a move was applied.
pub fn two_opt_improve<C: ArcCost + ?Sized>(
    routes: &mut [Vec<usize>],
    formulation: &Formulation,
    cost: &C,
) -> bool {
    let constraints = formulation.constraints();
    let distances = formulation.distances();

    let mut best: Option<(usize, usize, usize, f64)> = None;
    for (r, vehicle) in formulation.vehicles().iter().enumerate() {
        let route = &routes[r];
        let n = route.len();
        if n < 2 {
            continue;
        }
        let depot = vehicle.depot();
        for i in 0..n - 1 {
            for j in i + 1..n {
                let delta = two_opt_delta(route, depot, cost, i, j);
                if delta >= -EPSILON || best.is_some_and(|(.., b)| delta >= b) {
                    continue;
                }
                let mut candidate = route.clone();
                candidate[i..=j].reverse();
                if constraints.route_feasible(r, &candidate, distances) {
                    best = Some((r, i, j, delta));
                }
            }
        }
    }

    match best {
        Some((r, i, j, _)) => {
            routes[r][i..=j].reverse();
            true
        }
        None => false,
    }
}

/// Computes the cost change from reversing `route[i..=j]`.
///
/// Before: ...-prev_i - route[i] - ... - route[j] - next_j-...
/// After:  ...-prev_i - route[j] - ... - route[i] - next_j-...
fn two_opt_delta<C: ArcCost + ?Sized>(
    route: &[usize],
    depot: usize,
    cost: &C,
    i: usize,
    j: usize,
) -> f64 {
    let prev_i = if i == 0 { depot } else { route[i - 1] };
    let next_j = route.get(j + 1).copied().unwrap_or(depot);

    let old_cost = cost.arc(prev_i, route[i]) + cost.arc(route[j], next_j);
    let new_cost = cost.arc(prev_i, route[j]) + cost.arc(route[i], next_j);

    new_cost - old_cost
}

#[cfg(test)]
mod tests {
    use super::super::route_cost;
    use super::*;
    use crate::formulation::ProblemFormulator;
    use crate::models::Location;

    fn line() -> Formulation {
        ProblemFormulator::new(vec![
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(1, "C1", 1.0, 0.0),
            Location::customer(2, "C2", 2.0, 0.0),
            Location::customer(3, "C3", 3.0, 0.0),
            Location::customer(4, "C4", 4.0, 0.0),
        ])
        .vehicles(vec![0])
        .capacity(10)
        .max_distance(100.0)
        .build()
        .expect("valid")
    }

    #[test]
    fn test_fixes_crossing() {
        let f = line();
        let mut routes = vec![vec![1, 3, 2, 4]];
        assert!(two_opt_improve(&mut routes, &f, f.distances()));
        assert_eq!(routes[0], vec![1, 2, 3, 4]);
        assert!((route_cost(f.distances(), 0, &routes[0]) - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_optimal_route_unchanged() {
        let f = line();
        let mut routes = vec![vec![1, 2, 3, 4]];
        assert!(!two_opt_improve(&mut routes, &f, f.distances()));
    }

    #[test]
    fn test_short_routes() {
        let f = line();
        let mut routes = vec![vec![3]];
        assert!(!two_opt_improve(&mut routes, &f, f.distances()));
    }

    #[test]
    fn test_delta_matches_recomputation() {
        let f = line();
        let route = vec![4, 1, 3, 2];
        for i in 0..3 {
            for j in i + 1..4 {
                let mut reversed = route.clone();
                reversed[i..=j].reverse();
                let expected = route_cost(f.distances(), 0, &reversed)
                    - route_cost(f.distances(), 0, &route);
                let delta = two_opt_delta(&route, 0, f.distances(), i, j);
                assert!((delta - expected).abs() < 1e-10);
            }
        }
    }
}
