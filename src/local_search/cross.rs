//! Inter-route tail exchange (2-opt*).
//!
//! # Algorithm
//!
//! Given routes R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], produce:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Each route still returns to its own depot. The best improving exchange
//! whose two routes stay feasible is applied.
//!
//! # Complexity
//!
//! O(n² × R²) candidates per pass, each costed in O(n).
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use crate::formulation::Formulation;

use super::exchange::pair_mut;
use super::{route_cost, ArcCost, EPSILON};

/// Applies the best improving tail exchange.
///
/// Returns `true` if a move was applied.
pub fn cross_improve<C: ArcCost + ?Sized>(
    routes: &mut [Vec<usize>],
    formulation: &Formulation,
    cost: &C,
) -> bool {
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let vehicles = formulation.vehicles();

    let mut best: Option<(usize, usize, usize, usize, f64)> = None;
    for ra in 0..routes.len() {
        let depot_a = vehicles[ra].depot();
        let old_a = route_cost(cost, depot_a, &routes[ra]);
        for rb in ra + 1..routes.len() {
            let depot_b = vehicles[rb].depot();
            let old_b = route_cost(cost, depot_b, &routes[rb]);
            let (a, b) = (&routes[ra], &routes[rb]);

            for i in 0..=a.len() {
                for j in 0..=b.len() {
                    if i == a.len() && j == b.len() {
                        continue;
                    }
                    let new_a: Vec<usize> = a[..i].iter().chain(&b[j..]).copied().collect();
                    let new_b: Vec<usize> = b[..j].iter().chain(&a[i..]).copied().collect();
                    let delta = route_cost(cost, depot_a, &new_a)
                        + route_cost(cost, depot_b, &new_b)
                        - old_a
                        - old_b;
                    if delta >= -EPSILON || best.is_some_and(|(.., d)| delta >= d) {
                        continue;
                    }
                    if constraints.route_feasible(ra, &new_a, distances)
                        && constraints.route_feasible(rb, &new_b, distances)
                    {
                        best = Some((ra, rb, i, j, delta));
                    }
                }
            }
        }
    }

    match best {
        Some((ra, rb, i, j, _)) => {
            let (a, b) = pair_mut(routes, ra, rb);
            let tail_a = a.split_off(i);
            let tail_b = b.split_off(j);
            a.extend(tail_b);
            b.extend(tail_a);
            true
        }
        None => false,
    }
}
