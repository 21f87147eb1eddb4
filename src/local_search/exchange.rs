//! Inter-route swap operator.
//!
//! # Algorithm
//!
//! Takes each customer in scan order and evaluates exchanging it with every
//! customer of another route; each takes the other's position. Swaps keep
//! both delivery counts unchanged, so they remain available when every
//! vehicle is full and relocation is blocked.
//!
//! # Complexity
//!
//! O(n) candidates per customer, each costed and checked in O(n).

use crate::formulation::Formulation;

use super::{locate, route_cost, ArcCost, EPSILON};

/// Applies the first improving swap found in scan order.
///
/// Returns `true` if a move was applied.
pub fn swap_improve<C: ArcCost + ?Sized>(
    routes: &mut [Vec<usize>],
    formulation: &Formulation,
    cost: &C,
    order: &[usize],
) -> bool {
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let vehicles = formulation.vehicles();

    for &customer in order {
        let Some((ra, pa)) = locate(routes, customer) else {
            continue;
        };
        let depot_a = vehicles[ra].depot();
        let old_a = route_cost(cost, depot_a, &routes[ra]);

        let mut best: Option<(usize, usize, f64)> = None;
        for rb in 0..routes.len() {
            if rb == ra {
                continue;
            }
            let depot_b = vehicles[rb].depot();
            let old_b = route_cost(cost, depot_b, &routes[rb]);

            for pb in 0..routes[rb].len() {
                let mut new_a = routes[ra].clone();
                let mut new_b = routes[rb].clone();
                std::mem::swap(&mut new_a[pa], &mut new_b[pb]);

                let delta = route_cost(cost, depot_a, &new_a) + route_cost(cost, depot_b, &new_b)
                    - old_a
                    - old_b;
                if delta >= -EPSILON || best.is_some_and(|(.., b)| delta >= b) {
                    continue;
                }
                if constraints.route_feasible(ra, &new_a, distances)
                    && constraints.route_feasible(rb, &new_b, distances)
                {
                    best = Some((rb, pb, delta));
                }
            }
        }

        if let Some((rb, pb, _)) = best {
            let (a, b) = pair_mut(routes, ra, rb);
            std::mem::swap(&mut a[pa], &mut b[pb]);
            return true;
        }
    }
    false
}

/// Mutable references to two distinct routes.
pub(crate) fn pair_mut(
    routes: &mut [Vec<usize>],
    a: usize,
    b: usize,
) -> (&mut Vec<usize>, &mut Vec<usize>) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = routes.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = routes.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
