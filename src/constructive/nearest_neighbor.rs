//! Path-cheapest-arc constructive heuristic.
//!
//! Builds routes greedily, one vehicle after another: from the last node of
//! the route, always move to the nearest unassigned customer whose addition
//! keeps the route (closed back to its depot) within every dimension
//! capacity. When no customer fits, move on to the next vehicle.
//!
//! # Complexity
//!
//! O(n² · m) where n = customers and m = vehicles.

use crate::formulation::Formulation;

/// Extends every route along its cheapest feasible arc.
///
/// Routes that already hold customers (seeds) are extended from their last
/// customer. Newly placed customers are marked in `assigned`.
pub fn path_cheapest_arc(
    formulation: &Formulation,
    routes: &mut [Vec<usize>],
    assigned: &mut [bool],
) {
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let customers = formulation.customers();

    for (v, vehicle) in constraints.vehicles().iter().enumerate() {
        loop {
            let current = routes[v].last().copied().unwrap_or(vehicle.depot());

            let mut best: Option<(usize, f64)> = None;
            for &c in &customers {
                if assigned[c] {
                    continue;
                }
                let d = distances.get(current, c);
                if best.is_some_and(|(_, b)| d >= b) {
                    continue;
                }
                routes[v].push(c);
                let fits = constraints.within_capacities(v, &routes[v], distances);
                routes[v].pop();
                if fits {
                    best = Some((c, d));
                }
            }

            match best {
                Some((next, _)) => {
                    assigned[next] = true;
                    routes[v].push(next);
                }
                None => break,
            }
        }
    }
}
