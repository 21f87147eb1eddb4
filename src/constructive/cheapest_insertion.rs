//! Parallel cheapest insertion.
//!
//! # Algorithm
//!
//! Repeatedly evaluates every (unassigned customer, vehicle, position)
//! triple and performs the insertion with the smallest distance increase
//!
//! ```text
//! delta = d(prev, c) + d(c, next) - d(prev, next)
//! ```
//!
//! among those that keep the receiving route within every dimension
//! capacity. Stops when no customer can be placed.
//!
//! # Complexity
//!
//! O(n³ · m) worst case, n = customers, m = vehicles.

use crate::formulation::Formulation;

/// Inserts unassigned customers at their cheapest feasible positions.
pub fn cheapest_insertion(
    formulation: &Formulation,
    routes: &mut [Vec<usize>],
    assigned: &mut [bool],
) {
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let customers = formulation.customers();

    loop {
        let mut best: Option<(usize, usize, usize, f64)> = None;

        for &c in &customers {
            if assigned[c] {
                continue;
            }
            for (v, vehicle) in constraints.vehicles().iter().enumerate() {
                let depot = vehicle.depot();
                for pos in 0..=routes[v].len() {
                    let prev = if pos == 0 { depot } else { routes[v][pos - 1] };
                    let next = routes[v].get(pos).copied().unwrap_or(depot);
                    let delta = distances.get(prev, c) + distances.get(c, next)
                        - distances.get(prev, next);
                    if best.is_some_and(|(.., b)| delta >= b) {
                        continue;
                    }
                    routes[v].insert(pos, c);
                    let fits = constraints.within_capacities(v, &routes[v], distances);
                    routes[v].remove(pos);
                    if fits {
                        best = Some((c, v, pos, delta));
                    }
                }
            }
        }

        match best {
            Some((c, v, pos, _)) => {
                assigned[c] = true;
                routes[v].insert(pos, c);
            }
            None => break,
        }
    }
}
