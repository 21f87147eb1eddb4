//! Seeding of vehicles that may not stay idle.

use crate::formulation::Formulation;

/// Gives each vehicle whose empty route breaks an end minimum its cheapest
/// round-trip customer.
///
/// The most constrained vehicle goes first: at every step the vehicle with
/// the fewest unassigned customers it could serve alone picks next, ties
/// broken by fleet order. A vehicle with no such customer left stays empty;
/// the caller detects the unmet minimum when it checks the complete route.
pub fn seed_minimum_loads(
    formulation: &Formulation,
    routes: &mut [Vec<usize>],
    assigned: &mut [bool],
) {
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let customers = formulation.customers();

    let mut pending: Vec<usize> = (0..formulation.num_vehicles())
        .filter(|&v| routes[v].is_empty() && !constraints.route_feasible(v, &[], distances))
        .collect();

    while !pending.is_empty() {
        let reachable = |v: usize| -> Vec<usize> {
            customers
                .iter()
                .copied()
                .filter(|&c| !assigned[c] && constraints.within_capacities(v, &[c], distances))
                .collect()
        };
        let Some((slot, candidates)) = pending
            .iter()
            .map(|&v| reachable(v))
            .enumerate()
            .min_by_key(|(_, candidates)| candidates.len())
        else {
            break;
        };
        let v = pending.remove(slot);

        let depot = constraints.vehicles()[v].depot();
        let round_trip = |c: usize| distances.get(depot, c) + distances.get(c, depot);
        let best = candidates
            .into_iter()
            .min_by(|&a, &b| round_trip(a).total_cmp(&round_trip(b)));
        if let Some(c) = best {
            assigned[c] = true;
            routes[v].push(c);
        }
    }
}
