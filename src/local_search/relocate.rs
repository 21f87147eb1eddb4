//! Customer relocation operator.
//!
//! # Algorithm
//!
//! Takes each customer in scan order and evaluates moving it to every other
//! position, in its own route or another one. The removal and insertion
//! deltas are
//!
//! ```text
//! removal   = c(prev, next) - c(prev, x) - c(x, next)
//! insertion = c(p, x) + c(x, q) - c(p, q)
//! ```
//!
//! The cheapest improving move that leaves both routes feasible is applied.
//! Moves that empty a route are rejected whenever the vehicle carries an
//! end minimum.
//!
//! # Complexity
//!
//! O(n) candidate positions per customer, each checked in O(n).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::formulation::Formulation;

use super::{locate, ArcCost, EPSILON};

/// A relocate move: customer at `from_pos` of `from_route` goes to `to_pos`
/// of `to_route` (position counted after removal).
#[derive(Debug, Clone)]
struct RelocateMove {
    from_route: usize,
    from_pos: usize,
    to_route: usize,
    to_pos: usize,
    delta: f64,
}

/// Applies the first improving relocation found in scan order.
///
/// Returns `true` if a move was applied.
pub fn relocate_improve<C: ArcCost + ?Sized>(
    routes: &mut [Vec<usize>],
    formulation: &Formulation,
    cost: &C,
    order: &[usize],
) -> bool {
    for &customer in order {
        if let Some(mv) = best_relocation(routes, formulation, cost, customer) {
            let moved = routes[mv.from_route].remove(mv.from_pos);
            routes[mv.to_route].insert(mv.to_pos, moved);
            return true;
        }
    }
    false
}

/// Finds the cheapest improving feasible relocation of one customer.
fn best_relocation<C: ArcCost + ?Sized>(
    routes: &[Vec<usize>],
    formulation: &Formulation,
    cost: &C,
    customer: usize,
) -> Option<RelocateMove> {
    let (from_route, from_pos) = locate(routes, customer)?;
    let constraints = formulation.constraints();
    let distances = formulation.distances();
    let vehicles = formulation.vehicles();

    let from_depot = vehicles[from_route].depot();
    let removal = removal_cost(&routes[from_route], from_pos, from_depot, cost);
    let mut shortened = routes[from_route].clone();
    shortened.remove(from_pos);
    let source_ok = constraints.route_feasible(from_route, &shortened, distances);

    let mut best: Option<RelocateMove> = None;
    for (to_route, vehicle) in vehicles.iter().enumerate() {
        let same = to_route == from_route;
        if !same && !source_ok {
            continue;
        }
        let target = if same { &shortened } else { &routes[to_route] };
        let depot = vehicle.depot();

        for to_pos in 0..=target.len() {
            if same && to_pos == from_pos {
                continue;
            }
            let delta = removal + insertion_cost(target, to_pos, customer, depot, cost);
            if delta >= -EPSILON || best.as_ref().is_some_and(|b| delta >= b.delta) {
                continue;
            }
            let mut candidate = target.clone();
            candidate.insert(to_pos, customer);
            if constraints.route_feasible(to_route, &candidate, distances) {
                best = Some(RelocateMove {
                    from_route,
                    from_pos,
                    to_route,
                    to_pos,
                    delta,
                });
            }
        }
    }
    best
}

/// Cost change from removing the customer at `pos`.
fn removal_cost<C: ArcCost + ?Sized>(route: &[usize], pos: usize, depot: usize, cost: &C) -> f64 {
    let prev = if pos == 0 { depot } else { route[pos - 1] };
    let next = route.get(pos + 1).copied().unwrap_or(depot);
    cost.arc(prev, next) - cost.arc(prev, route[pos]) - cost.arc(route[pos], next)
}

/// Cost change from inserting `customer` before position `pos`.
fn insertion_cost<C: ArcCost + ?Sized>(
    route: &[usize],
    pos: usize,
    customer: usize,
    depot: usize,
    cost: &C,
) -> f64 {
    let prev = if pos == 0 { depot } else { route[pos - 1] };
    let next = route.get(pos).copied().unwrap_or(depot);
    cost.arc(prev, customer) + cost.arc(customer, next) - cost.arc(prev, next)
}
