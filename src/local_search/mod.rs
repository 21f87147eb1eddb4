//! Local search operators for improving multi-depot routes.
//!
//! Every operator works on per-vehicle customer sequences, scores moves with
//! an [`ArcCost`] (plain distance or a penalised one) and only applies moves
//! whose affected routes satisfy every dimension of the formulation,
//! including end minimums.
//!
//! - [`relocate_improve`] — move one customer to another position or route
//! - [`swap_improve`] — exchange two customers between routes
//! - [`two_opt_improve`] — intra-route segment reversal
//! - [`cross_improve`] — inter-route tail exchange (2-opt*)
//! - [`GuidedLocalSearch`] — arc penalties to escape local optima

mod cross;
mod exchange;
mod guided;
mod relocate;
mod two_opt;

pub use cross::cross_improve;
pub use exchange::swap_improve;
pub use guided::{GuidedLocalSearch, PenalizedCost};
pub use relocate::relocate_improve;
pub use two_opt::two_opt_improve;

use std::time::{Duration, Instant};

use crate::distance::DistanceMatrix;
use crate::formulation::Formulation;

/// Improvement threshold below which a move is not worth applying.
pub(crate) const EPSILON: f64 = 1e-9;

/// Cost of travelling one arc, as seen by the search.
pub trait ArcCost {
    /// Cost from location `from` to location `to`.
    fn arc(&self, from: usize, to: usize) -> f64;
}

impl ArcCost for DistanceMatrix {
    fn arc(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }
}

/// Cost of `depot → route… → depot`.
pub fn route_cost<C: ArcCost + ?Sized>(cost: &C, depot: usize, route: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut prev = depot;
    for &c in route {
        total += cost.arc(prev, c);
        prev = c;
    }
    total + cost.arc(prev, depot)
}

/// Total cost of all routes.
pub fn solution_cost<C: ArcCost + ?Sized>(
    cost: &C,
    formulation: &Formulation,
    routes: &[Vec<usize>],
) -> f64 {
    formulation
        .vehicles()
        .iter()
        .zip(routes)
        .map(|(v, r)| route_cost(cost, v.depot(), r))
        .sum()
}

/// Wall-clock end of a search.
///
/// A budget too large to be represented as an [`Instant`] never expires.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use collab_routing::local_search::Deadline;
///
/// assert!(!Deadline::after(Instant::now(), Duration::MAX).passed());
/// assert!(Deadline::after(Instant::now(), Duration::ZERO).passed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Deadline `budget` after `start`.
    pub fn after(start: Instant, budget: Duration) -> Self {
        Self(start.checked_add(budget))
    }

    /// Deadline that never passes.
    pub fn never() -> Self {
        Self(None)
    }

    /// Returns `true` once the deadline is reached.
    pub fn passed(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// Applies improving moves until none is left or the deadline passes.
///
/// Operators are tried in a fixed order (relocate, swap, 2-opt, 2-opt*);
/// after any successful move the sequence restarts. `order` sets the
/// customer scan order of the customer-driven operators.
///
/// Returns the number of moves applied.
pub fn descend<C: ArcCost + ?Sized>(
    routes: &mut [Vec<usize>],
    formulation: &Formulation,
    cost: &C,
    order: &[usize],
    deadline: Deadline,
) -> usize {
    let mut moves = 0;
    while !deadline.passed() {
        let improved = relocate_improve(routes, formulation, cost, order)
            || swap_improve(routes, formulation, cost, order)
            || two_opt_improve(routes, formulation, cost)
            || cross_improve(routes, formulation, cost);
        if !improved {
            break;
        }
        moves += 1;
    }
    moves
}

/// Finds the route and position of a customer.
pub(crate) fn locate(routes: &[Vec<usize>], customer: usize) -> Option<(usize, usize)> {
    routes.iter().enumerate().find_map(|(r, route)| {
        route
            .iter()
            .position(|&c| c == customer)
            .map(|pos| (r, pos))
    })
}
