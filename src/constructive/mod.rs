//! Constructive heuristics for the first complete assignment.
//!
//! Every heuristic here works on per-vehicle customer sequences and only
//! accepts a step if the partial route stays within all dimension
//! capacities. End minimums are met up front: vehicles that may not stay
//! idle receive a seed customer before any route is extended.
//!
//! - [`seed_minimum_loads`] — one cheapest round-trip customer per vehicle that needs it
//! - [`path_cheapest_arc`] — extend each route along its cheapest feasible arc, O(n²)
//! - [`cheapest_insertion`] — parallel cheapest insertion over all routes, O(n³)
//! - [`repair`] — ruin and recreate for first solutions the greedy pass left short

mod cheapest_insertion;
mod nearest_neighbor;
mod repair;
mod seed;

pub use cheapest_insertion::cheapest_insertion;
pub use nearest_neighbor::path_cheapest_arc;
pub use repair::{constrained_insertion, repair, shortfall, MAX_ROUNDS};
pub use seed::seed_minimum_loads;

use tracing::debug;

use crate::formulation::Formulation;
use crate::solver::FirstSolutionStrategy;

/// Routes of a first solution and the customers it could not place.
#[derive(Debug, Clone, PartialEq)]
pub struct Construction {
    /// Customer sequence per vehicle, in fleet order.
    pub routes: Vec<Vec<usize>>,
    /// Customers without a feasible position.
    pub unassigned: Vec<usize>,
}

impl Construction {
    /// Returns `true` if every customer is placed.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Returns `true` if every customer is placed and every route meets all
    /// of its bounds, end minimums included.
    pub fn is_feasible(&self, formulation: &Formulation) -> bool {
        let constraints = formulation.constraints();
        self.is_complete()
            && self
                .routes
                .iter()
                .enumerate()
                .all(|(v, r)| constraints.route_feasible(v, r, formulation.distances()))
    }
}

/// Builds a first solution with the given strategy.
///
/// Seeds vehicles with end minimums, runs the strategy, then offers any
/// leftover customers to cheapest insertion.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::constructive::construct;
/// use collab_routing::solver::FirstSolutionStrategy;
///
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 1.0, 0.0),
///     Location::customer(2, "C2", 2.0, 0.0),
///     Location::customer(3, "C3", 3.0, 0.0),
/// ])
/// .vehicles(vec![0, 0])
/// .capacity(2)
/// .max_distance(100.0)
/// .build()
/// .unwrap();
///
/// let c = construct(&formulation, FirstSolutionStrategy::PathCheapestArc);
/// assert!(c.is_complete());
/// assert!(c.routes.iter().all(|r| !r.is_empty()));
/// ```
pub fn construct(formulation: &Formulation, strategy: FirstSolutionStrategy) -> Construction {
    let mut routes = vec![Vec::new(); formulation.num_vehicles()];
    let mut assigned: Vec<bool> = formulation
        .locations()
        .iter()
        .map(|l| l.is_depot())
        .collect();

    seed_minimum_loads(formulation, &mut routes, &mut assigned);
    match strategy {
        FirstSolutionStrategy::PathCheapestArc => {
            path_cheapest_arc(formulation, &mut routes, &mut assigned);
            cheapest_insertion(formulation, &mut routes, &mut assigned);
        }
        FirstSolutionStrategy::ParallelCheapestInsertion => {
            cheapest_insertion(formulation, &mut routes, &mut assigned);
        }
    }

    let unassigned: Vec<usize> = formulation
        .customers()
        .into_iter()
        .filter(|&c| !assigned[c])
        .collect();
    debug!(?strategy, unassigned = unassigned.len(), "first solution built");
    Construction { routes, unassigned }
}
