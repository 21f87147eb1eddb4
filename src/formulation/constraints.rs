//! Routing dimensions and the per-vehicle constraint set.
//!
//! A dimension accumulates a quantity along a route (deliveries, distance,
//! arcs). Each vehicle bounds the accumulated value from above, and may
//! bound the value reached at its end depot from below. Both bounds are
//! checked by the solver on every partial route it builds and every move it
//! considers.

use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::FormulationError;
use crate::models::{Location, Vehicle};

/// Name of the delivery-count dimension.
pub const CAPACITY: &str = "Capacity";
/// Name of the travel-distance dimension.
pub const DISTANCE: &str = "Distance";
/// Name of the arc-count dimension used by the minimum-load rule.
pub const ARC_COUNT: &str = "ArcCount";

/// Upper bound of the arc-count dimension.
const ARC_COUNT_CAPACITY: f64 = 1000.0;

/// Arcs on a route that visits at least one customer: start→c and c→end.
const MIN_LOAD_ARCS: f64 = 2.0;

/// What a dimension accumulates per step.
#[derive(Debug, Clone, PartialEq)]
pub enum Transit {
    /// Quantity charged when leaving a node, indexed by location.
    Demand(Vec<f64>),
    /// Arc length taken from the distance matrix.
    Distance,
    /// One unit per arc.
    UnitArc,
}

impl Transit {
    /// Value added when travelling from `from` to `to`.
    pub fn value(&self, from: usize, to: usize, distances: &DistanceMatrix) -> f64 {
        match self {
            Self::Demand(demands) => demands[from],
            Self::Distance => distances.get(from, to),
            Self::UnitArc => 1.0,
        }
    }
}

/// A bound of a dimension that a route breaks.
#[derive(Debug, Clone, PartialEq)]
pub enum DimensionBreach {
    /// Cumulative value exceeds the vehicle capacity.
    AboveCapacity {
        /// Dimension name.
        dimension: &'static str,
        /// Value reached.
        value: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// End value falls short of the required minimum.
    BelowMinimum {
        /// Dimension name.
        dimension: &'static str,
        /// Value reached at the end depot.
        value: f64,
        /// Required minimum.
        minimum: f64,
    },
}

/// A named quantity accumulated along each route with zero slack.
///
/// The cumul starts at zero at the vehicle's depot. Transits are
/// non-negative, so the value at the end depot is the largest along the
/// route.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: &'static str,
    transit: Transit,
    capacities: Vec<f64>,
    end_minimums: Vec<f64>,
}

impl Dimension {
    /// Creates a dimension with one capacity per vehicle and no end minimum.
    pub fn new(name: &'static str, transit: Transit, capacities: Vec<f64>) -> Self {
        let end_minimums = vec![0.0; capacities.len()];
        Self {
            name,
            transit,
            capacities,
            end_minimums,
        }
    }

    /// Dimension name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Transit definition.
    pub fn transit(&self) -> &Transit {
        &self.transit
    }

    /// Capacity for a vehicle.
    pub fn capacity(&self, vehicle: usize) -> f64 {
        self.capacities[vehicle]
    }

    /// Required end value for a vehicle.
    pub fn end_minimum(&self, vehicle: usize) -> f64 {
        self.end_minimums[vehicle]
    }

    /// Requires the end cumul of `vehicle` to be at least `minimum`.
    pub fn set_end_minimum(&mut self, vehicle: usize, minimum: f64) {
        self.end_minimums[vehicle] = minimum;
    }

    /// Value reached at the end depot of `depot → customers… → depot`.
    pub fn end_cumul(&self, depot: usize, customers: &[usize], distances: &DistanceMatrix) -> f64 {
        let mut cumul = 0.0;
        let mut prev = depot;
        for &c in customers {
            cumul += self.transit.value(prev, c, distances);
            prev = c;
        }
        cumul + self.transit.value(prev, depot, distances)
    }

    /// Checks the capacity bound only.
    pub fn within_capacity(&self, vehicle: usize, cumul: f64) -> bool {
        cumul <= self.capacities[vehicle] + 1e-9
    }

    /// Checks both bounds of a complete route.
    pub fn check(&self, vehicle: usize, cumul: f64) -> Option<DimensionBreach> {
        if !self.within_capacity(vehicle, cumul) {
            return Some(DimensionBreach::AboveCapacity {
                dimension: self.name,
                value: cumul,
                capacity: self.capacities[vehicle],
            });
        }
        if cumul + 1e-9 < self.end_minimums[vehicle] {
            return Some(DimensionBreach::BelowMinimum {
                dimension: self.name,
                value: cumul,
                minimum: self.end_minimums[vehicle],
            });
        }
        None
    }
}

/// Vehicles plus the dimensions registered on them, in registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSet {
    vehicles: Vec<Vehicle>,
    dimensions: Vec<Dimension>,
}

impl ConstraintSet {
    /// Vehicles in fleet order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Registered dimensions, in registration order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Looks up a dimension by name.
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Returns `true` once [`enforce_minimum_load`](Self::enforce_minimum_load) ran.
    pub fn minimum_load_enforced(&self) -> bool {
        self.dimension(ARC_COUNT).is_some()
    }

    /// Requires every vehicle's route to contain at least one customer.
    ///
    /// Registers an `ArcCount` dimension (one unit per arc) and requires its
    /// end cumul to be at least 2 for every vehicle. A vehicle that never
    /// leaves its depot travels a single start→end arc and breaks the bound.
    /// Calling this twice has no further effect.
    pub fn enforce_minimum_load(&mut self) {
        if self.minimum_load_enforced() {
            return;
        }
        let n = self.vehicles.len();
        let mut arcs = Dimension::new(ARC_COUNT, Transit::UnitArc, vec![ARC_COUNT_CAPACITY; n]);
        for v in 0..n {
            arcs.set_end_minimum(v, MIN_LOAD_ARCS);
        }
        self.dimensions.push(arcs);
        debug!(vehicles = n, "minimum load registered");
    }

    /// Returns `true` if the partial route breaks no capacity bound.
    ///
    /// End minimums are ignored: a route under construction may still grow.
    pub fn within_capacities(
        &self,
        vehicle: usize,
        customers: &[usize],
        distances: &DistanceMatrix,
    ) -> bool {
        let depot = self.vehicles[vehicle].depot();
        self.dimensions
            .iter()
            .all(|d| d.within_capacity(vehicle, d.end_cumul(depot, customers, distances)))
    }

    /// Returns `true` if the complete route satisfies every dimension.
    pub fn route_feasible(
        &self,
        vehicle: usize,
        customers: &[usize],
        distances: &DistanceMatrix,
    ) -> bool {
        let depot = self.vehicles[vehicle].depot();
        self.dimensions
            .iter()
            .all(|d| d.check(vehicle, d.end_cumul(depot, customers, distances)).is_none())
    }

    /// Lists every bound the complete route breaks.
    pub fn check_route(
        &self,
        vehicle: usize,
        customers: &[usize],
        distances: &DistanceMatrix,
    ) -> Vec<DimensionBreach> {
        let depot = self.vehicles[vehicle].depot();
        self.dimensions
            .iter()
            .filter_map(|d| d.check(vehicle, d.end_cumul(depot, customers, distances)))
            .collect()
    }
}

/// Creates the fleet and registers its capacity and distance dimensions.
///
/// `vehicle_depots[v]` is the depot location index of vehicle `v`. Every
/// vehicle gets the same `capacity_limit` (customers served) and
/// `distance_limit` (cumulative travel). `Capacity` is registered before
/// `Distance`.
///
/// # Errors
///
/// Rejects a zero capacity, a non-positive or non-finite distance, an empty
/// fleet and depot indices that are not depots.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::formulation::define_constraints;
///
/// let locations = vec![
///     Location::depot(0, "Depot A", 10.0, 50.0),
///     Location::customer(1, "C1", 12.0, 45.0),
/// ];
/// let set = define_constraints(&locations, &[0, 0], 4, 120.0).unwrap();
/// assert_eq!(set.vehicles().len(), 2);
/// let names: Vec<&str> = set.dimensions().iter().map(|d| d.name()).collect();
/// assert_eq!(names, vec!["Capacity", "Distance"]);
/// ```
pub fn define_constraints(
    locations: &[Location],
    vehicle_depots: &[usize],
    capacity_limit: u32,
    distance_limit: f64,
) -> Result<ConstraintSet, FormulationError> {
    if capacity_limit == 0 {
        return Err(FormulationError::NonPositiveCapacity);
    }
    if !distance_limit.is_finite() || distance_limit <= 0.0 {
        return Err(FormulationError::NonPositiveDistance(distance_limit));
    }
    if vehicle_depots.is_empty() {
        return Err(FormulationError::EmptyFleet);
    }

    let mut demands = vec![0.0; locations.len()];
    for loc in locations {
        if let Some(slot) = demands.get_mut(loc.index()) {
            *slot = f64::from(loc.demand());
        }
    }

    let mut vehicles = Vec::with_capacity(vehicle_depots.len());
    for (id, &depot) in vehicle_depots.iter().enumerate() {
        let is_depot = locations
            .iter()
            .any(|l| l.index() == depot && l.is_depot());
        if !is_depot {
            return Err(FormulationError::NotADepot(depot));
        }
        vehicles.push(Vehicle::new(id, depot, capacity_limit, distance_limit));
    }

    let n = vehicles.len();
    let dimensions = vec![
        Dimension::new(
            CAPACITY,
            Transit::Demand(demands),
            vec![f64::from(capacity_limit); n],
        ),
        Dimension::new(DISTANCE, Transit::Distance, vec![distance_limit; n]),
    ];
    debug!(vehicles = n, capacity_limit, distance_limit, "constraints defined");

    Ok(ConstraintSet {
        vehicles,
        dimensions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> (Vec<Location>, DistanceMatrix) {
        let locations = vec![
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(1, "C1", 1.0, 0.0),
            Location::customer(2, "C2", 2.0, 0.0),
            Location::customer(3, "C3", 3.0, 0.0),
        ];
        let dm = DistanceMatrix::from_locations(&locations).expect("valid");
        (locations, dm)
    }

    #[test]
    fn test_define_rejects_bad_bounds() {
        let (locations, _) = line();
        assert!(matches!(
            define_constraints(&locations, &[0], 0, 10.0),
            Err(FormulationError::NonPositiveCapacity)
        ));
        assert!(matches!(
            define_constraints(&locations, &[0], 2, 0.0),
            Err(FormulationError::NonPositiveDistance(_))
        ));
        assert!(matches!(
            define_constraints(&locations, &[0], 2, -5.0),
            Err(FormulationError::NonPositiveDistance(_))
        ));
        assert!(matches!(
            define_constraints(&locations, &[0], 2, f64::INFINITY),
            Err(FormulationError::NonPositiveDistance(_))
        ));
    }

    #[test]
    fn test_define_rejects_bad_fleet() {
        let (locations, _) = line();
        assert!(matches!(
            define_constraints(&locations, &[], 2, 10.0),
            Err(FormulationError::EmptyFleet)
        ));
        assert!(matches!(
            define_constraints(&locations, &[0, 2], 2, 10.0),
            Err(FormulationError::NotADepot(2))
        ));
        assert!(matches!(
            define_constraints(&locations, &[9], 2, 10.0),
            Err(FormulationError::NotADepot(9))
        ));
    }

    #[test]
    fn test_vehicles_carry_limits() {
        let (locations, _) = line();
        let set = define_constraints(&locations, &[0, 0], 2, 10.0).expect("valid");
        for (i, v) in set.vehicles().iter().enumerate() {
            assert_eq!(v.id(), i);
            assert_eq!(v.depot(), 0);
            assert_eq!(v.capacity(), 2);
            assert_eq!(v.max_distance(), 10.0);
        }
        assert!(!set.minimum_load_enforced());
    }

    #[test]
    fn test_capacity_and_distance_cumuls() {
        let (locations, dm) = line();
        let set = define_constraints(&locations, &[0], 2, 5.0).expect("valid");
        let cap = set.dimension(CAPACITY).expect("registered");
        let dist = set.dimension(DISTANCE).expect("registered");
        assert_eq!(cap.end_cumul(0, &[1, 2], &dm), 2.0);
        assert!((dist.end_cumul(0, &[1, 2], &dm) - 4.0).abs() < 1e-10);

        assert!(set.route_feasible(0, &[1, 2], &dm));
        // three deliveries: over capacity
        assert!(!set.route_feasible(0, &[1, 2, 3], &dm));
        // 0→3→0 = 6 > 5
        assert!(!set.within_capacities(0, &[3], &dm));
        let breaches = set.check_route(0, &[3], &dm);
        assert_eq!(breaches.len(), 1);
        assert!(matches!(
            breaches[0],
            DimensionBreach::AboveCapacity { dimension: DISTANCE, .. }
        ));
    }

    #[test]
    fn test_empty_route_allowed_without_minimum_load() {
        let (locations, dm) = line();
        let set = define_constraints(&locations, &[0], 2, 5.0).expect("valid");
        assert!(set.route_feasible(0, &[], &dm));
    }

    #[test]
    fn test_minimum_load_rejects_idle_vehicle() {
        let (locations, dm) = line();
        let mut set = define_constraints(&locations, &[0, 0], 2, 10.0).expect("valid");
        set.enforce_minimum_load();
        assert!(set.minimum_load_enforced());

        let arcs = set.dimension(ARC_COUNT).expect("registered");
        assert_eq!(arcs.end_cumul(0, &[], &dm), 1.0);
        assert_eq!(arcs.end_cumul(0, &[1], &dm), 2.0);
        assert_eq!(arcs.end_minimum(1), 2.0);

        assert!(!set.route_feasible(0, &[], &dm));
        // partial routes may still be empty
        assert!(set.within_capacities(0, &[], &dm));
        assert!(set.route_feasible(0, &[1], &dm));
        assert_eq!(
            set.check_route(1, &[], &dm),
            vec![DimensionBreach::BelowMinimum {
                dimension: ARC_COUNT,
                value: 1.0,
                minimum: 2.0,
            }]
        );
    }

    #[test]
    fn test_registration_order_and_idempotence() {
        let (locations, _) = line();
        let mut set = define_constraints(&locations, &[0], 2, 10.0).expect("valid");
        set.enforce_minimum_load();
        set.enforce_minimum_load();
        let names: Vec<&str> = set.dimensions().iter().map(Dimension::name).collect();
        assert_eq!(names, vec![CAPACITY, DISTANCE, ARC_COUNT]);
    }
}
