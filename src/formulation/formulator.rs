//! Problem formulator: locations and fleet in, solver-ready formulation out.

use tracing::info;

use crate::distance::{build_distance_matrix, DistanceMatrix, DistanceMetric};
use crate::error::FormulationError;
use crate::models::{Location, Vehicle};
use crate::scenario::Scenario;

use super::constraints::{define_constraints, ConstraintSet};

/// Everything the solver collaborator needs: locations, arc costs, vehicles
/// and their dimensions.
///
/// Immutable once built. Locations are stored by index, so
/// `locations()[i].index() == i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formulation {
    locations: Vec<Location>,
    distances: DistanceMatrix,
    constraints: ConstraintSet,
}

impl Formulation {
    /// All locations, ordered by index.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The location with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below `locations().len()`.
    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    /// Arc costs.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Vehicles and dimensions.
    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    /// Vehicles in fleet order.
    pub fn vehicles(&self) -> &[Vehicle] {
        self.constraints.vehicles()
    }

    /// Number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.constraints.vehicles().len()
    }

    /// Location indices of all customers, ascending.
    pub fn customers(&self) -> Vec<usize> {
        self.locations
            .iter()
            .filter(|l| l.is_customer())
            .map(Location::index)
            .collect()
    }

    /// Number of customers.
    pub fn num_customers(&self) -> usize {
        self.locations.iter().filter(|l| l.is_customer()).count()
    }

    /// Depot index of each vehicle.
    pub fn depots(&self) -> Vec<usize> {
        self.vehicles().iter().map(Vehicle::depot).collect()
    }
}

/// Builder that validates inputs and assembles a [`Formulation`].
///
/// Steps run in a fixed order: distance matrix, capacity and distance
/// dimensions, then the minimum-load dimension when requested.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
///
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot A", 10.0, 50.0),
///     Location::customer(1, "C1", 12.0, 45.0),
///     Location::customer(2, "C2", 15.0, 55.0),
/// ])
/// .vehicles(vec![0, 0])
/// .capacity(4)
/// .max_distance(120.0)
/// .minimum_load(true)
/// .build()
/// .unwrap();
///
/// assert_eq!(formulation.num_vehicles(), 2);
/// assert_eq!(formulation.customers(), vec![1, 2]);
/// assert!(formulation.constraints().minimum_load_enforced());
/// ```
#[derive(Debug, Clone)]
pub struct ProblemFormulator {
    locations: Vec<Location>,
    metric: DistanceMetric,
    vehicle_depots: Vec<usize>,
    capacity: u32,
    max_distance: f64,
    minimum_load: bool,
}

impl ProblemFormulator {
    /// Starts a formulation over the given locations.
    ///
    /// Defaults: Euclidean metric, no vehicles, capacity 4, distance 120,
    /// minimum load enforced.
    pub fn new(locations: Vec<Location>) -> Self {
        Self {
            locations,
            metric: DistanceMetric::Euclidean,
            vehicle_depots: Vec::new(),
            capacity: 4,
            max_distance: 120.0,
            minimum_load: true,
        }
    }

    /// Sets the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the fleet: one entry per vehicle, holding its depot index.
    pub fn vehicles(mut self, vehicle_depots: Vec<usize>) -> Self {
        self.vehicle_depots = vehicle_depots;
        self
    }

    /// Sets the per-vehicle delivery limit.
    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the per-vehicle travel limit.
    pub fn max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Enables or disables the at-least-one-customer rule.
    pub fn minimum_load(mut self, enabled: bool) -> Self {
        self.minimum_load = enabled;
        self
    }

    /// Starts from a scenario definition.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, FormulationError> {
        Ok(Self::new(scenario.to_locations()?)
            .metric(scenario.metric)
            .vehicles(scenario.vehicle_depots()?)
            .capacity(scenario.capacity)
            .max_distance(scenario.max_distance)
            .minimum_load(scenario.minimum_load))
    }

    /// Validates the inputs and assembles the formulation.
    ///
    /// # Errors
    ///
    /// Any [`FormulationError`] raised by
    /// [`build_distance_matrix`] or [`define_constraints`], or
    /// [`FormulationError::NoDepot`] when no location is a depot.
    pub fn build(self) -> Result<Formulation, FormulationError> {
        let distances = build_distance_matrix(&self.locations, self.metric)?;
        if !self.locations.iter().any(Location::is_depot) {
            return Err(FormulationError::NoDepot);
        }

        let mut locations = self.locations;
        locations.sort_by_key(Location::index);

        let mut constraints = define_constraints(
            &locations,
            &self.vehicle_depots,
            self.capacity,
            self.max_distance,
        )?;
        if self.minimum_load {
            constraints.enforce_minimum_load();
        }

        let formulation = Formulation {
            locations,
            distances,
            constraints,
        };
        info!(
            locations = formulation.locations.len(),
            customers = formulation.num_customers(),
            vehicles = formulation.num_vehicles(),
            minimum_load = self.minimum_load,
            "problem formulated"
        );
        Ok(formulation)
    }
}
