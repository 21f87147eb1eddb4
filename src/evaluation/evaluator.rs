//! Route evaluator that computes distances and audits feasibility.

use crate::formulation::{DimensionBreach, Formulation, CAPACITY, DISTANCE};
use crate::models::{Location, Route, Solution, Violation, ViolationType};

/// Builds routes from customer sequences and checks them against every
/// dimension of a formulation, plus customer coverage for whole solutions.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::evaluation::RouteEvaluator;
///
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 3.0, 4.0),
///     Location::customer(2, "C2", 6.0, 8.0),
/// ])
/// .vehicles(vec![0])
/// .build()
/// .unwrap();
///
/// let evaluator = RouteEvaluator::new(&formulation);
/// let (route, violations) = evaluator.build_route(0, &[1, 2]);
/// assert_eq!(route.len(), 2);
/// assert!((route.distance() - 20.0).abs() < 1e-10);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    formulation: &'a Formulation,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given formulation.
    pub fn new(formulation: &'a Formulation) -> Self {
        Self { formulation }
    }

    /// Builds the route of `vehicle` through the given customers.
    ///
    /// Returns the route and the violations of its own dimensions. Coverage
    /// is a whole-solution property and is checked by
    /// [`evaluate_solution`](Self::evaluate_solution).
    ///
    /// # Panics
    ///
    /// Panics if `vehicle` is not a fleet index or a customer is not a
    /// location index of the formulation.
    pub fn build_route(&self, vehicle: usize, customers: &[usize]) -> (Route, Vec<Violation>) {
        let f = self.formulation;
        let depot = f.vehicles()[vehicle].depot();
        let distances = f.distances();

        let mut distance = 0.0;
        let mut prev = depot;
        for &c in customers {
            distance += distances.get(prev, c);
            prev = c;
        }
        distance += distances.get(prev, depot);

        let stops: Vec<Location> = customers.iter().map(|&c| f.location(c).clone()).collect();
        let route = Route::new(vehicle, f.location(depot).clone(), stops, distance);

        let violations = f
            .constraints()
            .check_route(vehicle, customers, distances)
            .into_iter()
            .filter_map(|breach| to_violation(vehicle, breach))
            .collect();

        (route, violations)
    }

    /// Audits a whole solution: each route's dimensions, then coverage.
    ///
    /// Returns the total distance and every violation found.
    ///
    /// # Panics
    ///
    /// Panics if a route carries a vehicle id outside the fleet or a stop
    /// outside the formulation's locations. Solutions returned by
    /// [`decode`](crate::solver::decode) are always in range.
    pub fn evaluate_solution(&self, solution: &Solution) -> (f64, Vec<Violation>) {
        let f = self.formulation;
        let mut violations = Vec::new();

        for route in solution.routes() {
            let (_, mut route_violations) =
                self.build_route(route.vehicle_id(), &route.customer_indices());
            violations.append(&mut route_violations);
        }

        let mut visits = vec![0usize; f.locations().len()];
        for route in solution.routes() {
            for stop in route.stops() {
                visits[stop.index()] += 1;
            }
        }
        for customer in f.customers() {
            match visits[customer] {
                0 => violations.push(Violation::new(ViolationType::CustomerNotServed { customer })),
                1 => {}
                n => violations.push(Violation::new(ViolationType::CustomerServedTwice {
                    customer,
                    visits: n,
                })),
            }
        }

        (solution.total_distance(), violations)
    }
}

fn to_violation(vehicle_id: usize, breach: DimensionBreach) -> Option<Violation> {
    let kind = match breach {
        DimensionBreach::AboveCapacity {
            dimension: CAPACITY,
            value,
            capacity,
        } => ViolationType::CapacityExceeded {
            vehicle_id,
            load: value.round() as u32,
            capacity: capacity.round() as u32,
        },
        DimensionBreach::AboveCapacity {
            dimension: DISTANCE,
            value,
            capacity,
        } => ViolationType::MaxDistanceExceeded {
            vehicle_id,
            distance: value,
            max_distance: capacity,
        },
        // only the arc count carries an end minimum
        DimensionBreach::BelowMinimum { .. } => ViolationType::IdleVehicle { vehicle_id },
        DimensionBreach::AboveCapacity { .. } => return None,
    };
    Some(Violation::new(kind))
}
