//! Solution and violation types.

use std::fmt;

use super::Route;

/// A type of constraint violation in a decoded solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// More deliveries than the vehicle can carry.
    CapacityExceeded {
        /// Vehicle whose route is overloaded.
        vehicle_id: usize,
        /// Deliveries on the route.
        load: u32,
        /// Vehicle capacity.
        capacity: u32,
    },
    /// Route distance exceeds the vehicle's maximum.
    MaxDistanceExceeded {
        /// Vehicle whose route is too long.
        vehicle_id: usize,
        /// Actual distance.
        distance: f64,
        /// Maximum allowed distance.
        max_distance: f64,
    },
    /// Vehicle serves no customer although a minimum load is enforced.
    IdleVehicle {
        /// The idle vehicle.
        vehicle_id: usize,
    },
    /// Customer not visited by any route.
    CustomerNotServed {
        /// Location index of the customer.
        customer: usize,
    },
    /// Customer visited more than once.
    CustomerServedTwice {
        /// Location index of the customer.
        customer: usize,
        /// Number of visits found.
        visits: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationType::CapacityExceeded {
                vehicle_id,
                load,
                capacity,
            } => write!(f, "truck {vehicle_id} carries {load} deliveries (capacity {capacity})"),
            ViolationType::MaxDistanceExceeded {
                vehicle_id,
                distance,
                max_distance,
            } => write!(
                f,
                "truck {vehicle_id} travels {distance:.1} (limit {max_distance:.1})"
            ),
            ViolationType::IdleVehicle { vehicle_id } => {
                write!(f, "truck {vehicle_id} serves no customer")
            }
            ViolationType::CustomerNotServed { customer } => {
                write!(f, "location {customer} is not served")
            }
            ViolationType::CustomerServedTwice { customer, visits } => {
                write!(f, "location {customer} is visited {visits} times")
            }
        }
    }
}

/// A complete assignment of customers to vehicle routes.
///
/// Holds one route per vehicle, in fleet order. Idle vehicles appear as
/// empty routes.
///
/// # Examples
///
/// ```
/// use collab_routing::models::{Location, Route, Solution};
///
/// let depot = Location::depot(0, "Depot A", 0.0, 0.0);
/// let route = Route::new(0, depot, vec![Location::customer(1, "C1", 3.0, 4.0)], 10.0);
/// let sol = Solution::new(vec![route]);
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.num_served(), 1);
/// assert_eq!(sol.total_distance(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    routes: Vec<Route>,
}

impl Solution {
    /// Creates a solution from per-vehicle routes.
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Routes in fleet order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes (one per vehicle).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of vehicles serving at least one customer.
    pub fn num_active(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Total number of customer visits across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    /// Total distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(Route::distance).sum()
    }
}
