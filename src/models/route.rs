//! Decoded vehicle routes.

use super::Location;

/// The ordered customer stops of one vehicle.
///
/// A route starts and ends at the vehicle's depot; the depot is stored once
/// and not repeated in `stops`.
///
/// # Examples
///
/// ```
/// use collab_routing::models::{Location, Route};
///
/// let depot = Location::depot(0, "Depot A", 0.0, 0.0);
/// let stops = vec![Location::customer(1, "C1", 3.0, 4.0)];
/// let route = Route::new(0, depot, stops, 10.0);
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.node_indices(), vec![0, 1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    vehicle_id: usize,
    depot: Location,
    stops: Vec<Location>,
    distance: f64,
}

impl Route {
    /// Creates a route.
    pub fn new(vehicle_id: usize, depot: Location, stops: Vec<Location>, distance: f64) -> Self {
        Self {
            vehicle_id,
            depot,
            stops,
            distance,
        }
    }

    /// Vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Start and end depot.
    pub fn depot(&self) -> &Location {
        &self.depot
    }

    /// Customer stops in visit order.
    pub fn stops(&self) -> &[Location] {
        &self.stops
    }

    /// Number of customer visits.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if the vehicle stays at its depot.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of arcs travelled: one more than the number of stops.
    pub fn arc_count(&self) -> usize {
        self.stops.len() + 1
    }

    /// Cumulative travel distance, depot to depot.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Customer indices in visit order.
    pub fn customer_indices(&self) -> Vec<usize> {
        self.stops.iter().map(Location::index).collect()
    }

    /// Full path as location indices, depot first and last.
    pub fn node_indices(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.stops.len() + 2);
        path.push(self.depot.index());
        path.extend(self.stops.iter().map(Location::index));
        path.push(self.depot.index());
        path
    }

    /// Full path as locations, depot first and last.
    pub fn path(&self) -> impl Iterator<Item = &Location> {
        std::iter::once(&self.depot)
            .chain(self.stops.iter())
            .chain(std::iter::once(&self.depot))
    }
}
