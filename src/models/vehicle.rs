//! Vehicle type with capacity and distance limits.

/// A vehicle based at one depot, bounded by a delivery count and a travel
/// distance.
///
/// Vehicles are produced by
/// [`define_constraints`](crate::formulation::define_constraints) and never
/// change afterwards.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Vehicle;
///
/// let v = Vehicle::new(0, 1, 4, 120.0);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.depot(), 1);
/// assert_eq!(v.capacity(), 4);
/// assert_eq!(v.max_distance(), 120.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: usize,
    depot: usize,
    capacity: u32,
    max_distance: f64,
}

impl Vehicle {
    /// Creates a vehicle.
    pub fn new(id: usize, depot: usize, capacity: u32, max_distance: f64) -> Self {
        Self {
            id,
            depot,
            capacity,
            max_distance,
        }
    }

    /// Vehicle ID (position in the fleet).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Depot location index (start and end of the route).
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Maximum number of customers served.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Maximum cumulative travel distance.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }
}
