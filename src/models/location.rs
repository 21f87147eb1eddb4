//! Depot and customer locations.

use serde::{Deserialize, Serialize};

/// Role of a location in a multi-depot scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationRole {
    /// Start and end point of vehicle routes. Never visited as a stop.
    Depot,
    /// A delivery stop, served by exactly one vehicle.
    Customer,
}

/// A named point in the plane with a role and a unique index.
///
/// The index is the row/column of the location in the distance matrix.
///
/// # Examples
///
/// ```
/// use collab_routing::models::{Location, LocationRole};
///
/// let depot = Location::depot(0, "Depot A", 10.0, 50.0);
/// assert_eq!(depot.role(), LocationRole::Depot);
/// assert_eq!(depot.demand(), 0);
///
/// let c = Location::customer(1, "C1", 12.0, 45.0);
/// assert!(c.is_customer());
/// assert_eq!(c.demand(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    index: usize,
    name: String,
    x: f64,
    y: f64,
    role: LocationRole,
}

impl Location {
    /// Creates a location.
    pub fn new(index: usize, name: impl Into<String>, x: f64, y: f64, role: LocationRole) -> Self {
        Self {
            index,
            name: name.into(),
            x,
            y,
            role,
        }
    }

    /// Creates a depot location.
    pub fn depot(index: usize, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(index, name, x, y, LocationRole::Depot)
    }

    /// Creates a customer location.
    pub fn customer(index: usize, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(index, name, x, y, LocationRole::Customer)
    }

    /// Matrix index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Depot or customer.
    pub fn role(&self) -> LocationRole {
        self.role
    }

    /// Returns `true` for depots.
    pub fn is_depot(&self) -> bool {
        self.role == LocationRole::Depot
    }

    /// Returns `true` for customers.
    pub fn is_customer(&self) -> bool {
        self.role == LocationRole::Customer
    }

    /// Deliveries required here: one per customer, none at a depot.
    pub fn demand(&self) -> u32 {
        match self.role {
            LocationRole::Depot => 0,
            LocationRole::Customer => 1,
        }
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another location.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
