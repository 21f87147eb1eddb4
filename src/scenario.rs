//! Problem instances as configuration values.
//!
//! A [`Scenario`] names its locations, says how many vehicles each depot
//! runs, and sets the per-vehicle bounds. It loads from JSON; the built-in
//! [`Scenario::default`] is the balanced two-depot, twelve-customer
//! instance.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMetric;
use crate::error::FormulationError;
use crate::models::{Location, LocationRole};
use crate::solver::SearchParameters;

/// A named location in a scenario file. Indices follow list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSpec {
    /// Unique name.
    pub name: String,
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
    /// Depot or customer.
    pub role: LocationRole,
}

/// Number of vehicles based at one depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSpec {
    /// Depot name.
    pub depot: String,
    /// Vehicles starting and ending there.
    pub vehicles: usize,
}

/// A complete, reusable problem definition.
///
/// # Examples
///
/// ```
/// use collab_routing::scenario::Scenario;
///
/// let scenario = Scenario::from_json(r#"{
///     "name": "tiny",
///     "locations": [
///         {"name": "Depot", "x": 0.0, "y": 0.0, "role": "depot"},
///         {"name": "C1", "x": 3.0, "y": 4.0, "role": "customer"}
///     ],
///     "fleet": [{"depot": "Depot", "vehicles": 1}],
///     "capacity": 4,
///     "max_distance": 120.0
/// }"#).unwrap();
/// assert!(scenario.minimum_load);
/// assert_eq!(scenario.vehicle_depots().unwrap(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name.
    pub name: String,
    /// Depots and customers; a location's index is its position.
    pub locations: Vec<LocationSpec>,
    /// Vehicles per depot, in fleet order.
    pub fleet: Vec<FleetSpec>,
    /// Deliveries per vehicle.
    pub capacity: u32,
    /// Travel distance per vehicle.
    pub max_distance: f64,
    /// Require every vehicle to serve at least one customer.
    #[serde(default = "enabled")]
    pub minimum_load: bool,
    /// Arc cost metric.
    #[serde(default)]
    pub metric: DistanceMetric,
    /// Search directives.
    #[serde(default)]
    pub search: SearchParameters,
}

fn enabled() -> bool {
    true
}

impl Scenario {
    /// Parses a scenario from JSON text.
    pub fn from_json(text: &str) -> Result<Self, FormulationError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a scenario from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormulationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scenario = Self::from_json(&text)?;
        debug!(path = %path.display(), name = %scenario.name, "scenario loaded");
        Ok(scenario)
    }

    /// Locations with indices assigned in list order.
    ///
    /// # Errors
    ///
    /// [`FormulationError::DuplicateName`] if two locations share a name.
    pub fn to_locations(&self) -> Result<Vec<Location>, FormulationError> {
        let mut seen = HashMap::with_capacity(self.locations.len());
        self.locations
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if seen.insert(entry.name.as_str(), i).is_some() {
                    return Err(FormulationError::DuplicateName(entry.name.clone()));
                }
                Ok(Location::new(i, entry.name.clone(), entry.x, entry.y, entry.role))
            })
            .collect()
    }

    /// Depot index of every vehicle, expanded from the per-depot counts.
    ///
    /// # Errors
    ///
    /// [`FormulationError::UnknownDepot`] for a name with no location and
    /// [`FormulationError::NotADepot`] for a customer name.
    pub fn vehicle_depots(&self) -> Result<Vec<usize>, FormulationError> {
        let mut depots = Vec::new();
        for entry in &self.fleet {
            let index = self
                .locations
                .iter()
                .position(|l| l.name == entry.depot)
                .ok_or_else(|| FormulationError::UnknownDepot(entry.depot.clone()))?;
            if self.locations[index].role != LocationRole::Depot {
                return Err(FormulationError::NotADepot(index));
            }
            depots.extend(std::iter::repeat(index).take(entry.vehicles));
        }
        Ok(depots)
    }

    /// Total number of vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.fleet.iter().map(|f| f.vehicles).sum()
    }
}

impl Default for Scenario {
    /// Two depots fifty units apart, six customers clustered near each, two
    /// vehicles per depot carrying four deliveries over at most 120 units.
    fn default() -> Self {
        let depot = |name: &str, x: f64, y: f64| LocationSpec {
            name: name.to_string(),
            x,
            y,
            role: LocationRole::Depot,
        };
        let customer = |name: &str, x: f64, y: f64| LocationSpec {
            name: name.to_string(),
            x,
            y,
            role: LocationRole::Customer,
        };
        Self {
            name: "balanced two-depot delivery".to_string(),
            locations: vec![
                depot("Depot A", 10.0, 50.0),
                depot("Depot B", 60.0, 50.0),
                customer("C1", 12.0, 45.0),
                customer("C2", 15.0, 55.0),
                customer("C3", 20.0, 48.0),
                customer("C4", 18.0, 60.0),
                customer("C5", 22.0, 52.0),
                customer("C6", 25.0, 45.0),
                customer("C7", 58.0, 47.0),
                customer("C8", 62.0, 53.0),
                customer("C9", 65.0, 48.0),
                customer("C10", 68.0, 55.0),
                customer("C11", 55.0, 60.0),
                customer("C12", 70.0, 45.0),
            ],
            fleet: vec![
                FleetSpec {
                    depot: "Depot A".to_string(),
                    vehicles: 2,
                },
                FleetSpec {
                    depot: "Depot B".to_string(),
                    vehicles: 2,
                },
            ],
            capacity: 4,
            max_distance: 120.0,
            minimum_load: true,
            metric: DistanceMetric::RoundedEuclidean,
            search: SearchParameters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instance() {
        let s = Scenario::default();
        assert_eq!(s.locations.len(), 14);
        assert_eq!(s.num_vehicles(), 4);
        assert_eq!(s.vehicle_depots().expect("valid"), vec![0, 0, 1, 1]);
        let locations = s.to_locations().expect("valid");
        assert_eq!(locations.iter().filter(|l| l.is_customer()).count(), 12);
        assert_eq!(locations[13].name(), "C12");
        assert_eq!(locations[13].index(), 13);
    }

    #[test]
    fn test_json_round_trip() {
        let s = Scenario::default();
        let text = serde_json::to_string_pretty(&s).expect("serialize");
        let back = Scenario::from_json(&text).expect("parse");
        assert_eq!(back, s);
    }

    #[test]
    fn test_unknown_depot() {
        let mut s = Scenario::default();
        s.fleet[1].depot = "Depot Z".to_string();
        assert!(matches!(
            s.vehicle_depots(),
            Err(FormulationError::UnknownDepot(name)) if name == "Depot Z"
        ));
    }

    #[test]
    fn test_customer_as_depot() {
        let mut s = Scenario::default();
        s.fleet[0].depot = "C1".to_string();
        assert!(matches!(s.vehicle_depots(), Err(FormulationError::NotADepot(2))));
    }

    #[test]
    fn test_duplicate_name() {
        let mut s = Scenario::default();
        s.locations[3].name = "C1".to_string();
        assert!(matches!(
            s.to_locations(),
            Err(FormulationError::DuplicateName(name)) if name == "C1"
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Scenario::from_json("{ not json"),
            Err(FormulationError::Parse(_))
        ));
        // negative capacity cannot be represented
        let text = serde_json::to_string(&Scenario::default())
            .expect("serialize")
            .replace("\"capacity\":4", "\"capacity\":-4");
        assert!(Scenario::from_json(&text).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Scenario::load("/nonexistent/scenario.json"),
            Err(FormulationError::Io(_))
        ));
    }
}
