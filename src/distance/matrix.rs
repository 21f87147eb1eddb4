//! Dense distance matrix.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FormulationError;
use crate::models::Location;

/// How coordinates are turned into arc costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Exact Euclidean distance.
    #[default]
    Euclidean,
    /// Euclidean distance rounded to the nearest integer.
    RoundedEuclidean,
}

impl DistanceMetric {
    /// Distance between two locations under this metric.
    pub fn measure(&self, a: &Location, b: &Location) -> f64 {
        let d = a.distance_to(b);
        match self {
            Self::Euclidean => d,
            Self::RoundedEuclidean => d.round(),
        }
    }
}

/// A dense n×n distance matrix stored in row-major order, keyed by location
/// index.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::distance::DistanceMatrix;
///
/// let locations = vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 3.0, 4.0),
///     Location::customer(2, "C2", 6.0, 8.0),
/// ];
/// let dm = DistanceMatrix::from_locations(&locations).unwrap();
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a Euclidean distance matrix from location coordinates.
    ///
    /// See [`build_distance_matrix`] for the validation rules.
    pub fn from_locations(locations: &[Location]) -> Result<Self, FormulationError> {
        build_distance_matrix(locations, DistanceMetric::Euclidean)
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns `true` if every diagonal entry is zero.
    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.size).all(|i| self.get(i, i) == 0.0)
    }

    /// Total distance of a path given as consecutive location indices.
    pub fn path_length(&self, path: &[usize]) -> f64 {
        path.windows(2).map(|w| self.get(w[0], w[1])).sum()
    }
}

/// Builds the symmetric distance matrix of a location set.
///
/// Every location must have finite coordinates and a unique index in
/// `0..locations.len()`; the matrix row of a location is its index, not its
/// position in the slice.
///
/// # Errors
///
/// [`FormulationError::EmptyLocationSet`], [`FormulationError::NonFiniteCoordinate`],
/// [`FormulationError::IndexOutOfRange`] or [`FormulationError::DuplicateIndex`].
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::distance::{build_distance_matrix, DistanceMetric};
///
/// let locations = vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 1.0, 1.0),
/// ];
/// let dm = build_distance_matrix(&locations, DistanceMetric::RoundedEuclidean).unwrap();
/// assert_eq!(dm.get(0, 1), 1.0);
/// assert_eq!(dm.get(1, 1), 0.0);
/// ```
pub fn build_distance_matrix(
    locations: &[Location],
    metric: DistanceMetric,
) -> Result<DistanceMatrix, FormulationError> {
    let n = locations.len();
    if n == 0 {
        return Err(FormulationError::EmptyLocationSet);
    }

    let mut seen = vec![false; n];
    for loc in locations {
        if !loc.is_finite() {
            return Err(FormulationError::NonFiniteCoordinate {
                index: loc.index(),
                name: loc.name().to_string(),
            });
        }
        if loc.index() >= n {
            return Err(FormulationError::IndexOutOfRange {
                index: loc.index(),
                len: n,
            });
        }
        if std::mem::replace(&mut seen[loc.index()], true) {
            return Err(FormulationError::DuplicateIndex(loc.index()));
        }
    }

    let mut dm = DistanceMatrix::new(n);
    for (a, la) in locations.iter().enumerate() {
        for lb in &locations[a + 1..] {
            let d = metric.measure(la, lb);
            dm.set(la.index(), lb.index(), d);
            dm.set(lb.index(), la.index(), d);
        }
    }
    debug!(locations = n, ?metric, "distance matrix built");
    Ok(dm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_locations() -> Vec<Location> {
        vec![
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(1, "C1", 3.0, 4.0),
            Location::customer(2, "C2", 0.0, 8.0),
        ]
    }

    #[test]
    fn test_from_locations() {
        let dm = DistanceMatrix::from_locations(&sample_locations()).expect("valid");
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(1, 2) - 5.0).abs() < 1e-10);
        assert!(dm.has_zero_diagonal());
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_keyed_by_index_not_position() {
        let locations = vec![
            Location::customer(2, "C2", 0.0, 8.0),
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(1, "C1", 3.0, 4.0),
        ];
        let dm = DistanceMatrix::from_locations(&locations).expect("valid");
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(2, 0) - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_rounded_metric() {
        let locations = vec![
            Location::depot(0, "Depot A", 10.0, 50.0),
            Location::customer(1, "C1", 12.0, 45.0),
        ];
        let dm = build_distance_matrix(&locations, DistanceMetric::RoundedEuclidean).expect("valid");
        // sqrt(4 + 25) = 5.385...
        assert_eq!(dm.get(0, 1), 5.0);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            build_distance_matrix(&[], DistanceMetric::Euclidean),
            Err(FormulationError::EmptyLocationSet)
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let locations = vec![
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(1, "C1", f64::NAN, 4.0),
        ];
        assert!(matches!(
            DistanceMatrix::from_locations(&locations),
            Err(FormulationError::NonFiniteCoordinate { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_index() {
        let locations = vec![
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(0, "C1", 1.0, 4.0),
        ];
        assert!(matches!(
            DistanceMatrix::from_locations(&locations),
            Err(FormulationError::DuplicateIndex(0))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let locations = vec![
            Location::depot(0, "Depot", 0.0, 0.0),
            Location::customer(7, "C1", 1.0, 4.0),
        ];
        assert!(matches!(
            DistanceMatrix::from_locations(&locations),
            Err(FormulationError::IndexOutOfRange { index: 7, len: 2 })
        ));
    }

    #[test]
    fn test_from_data() {
        let dm = DistanceMatrix::from_data(2, vec![0.0, 5.0, 5.0, 0.0]).expect("valid");
        assert_eq!(dm.get(0, 1), 5.0);
        assert!(DistanceMatrix::from_data(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_path_length() {
        let dm = DistanceMatrix::from_locations(&sample_locations()).expect("valid");
        assert!((dm.path_length(&[0, 1, 2, 0]) - 18.0).abs() < 1e-10);
        assert_eq!(dm.path_length(&[0]), 0.0);
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }

    proptest! {
        #[test]
        fn prop_symmetric_zero_diagonal(
            coords in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..25),
            rounded in any::<bool>(),
        ) {
            let locations: Vec<Location> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Location::customer(i, format!("L{i}"), x, y))
                .collect();
            let metric = if rounded { DistanceMetric::RoundedEuclidean } else { DistanceMetric::Euclidean };
            let dm = build_distance_matrix(&locations, metric).expect("valid");
            prop_assert!(dm.has_zero_diagonal());
            prop_assert!(dm.is_symmetric(0.0));
            for i in 0..dm.size() {
                for j in 0..dm.size() {
                    prop_assert!(dm.get(i, j) >= 0.0);
                }
            }
        }
    }
}
