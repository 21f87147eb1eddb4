//! Distance matrix construction.
//!
//! Provides a dense, index-keyed distance matrix and the validated builder
//! used by the problem formulator.

mod matrix;

pub use matrix::{build_distance_matrix, DistanceMatrix, DistanceMetric};
