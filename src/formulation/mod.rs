//! Problem formulation handed to the solver.
//!
//! - [`build_distance_matrix`](crate::distance::build_distance_matrix) — arc costs
//! - [`define_constraints`] — fleet with `Capacity` and `Distance` dimensions
//! - [`ConstraintSet::enforce_minimum_load`] — `ArcCount` dimension, one customer per vehicle
//! - [`ProblemFormulator`] — runs the steps above in order and yields a [`Formulation`]

mod constraints;
mod formulator;

pub use constraints::{
    define_constraints, ConstraintSet, Dimension, DimensionBreach, Transit, ARC_COUNT, CAPACITY,
    DISTANCE,
};
pub use formulator::{Formulation, ProblemFormulator};
