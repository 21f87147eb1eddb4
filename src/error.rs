//! Error types.

use thiserror::Error;

/// Malformed input detected before the solver is invoked.
#[derive(Debug, Error)]
pub enum FormulationError {
    #[error("no locations given")]
    EmptyLocationSet,

    #[error("location {index} ({name}) has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize, name: String },

    #[error("location index {0} appears more than once")]
    DuplicateIndex(usize),

    #[error("location index {index} is out of range for {len} locations")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("location name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("scenario has no depot")]
    NoDepot,

    #[error("unknown depot {0:?}")]
    UnknownDepot(String),

    #[error("location {0} is not a depot")]
    NotADepot(usize),

    #[error("fleet has no vehicles")]
    EmptyFleet,

    #[error("capacity limit must be strictly positive")]
    NonPositiveCapacity,

    #[error("distance limit must be strictly positive and finite, got {0}")]
    NonPositiveDistance(f64),

    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw solver output that does not describe routes of the formulation.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("expected {expected} routes, solver returned {actual}")]
    RouteCount { expected: usize, actual: usize },

    #[error("route of vehicle {vehicle} is empty")]
    EmptyPath { vehicle: usize },

    #[error("route of vehicle {vehicle} references unknown location {index}")]
    UnknownLocation { vehicle: usize, index: usize },

    #[error("route of vehicle {vehicle} must start and end at depot {depot}")]
    NotAnchored { vehicle: usize, depot: usize },

    #[error("route of vehicle {vehicle} passes through depot {depot} mid-route")]
    DepotMidRoute { vehicle: usize, depot: usize },
}

/// Failure while rendering a solution plot.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("failed to write plot: {0}")]
    Io(#[from] std::io::Error),
}
