//! Domain model types for multi-depot delivery routing.
//!
//! Provides locations tagged as depots or customers, vehicles with
//! capacity and distance limits, decoded routes, and solutions with their
//! constraint violations.

mod location;
mod route;
mod solution;
mod vehicle;

pub use location::{Location, LocationRole};
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
pub use vehicle::Vehicle;
