//! # collab-routing
//!
//! Collaborative multi-depot delivery routing. Depots share one pool of
//! customers; every vehicle carries a bounded number of deliveries over a
//! bounded distance, and may be required to serve at least one customer so
//! that the workload is spread over the whole fleet.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Location, Vehicle, Route, Solution, Violation)
//! - [`distance`] — Distance matrix over indexed locations
//! - [`formulation`] — Dimensions, constraint set and the problem formulator
//! - [`scenario`] — Problem instances as JSON configuration
//! - [`constructive`] — First solutions (path cheapest arc, parallel cheapest insertion)
//! - [`local_search`] — Relocate, swap, 2-opt, 2-opt* and guided local search
//! - [`solver`] — Solver backend seam, decoding and auditing
//! - [`evaluation`] — Route building and feasibility audit
//! - [`report`] — Console report
//! - [`plot`] — SVG route plot

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod formulation;
pub mod local_search;
pub mod models;
pub mod plot;
pub mod report;
pub mod scenario;
pub mod solver;
