//! Route construction and feasibility auditing.

mod evaluator;

pub use evaluator::RouteEvaluator;
