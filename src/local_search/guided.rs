//! Guided local search penalties.
//!
//! # Algorithm
//!
//! The search descends on an augmented cost `d(a) + λ·p(a)`, where `p(a)`
//! counts how often arc `a` was penalised. At each local optimum, the arcs
//! of the current solution with maximal utility `d(a) / (1 + p(a))` are
//! penalised once more. Long arcs that keep reappearing become expensive, so
//! the descent is pushed out of the optimum it is stuck in.
//!
//! Penalties are stored per unordered pair, which keeps the augmented cost
//! symmetric for the 2-opt delta formula.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//! application to the traveling salesman problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use crate::distance::DistanceMatrix;
use crate::formulation::Formulation;

use super::{ArcCost, EPSILON};

/// Weight of the first local optimum's average arc cost in λ.
const LAMBDA_FACTOR: f64 = 0.1;

/// Distance plus weighted arc penalties.
#[derive(Debug, Clone, Copy)]
pub struct PenalizedCost<'a> {
    distances: &'a DistanceMatrix,
    penalties: &'a [u32],
    lambda: f64,
}

impl ArcCost for PenalizedCost<'_> {
    fn arc(&self, from: usize, to: usize) -> f64 {
        let n = self.distances.size();
        let p = self.penalties[from * n + to];
        self.distances.get(from, to) + self.lambda * f64::from(p)
    }
}

/// Penalty state of a guided local search run.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::local_search::{ArcCost, GuidedLocalSearch};
///
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 3.0, 4.0),
///     Location::customer(2, "C2", 1.0, 0.0),
/// ])
/// .vehicles(vec![0])
/// .minimum_load(false)
/// .build()
/// .unwrap();
///
/// let mut gls = GuidedLocalSearch::new(&formulation);
/// gls.calibrate(12.0, &formulation);
/// // Depot→C1 is the longest arc
/// assert_eq!(gls.penalize(&[vec![1, 2]], &formulation), 1);
/// assert_eq!(gls.penalty(0, 1), 1);
/// assert!(gls.cost(formulation.distances()).arc(1, 0) > 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct GuidedLocalSearch {
    penalties: Vec<u32>,
    size: usize,
    lambda: f64,
}

impl GuidedLocalSearch {
    /// Starts with no penalties and λ = 0.
    pub fn new(formulation: &Formulation) -> Self {
        let size = formulation.distances().size();
        Self {
            penalties: vec![0; size * size],
            size,
            lambda: 0.0,
        }
    }

    /// Sets λ from the cost of the first local optimum.
    ///
    /// A solution has one arc per customer plus one per vehicle, so λ is a
    /// tenth of the average arc cost.
    pub fn calibrate(&mut self, cost: f64, formulation: &Formulation) {
        let arcs = formulation.num_customers() + formulation.num_vehicles();
        self.lambda = LAMBDA_FACTOR * cost / arcs.max(1) as f64;
    }

    /// Current penalty weight.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Times the arc between `a` and `b` was penalised.
    pub fn penalty(&self, a: usize, b: usize) -> u32 {
        self.penalties[a * self.size + b]
    }

    /// Augmented cost over the given distances.
    pub fn cost<'a>(&'a self, distances: &'a DistanceMatrix) -> PenalizedCost<'a> {
        PenalizedCost {
            distances,
            penalties: &self.penalties,
            lambda: self.lambda,
        }
    }

    /// Penalises the maximal-utility arcs of a local optimum.
    ///
    /// Returns the number of arcs penalised; zero when every arc of the
    /// solution has zero length.
    pub fn penalize(&mut self, routes: &[Vec<usize>], formulation: &Formulation) -> usize {
        let distances = formulation.distances();
        let mut arcs = Vec::new();
        for (vehicle, route) in formulation.vehicles().iter().zip(routes) {
            if route.is_empty() {
                continue;
            }
            let depot = vehicle.depot();
            let mut prev = depot;
            for &c in route.iter().chain(std::iter::once(&depot)) {
                arcs.push((prev, c));
                prev = c;
            }
        }

        let utility = |&(a, b): &(usize, usize)| {
            distances.get(a, b) / (1.0 + f64::from(self.penalty(a, b)))
        };
        let max = arcs.iter().map(utility).fold(0.0, f64::max);
        if max <= EPSILON {
            return 0;
        }

        let chosen: Vec<(usize, usize)> = arcs
            .iter()
            .filter(|arc| utility(arc) >= max - EPSILON)
            .copied()
            .collect();
        for &(a, b) in &chosen {
            self.penalties[a * self.size + b] += 1;
            if a != b {
                self.penalties[b * self.size + a] += 1;
            }
        }
        chosen.len()
    }
}
