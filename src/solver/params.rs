//! Search directives passed to the solver collaborator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the first complete assignment is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolutionStrategy {
    /// Extend each route from its last node along the cheapest feasible arc.
    #[default]
    PathCheapestArc,
    /// Insert customers one at a time at the cheapest feasible position of
    /// any route.
    ParallelCheapestInsertion,
}

/// How the first solution is improved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSearchMetaheuristic {
    /// Accept improving moves until none is left.
    GreedyDescent,
    /// Escape local optima by penalising frequently used costly arcs.
    #[default]
    GuidedLocalSearch,
}

/// Search strategy and budget.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use collab_routing::solver::{LocalSearchMetaheuristic, SearchParameters};
///
/// let params = SearchParameters::default()
///     .with_time_limit(Duration::from_secs(2))
///     .with_iteration_limit(200)
///     .with_seed(7);
/// assert_eq!(params.metaheuristic, LocalSearchMetaheuristic::GuidedLocalSearch);
/// assert_eq!(params.iteration_limit, Some(200));
/// assert_eq!(params.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// First solution construction.
    pub first_solution: FirstSolutionStrategy,
    /// Improvement metaheuristic.
    pub metaheuristic: LocalSearchMetaheuristic,
    /// Wall-clock budget; the best solution found so far is returned when it
    /// runs out. A budget past the clock's range means no time limit.
    #[serde(rename = "time_limit_secs", with = "duration_secs")]
    pub time_limit: Duration,
    /// Maximum number of guided-local-search rounds (None for unbounded).
    pub iteration_limit: Option<usize>,
    /// Random seed (None for an OS-seeded run).
    pub seed: Option<u64>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            first_solution: FirstSolutionStrategy::PathCheapestArc,
            metaheuristic: LocalSearchMetaheuristic::GuidedLocalSearch,
            time_limit: Duration::from_secs(15),
            iteration_limit: Some(1000),
            seed: None,
        }
    }
}

impl SearchParameters {
    /// Sets the first solution strategy.
    pub fn with_first_solution(mut self, strategy: FirstSolutionStrategy) -> Self {
        self.first_solution = strategy;
        self
    }

    /// Sets the improvement metaheuristic.
    pub fn with_metaheuristic(mut self, metaheuristic: LocalSearchMetaheuristic) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the maximum number of rounds.
    pub fn with_iteration_limit(mut self, n: usize) -> Self {
        self.iteration_limit = Some(n);
        self
    }

    /// Removes the round limit; only the time limit stops the search.
    pub fn without_iteration_limit(mut self) -> Self {
        self.iteration_limit = None;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
