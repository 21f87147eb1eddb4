use std::collections::HashMap;
use std::time::Duration;

use proptest::prelude::*;

use collab_routing::error::{DecodeError, FormulationError};
use collab_routing::formulation::{Formulation, ProblemFormulator};
use collab_routing::models::{Location, Solution, ViolationType};
use collab_routing::scenario::Scenario;
use collab_routing::solver::{
    solve, BackendResponse, FirstSolutionStrategy, LocalSearchBackend, LocalSearchMetaheuristic,
    RawResult, RawSolution, SearchParameters, SearchStats, SolveOutcome, SolverBackend,
    StopReason,
};

fn params(seed: u64) -> SearchParameters {
    SearchParameters::default()
        .with_time_limit(Duration::from_secs(30))
        .with_iteration_limit(100)
        .with_seed(seed)
}

/// Two depots 50 apart with four customers around each.
fn eight_customers(vehicles: Vec<usize>) -> Formulation {
    ProblemFormulator::new(vec![
        Location::depot(0, "Depot A", 10.0, 50.0),
        Location::depot(1, "Depot B", 60.0, 50.0),
        Location::customer(2, "C1", 12.0, 45.0),
        Location::customer(3, "C2", 15.0, 55.0),
        Location::customer(4, "C3", 20.0, 48.0),
        Location::customer(5, "C4", 18.0, 60.0),
        Location::customer(6, "C5", 58.0, 47.0),
        Location::customer(7, "C6", 62.0, 53.0),
        Location::customer(8, "C7", 65.0, 48.0),
        Location::customer(9, "C8", 55.0, 60.0),
    ])
    .vehicles(vehicles)
    .capacity(4)
    .max_distance(120.0)
    .build()
    .expect("valid")
}

fn assert_valid(solution: &Solution, formulation: &Formulation, minimum_load: bool) {
    let mut visits: HashMap<usize, usize> = HashMap::new();
    for route in solution.routes() {
        let vehicle = &formulation.vehicles()[route.vehicle_id()];
        assert_eq!(route.depot().index(), vehicle.depot());
        assert!(route.len() as u32 <= vehicle.capacity());
        assert!(route.distance() <= vehicle.max_distance() + 1e-9);
        if minimum_load {
            assert!(!route.is_empty(), "truck {} is idle", route.vehicle_id());
        }
        let recomputed = formulation
            .distances()
            .path_length(&route.node_indices());
        assert!((recomputed - route.distance()).abs() < 1e-9);
        for c in route.customer_indices() {
            *visits.entry(c).or_default() += 1;
        }
    }
    for c in formulation.customers() {
        assert_eq!(visits.get(&c), Some(&1), "customer {c}");
    }
    assert_eq!(visits.len(), formulation.num_customers());
}

#[test]
fn test_every_truck_serves_a_customer() {
    let f = eight_customers(vec![0, 0, 1, 1]);
    let report = solve(&f, &params(11), &LocalSearchBackend).expect("decodes");
    let SolveOutcome::Feasible(solution) = &report.outcome else {
        panic!("expected feasible, got {:?}", report.outcome);
    };
    assert_eq!(solution.num_active(), 4);
    assert_eq!(solution.num_served(), 8);
    assert_valid(solution, &f, true);
    assert_eq!(report.stats.stop_reason, StopReason::IterationLimit);
}

#[test]
fn test_both_strategies_and_metaheuristics() {
    let f = eight_customers(vec![0, 0, 1, 1]);
    for first in [
        FirstSolutionStrategy::PathCheapestArc,
        FirstSolutionStrategy::ParallelCheapestInsertion,
    ] {
        for meta in [
            LocalSearchMetaheuristic::GreedyDescent,
            LocalSearchMetaheuristic::GuidedLocalSearch,
        ] {
            let p = params(5).with_first_solution(first).with_metaheuristic(meta);
            let report = solve(&f, &p, &LocalSearchBackend).expect("decodes");
            let solution = report.outcome.solution().expect("solution");
            assert!(report.outcome.is_feasible(), "{first:?} {meta:?}");
            assert_valid(solution, &f, true);
        }
    }
}

#[test]
fn test_more_trucks_than_customers() {
    let f = ProblemFormulator::new(vec![
        Location::depot(0, "Depot A", 10.0, 50.0),
        Location::depot(1, "Depot B", 60.0, 50.0),
        Location::customer(2, "C1", 12.0, 45.0),
        Location::customer(3, "C2", 15.0, 55.0),
        Location::customer(4, "C3", 58.0, 47.0),
    ])
    .vehicles(vec![0, 0, 1, 1])
    .build()
    .expect("valid");
    let report = solve(&f, &params(1), &LocalSearchBackend).expect("decodes");
    assert!(matches!(report.outcome, SolveOutcome::NoSolution { .. }));
    assert_eq!(report.stats.stop_reason, StopReason::NoFirstSolution);
}

#[test]
fn test_idle_trucks_allowed_without_minimum_load() {
    let f = ProblemFormulator::new(vec![
        Location::depot(0, "Depot A", 10.0, 50.0),
        Location::depot(1, "Depot B", 60.0, 50.0),
        Location::customer(2, "C1", 12.0, 45.0),
        Location::customer(3, "C2", 15.0, 55.0),
        Location::customer(4, "C3", 58.0, 47.0),
    ])
    .vehicles(vec![0, 0, 1, 1])
    .minimum_load(false)
    .build()
    .expect("valid");
    let report = solve(&f, &params(1), &LocalSearchBackend).expect("decodes");
    let SolveOutcome::Feasible(solution) = &report.outcome else {
        panic!("expected feasible, got {:?}", report.outcome);
    };
    assert!(solution.num_active() < 4);
    assert_valid(solution, &f, false);
}

#[test]
fn test_same_seed_same_solution() {
    let f = eight_customers(vec![0, 0, 1, 1]);
    let a = solve(&f, &params(42), &LocalSearchBackend).expect("decodes");
    let b = solve(&f, &params(42), &LocalSearchBackend).expect("decodes");
    assert_eq!(a.outcome, b.outcome);
}

#[test]
fn test_default_scenario() {
    let scenario = Scenario::default();
    let f = ProblemFormulator::from_scenario(&scenario)
        .and_then(ProblemFormulator::build)
        .expect("valid");
    let p = scenario.search.clone().with_iteration_limit(100).with_seed(7);
    let report = solve(&f, &p, &LocalSearchBackend).expect("decodes");
    let SolveOutcome::Feasible(solution) = &report.outcome else {
        panic!("expected feasible, got {:?}", report.outcome);
    };
    assert_eq!(solution.num_routes(), 4);
    assert_eq!(solution.num_served(), 12);
    assert_valid(solution, &f, true);
}

#[test]
fn test_time_limit_beyond_clock_range() {
    let mut json = serde_json::to_value(Scenario::default()).expect("serialize");
    json["search"]["time_limit_secs"] = serde_json::json!(1e19);
    json["search"]["iteration_limit"] = serde_json::json!(10);
    json["search"]["seed"] = serde_json::json!(4);
    let scenario = Scenario::from_json(&json.to_string()).expect("parse");
    let f = ProblemFormulator::from_scenario(&scenario)
        .and_then(ProblemFormulator::build)
        .expect("valid");
    let report = solve(&f, &scenario.search, &LocalSearchBackend).expect("decodes");
    assert!(report.outcome.is_feasible(), "{:?}", report.outcome);
    assert_eq!(report.stats.stop_reason, StopReason::IterationLimit);
}

#[test]
fn test_scenario_from_json() {
    let text = r#"{
        "name": "corridor",
        "locations": [
            {"name": "North", "x": 0.0, "y": 10.0, "role": "depot"},
            {"name": "South", "x": 0.0, "y": -10.0, "role": "depot"},
            {"name": "N1", "x": 1.0, "y": 9.0, "role": "customer"},
            {"name": "N2", "x": -1.0, "y": 11.0, "role": "customer"},
            {"name": "S1", "x": 2.0, "y": -9.0, "role": "customer"}
        ],
        "fleet": [
            {"depot": "North", "vehicles": 1},
            {"depot": "South", "vehicles": 1}
        ],
        "capacity": 2,
        "max_distance": 50.0,
        "search": {"metaheuristic": "greedy_descent", "seed": 3}
    }"#;
    let scenario = Scenario::from_json(text).expect("parse");
    assert_eq!(scenario.search.metaheuristic, LocalSearchMetaheuristic::GreedyDescent);
    let f = ProblemFormulator::from_scenario(&scenario)
        .and_then(ProblemFormulator::build)
        .expect("valid");
    let report = solve(&f, &scenario.search, &LocalSearchBackend).expect("decodes");
    let solution = report.outcome.solution().expect("solution");
    assert!(report.outcome.is_feasible());
    assert_eq!(solution.routes()[0].customer_indices().len(), 2);
    assert_eq!(solution.routes()[1].customer_indices(), vec![4]);
}

#[test]
fn test_malformed_scenario_rejected_before_solving() {
    let mut scenario = Scenario::default();
    scenario.locations[4].x = f64::NAN;
    let err = ProblemFormulator::from_scenario(&scenario).and_then(ProblemFormulator::build);
    assert!(matches!(err, Err(FormulationError::NonFiniteCoordinate { index: 4, .. })));

    let mut scenario = Scenario::default();
    scenario.max_distance = -1.0;
    let err = ProblemFormulator::from_scenario(&scenario).and_then(ProblemFormulator::build);
    assert!(matches!(err, Err(FormulationError::NonPositiveDistance(_))));
}

/// Hands back fixed paths.
struct Fixed(Vec<Vec<usize>>);

impl SolverBackend for Fixed {
    fn solve(&self, _: &Formulation, _: &SearchParameters) -> RawResult {
        RawResult {
            response: BackendResponse::Solved(RawSolution {
                paths: self.0.clone(),
                objective: 0.0,
            }),
            stats: SearchStats {
                iterations: 0,
                elapsed: Duration::ZERO,
                stop_reason: StopReason::TimeLimit,
                initial_cost: None,
                best_cost: None,
            },
        }
    }
}

#[test]
fn test_backend_shortcuts_are_degraded() {
    let f = eight_customers(vec![0, 0, 1, 1]);
    // truck 1 idle, truck 0 over capacity
    let backend = Fixed(vec![
        vec![0, 2, 3, 4, 5, 6, 0],
        vec![0, 0],
        vec![1, 7, 8, 1],
        vec![1, 9, 1],
    ]);
    let report = solve(&f, &params(1), &backend).expect("decodes");
    let SolveOutcome::Degraded { violations, .. } = &report.outcome else {
        panic!("expected degraded, got {:?}", report.outcome);
    };
    assert!(violations.iter().any(|v| v.kind
        == ViolationType::CapacityExceeded {
            vehicle_id: 0,
            load: 5,
            capacity: 4
        }));
    assert!(violations
        .iter()
        .any(|v| v.kind == ViolationType::IdleVehicle { vehicle_id: 1 }));
}

#[test]
fn test_malformed_backend_output() {
    let f = eight_customers(vec![0, 0, 1, 1]);
    let backend = Fixed(vec![
        vec![0, 2, 3, 0],
        vec![0, 4, 5, 0],
        vec![1, 6, 7, 0],
        vec![1, 8, 9, 1],
    ]);
    assert_eq!(
        solve(&f, &params(1), &backend),
        Err(DecodeError::NotAnchored {
            vehicle: 2,
            depot: 1
        })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_solutions_respect_every_dimension(
        coords in prop::collection::vec((0.0f64..30.0, 0.0f64..30.0), 4..=12),
        seed in any::<u64>(),
    ) {
        let mut locations = vec![
            Location::depot(0, "Depot A", 0.0, 0.0),
            Location::depot(1, "Depot B", 30.0, 0.0),
        ];
        for (i, (x, y)) in coords.iter().enumerate() {
            locations.push(Location::customer(i + 2, format!("C{}", i + 1), *x, *y));
        }
        let f = ProblemFormulator::new(locations)
            .vehicles(vec![0, 0, 1, 1])
            .capacity(4)
            .max_distance(500.0)
            .build()
            .expect("valid");

        let p = SearchParameters::default()
            .with_time_limit(Duration::from_secs(30))
            .with_iteration_limit(20)
            .with_seed(seed);
        let report = solve(&f, &p, &LocalSearchBackend).expect("decodes");
        prop_assert!(report.outcome.is_feasible(), "{:?}", report.outcome);
        let solution = report.outcome.solution().expect("solution");
        assert_valid(solution, &f, true);
        prop_assert_eq!(solution.num_active(), 4);
    }

    /// Customers sit within 6 units of their depot and the depots are 60
    /// apart, so the distance bound rules out any cross-depot service. The
    /// bound is 5% above the longest witness route and the capacity is the
    /// largest witness route, so both dimensions bind.
    #[test]
    fn prop_binding_distance_bound_keeps_witness_solvable(
        offsets in prop::collection::vec(
            prop::collection::vec((-6.0f64..6.0, -6.0f64..6.0), 1..=3),
            4,
        ),
        seed in any::<u64>(),
    ) {
        let depots = [
            Location::depot(0, "Depot A", 0.0, 0.0),
            Location::depot(1, "Depot B", 60.0, 0.0),
        ];
        let fleet = vec![0, 0, 1, 1];
        let mut locations = depots.to_vec();
        let mut witness = Vec::new();
        let mut longest: f64 = 0.0;
        for (v, stops) in offsets.iter().enumerate() {
            let depot = &depots[fleet[v]];
            let mut path = vec![depot.index()];
            let mut length = 0.0;
            let mut prev = depot.clone();
            for (dx, dy) in stops {
                let index = locations.len();
                let c = Location::customer(
                    index,
                    format!("C{}", index - 1),
                    depot.x() + dx,
                    depot.y() + dy,
                );
                length += prev.distance_to(&c);
                path.push(index);
                locations.push(c.clone());
                prev = c;
            }
            length += prev.distance_to(depot);
            path.push(depot.index());
            longest = longest.max(length);
            witness.push(path);
        }
        let capacity = offsets.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let f = ProblemFormulator::new(locations)
            .vehicles(fleet)
            .capacity(capacity)
            .max_distance(longest * 1.05 + 1e-6)
            .build()
            .expect("valid");

        let known = solve(&f, &params(1), &Fixed(witness)).expect("decodes");
        prop_assert!(known.outcome.is_feasible(), "{:?}", known.outcome);

        let p = SearchParameters::default()
            .with_time_limit(Duration::from_secs(30))
            .with_iteration_limit(20)
            .with_seed(seed);
        let report = solve(&f, &p, &LocalSearchBackend).expect("decodes");
        prop_assert!(
            !matches!(report.outcome, SolveOutcome::NoSolution { .. }),
            "{:?}",
            report.outcome
        );
        prop_assert!(report.outcome.is_feasible(), "{:?}", report.outcome);
        let solution = report.outcome.solution().expect("solution");
        assert_valid(solution, &f, true);
    }
}
