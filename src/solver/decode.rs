//! Raw backend paths to domain routes.

use crate::error::DecodeError;
use crate::evaluation::RouteEvaluator;
use crate::formulation::Formulation;
use crate::models::Solution;

use super::RawSolution;

/// Maps per-vehicle index paths to a [`Solution`].
///
/// Each path must be `[depot, c…, depot]` for its vehicle's depot, with
/// only customers in between. Route distances are recomputed from the
/// formulation's matrix; the backend's objective is not trusted. Bounds are
/// not checked here.
///
/// # Errors
///
/// [`DecodeError`] when the paths do not describe one route per vehicle of
/// the formulation.
///
/// # Examples
///
/// ```
/// use collab_routing::models::Location;
/// use collab_routing::formulation::ProblemFormulator;
/// use collab_routing::solver::{decode, RawSolution};
///
/// let formulation = ProblemFormulator::new(vec![
///     Location::depot(0, "Depot", 0.0, 0.0),
///     Location::customer(1, "C1", 3.0, 4.0),
/// ])
/// .vehicles(vec![0])
/// .build()
/// .unwrap();
///
/// let raw = RawSolution { paths: vec![vec![0, 1, 0]], objective: 10.0 };
/// let solution = decode(&raw, &formulation).unwrap();
/// assert_eq!(solution.routes()[0].stops()[0].name(), "C1");
/// assert!((solution.total_distance() - 10.0).abs() < 1e-10);
/// ```
pub fn decode(raw: &RawSolution, formulation: &Formulation) -> Result<Solution, DecodeError> {
    let vehicles = formulation.vehicles();
    if raw.paths.len() != vehicles.len() {
        return Err(DecodeError::RouteCount {
            expected: vehicles.len(),
            actual: raw.paths.len(),
        });
    }

    let n = formulation.locations().len();
    let evaluator = RouteEvaluator::new(formulation);
    let mut routes = Vec::with_capacity(vehicles.len());
    for (vehicle, path) in raw.paths.iter().enumerate() {
        if path.is_empty() {
            return Err(DecodeError::EmptyPath { vehicle });
        }
        if let Some(&index) = path.iter().find(|&&i| i >= n) {
            return Err(DecodeError::UnknownLocation { vehicle, index });
        }
        let depot = vehicles[vehicle].depot();
        if path.len() < 2 || path[0] != depot || path[path.len() - 1] != depot {
            return Err(DecodeError::NotAnchored { vehicle, depot });
        }
        let customers = &path[1..path.len() - 1];
        if let Some(&d) = customers.iter().find(|&&i| formulation.location(i).is_depot()) {
            return Err(DecodeError::DepotMidRoute { vehicle, depot: d });
        }
        let (route, _) = evaluator.build_route(vehicle, customers);
        routes.push(route);
    }
    Ok(Solution::new(routes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::ProblemFormulator;
    use crate::models::Location;

    fn formulation() -> Formulation {
        ProblemFormulator::new(vec![
            Location::depot(0, "Depot A", 0.0, 0.0),
            Location::depot(1, "Depot B", 10.0, 0.0),
            Location::customer(2, "C1", 0.0, 3.0),
            Location::customer(3, "C2", 10.0, 4.0),
        ])
        .vehicles(vec![0, 1])
        .build()
        .expect("valid")
    }

    fn raw(paths: Vec<Vec<usize>>) -> RawSolution {
        RawSolution {
            paths,
            objective: 0.0,
        }
    }

    #[test]
    fn test_decode_routes() {
        let f = formulation();
        let s = decode(&raw(vec![vec![0, 2, 0], vec![1, 3, 1]]), &f).expect("valid");
        assert_eq!(s.num_routes(), 2);
        assert_eq!(s.routes()[0].node_indices(), vec![0, 2, 0]);
        assert_eq!(s.routes()[1].depot().name(), "Depot B");
        assert!((s.total_distance() - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_decode_idle_vehicle() {
        let f = formulation();
        let s = decode(&raw(vec![vec![0, 2, 3, 0], vec![1, 1]]), &f).expect("valid");
        assert!(s.routes()[1].is_empty());
        assert_eq!(s.routes()[1].distance(), 0.0);
        assert_eq!(s.num_active(), 1);
    }

    #[test]
    fn test_decode_is_pure() {
        let f = formulation();
        let r = raw(vec![vec![0, 2, 0], vec![1, 3, 1]]);
        assert_eq!(decode(&r, &f), decode(&r, &f));
    }

    #[test]
    fn test_malformed_paths() {
        let f = formulation();
        assert_eq!(
            decode(&raw(vec![vec![0, 2, 0]]), &f),
            Err(DecodeError::RouteCount {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            decode(&raw(vec![vec![], vec![1, 1]]), &f),
            Err(DecodeError::EmptyPath { vehicle: 0 })
        );
        assert_eq!(
            decode(&raw(vec![vec![0, 9, 0], vec![1, 1]]), &f),
            Err(DecodeError::UnknownLocation {
                vehicle: 0,
                index: 9
            })
        );
        assert_eq!(
            decode(&raw(vec![vec![0, 2, 0], vec![0, 3, 1]]), &f),
            Err(DecodeError::NotAnchored {
                vehicle: 1,
                depot: 1
            })
        );
        assert_eq!(
            decode(&raw(vec![vec![0], vec![1, 1]]), &f),
            Err(DecodeError::NotAnchored {
                vehicle: 0,
                depot: 0
            })
        );
        assert_eq!(
            decode(&raw(vec![vec![0, 2, 1, 0], vec![1, 3, 1]]), &f),
            Err(DecodeError::DepotMidRoute {
                vehicle: 0,
                depot: 1
            })
        );
    }
}
