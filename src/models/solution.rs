//! Per-algorithm results and the solve envelope.

use std::collections::HashSet;

use crate::compare::Algorithm;
use crate::models::{vehicle, Problem, Route};

/// Quality metrics derived from one algorithm's route set.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionMetrics {
    /// Total distance across routes, km.
    pub total_distance: f64,
    /// Total duration across routes, minutes.
    pub total_duration: f64,
    /// Wall-clock solve time, milliseconds.
    pub execution_time_ms: f64,
    /// Unique non-depot locations served.
    pub locations_served: usize,
    /// Served / non-depot count, percent.
    pub coverage_percent: f64,
    /// Sum of capacity over every fleet slot.
    pub total_fleet_capacity: i64,
    /// Served demand / fleet capacity, percent.
    pub utilization_percent: f64,
    /// Number of routes.
    pub num_routes: usize,
    /// Mean route distance, km.
    pub avg_route_distance: f64,
    /// Mean route duration, minutes.
    pub avg_route_duration: f64,
}

impl SolutionMetrics {
    /// Computes metrics for a route set.
    pub fn compute(routes: &[Route], problem: &Problem, execution_time_ms: f64) -> Self {
        let total_distance: f64 = routes.iter().map(|r| r.distance()).sum();
        let total_duration: f64 = routes.iter().map(|r| r.duration()).sum();

        let served: HashSet<usize> = routes
            .iter()
            .flat_map(|r| r.interior().iter().map(|s| s.location))
            .collect();
        let locations_served = served.len();

        let num_customers = problem.num_customers();
        let coverage_percent = if num_customers == 0 {
            0.0
        } else {
            locations_served as f64 / num_customers as f64 * 100.0
        };

        let total_fleet_capacity = vehicle::fleet_capacity(problem.vehicles());
        let served_demand: i64 = routes.iter().map(|r| r.total_capacity() as i64).sum();
        let utilization_percent = if total_fleet_capacity > 0 {
            served_demand as f64 / total_fleet_capacity as f64 * 100.0
        } else {
            0.0
        };

        let num_routes = routes.len();
        let (avg_route_distance, avg_route_duration) = if num_routes == 0 {
            (0.0, 0.0)
        } else {
            (
                total_distance / num_routes as f64,
                total_duration / num_routes as f64,
            )
        };

        Self {
            total_distance,
            total_duration,
            execution_time_ms,
            locations_served,
            coverage_percent,
            total_fleet_capacity,
            utilization_percent,
            num_routes,
            avg_route_distance,
            avg_route_duration,
        }
    }

    /// Zeroed metrics for a failed algorithm.
    pub fn zeroed(execution_time_ms: f64) -> Self {
        Self {
            total_distance: 0.0,
            total_duration: 0.0,
            execution_time_ms,
            locations_served: 0,
            coverage_percent: 0.0,
            total_fleet_capacity: 0,
            utilization_percent: 0.0,
            num_routes: 0,
            avg_route_distance: 0.0,
            avg_route_duration: 0.0,
        }
    }
}

/// One algorithm's outcome inside a comparison run.
#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    /// Which algorithm produced this result.
    pub algorithm: Algorithm,
    /// The assigned routes (empty on failure).
    pub routes: Vec<Route>,
    /// Derived quality metrics (zeroed on failure).
    pub metrics: SolutionMetrics,
    /// Failure description, if the algorithm failed.
    pub error: Option<String>,
}

impl AlgorithmResult {
    /// A successful result.
    pub fn ok(
        algorithm: Algorithm,
        routes: Vec<Route>,
        problem: &Problem,
        execution_time_ms: f64,
    ) -> Self {
        let metrics = SolutionMetrics::compute(&routes, problem, execution_time_ms);
        Self {
            algorithm,
            routes,
            metrics,
            error: None,
        }
    }

    /// A failed result with zeroed metrics.
    pub fn failed(algorithm: Algorithm, message: String, execution_time_ms: f64) -> Self {
        Self {
            algorithm,
            routes: Vec::new(),
            metrics: SolutionMetrics::zeroed(execution_time_ms),
            error: Some(message),
        }
    }

    /// `true` when the algorithm produced routes without error.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// The envelope returned by [`solve`](crate::solve()).
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Winner in compare mode, or the requested algorithm in single mode.
    pub selected_algorithm: Algorithm,
    /// The selected algorithm's routes.
    pub routes: Vec<Route>,
    /// Total distance of the selected routes, km.
    pub total_distance: f64,
    /// Total duration of the selected routes, minutes.
    pub total_duration: f64,
    /// Every algorithm's result (one entry in single mode).
    pub algorithm_results: Vec<AlgorithmResult>,
    /// Whether this envelope came from a comparison run.
    pub comparison_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    fn problem() -> Problem {
        Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("a", "A", 0.0, 1.0, 5),
                Location::new("b", "B", 0.0, 2.0, 7),
            ],
            vec![VehicleType::new("v", "Van", 20, 2)],
        )
        .expect("valid")
    }

    #[test]
    fn test_metrics_full_coverage() {
        let p = problem();
        let routes = vec![Route::from_interior(&p, &[1]), Route::from_interior(&p, &[2])];
        let m = SolutionMetrics::compute(&routes, &p, 1.5);
        assert_eq!(m.locations_served, 2);
        assert_eq!(m.coverage_percent, 100.0);
        assert_eq!(m.total_fleet_capacity, 40);
        assert!((m.utilization_percent - 30.0).abs() < 1e-9);
        assert_eq!(m.num_routes, 2);
        assert!((m.avg_route_distance - m.total_distance / 2.0).abs() < 1e-9);
        assert_eq!(m.execution_time_ms, 1.5);
    }

    #[test]
    fn test_metrics_duplicates_counted_once() {
        let p = problem();
        let routes = vec![Route::from_interior(&p, &[1]), Route::from_interior(&p, &[1])];
        let m = SolutionMetrics::compute(&routes, &p, 0.0);
        assert_eq!(m.locations_served, 1);
        assert_eq!(m.coverage_percent, 50.0);
    }

    #[test]
    fn test_metrics_empty() {
        let p = problem();
        let m = SolutionMetrics::compute(&[], &p, 0.0);
        assert_eq!(m.num_routes, 0);
        assert_eq!(m.coverage_percent, 0.0);
        assert_eq!(m.avg_route_distance, 0.0);
    }

    #[test]
    fn test_failed_result() {
        let r = AlgorithmResult::failed(Algorithm::Genetic, "boom".into(), 3.0);
        assert!(!r.is_valid());
        assert_eq!(r.metrics.total_distance, 0.0);
        assert_eq!(r.error.as_deref(), Some("boom"));
    }
}
