//! Serialized solution surface.
//!
//! Wire records mirror the shapes downstream consumers bind to (exports,
//! comparison views): camelCase field names, stops denormalized with name
//! and coordinates, depot sentinels included. Kept separate from the
//! domain types so the solver's internal representation can stay
//! arena-indexed.

use serde::{Deserialize, Serialize};

use crate::models::{AlgorithmResult, Problem, Route, SolveResult};

/// A stop with its location data denormalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    /// Location id.
    pub id: String,
    /// Location name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Demand at this stop (zero for the depot).
    pub demand: i32,
    /// Position within the route.
    pub order: usize,
}

/// A route as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// All stops, depot sentinels included.
    pub stops: Vec<StopRecord>,
    /// Assigned vehicle slot id, if any.
    pub vehicle: Option<String>,
    /// Assigned vehicle name or the unassigned marker.
    pub vehicle_name: Option<String>,
    /// Sum of demand over the interior stops.
    pub total_capacity: i32,
    /// Total distance, km.
    pub distance: f64,
    /// Total duration, minutes.
    pub duration: f64,
    /// Whether no slot could carry this route.
    pub capacity_exceeded: bool,
}

impl RouteRecord {
    /// Denormalizes a route against the location arena.
    pub fn from_route(route: &Route, problem: &Problem) -> Self {
        let stops = route
            .stops()
            .iter()
            .map(|stop| {
                let loc = problem.location(stop.location);
                StopRecord {
                    id: loc.id().to_string(),
                    name: loc.name().to_string(),
                    latitude: loc.latitude(),
                    longitude: loc.longitude(),
                    demand: loc.demand(),
                    order: stop.order,
                }
            })
            .collect();

        Self {
            stops,
            vehicle: route.vehicle().map(str::to_string),
            vehicle_name: route.vehicle_name().map(str::to_string),
            total_capacity: route.total_capacity(),
            distance: route.distance(),
            duration: route.duration(),
            capacity_exceeded: route.capacity_exceeded(),
        }
    }

    /// Rebuilds a domain route by looking each stop id back up in the
    /// arena. Returns `None` if a stop id is unknown or the record has no
    /// depot sentinels.
    pub fn into_route(&self, problem: &Problem) -> Option<Route> {
        if self.stops.len() < 2 {
            return None;
        }
        let interior: Option<Vec<usize>> = self.stops[1..self.stops.len() - 1]
            .iter()
            .map(|s| problem.index_of(&s.id))
            .collect();
        let mut route = Route::from_interior(problem, &interior?);

        if self.capacity_exceeded {
            route.mark_capacity_exceeded(self.vehicle_name.clone().unwrap_or_default());
        } else if let (Some(vehicle), Some(name)) = (&self.vehicle, &self.vehicle_name) {
            route.assign_vehicle(vehicle.clone(), name.clone());
        }
        Some(route)
    }
}

/// One algorithm's result as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmResultRecord {
    /// Algorithm tag.
    pub algorithm: String,
    /// The assigned routes.
    pub routes: Vec<RouteRecord>,
    /// Total distance, km.
    pub total_distance: f64,
    /// Total duration, minutes.
    pub total_duration: f64,
    /// Wall-clock solve time, ms.
    pub execution_time: f64,
    /// Unique non-depot locations served.
    pub locations_served: usize,
    /// Served / non-depot count, percent.
    pub coverage_percent: f64,
    /// Fleet capacity across all slots.
    pub total_fleet_capacity: i64,
    /// Served demand / fleet capacity, percent.
    pub utilization_percent: f64,
    /// Number of routes.
    pub routes_count: usize,
    /// Mean route distance, km.
    pub avg_route_distance: f64,
    /// Mean route duration, minutes.
    pub avg_route_duration: f64,
    /// Failure description, if the algorithm failed.
    pub error: Option<String>,
}

impl AlgorithmResultRecord {
    /// Converts a result for persistence.
    pub fn from_result(result: &AlgorithmResult, problem: &Problem) -> Self {
        Self {
            algorithm: result.algorithm.tag().to_string(),
            routes: result
                .routes
                .iter()
                .map(|r| RouteRecord::from_route(r, problem))
                .collect(),
            total_distance: result.metrics.total_distance,
            total_duration: result.metrics.total_duration,
            execution_time: result.metrics.execution_time_ms,
            locations_served: result.metrics.locations_served,
            coverage_percent: result.metrics.coverage_percent,
            total_fleet_capacity: result.metrics.total_fleet_capacity,
            utilization_percent: result.metrics.utilization_percent,
            routes_count: result.metrics.num_routes,
            avg_route_distance: result.metrics.avg_route_distance,
            avg_route_duration: result.metrics.avg_route_duration,
            error: result.error.clone(),
        }
    }
}

/// The solve envelope as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SolveResultRecord {
    /// Winner (compare mode) or the requested algorithm.
    pub selected_algorithm: String,
    /// The selected routes.
    pub routes: Vec<RouteRecord>,
    /// Total distance of the selected routes, km.
    pub total_distance: f64,
    /// Total duration of the selected routes, minutes.
    pub total_duration: f64,
    /// Every algorithm's result.
    pub algorithm_results: Vec<AlgorithmResultRecord>,
    /// Whether this envelope came from a comparison run.
    pub comparison_run: bool,
}

impl SolveResultRecord {
    /// Converts a solve envelope for persistence.
    pub fn from_result(result: &SolveResult, problem: &Problem) -> Self {
        Self {
            selected_algorithm: result.selected_algorithm.tag().to_string(),
            routes: result
                .routes
                .iter()
                .map(|r| RouteRecord::from_route(r, problem))
                .collect(),
            total_distance: result.total_distance,
            total_duration: result.total_duration,
            algorithm_results: result
                .algorithm_results
                .iter()
                .map(|r| AlgorithmResultRecord::from_result(r, problem))
                .collect(),
            comparison_run: result.comparison_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    fn problem() -> Problem {
        Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("a", "Shop A", 0.0, 1.0, 5),
                Location::new("b", "Shop B", 0.0, 2.0, 7),
            ],
            vec![VehicleType::new("van", "Van", 20, 1)],
        )
        .expect("valid")
    }

    #[test]
    fn test_route_record_field_names() {
        let p = problem();
        let mut route = Route::from_interior(&p, &[1, 2]);
        route.assign_vehicle("van-1", "Van");
        let record = RouteRecord::from_route(&route, &p);
        let json = serde_json::to_value(&record).expect("serializable");

        assert!(json.get("totalCapacity").is_some());
        assert!(json.get("capacityExceeded").is_some());
        assert!(json.get("vehicleName").is_some());
        assert_eq!(json["stops"][0]["name"], "Depot");
        assert_eq!(json["stops"][1]["demand"], 5);
        assert_eq!(json["stops"][1]["order"], 1);
        assert_eq!(json["vehicle"], "van-1");
    }

    #[test]
    fn test_route_round_trip() {
        let p = problem();
        let mut route = Route::from_interior(&p, &[2, 1]);
        route.assign_vehicle("van-1", "Van");

        let json = serde_json::to_string(&RouteRecord::from_route(&route, &p)).expect("encodes");
        let decoded: RouteRecord = serde_json::from_str(&json).expect("decodes");
        let rebuilt = decoded.into_route(&p).expect("known ids");

        assert_eq!(rebuilt.interior_indices(), route.interior_indices());
        assert_eq!(rebuilt.vehicle(), route.vehicle());
        assert!((rebuilt.distance() - route.distance()).abs() < 1e-6);
        assert!((rebuilt.duration() - route.duration()).abs() < 1e-6);
        assert_eq!(rebuilt.total_capacity(), route.total_capacity());
    }

    #[test]
    fn test_capacity_exceeded_round_trip() {
        let p = problem();
        let mut route = Route::from_interior(&p, &[1]);
        route.mark_capacity_exceeded("Unassigned — Insufficient Capacity");

        let record = RouteRecord::from_route(&route, &p);
        let rebuilt = record.into_route(&p).expect("known ids");
        assert!(rebuilt.capacity_exceeded());
        assert_eq!(rebuilt.vehicle(), None);
    }

    #[test]
    fn test_unknown_stop_id_rejected() {
        let p = problem();
        let route = Route::from_interior(&p, &[1]);
        let mut record = RouteRecord::from_route(&route, &p);
        record.stops[1].id = "ghost".into();
        assert!(record.into_route(&p).is_none());
    }
}
