//! HTTP adapter for a remote CVRP solver.
//!
//! Sends the instance to an external optimization service and decodes the
//! returned per-vehicle routes. The adapter tolerates every failure mode
//! (connection errors, non-2xx statuses, malformed payloads, a missing
//! configuration) by falling back to Enhanced Clarke-Wright, so callers
//! always get routes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constructive::enhanced_clarke_wright;
use crate::models::{vehicle, Problem, Route};

/// Connection settings for the remote solver.
#[derive(Debug, Clone)]
pub struct ExternalSolverConfig {
    /// Service base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// HTTP timeout for the whole request.
    pub timeout_secs: u64,
    /// Solver time budget forwarded to the service.
    pub time_limit_seconds: u64,
}

impl ExternalSolverConfig {
    /// Config for the given base URL with the default 30 s HTTP timeout
    /// and 15 s solver budget.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            time_limit_seconds: 15,
        }
    }
}

/// Error type for remote solve attempts. Never escapes the adapter: every
/// variant maps to the Enhanced Clarke-Wright fallback.
#[derive(Debug)]
pub enum ExternalSolverError {
    /// HTTP request failed (connect, timeout, transport).
    RequestFailed(String),
    /// Service answered with a non-success status.
    ServiceError(String),
    /// Response body did not match the expected shape.
    ParseError(String),
    /// A demand exceeds every vehicle; the service would reject the
    /// instance, so no request is made.
    Infeasible(String),
}

impl fmt::Display for ExternalSolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExternalSolverError::RequestFailed(msg) => {
                write!(f, "external solver request failed: {msg}")
            }
            ExternalSolverError::ServiceError(msg) => write!(f, "external solver error: {msg}"),
            ExternalSolverError::ParseError(msg) => {
                write!(f, "failed to parse external solver response: {msg}")
            }
            ExternalSolverError::Infeasible(msg) => {
                write!(f, "instance infeasible for external solver: {msg}")
            }
        }
    }
}

impl std::error::Error for ExternalSolverError {}

#[derive(Debug, Serialize)]
struct LocationPayload {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct VehiclePayload {
    id: String,
    capacity: i32,
    fuel_cost_per_km: Option<f64>,
    driver_cost_per_km: Option<f64>,
    #[serde(rename = "type")]
    vehicle_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct SolveRequest {
    locations: Vec<LocationPayload>,
    vehicles: Vec<VehiclePayload>,
    demands: Vec<i32>,
    include_geometry: bool,
    time_limit_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct SolveResponse {
    result: Vec<VehicleRoutePayload>,
}

#[derive(Debug, Deserialize)]
struct VehicleRoutePayload {
    #[serde(rename = "Vehicle ID")]
    #[allow(dead_code)]
    vehicle_id: String,
    #[serde(rename = "Route Indices")]
    route_indices: Vec<usize>,
    #[serde(rename = "Distance (km)")]
    #[allow(dead_code)]
    distance_km: f64,
    #[serde(rename = "Load Carried")]
    #[allow(dead_code)]
    load_carried: i32,
}

/// Blocking HTTP client for the remote solver.
#[derive(Debug)]
pub struct ExternalSolverClient {
    config: ExternalSolverConfig,
    client: reqwest::blocking::Client,
}

impl ExternalSolverClient {
    /// Builds a client with the configured timeout.
    pub fn new(config: ExternalSolverConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Solves the instance remotely and decodes the routes.
    pub fn solve(&self, problem: &Problem) -> Result<Vec<Route>, ExternalSolverError> {
        let max_cap = vehicle::max_capacity(problem.vehicles());
        for &i in &problem.customers() {
            if problem.demand(i) > max_cap {
                return Err(ExternalSolverError::Infeasible(format!(
                    "demand {} at '{}' exceeds largest vehicle capacity {}",
                    problem.demand(i),
                    problem.location(i).id(),
                    max_cap
                )));
            }
        }

        let request = build_request(problem, self.config.time_limit_seconds);
        let url = format!("{}/optimize", self.config.base_url);

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .map_err(|e| ExternalSolverError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExternalSolverError::ServiceError(format!(
                "status {}",
                response.status()
            )));
        }

        let payload: SolveResponse = response
            .json()
            .map_err(|e| ExternalSolverError::ParseError(e.to_string()))?;

        decode_routes(problem, payload)
    }
}

/// Remote solve with fallback: no configuration, or any failure, yields the
/// Enhanced Clarke-Wright construction instead.
pub fn solve_or_fallback(problem: &Problem, config: Option<&ExternalSolverConfig>) -> Vec<Route> {
    let Some(config) = config else {
        log::debug!("external solver not configured, using enhanced Clarke-Wright");
        return enhanced_clarke_wright(problem);
    };

    let attempt = ExternalSolverClient::new(config.clone())
        .map_err(|e| ExternalSolverError::RequestFailed(e.to_string()))
        .and_then(|client| client.solve(problem));

    match attempt {
        Ok(routes) => routes,
        Err(e) => {
            log::warn!("external solver unavailable ({e}), falling back to enhanced Clarke-Wright");
            enhanced_clarke_wright(problem)
        }
    }
}

/// Builds the request payload: depot first with demand 0, then customers in
/// caller order; one vehicle entry per expanded slot.
fn build_request(problem: &Problem, time_limit_seconds: u64) -> SolveRequest {
    let depot = problem.location(problem.depot());
    let mut locations = vec![LocationPayload {
        name: depot.name().to_string(),
        latitude: depot.latitude(),
        longitude: depot.longitude(),
    }];
    let mut demands = vec![0];

    for &i in &problem.customers() {
        let loc = problem.location(i);
        locations.push(LocationPayload {
            name: loc.name().to_string(),
            latitude: loc.latitude(),
            longitude: loc.longitude(),
        });
        demands.push(loc.demand());
    }

    let mut vehicles = Vec::new();
    for t in problem.vehicles() {
        for k in 1..=t.count() {
            vehicles.push(VehiclePayload {
                id: format!("{}-{k}", t.id()),
                capacity: t.capacity(),
                fuel_cost_per_km: None,
                driver_cost_per_km: None,
                vehicle_type: Some(t.name().to_string()),
            });
        }
    }

    SolveRequest {
        locations,
        vehicles,
        demands,
        include_geometry: false,
        time_limit_seconds,
    }
}

/// Maps payload route indices (0 = depot, k = k-th customer) back into
/// arena-indexed routes.
fn decode_routes(
    problem: &Problem,
    payload: SolveResponse,
) -> Result<Vec<Route>, ExternalSolverError> {
    let customers = problem.customers();
    let mut routes = Vec::with_capacity(payload.result.len());

    for vehicle_route in payload.result {
        let mut interior = Vec::new();
        for idx in vehicle_route.route_indices {
            if idx == 0 {
                continue;
            }
            let arena = customers.get(idx - 1).copied().ok_or_else(|| {
                ExternalSolverError::ParseError(format!("route index {idx} out of range"))
            })?;
            interior.push(arena);
        }
        if !interior.is_empty() {
            routes.push(Route::from_interior(problem, &interior));
        }
    }

    Ok(routes)
}
