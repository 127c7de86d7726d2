//! Nearest-neighbor constructive heuristic.
//!
//! Builds one route per vehicle slot: starting from the depot, always visit
//! the nearest unvisited customer whose demand still fits the slot. After
//! the slot pass, leftover customers are tried as singleton routes on the
//! first slot that can carry them.
//!
//! # Complexity
//!
//! O(s·n²) where n = customers and s = vehicle slots.

use crate::models::{vehicle, Problem, Route};

/// Constructs routes using the nearest-neighbor heuristic.
///
/// Routes are returned without vehicle assignments; empty routes are
/// skipped. A customer no slot can carry is left out entirely.
///
/// # Examples
///
/// ```
/// use fleet_routing::models::{Location, Problem, VehicleType};
/// use fleet_routing::constructive::nearest_neighbor;
///
/// let problem = Problem::new(
///     vec![
///         Location::depot("d", "Depot", 0.0, 0.0),
///         Location::new("a", "A", 0.0, 1.0, 10),
///         Location::new("b", "B", 0.0, 2.0, 10),
///     ],
///     vec![VehicleType::new("v", "Van", 30, 1)],
/// )
/// .unwrap();
///
/// let routes = nearest_neighbor(&problem);
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].interior_indices(), vec![1, 2]);
/// ```
pub fn nearest_neighbor(problem: &Problem) -> Vec<Route> {
    let n = problem.locations().len();
    if n <= 1 {
        return Vec::new();
    }

    let depot = problem.depot();
    let mut visited = vec![false; n];
    visited[depot] = true;

    let mut routes = Vec::new();

    for capacity in vehicle::slot_capacities(problem.vehicles()) {
        let mut current = depot;
        let mut remaining = capacity;
        let mut members = Vec::new();

        loop {
            let mut best: Option<(usize, f64)> = None;
            for i in 0..n {
                if visited[i] || problem.demand(i) > remaining {
                    continue;
                }
                let d = problem.distance(current, i);
                match best {
                    Some((_, best_d)) if d >= best_d => {}
                    _ => best = Some((i, d)),
                }
            }

            match best {
                Some((next, _)) => {
                    visited[next] = true;
                    remaining -= problem.demand(next);
                    members.push(next);
                    current = next;
                }
                None => break,
            }
        }

        if !members.is_empty() {
            routes.push(Route::from_interior(problem, &members));
        }
    }

    // Leftovers become singleton routes on the first slot that fits them.
    let slot_caps = vehicle::slot_capacities(problem.vehicles());
    for i in 0..n {
        if visited[i] {
            continue;
        }
        if slot_caps.iter().any(|&cap| problem.demand(i) <= cap) {
            visited[i] = true;
            routes.push(Route::from_interior(problem, &[i]));
        }
    }

    routes
}
