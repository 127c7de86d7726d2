//! Metaheuristic improvement algorithms.
//!
//! - [`tabu_search`] — solution-key tabu memory over intra-route swaps
//! - [`simulated_annealing`] — geometric cooling with Metropolis acceptance
//! - [`genetic`] — population search with route-based crossover
//! - [`ant_colony`] — pheromone bookkeeping over randomized constructions
//!
//! All four operate on a compact working representation (interior index
//! vectors, no depot sentinels) so snapshotting a candidate solution is a
//! cheap vector clone, and convert back to full [`Route`]s on return. Each
//! consults the cancellation token between iterations.

mod ant_colony;
mod annealing;
mod genetic;
mod tabu;

pub use ant_colony::ant_colony;
pub use annealing::simulated_annealing;
pub use genetic::genetic;
pub use tabu::tabu_search;

use rand::Rng;

use crate::local_search::route_distance;
use crate::models::{vehicle, Problem, Route};

/// A solution under mutation: one interior index vector per route.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WorkingSolution {
    pub routes: Vec<Vec<usize>>,
}

impl WorkingSolution {
    /// Strips assigned routes down to their interiors.
    pub fn from_routes(routes: &[Route]) -> Self {
        Self {
            routes: routes.iter().map(|r| r.interior_indices()).collect(),
        }
    }

    /// Total distance across routes, depot legs included.
    pub fn total_distance(&self, problem: &Problem) -> f64 {
        let depot = problem.depot();
        let matrix = problem.matrix();
        self.routes
            .iter()
            .map(|r| route_distance(r, depot, matrix))
            .sum()
    }

    /// Canonical solution key: each route's stop identifiers (depot
    /// sentinels included) joined with `-`, the route strings sorted, then
    /// joined with `|`. Two solutions with the same key serve the same
    /// customers in the same per-route orders.
    pub fn key(&self, problem: &Problem) -> String {
        let depot_id = problem.location(problem.depot()).id();
        let mut route_keys: Vec<String> = self
            .routes
            .iter()
            .map(|r| {
                let mut ids = Vec::with_capacity(r.len() + 2);
                ids.push(depot_id);
                ids.extend(r.iter().map(|&loc| problem.location(loc).id()));
                ids.push(depot_id);
                ids.join("-")
            })
            .collect();
        route_keys.sort_unstable();
        route_keys.join("|")
    }

    /// Materializes non-empty routes with fresh metrics.
    pub fn to_routes(&self, problem: &Problem) -> Vec<Route> {
        self.routes
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| Route::from_interior(problem, r))
            .collect()
    }

    /// Drops repeated interior locations across routes, first occurrence
    /// wins, then removes emptied routes. Restores the at-most-once
    /// invariant after operators that may duplicate stops.
    pub fn dedupe(&mut self) {
        let mut seen = std::collections::HashSet::new();
        for route in &mut self.routes {
            route.retain(|&loc| seen.insert(loc));
        }
        self.routes.retain(|r| !r.is_empty());
    }
}

/// Shuffles the customers and assigns each to the first vehicle slot with
/// remaining capacity; customers that fit nowhere are dropped. Returns one
/// route per non-empty slot, in slot order.
pub(crate) fn random_first_fit<R: Rng>(problem: &Problem, rng: &mut R) -> WorkingSolution {
    let mut order = problem.customers();
    shuffle(&mut order, rng);

    let capacities = vehicle::slot_capacities(problem.vehicles());
    let mut loads = vec![0i32; capacities.len()];
    let mut slots: Vec<Vec<usize>> = vec![Vec::new(); capacities.len()];

    for loc in order {
        let demand = problem.demand(loc);
        for (s, &cap) in capacities.iter().enumerate() {
            if loads[s] + demand <= cap {
                loads[s] += demand;
                slots[s].push(loc);
                break;
            }
        }
    }

    WorkingSolution {
        routes: slots.into_iter().filter(|r| !r.is_empty()).collect(),
    }
}

/// Fisher-Yates shuffle.
pub(crate) fn shuffle<R: Rng>(items: &mut [usize], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem() -> Problem {
        Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("a", "A", 0.0, 1.0, 5),
                Location::new("b", "B", 0.0, 2.0, 5),
                Location::new("c", "C", 0.0, 3.0, 5),
            ],
            vec![VehicleType::new("v", "Van", 10, 2)],
        )
        .expect("valid")
    }

    #[test]
    fn test_key_is_route_order_sensitive() {
        let p = problem();
        let a = WorkingSolution {
            routes: vec![vec![1, 2], vec![3]],
        };
        let b = WorkingSolution {
            routes: vec![vec![2, 1], vec![3]],
        };
        assert_ne!(a.key(&p), b.key(&p));
    }

    #[test]
    fn test_key_ignores_route_listing_order() {
        let p = problem();
        let a = WorkingSolution {
            routes: vec![vec![1, 2], vec![3]],
        };
        let b = WorkingSolution {
            routes: vec![vec![3], vec![1, 2]],
        };
        assert_eq!(a.key(&p), b.key(&p));
    }

    #[test]
    fn test_total_distance_matches_routes() {
        let p = problem();
        let w = WorkingSolution {
            routes: vec![vec![1, 2], vec![3]],
        };
        let routes = w.to_routes(&p);
        let total: f64 = routes.iter().map(|r| r.distance()).sum();
        assert!((w.total_distance(&p) - total).abs() < 1e-9);
    }

    #[test]
    fn test_dedupe() {
        let mut w = WorkingSolution {
            routes: vec![vec![1, 2], vec![2, 3], vec![1]],
        };
        w.dedupe();
        assert_eq!(w.routes, vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_random_first_fit_respects_capacity() {
        let p = problem();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let w = random_first_fit(&p, &mut rng);
            for route in &w.routes {
                let load: i32 = route.iter().map(|&loc| p.demand(loc)).sum();
                assert!(load <= 10);
            }
            let mut served: Vec<usize> = w.routes.iter().flatten().copied().collect();
            served.sort_unstable();
            assert_eq!(served, vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items = vec![1, 2, 3, 4, 5];
        shuffle(&mut items, &mut rng);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
    }
}
