//! Tabu Search over intra-route swaps.
//!
//! # Algorithm
//!
//! Seeds with Enhanced Clarke-Wright, then repeatedly moves to the best
//! neighbor whose canonical solution key is not in the tabu map. The
//! neighborhood is every intra-route pairwise swap, generated in route and
//! position order and capped at 50 candidates per iteration. Visited
//! solutions stay tabu for a tenure of iterations; there is no aspiration
//! bypass, so the search terminates early once every neighbor is tabu.
//!
//! Tenure and iteration budget scale with the customer count:
//! `tenure = clamp(n/2, 5, 15)`, `iterations = clamp(3n, 20, 100)`.
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search — Part I", *ORSA Journal on Computing*
//! 1(3), 190-206.

use std::collections::HashMap;

use crate::cancel::CancelToken;
use crate::constructive::enhanced_clarke_wright;
use crate::models::{Problem, Route};

use super::WorkingSolution;

const MAX_NEIGHBORS: usize = 50;

/// Runs Tabu Search and returns the best solution found.
///
/// Routes are returned without vehicle assignments.
pub fn tabu_search(problem: &Problem, cancel: &CancelToken) -> Vec<Route> {
    let seed = enhanced_clarke_wright(problem);
    if seed.is_empty() {
        return seed;
    }

    let n = problem.num_customers();
    let tenure = (n / 2).clamp(5, 15);
    let iterations = (3 * n).clamp(20, 100);

    let mut current = WorkingSolution::from_routes(&seed);
    let mut best = current.clone();
    let mut best_cost = best.total_distance(problem);

    let mut tabu: HashMap<String, usize> = HashMap::new();

    for iteration in 0..iterations {
        if cancel.is_cancelled() {
            break;
        }

        let mut chosen: Option<(WorkingSolution, f64)> = None;
        for neighbor in neighborhood(&current) {
            if tabu.contains_key(&neighbor.key(problem)) {
                continue;
            }
            let cost = neighbor.total_distance(problem);
            match &chosen {
                Some((_, c)) if cost >= *c => {}
                _ => chosen = Some((neighbor, cost)),
            }
        }

        let Some((next, next_cost)) = chosen else {
            // Every neighbor is tabu; no aspiration, so stop.
            break;
        };
        current = next;

        tabu.insert(current.key(problem), iteration + tenure);
        tabu.retain(|_, expiry| *expiry > iteration);

        if next_cost < best_cost {
            best_cost = next_cost;
            best = current.clone();
        }
    }

    best.to_routes(problem)
}

/// All intra-route pairwise swaps in generation order, capped at
/// [`MAX_NEIGHBORS`].
fn neighborhood(current: &WorkingSolution) -> Vec<WorkingSolution> {
    let mut neighbors = Vec::new();

    'outer: for (r, route) in current.routes.iter().enumerate() {
        for a in 0..route.len() {
            for b in a + 1..route.len() {
                let mut candidate = current.clone();
                candidate.routes[r].swap(a, b);
                neighbors.push(candidate);
                if neighbors.len() >= MAX_NEIGHBORS {
                    break 'outer;
                }
            }
        }
    }

    neighbors
}
