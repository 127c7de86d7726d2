//! Simulated Annealing over intra-route swaps.
//!
//! # Algorithm
//!
//! Seeds with Enhanced Clarke-Wright and walks the swap neighborhood under
//! a geometric cooling schedule: start at T = 1000, multiply by 0.95 after
//! each temperature stage, stop below T = 1. Each stage runs
//! `clamp(5n, 50, 200)` moves; a move picks a random route and swaps two
//! uniformly chosen interior positions. Improving moves are always
//! accepted, worsening moves with probability `exp(-Δ/T)`.
//!
//! # Reference
//!
//! Kirkpatrick, S., Gelatt, C.D. & Vecchi, M.P. (1983). "Optimization by
//! Simulated Annealing", *Science* 220(4598), 671-680.

use rand::Rng;

use crate::cancel::CancelToken;
use crate::constructive::enhanced_clarke_wright;
use crate::local_search::route_distance;
use crate::models::{Problem, Route};

use super::WorkingSolution;

const INITIAL_TEMPERATURE: f64 = 1000.0;
const COOLING_RATE: f64 = 0.95;
const MIN_TEMPERATURE: f64 = 1.0;

/// Runs Simulated Annealing and returns the best solution found.
///
/// Routes are returned without vehicle assignments.
pub fn simulated_annealing<R: Rng>(
    problem: &Problem,
    rng: &mut R,
    cancel: &CancelToken,
) -> Vec<Route> {
    let seed = enhanced_clarke_wright(problem);
    if seed.is_empty() {
        return seed;
    }

    let n = problem.num_customers();
    let moves_per_stage = (5 * n).clamp(50, 200);

    let mut current = WorkingSolution::from_routes(&seed);
    let mut current_cost = current.total_distance(problem);
    let mut best = current.clone();
    let mut best_cost = current_cost;

    let depot = problem.depot();
    let matrix = problem.matrix();

    let mut temperature = INITIAL_TEMPERATURE;
    while temperature > MIN_TEMPERATURE {
        if cancel.is_cancelled() {
            break;
        }

        for _ in 0..moves_per_stage {
            let r = rng.random_range(0..current.routes.len());
            let len = current.routes[r].len();
            if len < 2 {
                continue;
            }
            let a = rng.random_range(0..len);
            let b = rng.random_range(0..len);
            if a == b {
                continue;
            }

            let before = route_distance(&current.routes[r], depot, matrix);
            current.routes[r].swap(a, b);
            let after = route_distance(&current.routes[r], depot, matrix);
            let delta = after - before;

            let accept = delta < 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
            if accept {
                current_cost += delta;
                if current_cost < best_cost {
                    best_cost = current_cost;
                    best = current.clone();
                }
            } else {
                current.routes[r].swap(a, b);
            }
        }

        temperature *= COOLING_RATE;
    }

    best.to_routes(problem)
}
