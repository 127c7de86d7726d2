//! Ant colony optimization over randomized constructions.
//!
//! # Algorithm
//!
//! Each ant builds a route set by first-fit over shuffled customers; the
//! ant's reported solution is the FIRST route of that set only. After each
//! iteration the pheromone matrix evaporates by `1 - ρ` and every ant
//! deposits `Q / cost` on the consecutive stop pairs of its route. The
//! lowest-cost route seen across all iterations is returned.
//!
//! The first-route-only reporting under-reports coverage relative to the
//! other algorithms; it is kept for comparison parity with the system this
//! solver replaces. The trail weights [`ALPHA`] and [`BETA`] are likewise
//! carried although the shuffle-based construction does not consult the
//! pheromone matrix.
//!
//! Colony size and iteration budget scale with the customer count:
//! `ants = clamp(n, 5, 20)`, `iterations = clamp(2n, 10, 50)`.

use rand::Rng;

use crate::cancel::CancelToken;
use crate::local_search::route_distance;
use crate::models::{Problem, Route};

use super::random_first_fit;

/// Pheromone trail weight.
pub const ALPHA: f64 = 1.0;
/// Heuristic visibility weight.
pub const BETA: f64 = 2.0;
/// Evaporation rate per iteration.
pub const EVAPORATION: f64 = 0.1;
/// Deposit numerator.
pub const DEPOSIT: f64 = 100.0;

/// Runs the ant colony and returns the best single route found.
///
/// Routes are returned without vehicle assignments.
pub fn ant_colony<R: Rng>(problem: &Problem, rng: &mut R, cancel: &CancelToken) -> Vec<Route> {
    let n = problem.num_customers();
    if n == 0 {
        return Vec::new();
    }

    let ants = n.clamp(5, 20);
    let iterations = (2 * n).clamp(10, 50);

    let size = problem.locations().len();
    let mut pheromone = Pheromone::new(size);

    let depot = problem.depot();
    let matrix = problem.matrix();

    let mut best: Option<(Vec<usize>, f64)> = None;

    for _ in 0..iterations {
        if cancel.is_cancelled() {
            break;
        }

        let mut ant_routes: Vec<(Vec<usize>, f64)> = Vec::with_capacity(ants);
        for _ in 0..ants {
            let constructed = random_first_fit(problem, rng);
            let Some(first) = constructed.routes.into_iter().next() else {
                continue;
            };
            let cost = route_distance(&first, depot, matrix);
            ant_routes.push((first, cost));
        }

        pheromone.evaporate();
        for (route, cost) in &ant_routes {
            if *cost > 0.0 {
                pheromone.deposit_along(route, depot, DEPOSIT / cost);
            }
        }

        for (route, cost) in ant_routes {
            match &best {
                Some((_, best_cost)) if cost >= *best_cost => {}
                _ => best = Some((route, cost)),
            }
        }
    }

    match best {
        Some((route, _)) => vec![Route::from_interior(problem, &route)],
        None => Vec::new(),
    }
}

/// Dense pheromone levels over ordered location pairs.
struct Pheromone {
    levels: Vec<f64>,
    size: usize,
}

impl Pheromone {
    fn new(size: usize) -> Self {
        Self {
            levels: vec![1.0; size * size],
            size,
        }
    }

    #[cfg(test)]
    fn get(&self, from: usize, to: usize) -> f64 {
        self.levels[from * self.size + to]
    }

    fn evaporate(&mut self) {
        for level in &mut self.levels {
            *level *= 1.0 - EVAPORATION;
        }
    }

    /// Deposits along depot → route → depot, on ordered pairs.
    fn deposit_along(&mut self, route: &[usize], depot: usize, amount: f64) {
        if route.is_empty() {
            return;
        }
        let mut prev = depot;
        for &loc in route {
            self.levels[prev * self.size + loc] += amount;
            prev = loc;
        }
        self.levels[prev * self.size + depot] += amount;
    }
}
