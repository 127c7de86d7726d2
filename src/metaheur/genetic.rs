//! Genetic algorithm over route-list individuals.
//!
//! # Algorithm
//!
//! Individuals are whole route sets built by first-fit over shuffled
//! customers. Tournament selection (size 3) picks parents; route-based
//! crossover copies the route at each index from a uniformly chosen parent;
//! mutation swaps two interior stops of a random route. One elite slot
//! carries the best individual into each generation.
//!
//! Route-based crossover can duplicate or drop customers across a child's
//! routes; children are scored as-is and the final best individual is
//! repaired (repeated stops dropped, first occurrence wins) before routes
//! are materialized.
//!
//! Population and generation counts scale with the customer count:
//! `population = clamp(2n, 10, 30)`, `generations = clamp(2n, 15, 50)`.

use rand::Rng;

use crate::cancel::CancelToken;
use crate::models::{Problem, Route};

use super::{random_first_fit, WorkingSolution};

const CROSSOVER_RATE: f64 = 0.8;
const MUTATION_RATE: f64 = 0.1;
const TOURNAMENT_SIZE: usize = 3;

/// Runs the genetic algorithm and returns the best solution found.
///
/// Routes are returned without vehicle assignments.
pub fn genetic<R: Rng>(problem: &Problem, rng: &mut R, cancel: &CancelToken) -> Vec<Route> {
    let n = problem.num_customers();
    if n == 0 {
        return Vec::new();
    }

    let population_size = (2 * n).clamp(10, 30);
    let generations = (2 * n).clamp(15, 50);

    let mut population: Vec<(WorkingSolution, f64)> = (0..population_size)
        .map(|_| {
            let individual = random_first_fit(problem, rng);
            let cost = individual.total_distance(problem);
            (individual, cost)
        })
        .collect();

    let mut best = best_of(&population).clone();

    for _ in 0..generations {
        if cancel.is_cancelled() {
            break;
        }

        let mut next = Vec::with_capacity(population_size);
        next.push(best.clone());

        while next.len() < population_size {
            let p1 = tournament(&population, rng);
            let p2 = tournament(&population, rng);

            let mut child = if rng.random::<f64>() < CROSSOVER_RATE {
                crossover(p1, p2, rng)
            } else {
                p1.clone()
            };

            if rng.random::<f64>() < MUTATION_RATE {
                mutate(&mut child, rng);
            }

            let cost = child.total_distance(problem);
            next.push((child, cost));
        }

        population = next;

        let generation_best = best_of(&population);
        if generation_best.1 < best.1 {
            best = generation_best.clone();
        }
    }

    let mut winner = best.0;
    winner.dedupe();
    winner.to_routes(problem)
}

fn best_of(population: &[(WorkingSolution, f64)]) -> &(WorkingSolution, f64) {
    population
        .iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).expect("costs should not be NaN"))
        .expect("population is never empty")
}

/// Tournament of [`TOURNAMENT_SIZE`] random individuals; best cost wins.
fn tournament<'a, R: Rng>(
    population: &'a [(WorkingSolution, f64)],
    rng: &mut R,
) -> &'a WorkingSolution {
    let mut winner: Option<&(WorkingSolution, f64)> = None;
    for _ in 0..TOURNAMENT_SIZE {
        let candidate = &population[rng.random_range(0..population.len())];
        match winner {
            Some(best) if best.1 <= candidate.1 => {}
            _ => winner = Some(candidate),
        }
    }
    &winner.expect("tournament saw at least one candidate").0
}

/// Route-based crossover: the route at each index comes from a uniformly
/// chosen parent when both have one, otherwise from whichever parent does.
fn crossover<R: Rng>(
    p1: &WorkingSolution,
    p2: &WorkingSolution,
    rng: &mut R,
) -> WorkingSolution {
    let len = p1.routes.len().max(p2.routes.len());
    let mut routes = Vec::with_capacity(len);

    for idx in 0..len {
        let route = match (p1.routes.get(idx), p2.routes.get(idx)) {
            (Some(a), Some(b)) => {
                if rng.random_range(0..2u32) == 0 {
                    a.clone()
                } else {
                    b.clone()
                }
            }
            (Some(a), None) => a.clone(),
            (None, Some(b)) => b.clone(),
            (None, None) => unreachable!("idx < max(len, len)"),
        };
        routes.push(route);
    }

    WorkingSolution { routes }
}

/// Swaps two random interior stops of a random non-trivial route.
fn mutate<R: Rng>(individual: &mut WorkingSolution, rng: &mut R) {
    let candidates: Vec<usize> = individual
        .routes
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return;
    }

    let r = candidates[rng.random_range(0..candidates.len())];
    let len = individual.routes[r].len();
    let a = rng.random_range(0..len);
    let b = rng.random_range(0..len);
    individual.routes[r].swap(a, b);
}
