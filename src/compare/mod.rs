//! Algorithm registry, comparison driver, and winner selection.

use std::fmt;
use std::time::Instant;

use rand::Rng;

use crate::assignment::assign_vehicles;
use crate::cancel::CancelToken;
use crate::constructive::{clarke_wright, enhanced_clarke_wright, nearest_neighbor};
use crate::external::{solve_or_fallback, ExternalSolverConfig};
use crate::local_search::PolishKind;
use crate::metaheur::{ant_colony, genetic, simulated_annealing, tabu_search};
use crate::models::{AlgorithmResult, Problem, Route};

/// The eight algorithms the comparison driver runs.
///
/// The sweep constructor is a building block of this crate but is not
/// registered here, so it is not reachable through `solve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Classic Clarke-Wright savings.
    ClarkeWright,
    /// Factor-weighted Clarke-Wright savings.
    EnhancedClarkeWright,
    /// Greedy nearest feasible neighbor per slot.
    NearestNeighbor,
    /// Population search with route-based crossover.
    Genetic,
    /// Solution-key tabu memory over intra-route swaps.
    TabuSearch,
    /// Geometric-cooling annealing over intra-route swaps.
    SimulatedAnnealing,
    /// Pheromone bookkeeping over randomized constructions.
    AntColony,
    /// Remote solver with Enhanced Clarke-Wright fallback.
    External,
}

impl Algorithm {
    /// Registry order used by the comparison driver.
    pub const ALL: [Algorithm; 8] = [
        Algorithm::ClarkeWright,
        Algorithm::EnhancedClarkeWright,
        Algorithm::NearestNeighbor,
        Algorithm::Genetic,
        Algorithm::TabuSearch,
        Algorithm::SimulatedAnnealing,
        Algorithm::AntColony,
        Algorithm::External,
    ];

    /// Stable tag used in options and serialized results.
    pub fn tag(self) -> &'static str {
        match self {
            Algorithm::ClarkeWright => "clarke-wright",
            Algorithm::EnhancedClarkeWright => "enhanced-clarke-wright",
            Algorithm::NearestNeighbor => "nearest-neighbor",
            Algorithm::Genetic => "genetic",
            Algorithm::TabuSearch => "tabu-search",
            Algorithm::SimulatedAnnealing => "simulated-annealing",
            Algorithm::AntColony => "ant-colony",
            Algorithm::External => "or-tools",
        }
    }

    /// Parses a tag back into its algorithm.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Algorithm::ALL.into_iter().find(|a| a.tag() == tag)
    }

    /// The polishing kernel the assigner re-applies for this algorithm:
    /// the basic sandwich for Clarke-Wright, the enhanced kernel for the
    /// enhanced construction and everything seeded by it, none for the
    /// rest.
    pub(crate) fn polish(self) -> PolishKind {
        match self {
            Algorithm::ClarkeWright => PolishKind::Basic,
            Algorithm::EnhancedClarkeWright
            | Algorithm::TabuSearch
            | Algorithm::SimulatedAnnealing
            | Algorithm::External => PolishKind::Enhanced,
            Algorithm::NearestNeighbor | Algorithm::Genetic | Algorithm::AntColony => {
                PolishKind::None
            }
        }
    }

    /// Runs the construction phase: raw routes, no vehicle assignment.
    pub fn construct<R: Rng>(
        self,
        problem: &Problem,
        rng: &mut R,
        cancel: &CancelToken,
        external: Option<&ExternalSolverConfig>,
    ) -> Vec<Route> {
        match self {
            Algorithm::ClarkeWright => clarke_wright(problem),
            Algorithm::EnhancedClarkeWright => enhanced_clarke_wright(problem),
            Algorithm::NearestNeighbor => nearest_neighbor(problem),
            Algorithm::Genetic => genetic(problem, rng, cancel),
            Algorithm::TabuSearch => tabu_search(problem, cancel),
            Algorithm::SimulatedAnnealing => simulated_annealing(problem, rng, cancel),
            Algorithm::AntColony => ant_colony(problem, rng, cancel),
            Algorithm::External => solve_or_fallback(problem, external),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Runs every registered algorithm in sequence, recording per-algorithm
/// failures without aborting the run.
pub(crate) fn run_comparison<R: Rng>(
    problem: &Problem,
    rng: &mut R,
    cancel: &CancelToken,
    external: Option<&ExternalSolverConfig>,
) -> Vec<AlgorithmResult> {
    run_with(problem, cancel, &Algorithm::ALL, |algorithm| {
        Ok(algorithm.construct(problem, rng, cancel, external))
    })
}

/// Driver core with an injectable runner, shared by [`run_comparison`] and
/// failure-isolation tests. A runner error becomes a failed
/// [`AlgorithmResult`]; construction output goes through the assigner with
/// the algorithm's polishing kernel.
pub(crate) fn run_with<F>(
    problem: &Problem,
    cancel: &CancelToken,
    algorithms: &[Algorithm],
    mut runner: F,
) -> Vec<AlgorithmResult>
where
    F: FnMut(Algorithm) -> Result<Vec<Route>, String>,
{
    let mut results = Vec::with_capacity(algorithms.len());

    for &algorithm in algorithms {
        if cancel.is_cancelled() {
            break;
        }
        let started = Instant::now();
        match runner(algorithm) {
            Ok(routes) => {
                let assigned = assign_vehicles(routes, problem, algorithm.polish());
                let elapsed = started.elapsed().as_secs_f64() * 1000.0;
                results.push(AlgorithmResult::ok(algorithm, assigned, problem, elapsed));
            }
            Err(message) => {
                let elapsed = started.elapsed().as_secs_f64() * 1000.0;
                log::warn!("algorithm '{algorithm}' failed: {message}");
                results.push(AlgorithmResult::failed(algorithm, message, elapsed));
            }
        }
    }

    results
}

/// Winner rule: among valid results, maximum coverage, ties broken by
/// minimum total distance; comparisons are strict so the earliest result
/// wins remaining ties. Returns `None` when no result is valid.
pub fn select_winner(results: &[AlgorithmResult]) -> Option<usize> {
    let mut winner: Option<usize> = None;

    for (idx, result) in results.iter().enumerate() {
        if !result.is_valid() {
            continue;
        }
        match winner {
            None => winner = Some(idx),
            Some(w) => {
                let best = &results[w].metrics;
                let candidate = &result.metrics;
                if candidate.coverage_percent > best.coverage_percent
                    || (candidate.coverage_percent == best.coverage_percent
                        && candidate.total_distance < best.total_distance)
                {
                    winner = Some(idx);
                }
            }
        }
    }

    winner
}
