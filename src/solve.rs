//! High-level solve entry point.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cancel::CancelToken;
use crate::compare::{run_comparison, run_with, select_winner, Algorithm};
use crate::error::{BadInputKind, SolveError};
use crate::external::ExternalSolverConfig;
use crate::models::{Location, Problem, SolveResult, VehicleType};

/// An unvalidated problem instance.
#[derive(Debug, Clone)]
pub struct Instance {
    /// All locations; exactly one must carry the depot flag.
    pub locations: Vec<Location>,
    /// The fleet; at least one type.
    pub vehicles: Vec<VehicleType>,
}

/// Which algorithms a solve runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMode {
    /// Run one algorithm; its failure propagates.
    Single(Algorithm),
    /// Run all registered algorithms and select a winner.
    Compare,
}

/// Options for [`solve`].
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    mode: Option<SolveMode>,
    seed: Option<u64>,
    cancel: Option<CancelToken>,
    external: Option<ExternalSolverConfig>,
}

impl SolveOptions {
    /// Single-algorithm mode.
    pub fn single(algorithm: Algorithm) -> Self {
        Self {
            mode: Some(SolveMode::Single(algorithm)),
            ..Self::default()
        }
    }

    /// Single-algorithm mode from a tag string.
    ///
    /// Unknown tags are a [`BadInputKind::UnknownAlgorithm`] error.
    pub fn single_tag(tag: &str) -> Result<Self, SolveError> {
        let algorithm = Algorithm::from_tag(tag)
            .ok_or_else(|| SolveError::BadInput(BadInputKind::UnknownAlgorithm(tag.to_string())))?;
        Ok(Self::single(algorithm))
    }

    /// Comparison mode over the whole registry.
    pub fn compare() -> Self {
        Self {
            mode: Some(SolveMode::Compare),
            ..Self::default()
        }
    }

    /// Seeds the metaheuristic PRNG so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attaches a cancellation token.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Configures the remote solver used by the `or-tools` algorithm.
    /// Without it, that algorithm falls back to Enhanced Clarke-Wright.
    pub fn with_external(mut self, config: ExternalSolverConfig) -> Self {
        self.external = Some(config);
        self
    }
}

/// Solves a CVRP instance.
///
/// Validates the instance, runs the requested algorithm (or all of them in
/// compare mode), assigns vehicle slots, and returns the envelope with
/// per-algorithm results.
///
/// # Examples
///
/// ```no_run
/// use fleet_routing::models::{Location, VehicleType};
/// use fleet_routing::{solve, Algorithm, Instance, SolveOptions};
///
/// let instance = Instance {
///     locations: vec![
///         Location::depot("d", "Depot", 0.0, 0.0),
///         Location::new("a", "A", 0.0, 1.0, 5),
///     ],
///     vehicles: vec![VehicleType::new("v", "Van", 10, 1)],
/// };
///
/// let result = solve(instance, SolveOptions::single(Algorithm::ClarkeWright))?;
/// assert_eq!(result.routes.len(), 1);
/// # Ok::<(), fleet_routing::SolveError>(())
/// ```
pub fn solve(instance: Instance, options: SolveOptions) -> Result<SolveResult, SolveError> {
    let problem = Problem::new(instance.locations, instance.vehicles)?;
    let cancel = options.cancel.unwrap_or_default();
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let external = options.external.as_ref();
    let mode = options.mode.unwrap_or(SolveMode::Compare);

    match mode {
        SolveMode::Single(algorithm) => {
            let mut results = run_with(&problem, &cancel, &[algorithm], |a| {
                Ok(a.construct(&problem, &mut rng, &cancel, external))
            });
            let Some(result) = results.pop() else {
                return Err(SolveError::Cancelled);
            };
            if let Some(message) = result.error.clone() {
                return Err(SolveError::Algorithm {
                    algorithm: algorithm.tag(),
                    message,
                });
            }
            let routes = result.routes.clone();
            let total_distance = result.metrics.total_distance;
            let total_duration = result.metrics.total_duration;
            Ok(SolveResult {
                selected_algorithm: algorithm,
                routes,
                total_distance,
                total_duration,
                algorithm_results: vec![result],
                comparison_run: false,
            })
        }
        SolveMode::Compare => {
            let results = run_comparison(&problem, &mut rng, &cancel, external);
            if results.is_empty() {
                return Err(SolveError::Cancelled);
            }
            // Fall back to the first (failed) result when nothing is valid.
            let winner = select_winner(&results).unwrap_or(0);
            let selected = &results[winner];
            let selected_algorithm = selected.algorithm;
            let routes = selected.routes.clone();
            let total_distance = selected.metrics.total_distance;
            let total_duration = selected.metrics.total_duration;
            Ok(SolveResult {
                selected_algorithm,
                routes,
                total_distance,
                total_duration,
                algorithm_results: results,
                comparison_run: true,
            })
        }
    }
}
