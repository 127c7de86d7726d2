//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions (i, k) in the route interior, compute the
//! change in distance from reversing the segment between them:
//!
//! ```text
//! delta = d(prev_i, r[k]) + d(r[i], next_k) - d(prev_i, r[i]) - d(r[k], next_k)
//! ```
//!
//! If the reversal strictly shortens the route, reverse `[i..=k]` and keep
//! sweeping. Full sweeps repeat until one completes without improvement
//! (first-improvement strategy).
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

use super::{route_distance, EPSILON};

/// Applies 2-opt to a single route interior until no sweep improves it.
///
/// Returns the improved location sequence and the total route distance
/// (depot legs included).
///
/// # Arguments
///
/// * `route` — Ordered interior location indices (excluding depot)
/// * `depot` — Depot location index
/// * `matrix` — Distance matrix
///
/// # Examples
///
/// ```
/// use fleet_routing::models::Location;
/// use fleet_routing::distance::DistanceMatrix;
/// use fleet_routing::local_search::two_opt_improve;
///
/// let locations = vec![
///     Location::depot("d", "D", 0.0, 0.0),
///     Location::new("a", "A", 1.0, 1.0, 1),
///     Location::new("b", "B", 0.0, 2.0, 1),
///     Location::new("c", "C", -1.0, 1.0, 1),
/// ];
/// let dm = DistanceMatrix::from_locations(&locations);
///
/// // Route a, c, b crosses itself; 2-opt untangles it
/// let (improved, _dist) = two_opt_improve(&[1, 3, 2], 0, &dm);
/// assert_eq!(improved, vec![1, 2, 3]);
/// ```
pub fn two_opt_improve(
    route: &[usize],
    depot: usize,
    matrix: &DistanceMatrix,
) -> (Vec<usize>, f64) {
    if route.len() < 2 {
        return (route.to_vec(), route_distance(route, depot, matrix));
    }

    let mut current = route.to_vec();
    let mut improved = true;

    while improved {
        improved = false;
        let n = current.len();

        for i in 0..n - 1 {
            for k in i + 1..n {
                if reversal_delta(&current, depot, matrix, i, k) < -EPSILON {
                    current[i..=k].reverse();
                    improved = true;
                }
            }
        }
    }

    let dist = route_distance(&current, depot, matrix);
    (current, dist)
}

/// Distance change from reversing the interior segment `[i..=k]`.
fn reversal_delta(
    route: &[usize],
    depot: usize,
    matrix: &DistanceMatrix,
    i: usize,
    k: usize,
) -> f64 {
    let n = route.len();
    let prev = if i == 0 { depot } else { route[i - 1] };
    let next = if k == n - 1 { depot } else { route[k + 1] };

    let old_cost = matrix.get(prev, route[i]) + matrix.get(route[k], next);
    let new_cost = matrix.get(prev, route[k]) + matrix.get(route[i], next);

    new_cost - old_cost
}
