//! Intra-route Or-opt improvement.
//!
//! # Algorithm
//!
//! Lifts segments of 1, 2, or 3 consecutive stops and reinserts them at
//! every other interior position, accepting the first move that shortens
//! the route. Sweeps repeat until a full sweep over all segment lengths
//! finds nothing.
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::distance::DistanceMatrix;

use super::{route_distance, EPSILON};

/// Applies Or-opt to a single route interior until no relocation improves it.
///
/// Returns the improved location sequence and the total route distance
/// (depot legs included).
///
/// # Arguments
///
/// * `route` — Ordered interior location indices (excluding depot)
/// * `depot` — Depot location index
/// * `matrix` — Distance matrix
pub fn or_opt_improve(
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
        for seg_len in 1..=3.min(current.len()) {
            if relocate_first_improvement(&mut current, depot, matrix, seg_len) {
                improved = true;
            }
        }
    }

    let dist = route_distance(&current, depot, matrix);
    (current, dist)
}

/// Applies the first improving relocation of a `seg_len`-stop segment.
/// Returns `true` if a move was made.
fn relocate_first_improvement(
    route: &mut Vec<usize>,
    depot: usize,
    matrix: &DistanceMatrix,
    seg_len: usize,
) -> bool {
    let n = route.len();
    if n < seg_len + 1 {
        return false;
    }

    for from in 0..=(n - seg_len) {
        let prev = if from == 0 { depot } else { route[from - 1] };
        let after = if from + seg_len >= n {
            depot
        } else {
            route[from + seg_len]
        };
        let seg_first = route[from];
        let seg_last = route[from + seg_len - 1];

        // Gain from closing the gap the segment leaves behind.
        let removal_gain =
            matrix.get(prev, seg_first) + matrix.get(seg_last, after) - matrix.get(prev, after);

        for to in 0..=(n - seg_len) {
            if to >= from && to <= from + seg_len {
                continue;
            }

            let (ins_prev, ins_next) = if to < from {
                let p = if to == 0 { depot } else { route[to - 1] };
                (p, route[to])
            } else {
                let p = route[to - 1];
                let nx = if to >= n { depot } else { route[to] };
                (p, nx)
            };

            let insertion_cost = matrix.get(ins_prev, seg_first)
                + matrix.get(seg_last, ins_next)
                - matrix.get(ins_prev, ins_next);

            if insertion_cost - removal_gain < -EPSILON {
                let segment: Vec<usize> = route.drain(from..from + seg_len).collect();
                let insert_pos = if to > from { to - seg_len } else { to };
                for (i, &loc) in segment.iter().enumerate() {
                    route.insert(insert_pos + i, loc);
                }
                return true;
            }
        }
    }

    false
}
