//! Intra-route 3-opt improvement.
//!
//! # Algorithm
//!
//! Cuts the route into four segments `A | B | C | D` at every triple of
//! positions and evaluates six reconnections besides the identity: reverse
//! B, reverse C, swap B and C, swap with B reversed, swap with C reversed,
//! and the double reversal. The best-improving reconnection is taken per
//! triple; triples are scanned first-improvement.
//!
//! Callers follow an accepted move with a 2-opt descent (see
//! [`basic_kernel`](super::basic_kernel)).
//!
//! # Complexity
//!
//! O(n³) per pass.
//!
//! # Reference
//!
//! Lin, S. (1965). "Computer Solutions of the Traveling Salesman Problem",
//! *Bell System Technical Journal* 44(10), 2245-2269.

use crate::distance::DistanceMatrix;

use super::EPSILON;

/// One 3-opt sweep over a route interior.
///
/// Scans all cut triples in order; at each triple the best of the six
/// reconnections is applied if it strictly shortens the route, and the
/// sweep continues on the modified sequence. Returns the (possibly
/// improved) sequence and whether any move was accepted.
pub fn three_opt_pass(
    route: &[usize],
    depot: usize,
    matrix: &DistanceMatrix,
) -> (Vec<usize>, bool) {
    let n = route.len();
    if n < 4 {
        return (route.to_vec(), false);
    }

    let mut current = route.to_vec();
    let mut any = false;

    for i in 0..n - 2 {
        for j in i + 1..n - 1 {
            for k in j + 1..n {
                if let Some(reconnected) = best_reconnection(&current, depot, matrix, i, j, k) {
                    current = reconnected;
                    any = true;
                }
            }
        }
    }

    (current, any)
}

/// Evaluates the six reconnections for cut positions (i, j, k) and returns
/// the best strictly-improving one.
///
/// Segments: `A = r[..=i]`, `B = r[i+1..=j]`, `C = r[j+1..=k]`, `D = r[k+1..]`
/// (D may be empty, in which case C reconnects to the depot).
fn best_reconnection(
    route: &[usize],
    depot: usize,
    matrix: &DistanceMatrix,
    i: usize,
    j: usize,
    k: usize,
) -> Option<Vec<usize>> {
    let n = route.len();

    let a_end = route[i];
    let b_start = route[i + 1];
    let b_end = route[j];
    let c_start = route[j + 1];
    let c_end = route[k];
    let d_start = if k + 1 < n { route[k + 1] } else { depot };

    let old_cost =
        matrix.get(a_end, b_start) + matrix.get(b_end, c_start) + matrix.get(c_end, d_start);

    // (new edge costs, pattern id) for the six non-identity reconnections
    let candidates = [
        // A B' C D
        (
            matrix.get(a_end, b_end) + matrix.get(b_start, c_start) + matrix.get(c_end, d_start),
            Pattern::ReverseB,
        ),
        // A B C' D
        (
            matrix.get(a_end, b_start) + matrix.get(b_end, c_end) + matrix.get(c_start, d_start),
            Pattern::ReverseC,
        ),
        // A C B D
        (
            matrix.get(a_end, c_start) + matrix.get(c_end, b_start) + matrix.get(b_end, d_start),
            Pattern::Swap,
        ),
        // A C B' D
        (
            matrix.get(a_end, c_start) + matrix.get(c_end, b_end) + matrix.get(b_start, d_start),
            Pattern::SwapReverseB,
        ),
        // A C' B D
        (
            matrix.get(a_end, c_end) + matrix.get(c_start, b_start) + matrix.get(b_end, d_start),
            Pattern::SwapReverseC,
        ),
        // A B' C' D
        (
            matrix.get(a_end, b_end) + matrix.get(b_start, c_end) + matrix.get(c_start, d_start),
            Pattern::DoubleReverse,
        ),
    ];

    let mut best_delta = -EPSILON;
    let mut best_pattern = None;
    for (cost, pattern) in candidates {
        let delta = cost - old_cost;
        if delta < best_delta {
            best_delta = delta;
            best_pattern = Some(pattern);
        }
    }

    best_pattern.map(|pattern| apply_pattern(route, i, j, k, pattern))
}

#[derive(Clone, Copy)]
enum Pattern {
    ReverseB,
    ReverseC,
    Swap,
    SwapReverseB,
    SwapReverseC,
    DoubleReverse,
}

fn apply_pattern(route: &[usize], i: usize, j: usize, k: usize, pattern: Pattern) -> Vec<usize> {
    let seg_a = &route[..=i];
    let seg_b = &route[i + 1..=j];
    let seg_c = &route[j + 1..=k];
    let seg_d = &route[k + 1..];

    let rev = |s: &[usize]| s.iter().rev().copied().collect::<Vec<_>>();

    let mut out = Vec::with_capacity(route.len());
    out.extend_from_slice(seg_a);
    match pattern {
        Pattern::ReverseB => {
            out.extend(rev(seg_b));
            out.extend_from_slice(seg_c);
        }
        Pattern::ReverseC => {
            out.extend_from_slice(seg_b);
            out.extend(rev(seg_c));
        }
        Pattern::Swap => {
            out.extend_from_slice(seg_c);
            out.extend_from_slice(seg_b);
        }
        Pattern::SwapReverseB => {
            out.extend_from_slice(seg_c);
            out.extend(rev(seg_b));
        }
        Pattern::SwapReverseC => {
            out.extend(rev(seg_c));
            out.extend_from_slice(seg_b);
        }
        Pattern::DoubleReverse => {
            out.extend(rev(seg_b));
            out.extend(rev(seg_c));
        }
    }
    out.extend_from_slice(seg_d);
    out
}
