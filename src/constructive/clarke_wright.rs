//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! Starts with each customer on its own route (depot → customer → depot),
//! then merges routes in decreasing order of savings:
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! A saving is applied only when one endpoint sits at the end of its route
//! and the other at the start of a different route, and the merged demand
//! fits the largest vehicle in the fleet. After the savings phase, routes
//! are merged pairwise by ascending demand until the fleet has enough
//! slots, then each route is polished with 2-opt / 3-opt / 2-opt.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of customers (dominated by sorting savings).
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use crate::local_search::basic_kernel;
use crate::models::{vehicle, Problem, Route};

/// A scored candidate merge of two customers' routes.
#[derive(Debug)]
pub(crate) struct Saving {
    pub i: usize,
    pub j: usize,
    pub value: f64,
}

/// Constructs routes using the Clarke-Wright savings algorithm.
///
/// Routes are returned without vehicle assignments; callers run the
/// assigner afterwards.
///
/// # Examples
///
/// ```
/// use fleet_routing::models::{Location, Problem, VehicleType};
/// use fleet_routing::constructive::clarke_wright;
///
/// let problem = Problem::new(
///     vec![
///         Location::depot("d", "Depot", 0.0, 0.0),
///         Location::new("a", "A", 0.0, 1.0, 3),
///         Location::new("b", "B", 0.0, 2.0, 3),
///     ],
///     vec![VehicleType::new("v", "Van", 10, 2)],
/// )
/// .unwrap();
///
/// let routes = clarke_wright(&problem);
/// // Positive saving and 3 + 3 <= 10: merged into one route
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].total_capacity(), 6);
/// ```
pub fn clarke_wright(problem: &Problem) -> Vec<Route> {
    let savings = basic_savings(problem);
    let interiors = merge_by_savings(problem, savings);
    let interiors = reduce_to_slot_count(problem, interiors);

    let depot = problem.depot();
    let matrix = problem.matrix();
    interiors
        .into_iter()
        .filter(|members| !members.is_empty())
        .map(|members| {
            let polished = basic_kernel(&members, depot, matrix);
            Route::from_interior(problem, &polished)
        })
        .collect()
}

/// Computes the classic savings list for all customer pairs `i < j`,
/// sorted by decreasing value.
pub(crate) fn basic_savings(problem: &Problem) -> Vec<Saving> {
    let depot = problem.depot();
    let customers = problem.customers();
    let mut savings = Vec::with_capacity(customers.len() * customers.len() / 2);

    for (a, &i) in customers.iter().enumerate() {
        for &j in &customers[a + 1..] {
            let s = problem.distance(depot, i) + problem.distance(depot, j)
                - problem.distance(i, j);
            if s > 0.0 {
                savings.push(Saving { i, j, value: s });
            }
        }
    }

    sort_descending(&mut savings);
    savings
}

pub(crate) fn sort_descending(savings: &mut [Saving]) {
    savings.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .expect("savings should not be NaN")
    });
}

/// Runs the endpoint-merge phase over a sorted savings list.
///
/// Each customer starts on its own route. A saving `(i, j)` merges two
/// routes only when `i` ends one route and `j` starts the other (or the
/// mirror case), and the combined demand fits the largest vehicle.
/// Returns the surviving route interiors.
pub(crate) fn merge_by_savings(problem: &Problem, savings: Vec<Saving>) -> Vec<Vec<usize>> {
    let n = problem.locations().len();
    let max_cap = vehicle::max_capacity(problem.vehicles());

    // route_of[loc] = current route slot; slots are indexed by the founding
    // customer's arena position, emptied slots stay behind as husks.
    let mut route_of = vec![0usize; n];
    let mut route_load = vec![0i32; n];
    let mut route_members: Vec<Vec<usize>> = vec![Vec::new(); n];

    for &i in &problem.customers() {
        route_of[i] = i;
        route_load[i] = problem.demand(i);
        route_members[i].push(i);
    }

    for saving in &savings {
        let ri = route_of[saving.i];
        let rj = route_of[saving.j];
        if ri == rj {
            continue;
        }

        let combined = route_load[ri] + route_load[rj];
        if combined > max_cap {
            continue;
        }

        let i_at_end = route_members[ri].last() == Some(&saving.i);
        let j_at_start = route_members[rj].first() == Some(&saving.j);
        let i_at_start = route_members[ri].first() == Some(&saving.i);
        let j_at_end = route_members[rj].last() == Some(&saving.j);

        // Only end-to-start concatenations are valid; both-start and
        // both-end pairings are skipped.
        let (merge_into, merge_from) = if i_at_end && j_at_start {
            (ri, rj)
        } else if j_at_end && i_at_start {
            (rj, ri)
        } else {
            continue;
        };

        let mut from_members = std::mem::take(&mut route_members[merge_from]);
        for &loc in &from_members {
            route_of[loc] = merge_into;
        }
        route_members[merge_into].append(&mut from_members);
        route_load[merge_into] = combined;
        route_load[merge_from] = 0;
    }

    route_members.into_iter().filter(|m| !m.is_empty()).collect()
}

/// Merges small routes pairwise while the route count exceeds the fleet's
/// slot count, bounded by a safety limit of 1000 passes.
pub(crate) fn reduce_to_slot_count(
    problem: &Problem,
    interiors: Vec<Vec<usize>>,
) -> Vec<Vec<usize>> {
    let total_slots = vehicle::total_slots(problem.vehicles());
    let max_cap = vehicle::max_capacity(problem.vehicles());

    let mut routes: Vec<(Vec<usize>, i32)> = interiors
        .into_iter()
        .map(|members| {
            let load = members.iter().map(|&loc| problem.demand(loc)).sum();
            (members, load)
        })
        .collect();

    let mut passes = 0;
    while routes.len() > total_slots && passes < 1000 {
        passes += 1;
        routes.sort_by_key(|(_, load)| *load);

        let mut merged = false;
        'outer: for a in 0..routes.len() {
            for b in a + 1..routes.len() {
                if routes[a].1 + routes[b].1 <= max_cap {
                    let (members_b, load_b) = routes.remove(b);
                    routes[a].0.extend(members_b);
                    routes[a].1 += load_b;
                    merged = true;
                    break 'outer;
                }
            }
        }
        if !merged {
            break;
        }
    }

    routes.into_iter().map(|(members, _)| members).collect()
}
