//! Sweep constructive heuristic.
//!
//! # Algorithm
//!
//! Sorts customers by polar angle around the depot, then packs them into
//! vehicle slots in sweep order: when the next customer would overflow the
//! current slot, the route is closed and the next slot opened. Exploits
//! geographic clustering; no local search follows.
//!
//! This is a building block only: the comparison driver does not register
//! it, so it is reachable through this module and not through `solve`.
//!
//! # Complexity
//!
//! O(n log n) where n = number of customers (dominated by angle sorting).
//!
//! # Reference
//!
//! Gillett, B.E. & Miller, L.R. (1974). "A Heuristic Algorithm for the
//! Vehicle-Dispatch Problem", *Operations Research* 22(2), 340-349.

use crate::models::{vehicle, Problem, Route};

use super::polar_angle;

/// Constructs routes by sweeping customers in polar-angle order into
/// successive vehicle slots.
///
/// Routes are returned without vehicle assignments. Customers left over
/// when the slots run out, or too large for any single slot, are dropped.
pub fn sweep(problem: &Problem) -> Vec<Route> {
    let customers = problem.customers();
    if customers.is_empty() {
        return Vec::new();
    }

    let mut angle_order: Vec<(usize, f64)> = customers
        .iter()
        .map(|&i| (i, polar_angle(problem, i)))
        .collect();
    angle_order.sort_by(|a, b| a.1.partial_cmp(&b.1).expect("angles should not be NaN"));

    let slot_caps = vehicle::slot_capacities(problem.vehicles());
    let mut routes = Vec::new();
    let mut slot = 0;
    let mut load = 0;
    let mut members: Vec<usize> = Vec::new();

    for &(loc, _) in &angle_order {
        if slot >= slot_caps.len() {
            break;
        }
        let demand = problem.demand(loc);

        if demand > slot_caps[slot] && members.is_empty() {
            // Too large for this slot even when empty; no slot is bigger
            // in sweep order, so skip the customer.
            continue;
        }

        if load + demand > slot_caps[slot] {
            routes.push(Route::from_interior(problem, &members));
            members = Vec::new();
            load = 0;
            slot += 1;
            if slot >= slot_caps.len() || demand > slot_caps[slot] {
                continue;
            }
        }

        members.push(loc);
        load += demand;
    }

    if !members.is_empty() && slot < slot_caps.len() {
        routes.push(Route::from_interior(problem, &members));
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    fn quadrant_problem(capacity: i32, count: u32) -> Problem {
        Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("ne", "NE", 1.0, 1.0, 10),
                Location::new("nw", "NW", 1.0, -1.0, 10),
                Location::new("sw", "SW", -1.0, -1.0, 10),
                Location::new("se", "SE", -1.0, 1.0, 10),
            ],
            vec![VehicleType::new("v", "Van", capacity, count)],
        )
        .expect("valid")
    }

    #[test]
    fn test_all_in_one_slot() {
        let routes = sweep(&quadrant_problem(40, 1));
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].num_interior(), 4);
    }

    #[test]
    fn test_angular_neighbors_grouped() {
        let routes = sweep(&quadrant_problem(20, 2));
        assert_eq!(routes.len(), 2);
        // Sweep order (angle ascending from -pi): sw, se, ne, nw
        assert_eq!(routes[0].interior_indices(), vec![3, 4]);
        assert_eq!(routes[1].interior_indices(), vec![1, 2]);
    }

    #[test]
    fn test_slots_exhausted_drops_tail() {
        let routes = sweep(&quadrant_problem(10, 2));
        assert_eq!(routes.len(), 2);
        let served: Vec<usize> = routes.iter().flat_map(|r| r.interior_indices()).collect();
        assert_eq!(served.len(), 2);
    }

    #[test]
    fn test_oversized_customer_skipped() {
        let p = Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("big", "Big", 1.0, 1.0, 99),
                Location::new("ok", "Ok", -1.0, -1.0, 5),
            ],
            vec![VehicleType::new("v", "Van", 10, 1)],
        )
        .expect("valid");
        let routes = sweep(&p);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].interior_indices(), vec![2]);
    }

    #[test]
    fn test_empty_instance() {
        let p = Problem::new(
            vec![Location::depot("d", "Depot", 0.0, 0.0)],
            vec![VehicleType::new("v", "Van", 10, 1)],
        )
        .expect("valid");
        assert!(sweep(&p).is_empty());
    }
}
