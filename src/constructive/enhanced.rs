//! Enhanced Clarke-Wright savings.
//!
//! # Algorithm
//!
//! Same endpoint-merge structure as [`clarke_wright`](super::clarke_wright),
//! but each saving is rescored by multiplicative factors before sorting:
//!
//! - **angular continuity** — customers in the same direction from the
//!   depot merge slightly later than customers on opposite bearings;
//! - **capacity compatibility** — pairs whose combined demand exceeds the
//!   largest vehicle are damped toward 0.1;
//! - **urgency** — heavier pairs are nudged up (cap 1.2);
//! - **distance efficiency** — pairs far apart are damped toward 0.8;
//! - **time compatibility** — constant 1.0, reserved for scheduling
//!   extensions.
//!
//! Construction is followed by the enhanced kernel (2-opt to a fixed point,
//! then Or-opt sweeps) instead of the basic 3-opt sandwich.

use std::f64::consts::PI;

use crate::local_search::enhanced_kernel;
use crate::models::{vehicle, Problem, Route};

use super::clarke_wright::{merge_by_savings, reduce_to_slot_count, sort_descending, Saving};
use super::polar_angle;

/// The multiplicative factors applied to one basic saving.
#[derive(Debug, Clone, Copy)]
pub struct SavingFactors {
    /// 1 + 0.15 · normalized angular separation.
    pub angular_continuity: f64,
    /// 1.0 when the pair fits the largest vehicle, damped otherwise.
    pub capacity_compatibility: f64,
    /// Bonus for heavier pairs, capped at 1.2.
    pub urgency: f64,
    /// Penalty for distant pairs, floored at 0.8.
    pub distance_efficiency: f64,
    /// Constant 1.0; kept so scheduling extensions have a seam.
    pub time_compatibility: f64,
}

impl SavingFactors {
    /// Computes the factor set for a customer pair.
    pub fn compute(problem: &Problem, i: usize, j: usize) -> Self {
        let max_cap = vehicle::max_capacity(problem.vehicles()) as f64;
        let combined = (problem.demand(i) + problem.demand(j)) as f64;

        let angular_diff = (polar_angle(problem, i) - polar_angle(problem, j)).abs();
        let angular_bonus = angular_diff.min(2.0 * PI - angular_diff) / PI;
        let angular_continuity = 1.0 + 0.15 * angular_bonus;

        let capacity_compatibility = if combined <= max_cap {
            1.0
        } else {
            (max_cap / combined).max(0.1)
        };

        let urgency = (1.0 + combined / max_cap * 0.2).min(1.2);

        let distance_efficiency = (1.0 - problem.distance(i, j) / 50.0).max(0.8);

        Self {
            angular_continuity,
            capacity_compatibility,
            urgency,
            distance_efficiency,
            time_compatibility: 1.0,
        }
    }

    /// Product of all factors.
    pub fn product(&self) -> f64 {
        self.angular_continuity
            * self.capacity_compatibility
            * self.urgency
            * self.distance_efficiency
            * self.time_compatibility
    }
}

/// Constructs routes using Clarke-Wright savings with the enhanced score.
///
/// Routes are returned without vehicle assignments.
pub fn enhanced_clarke_wright(problem: &Problem) -> Vec<Route> {
    let savings = enhanced_savings(problem);
    let interiors = merge_by_savings(problem, savings);
    let interiors = reduce_to_slot_count(problem, interiors);

    let depot = problem.depot();
    let matrix = problem.matrix();
    interiors
        .into_iter()
        .filter(|members| !members.is_empty())
        .map(|members| {
            let polished = enhanced_kernel(&members, depot, matrix);
            Route::from_interior(problem, &polished)
        })
        .collect()
}

/// Savings list rescored by [`SavingFactors`], sorted by decreasing value.
fn enhanced_savings(problem: &Problem) -> Vec<Saving> {
    let depot = problem.depot();
    let customers = problem.customers();
    let mut savings = Vec::with_capacity(customers.len() * customers.len() / 2);

    for (a, &i) in customers.iter().enumerate() {
        for &j in &customers[a + 1..] {
            let basic = problem.distance(depot, i) + problem.distance(depot, j)
                - problem.distance(i, j);
            if basic <= 0.0 {
                continue;
            }
            let value = basic * SavingFactors::compute(problem, i, j).product();
            savings.push(Saving { i, j, value });
        }
    }

    sort_descending(&mut savings);
    savings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    fn problem(demands: &[(f64, f64, i32)], capacity: i32, count: u32) -> Problem {
        let mut locations = vec![Location::depot("d", "Depot", 0.0, 0.0)];
        for (k, &(lat, lon, demand)) in demands.iter().enumerate() {
            locations.push(Location::new(
                format!("c{k}"),
                format!("C{k}"),
                lat,
                lon,
                demand,
            ));
        }
        Problem::new(locations, vec![VehicleType::new("v", "Van", capacity, count)])
            .expect("valid")
    }

    #[test]
    fn test_factors_within_expected_ranges() {
        let p = problem(&[(0.0, 1.0, 4), (1.0, 0.0, 5)], 10, 2);
        let f = SavingFactors::compute(&p, 1, 2);
        assert!(f.angular_continuity >= 1.0 && f.angular_continuity <= 1.15);
        assert_eq!(f.capacity_compatibility, 1.0);
        assert!(f.urgency > 1.0 && f.urgency <= 1.2);
        assert!(f.distance_efficiency >= 0.8 && f.distance_efficiency <= 1.0);
        assert_eq!(f.time_compatibility, 1.0);
    }

    #[test]
    fn test_capacity_factor_damps_oversized_pairs() {
        let p = problem(&[(0.0, 1.0, 9), (0.0, 2.0, 9)], 10, 2);
        let f = SavingFactors::compute(&p, 1, 2);
        assert!((f.capacity_compatibility - 10.0 / 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_factor_floor() {
        let p = problem(&[(0.0, 1.0, 100), (0.0, 2.0, 100)], 10, 2);
        let f = SavingFactors::compute(&p, 1, 2);
        assert_eq!(f.capacity_compatibility, 0.1);
    }

    #[test]
    fn test_urgency_cap() {
        let p = problem(&[(0.0, 1.0, 10), (0.0, 2.0, 10)], 10, 2);
        let f = SavingFactors::compute(&p, 1, 2);
        assert_eq!(f.urgency, 1.2);
    }

    #[test]
    fn test_distance_efficiency_floor() {
        // ~222 km apart: 1 - 222/50 clamps to 0.8
        let p = problem(&[(0.0, 1.0, 1), (0.0, 3.0, 1)], 10, 2);
        let f = SavingFactors::compute(&p, 1, 2);
        assert_eq!(f.distance_efficiency, 0.8);
    }

    #[test]
    fn test_construction_merges_when_feasible() {
        let p = problem(&[(0.0, 1.0, 3), (0.0, 2.0, 3)], 10, 2);
        let routes = enhanced_clarke_wright(&p);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].total_capacity(), 6);
    }

    #[test]
    fn test_construction_respects_capacity() {
        let p = problem(&[(0.0, 1.0, 8), (0.0, 2.0, 8)], 10, 2);
        let routes = enhanced_clarke_wright(&p);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_all_customers_survive() {
        let p = problem(
            &[
                (0.0, 1.0, 4),
                (1.0, 1.0, 6),
                (1.0, 0.0, 2),
                (-1.0, 0.5, 9),
                (0.5, -1.0, 5),
            ],
            15,
            3,
        );
        let routes = enhanced_clarke_wright(&p);
        let mut served: Vec<usize> = routes.iter().flat_map(|r| r.interior_indices()).collect();
        served.sort_unstable();
        assert_eq!(served, vec![1, 2, 3, 4, 5]);
    }
}
