//! Constructive heuristics.
//!
//! - [`clarke_wright`] — classic savings merges with 2-opt/3-opt polishing
//! - [`enhanced_clarke_wright`] — factor-weighted savings with Or-opt polishing
//! - [`nearest_neighbor`] — greedy nearest feasible customer per vehicle slot
//! - [`sweep`] — polar-angle packing (building block, not in the registry)

mod clarke_wright;
mod enhanced;
mod nearest_neighbor;
mod sweep;

pub use clarke_wright::clarke_wright;
pub use enhanced::{enhanced_clarke_wright, SavingFactors};
pub use nearest_neighbor::nearest_neighbor;
pub use sweep::sweep;

use crate::models::Problem;

/// Polar angle of a location around the depot, in radians.
///
/// Measured as `atan2(Δlat, Δlon)`, matching the bearing used by both the
/// sweep constructor and the enhanced savings score.
pub(crate) fn polar_angle(problem: &Problem, location: usize) -> f64 {
    let depot = problem.location(problem.depot());
    let loc = problem.location(location);
    (loc.latitude() - depot.latitude()).atan2(loc.longitude() - depot.longitude())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    #[test]
    fn test_polar_angle_quadrants() {
        let p = Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("e", "East", 0.0, 1.0, 1),
                Location::new("n", "North", 1.0, 0.0, 1),
            ],
            vec![VehicleType::new("v", "Van", 10, 1)],
        )
        .expect("valid");
        assert!(polar_angle(&p, 1).abs() < 1e-12);
        assert!((polar_angle(&p, 2) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
