//! Validated problem instance.

use std::collections::HashMap;

use crate::distance::DistanceMatrix;
use crate::error::{BadInputKind, SolveError};
use crate::geo::is_finite_coordinate;
use crate::models::{Location, VehicleType};

/// Hard limit on locations per instance.
pub const MAX_LOCATIONS: usize = 100;

/// Hard limit on vehicle types per instance.
pub const MAX_VEHICLE_TYPES: usize = 20;

/// A validated CVRP instance with its distance matrix.
///
/// Construction is the single validation gate: every algorithm may assume a
/// `Problem` has exactly one depot, finite coordinates, non-negative demands
/// and a non-empty fleet. The matrix is computed once and shared read-only
/// across all algorithms of a solve.
///
/// # Examples
///
/// ```
/// use fleet_routing::models::{Location, Problem, VehicleType};
///
/// let problem = Problem::new(
///     vec![
///         Location::depot("d", "Depot", 0.0, 0.0),
///         Location::new("a", "A", 0.0, 1.0, 5),
///     ],
///     vec![VehicleType::new("v", "Van", 10, 1)],
/// )
/// .unwrap();
/// assert_eq!(problem.num_customers(), 1);
/// assert!(problem.distance(0, 1) > 111.0);
/// ```
#[derive(Debug, Clone)]
pub struct Problem {
    locations: Vec<Location>,
    vehicles: Vec<VehicleType>,
    depot: usize,
    matrix: DistanceMatrix,
    index_by_id: HashMap<String, usize>,
}

impl Problem {
    /// Validates an instance and builds its distance matrix.
    ///
    /// Rejects empty lists, oversized instances, a missing or duplicated
    /// depot, non-finite coordinates, negative demands, and vehicle types
    /// with zero capacity or count.
    pub fn new(locations: Vec<Location>, vehicles: Vec<VehicleType>) -> Result<Self, SolveError> {
        if locations.is_empty() {
            return Err(SolveError::BadInput(BadInputKind::EmptyLocations));
        }
        if vehicles.is_empty() {
            return Err(SolveError::BadInput(BadInputKind::EmptyVehicles));
        }
        if locations.len() > MAX_LOCATIONS {
            return Err(SolveError::BadInput(BadInputKind::TooManyLocations(
                locations.len(),
            )));
        }
        if vehicles.len() > MAX_VEHICLE_TYPES {
            return Err(SolveError::BadInput(BadInputKind::TooManyVehicleTypes(
                vehicles.len(),
            )));
        }

        let mut depot = None;
        for (i, loc) in locations.iter().enumerate() {
            if !is_finite_coordinate(loc.latitude(), loc.longitude()) {
                return Err(SolveError::BadInput(BadInputKind::NonFiniteCoordinate {
                    location: loc.id().to_string(),
                }));
            }
            if loc.raw_demand() < 0 {
                return Err(SolveError::BadInput(BadInputKind::NegativeDemand {
                    location: loc.id().to_string(),
                }));
            }
            if loc.is_depot() {
                if depot.is_some() {
                    return Err(SolveError::BadInput(BadInputKind::MultipleDepots));
                }
                depot = Some(i);
            }
        }
        let depot = depot.ok_or(SolveError::BadInput(BadInputKind::MissingDepot))?;

        for v in &vehicles {
            if v.capacity() <= 0 || v.count() == 0 {
                return Err(SolveError::BadInput(BadInputKind::InvalidVehicle {
                    vehicle: v.id().to_string(),
                }));
            }
        }

        let matrix = DistanceMatrix::from_locations(&locations);
        let index_by_id = locations
            .iter()
            .enumerate()
            .map(|(i, loc)| (loc.id().to_string(), i))
            .collect();

        Ok(Self {
            locations,
            vehicles,
            depot,
            matrix,
            index_by_id,
        })
    }

    /// All locations, depot included, in caller order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// The fleet, in caller order.
    pub fn vehicles(&self) -> &[VehicleType] {
        &self.vehicles
    }

    /// Arena index of the depot.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// The shared distance matrix.
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// The location at the given arena index.
    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    /// Arena index for a location id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    /// Distance in km between two arena indices.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// Arena indices of all non-depot locations, in caller order.
    pub fn customers(&self) -> Vec<usize> {
        (0..self.locations.len())
            .filter(|&i| i != self.depot)
            .collect()
    }

    /// Number of non-depot locations.
    pub fn num_customers(&self) -> usize {
        self.locations.len() - 1
    }

    /// Demand at an arena index (zero for the depot).
    pub fn demand(&self, index: usize) -> i32 {
        self.locations[index].demand()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_locations() -> Vec<Location> {
        vec![
            Location::depot("d", "Depot", 0.0, 0.0),
            Location::new("a", "A", 0.0, 1.0, 5),
            Location::new("b", "B", 0.0, 2.0, 7),
        ]
    }

    fn valid_vehicles() -> Vec<VehicleType> {
        vec![VehicleType::new("v", "Van", 10, 2)]
    }

    #[test]
    fn test_valid_instance() {
        let p = Problem::new(valid_locations(), valid_vehicles()).expect("valid");
        assert_eq!(p.depot(), 0);
        assert_eq!(p.num_customers(), 2);
        assert_eq!(p.customers(), vec![1, 2]);
        assert_eq!(p.index_of("b"), Some(2));
        assert_eq!(p.index_of("zz"), None);
        assert_eq!(p.demand(0), 0);
        assert_eq!(p.demand(2), 7);
    }

    #[test]
    fn test_depot_not_first() {
        let locations = vec![
            Location::new("a", "A", 0.0, 1.0, 5),
            Location::depot("d", "Depot", 0.0, 0.0),
        ];
        let p = Problem::new(locations, valid_vehicles()).expect("valid");
        assert_eq!(p.depot(), 1);
        assert_eq!(p.customers(), vec![0]);
    }

    #[test]
    fn test_empty_locations() {
        let err = Problem::new(vec![], valid_vehicles()).unwrap_err();
        assert_eq!(err, SolveError::BadInput(BadInputKind::EmptyLocations));
    }

    #[test]
    fn test_empty_vehicles() {
        let err = Problem::new(valid_locations(), vec![]).unwrap_err();
        assert_eq!(err, SolveError::BadInput(BadInputKind::EmptyVehicles));
    }

    #[test]
    fn test_missing_depot() {
        let locations = vec![Location::new("a", "A", 0.0, 1.0, 5)];
        let err = Problem::new(locations, valid_vehicles()).unwrap_err();
        assert_eq!(err, SolveError::BadInput(BadInputKind::MissingDepot));
    }

    #[test]
    fn test_multiple_depots() {
        let locations = vec![
            Location::depot("d1", "Depot 1", 0.0, 0.0),
            Location::depot("d2", "Depot 2", 1.0, 1.0),
        ];
        let err = Problem::new(locations, valid_vehicles()).unwrap_err();
        assert_eq!(err, SolveError::BadInput(BadInputKind::MultipleDepots));
    }

    #[test]
    fn test_too_many_locations() {
        let mut locations = vec![Location::depot("d", "Depot", 0.0, 0.0)];
        for i in 0..100 {
            locations.push(Location::new(format!("c{i}"), "C", 0.01 * i as f64, 0.0, 1));
        }
        let err = Problem::new(locations, valid_vehicles()).unwrap_err();
        assert_eq!(err, SolveError::BadInput(BadInputKind::TooManyLocations(101)));
    }

    #[test]
    fn test_too_many_vehicle_types() {
        let vehicles: Vec<VehicleType> = (0..21)
            .map(|i| VehicleType::new(format!("v{i}"), "V", 10, 1))
            .collect();
        let err = Problem::new(valid_locations(), vehicles).unwrap_err();
        assert_eq!(
            err,
            SolveError::BadInput(BadInputKind::TooManyVehicleTypes(21))
        );
    }

    #[test]
    fn test_non_finite_coordinates() {
        let locations = vec![
            Location::depot("d", "Depot", 0.0, 0.0),
            Location::new("a", "A", f64::NAN, 1.0, 5),
        ];
        let err = Problem::new(locations, valid_vehicles()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::BadInput(BadInputKind::NonFiniteCoordinate { .. })
        ));
    }

    #[test]
    fn test_negative_demand() {
        let locations = vec![
            Location::depot("d", "Depot", 0.0, 0.0),
            Location::new("a", "A", 0.0, 1.0, -3),
        ];
        let err = Problem::new(locations, valid_vehicles()).unwrap_err();
        assert!(matches!(
            err,
            SolveError::BadInput(BadInputKind::NegativeDemand { .. })
        ));
    }

    #[test]
    fn test_invalid_vehicle() {
        let err = Problem::new(
            valid_locations(),
            vec![VehicleType::new("v", "Van", 0, 1)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolveError::BadInput(BadInputKind::InvalidVehicle { .. })
        ));

        let err = Problem::new(
            valid_locations(),
            vec![VehicleType::new("v", "Van", 10, 0)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SolveError::BadInput(BadInputKind::InvalidVehicle { .. })
        ));
    }
}
