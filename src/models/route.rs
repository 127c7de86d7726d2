//! Route and stop types.

use crate::models::Problem;
use crate::geo::duration_minutes;

/// A single stop within a route.
///
/// Stops reference the location arena by index rather than denormalizing
/// coordinates; the serialization layer rehydrates names and coordinates
/// when a solution leaves the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    /// Arena index of the visited location.
    pub location: usize,
    /// Position of this stop within its route.
    pub order: usize,
}

/// An ordered stop sequence beginning and ending at the depot.
///
/// The first and last stops are always the depot sentinels; the slice
/// strictly between them is the route interior that local search operates
/// on. Distance (km), duration (minutes) and served demand are cached and
/// refreshed by [`recompute_metrics`](Route::recompute_metrics) after any
/// structural change.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    stops: Vec<Stop>,
    vehicle: Option<String>,
    vehicle_name: Option<String>,
    distance: f64,
    duration: f64,
    total_capacity: i32,
    capacity_exceeded: bool,
}

impl Route {
    /// Builds a depot-rooted route over the given interior location indices
    /// and computes its metrics.
    pub fn from_interior(problem: &Problem, interior: &[usize]) -> Self {
        let depot = problem.depot();
        let mut stops = Vec::with_capacity(interior.len() + 2);
        stops.push(Stop {
            location: depot,
            order: 0,
        });
        for (k, &loc) in interior.iter().enumerate() {
            stops.push(Stop {
                location: loc,
                order: k + 1,
            });
        }
        stops.push(Stop {
            location: depot,
            order: interior.len() + 1,
        });

        let mut route = Self {
            stops,
            vehicle: None,
            vehicle_name: None,
            distance: 0.0,
            duration: 0.0,
            total_capacity: 0,
            capacity_exceeded: false,
        };
        route.recompute_metrics(problem);
        route
    }

    /// All stops including the depot sentinels.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The stops strictly between the depot sentinels.
    pub fn interior(&self) -> &[Stop] {
        &self.stops[1..self.stops.len() - 1]
    }

    /// Arena indices of the interior stops, in order.
    pub fn interior_indices(&self) -> Vec<usize> {
        self.interior().iter().map(|s| s.location).collect()
    }

    /// Number of interior stops.
    pub fn num_interior(&self) -> usize {
        self.stops.len() - 2
    }

    /// Assigned vehicle slot id, if any.
    pub fn vehicle(&self) -> Option<&str> {
        self.vehicle.as_deref()
    }

    /// Assigned vehicle name, or the unassigned marker.
    pub fn vehicle_name(&self) -> Option<&str> {
        self.vehicle_name.as_deref()
    }

    /// Cached total distance in km.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Cached total duration in minutes.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Sum of demand over the interior stops.
    pub fn total_capacity(&self) -> i32 {
        self.total_capacity
    }

    /// Whether this route could not be assigned within any slot capacity.
    pub fn capacity_exceeded(&self) -> bool {
        self.capacity_exceeded
    }

    /// Assigns a vehicle slot to this route.
    pub fn assign_vehicle(&mut self, slot_id: impl Into<String>, slot_name: impl Into<String>) {
        self.vehicle = Some(slot_id.into());
        self.vehicle_name = Some(slot_name.into());
        self.capacity_exceeded = false;
    }

    /// Marks this route as unassignable, clearing any slot.
    pub fn mark_capacity_exceeded(&mut self, marker_name: impl Into<String>) {
        self.vehicle = None;
        self.vehicle_name = Some(marker_name.into());
        self.capacity_exceeded = true;
    }

    /// Inserts interior stops immediately before the trailing depot
    /// sentinel. Callers must renumber and recompute afterwards.
    pub fn insert_interior_before_end(&mut self, locations: &[usize]) {
        let at = self.stops.len() - 1;
        for (k, &loc) in locations.iter().enumerate() {
            self.stops.insert(
                at + k,
                Stop {
                    location: loc,
                    order: 0,
                },
            );
        }
    }

    /// Swaps two interior stops by their positions in the interior slice.
    pub fn swap_interior(&mut self, a: usize, b: usize) {
        self.stops.swap(a + 1, b + 1);
        self.renumber_orders();
    }

    /// Replaces the interior with a new location sequence, keeping the
    /// vehicle assignment and refreshing metrics.
    pub fn set_interior(&mut self, problem: &Problem, locations: &[usize]) {
        let rebuilt = Route::from_interior(problem, locations);
        self.stops = rebuilt.stops;
        self.distance = rebuilt.distance;
        self.duration = rebuilt.duration;
        self.total_capacity = rebuilt.total_capacity;
    }

    /// Rewrites each stop's `order` to its position.
    pub fn renumber_orders(&mut self) {
        for (k, stop) in self.stops.iter_mut().enumerate() {
            stop.order = k;
        }
    }

    /// Recomputes cached distance, duration and served demand from the
    /// distance matrix. Idempotent; must be called after any structural
    /// change before the route is exposed.
    pub fn recompute_metrics(&mut self, problem: &Problem) {
        let matrix = problem.matrix();
        let mut distance = 0.0;
        for pair in self.stops.windows(2) {
            distance += matrix.get(pair[0].location, pair[1].location);
        }
        self.distance = distance;
        self.duration = duration_minutes(distance);
        self.total_capacity = self
            .interior()
            .iter()
            .map(|s| problem.demand(s.location))
            .sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    fn line_problem() -> Problem {
        Problem::new(
            vec![
                Location::depot("d", "Depot", 0.0, 0.0),
                Location::new("a", "A", 0.0, 1.0, 5),
                Location::new("b", "B", 0.0, 2.0, 7),
            ],
            vec![VehicleType::new("v", "Van", 20, 1)],
        )
        .expect("valid")
    }

    #[test]
    fn test_from_interior_sentinels() {
        let p = line_problem();
        let r = Route::from_interior(&p, &[1, 2]);
        assert_eq!(r.stops().len(), 4);
        assert_eq!(r.stops()[0].location, p.depot());
        assert_eq!(r.stops()[3].location, p.depot());
        assert_eq!(r.interior_indices(), vec![1, 2]);
        assert_eq!(r.num_interior(), 2);
    }

    #[test]
    fn test_orders_are_positions() {
        let p = line_problem();
        let r = Route::from_interior(&p, &[2, 1]);
        let orders: Vec<usize> = r.stops().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_metrics() {
        let p = line_problem();
        let r = Route::from_interior(&p, &[1, 2]);
        // depot→a→b→depot along the equator: 111.195 * 4 total
        assert!((r.distance() - 4.0 * 111.195).abs() < 1e-6);
        assert_eq!(r.duration(), (r.distance() / 40.0 * 60.0).round());
        assert_eq!(r.total_capacity(), 12);
        assert!(!r.capacity_exceeded());
    }

    #[test]
    fn test_recompute_idempotent() {
        let p = line_problem();
        let mut r = Route::from_interior(&p, &[1, 2]);
        let (d1, t1) = (r.distance(), r.duration());
        r.recompute_metrics(&p);
        r.recompute_metrics(&p);
        assert_eq!(r.distance(), d1);
        assert_eq!(r.duration(), t1);
    }

    #[test]
    fn test_swap_interior() {
        let p = line_problem();
        let mut r = Route::from_interior(&p, &[1, 2]);
        r.swap_interior(0, 1);
        r.recompute_metrics(&p);
        assert_eq!(r.interior_indices(), vec![2, 1]);
        let orders: Vec<usize> = r.stops().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_insert_before_end() {
        let p = line_problem();
        let mut r = Route::from_interior(&p, &[1]);
        r.insert_interior_before_end(&[2]);
        r.renumber_orders();
        r.recompute_metrics(&p);
        assert_eq!(r.interior_indices(), vec![1, 2]);
        assert_eq!(r.total_capacity(), 12);
        assert_eq!(r.stops().last().expect("sentinel").location, p.depot());
    }

    #[test]
    fn test_capacity_exceeded_marker() {
        let p = line_problem();
        let mut r = Route::from_interior(&p, &[1]);
        r.mark_capacity_exceeded("Unassigned — Insufficient Capacity");
        assert!(r.capacity_exceeded());
        assert_eq!(r.vehicle(), None);
        assert_eq!(r.vehicle_name(), Some("Unassigned — Insufficient Capacity"));
        r.assign_vehicle("van-1", "Van");
        assert!(!r.capacity_exceeded());
        assert_eq!(r.vehicle(), Some("van-1"));
    }

    #[test]
    fn test_empty_interior() {
        let p = line_problem();
        let r = Route::from_interior(&p, &[]);
        assert_eq!(r.num_interior(), 0);
        assert_eq!(r.distance(), 0.0);
        assert_eq!(r.total_capacity(), 0);
    }
}
