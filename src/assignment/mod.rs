//! Vehicle slot assignment and route repair.
//!
//! Converts a raw route set into a capacity-respecting assignment over the
//! expanded fleet:
//!
//! 1. expand each vehicle type into `count` slots;
//! 2. strict best-fit assignment, largest routes first;
//! 3. pack leftover routes into slots that still have room, merging stops
//!    into the slot's existing route;
//! 4. split multi-stop leftovers across fresh slots, skipping stops no
//!    slot can carry;
//! 5. place remaining singletons, marking the unplaceable ones.
//!
//! Every route leaves with fresh metrics and one more pass of the invoking
//! algorithm's polishing kernel.

use crate::local_search::{polish, PolishKind};
use crate::models::{Problem, Route, VehicleType};

/// Marker name for routes no slot can carry.
pub const UNASSIGNED_MARKER: &str = "Unassigned — Insufficient Capacity";

/// One physical vehicle expanded from a [`VehicleType`].
#[derive(Debug, Clone)]
pub struct VehicleSlot {
    /// Slot identity, `{type_id}-{ordinal}`.
    pub id: String,
    /// Owning vehicle type id.
    pub type_id: String,
    /// Vehicle type name.
    pub name: String,
    /// Capacity of this slot.
    pub capacity: i32,
    /// Whether a route has claimed this slot.
    pub used: bool,
    /// Demand currently loaded onto this slot.
    pub current_load: i32,
}

/// Expands vehicle types into slots, in type order.
pub fn expand_slots(types: &[VehicleType]) -> Vec<VehicleSlot> {
    let mut slots = Vec::new();
    for t in types {
        for k in 1..=t.count() {
            slots.push(VehicleSlot {
                id: format!("{}-{k}", t.id()),
                type_id: t.id().to_string(),
                name: t.name().to_string(),
                capacity: t.capacity(),
                used: false,
                current_load: 0,
            });
        }
    }
    slots
}

/// Assigns vehicle slots to routes and repairs what does not fit.
///
/// Routes come back with fresh metrics and the given polishing kernel
/// applied once more; empty routes are dropped.
pub fn assign_vehicles(routes: Vec<Route>, problem: &Problem, kernel: PolishKind) -> Vec<Route> {
    let mut slots = expand_slots(problem.vehicles());
    let mut routes: Vec<Route> = routes.into_iter().filter(|r| r.num_interior() > 0).collect();

    // Step 2: strict best-fit, largest demand first. slot_of[i] tracks the
    // slot claimed by routes[i] so later packing can find merge targets.
    let mut slot_of: Vec<Option<usize>> = vec![None; routes.len()];
    let mut order: Vec<usize> = (0..routes.len()).collect();
    order.sort_by(|&a, &b| routes[b].total_capacity().cmp(&routes[a].total_capacity()));

    for &ri in &order {
        let demand = routes[ri].total_capacity();
        let mut best: Option<(usize, i32)> = None;
        for (si, slot) in slots.iter().enumerate() {
            if slot.used || slot.capacity < demand {
                continue;
            }
            let slack = slot.capacity - (slot.current_load + demand);
            match best {
                Some((_, best_slack)) if slack >= best_slack => {}
                _ => best = Some((si, slack)),
            }
        }
        if let Some((si, _)) = best {
            slots[si].used = true;
            slots[si].current_load += demand;
            routes[ri].assign_vehicle(slots[si].id.clone(), slots[si].name.clone());
            slot_of[ri] = Some(si);
        }
    }

    // Step 3: pack unassigned routes into used slots with room.
    let mut absorbed = vec![false; routes.len()];
    for ri in 0..routes.len() {
        if slot_of[ri].is_some() || absorbed[ri] {
            continue;
        }
        let demand = routes[ri].total_capacity();
        let target_slot = slots
            .iter()
            .position(|s| s.used && s.capacity - s.current_load >= demand);
        let Some(si) = target_slot else {
            continue;
        };
        let target_route = slot_of
            .iter()
            .position(|&s| s == Some(si))
            .expect("used slot has an owning route");

        let members = routes[ri].interior_indices();
        let target = &mut routes[target_route];
        target.insert_interior_before_end(&members);
        target.renumber_orders();
        target.recompute_metrics(problem);
        slots[si].current_load += demand;
        absorbed[ri] = true;
    }

    // Step 4: split remaining multi-stop routes across fresh slots.
    let mut split_routes: Vec<(Route, usize)> = Vec::new();
    let mut split_away = vec![false; routes.len()];
    for ri in 0..routes.len() {
        if slot_of[ri].is_some() || absorbed[ri] || routes[ri].num_interior() <= 1 {
            continue;
        }
        split_away[ri] = true;

        let mut piece: Vec<usize> = Vec::new();
        let mut piece_load = 0;
        let mut current: Option<usize> = None;

        for loc in routes[ri].interior_indices() {
            let demand = problem.demand(loc);

            if let Some(si) = current {
                if piece_load + demand > slots[si].capacity {
                    close_piece(problem, &mut split_routes, &mut slots, &mut piece, piece_load, si);
                    piece_load = 0;
                    current = claim_slot(&mut slots, demand);
                    if current.is_none() {
                        log::warn!(
                            "no vehicle slot can carry location '{}' (demand {demand}); skipping",
                            problem.location(loc).id()
                        );
                        continue;
                    }
                }
            } else {
                current = claim_slot(&mut slots, demand);
                if current.is_none() {
                    log::warn!(
                        "no vehicle slot can carry location '{}' (demand {demand}); skipping",
                        problem.location(loc).id()
                    );
                    continue;
                }
            }

            piece.push(loc);
            piece_load += demand;
        }
        if let Some(si) = current {
            if !piece.is_empty() {
                close_piece(problem, &mut split_routes, &mut slots, &mut piece, piece_load, si);
            }
        }
    }

    // Step 5: remaining singletons take any free slot that fits, or are
    // marked as unassignable.
    for ri in 0..routes.len() {
        if slot_of[ri].is_some() || absorbed[ri] || split_away[ri] {
            continue;
        }
        let demand = routes[ri].total_capacity();
        match claim_slot(&mut slots, demand) {
            Some(si) => {
                slots[si].current_load += demand;
                routes[ri].assign_vehicle(slots[si].id.clone(), slots[si].name.clone());
                slot_of[ri] = Some(si);
            }
            None => routes[ri].mark_capacity_exceeded(UNASSIGNED_MARKER),
        }
    }

    let mut result: Vec<Route> = routes
        .into_iter()
        .enumerate()
        .filter(|(ri, _)| !absorbed[*ri] && !split_away[*ri])
        .map(|(_, r)| r)
        .collect();
    result.extend(split_routes.into_iter().map(|(r, _)| r));

    // Final pass: fresh metrics, then the invoking algorithm's kernel.
    let depot = problem.depot();
    let matrix = problem.matrix();
    for route in &mut result {
        route.recompute_metrics(problem);
        let polished = polish(kernel, &route.interior_indices(), depot, matrix);
        if polished != route.interior_indices() {
            route.set_interior(problem, &polished);
        }
    }

    result.retain(|r| r.num_interior() > 0);
    result
}

/// First unused slot admitting the given demand.
fn claim_slot(slots: &mut [VehicleSlot], demand: i32) -> Option<usize> {
    let si = slots
        .iter()
        .position(|s| !s.used && s.capacity >= demand)?;
    slots[si].used = true;
    Some(si)
}

fn close_piece(
    problem: &Problem,
    out: &mut Vec<(Route, usize)>,
    slots: &mut [VehicleSlot],
    piece: &mut Vec<usize>,
    piece_load: i32,
    slot: usize,
) {
    let mut route = Route::from_interior(problem, piece);
    route.assign_vehicle(slots[slot].id.clone(), slots[slot].name.clone());
    slots[slot].current_load += piece_load;
    out.push((route, slot));
    piece.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, VehicleType};

    fn problem(demands: &[i32], fleet: Vec<VehicleType>) -> Problem {
        let mut locations = vec![Location::depot("d", "Depot", 0.0, 0.0)];
        for (k, &demand) in demands.iter().enumerate() {
            locations.push(Location::new(
                format!("c{k}"),
                format!("C{k}"),
                0.0,
                (k + 1) as f64,
                demand,
            ));
        }
        Problem::new(locations, fleet).expect("valid")
    }

    #[test]
    fn test_expand_slots() {
        let slots = expand_slots(&[
            VehicleType::new("van", "Van", 50, 2),
            VehicleType::new("truck", "Truck", 200, 1),
        ]);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].id, "van-1");
        assert_eq!(slots[1].id, "van-2");
        assert_eq!(slots[2].id, "truck-1");
        assert!(slots.iter().all(|s| !s.used && s.current_load == 0));
    }

    #[test]
    fn test_strict_best_fit_prefers_tightest_slot() {
        let p = problem(
            &[40],
            vec![
                VehicleType::new("truck", "Truck", 200, 1),
                VehicleType::new("van", "Van", 50, 1),
            ],
        );
        let routes = vec![Route::from_interior(&p, &[1])];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        assert_eq!(assigned.len(), 1);
        // Van leaves slack 10, truck 160: best fit picks the van
        assert_eq!(assigned[0].vehicle(), Some("van-1"));
        assert!(!assigned[0].capacity_exceeded());
    }

    #[test]
    fn test_pack_merges_into_used_slot() {
        let p = problem(&[6, 3], vec![VehicleType::new("van", "Van", 10, 1)]);
        let routes = vec![
            Route::from_interior(&p, &[1]),
            Route::from_interior(&p, &[2]),
        ];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        // One slot: the 3-demand route merges into the 6-demand route
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].total_capacity(), 9);
        assert_eq!(assigned[0].vehicle(), Some("van-1"));
        let orders: Vec<usize> = assigned[0].stops().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_split_across_fresh_slots() {
        let p = problem(&[6, 6, 6], vec![VehicleType::new("van", "Van", 10, 3)]);
        // One oversized route holding all three customers (18 > any slot)
        let routes = vec![Route::from_interior(&p, &[1, 2, 3])];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        assert_eq!(assigned.len(), 3);
        for r in &assigned {
            assert!(r.total_capacity() <= 10);
            assert!(r.vehicle().is_some());
            assert!(!r.capacity_exceeded());
        }
        let mut served: Vec<usize> = assigned.iter().flat_map(|r| r.interior_indices()).collect();
        served.sort_unstable();
        assert_eq!(served, vec![1, 2, 3]);
    }

    #[test]
    fn test_split_skips_uncarriable_stop() {
        let p = problem(&[6, 99], vec![VehicleType::new("van", "Van", 10, 2)]);
        let routes = vec![Route::from_interior(&p, &[1, 2])];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].interior_indices(), vec![1]);
    }

    #[test]
    fn test_singleton_without_slot_is_marked() {
        let p = problem(&[8, 8], vec![VehicleType::new("van", "Van", 10, 1)]);
        let routes = vec![
            Route::from_interior(&p, &[1]),
            Route::from_interior(&p, &[2]),
        ];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        assert_eq!(assigned.len(), 2);
        let exceeded: Vec<&Route> = assigned.iter().filter(|r| r.capacity_exceeded()).collect();
        assert_eq!(exceeded.len(), 1);
        assert_eq!(exceeded[0].vehicle(), None);
        assert_eq!(exceeded[0].vehicle_name(), Some(UNASSIGNED_MARKER));
    }

    #[test]
    fn test_two_routes_two_slots() {
        let p = problem(&[7, 7], vec![VehicleType::new("van", "Van", 10, 2)]);
        let routes = vec![
            Route::from_interior(&p, &[1]),
            Route::from_interior(&p, &[2]),
        ];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        assert_eq!(assigned.len(), 2);
        let mut ids: Vec<&str> = assigned.iter().filter_map(|r| r.vehicle()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["van-1", "van-2"]);
    }

    #[test]
    fn test_polish_runs_after_assignment() {
        let p = problem(&[2, 2, 2], vec![VehicleType::new("van", "Van", 10, 1)]);
        // Deliberately scrambled interior
        let routes = vec![Route::from_interior(&p, &[2, 1, 3])];
        let before = routes[0].distance();
        let assigned = assign_vehicles(routes, &p, PolishKind::Basic);
        assert!(assigned[0].distance() <= before);
        assert_eq!(assigned[0].interior_indices(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_routes_dropped() {
        let p = problem(&[5], vec![VehicleType::new("van", "Van", 10, 1)]);
        let routes = vec![Route::from_interior(&p, &[]), Route::from_interior(&p, &[1])];
        let assigned = assign_vehicles(routes, &p, PolishKind::None);
        assert_eq!(assigned.len(), 1);
    }
}
