//! Vehicle types and fleet-level helpers.

/// A vehicle type: `count` physical vehicles sharing one capacity.
///
/// At solve time each type expands into `count` independent slots that are
/// indistinguishable except by identity.
///
/// # Examples
///
/// ```
/// use fleet_routing::models::VehicleType;
///
/// let v = VehicleType::new("truck", "Truck", 200, 3);
/// assert_eq!(v.capacity(), 200);
/// assert_eq!(v.count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleType {
    id: String,
    name: String,
    capacity: i32,
    count: u32,
}

impl VehicleType {
    /// Creates a vehicle type.
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: i32, count: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            count,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load capacity of one vehicle of this type.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Number of physical vehicles of this type.
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Largest single-vehicle capacity across the fleet.
pub fn max_capacity(types: &[VehicleType]) -> i32 {
    types.iter().map(|t| t.capacity()).max().unwrap_or(0)
}

/// Total number of vehicle slots across the fleet.
pub fn total_slots(types: &[VehicleType]) -> usize {
    types.iter().map(|t| t.count() as usize).sum()
}

/// Sum of capacity over every slot in the fleet.
pub fn fleet_capacity(types: &[VehicleType]) -> i64 {
    types
        .iter()
        .map(|t| t.capacity() as i64 * t.count() as i64)
        .sum()
}

/// Per-slot capacities in expansion order: types in caller order, each
/// repeated `count` times.
pub fn slot_capacities(types: &[VehicleType]) -> Vec<i32> {
    types
        .iter()
        .flat_map(|t| std::iter::repeat(t.capacity()).take(t.count() as usize))
        .collect()
}
