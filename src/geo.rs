//! Great-circle geometry primitives.
//!
//! All distances in this crate are straight-line haversine estimates; road
//! geometry belongs to the visualization layer and is out of scope. Travel
//! time is derived from distance with a uniform average speed.

/// Average driving speed used to convert distance to duration.
pub const AVERAGE_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two `(lat, lon)` points in kilometers,
/// rounded to 0.001 km.
///
/// Non-finite coordinates yield 0.0 and a warning rather than poisoning the
/// distance matrix with NaN.
///
/// # Examples
///
/// ```
/// use fleet_routing::geo::haversine_km;
///
/// // One degree of latitude is ~111.195 km on a 6371 km sphere.
/// let d = haversine_km((0.0, 0.0), (1.0, 0.0));
/// assert!((d - 111.195).abs() < 1e-9);
/// ```
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    if !lat1.is_finite() || !lon1.is_finite() || !lat2.is_finite() || !lon2.is_finite() {
        log::warn!(
            "non-finite coordinates in distance computation: ({lat1}, {lon1}) -> ({lat2}, {lon2})"
        );
        return 0.0;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round_km(EARTH_RADIUS_KM * c)
}

/// Converts a distance in kilometers to travel time in whole minutes at
/// [`AVERAGE_SPEED_KMH`].
pub fn duration_minutes(km: f64) -> f64 {
    (km / AVERAGE_SPEED_KMH * 60.0).round()
}

/// Returns `true` if both components are finite.
pub fn is_finite_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite() && lon.is_finite()
}

fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point() {
        assert_eq!(haversine_km((36.1, -115.1), (36.1, -115.1)), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Las Vegas to Los Angeles, ~370 km
        let d = haversine_km((36.17, -115.14), (34.05, -118.24));
        assert!(d > 350.0 && d < 400.0, "LV to LA should be ~370km, got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = (36.1, -115.1);
        let b = (36.2, -115.3);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_one_degree_latitude() {
        let d = haversine_km((0.0, 0.0), (1.0, 0.0));
        assert!((d - 111.195).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_to_millimeter_of_km() {
        let d = haversine_km((12.34, 56.78), (23.45, 67.89));
        assert!((d * 1000.0 - (d * 1000.0).round()).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_yields_zero() {
        assert_eq!(haversine_km((f64::NAN, 0.0), (1.0, 1.0)), 0.0);
        assert_eq!(haversine_km((0.0, 0.0), (f64::INFINITY, 1.0)), 0.0);
    }

    #[test]
    fn test_duration_minutes() {
        // 10 km at 40 km/h = 15 minutes
        assert_eq!(duration_minutes(10.0), 15.0);
        // 100 km at 40 km/h = 150 minutes
        assert_eq!(duration_minutes(100.0), 150.0);
        // 7 km -> 10.5 min -> rounds away from the half
        assert_eq!(duration_minutes(7.1), 11.0);
    }

    #[test]
    fn test_is_finite_coordinate() {
        assert!(is_finite_coordinate(0.0, 0.0));
        assert!(!is_finite_coordinate(f64::NAN, 0.0));
        assert!(!is_finite_coordinate(0.0, f64::NEG_INFINITY));
    }
}
