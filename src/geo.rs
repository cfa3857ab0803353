//! Great-circle distance on a spherical Earth

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// Total over all inputs: coordinates are not range-checked here. Use
/// [`GeoPoint::new`] where validation is wanted.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat_from = lat1.to_radians();
    let lat_to = lat2.to_radians();
    let lat_delta = lat_to - lat_from;
    let lon_delta = (lon2 - lon1).to_radians();

    let a = (lat_delta / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (lon_delta / 2.0).sin().powi(2);

    // Rounding can push `a` a hair past 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates
    pub fn new(lat: f64, lng: f64) -> crate::Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(crate::StoreLocatorError::InvalidArgument(format!(
                "latitude {lat} is outside [-90, 90]"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(crate::StoreLocatorError::InvalidArgument(format!(
                "longitude {lng} is outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Distance to another point in kilometres
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        for (lat, lng) in [(0.0, 0.0), (40.0, -75.0), (-33.87, 151.21), (89.9, 179.9)] {
            assert_eq!(distance_km(lat, lng, lat, lng), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let forward = distance_km(51.5074, -0.1278, 48.8566, 2.3522);
        let backward = distance_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_london_to_paris() {
        let d = distance_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::new(40.0, -75.0).is_ok());
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(90.5, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_geo_point_distance_matches_free_function() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0).unwrap();
        assert_eq!(a.distance_to(&b), distance_km(0.0, 0.0, 0.0, 1.0));
    }
}
