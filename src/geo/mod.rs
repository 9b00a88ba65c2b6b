//! Geographic primitives.
//!
//! WGS84 latitude/longitude value type with great-circle distance and initial
//! bearing on a spherical earth model. Accurate to well under 0.1% at
//! vehicle-scale distances (kilometers).
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Bearing: degrees true (0-360, 0=north, 90=east)
//! - Distance: meters

use std::f64::consts::PI;
use std::fmt;

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Radians to degrees conversion factor.
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Coordinate validation errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude must be within [-90, 90], got {}", lat)
            }
            GeoError::LongitudeOutOfRange(lon) => {
                write!(f, "longitude must be within [-180, 180], got {}", lon)
            }
        }
    }
}

impl std::error::Error for GeoError {}

/// Immutable WGS84 coordinate in degrees.
///
/// Constructed only through [`GeoPoint::new`], so every value in circulation
/// holds an in-range coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validates and constructs a coordinate. Out-of-range (or non-finite)
    /// values are rejected without constructing.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in meters.
    ///
    /// Uses the haversine formula for accuracy over short distances.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.latitude * DEG_TO_RAD;
        let lat2_rad = other.latitude * DEG_TO_RAD;
        let delta_lat = (other.latitude - self.latitude) * DEG_TO_RAD;
        let delta_lon = (other.longitude - self.longitude) * DEG_TO_RAD;

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }

    /// Initial compass bearing toward `other` in degrees, [0, 360).
    ///
    /// Forward azimuth on the spherical earth model.
    pub fn bearing_to(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.latitude * DEG_TO_RAD;
        let lat2_rad = other.latitude * DEG_TO_RAD;
        let delta_lon = (other.longitude - self.longitude) * DEG_TO_RAD;

        let y = delta_lon.sin() * lat2_rad.cos();
        let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

        normalize_bearing(y.atan2(x) * RAD_TO_DEG)
    }

    /// Linear interpolation between this coordinate and `other`.
    ///
    /// `fraction` is clamped to [0, 1]; a convex combination of two valid
    /// coordinates is always valid.
    pub fn interpolate(&self, other: &GeoPoint, fraction: f64) -> GeoPoint {
        let f = fraction.clamp(0.0, 1.0);
        GeoPoint {
            latitude: self.latitude + (other.latitude - self.latitude) * f,
            longitude: self.longitude + (other.longitude - self.longitude) * f,
        }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Normalize a bearing to the range [0, 360) degrees.
pub fn normalize_bearing(degrees: f64) -> f64 {
    let mut d = degrees % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            GeoPoint::new(90.1, 0.0),
            Err(GeoError::LatitudeOutOfRange(90.1))
        );
        assert_eq!(
            GeoPoint::new(-91.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(-91.0))
        );
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            GeoPoint::new(0.0, 180.5),
            Err(GeoError::LongitudeOutOfRange(180.5))
        );
        assert_eq!(
            GeoPoint::new(0.0, -200.0),
            Err(GeoError::LongitudeOutOfRange(-200.0))
        );
    }

    #[test]
    fn accepts_boundary_coordinates() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn distance_one_hundredth_degree_latitude() {
        // 0.01 degree of latitude is ~1111.95 m on the spherical model
        let dist = point(48.0, 9.0).distance_to(&point(48.01, 9.0));
        assert!((dist - 1111.95).abs() < 1.0, "got {}", dist);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = point(48.7758, 9.1829);
        let b = point(48.1351, 11.5820);
        let ab = a.distance_to(&b);
        let ba = b.distance_to(&a);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let a = point(48.0, 9.0);
        assert!(a.distance_to(&a).abs() < 1e-9);
    }

    #[test]
    fn distance_stuttgart_to_munich() {
        // Roughly 190 km apart
        let stuttgart = point(48.7758, 9.1829);
        let munich = point(48.1351, 11.5820);
        let dist = stuttgart.distance_to(&munich);
        assert!((dist - 190_000.0).abs() < 10_000.0, "got {}", dist);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = point(0.0, 0.0);
        assert!(origin.bearing_to(&point(1.0, 0.0)).abs() < 0.5);
        assert!((origin.bearing_to(&point(0.0, 1.0)) - 90.0).abs() < 0.5);
        assert!((origin.bearing_to(&point(-1.0, 0.0)) - 180.0).abs() < 0.5);
        assert!((origin.bearing_to(&point(0.0, -1.0)) - 270.0).abs() < 0.5);
    }

    #[test]
    fn bearing_is_always_in_range() {
        let a = point(48.0, 9.0);
        for (lat, lon) in [(48.5, 8.5), (47.5, 9.5), (48.0, 8.0), (49.0, 9.0)] {
            let bearing = a.bearing_to(&point(lat, lon));
            assert!((0.0..360.0).contains(&bearing), "bearing {}", bearing);
        }
    }

    #[test]
    fn interpolate_endpoints_and_midpoint() {
        let a = point(48.0, 9.0);
        let b = point(48.01, 9.02);

        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);

        let mid = a.interpolate(&b, 0.5);
        assert!((mid.latitude() - 48.005).abs() < 1e-12);
        assert!((mid.longitude() - 9.01).abs() < 1e-12);
    }

    #[test]
    fn interpolate_clamps_fraction() {
        let a = point(48.0, 9.0);
        let b = point(48.01, 9.0);
        assert_eq!(a.interpolate(&b, -0.5), a);
        assert_eq!(a.interpolate(&b, 1.5), b);
    }

    #[test]
    fn normalize_bearing_wraps() {
        assert_eq!(normalize_bearing(0.0), 0.0);
        assert_eq!(normalize_bearing(360.0), 0.0);
        assert!((normalize_bearing(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_bearing(450.0) - 90.0).abs() < 1e-12);
    }
}
