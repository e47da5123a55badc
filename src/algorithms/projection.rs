//! Geodetic to map-frame projection
//!
//! Samples are converted to Earth-centered Earth-fixed coordinates and
//! rotated into the local tangent plane (East-North-Up) at the map origin.
//! The map frame is then:
//! - x pointing north
//! - y pointing west
//! - z pointing up
//!
//! scaled to map units (millimeters unless configured otherwise).

use nalgebra::{Matrix3, Vector3};

use crate::core::{
    GeodeticCoordinate, LocalPoint, MapOrigin, MILLIMETERS_PER_METER, WGS84_ECCENTRICITY_SQUARED,
    WGS84_SEMI_MAJOR_AXIS,
};

/// Iteration cap for the ECEF to geodetic latitude solution
const MAX_LATITUDE_ITERATIONS: usize = 10;

/// Convergence tolerance for the latitude solution (radians)
const LATITUDE_TOLERANCE: f64 = 1e-14;

/// Tangent-plane transform anchored at a map origin
#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticProjector {
    origin: MapOrigin,
    origin_ecef: Vector3<f64>,
    /// Rows are the east, north and up unit vectors at the origin
    ecef_to_enu: Matrix3<f64>,
    units_per_meter: f64,
}

impl GeodeticProjector {
    /// Projector producing millimeters
    pub fn new(origin: MapOrigin) -> Self {
        Self::with_units(origin, MILLIMETERS_PER_METER)
    }

    pub fn with_units(origin: MapOrigin, units_per_meter: f64) -> Self {
        let coordinate = origin.coordinate();
        let (sin_lat, cos_lat) = coordinate.latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = coordinate.longitude.to_radians().sin_cos();

        let ecef_to_enu = Matrix3::new(
            -sin_lon, cos_lon, 0.0,
            -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat,
            cos_lat * cos_lon, cos_lat * sin_lon, sin_lat,
        );

        Self {
            origin_ecef: geodetic_to_ecef(coordinate),
            origin,
            ecef_to_enu,
            units_per_meter,
        }
    }

    pub fn origin(&self) -> &MapOrigin {
        &self.origin
    }

    pub fn units_per_meter(&self) -> f64 {
        self.units_per_meter
    }

    /// East, north and up offsets of `sample` from the origin, in meters
    pub fn enu(&self, sample: &GeodeticCoordinate) -> Vector3<f64> {
        self.ecef_to_enu * (geodetic_to_ecef(sample) - self.origin_ecef)
    }

    /// Planar map position of `sample`
    pub fn project(&self, sample: &GeodeticCoordinate) -> LocalPoint {
        let (x, y, _) = self.project_3d(sample);
        LocalPoint::new(x, y)
    }

    /// Map position of `sample` including height above the origin
    pub fn project_3d(&self, sample: &GeodeticCoordinate) -> (f64, f64, f64) {
        let enu = self.enu(sample);
        let scale = self.units_per_meter;
        (enu.y * scale, -enu.x * scale, enu.z * scale)
    }

    /// Geodetic position of a map point at height `z` (map units) above the origin
    pub fn unproject(&self, point: &LocalPoint, z: f64) -> GeodeticCoordinate {
        let scale = self.units_per_meter;
        let enu = Vector3::new(-point.y / scale, point.x / scale, z / scale);
        let ecef = self.origin_ecef + self.ecef_to_enu.transpose() * enu;
        ecef_to_geodetic(&ecef)
    }
}

/// Project `sample` relative to `origin`.
///
/// Returns [`LocalPoint::UNDEFINED`] when there is no origin; a position is
/// never guessed.
pub fn project(origin: Option<&MapOrigin>, sample: &GeodeticCoordinate) -> LocalPoint {
    match origin {
        Some(origin) => GeodeticProjector::new(*origin).project(sample),
        None => LocalPoint::UNDEFINED,
    }
}

/// WGS84 geodetic to ECEF (meters)
pub fn geodetic_to_ecef(coordinate: &GeodeticCoordinate) -> Vector3<f64> {
    let (sin_lat, cos_lat) = coordinate.latitude.to_radians().sin_cos();
    let (sin_lon, cos_lon) = coordinate.longitude.to_radians().sin_cos();
    let n = prime_vertical_radius(sin_lat);
    let h = coordinate.altitude;

    Vector3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - WGS84_ECCENTRICITY_SQUARED) + h) * sin_lat,
    )
}

/// ECEF (meters) to WGS84 geodetic
pub fn ecef_to_geodetic(ecef: &Vector3<f64>) -> GeodeticCoordinate {
    let p = ecef.x.hypot(ecef.y);
    let longitude = ecef.y.atan2(ecef.x);

    let mut latitude = ecef.z.atan2(p * (1.0 - WGS84_ECCENTRICITY_SQUARED));
    for _ in 0..MAX_LATITUDE_ITERATIONS {
        let n = prime_vertical_radius(latitude.sin());
        let h = p / latitude.cos() - n;
        let next = ecef.z.atan2(p * (1.0 - WGS84_ECCENTRICITY_SQUARED * n / (n + h)));
        let converged = (next - latitude).abs() < LATITUDE_TOLERANCE;
        latitude = next;
        if converged {
            break;
        }
    }

    let n = prime_vertical_radius(latitude.sin());
    let altitude = p / latitude.cos() - n;

    GeodeticCoordinate::new(latitude.to_degrees(), longitude.to_degrees(), altitude)
}

fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_SEMI_MAJOR_AXIS / (1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt()
}

/// Coordinate validation utilities
pub struct CoordinateValidator;

impl CoordinateValidator {
    /// Validate WGS84 geodetic coordinates
    pub fn validate_wgs84(coordinate: &GeodeticCoordinate) -> Result<(), &'static str> {
        if !coordinate.is_finite() {
            return Err("Invalid coordinate: components must be finite");
        }

        if coordinate.latitude < -90.0 || coordinate.latitude > 90.0 {
            return Err("Invalid latitude: must be between -90 and 90 degrees");
        }

        if coordinate.longitude < -180.0 || coordinate.longitude > 180.0 {
            return Err("Invalid longitude: must be between -180 and 180 degrees");
        }

        Ok(())
    }
}
