//! Core data types for GPS map making

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in geodetic coordinates as reported by the GPS receiver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    /// Latitude in decimal degrees, positive north
    pub latitude: f64,
    /// Longitude in decimal degrees, positive east
    pub longitude: f64,
    /// Altitude above the WGS84 ellipsoid in meters
    pub altitude: f64,
}

impl GeodeticCoordinate {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.altitude.is_finite()
    }
}

impl fmt::Display for GeodeticCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat={:.7}, lon={:.7}, alt={:.2}", self.latitude, self.longitude, self.altitude)
    }
}

/// The geodetic anchor of a map's (0, 0) point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapOrigin(GeodeticCoordinate);

impl MapOrigin {
    pub fn new(coordinate: GeodeticCoordinate) -> Self {
        Self(coordinate)
    }

    pub fn coordinate(&self) -> &GeodeticCoordinate {
        &self.0
    }
}

impl From<GeodeticCoordinate> for MapOrigin {
    fn from(coordinate: GeodeticCoordinate) -> Self {
        Self(coordinate)
    }
}

/// Planar point in map units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    /// Marker for a position that could not be projected
    pub const UNDEFINED: LocalPoint = LocalPoint { x: f64::NAN, y: f64::NAN };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_defined(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(&self, other: &LocalPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for LocalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:.2}, y={:.2}", self.x, self.y)
    }
}

/// Robot pose in its odometry frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees
    pub theta: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}
