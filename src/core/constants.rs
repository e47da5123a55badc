//! Geodetic constants and map defaults

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6378137.0;

/// WGS84 flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// WGS84 first eccentricity squared
pub const WGS84_ECCENTRICITY_SQUARED: f64 = 2.0 * WGS84_FLATTENING - WGS84_FLATTENING * WGS84_FLATTENING;

/// Map units per meter (map files are in millimeters)
pub const MILLIMETERS_PER_METER: f64 = 1000.0;

/// Extension carried by every map file name
pub const MAP_FILE_EXTENSION: &str = ".map";

/// Name given to home markers
pub const HOME_LABEL: &str = "Home";
