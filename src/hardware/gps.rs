//! GPS receiver interface

use crate::core::GeodeticCoordinate;

/// Source of the most recent GPS fix.
///
/// Reads never block: they return the last cached fix, and `has_fix`
/// reports whether that fix is valid.
pub trait GpsReceiver {
    /// Whether the receiver currently has a valid position
    fn has_fix(&self) -> bool;

    /// Latitude in decimal degrees
    fn latitude(&self) -> f64;

    /// Longitude in decimal degrees
    fn longitude(&self) -> f64;

    /// Altitude in meters
    fn altitude(&self) -> f64;

    /// Whether an HDOP value accompanies the fix
    fn has_precision(&self) -> bool;

    /// Horizontal dilution of precision
    fn precision(&self) -> f64;

    /// Current fix as a coordinate, if there is one
    fn sample(&self) -> Option<GeodeticCoordinate> {
        if self.has_fix() {
            Some(GeodeticCoordinate::new(self.latitude(), self.longitude(), self.altitude()))
        } else {
            None
        }
    }

    /// HDOP if reported
    fn hdop(&self) -> Option<f64> {
        self.has_precision().then(|| self.precision())
    }
}

impl<T: GpsReceiver + ?Sized> GpsReceiver for Box<T> {
    fn has_fix(&self) -> bool {
        (**self).has_fix()
    }

    fn latitude(&self) -> f64 {
        (**self).latitude()
    }

    fn longitude(&self) -> f64 {
        (**self).longitude()
    }

    fn altitude(&self) -> f64 {
        (**self).altitude()
    }

    fn has_precision(&self) -> bool {
        (**self).has_precision()
    }

    fn precision(&self) -> f64 {
        (**self).precision()
    }
}
