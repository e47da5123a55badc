//! Coordinate transformation algorithms

pub mod projection;

pub use projection::{project, CoordinateValidator, GeodeticProjector};
