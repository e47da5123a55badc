//! GPS Map Tools
//!
//! Builds and georeferences robot maps from a GPS receiver: calibrate the map
//! origin at the robot's position, then drop goals, homes and boundary lines
//! wherever the robot is driven.

pub mod core;
pub mod algorithms;
pub mod hardware;
pub mod map;
pub mod tools;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{GeodeticCoordinate, LocalPoint, MapOrigin, Pose};
pub use algorithms::{CoordinateValidator, GeodeticProjector};
pub use hardware::{GpsReceiver, RobotActuator, RobotCommand, SimulatedGps, SimulatedRobot};
pub use map::{BoundarySegment, JsonMapStore, MapData, MapObject, MapObjectKind, MapStore};
pub use tools::{
    AnnotationEditor, Devices, GpsMapTools, LineCapture, LineKind, OriginCalibrator, ToolError,
    ToolResult,
};
pub use utils::{ConfigError, ToolsConfig};
pub use api::{register_map_commands, CommandTable, ConsoleInput};
