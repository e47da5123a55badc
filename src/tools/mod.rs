//! GPS map-making tools
//!
//! Origin calibration, point annotations and boundary line capture, all
//! positioned by projecting the current GPS fix into the map frame.

pub mod error;
pub mod devices;
pub mod calibrator;
pub mod line_capture;
pub mod editor;
pub mod map_tools;

pub use error::{ToolError, ToolResult};
pub use devices::Devices;
pub use calibrator::OriginCalibrator;
pub use line_capture::{CaptureState, LineCapture, LineKind};
pub use editor::{AnnotationEditor, PointKind};
pub use map_tools::GpsMapTools;
