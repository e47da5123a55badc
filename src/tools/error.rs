//! Map tool error types

use thiserror::Error;

use crate::hardware::ActuatorError;
use crate::map::StoreError;

/// Reasons a map tool command did not run.
///
/// Every variant is recoverable by the operator: get a fix, load a map or
/// calibrate an origin, then reissue the command.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No GPS receiver is attached
    #[error("error {action}: no GPS receiver")]
    SensorUnavailable { action: &'static str },
    /// The receiver has no valid position
    #[error("error {action}: GPS doesn't have a valid position")]
    NoFix { action: &'static str },
    /// No map is loaded, or the map has no file name
    #[error("error {action}: no map file name")]
    StoreUnidentified { action: &'static str },
    /// The map has no georeference origin to project against
    #[error("error {action}: map has no origin, set one with Map:setMapOriginHere")]
    ProjectionUnavailable { action: &'static str },
    /// No robot base is attached
    #[error("error {action}: no robot")]
    ActuatorUnavailable { action: &'static str },
    /// A required command argument was empty
    #[error("error {action}: {argument} is required")]
    MissingArgument {
        action: &'static str,
        argument: &'static str,
    },
    /// The GPS position cannot serve as a map origin
    #[error("error {action}: {reason}")]
    InvalidOrigin {
        action: &'static str,
        reason: &'static str,
    },
    /// No command registered under this name
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Actuator(#[from] ActuatorError),
}

/// Result type for map tool operations
pub type ToolResult<T> = Result<T, ToolError>;
