//! Robot base interface

use crate::core::Pose;
use crate::hardware::ActuatorResult;
use std::fmt;

/// Low-level commands understood by the robot base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotCommand {
    /// Reset the firmware odometry to zero
    SetOdometry,
    /// Reset the simulator's true pose (ignored by real hardware)
    SimulatorReset,
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotCommand::SetOdometry => write!(f, "SETO"),
            RobotCommand::SimulatorReset => write!(f, "SIM_RESET"),
        }
    }
}

/// Robot base accepting pose resets
pub trait RobotActuator {
    /// Pose in the odometry frame
    fn current_position(&self) -> Pose;

    /// Move the tracked pose to `pose` without driving
    fn reset_position(&mut self, pose: Pose) -> ActuatorResult<()>;

    /// Send a command to the base
    fn issue(&mut self, command: RobotCommand) -> ActuatorResult<()>;
}

impl<T: RobotActuator + ?Sized> RobotActuator for Box<T> {
    fn current_position(&self) -> Pose {
        (**self).current_position()
    }

    fn reset_position(&mut self, pose: Pose) -> ActuatorResult<()> {
        (**self).reset_position(pose)
    }

    fn issue(&mut self, command: RobotCommand) -> ActuatorResult<()> {
        (**self).issue(command)
    }
}
