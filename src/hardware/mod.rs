//! Hardware abstraction layer for the survey sensors and the robot base
//!
//! The map tools only see the GPS receiver and the robot actuator through
//! these traits. Simulated implementations back the console and the tests.

pub mod gps;
pub mod robot;
pub mod sim;
pub mod error;

pub use gps::GpsReceiver;
pub use robot::{RobotActuator, RobotCommand};
pub use sim::{SimulatedGps, SimulatedRobot};
pub use error::{ActuatorError, ActuatorResult};
