//! Simulated GPS receiver and robot base for the console and testing

use crate::core::{GeodeticCoordinate, Pose};
use crate::hardware::{ActuatorError, ActuatorResult, GpsReceiver, RobotActuator, RobotCommand};

/// GPS receiver whose fix is set by hand
#[derive(Debug, Clone, Default)]
pub struct SimulatedGps {
    fix: Option<GeodeticCoordinate>,
    hdop: Option<f64>,
}

impl SimulatedGps {
    /// Receiver without a fix
    pub fn new() -> Self {
        Self::default()
    }

    /// Receiver with a fix at the given position
    pub fn with_fix(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            fix: Some(GeodeticCoordinate::new(latitude, longitude, altitude)),
            hdop: None,
        }
    }

    /// Move the simulated antenna
    pub fn set_fix(&mut self, latitude: f64, longitude: f64, altitude: f64) {
        self.fix = Some(GeodeticCoordinate::new(latitude, longitude, altitude));
    }

    pub fn set_hdop(&mut self, hdop: Option<f64>) {
        self.hdop = hdop;
    }

    /// Simulate losing the fix
    pub fn lose_fix(&mut self) {
        self.fix = None;
    }
}

impl GpsReceiver for SimulatedGps {
    fn has_fix(&self) -> bool {
        self.fix.is_some()
    }

    fn latitude(&self) -> f64 {
        self.fix.map_or(f64::NAN, |fix| fix.latitude)
    }

    fn longitude(&self) -> f64 {
        self.fix.map_or(f64::NAN, |fix| fix.longitude)
    }

    fn altitude(&self) -> f64 {
        self.fix.map_or(f64::NAN, |fix| fix.altitude)
    }

    fn has_precision(&self) -> bool {
        self.hdop.is_some()
    }

    fn precision(&self) -> f64 {
        self.hdop.unwrap_or(0.0)
    }
}

/// Robot base that records the commands it receives
#[derive(Debug, Clone)]
pub struct SimulatedRobot {
    pose: Pose,
    issued: Vec<RobotCommand>,
    connected: bool,
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRobot {
    pub fn new() -> Self {
        Self {
            pose: Pose::default(),
            issued: Vec::new(),
            connected: true,
        }
    }

    /// Robot that has drifted to `pose`
    pub fn at(pose: Pose) -> Self {
        Self {
            pose,
            ..Self::new()
        }
    }

    /// Commands received so far, oldest first
    pub fn issued_commands(&self) -> &[RobotCommand] {
        &self.issued
    }

    /// Simulate connection loss
    pub fn disconnect(&mut self) {
        self.connected = false;
    }
}

impl RobotActuator for SimulatedRobot {
    fn current_position(&self) -> Pose {
        self.pose
    }

    fn reset_position(&mut self, pose: Pose) -> ActuatorResult<()> {
        if !self.connected {
            return Err(ActuatorError::ConnectionLost);
        }
        self.pose = pose;
        Ok(())
    }

    fn issue(&mut self, command: RobotCommand) -> ActuatorResult<()> {
        if !self.connected {
            return Err(ActuatorError::ConnectionLost);
        }
        self.issued.push(command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_without_fix() {
        let gps = SimulatedGps::new();
        assert!(!gps.has_fix());
        assert!(gps.sample().is_none());
        assert!(gps.hdop().is_none());
    }

    #[test]
    fn test_gps_fix_and_loss() {
        let mut gps = SimulatedGps::with_fix(42.0, -71.5, 10.0);
        gps.set_hdop(Some(1.2));

        let sample = gps.sample().unwrap();
        assert_eq!(sample, GeodeticCoordinate::new(42.0, -71.5, 10.0));
        assert_eq!(gps.hdop(), Some(1.2));

        gps.lose_fix();
        assert!(gps.sample().is_none());
    }

    #[test]
    fn test_robot_records_commands() {
        let mut robot = SimulatedRobot::at(Pose::new(1500.0, -200.0, 45.0));
        robot.reset_position(Pose::default()).unwrap();
        robot.issue(RobotCommand::SetOdometry).unwrap();

        assert_eq!(robot.current_position(), Pose::default());
        assert_eq!(robot.issued_commands(), &[RobotCommand::SetOdometry]);
    }

    #[test]
    fn test_disconnected_robot() {
        let mut robot = SimulatedRobot::new();
        robot.disconnect();

        assert_eq!(robot.issue(RobotCommand::SetOdometry), Err(ActuatorError::ConnectionLost));
        assert!(robot.issued_commands().is_empty());
    }
}
