//! Collaborators used by the map tools and their precondition checks

use tracing::{info, warn};

use crate::core::GeodeticCoordinate;
use crate::hardware::{GpsReceiver, RobotActuator};
use crate::map::MapStore;
use crate::tools::{ToolError, ToolResult};

/// HDOP above which fixes are flagged in the log
pub const DEFAULT_HDOP_WARNING: f64 = 5.0;

/// The GPS receiver, robot base and map the tools operate on.
///
/// Any of them may be missing; commands that need a missing one fail
/// before touching anything.
pub struct Devices<G, R, M> {
    pub gps: Option<G>,
    pub robot: Option<R>,
    pub map: Option<M>,
    hdop_warning: f64,
}

impl<G, R, M> Devices<G, R, M>
where
    G: GpsReceiver,
    R: RobotActuator,
    M: MapStore,
{
    pub fn new(gps: Option<G>, robot: Option<R>, map: Option<M>) -> Self {
        Self {
            gps,
            robot,
            map,
            hdop_warning: DEFAULT_HDOP_WARNING,
        }
    }

    pub fn with_hdop_warning(mut self, threshold: f64) -> Self {
        self.hdop_warning = threshold;
        self
    }

    /// Current fix, or the reason there is none.
    ///
    /// Logs the fix together with the robot pose, HDOP and map origin.
    pub fn check_gps(&self, action: &'static str) -> ToolResult<GeodeticCoordinate> {
        let gps = self.gps.as_ref().ok_or(ToolError::SensorUnavailable { action })?;
        let sample = gps.sample().ok_or(ToolError::NoFix { action })?;

        let robot = self.robot.as_ref().map(|robot| robot.current_position()).unwrap_or_default();
        let origin = self
            .map
            .as_ref()
            .and_then(|map| map.origin())
            .map(|origin| origin.coordinate().to_string())
            .unwrap_or_else(|| "unset".to_string());
        let hdop = gps.hdop();

        info!(
            "{} at GPS position ({}). Robot pos is (x={:.2}, y={:.2}). HDOP is {:.2}. Map origin is ({})",
            action,
            sample,
            robot.x,
            robot.y,
            hdop.unwrap_or(0.0),
            origin
        );

        if let Some(hdop) = hdop.filter(|hdop| *hdop > self.hdop_warning) {
            warn!(
                "{}: HDOP {:.2} exceeds {:.2}, position may be off by several meters",
                action, hdop, self.hdop_warning
            );
        }

        Ok(sample)
    }

    /// Fails unless a map with a file name is loaded
    pub fn check_map(&self, action: &'static str) -> ToolResult<()> {
        match &self.map {
            Some(map) if map.is_identified() => Ok(()),
            _ => Err(ToolError::StoreUnidentified { action }),
        }
    }

    pub fn map_mut(&mut self, action: &'static str) -> ToolResult<&mut M> {
        self.map.as_mut().ok_or(ToolError::StoreUnidentified { action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::{SimulatedGps, SimulatedRobot};
    use crate::map::JsonMapStore;

    type SimDevices = Devices<SimulatedGps, SimulatedRobot, JsonMapStore>;

    #[test]
    fn test_missing_gps() {
        let devices: SimDevices = Devices::new(None, None, None);
        assert!(matches!(
            devices.check_gps("adding goal"),
            Err(ToolError::SensorUnavailable { action: "adding goal" })
        ));
    }

    #[test]
    fn test_gps_without_fix() {
        let devices: SimDevices = Devices::new(Some(SimulatedGps::new()), None, None);
        assert!(matches!(devices.check_gps("adding goal"), Err(ToolError::NoFix { .. })));
    }

    #[test]
    fn test_gps_with_fix() {
        let mut gps = SimulatedGps::with_fix(42.0, -71.5, 10.0);
        gps.set_hdop(Some(9.0));
        let devices: SimDevices = Devices::new(Some(gps), Some(SimulatedRobot::new()), None);

        let sample = devices.check_gps("adding goal").unwrap();
        assert_eq!(sample, GeodeticCoordinate::new(42.0, -71.5, 10.0));
    }

    #[test]
    fn test_map_checks() {
        let devices: SimDevices = Devices::new(None, None, None);
        assert!(matches!(devices.check_map("adding goal"), Err(ToolError::StoreUnidentified { .. })));

        let devices: SimDevices = Devices::new(None, None, Some(JsonMapStore::new()));
        assert!(matches!(devices.check_map("adding goal"), Err(ToolError::StoreUnidentified { .. })));
    }
}
