//! Map origin calibration and the cached projector

use tracing::{debug, info, warn};

use crate::algorithms::{CoordinateValidator, GeodeticProjector};
use crate::core::{LocalPoint, MapOrigin, MILLIMETERS_PER_METER};
use crate::hardware::{GpsReceiver, RobotActuator};
use crate::map::{commit_change, MapStore};
use crate::tools::{AnnotationEditor, Devices, ToolError, ToolResult};

const SET_ORIGIN: &str = "setting map origin";

/// Owns the projector built from the map's origin.
///
/// The projector is always derived from the origin stored in the map, never
/// from a remembered one, and is dropped whenever that origin changes.
#[derive(Debug, Clone)]
pub struct OriginCalibrator {
    projector: Option<GeodeticProjector>,
    units_per_meter: f64,
}

impl Default for OriginCalibrator {
    fn default() -> Self {
        Self::new(MILLIMETERS_PER_METER)
    }
}

impl OriginCalibrator {
    pub fn new(units_per_meter: f64) -> Self {
        Self {
            projector: None,
            units_per_meter,
        }
    }

    /// Cached projector, if one has been built
    pub fn projector(&self) -> Option<&GeodeticProjector> {
        self.projector.as_ref()
    }

    /// Forget the cached projector; the next projection rebuilds it from the map
    pub fn invalidate(&mut self) {
        if self.projector.take().is_some() {
            debug!("Map origin cache invalidated");
        }
    }

    /// Projector for the origin currently stored in `map`
    pub fn ensure_projector<M: MapStore + ?Sized>(
        &mut self,
        map: &M,
        action: &'static str,
    ) -> ToolResult<&GeodeticProjector> {
        let Some(origin) = map.origin() else {
            self.invalidate();
            return Err(ToolError::ProjectionUnavailable { action });
        };

        if self.projector.as_ref().is_some_and(|projector| *projector.origin() != origin) {
            debug!("Map origin changed, rebuilding projector");
            self.projector = None;
        }

        let units_per_meter = self.units_per_meter;
        Ok(self
            .projector
            .get_or_insert_with(|| GeodeticProjector::with_units(origin, units_per_meter)))
    }

    /// Robot position in map coordinates according to the GPS
    pub fn current_position<G, R, M>(
        &mut self,
        devices: &Devices<G, R, M>,
        action: &'static str,
    ) -> ToolResult<LocalPoint>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let gps = devices.gps.as_ref().ok_or(ToolError::SensorUnavailable { action })?;
        let sample = gps.sample().ok_or(ToolError::NoFix { action })?;
        let map = devices.map.as_ref().ok_or(ToolError::StoreUnidentified { action })?;

        let projector = self.ensure_projector(map, action)?;
        Ok(projector.project(&sample))
    }

    /// Make the current GPS position the map origin.
    ///
    /// The robot is expected to stand at the map's (0, 0), so its odometry is
    /// reset first. An existing origin is replaced. Returns the projector for
    /// the new origin.
    pub fn set_origin<G, R, M>(&mut self, devices: &mut Devices<G, R, M>) -> ToolResult<GeodeticProjector>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let sample = devices.check_gps(SET_ORIGIN)?;
        devices.check_map(SET_ORIGIN)?;
        CoordinateValidator::validate_wgs84(&sample)
            .map_err(|reason| ToolError::InvalidOrigin { action: SET_ORIGIN, reason })?;

        match AnnotationEditor::reset_robot_pose(devices) {
            Ok(()) | Err(ToolError::ActuatorUnavailable { .. }) => {}
            Err(err) => return Err(err),
        }

        let map = devices.map_mut(SET_ORIGIN)?;
        if let Some(previous) = map.origin() {
            warn!(
                "{}: Warning: map already has an origin point ({}), it will be replaced by current position.",
                SET_ORIGIN,
                previous.coordinate()
            );
        }

        let origin = MapOrigin::new(sample);
        self.invalidate();
        commit_change(map, |map| map.set_origin(Some(origin)))?;

        let projector = GeodeticProjector::with_units(origin, self.units_per_meter);
        self.projector = Some(projector.clone());
        info!("Map origin set to ({})", sample);
        Ok(projector)
    }
}
