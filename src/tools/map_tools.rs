//! Operator-facing map tools

use std::path::PathBuf;
use tracing::info;

use crate::algorithms::GeodeticProjector;
use crate::core::LocalPoint;
use crate::hardware::{GpsReceiver, RobotActuator};
use crate::map::{BoundarySegment, MapObject, MapStore};
use crate::tools::{
    AnnotationEditor, Devices, LineCapture, LineKind, OriginCalibrator, PointKind, ToolResult,
};
use crate::utils::config::ToolsConfig;

const RELOAD_MAP: &str = "reloading map file";

/// Map-making commands driven by the robot's GPS position.
///
/// Each command checks its preconditions, then edits the map under its lock,
/// saves it and reloads it.
pub struct GpsMapTools<G, R, M> {
    devices: Devices<G, R, M>,
    calibrator: OriginCalibrator,
    editor: AnnotationEditor,
    forbidden_line: LineCapture,
    obstacle_line: LineCapture,
}

impl<G, R, M> GpsMapTools<G, R, M>
where
    G: GpsReceiver,
    R: RobotActuator,
    M: MapStore,
{
    pub fn new(devices: Devices<G, R, M>, config: &ToolsConfig) -> Self {
        Self {
            devices: devices.with_hdop_warning(config.hdop_warning_threshold),
            calibrator: OriginCalibrator::new(config.units_per_meter),
            editor: AnnotationEditor::new(config.map_extension.clone(), config.map_directory.clone())
                .with_home_label(config.home_label.clone()),
            forbidden_line: LineCapture::new(LineKind::Forbidden),
            obstacle_line: LineCapture::new(LineKind::Obstacle),
        }
    }

    pub fn devices(&self) -> &Devices<G, R, M> {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut Devices<G, R, M> {
        &mut self.devices
    }

    pub fn map(&self) -> Option<&M> {
        self.devices.map.as_ref()
    }

    pub fn calibrator(&self) -> &OriginCalibrator {
        &self.calibrator
    }

    pub fn forbidden_line(&self) -> &LineCapture {
        &self.forbidden_line
    }

    pub fn obstacle_line(&self) -> &LineCapture {
        &self.obstacle_line
    }

    /// Robot position in map coordinates according to the GPS
    pub fn current_position(&mut self) -> ToolResult<LocalPoint> {
        self.calibrator.current_position(&self.devices, "locating robot")
    }

    pub fn start_new_map(&mut self, name: &str) -> ToolResult<PathBuf> {
        self.editor.start_new_map(name, &mut self.devices, &mut self.calibrator)
    }

    pub fn add_goal_here(&mut self, label: &str) -> ToolResult<MapObject> {
        self.editor
            .add_point_annotation(PointKind::Goal, label, &mut self.devices, &mut self.calibrator)
    }

    pub fn add_home_here(&mut self, description: &str) -> ToolResult<MapObject> {
        self.editor
            .add_point_annotation(PointKind::Home, description, &mut self.devices, &mut self.calibrator)
    }

    pub fn set_map_origin_here(&mut self) -> ToolResult<GeodeticProjector> {
        self.calibrator.set_origin(&mut self.devices)
    }

    pub fn forbidden_line_start(&mut self) -> ToolResult<LocalPoint> {
        self.forbidden_line.start(&mut self.devices, &mut self.calibrator)
    }

    pub fn forbidden_line_end(&mut self) -> ToolResult<Option<BoundarySegment>> {
        self.forbidden_line.end(&mut self.devices, &mut self.calibrator)
    }

    pub fn obstacle_line_start(&mut self) -> ToolResult<LocalPoint> {
        self.obstacle_line.start(&mut self.devices, &mut self.calibrator)
    }

    pub fn obstacle_line_end(&mut self) -> ToolResult<Option<BoundarySegment>> {
        self.obstacle_line.end(&mut self.devices, &mut self.calibrator)
    }

    /// Re-read the map from its file so every consumer sees the saved state
    pub fn reload_map_file(&mut self) -> ToolResult<()> {
        self.devices.check_map(RELOAD_MAP)?;
        self.calibrator.invalidate();
        self.devices.map_mut(RELOAD_MAP)?.refresh()?;
        info!("Map reloaded from file");
        Ok(())
    }

    pub fn reset_robot_pose(&mut self) -> ToolResult<()> {
        AnnotationEditor::reset_robot_pose(&mut self.devices)
    }
}
