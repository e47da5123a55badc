//! Point annotations, new maps and robot pose resets

use std::path::PathBuf;
use tracing::{info, warn};

use crate::core::{Pose, HOME_LABEL, MAP_FILE_EXTENSION};
use crate::hardware::{GpsReceiver, RobotActuator, RobotCommand};
use crate::map::{commit_change, MapObject, MapSnapshot, MapStore, StoreTransaction};
use crate::tools::{Devices, OriginCalibrator, ToolError, ToolResult};

const START_NEW_MAP: &str = "starting new map";
const RESET_ROBOT_POSE: &str = "resetting robot pose";

/// Point annotations placed at the robot's GPS position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    Goal,
    Home,
}

impl PointKind {
    fn action(self) -> &'static str {
        match self {
            PointKind::Goal => "adding goal",
            PointKind::Home => "adding home",
        }
    }
}

/// Writes annotations and new maps
#[derive(Debug, Clone)]
pub struct AnnotationEditor {
    map_extension: String,
    map_directory: Option<PathBuf>,
    home_label: String,
}

impl Default for AnnotationEditor {
    fn default() -> Self {
        Self::new(MAP_FILE_EXTENSION, None)
    }
}

impl AnnotationEditor {
    pub fn new(map_extension: impl Into<String>, map_directory: Option<PathBuf>) -> Self {
        Self {
            map_extension: map_extension.into(),
            map_directory,
            home_label: HOME_LABEL.to_string(),
        }
    }

    /// Name given to home markers
    pub fn with_home_label(mut self, home_label: impl Into<String>) -> Self {
        self.home_label = home_label.into();
        self
    }

    /// File name for a map called `name`, with the map extension appended once
    pub fn map_file_name(&self, name: &str) -> String {
        if name.ends_with(&self.map_extension) {
            name.to_string()
        } else {
            format!("{}{}", name, self.map_extension)
        }
    }

    fn map_path(&self, file_name: &str) -> PathBuf {
        match &self.map_directory {
            Some(directory) => directory.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Add a goal or home marker at the current position.
    ///
    /// Goals are named by `label` (an empty label is allowed); homes carry the
    /// home label as their name and take `label` as their description.
    pub fn add_point_annotation<G, R, M>(
        &self,
        kind: PointKind,
        label: &str,
        devices: &mut Devices<G, R, M>,
        calibrator: &mut OriginCalibrator,
    ) -> ToolResult<MapObject>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let action = kind.action();
        devices.check_gps(action)?;
        devices.check_map(action)?;

        let position = calibrator.current_position(devices, action)?;
        let object = match kind {
            PointKind::Goal => MapObject::goal(label, position),
            PointKind::Home => MapObject {
                name: self.home_label.clone(),
                ..MapObject::home(label, position)
            },
        };
        info!("Adding {} in map at GPS position ({})", object, position);

        let added = object.clone();
        commit_change(devices.map_mut(action)?, |map| map.objects_mut().push(added))?;
        Ok(object)
    }

    /// Replace the loaded map with an empty one called `name` and make the
    /// current GPS position its origin.
    ///
    /// Returns the path of the new map file.
    pub fn start_new_map<G, R, M>(
        &self,
        name: &str,
        devices: &mut Devices<G, R, M>,
        calibrator: &mut OriginCalibrator,
    ) -> ToolResult<PathBuf>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ToolError::MissingArgument {
                action: START_NEW_MAP,
                argument: "map name",
            });
        }

        let path = self.map_path(&self.map_file_name(name));
        info!("Starting new map with name \"{}\".", path.display());
        devices.check_gps(START_NEW_MAP)?;

        let map = devices.map_mut(START_NEW_MAP)?;
        calibrator.invalidate();
        {
            let mut transaction = StoreTransaction::begin(map)?;
            let previous = MapSnapshot::capture(&*transaction);
            transaction.clear();

            // Stay on the old map, unchanged, unless the new file is written and loaded
            let mut created = transaction.persist(&path);
            if created.is_ok() {
                created = transaction.reload(&path);
            }
            if let Err(err) = created {
                warn!("Could not create map \"{}\": {}", path.display(), err);
                previous.restore(&mut *transaction);
                return Err(err.into());
            }
        }

        calibrator.set_origin(devices)?;
        Ok(path)
    }

    /// Reset the robot's odometry to (0, 0, 0)
    pub fn reset_robot_pose<G, R, M>(devices: &mut Devices<G, R, M>) -> ToolResult<()>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let Some(robot) = devices.robot.as_mut() else {
            warn!("Can't reset robot pose, have no robot!");
            return Err(ToolError::ActuatorUnavailable { action: RESET_ROBOT_POSE });
        };

        info!("Resetting robot odometric position to 0,0,0.");
        robot.reset_position(Pose::default())?;
        robot.issue(RobotCommand::SetOdometry)?;
        robot.issue(RobotCommand::SimulatorReset)?;
        Ok(())
    }
}
