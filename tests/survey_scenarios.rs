//! End-to-end survey sessions against the simulated devices and a map file

use approx::assert_relative_eq;
use tempfile::TempDir;

use gps_map_tools::api::commands::{
    ADD_GOAL_HERE, FORBIDDEN_LINE_END, FORBIDDEN_LINE_START, RESET_ROBOT_POSE, SET_MAP_ORIGIN_HERE,
    START_NEW_MAP,
};
use gps_map_tools::{
    register_map_commands, CommandTable, Devices, GeodeticCoordinate, GpsMapTools, JsonMapStore,
    LocalPoint, MapObjectKind, MapOrigin, MapStore, Pose, RobotActuator, SimulatedGps,
    SimulatedRobot, ToolError, ToolsConfig,
};

type SimTools = GpsMapTools<SimulatedGps, SimulatedRobot, JsonMapStore>;

const ORIGIN: (f64, f64, f64) = (42.0, -71.5, 10.0);

fn config(dir: &TempDir) -> ToolsConfig {
    ToolsConfig {
        map_directory: Some(dir.path().to_path_buf()),
        ..ToolsConfig::default()
    }
}

fn tools(dir: &TempDir, store: JsonMapStore) -> SimTools {
    let devices = Devices::new(
        Some(SimulatedGps::with_fix(ORIGIN.0, ORIGIN.1, ORIGIN.2)),
        Some(SimulatedRobot::new()),
        Some(store),
    );
    GpsMapTools::new(devices, &config(dir))
}

/// Named map file without an origin
fn bare_map(dir: &TempDir) -> JsonMapStore {
    let path = dir.path().join("bare.map");
    let mut store = JsonMapStore::new();
    store.persist(&path).unwrap();
    store.reload(&path).unwrap();
    store
}

fn move_gps(tools: &mut SimTools, latitude: f64, longitude: f64, altitude: f64) {
    tools
        .devices_mut()
        .gps
        .as_mut()
        .unwrap()
        .set_fix(latitude, longitude, altitude);
}

fn map(tools: &SimTools) -> &JsonMapStore {
    tools.map().unwrap()
}

#[test]
fn goal_north_of_origin() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, bare_map(&dir));

    tools.set_map_origin_here().unwrap();
    assert_eq!(
        map(&tools).origin(),
        Some(MapOrigin::new(GeodeticCoordinate::new(42.0, -71.5, 10.0)))
    );

    move_gps(&mut tools, 42.0001, -71.5, 10.0);
    let goal = tools.add_goal_here("G1").unwrap();

    assert_eq!(goal.kind, MapObjectKind::Goal);
    assert_eq!(goal.name, "G1");
    // 0.0001 degrees of latitude is about 11.1 m
    assert_relative_eq!(goal.pose.x, 11_107.0, epsilon = 20.0);
    assert!(goal.pose.y.abs() < 1.0);
    assert_eq!(map(&tools).objects(), &[goal]);
}

#[test]
fn forbidden_line_between_two_positions() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, bare_map(&dir));
    tools.set_map_origin_here().unwrap();

    move_gps(&mut tools, 42.0001, -71.5, 10.0);
    let p1 = tools.forbidden_line_start().unwrap();
    move_gps(&mut tools, 42.0001, -71.4999, 10.0);
    let segment = tools.forbidden_line_end().unwrap().unwrap();

    assert_eq!(segment.start, p1);
    assert!(segment.end.y < p1.y);
    assert!(!tools.forbidden_line().is_started());

    let lines: Vec<_> = map(&tools)
        .objects()
        .iter()
        .filter(|object| object.kind == MapObjectKind::ForbiddenLine)
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].line, Some(segment));
}

#[test]
fn new_map_name_gets_extension_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, JsonMapStore::new());

    let path = tools.start_new_map("Survey1").unwrap();
    assert_eq!(path, dir.path().join("Survey1.map"));
    assert_eq!(map(&tools).identity(), Some(path.as_path()));
    assert!(map(&tools).objects().is_empty());
    assert!(map(&tools).segments().is_empty());

    let again = tools.start_new_map("Survey1.map").unwrap();
    assert_eq!(again, path);
}

#[test]
fn new_map_has_no_origin_until_calibrated() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, JsonMapStore::new());
    tools.devices_mut().robot.as_mut().unwrap().disconnect();

    // The file is created but calibration fails on the robot reset
    assert!(matches!(tools.start_new_map("Survey1"), Err(ToolError::Actuator(_))));
    let created = JsonMapStore::open(dir.path().join("Survey1.map")).unwrap();
    assert!(!created.has_origin());
    assert!(created.objects().is_empty());
    assert!(!map(&tools).has_origin());

    tools.devices_mut().robot = Some(SimulatedRobot::new());
    tools.set_map_origin_here().unwrap();
    assert!(map(&tools).has_origin());
}

#[test]
fn goal_aborts_without_fix() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, bare_map(&dir));
    tools.set_map_origin_here().unwrap();
    tools.devices_mut().gps.as_mut().unwrap().lose_fix();
    let locks = map(&tools).lock_count();

    assert!(matches!(tools.add_goal_here("G1"), Err(ToolError::NoFix { .. })));
    assert!(map(&tools).objects().is_empty());
    assert_eq!(map(&tools).lock_count(), locks);
}

#[test]
fn goal_aborts_without_map_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, JsonMapStore::new());

    assert!(matches!(
        tools.add_goal_here("G1"),
        Err(ToolError::StoreUnidentified { .. })
    ));
    assert!(map(&tools).objects().is_empty());
    assert_eq!(map(&tools).lock_count(), 0);
}

#[test]
fn goal_aborts_without_origin() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, bare_map(&dir));

    assert!(matches!(
        tools.add_goal_here("G1"),
        Err(ToolError::ProjectionUnavailable { .. })
    ));
    assert!(map(&tools).objects().is_empty());
    assert_eq!(map(&tools).lock_count(), 0);
}

#[test]
fn recalibration_uses_latest_origin_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, bare_map(&dir));

    tools.set_map_origin_here().unwrap();
    move_gps(&mut tools, 42.0002, -71.5002, 12.0);
    tools.set_map_origin_here().unwrap();

    let here = tools.current_position().unwrap();
    assert_relative_eq!(here.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(here.y, 0.0, epsilon = 1e-6);

    move_gps(&mut tools, ORIGIN.0, ORIGIN.1, ORIGIN.2);
    let old_origin = tools.current_position().unwrap();
    assert!(old_origin.x < -20_000.0);
    assert!(old_origin.y < -15_000.0);
}

#[test]
fn sampling_at_origin_projects_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, bare_map(&dir));
    tools.set_map_origin_here().unwrap();

    let first = tools.current_position().unwrap();
    let second = tools.current_position().unwrap();
    assert_eq!(first, second);
    assert!(first.distance_to(&LocalPoint::new(0.0, 0.0)) < 1e-6);
}

#[test]
fn lock_is_released_after_every_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, JsonMapStore::new());

    tools.start_new_map("yard").unwrap();
    tools.add_goal_here("G1").unwrap();
    tools.add_home_here("dock").unwrap();
    tools.forbidden_line_start().unwrap();
    tools.forbidden_line_end().unwrap();
    tools.set_map_origin_here().unwrap();
    tools.reload_map_file().unwrap();

    assert!(!map(&tools).is_locked());
    assert!(map(&tools).lock_count() > 0);
}

#[test]
fn session_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, JsonMapStore::new());
    let path = tools.start_new_map("yard").unwrap();

    move_gps(&mut tools, 42.0001, -71.5, 10.0);
    tools.add_goal_here("G1").unwrap();
    tools.add_home_here("dock").unwrap();
    tools.reload_map_file().unwrap();

    let reopened = JsonMapStore::open(&path).unwrap();
    assert_eq!(reopened.objects(), map(&tools).objects());
    assert_eq!(reopened.origin(), map(&tools).origin());
    assert_eq!(reopened.objects()[1].name, "Home");
    assert_eq!(reopened.objects()[1].description, "dock");
}

#[test]
fn command_table_drives_a_survey() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let mut table = CommandTable::new();
    register_map_commands(&mut table, &config);
    let mut tools = tools(&dir, JsonMapStore::new());

    table.dispatch(&mut tools, START_NEW_MAP, "Survey1").unwrap();
    move_gps(&mut tools, 42.0001, -71.5, 10.0);
    table.dispatch(&mut tools, ADD_GOAL_HERE, "gate").unwrap();
    table.dispatch(&mut tools, FORBIDDEN_LINE_START, "").unwrap();
    move_gps(&mut tools, 42.0001, -71.4999, 10.0);
    table.dispatch(&mut tools, FORBIDDEN_LINE_END, "").unwrap();
    table.dispatch(&mut tools, SET_MAP_ORIGIN_HERE, "").unwrap();
    table.dispatch(&mut tools, RESET_ROBOT_POSE, "").unwrap();

    assert_eq!(map(&tools).objects().len(), 2);
    assert_eq!(
        tools.devices().robot.as_ref().unwrap().current_position(),
        Pose::default()
    );
    assert!(matches!(
        table.dispatch(&mut tools, "Map:obstacleLineStart", ""),
        Err(ToolError::UnknownCommand(_))
    ));
}

#[test]
fn failed_new_map_leaves_current_map_intact() {
    let dir = tempfile::tempdir().unwrap();
    let mut tools = tools(&dir, JsonMapStore::new());
    let yard = tools.start_new_map("yard").unwrap();
    move_gps(&mut tools, 42.0001, -71.5, 10.0);
    tools.add_goal_here("G1").unwrap();
    tools.add_goal_here("G2").unwrap();

    let missing = ToolsConfig {
        map_directory: Some(dir.path().join("missing")),
        ..ToolsConfig::default()
    };
    let store = JsonMapStore::open(&yard).unwrap();
    let devices = Devices::new(
        Some(SimulatedGps::with_fix(42.0001, -71.5, 10.0)),
        Some(SimulatedRobot::new()),
        Some(store),
    );
    let mut tools = GpsMapTools::new(devices, &missing);

    assert!(matches!(tools.start_new_map("Survey1"), Err(ToolError::Store(_))));
    assert_eq!(map(&tools).identity(), Some(yard.as_path()));
    assert_eq!(map(&tools).objects().len(), 2);

    tools.set_map_origin_here().unwrap();
    assert_eq!(JsonMapStore::open(&yard).unwrap().objects().len(), 2);
}

#[test]
fn forbidden_line_retry_after_failed_save_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let maps = dir.path().join("maps");
    std::fs::create_dir(&maps).unwrap();
    let config = ToolsConfig {
        map_directory: Some(maps.clone()),
        ..ToolsConfig::default()
    };
    let devices = Devices::new(
        Some(SimulatedGps::with_fix(ORIGIN.0, ORIGIN.1, ORIGIN.2)),
        Some(SimulatedRobot::new()),
        Some(JsonMapStore::new()),
    );
    let mut tools = GpsMapTools::new(devices, &config);
    let path = tools.start_new_map("yard").unwrap();

    tools.forbidden_line_start().unwrap();
    move_gps(&mut tools, 42.0001, -71.4999, 10.0);
    std::fs::remove_dir_all(&maps).unwrap();
    assert!(tools.forbidden_line_end().is_err());
    assert!(map(&tools).objects().is_empty());

    std::fs::create_dir(&maps).unwrap();
    tools.forbidden_line_end().unwrap().unwrap();
    assert!(!tools.forbidden_line().is_started());

    let saved = JsonMapStore::open(&path).unwrap();
    let lines = saved
        .objects()
        .iter()
        .filter(|object| object.kind == MapObjectKind::ForbiddenLine)
        .count();
    assert_eq!(lines, 1);
}
