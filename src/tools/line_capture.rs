//! Two-point capture of boundary lines at GPS positions

use std::fmt;
use tracing::info;

use crate::core::LocalPoint;
use crate::hardware::{GpsReceiver, RobotActuator};
use crate::map::{apply_change, BoundarySegment, MapObject, MapStore};
use crate::tools::{Devices, OriginCalibrator, ToolResult};

/// Kinds of boundary line the operator can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Stored as a named ForbiddenLine map object
    Forbidden,
    /// Stored as a raw segment in the map's line list
    Obstacle,
}

impl LineKind {
    fn start_action(self) -> &'static str {
        match self {
            LineKind::Forbidden => "starting forbidden line",
            LineKind::Obstacle => "starting obstacle line",
        }
    }

    fn end_action(self) -> &'static str {
        match self {
            LineKind::Forbidden => "ending forbidden line",
            LineKind::Obstacle => "ending obstacle line",
        }
    }

    /// Append a finished line to the list this kind lives in
    pub fn emit<M: MapStore + ?Sized>(self, segment: BoundarySegment, map: &mut M) {
        match self {
            LineKind::Forbidden => map.objects_mut().push(MapObject::forbidden_line(segment)),
            LineKind::Obstacle => map.segments_mut().push(segment),
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Forbidden => write!(f, "forbidden"),
            LineKind::Obstacle => write!(f, "obstacle"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureState {
    Idle,
    Started { start: LocalPoint },
}

/// Line capture for one [`LineKind`].
///
/// `start` records where the robot is; `end` closes the line at the robot's
/// new position and writes it to the map. Starting while a line is open
/// finishes the open line first so it is never lost.
#[derive(Debug, Clone)]
pub struct LineCapture {
    kind: LineKind,
    state: CaptureState,
}

impl LineCapture {
    pub fn new(kind: LineKind) -> Self {
        Self {
            kind,
            state: CaptureState::Idle,
        }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, CaptureState::Started { .. })
    }

    /// Begin a line at the current position
    pub fn start<G, R, M>(
        &mut self,
        devices: &mut Devices<G, R, M>,
        calibrator: &mut OriginCalibrator,
    ) -> ToolResult<LocalPoint>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let action = self.kind.start_action();
        devices.check_gps(action)?;
        devices.check_map(action)?;

        if self.is_started() {
            self.end(devices, calibrator)?;
        }

        let start = calibrator.current_position(devices, action)?;
        info!("Started {} line at {}.", self.kind, start);
        self.state = CaptureState::Started { start };
        Ok(start)
    }

    /// Finish the open line at the current position.
    ///
    /// Returns `None` without touching the map when no line is open.
    pub fn end<G, R, M>(
        &mut self,
        devices: &mut Devices<G, R, M>,
        calibrator: &mut OriginCalibrator,
    ) -> ToolResult<Option<BoundarySegment>>
    where
        G: GpsReceiver,
        R: RobotActuator,
        M: MapStore,
    {
        let CaptureState::Started { start } = self.state else {
            return Ok(None);
        };

        let action = self.kind.end_action();
        devices.check_gps(action)?;
        devices.check_map(action)?;

        let end = calibrator.current_position(devices, action)?;
        let segment = BoundarySegment::new(start, end);
        info!("Ended {} line at {} ({:.0} long)", self.kind, end, segment.length());

        let kind = self.kind;
        let map = devices.map_mut(action)?;
        apply_change(map, |map| kind.emit(segment, map))?;

        // Saved, so a retry must not emit it again even if the reload fails
        self.state = CaptureState::Idle;
        map.refresh()?;
        Ok(Some(segment))
    }
}
