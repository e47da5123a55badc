//! Map annotations

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{GeodeticCoordinate, LocalPoint, MapOrigin, HOME_LABEL};

/// Annotation types placed by the survey tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapObjectKind {
    Goal,
    Home,
    ForbiddenLine,
}

impl fmt::Display for MapObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapObjectKind::Goal => write!(f, "Goal"),
            MapObjectKind::Home => write!(f, "Home"),
            MapObjectKind::ForbiddenLine => write!(f, "ForbiddenLine"),
        }
    }
}

/// Straight line between two map points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundarySegment {
    pub start: LocalPoint,
    pub end: LocalPoint,
}

impl BoundarySegment {
    pub fn new(start: LocalPoint, end: LocalPoint) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Named annotation owned by the map.
///
/// Names need not be unique; objects are identified by their position in
/// the map's object list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub kind: MapObjectKind,
    pub name: String,
    pub description: String,
    pub pose: LocalPoint,
    /// Set for line objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<BoundarySegment>,
}

impl MapObject {
    pub fn goal(label: &str, pose: LocalPoint) -> Self {
        Self {
            kind: MapObjectKind::Goal,
            name: label.to_string(),
            description: label.to_string(),
            pose,
            line: None,
        }
    }

    pub fn home(description: &str, pose: LocalPoint) -> Self {
        Self {
            kind: MapObjectKind::Home,
            name: HOME_LABEL.to_string(),
            description: description.to_string(),
            pose,
            line: None,
        }
    }

    pub fn forbidden_line(segment: BoundarySegment) -> Self {
        Self {
            kind: MapObjectKind::ForbiddenLine,
            name: String::new(),
            description: String::new(),
            pose: segment.start,
            line: Some(segment),
        }
    }
}

impl fmt::Display for MapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(
                f,
                "{} \"{}\" from ({}) to ({})",
                self.kind, self.name, line.start, line.end
            ),
            None => write!(f, "{} \"{}\" at ({})", self.kind, self.name, self.pose),
        }
    }
}

/// Persisted content of a map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub origin: Option<MapOrigin>,
    #[serde(default)]
    pub objects: Vec<MapObject>,
    #[serde(default)]
    pub segments: Vec<BoundarySegment>,
}

impl MapData {
    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.objects.is_empty() && self.segments.is_empty()
    }

    pub fn origin_coordinate(&self) -> Option<GeodeticCoordinate> {
        self.origin.map(|origin| *origin.coordinate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_uses_fixed_name() {
        let home = MapObject::home("dock by the shed", LocalPoint::new(10.0, 20.0));
        assert_eq!(home.kind, MapObjectKind::Home);
        assert_eq!(home.name, "Home");
        assert_eq!(home.description, "dock by the shed");
    }

    #[test]
    fn test_goal_accepts_empty_label() {
        let goal = MapObject::goal("", LocalPoint::new(0.0, 0.0));
        assert_eq!(goal.name, "");
        assert!(goal.line.is_none());
    }

    #[test]
    fn test_forbidden_line_spans_segment() {
        let segment = BoundarySegment::new(LocalPoint::new(0.0, 0.0), LocalPoint::new(3000.0, 4000.0));
        let line = MapObject::forbidden_line(segment);

        assert_eq!(line.kind, MapObjectKind::ForbiddenLine);
        assert_eq!(line.pose, segment.start);
        assert_eq!(line.line, Some(segment));
        assert_eq!(segment.length(), 5000.0);
    }

    #[test]
    fn test_map_data_json_layout() {
        let data = MapData {
            origin: Some(MapOrigin::new(GeodeticCoordinate::new(42.0, -71.5, 10.0))),
            objects: vec![MapObject::goal("G1", LocalPoint::new(1.0, 2.0))],
            segments: Vec::new(),
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["origin"]["latitude"], 42.0);
        assert_eq!(json["objects"][0]["kind"], "Goal");
        assert!(json["objects"][0].get("line").is_none());

        let parsed: MapData = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_empty_document_parses() {
        let parsed: MapData = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }
}
