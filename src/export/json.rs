use serde::Serialize;

use crate::helper::DrawingHelper;
use crate::types::Point;

use super::fixed;

#[derive(Debug, Serialize)]
struct Coordinate {
    x: String,
    y: String,
}

#[derive(Debug, Serialize)]
struct CoordinateGroup<'a> {
    id: &'a str,
    points: Vec<Coordinate>,
    controls: Vec<[Coordinate; 2]>,
}

#[derive(Debug, Serialize)]
struct PolarGroup<'a> {
    id: &'a str,
    /// `[angle, distance]` per point.
    points: Vec<[String; 2]>,
    /// `[angle1, distance1, angle2, distance2]` per control handle.
    controls: Vec<[String; 4]>,
}

/// Groups as `{x, y}` strings relative to the origin point.
pub fn export_coordinates(helper: &DrawingHelper) -> Result<String, serde_json::Error> {
    let origin = helper.origin();
    let precision = helper.settings.output_precision;
    let relative = |p: &Point| Coordinate {
        x: fixed(p.x - origin.x, precision),
        y: fixed(p.y - origin.y, precision),
    };

    let groups: Vec<CoordinateGroup> = helper
        .groups()
        .iter()
        .map(|group| CoordinateGroup {
            id: group.id(),
            points: group.points().iter().map(relative).collect(),
            controls: group
                .controls()
                .iter()
                .map(|c| [relative(&c.first), relative(&c.second)])
                .collect(),
        })
        .collect();
    serde_json::to_string_pretty(&groups)
}

/// Groups as angle (radians) / distance pairs measured from the origin point.
pub fn export_polar(helper: &DrawingHelper) -> Result<String, serde_json::Error> {
    let origin = helper.origin();
    let precision = helper.settings.output_precision;
    let polar = |p: &Point| {
        [
            fixed(origin.angle_to(p), precision),
            fixed(origin.distance(p), precision),
        ]
    };

    let groups: Vec<PolarGroup> = helper
        .groups()
        .iter()
        .map(|group| PolarGroup {
            id: group.id(),
            points: group.points().iter().map(polar).collect(),
            controls: group
                .controls()
                .iter()
                .map(|c| {
                    let [a1, d1] = polar(&c.first);
                    let [a2, d2] = polar(&c.second);
                    [a1, d1, a2, d2]
                })
                .collect(),
        })
        .collect();
    serde_json::to_string_pretty(&groups)
}
