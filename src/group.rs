use crate::types::{ControlHandle, Endpoint, Point};

/// An ordered path of points joined by cubic Bezier segments.
///
/// Segment `i` runs from `points[i]` to `points[i + 1]` through `controls[i]`,
/// so a well-formed group always has one control fewer than it has points.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveGroup {
    id: String,
    points: Vec<Point>,
    controls: Vec<ControlHandle>,
}

impl CurveGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// Rebuild a group from raw coordinates, as read from a snapshot.
    ///
    /// The control count is taken as given; a mismatch is reported by
    /// [`CurveGroup::is_well_formed`] and rejected by the render pass.
    pub fn from_parts(id: impl Into<String>, points: Vec<Point>, controls: Vec<ControlHandle>) -> Self {
        Self {
            id: id.into(),
            points,
            controls,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn controls(&self) -> &[ControlHandle] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_well_formed(&self) -> bool {
        self.controls.len() == self.points.len().saturating_sub(1)
    }

    /// Append a point. Every point after the first gets a straight-line
    /// control handle from the previous point.
    pub fn add_point(&mut self, point: Point) {
        if let Some(prev) = self.points.last() {
            self.controls.push(ControlHandle::straight(*prev, point));
        }
        self.points.push(point);
    }

    /// Remove the last point and the control handle leading into it.
    /// Returns false if the group was already empty.
    pub fn delete_last(&mut self) -> bool {
        if self.points.pop().is_none() {
            return false;
        }
        self.controls.pop();
        true
    }

    /// Close the path by snapping the last point onto the first.
    /// Returns false when the group has fewer than two points.
    pub fn sync_last_to_first(&mut self) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        let first = self.points[0];
        if let Some(last) = self.points.last_mut() {
            *last = first;
        }
        true
    }

    pub fn point_mut(&mut self, index: usize) -> Option<&mut Point> {
        self.points.get_mut(index)
    }

    pub fn control_point_mut(&mut self, index: usize, endpoint: Endpoint) -> Option<&mut Point> {
        self.controls.get_mut(index).map(|c| c.get_mut(endpoint))
    }

    /// Index of the first point whose pick box contains `pos`.
    pub fn hit_point(&self, pos: &Point, half: f64) -> Option<usize> {
        self.points.iter().position(|p| p.within_box(pos, half))
    }

    /// First control endpoint whose pick box contains `pos`, scanning
    /// controls in order and each control's endpoints in order.
    pub fn hit_control(&self, pos: &Point, half: f64) -> Option<(usize, Endpoint)> {
        self.controls.iter().enumerate().find_map(|(idx, control)| {
            Endpoint::BOTH
                .into_iter()
                .find(|e| control.get(*e).within_box(pos, half))
                .map(|e| (idx, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_last_on_empty_group_is_noop() {
        let mut group = CurveGroup::new("g");
        assert!(!group.delete_last());
        assert!(group.is_well_formed());
    }

    #[test]
    fn hit_control_prefers_lower_index() {
        let group = CurveGroup::from_parts(
            "g",
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)],
            vec![
                ControlHandle::new(Point::new(5.0, 5.0), Point::new(50.0, 50.0)),
                ControlHandle::new(Point::new(5.0, 5.0), Point::new(60.0, 60.0)),
            ],
        );
        assert_eq!(group.hit_control(&Point::new(6.0, 6.0), 4.0), Some((0, Endpoint::First)));
        assert_eq!(group.hit_control(&Point::new(61.0, 59.0), 4.0), Some((1, Endpoint::Second)));
        assert_eq!(group.hit_control(&Point::new(200.0, 200.0), 4.0), None);
    }
}
