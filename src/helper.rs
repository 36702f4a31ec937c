//! Editor root: curve groups, the origin point, the reference image, display
//! settings and the pointer-driven tool state machine.
//!
//! Drags never touch stored geometry until the pointer is released. Between
//! press and release the dragged entity is drawn at `committed + (pointer -
//! anchor)`, computed on the fly by the update pass.

use std::fmt;

use crate::error::RenderError;
use crate::group::CurveGroup;
use crate::reference::ReferenceImage;
use crate::render::Surface;
use crate::session::Session;
use crate::settings::Settings;
use crate::types::{
    CANVAS_HEIGHT, CANVAS_WIDTH, ControlHandle, Endpoint, ORIGIN_SIZE_HALF, Point, Rect, Tool,
    inside_canvas,
};

/// The entity an in-progress drag will move on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// Point index within the active group.
    Point(usize),
    /// Control index within the active group, and which of its endpoints.
    Control(usize, Endpoint),
    Origin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    target: DragTarget,
    anchor: Point,
}

/// Advisory shown to the user when input is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoActiveGroup,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoActiveGroup => write!(f, "Select or create a group before adding points"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawingHelper {
    groups: Vec<CurveGroup>,
    active: Option<String>,
    pub reference: ReferenceImage,
    origin: Point,
    pub settings: Settings,
    drag: Option<Drag>,
}

impl DrawingHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[CurveGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&CurveGroup> {
        self.groups.iter().find(|g| g.id() == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut CurveGroup> {
        self.groups.iter_mut().find(|g| g.id() == id)
    }

    /// Append an empty group. Id uniqueness is the caller's responsibility.
    pub fn add_group(&mut self, id: impl Into<String>) -> &mut CurveGroup {
        self.groups.push(CurveGroup::new(id));
        let idx = self.groups.len() - 1;
        &mut self.groups[idx]
    }

    /// Append an empty group under the first unused `group-N` id.
    pub fn new_group(&mut self) -> String {
        let mut n = self.groups.len() + 1;
        let id = loop {
            let candidate = format!("group-{}", n);
            if self.group(&candidate).is_none() {
                break candidate;
            }
            n += 1;
        };
        self.add_group(id.clone());
        id
    }

    /// Replace every group. The active reference survives only if the new
    /// set has a group with the same id; any drag is abandoned.
    pub fn replace_groups(&mut self, groups: Vec<CurveGroup>) {
        self.groups = groups;
        if let Some(id) = self.active.take()
            && self.group(&id).is_some()
        {
            self.active = Some(id);
        }
        self.drag = None;
    }

    pub fn delete_group(&mut self, id: &str) -> bool {
        let Some(idx) = self.groups.iter().position(|g| g.id() == id) else {
            tracing::warn!("Cannot delete unknown group {}", id);
            return false;
        };
        self.groups.remove(idx);
        if self.active.as_deref() == Some(id) {
            self.active = None;
            self.drag = None;
        }
        true
    }

    pub fn active_group_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_group(&self) -> Option<&CurveGroup> {
        self.active.as_deref().and_then(|id| self.group(id))
    }

    fn active_group_mut(&mut self) -> Option<&mut CurveGroup> {
        let id = self.active.clone()?;
        self.group_mut(&id)
    }

    /// Make `id` the active group. Unknown ids are logged and leave the
    /// current selection alone.
    pub fn set_active_group(&mut self, id: &str) -> bool {
        if self.group(id).is_none() {
            tracing::warn!("No group with id {}", id);
            return false;
        }
        if self.active.as_deref() != Some(id) {
            self.drag = None;
            self.active = Some(id.to_string());
        }
        true
    }

    pub fn clear_active_group(&mut self) {
        self.active = None;
        self.drag = None;
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn drag_target(&self) -> Option<DragTarget> {
        self.drag.map(|d| d.target)
    }

    fn start_drag(&mut self, target: DragTarget, anchor: Point) {
        tracing::debug!("Drag started: {:?}", target);
        self.drag = Some(Drag { target, anchor });
    }

    /// Interpret a pointer press according to the active tool.
    pub fn pointer_down(&mut self, session: &Session) -> Option<Notice> {
        let pos = session.pointer;
        let half = self.settings.point_range_half();
        match session.tool {
            Tool::TransformReference => self.reference.pointer_down(pos),
            Tool::AddPoints => {
                let Some(group) = self.active_group_mut() else {
                    return Some(Notice::NoActiveGroup);
                };
                if inside_canvas(&pos) {
                    group.add_point(pos);
                }
            }
            Tool::DeletePoints => {}
            Tool::EditPoints => {
                if let Some(idx) = self.active_group().and_then(|g| g.hit_point(&pos, half)) {
                    self.start_drag(DragTarget::Point(idx), pos);
                }
            }
            Tool::EditControls => {
                if let Some((idx, endpoint)) =
                    self.active_group().and_then(|g| g.hit_control(&pos, half))
                {
                    self.start_drag(DragTarget::Control(idx, endpoint), pos);
                }
            }
            Tool::EditOriginPoint => {
                if self.origin.within_box(&pos, ORIGIN_SIZE_HALF) {
                    self.start_drag(DragTarget::Origin, pos);
                }
            }
        }
        None
    }

    /// Commit whatever drag is in progress by the pointer's travel since the
    /// press. A release anywhere, inside the canvas or not, commits.
    /// Returns true if anything was committed.
    pub fn pointer_up(&mut self, session: &Session) -> bool {
        let image_committed = self.reference.pointer_up(session.pointer);
        let Some(drag) = self.drag.take() else {
            return image_committed;
        };
        let delta = session.pointer - drag.anchor;
        tracing::debug!("Drag committed: {:?} by ({}, {})", drag.target, delta.x, delta.y);
        let target = match drag.target {
            DragTarget::Point(idx) => self.active_group_mut().and_then(|g| g.point_mut(idx)),
            DragTarget::Control(idx, endpoint) => self
                .active_group_mut()
                .and_then(|g| g.control_point_mut(idx, endpoint)),
            DragTarget::Origin => Some(&mut self.origin),
        };
        match target {
            Some(p) => {
                *p = *p + delta;
                true
            }
            None => image_committed,
        }
    }

    /// Remove the active group's last point and its control handle.
    pub fn delete_last_point(&mut self) -> bool {
        let Some(group) = self.active_group_mut() else {
            return false;
        };
        let removed = group.delete_last();
        if removed {
            // a drag on the removed point or control would commit out of range
            self.drag = None;
        }
        removed
    }

    /// Snap the active group's last point onto its first.
    pub fn sync_last_point(&mut self) -> bool {
        self.active_group_mut()
            .is_some_and(|g| g.sync_last_to_first())
    }

    fn drag_offset(&self, target: DragTarget, pointer: Point) -> Point {
        match self.drag {
            Some(drag) if drag.target == target => pointer - drag.anchor,
            _ => Point::ZERO,
        }
    }

    /// Where the active group's point `idx` is drawn this frame.
    pub fn preview_point(&self, idx: usize, point: Point, pointer: Point) -> Point {
        point + self.drag_offset(DragTarget::Point(idx), pointer)
    }

    /// Where the active group's control `idx` is drawn this frame.
    pub fn preview_control(&self, idx: usize, control: &ControlHandle, pointer: Point) -> ControlHandle {
        ControlHandle::new(
            control.first + self.drag_offset(DragTarget::Control(idx, Endpoint::First), pointer),
            control.second + self.drag_offset(DragTarget::Control(idx, Endpoint::Second), pointer),
        )
    }

    pub fn preview_origin(&self, pointer: Point) -> Point {
        self.origin + self.drag_offset(DragTarget::Origin, pointer)
    }

    /// Draw one frame. Reads committed state plus the live drag offset and
    /// never modifies anything.
    pub fn update(&self, session: &Session, surface: &mut dyn Surface) -> Result<(), RenderError> {
        surface.clear_rect(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT));
        self.reference.render(surface, session.tool, session.pointer);

        for group in self.groups.iter().filter(|g| !g.is_empty()) {
            self.draw_group(group, session, surface)?;
        }

        if session.tool == Tool::EditControls
            && let Some(group) = self.active_group()
        {
            self.draw_controls(group, session.pointer, surface);
        }

        if session.tool == Tool::EditOriginPoint {
            self.draw_origin(session.pointer, surface)?;
        }
        Ok(())
    }

    fn draw_group(
        &self,
        group: &CurveGroup,
        session: &Session,
        surface: &mut dyn Surface,
    ) -> Result<(), RenderError> {
        if !group.is_well_formed() {
            return Err(RenderError::MalformedGroup {
                id: group.id().to_string(),
                points: group.points().len(),
                controls: group.controls().len(),
            });
        }
        let is_active = self.active.as_deref() == Some(group.id());
        let preview = |idx: usize, p: Point| {
            if is_active {
                self.preview_point(idx, p, session.pointer)
            } else {
                p
            }
        };

        let points: Vec<Point> = group
            .points()
            .iter()
            .enumerate()
            .map(|(idx, p)| preview(idx, *p))
            .collect();
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(RenderError::NonFinite {
                context: format!("group {} point ({}, {})", group.id(), bad.x, bad.y),
            });
        }

        let settings = &self.settings;
        surface.set_global_alpha(if is_active {
            settings.active_opacity
        } else {
            settings.inactive_opacity
        });
        surface.set_stroke_color(&settings.main_color);
        surface.set_line_width(settings.line_width);
        surface.begin_path();
        for (idx, p) in points.iter().enumerate() {
            if idx == 0 {
                surface.move_to(*p);
                continue;
            }
            let control = &group.controls()[idx - 1];
            let control = if is_active {
                self.preview_control(idx - 1, control, session.pointer)
            } else {
                *control
            };
            surface.bezier_curve_to(control.first, control.second, *p);
        }
        surface.stroke();

        if is_active && matches!(session.tool, Tool::AddPoints | Tool::EditPoints) {
            surface.set_fill_color(&settings.main_color);
            for p in &points {
                surface.fill_rect(Rect::centered(*p, settings.point_size_half()));
            }
        }
        surface.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_controls(&self, group: &CurveGroup, pointer: Point, surface: &mut dyn Surface) {
        let half = self.settings.point_size_half();
        surface.set_stroke_color(&self.settings.control_color);
        surface.set_line_width(1.0);
        for (idx, control) in group.controls().iter().enumerate() {
            let control = self.preview_control(idx, control, pointer);
            surface.begin_path();
            surface.move_to(control.first);
            surface.line_to(control.second);
            surface.stroke();
            surface.stroke_rect(Rect::centered(control.first, half));
            surface.stroke_rect(Rect::centered(control.second, half));
        }
    }

    fn draw_origin(&self, pointer: Point, surface: &mut dyn Surface) -> Result<(), RenderError> {
        let p = self.preview_origin(pointer);
        if !p.is_finite() {
            return Err(RenderError::NonFinite {
                context: "origin point".to_string(),
            });
        }
        surface.set_stroke_color(&self.settings.origin_color);
        surface.set_line_width(1.0);
        surface.begin_path();
        surface.move_to(Point::new(p.x - ORIGIN_SIZE_HALF, p.y));
        surface.line_to(Point::new(p.x + ORIGIN_SIZE_HALF, p.y));
        surface.move_to(Point::new(p.x, p.y - ORIGIN_SIZE_HALF));
        surface.line_to(Point::new(p.x, p.y + ORIGIN_SIZE_HALF));
        surface.stroke();
        Ok(())
    }
}
