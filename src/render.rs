//! Render surface contract and the recorded draw list.
//!
//! The core never talks to a real canvas. The update pass issues calls on a
//! [`Surface`]; [`DrawList`] records them so a host can replay them onto its
//! own 2D painter, and tests can inspect exactly what was drawn.

use crate::reference::DecodedImage;
use crate::types::{Point, Rect};

/// 2D drawing operations the update pass needs.
pub trait Surface {
    fn clear_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point);
    fn stroke(&mut self);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_stroke_color(&mut self, color: &str);
    fn set_fill_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn draw_image(&mut self, image: &DecodedImage, dest: Rect);
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    ClearRect(Rect),
    FillRect(Rect),
    StrokeRect(Rect),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    BezierCurveTo { c1: Point, c2: Point, end: Point },
    Stroke,
    GlobalAlpha(f64),
    StrokeColor(String),
    FillColor(String),
    LineWidth(f64),
    Image { image: DecodedImage, dest: Rect },
}

/// A [`Surface`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawCommand> {
        self.commands.iter()
    }

    /// Points passed to `move_to`, `line_to` and as curve end points, in order.
    pub fn path_vertices(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => Some(*p),
                DrawCommand::BezierCurveTo { end, .. } => Some(*end),
                _ => None,
            })
            .collect()
    }

    /// Rectangles filled, in order.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Rectangles outlined, in order.
    pub fn stroked_rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeRect(r) => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl Surface for DrawList {
    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRect(rect));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::StrokeRect(rect));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.commands.push(DrawCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(DrawCommand::LineTo(p));
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.commands
            .push(DrawCommand::BezierCurveTo { c1, c2, end });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::StrokeColor(color.to_string()));
    }

    fn set_fill_color(&mut self, color: &str) {
        self.commands.push(DrawCommand::FillColor(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            dest,
        });
    }
}
