use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Width of the drawing surface in pixels.
pub const CANVAS_WIDTH: f64 = 1024.0;
/// Height of the drawing surface in pixels.
pub const CANVAS_HEIGHT: f64 = 768.0;

/// Half the side of the pick box around the origin point.
pub const ORIGIN_SIZE_HALF: f64 = 32.0;

/// Point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Angle in radians of the vector from `self` to `other`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Whether `other` lies strictly inside the axis-aligned box of the given
    /// half extent centred on this point.
    pub fn within_box(&self, other: &Point, half: f64) -> bool {
        (other.x - self.x).abs() < half && (other.y - self.y).abs() < half
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Which end of a control handle is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    First,
    Second,
}

impl Endpoint {
    pub const BOTH: [Endpoint; 2] = [Endpoint::First, Endpoint::Second];
}

/// The two Bezier control points of the segment ending at the next path point.
///
/// `first` leaves the segment's start point, `second` arrives at its end point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlHandle {
    pub first: Point,
    pub second: Point,
}

impl ControlHandle {
    pub fn new(first: Point, second: Point) -> Self {
        Self { first, second }
    }

    /// Straight-line handle for the segment `from -> to`, with the control
    /// points at 20% and 80% of the way along it.
    pub fn straight(from: Point, to: Point) -> Self {
        let angle = from.angle_to(&to);
        let dist = from.distance(&to);
        let along = |fraction: f64| {
            Point::new(
                from.x + angle.cos() * dist * fraction,
                from.y + angle.sin() * dist * fraction,
            )
        };
        Self {
            first: along(0.2),
            second: along(0.8),
        }
    }

    pub fn get(&self, endpoint: Endpoint) -> Point {
        match endpoint {
            Endpoint::First => self.first,
            Endpoint::Second => self.second,
        }
    }

    pub fn get_mut(&mut self, endpoint: Endpoint) -> &mut Point {
        match endpoint {
            Endpoint::First => &mut self.first,
            Endpoint::Second => &mut self.second,
        }
    }
}

/// Interaction mode governing how pointer events are interpreted.
///
/// The discriminants are the integers stored in saved snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    TransformReference = 0,
    #[default]
    AddPoints = 1,
    /// Reserved; pointer input does nothing in this mode.
    DeletePoints = 2,
    EditPoints = 3,
    EditControls = 4,
    EditOriginPoint = 5,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::TransformReference,
        Tool::AddPoints,
        Tool::DeletePoints,
        Tool::EditPoints,
        Tool::EditControls,
        Tool::EditOriginPoint,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Tool> {
        Tool::ALL.get(index as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::TransformReference => "Transform Reference",
            Tool::AddPoints => "Add Points",
            Tool::DeletePoints => "Delete Points",
            Tool::EditPoints => "Edit Points",
            Tool::EditControls => "Edit Controls",
            Tool::EditOriginPoint => "Edit Origin",
        }
    }
}

/// Whether a pointer position lies strictly inside the drawing surface.
pub fn inside_canvas(p: &Point) -> bool {
    p.x > 0.0 && p.x < CANVAS_WIDTH && p.y > 0.0 && p.y < CANVAS_HEIGHT
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `2 * half` centred on `center`.
    pub fn centered(center: Point, half: f64) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}
