//! Axis-aligned geometry primitives shared by every other module.
//!
//! All engine geometry is expressed in *world* space (the container's own
//! coordinate system). The input layer reports pointer positions in screen
//! space; [`ScreenTransform`] converts between the two.

use std::ops::{Add, Sub};

/// A point (or a translation) in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box: top-left corner plus size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same box moved by `delta`.
    pub fn translated(&self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Screen → world mapping supplied by the host, equivalent to a
/// current-transform-matrix lookup restricted to scale + translation.
///
/// `screen = world * scale + translate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ScreenTransform {
    pub fn identity() -> Self {
        Self { scale_x: 1.0, scale_y: 1.0, translate_x: 0.0, translate_y: 0.0 }
    }

    /// Build a transform from a uniform zoom and a pan offset.
    pub fn from_viewport(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { scale_x: zoom, scale_y: zoom, translate_x: pan_x, translate_y: pan_y }
    }

    /// Convert a screen-space pointer position to world space.
    ///
    /// A non-positive scale is treated as 1.0.
    pub fn to_world(&self, screen_x: f32, screen_y: f32) -> Point {
        let sx = if self.scale_x > 0.0 { self.scale_x } else { 1.0 };
        let sy = if self.scale_y > 0.0 { self.scale_y } else { 1.0 };
        Point::new((screen_x - self.translate_x) / sx, (screen_y - self.translate_y) / sy)
    }

    /// Convert a world-space point to screen space.
    pub fn to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.scale_x + self.translate_x, p.y * self.scale_y + self.translate_y)
    }
}
