//! Shared placement math for the live preview and the export compositor.
//!
//! Both render paths must agree pixel for pixel, so the contain-fit and the
//! sprite pivot transform are defined once here and nowhere else.
//!
//! # Coordinate System
//!
//! - Canvas logical units, origin at the top-left corner, y grows downward
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Sprite transforms pivot around the sprite position

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point (or offset) in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
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

/// Width and height in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size of a raster in pixels.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width over height. Undefined (NaN or infinite) for empty sizes.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

    /// Rectangle of the given size centered on `center`.
    pub fn centered_at(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Clamp a point into this rectangle, edges inclusive.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.max(self.left()).min(self.right()),
            p.y.max(self.top()).min(self.bottom()),
        )
    }
}

/// Size of `content` scaled to fit entirely inside `container`, aspect kept.
///
/// Matches CSS `background-size: contain`: a source wider than the container
/// fills its width, otherwise it fills its height.
pub fn contain_size(content: Size, container: Size) -> Size {
    if content.is_empty() || container.is_empty() {
        return Size::ZERO;
    }

    let aspect = content.aspect_ratio();
    if aspect > container.aspect_ratio() {
        Size::new(container.width, container.width / aspect)
    } else {
        Size::new(container.height * aspect, container.height)
    }
}

/// Contain-fit `content` into `container` and center it in both axes.
///
/// Matches CSS `background-size: contain; background-position: center`.
pub fn contain_rect(content: Size, container: Rect) -> Rect {
    Rect::centered_at(container.center(), contain_size(content, container.size()))
}

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Uses the Euclidean remainder, so `-5` becomes `355`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// 2D affine transform in canvas convention.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    pub fn rotate_degrees(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn scale(s: f64) -> Self {
        Self {
            a: s,
            d: s,
            ..Self::IDENTITY
        }
    }

    /// `self` applied after `inner`, i.e. the product `self * inner`.
    pub fn then(&self, inner: &Affine) -> Affine {
        Affine {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Axis-aligned bounds of `r` after transformation.
    pub fn map_rect_bounds(&self, r: Rect) -> Rect {
        let corners = [
            self.apply(Point::new(r.left(), r.top())),
            self.apply(Point::new(r.right(), r.top())),
            self.apply(Point::new(r.right(), r.bottom())),
            self.apply(Point::new(r.left(), r.bottom())),
        ];

        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }
}

/// Resolved placement of one sprite on the canvas.
///
/// The sprite raster is contain-fit into the logical sprite box, centered on
/// the local origin, then rotated and scaled about the pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePlacement {
    pub pivot: Point,
    pub rotation_degrees: f64,
    pub scale: f64,
    /// Logical box the raster was fit into, centered on the pivot.
    pub box_size: Size,
    /// Contain-fit size of the raster inside the box, before scaling.
    pub draw_size: Size,
}

impl SpritePlacement {
    pub fn new(
        pivot: Point,
        rotation_degrees: f64,
        scale: f64,
        raster: Size,
        box_size: Size,
    ) -> Self {
        Self {
            pivot,
            rotation_degrees,
            scale,
            box_size,
            draw_size: contain_size(raster, box_size),
        }
    }

    /// Local-to-canvas transform: translate, then rotate, then scale.
    pub fn to_canvas(&self) -> Affine {
        Affine::translate(self.pivot.x, self.pivot.y)
            .then(&Affine::rotate_degrees(self.rotation_degrees))
            .then(&Affine::scale(self.scale))
    }

    /// Raster rectangle in local space.
    pub fn local_draw_rect(&self) -> Rect {
        Rect::centered_at(Point::ORIGIN, self.draw_size)
    }

    /// Untransformed sprite box as laid out before the CSS transform.
    pub fn layout_box(&self) -> Rect {
        Rect::centered_at(self.pivot, self.box_size)
    }

    /// Axis-aligned canvas bounds of the transformed raster rectangle.
    pub fn canvas_bounds(&self) -> Rect {
        self.to_canvas().map_rect_bounds(self.local_draw_rect())
    }
}
