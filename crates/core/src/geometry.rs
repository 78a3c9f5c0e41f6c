//! Geometric primitives for page composition.
//!
//! Provides:
//! - `Point`, `Size` and `Rect` value types (origin + size rectangles)
//! - A 6-element affine `Matrix` with composition helpers
//!
//! Coordinates are plain `f64`; no unit is implied. Page boxes arrive in the
//! document's own space (bottom-left origin), destination rectangles in the
//! host's view space (top-left origin). The transforms in
//! [`crate::layout::transform`] bridge the two.

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// A 6-element affine transformation matrix (a, b, c, d, e, f).
/// Transforms point (x, y) to (ax + cy + e, bx + dy + f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Multiplies two matrices.
///
/// The result maps a point through `first` and then through `then`.
pub fn mult_matrix(first: Matrix, then: Matrix) -> Matrix {
    let (a1, b1, c1, d1, e1, f1) = first;
    let (a0, b0, c0, d0, e0, f0) = then;
    (
        a0 * a1 + c0 * b1,
        b0 * a1 + d0 * b1,
        a0 * c1 + c0 * d1,
        b0 * c1 + d0 * d1,
        a0 * e1 + c0 * f1 + e0,
        b0 * e1 + d0 * f1 + f0,
    )
}

/// Concatenates `op` onto a current transformation matrix.
///
/// Points are mapped through `op` first and then through `ctm`, the same way a
/// graphics context prepends `translate`/`scale`/`rotate` calls.
#[inline]
pub fn concat_matrix(ctm: Matrix, op: Matrix) -> Matrix {
    mult_matrix(op, ctm)
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, e, f) = m;
    Point::new(a * v.x + c * v.y + e, b * v.x + d * v.y + f)
}

/// Applies a matrix to a rectangle.
///
/// The result is not a rotated rectangle but the axis-aligned rectangle that
/// tightly fits the transformed corners.
pub fn apply_matrix_rect(m: Matrix, rect: Rect) -> Rect {
    let corners = [
        Point::new(rect.min_x(), rect.min_y()),
        Point::new(rect.max_x(), rect.min_y()),
        Point::new(rect.max_x(), rect.max_y()),
        Point::new(rect.min_x(), rect.max_y()),
    ]
    .map(|p| apply_matrix_pt(m, p));

    let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
    let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in corners {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Rect::from_corners(x0, y0, x1, y1)
}

/// Returns true when every component of the two matrices is within `epsilon`.
pub fn matrix_approx_eq(m1: Matrix, m2: Matrix, epsilon: f64) -> bool {
    approx_eq(m1.0, m2.0, epsilon)
        && approx_eq(m1.1, m2.1, epsilon)
        && approx_eq(m1.2, m2.2, epsilon)
        && approx_eq(m1.3, m2.3, epsilon)
        && approx_eq(m1.4, m2.4, epsilon)
        && approx_eq(m1.5, m2.5, epsilon)
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (or negative).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Size with width and height exchanged.
    pub const fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Uniformly scaled size.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Component-wise maximum.
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// An axis-aligned rectangle stored as origin + size.
///
/// Rectangles built through [`Rect::from_corners`] are standardized so the
/// size is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Rectangle anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    /// Builds a rectangle from two opposite corners in any order.
    ///
    /// PDF box arrays (`[x0 y0 x1 y1]`) are not guaranteed to list the
    /// lower-left corner first.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.height
    }

    #[inline]
    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    #[inline]
    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Overlapping region of two rectangles.
    ///
    /// Returns `None` when they do not overlap or only touch along an edge.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.min_x().max(other.min_x());
        let y0 = self.min_y().max(other.min_y());
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Rectangle shrunk by `dx` on the left and right and `dy` on the top and
    /// bottom. Never produces a negative size.
    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.origin.x + dx,
            self.origin.y + dy,
            (self.size.width - 2.0 * dx).max(0.0),
            (self.size.height - 2.0 * dy).max(0.0),
        )
    }

    /// Compares origin and size within `epsilon`.
    pub fn approx_eq(&self, other: &Rect, epsilon: f64) -> bool {
        approx_eq(self.origin.x, other.origin.x, epsilon)
            && approx_eq(self.origin.y, other.origin.y, epsilon)
            && approx_eq(self.size.width, other.size.width, epsilon)
            && approx_eq(self.size.height, other.size.height, epsilon)
    }
}
