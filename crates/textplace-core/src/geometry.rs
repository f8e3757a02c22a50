//! Geometric primitives: points, affine matrices, and min/max boxes.
//!
//! Coordinates throughout the pipeline live in PDF default user space:
//! origin at the bottom-left of the page, y growing upward, one unit equal
//! to 1/72 inch.

/// A 2D point in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An affine transformation expressed as the six values `[a b c d e f]`.
///
/// The values correspond to the 3×3 matrix
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
/// under the row-vector convention used by PDF content streams: a point
/// transforms as `(x', y') = (a·x + c·y + e, b·x + d·y + f)`, and
/// `m1.concat(m2)` is the matrix that applies `m1` first and `m2` second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scale / rotation component.
    pub a: f64,
    /// Vertical shear / rotation component.
    pub b: f64,
    /// Horizontal shear / rotation component.
    pub c: f64,
    /// Vertical scale / rotation component.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform `[1 0 0 1 0 0]`.
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Create a matrix from its six values.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// A pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Left-multiply: the transform that applies `self` first, then `other`.
    ///
    /// This is the composition used by `cm`, `Td`, and the text rendering
    /// matrix: `new_ctm = operand_matrix.concat(ctm)`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point (translation applies).
    pub fn transform_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Transform a direction vector (translation does not apply).
    ///
    /// Used to carry text-space extents, such as the space-width advance,
    /// into page space.
    pub fn transform_vector(&self, vx: f64, vy: f64) -> (f64, f64) {
        (self.a * vx + self.c * vy, self.b * vx + self.d * vy)
    }

    /// The six values as an array `[a, b, c, d, e, f]`.
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl From<[f64; 6]> for Matrix {
    fn from(m: [f64; 6]) -> Self {
        Self::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }
}

/// An axis-aligned box `[x_min, y_min, x_max, y_max]` in user space.
///
/// Normalized on construction so that `x_min <= x_max` and
/// `y_min <= y_max`; degenerate zero-extent boxes are allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x_min: f64,
    /// Bottom edge.
    pub y_min: f64,
    /// Right edge.
    pub x_max: f64,
    /// Top edge.
    pub y_max: f64,
}

impl Rect {
    /// Create a box from two opposite corners, normalizing the extents.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x_min: x0.min(x1),
            y_min: y0.min(y1),
            x_max: x0.max(x1),
            y_max: y0.max(y1),
        }
    }

    /// The axis-aligned bounding box of a set of points.
    ///
    /// Returns a degenerate box at the first point when only one point is
    /// given; panics on an empty slice (callers always pass corners).
    pub fn bounding(points: &[Point]) -> Self {
        let first = points[0];
        let mut rect = Rect {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        for p in &points[1..] {
            rect.x_min = rect.x_min.min(p.x);
            rect.y_min = rect.y_min.min(p.y);
            rect.x_max = rect.x_max.max(p.x);
            rect.y_max = rect.y_max.max(p.y);
        }
        rect
    }

    /// Transform all four corners through `m` and re-normalize.
    ///
    /// This is how a text-space box becomes a page-space box: the corners
    /// go through the text rendering matrix and the result is the
    /// axis-aligned hull.
    pub fn transformed(&self, m: &Matrix) -> Rect {
        let corners = [
            m.transform_point(Point::new(self.x_min, self.y_min)),
            m.transform_point(Point::new(self.x_max, self.y_min)),
            m.transform_point(Point::new(self.x_max, self.y_max)),
            m.transform_point(Point::new(self.x_min, self.y_max)),
        ];
        Rect::bounding(&corners)
    }

    /// Box width (always non-negative).
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Box height (always non-negative).
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}
