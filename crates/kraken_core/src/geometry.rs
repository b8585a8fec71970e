//! Core geometry types
//!
//! Points, sizes and axis-aligned rectangles in region pixel space. Block and
//! button rectangles are expressed in block-local coordinates; the layout
//! passes mostly reason about edges (`xmin`, `xmax`, ...) so `Rect` offers both
//! an origin/size view and an edge view.

// ─────────────────────────────────────────────────────────────────────────────
// Point / Size
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rect
// ─────────────────────────────────────────────────────────────────────────────

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rect from its edges
    pub fn from_edges(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Rect {
            origin: Point::new(xmin, ymin),
            size: Size::new(xmax - xmin, ymax - ymin),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn xmin(&self) -> f32 {
        self.origin.x
    }

    pub fn xmax(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn ymin(&self) -> f32 {
        self.origin.y
    }

    pub fn ymax(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Move the left edge, keeping the right edge fixed
    pub fn set_xmin(&mut self, xmin: f32) {
        let xmax = self.xmax();
        self.origin.x = xmin;
        self.size.width = xmax - xmin;
    }

    /// Move the right edge, keeping the left edge fixed
    pub fn set_xmax(&mut self, xmax: f32) {
        self.size.width = xmax - self.origin.x;
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.xmax()
            && point.y >= self.origin.y
            && point.y <= self.ymax()
    }

    /// Get the size of this rect
    pub fn size(&self) -> Size {
        self.size
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Grow the rect by `pad` on every side
    pub fn expand(&self, pad: f32) -> Self {
        Rect::from_edges(
            self.xmin() - pad,
            self.ymin() - pad,
            self.xmax() + pad,
            self.ymax() + pad,
        )
    }

    /// Get the union of two rects (smallest rect containing both)
    pub fn union(&self, other: &Rect) -> Self {
        Rect::from_edges(
            self.xmin().min(other.xmin()),
            self.ymin().min(other.ymin()),
            self.xmax().max(other.xmax()),
            self.ymax().max(other.ymax()),
        )
    }

    /// True while no horizontal extent has been assigned.
    ///
    /// Layout uses `xmin == xmax` to mean "bounds not computed yet".
    pub fn is_unbounded_x(&self) -> bool {
        self.size.width == 0.0
    }
}
