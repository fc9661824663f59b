//! Geometry primitives
//!
//! All rects handed to the engine by a host are axis-aligned and expressed in
//! logical pixels. Section rects are in the scroll container's *content*
//! coordinates (an element's offset from the top of the scrollable content),
//! nav item rects are in whatever space the nav list is laid out in; only
//! their relative positions matter.

use serde::{Deserialize, Serialize};

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`
    pub fn delta_from(&self, origin: Point) -> (f32, f32) {
        (self.x - origin.x, self.y - origin.y)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
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
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
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

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
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

    /// Top edge (same as `y`)
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Left edge (same as `x`)
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.right()
            && point.y >= self.origin.y
            && point.y <= self.bottom()
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }

    /// Whether this rect overlaps the horizontal band `[top, bottom)`.
    ///
    /// Zero-height rects never overlap anything.
    pub fn overlaps_band(&self, top: f32, bottom: f32) -> bool {
        self.size.height > 0.0 && self.bottom() > top && self.top() < bottom
    }
}

/// Main axis of a list of items
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    /// Leading edge of `rect` along this axis
    pub fn leading(&self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.left(),
            Orientation::Vertical => rect.top(),
        }
    }

    /// Trailing edge of `rect` along this axis
    pub fn trailing(&self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.right(),
            Orientation::Vertical => rect.bottom(),
        }
    }

    /// Size of `rect` along this axis
    pub fn extent(&self, rect: &Rect) -> f32 {
        match self {
            Orientation::Horizontal => rect.width(),
            Orientation::Vertical => rect.height(),
        }
    }
}
