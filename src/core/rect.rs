//! Axis-Aligned Bounding Boxes
//!
//! Every collision test in the arena is an AABB overlap in whole units.

use serde::{Serialize, Deserialize};

use super::fixed::{ARENA_WIDTH, ARENA_HEIGHT};

/// Integer axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// The full arena.
    pub const ARENA: Rect = Rect::new(0, 0, ARENA_WIDTH, ARENA_HEIGHT);

    /// Create a rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Whether the rectangle has zero or negative extent on either axis.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Strict overlap test.
    ///
    /// Rectangles that only share an edge do NOT intersect, and an empty
    /// rectangle intersects nothing.
    #[inline]
    pub const fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether `other` lies fully inside this rectangle (edges inclusive).
    #[inline]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The same rectangle moved by `(dx, dy)`.
    #[inline]
    pub const fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// The same rectangle pushed inside `bounds` on both axes.
    ///
    /// Assumes the rectangle is no larger than `bounds`.
    #[inline]
    pub fn clamp_inside(&self, bounds: &Rect) -> Rect {
        let x = self.x.clamp(bounds.x, bounds.right() - self.w);
        let y = self.y.clamp(bounds.y, bounds.bottom() - self.h);
        Rect::new(x, y, self.w, self.h)
    }

    /// Center point, rounded toward the top-left.
    #[inline]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}
