//! Map coordinates and square footprints.
//!
//! Everything on the map (players, rumor spots, the market) occupies an
//! axis-aligned square anchored at its top-left corner. Two footprints
//! collide when their interiors intersect; shared edges do not count.

use serde::{Deserialize, Serialize};

/// Top-left corner of something on the map, in map units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by `(dx, dy)`, saturating at the `i32` limits.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A square region of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub origin: Position,
    pub size: i32,
}

impl Footprint {
    /// Create a footprint of `size` x `size` anchored at `origin`.
    #[must_use]
    pub const fn new(origin: Position, size: i32) -> Self {
        Self { origin, size }
    }

    #[must_use]
    pub const fn left(&self) -> i32 {
        self.origin.x
    }

    #[must_use]
    pub const fn top(&self) -> i32 {
        self.origin.y
    }

    #[must_use]
    pub const fn right(&self) -> i32 {
        self.origin.x.saturating_add(self.size)
    }

    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.origin.y.saturating_add(self.size)
    }

    /// Check whether the interiors of two footprints intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Walkable area of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapBounds {
    pub width: i32,
    pub height: i32,
}

impl MapBounds {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Check whether a footprint lies entirely inside the map.
    #[must_use]
    pub fn contains(&self, footprint: &Footprint) -> bool {
        footprint.left() >= 0
            && footprint.top() >= 0
            && footprint.right() <= self.width
            && footprint.bottom() <= self.height
    }
}
