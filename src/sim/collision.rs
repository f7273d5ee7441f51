//! Collision detection for axis-aligned hit boxes
//!
//! Flying objects and cannon balls are both approximated by rectangles
//! centered on their current coordinate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by two opposite corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle spanning `half` in each direction around `center`
    pub fn around(center: Vec2, half: Vec2) -> Self {
        Self {
            x1: center.x - half.x,
            y1: center.y - half.y,
            x2: center.x + half.x,
            y2: center.y + half.y,
        }
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.x1.min(self.x2)
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.x1.max(self.x2)
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.y1.min(self.y2)
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.y1.max(self.y2)
    }
}

/// Check whether two rectangles overlap
///
/// Corners may be given in any order. Overlap must be strictly positive on
/// both axes: rectangles that only share an edge or a corner do not intersect,
/// and a zero-area rectangle never intersects anything.
pub fn boxes_intersect(a: &Rect, b: &Rect) -> bool {
    a.min_x() < b.max_x()
        && a.max_x() > b.min_x()
        && a.min_y() < b.max_y()
        && a.max_y() > b.min_y()
}
