//! Axis-aligned 2D bounding boxes.

use serde::{Deserialize, Serialize};

use super::point::Point2;

/// Axis-aligned bounding box in map units.
///
/// A freshly created box is void: it contains nothing and has no extent.
/// The first `update` collapses it onto that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::void()
    }
}

impl BoundingBox {
    /// Creates an empty (void) box.
    pub const fn void() -> Self {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Box spanning exactly the two corner points, in any order.
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        let mut bb = Self::void();
        bb.update(a);
        bb.update(b);
        bb
    }

    /// Smallest box containing every point. Void for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut bb = Self::void();
        for p in points {
            bb.update(*p);
        }
        bb
    }

    pub fn is_void(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grows the box to contain `p`.
    pub fn update(&mut self, p: Point2) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grows the box to contain `other`. Merging a void box is a no-op.
    pub fn merge(&mut self, other: &BoundingBox) {
        if other.is_void() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn width(&self) -> f64 {
        if self.is_void() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_void() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    /// Length of the box diagonal, sqrt(dx² + dy²). Zero for a void box.
    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    pub fn contains(&self, p: &Point2) -> bool {
        !self.is_void()
            && p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
    }
}
