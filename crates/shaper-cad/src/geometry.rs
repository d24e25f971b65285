//! Ground-plane geometry helpers
//!
//! Sketches live on the `y = 0` plane, so every point is an `(x, z)` pair.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point on the ground plane (`y` is implicitly 0)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub z: f32,
}

impl Point2D {
    /// The origin of the ground plane
    pub const ORIGIN: Self = Self { x: 0.0, z: 0.0 };

    /// Create a new point
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point2D) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }

    /// Snap to the nearest grid intersection
    ///
    /// A non-positive spacing falls back to unit spacing.
    pub fn snap(self, grid_spacing: f32) -> Self {
        let spacing = if grid_spacing > 0.0 { grid_spacing } else { 1.0 };
        Self {
            x: (self.x / spacing).round() * spacing,
            z: (self.z / spacing).round() * spacing,
        }
    }

    /// Both coordinates are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    /// Convert to a 2D vector (`x -> x`, `z -> y`)
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

impl From<Vec2> for Point2D {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, z: v.y }
    }
}

impl From<Point2D> for Vec2 {
    fn from(p: Point2D) -> Self {
        p.to_vec2()
    }
}

/// Arithmetic mean of a point set (origin for an empty set)
pub fn centroid(points: &[Point2D]) -> Point2D {
    if points.is_empty() {
        return Point2D::ORIGIN;
    }
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Point2D::from(sum / points.len() as f32)
}

/// Signed area of a closed polyline (shoelace formula)
///
/// Positive when the points wind counter-clockwise in the `(x, z)` plane.
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// Drop points that sit closer than `min_separation` to their successor
///
/// The polyline is treated as closed, so the last kept point is also
/// compared against the first one.
pub fn collapse_close_points(points: &[Point2D], min_separation: f32) -> Vec<Point2D> {
    let mut kept: Vec<Point2D> = Vec::with_capacity(points.len());
    for &p in points {
        match kept.last() {
            Some(&last) if last.distance(p) < min_separation => {}
            _ => kept.push(p),
        }
    }

    while kept.len() > 1 {
        let first = kept[0];
        match kept.last() {
            Some(&last) if last.distance(first) < min_separation => {
                kept.pop();
            }
            _ => break,
        }
    }

    kept
}
