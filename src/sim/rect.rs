//! Axis-aligned world bounds
//!
//! Used for two clamps:
//! - keeping the hole (a circle) inside the map
//! - keeping the camera viewport (a box around the camera center) inside the map

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Build from two corners in any order
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if a point is inside (edges inclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Check if `other` lies fully inside this rectangle, with a small tolerance
    pub fn contains_rect(&self, other: &Rect, eps: f32) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.y >= self.min.y - eps
            && other.max.x <= self.max.x + eps
            && other.max.y <= self.max.y + eps
    }

    /// Clamp the center of a box with the given half extents so the box stays
    /// inside. On an axis where the box is larger than the rect, the box is
    /// centered on the rect instead.
    pub fn clamp_center(&self, center: Vec2, half_extents: Vec2) -> Vec2 {
        let mid = self.center();
        let lo = self.min + half_extents;
        let hi = self.max - half_extents;
        Vec2::new(
            if lo.x <= hi.x { center.x.clamp(lo.x, hi.x) } else { mid.x },
            if lo.y <= hi.y { center.y.clamp(lo.y, hi.y) } else { mid.y },
        )
    }

    /// Clamp a circle center so the circle stays inside
    #[inline]
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        self.clamp_center(center, Vec2::splat(radius.max(0.0)))
    }
}
