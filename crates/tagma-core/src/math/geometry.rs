// Copyright 2025 tagma contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the axis-aligned rectangle used for detection bounding boxes.
//!
//! The proximity join between object detections and hand joints is built on
//! these primitives: boxes are expanded by a margin and tested against joint
//! positions, and joint-to-box distances are scored for diagnostics.

use serde::{Deserialize, Serialize};

use super::Vec2;

/// An axis-aligned rectangle in normalized image coordinates.
///
/// Defined by its minimum and maximum corner points. Detection models report
/// object locations as rectangles in this form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Rect {
    /// The corner of the rectangle with the smallest coordinates on both axes.
    pub min: Vec2,
    /// The corner of the rectangle with the largest coordinates on both axes.
    pub max: Vec2,
}

impl Rect {
    /// An invalid `Rect` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// This is useful as a neutral starting point for merging operations. Merging any
    /// valid `Rect` with `INVALID` will result in that valid `Rect`.
    pub const INVALID: Self = Self {
        min: Vec2::new(f32::INFINITY, f32::INFINITY),
        max: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Creates a new `Rect` from two corner points.
    ///
    /// This constructor automatically ensures that the `min` field holds the
    /// component-wise minimum and `max` holds the component-wise maximum,
    /// regardless of the order the points are passed in.
    #[inline]
    pub fn from_min_max(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a new `Rect` from a center point and its half-extents.
    ///
    /// The provided `half_extents` will be made non-negative.
    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        let safe = half_extents.abs();
        Self {
            min: center - safe,
            max: center + safe,
        }
    }

    /// Creates a degenerate `Rect` containing a single point (min and max are the same).
    #[inline]
    pub fn from_point(point: Vec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Creates a `Rect` that tightly encloses a given set of points.
    ///
    /// # Returns
    ///
    /// Returns `Some(Rect)` if the input slice is not empty, otherwise `None`.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut min_pt = points[0];
        let mut max_pt = points[0];

        for point in points.iter().skip(1) {
            min_pt.x = min_pt.x.min(point.x);
            min_pt.y = min_pt.y.min(point.y);
            max_pt.x = max_pt.x.max(point.x);
            max_pt.y = max_pt.y.max(point.y);
        }

        Some(Self {
            min: min_pt,
            max: max_pt,
        })
    }

    /// Calculates the center point of the `Rect`.
    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents (half the size on each axis) of the `Rect`.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Calculates the full size (width, height) of the `Rect`.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Checks if the `Rect` is valid (i.e., `min` <= `max` on both axes).
    /// Degenerate rectangles where `min == max` are considered valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Checks if a point is contained within or on the boundary of the `Rect`.
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Checks if this `Rect` intersects with another `Rect`.
    ///
    /// Rectangles that only touch at the boundary are considered intersecting.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
    }

    /// Creates a new `Rect` that encompasses both this `Rect` and another one.
    #[inline]
    pub fn merge(&self, other: &Rect) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Creates a new `Rect` that encompasses both this `Rect` and an additional point.
    #[inline]
    pub fn merged_with_point(&self, point: Vec2) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Vec2::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    /// Returns this `Rect` grown by `margin` on every side.
    ///
    /// A negative margin shrinks the rectangle; the result is re-normalized
    /// so it stays valid even when the shrink crosses the center.
    #[inline]
    pub fn expanded_by(&self, margin: f32) -> Self {
        let delta = Vec2::new(margin, margin);
        Self::from_min_max(self.min - delta, self.max + delta)
    }

    /// Returns the point inside (or on the boundary of) the `Rect` closest to `point`.
    ///
    /// Only meaningful for valid rectangles.
    #[inline]
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Calculates the distance from `point` to the nearest edge of the `Rect`.
    ///
    /// Points inside the rectangle have a distance of `0.0`.
    #[inline]
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        self.closest_point(point).distance(point)
    }
}

impl Default for Rect {
    /// Returns the default `Rect`, which is `Rect::INVALID`.
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    fn vec2_approx_eq(a: Vec2, b: Vec2) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    #[test]
    fn test_rect_from_min_max() {
        let rect = Rect::from_min_max(Vec2::new(0.1, 0.2), Vec2::new(0.4, 0.5));
        assert_eq!(rect.min, Vec2::new(0.1, 0.2));
        assert_eq!(rect.max, Vec2::new(0.4, 0.5));

        // Test swapped corners
        let swapped = Rect::from_min_max(Vec2::new(0.4, 0.5), Vec2::new(0.1, 0.2));
        assert_eq!(swapped, rect);
    }

    #[test]
    fn test_rect_from_center_half_extents() {
        let rect = Rect::from_center_half_extents(Vec2::new(0.5, 0.5), Vec2::new(0.1, 0.2));
        assert!(vec2_approx_eq(rect.min, Vec2::new(0.4, 0.3)));
        assert!(vec2_approx_eq(rect.max, Vec2::new(0.6, 0.7)));
        assert!(vec2_approx_eq(rect.center(), Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_rect_from_points() {
        assert!(Rect::from_points(&[]).is_none());

        let points = [
            Vec2::new(0.3, 0.9),
            Vec2::new(0.1, 0.5),
            Vec2::new(0.7, 0.2),
        ];
        let rect = Rect::from_points(&points).unwrap();
        assert_eq!(rect.min, Vec2::new(0.1, 0.2));
        assert_eq!(rect.max, Vec2::new(0.7, 0.9));
    }

    #[test]
    fn test_rect_utils() {
        let rect = Rect::from_min_max(Vec2::new(0.2, 0.2), Vec2::new(0.6, 0.4));
        assert!(vec2_approx_eq(rect.center(), Vec2::new(0.4, 0.3)));
        assert!(vec2_approx_eq(rect.size(), Vec2::new(0.4, 0.2)));
        assert!(vec2_approx_eq(rect.half_extents(), Vec2::new(0.2, 0.1)));
        assert!(rect.is_valid());
        assert!(!Rect::INVALID.is_valid());
        assert!(Rect::from_point(Vec2::ZERO).is_valid());
    }

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::from_min_max(Vec2::ZERO, Vec2::ONE);
        assert!(rect.contains_point(Vec2::new(0.5, 0.5)));
        assert!(rect.contains_point(Vec2::ZERO));
        assert!(rect.contains_point(Vec2::ONE));
        assert!(!rect.contains_point(Vec2::new(1.1, 0.5)));
        assert!(!rect.contains_point(Vec2::new(0.5, -0.1)));
        assert!(!Rect::INVALID.contains_point(Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::from_min_max(Vec2::ZERO, Vec2::new(0.5, 0.5));

        let overlapping = Rect::from_min_max(Vec2::new(0.25, 0.25), Vec2::new(0.75, 0.75));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));

        // Touching boundary counts as intersecting
        let touching = Rect::from_min_max(Vec2::new(0.5, 0.0), Vec2::new(0.75, 0.5));
        assert!(a.intersects(&touching));

        let disjoint = Rect::from_min_max(Vec2::new(0.6, 0.6), Vec2::new(0.8, 0.8));
        assert!(!a.intersects(&disjoint));
        assert!(!disjoint.intersects(&a));
    }

    #[test]
    fn test_rect_merge() {
        let a = Rect::from_min_max(Vec2::ZERO, Vec2::new(0.3, 0.3));
        let b = Rect::from_min_max(Vec2::new(0.2, 0.2), Vec2::new(0.6, 0.6));
        let merged = a.merge(&b);
        assert_eq!(merged.min, Vec2::ZERO);
        assert_eq!(merged.max, Vec2::new(0.6, 0.6));

        let with_point = a.merged_with_point(Vec2::new(-0.1, 0.5));
        assert_eq!(with_point.min, Vec2::new(-0.1, 0.0));
        assert_eq!(with_point.max, Vec2::new(0.3, 0.5));

        // Merging with the invalid sentinel yields the valid operand.
        assert_eq!(Rect::INVALID.merge(&a), a);
        assert_eq!(
            Rect::INVALID.merged_with_point(Vec2::new(0.1, 0.1)),
            Rect::from_point(Vec2::new(0.1, 0.1))
        );
    }

    #[test]
    fn test_rect_expanded_by() {
        let rect = Rect::from_min_max(Vec2::new(0.4, 0.4), Vec2::new(0.6, 0.6));
        let grown = rect.expanded_by(0.05);
        assert!(vec2_approx_eq(grown.min, Vec2::new(0.35, 0.35)));
        assert!(vec2_approx_eq(grown.max, Vec2::new(0.65, 0.65)));

        // Over-shrinking collapses through the center but stays valid.
        let collapsed = rect.expanded_by(-0.2);
        assert!(collapsed.is_valid());
    }

    #[test]
    fn test_rect_point_distance() {
        let rect = Rect::from_min_max(Vec2::new(0.2, 0.2), Vec2::new(0.4, 0.4));

        // Inside the box the distance is zero.
        assert!(approx_eq(
            rect.distance_to_point(Vec2::new(0.3, 0.3)),
            0.0
        ));

        // Straight out along one axis.
        assert!(approx_eq(
            rect.distance_to_point(Vec2::new(0.5, 0.3)),
            0.1
        ));

        // Diagonal from a corner.
        let d = rect.distance_to_point(Vec2::new(0.5, 0.5));
        assert!(approx_eq(d, (0.02f32).sqrt()));

        assert_eq!(
            rect.closest_point(Vec2::new(0.5, 0.5)),
            Vec2::new(0.4, 0.4)
        );
    }
}
