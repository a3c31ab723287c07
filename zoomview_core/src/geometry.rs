// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Points and rectangles in model and device space.
//!
//! Model space is the tree's own integer coordinate system: X is zoom depth
//! (0 at the crosshair edge, growing away from it) and Y runs over
//! `[0, max_y]` for the visible world. Device space is pixels.

/// A point in model space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelPoint {
    /// Zoom-depth coordinate.
    pub x: i64,
    /// Position along the tree's span axis.
    pub y: i64,
}

impl ModelPoint {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// A point in device space (pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DevicePoint {
    /// Horizontal pixel coordinate.
    pub x: i32,
    /// Vertical pixel coordinate.
    pub y: i32,
}

impl DevicePoint {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in model space, inclusive on both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelRect {
    /// Smallest X.
    pub min_x: i64,
    /// Smallest Y.
    pub min_y: i64,
    /// Largest X.
    pub max_x: i64,
    /// Largest Y.
    pub max_y: i64,
}

impl ModelRect {
    /// Returns the smallest rectangle enclosing all `points`.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    #[must_use]
    pub fn enclosing(points: &[ModelPoint]) -> Self {
        assert!(!points.is_empty(), "enclosing rect of no points");
        let mut rect = Self {
            min_x: i64::MAX,
            min_y: i64::MAX,
            max_x: i64::MIN,
            max_y: i64::MIN,
        };
        for p in points {
            rect.min_x = rect.min_x.min(p.x);
            rect.min_y = rect.min_y.min(p.y);
            rect.max_x = rect.max_x.max(p.x);
            rect.max_y = rect.max_y.max(p.y);
        }
        rect
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Height along the span axis.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i64 {
        self.max_y - self.min_y
    }
}

/// An axis-aligned rectangle in device space.
///
/// Always normalized so that `left <= right` and `top <= bottom`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeviceRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl DeviceRect {
    /// Builds the rectangle spanned by two opposite corners, in any order.
    #[must_use]
    pub fn from_corners(a: DevicePoint, b: DevicePoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Size of the drawing surface in pixels.
///
/// Dimensions are clamped to at least one pixel so that scale factors and
/// the visible region stay finite while a window is minimized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScreenSize {
    width: i32,
    height: i32,
}

impl ScreenSize {
    /// Creates a size, clamping each dimension to at least 1.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width < 1 { 1 } else { width },
            height: if height < 1 { 1 } else { height },
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        self.height
    }

    /// The four corners, clockwise from the origin.
    #[must_use]
    pub const fn corners(self) -> [DevicePoint; 4] {
        [
            DevicePoint::new(0, 0),
            DevicePoint::new(self.width, 0),
            DevicePoint::new(self.width, self.height),
            DevicePoint::new(0, self.height),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_rect_spans_all_points() {
        let r = ModelRect::enclosing(&[
            ModelPoint::new(5, -2),
            ModelPoint::new(-1, 7),
            ModelPoint::new(3, 3),
        ]);
        assert_eq!(
            r,
            ModelRect {
                min_x: -1,
                min_y: -2,
                max_x: 5,
                max_y: 7
            }
        );
        assert_eq!(r.height(), 9);
    }

    #[test]
    #[should_panic(expected = "enclosing rect of no points")]
    fn enclosing_empty_panics() {
        let _ = ModelRect::enclosing(&[]);
    }

    #[test]
    fn device_rect_normalizes_corners() {
        let r = DeviceRect::from_corners(DevicePoint::new(10, 2), DevicePoint::new(4, 8));
        assert_eq!((r.left, r.top, r.right, r.bottom), (4, 2, 10, 8));
        assert_eq!((r.width(), r.height()), (6, 6));
    }

    #[test]
    fn screen_size_clamps_to_one() {
        let s = ScreenSize::new(0, -5);
        assert_eq!((s.width(), s.height()), (1, 1));
    }

    #[test]
    fn contains_rect_is_inclusive() {
        let outer = ModelRect {
            min_x: 0,
            min_y: 0,
            max_x: 10,
            max_y: 10,
        };
        assert!(outer.contains_rect(&outer));
        let wider = ModelRect {
            max_x: 11,
            ..outer
        };
        assert!(!outer.contains_rect(&wider));
    }
}
