// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional mapping between model space and device space.
//!
//! A model point goes through three stages on its way to the screen:
//!
//! ```text
//!   model (x, y)
//!       │  XWarp::apply        piecewise linear / logarithmic zoom axis
//!       │  YCompression::apply squeeze the outer 5% bands of the span axis
//!       ▼
//!   warped (x', y')
//!       │  affine, selected by Orientation
//!       ▼
//!   device (px, py)
//! ```
//!
//! [`CoordinateMapper::device_to_model`] runs the same stages backwards. The
//! affine stage is integer fixed-point with a scale of [`SCALE`]; the only
//! floating-point work is in the warp and in deriving the scale factors,
//! both recomputed from scratch whenever the viewport changes.

use crate::config::{Orientation, ViewConfig};
use crate::geometry::{DevicePoint, ModelPoint, ScreenSize};

/// Fixed-point denominator for the affine scale factors.
pub const SCALE: i64 = 100_000_000;

/// Fraction of `max_y` below which the X warp is linear.
const LOG_LINEAR_BOUNDARY: f64 = 0.5;

/// Default linear-scale factor before aspect compensation.
const BASE_LINEAR_SCALE: f64 = 0.9;

/// The X ratio is never inflated by more than `1 / MIN_ASPECT_MUL`.
const MIN_ASPECT_MUL: f64 = 0.8;

// ---------------------------------------------------------------------------
// XWarp
// ---------------------------------------------------------------------------

/// Piecewise linear/logarithmic warp of the zoom axis.
///
/// With `xn = x / max_y`, `b` the boundary, `c` the linear scale and `a` the
/// logarithmic scale:
///
/// - `xn < b`: `c · xn`
/// - `xn ≥ b`: `c · (a · ln((xn + a − b) / a) + b)`
///
/// Both branches evaluate to `c · b` at the boundary, so the warp is
/// continuous and monotonically increasing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XWarp {
    boundary: f64,
    linear_scale: f64,
    log_scale: f64,
    max_y: i64,
    extent: i64,
}

impl XWarp {
    /// Creates a warp for the given non-linearity coefficient and linear
    /// scale. `extent` bounds the magnitude of unwarped results.
    #[must_use]
    pub fn new(non_linearity: i64, linear_scale: f64, max_y: i64, extent: i64) -> Self {
        Self {
            boundary: LOG_LINEAR_BOUNDARY,
            linear_scale,
            log_scale: (non_linearity as f64 / -3.0).exp(),
            max_y,
            extent,
        }
    }

    /// The log/linear boundary as a fraction of `max_y`.
    #[inline]
    #[must_use]
    pub const fn boundary(&self) -> f64 {
        self.boundary
    }

    /// Multiplier applied in the linear regime.
    #[inline]
    #[must_use]
    pub const fn linear_scale(&self) -> f64 {
        self.linear_scale
    }

    /// Coefficient of the logarithmic regime.
    #[inline]
    #[must_use]
    pub const fn log_scale(&self) -> f64 {
        self.log_scale
    }

    /// Warps a normalized coordinate (`x / max_y`).
    #[must_use]
    pub fn warp_normalized(&self, xn: f64) -> f64 {
        let (a, b, c) = (self.log_scale, self.boundary, self.linear_scale);
        if xn < b {
            c * xn
        } else {
            c * (a * ((xn + a - b) / a).ln() + b)
        }
    }

    /// Inverse of [`warp_normalized`](Self::warp_normalized).
    #[must_use]
    pub fn unwarp_normalized(&self, xn: f64) -> f64 {
        let (a, b, c) = (self.log_scale, self.boundary, self.linear_scale);
        if xn < b * c {
            xn / c
        } else {
            b - a + a * ((xn / c - b) / a).exp()
        }
    }

    /// Warps a model X coordinate.
    #[must_use]
    pub fn apply(&self, x: i64) -> i64 {
        let max_y = self.max_y as f64;
        to_i64(self.warp_normalized(x as f64 / max_y) * max_y)
    }

    /// Unwarps a warped X coordinate, clamping to `±extent`.
    #[must_use]
    pub fn unapply(&self, x: i64) -> i64 {
        let max_y = self.max_y as f64;
        let extent = self.extent as f64;
        let raw = self.unwarp_normalized(x as f64 / max_y) * max_y;
        to_i64(raw.clamp(-extent, extent))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "float-to-int `as` saturates, and inputs are already rounded"
)]
fn to_i64(v: f64) -> i64 {
    v.round() as i64
}

// ---------------------------------------------------------------------------
// YCompression
// ---------------------------------------------------------------------------

/// Linear squeeze of the span axis outside `[5%, 95%]` of `max_y`.
///
/// Integer-exact: `apply(unapply(y)) == y` wherever `unapply` does not
/// saturate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YCompression {
    factor: i64,
    upper: i64,
    lower: i64,
}

impl YCompression {
    /// Creates a compression with the given factor (1 disables it).
    #[must_use]
    pub const fn new(max_y: i64, factor: i64) -> Self {
        Self {
            factor: if factor < 1 { 1 } else { factor },
            upper: max_y * 95 / 100,
            lower: max_y * 5 / 100,
        }
    }

    /// Model Y to compressed Y.
    #[must_use]
    pub const fn apply(&self, y: i64) -> i64 {
        if y > self.upper {
            self.upper + (y - self.upper) / self.factor
        } else if y < self.lower {
            self.lower + y.saturating_sub(self.lower) / self.factor
        } else {
            y
        }
    }

    /// Compressed Y back to model Y.
    #[must_use]
    pub const fn unapply(&self, y: i64) -> i64 {
        if y > self.upper {
            self.upper
                .saturating_add((y - self.upper).saturating_mul(self.factor))
        } else if y < self.lower {
            self.lower
                .saturating_add(y.saturating_sub(self.lower).saturating_mul(self.factor))
        } else {
            y
        }
    }
}

// ---------------------------------------------------------------------------
// CoordinateMapper
// ---------------------------------------------------------------------------

/// Model ↔ device transform for one screen size, orientation, and config.
///
/// Immutable once built; a resize or config change builds a new one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    orientation: Orientation,
    screen: ScreenSize,
    max_y: i64,
    center_x: i64,
    scale_x: i64,
    scale_y: i64,
    warp: XWarp,
    y_compression: YCompression,
}

impl CoordinateMapper {
    /// Derives scale factors and warp parameters.
    ///
    /// Raw pixels-per-unit are computed for each axis. When X is the more
    /// compressed axis, its ratio is inflated toward Y's by at most 25% and
    /// the linear warp scale shrinks by the same multiplier. Otherwise the
    /// linear warp scale relaxes from 0.9 toward 1.0. The span axis never
    /// gets fewer than a quarter of the zoom axis' pixels per unit.
    #[must_use]
    pub fn new(screen: ScreenSize, orientation: Orientation, config: &ViewConfig) -> Self {
        let max_y = config.max_y;
        let min_x = -config.margin;
        let max_x = max_y;
        let center_x = (min_x + max_x) / 2;

        let (w, h) = (f64::from(screen.width()), f64::from(screen.height()));
        let x_span = (max_x - min_x) as f64;
        let y_span = max_y as f64;
        let (mut sfx, sfy) = if orientation.is_horizontal() {
            (w / x_span, h / y_span)
        } else {
            (h / x_span, w / y_span)
        };

        let scale = SCALE as f64;
        let (linear_scale, kx, ky) = if sfx < sfy {
            let mul = (sfx / sfy).max(MIN_ASPECT_MUL);
            sfx /= mul;
            (
                BASE_LINEAR_SCALE * mul,
                sfx * scale,
                sfx.max(sfy / 4.0) * scale,
            )
        } else {
            (
                (BASE_LINEAR_SCALE * sfx / sfy).min(1.0),
                sfy.max(sfx / 4.0) * scale,
                sfy * scale,
            )
        };

        #[expect(
            clippy::cast_possible_truncation,
            reason = "scale factors are small positive fixed-point values"
        )]
        let (scale_x, scale_y) = ((kx as i64).max(1), (ky as i64).max(1));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation toward zero matches the integer centre"
        )]
        let center_x = (center_x as f64 * linear_scale) as i64;

        Self {
            orientation,
            screen,
            max_y,
            center_x,
            scale_x,
            scale_y,
            warp: XWarp::new(
                config.non_linearity,
                linear_scale,
                max_y,
                config.world_extent(),
            ),
            y_compression: YCompression::new(max_y, config.y_compression),
        }
    }

    /// Current orientation.
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Screen size this mapper was built for.
    #[inline]
    #[must_use]
    pub const fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Fixed-point pixels-per-unit along the zoom axis.
    #[inline]
    #[must_use]
    pub const fn scale_x(&self) -> i64 {
        self.scale_x
    }

    /// Fixed-point pixels-per-unit along the span axis.
    #[inline]
    #[must_use]
    pub const fn scale_y(&self) -> i64 {
        self.scale_y
    }

    /// Warped X that lands on the screen centre.
    #[inline]
    #[must_use]
    pub const fn center_x(&self) -> i64 {
        self.center_x
    }

    /// The zoom-axis warp.
    #[inline]
    #[must_use]
    pub const fn warp(&self) -> &XWarp {
        &self.warp
    }

    /// Maps a model point to pixels.
    #[must_use]
    pub fn model_to_device(&self, p: ModelPoint) -> DevicePoint {
        let x = i128::from(self.warp.apply(p.x));
        let y = i128::from(self.y_compression.apply(p.y));
        let s = i128::from(SCALE);
        let along = (x - i128::from(self.center_x)) * i128::from(self.scale_x) / s;
        let across = (y - i128::from(self.max_y / 2)) * i128::from(self.scale_y) / s;
        let half_w = i128::from(self.screen.width() / 2);
        let half_h = i128::from(self.screen.height() / 2);

        let (dx, dy) = match self.orientation {
            Orientation::LeftToRight => (half_w - along, half_h + across),
            Orientation::RightToLeft => (half_w + along, half_h + across),
            Orientation::TopToBottom => (half_w + across, half_h - along),
            Orientation::BottomToTop => (half_w + across, half_h + along),
        };
        DevicePoint::new(saturate_i32(dx), saturate_i32(dy))
    }

    /// Maps a pixel back to model space.
    #[must_use]
    pub fn device_to_model(&self, p: DevicePoint) -> ModelPoint {
        let (dx, dy) = (i128::from(p.x), i128::from(p.y));
        let half_w = i128::from(self.screen.width() / 2);
        let half_h = i128::from(self.screen.height() / 2);

        let (along, across) = match self.orientation {
            Orientation::LeftToRight => (half_w - dx, dy - half_h),
            Orientation::RightToLeft => (dx - half_w, dy - half_h),
            Orientation::TopToBottom => (half_h - dy, dx - half_w),
            Orientation::BottomToTop => (dy - half_h, dx - half_w),
        };
        let s = i128::from(SCALE);
        let x = i128::from(self.center_x) + along * s / i128::from(self.scale_x);
        let y = i128::from(self.max_y / 2) + across * s / i128::from(self.scale_y);

        ModelPoint::new(
            self.warp.unapply(saturate_i64(x)),
            self.y_compression.unapply(saturate_i64(y)),
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to the i32 range first"
)]
fn saturate_i32(v: i128) -> i32 {
    v.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to the i64 range first"
)]
fn saturate_i64(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(w: i32, h: i32, o: Orientation) -> CoordinateMapper {
        CoordinateMapper::new(ScreenSize::new(w, h), o, &ViewConfig::default())
    }

    #[test]
    fn warp_is_continuous_at_boundary() {
        let warp = XWarp::new(8, 0.9, 4096, 4096 << 16);
        let b = warp.boundary();
        let below = warp.warp_normalized(b - 1e-12);
        let at = warp.warp_normalized(b);
        assert!((below - at).abs() < 1e-9, "{below} vs {at}");
        assert!((at - 0.9 * b).abs() < 1e-12, "boundary maps to c·b");
    }

    #[test]
    fn warp_inverse_in_both_regimes() {
        let warp = XWarp::new(8, 0.9, 4096, 4096 << 16);
        for xn in [-0.1, 0.0, 0.1, 0.49, 0.5, 0.75, 2.0, 40.0] {
            let back = warp.unwarp_normalized(warp.warp_normalized(xn));
            assert!((back - xn).abs() < 1e-9, "xn={xn} back={back}");
        }
    }

    #[test]
    fn unapply_clamps_to_world_extent() {
        let warp = XWarp::new(8, 0.9, 4096, 1_000_000);
        assert_eq!(warp.unapply(i64::MAX / 2), 1_000_000);
        assert_eq!(warp.unapply(-(i64::MAX / 2)), -1_000_000);
    }

    #[test]
    fn y_compression_only_touches_outer_bands() {
        let yc = YCompression::new(4096, 4);
        assert_eq!(yc.apply(2048), 2048);
        assert_eq!(yc.apply(3891 + 400), 3891 + 100);
        assert_eq!(yc.apply(204 - 400), 204 - 100);
        for y in [-10_000, -1, 0, 204, 205, 3891, 3892, 50_000] {
            assert_eq!(yc.apply(yc.unapply(y)), y, "y={y}");
        }
    }

    #[test]
    fn y_compression_saturates_at_the_extremes() {
        let yc = YCompression::new(4096, 64);
        assert_eq!(yc.unapply(i64::MAX - 1), i64::MAX);
        assert!(yc.unapply(i64::MIN) < i64::MIN / 2);
        assert!(yc.apply(i64::MIN) < 0);
        assert!(yc.apply(i64::MAX) > 4096);
    }

    #[test]
    fn y_compression_factor_one_is_identity() {
        let yc = YCompression::new(4096, 1);
        for y in [-500, 0, 100, 4000, 9000] {
            assert_eq!(yc.apply(y), y);
            assert_eq!(yc.unapply(y), y);
        }
    }

    #[test]
    fn left_to_right_puts_depth_on_the_left() {
        let m = mapper(800, 600, Orientation::LeftToRight);
        let near = m.model_to_device(ModelPoint::new(0, 2048));
        let far = m.model_to_device(ModelPoint::new(4096, 2048));
        assert!(far.x < near.x, "deeper X is further left");
        assert_eq!(near.y, far.y);
        assert_eq!(near.y, 300);
    }

    #[test]
    fn right_to_left_mirrors_left_to_right() {
        let lr = mapper(800, 600, Orientation::LeftToRight);
        let rl = mapper(800, 600, Orientation::RightToLeft);
        let p = ModelPoint::new(1000, 1500);
        let a = lr.model_to_device(p);
        let b = rl.model_to_device(p);
        assert_eq!(a.y, b.y);
        assert_eq!(a.x - 400, 400 - b.x);
    }

    #[test]
    fn vertical_orientations_swap_axes() {
        let tb = mapper(600, 800, Orientation::TopToBottom);
        let a = tb.model_to_device(ModelPoint::new(0, 1000));
        let b = tb.model_to_device(ModelPoint::new(0, 3000));
        assert!(b.x > a.x, "span axis runs along screen x");
        assert_eq!(a.y, b.y);
        let deep = tb.model_to_device(ModelPoint::new(4000, 1000));
        assert!(deep.y < a.y, "depth runs up the screen");
        assert_eq!(deep.x, a.x);
    }

    #[test]
    fn compressed_x_inflates_scale() {
        // Tall narrow screen: X is the compressed axis.
        let m = mapper(200, 2000, Orientation::LeftToRight);
        assert!(m.warp().linear_scale() < BASE_LINEAR_SCALE);
        assert!(m.warp().linear_scale() >= BASE_LINEAR_SCALE * MIN_ASPECT_MUL);
        // Wide screen: linear scale relaxes toward 1.
        let m = mapper(4000, 500, Orientation::LeftToRight);
        assert!(m.warp().linear_scale() <= 1.0);
        assert!(m.warp().linear_scale() >= BASE_LINEAR_SCALE);
    }

    #[test]
    fn device_round_trip_within_a_pixel() {
        for o in Orientation::ALL {
            let m = mapper(640, 480, o);
            for (x, y) in [(0, 0), (640, 480), (320, 240), (17, 401), (600, 3)] {
                let d = DevicePoint::new(x, y);
                let back = m.model_to_device(m.device_to_model(d));
                assert!(
                    (back.x - x).abs() <= 1 && (back.y - y).abs() <= 1,
                    "{o:?}: {d:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn huge_model_values_saturate() {
        let m = mapper(640, 480, Orientation::LeftToRight);
        let p = m.model_to_device(ModelPoint::new(0, i64::MAX / 4));
        assert_eq!(p.y, i32::MAX);
    }
}
