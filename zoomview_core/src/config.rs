// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View configuration and screen orientation.
//!
//! [`ViewConfig`] carries every tunable the viewport and renderer consume.
//! It is a plain `Copy` value: hosts build one, hand it to
//! [`RecursiveRenderer::new`](crate::render::RecursiveRenderer::new), and
//! pass a replacement to
//! [`on_config_changed`](crate::render::RecursiveRenderer::on_config_changed)
//! when settings change. Every change triggers a full viewport recompute.

use core::fmt;
use core::str::FromStr;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from configuration parsing and validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A raw orientation code outside `0..=3`.
    UnknownOrientation(u8),
    /// An orientation name other than `LR`, `RL`, `TB`, or `BT`.
    UnknownOrientationName(String),
    /// A field that must be strictly positive was zero or negative.
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// A field outside its permitted range.
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOrientation(code) => write!(f, "unknown orientation code {code}"),
            Self::UnknownOrientationName(name) => write!(f, "unknown orientation {name:?}"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            Self::OutOfRange { field, value } => write!(f, "{field} out of range (got {value})"),
        }
    }
}

impl core::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Which way the zoom axis runs across the screen.
///
/// Model X (zoom depth) grows *against* the named direction: in
/// [`LeftToRight`](Self::LeftToRight) the crosshair sits right of centre and
/// new nodes flow in from the right edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Model X maps to screen X, mirrored; model Y maps to screen Y.
    #[default]
    LeftToRight,
    /// Model X maps to screen X; model Y maps to screen Y.
    RightToLeft,
    /// Model X maps to screen Y, mirrored; model Y maps to screen X.
    TopToBottom,
    /// Model X maps to screen Y; model Y maps to screen X.
    BottomToTop,
}

impl Orientation {
    /// All four orientations, in code order.
    pub const ALL: [Self; 4] = [
        Self::LeftToRight,
        Self::RightToLeft,
        Self::TopToBottom,
        Self::BottomToTop,
    ];

    /// Returns `true` if model X runs along the screen's horizontal axis.
    #[inline]
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// Returns the raw code of this orientation.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::LeftToRight => 0,
            Self::RightToLeft => 1,
            Self::TopToBottom => 2,
            Self::BottomToTop => 3,
        }
    }

    /// Returns the two-letter name used by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
        }
    }
}

impl TryFrom<u8> for Orientation {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::LeftToRight),
            1 => Ok(Self::RightToLeft),
            2 => Ok(Self::TopToBottom),
            3 => Ok(Self::BottomToTop),
            other => Err(ConfigError::UnknownOrientation(other)),
        }
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownOrientationName(s.to_owned()))
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ViewConfig
// ---------------------------------------------------------------------------

/// Tunables for the viewport and renderer.
///
/// All lengths are in model units unless noted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ViewConfig {
    /// Model height of the world (and width of the non-margin X range).
    pub max_y: i64,
    /// Denominator for node bounds; a node's children share `[0, normalization)`.
    pub normalization: u32,
    /// Extra model X shown beyond zero, left of the crosshair in `LR`.
    pub margin: i64,
    /// Strength of the logarithmic X compression.
    pub non_linearity: i64,
    /// Crosshair model X (and the selection width default).
    pub origin_x: i64,
    /// Crosshair model Y.
    pub origin_y: i64,
    /// A node must be taller than this to be selected under the crosshair.
    pub min_selection_width: i64,
    /// Spans at or below this height are too small to read.
    pub min_node_size_text: i64,
    /// Base font size; labels use 11, 14, or 20 times this.
    pub font_size: u32,
    /// Whether outline-flagged nodes get a 1px border.
    pub outline: bool,
    /// Whether the crosshair is drawn in colour (index 5) or the default.
    pub colour_mode: bool,
    /// Crosshair line width in pixels.
    pub line_width: u32,
    /// Compression factor outside the central 90% of the Y axis; 1 disables.
    pub y_compression: i64,
    /// Whether the renderer consults its fast-path cache.
    pub fast_path: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewConfig {
    /// Returns the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_y: 4096,
            normalization: 1 << 16,
            margin: 400,
            non_linearity: 8,
            origin_x: 2048,
            origin_y: 2048,
            min_selection_width: 2048,
            min_node_size_text: 40,
            font_size: 1,
            outline: true,
            colour_mode: true,
            line_width: 1,
            y_compression: 4,
            fast_path: true,
        }
    }

    /// Sets the world height and recentres the crosshair on it.
    #[must_use]
    pub const fn with_max_y(mut self, max_y: i64) -> Self {
        self.max_y = max_y;
        self.origin_x = max_y / 2;
        self.origin_y = max_y / 2;
        self.min_selection_width = max_y / 2;
        self
    }

    /// Sets the bound normalization constant.
    #[must_use]
    pub const fn with_normalization(mut self, normalization: u32) -> Self {
        self.normalization = normalization;
        self
    }

    /// Sets the screen margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: i64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the non-linearity coefficient.
    #[must_use]
    pub const fn with_non_linearity(mut self, non_linearity: i64) -> Self {
        self.non_linearity = non_linearity;
        self
    }

    /// Sets the minimum readable span height.
    #[must_use]
    pub const fn with_min_node_size_text(mut self, min: i64) -> Self {
        self.min_node_size_text = min;
        self
    }

    /// Sets the Y edge compression factor.
    #[must_use]
    pub const fn with_y_compression(mut self, factor: i64) -> Self {
        self.y_compression = factor;
        self
    }

    /// Enables or disables the fast-path cache.
    #[must_use]
    pub const fn with_fast_path(mut self, enabled: bool) -> Self {
        self.fast_path = enabled;
        self
    }

    /// Model units spanned by the world on the X axis after unwarping.
    ///
    /// Visible X coordinates are clamped to `±world_extent()`.
    #[inline]
    #[must_use]
    pub const fn world_extent(&self) -> i64 {
        self.max_y.saturating_mul(self.normalization as i64)
    }

    /// Largest `max_y`, `margin`, or `|origin_x|` accepted by
    /// [`validate`](Self::validate), leaving headroom for the fixed-point
    /// mapping arithmetic.
    pub const MAX_COORDINATE: i64 = 1 << 48;

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("max_y", self.max_y)?;
        positive("normalization", i64::from(self.normalization))?;
        positive("font_size", i64::from(self.font_size))?;
        positive("y_compression", self.y_compression)?;
        for (field, value) in [
            ("max_y", self.max_y),
            ("margin", self.margin),
            ("origin_x", self.origin_x.saturating_abs()),
        ] {
            if value > Self::MAX_COORDINATE {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if self.margin < 0 {
            return Err(ConfigError::OutOfRange {
                field: "margin",
                value: self.margin,
            });
        }
        if self.non_linearity < 0 {
            return Err(ConfigError::OutOfRange {
                field: "non_linearity",
                value: self.non_linearity,
            });
        }
        if self.min_node_size_text < 0 {
            return Err(ConfigError::OutOfRange {
                field: "min_node_size_text",
                value: self.min_node_size_text,
            });
        }
        if !(0..=self.max_y).contains(&self.origin_y) {
            return Err(ConfigError::OutOfRange {
                field: "origin_y",
                value: self.origin_y,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_codes_round_trip() {
        for o in Orientation::ALL {
            assert_eq!(Orientation::try_from(o.code()), Ok(o));
            assert_eq!(o.name().parse::<Orientation>(), Ok(o));
        }
    }

    #[test]
    fn unknown_orientation_is_an_error() {
        assert_eq!(
            Orientation::try_from(4),
            Err(ConfigError::UnknownOrientation(4))
        );
        assert!(matches!(
            "diagonal".parse::<Orientation>(),
            Err(ConfigError::UnknownOrientationName(_))
        ));
    }

    #[test]
    fn orientation_names_are_case_insensitive() {
        assert_eq!("tb".parse::<Orientation>(), Ok(Orientation::TopToBottom));
        assert_eq!(" bt ".parse::<Orientation>(), Ok(Orientation::BottomToTop));
    }

    #[test]
    fn defaults_validate() {
        assert_eq!(ViewConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_normalization_rejected() {
        let config = ViewConfig::new().with_normalization(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "normalization",
                value: 0
            })
        );
    }

    #[test]
    fn negative_margin_rejected() {
        let config = ViewConfig::new().with_margin(-1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "margin", .. })
        ));
    }

    #[test]
    fn oversized_coordinates_rejected() {
        let config = ViewConfig::new().with_max_y(1_000_000_000_000_000_000);
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "max_y",
                value: 1_000_000_000_000_000_000
            })
        );
        let config = ViewConfig::new().with_margin(ViewConfig::MAX_COORDINATE + 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "margin", .. })
        ));
        let mut config = ViewConfig::new();
        config.origin_x = i64::MIN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { field: "origin_x", .. })
        ));
        let config = ViewConfig::new()
            .with_max_y(ViewConfig::MAX_COORDINATE)
            .with_margin(ViewConfig::MAX_COORDINATE);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn with_max_y_recentres_crosshair() {
        let config = ViewConfig::new().with_max_y(1000);
        assert_eq!(config.origin_x, 500);
        assert_eq!(config.origin_y, 500);
        assert_eq!(config.min_selection_width, 500);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ConfigError::UnknownOrientation(9).to_string(),
            "unknown orientation code 9"
        );
        assert_eq!(
            ConfigError::NonPositive {
                field: "max_y",
                value: -3
            }
            .to_string(),
            "max_y must be positive (got -3)"
        );
    }
}
