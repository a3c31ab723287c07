// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label size tiers.

/// Picks one of three label sizes from a node's zoom-axis extent.
///
/// Larger extents sit further from the crosshair edge in warped space and
/// are about to be selected, so they get the biggest tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSizeSelector {
    base: u32,
    max_y: i64,
}

impl FontSizeSelector {
    /// Multiplier for the largest tier.
    pub const LARGE: u32 = 20;
    /// Multiplier for the middle tier.
    pub const MEDIUM: u32 = 14;
    /// Multiplier for the smallest tier.
    pub const SMALL: u32 = 11;

    /// Creates a selector for the given base size and world height.
    #[must_use]
    pub const fn new(base: u32, max_y: i64) -> Self {
        Self { base, max_y }
    }

    /// Returns the font size for a node whose span is `extent` model units.
    #[must_use]
    pub fn select(&self, extent: i64) -> u32 {
        let weighted = extent.saturating_mul(i64::from(self.base));
        if weighted > self.max_y / 20 {
            self.base * Self::LARGE
        } else if weighted > self.max_y / 160 {
            self.base * Self::MEDIUM
        } else {
            self.base * Self::SMALL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_tiers() {
        let f = FontSizeSelector::new(1, 4096);
        assert_eq!(f.select(4096), 20);
        assert_eq!(f.select(205), 20);
        assert_eq!(f.select(204), 14);
        assert_eq!(f.select(26), 14);
        assert_eq!(f.select(25), 11);
        assert_eq!(f.select(0), 11);
    }

    #[test]
    fn base_scales_thresholds_and_sizes() {
        let f = FontSizeSelector::new(2, 4096);
        // 103 * 2 = 206 > 204.
        assert_eq!(f.select(103), 40);
        assert_eq!(f.select(102), 28);
    }

    #[test]
    fn huge_extent_does_not_overflow() {
        let f = FontSizeSelector::new(3, 4096);
        assert_eq!(f.select(i64::MAX), 60);
    }
}
