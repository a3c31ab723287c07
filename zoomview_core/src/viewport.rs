// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived viewport geometry.
//!
//! [`ViewportState`] owns the [`CoordinateMapper`] for the current screen,
//! the crosshair segments, and a lazily computed visible region. It is
//! rebuilt wholesale by [`recompute`](ViewportState::recompute) whenever the
//! screen or configuration changes; there is no incremental update path.

use core::cell::Cell;

use crate::config::{Orientation, ViewConfig};
use crate::geometry::{DevicePoint, ModelPoint, ModelRect, ScreenSize};
use crate::mapping::CoordinateMapper;

/// The two crosshair segments in device space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crosshair {
    /// Vertical bar at the crosshair X, spanning the visible span axis.
    pub vertical: [DevicePoint; 2],
    /// Horizontal bar at mid-height, from 12/14 to 17/14 of the crosshair X.
    pub horizontal: [DevicePoint; 2],
}

/// Cached viewport geometry for one screen size, orientation, and config.
#[derive(Debug)]
pub struct ViewportState {
    mapper: CoordinateMapper,
    world_extent: i64,
    visible: Cell<Option<ModelRect>>,
    crosshair: Crosshair,
    epoch: u64,
}

impl ViewportState {
    /// Builds viewport state from scratch.
    #[must_use]
    pub fn new(screen: ScreenSize, orientation: Orientation, config: &ViewConfig) -> Self {
        let mut state = Self {
            mapper: CoordinateMapper::new(screen, orientation, config),
            world_extent: config.world_extent(),
            visible: Cell::new(None),
            crosshair: Crosshair::default(),
            epoch: 0,
        };
        state.crosshair = state.compute_crosshair(config);
        state
    }

    /// Rebuilds every derived value for a new screen, orientation, or config.
    ///
    /// The visible region cache is dropped and the epoch advances, so any
    /// state keyed on the old geometry can tell it is stale.
    pub fn recompute(&mut self, screen: ScreenSize, orientation: Orientation, config: &ViewConfig) {
        let epoch = self.epoch + 1;
        *self = Self::new(screen, orientation, config);
        self.epoch = epoch;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            width = screen.width(),
            height = screen.height(),
            orientation = %orientation,
            scale_x = self.mapper.scale_x(),
            scale_y = self.mapper.scale_y(),
            epoch,
            "viewport recomputed"
        );
    }

    /// Drops the cached visible region so the next query recomputes it.
    pub fn invalidate(&self) {
        self.visible.set(None);
    }

    /// Number of recomputes since construction.
    #[inline]
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The coordinate mapper for this viewport.
    #[inline]
    #[must_use]
    pub const fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Current screen size.
    #[inline]
    #[must_use]
    pub const fn screen(&self) -> ScreenSize {
        self.mapper.screen()
    }

    /// Current orientation.
    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.mapper.orientation()
    }

    /// Crosshair segments in device space.
    #[inline]
    #[must_use]
    pub const fn crosshair(&self) -> &Crosshair {
        &self.crosshair
    }

    /// Returns `true` if the visible region is currently cached.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.visible.get().is_some()
    }

    /// Model-space rectangle covered by the screen.
    ///
    /// Computed on first use by unmapping the four screen corners and taking
    /// their enclosing rectangle, with X clamped to the world extent.
    #[must_use]
    pub fn visible_region(&self) -> ModelRect {
        if let Some(rect) = self.visible.get() {
            return rect;
        }
        let corners = self
            .screen()
            .corners()
            .map(|c| self.mapper.device_to_model(c));
        let mut rect = ModelRect::enclosing(&corners);
        rect.min_x = rect.min_x.max(-self.world_extent);
        rect.max_x = rect.max_x.min(self.world_extent);
        self.visible.set(Some(rect));
        rect
    }

    /// Returns `true` if a node spanning `[y1, y2]` covers the whole screen.
    ///
    /// The node's model rectangle is `x ∈ [0, y2 − y1]`, `y ∈ [y1, y2]`. It
    /// fills the screen when it covers the visible span axis and reaches the
    /// visible region's far X edge. The margin strip at negative X is never
    /// covered by any node and is ignored.
    #[must_use]
    pub fn node_fills_screen(&self, y1: i64, y2: i64) -> bool {
        let vis = self.visible_region();
        y1 <= vis.min_y && y2 >= vis.max_y && y2.saturating_sub(y1) >= vis.max_x
    }

    /// Maps a model point to pixels.
    #[inline]
    #[must_use]
    pub fn model_to_device(&self, p: ModelPoint) -> DevicePoint {
        self.mapper.model_to_device(p)
    }

    /// Maps a pixel to model space.
    #[inline]
    #[must_use]
    pub fn device_to_model(&self, p: DevicePoint) -> ModelPoint {
        self.mapper.device_to_model(p)
    }

    fn compute_crosshair(&self, config: &ViewConfig) -> Crosshair {
        let vis = self.visible_region();
        let ox = config.origin_x;
        let mid = config.max_y / 2;
        Crosshair {
            vertical: [
                self.model_to_device(ModelPoint::new(ox, vis.min_y)),
                self.model_to_device(ModelPoint::new(ox, vis.max_y)),
            ],
            horizontal: [
                self.model_to_device(ModelPoint::new(12 * ox / 14, mid)),
                self.model_to_device(ModelPoint::new(17 * ox / 14, mid)),
            ],
        }
    }
}
