// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing backend contract.
//!
//! The renderer never touches pixels. It issues rectangles, labels, and
//! polylines in device coordinates through the [`Screen`] trait, which a
//! platform backend (or a test double) implements.
//!
//! Labels are the one call with a result: the backend lays out the text and
//! reports its right edge, which the renderer threads down to descendants so
//! deeper labels do not overlap a "shoving" ancestor's text. Backends that
//! paint text in a second pass after all rectangles can queue the label in
//! `draw_label` and still return the measured edge immediately.

use core::fmt;

use crate::geometry::{DevicePoint, DeviceRect};

/// An index into the host's colour scheme.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorIndex(pub u32);

impl fmt::Debug for ColorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorIndex({})", self.0)
    }
}

impl ColorIndex {
    /// Colour used for the crosshair in colour mode.
    pub const CROSSHAIR: Self = Self(5);
}

/// A text label request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label<'a> {
    /// Text to draw.
    pub text: &'a str,
    /// Rectangle of the node the label belongs to.
    pub rect: DeviceRect,
    /// Text must not start before this coordinate along the zoom axis.
    pub min_left: i32,
    /// Font size in backend units.
    pub font_size: u32,
}

/// A drawing surface.
pub trait Screen {
    /// Surface width in pixels.
    fn width(&self) -> i32;

    /// Surface height in pixels.
    fn height(&self) -> i32;

    /// Clears the surface before a frame.
    fn blank(&mut self) {}

    /// Fills a rectangle, optionally with an outline.
    ///
    /// `outline` of `None` means the backend's default outline colour.
    /// A `thickness` of zero draws no outline.
    fn draw_rect(
        &mut self,
        rect: DeviceRect,
        fill: Option<ColorIndex>,
        outline: Option<ColorIndex>,
        thickness: u32,
    );

    /// Draws a label and returns its right edge along the zoom axis.
    fn draw_label(&mut self, label: &Label<'_>) -> i32;

    /// Draws connected line segments.
    fn draw_polyline(&mut self, points: &[DevicePoint], width: u32, color: Option<ColorIndex>);
}
