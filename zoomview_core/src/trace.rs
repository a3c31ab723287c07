// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the render pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! renderer calls as it walks the tree. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::config::Orientation;
use crate::geometry::DeviceRect;
use crate::tree::NodeId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why the renderer continued its loop instead of recursing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TailReason {
    /// The cached child from last frame was still valid.
    FastPath,
    /// The last big child covered the rest of the screen.
    CoveringChild,
    /// Every child was too small; the largest one was followed.
    DominantChild,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once at the start of a render pass.
#[derive(Clone, Copy, Debug)]
pub struct FrameBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Root of the walk.
    pub root: NodeId,
    /// Root span start.
    pub y1: i64,
    /// Root span end.
    pub y2: i64,
    /// Viewport epoch the frame renders against.
    pub viewport_epoch: u64,
}

/// Emitted for every node rectangle that is actually drawn.
#[derive(Clone, Copy, Debug)]
pub struct NodeDrawnEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The node.
    pub node: NodeId,
    /// Its device rectangle.
    pub rect: DeviceRect,
    /// Native recursion depth at which it was drawn.
    pub depth: u32,
}

/// Emitted for each `Collapse` notification.
#[derive(Clone, Copy, Debug)]
pub struct CollapseEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The collapsed node.
    pub node: NodeId,
}

/// Emitted for each `Output` notification.
#[derive(Clone, Copy, Debug)]
pub struct OutputEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// The node now under the crosshair.
    pub node: NodeId,
}

/// Emitted when the render loop continues into a child without recursing.
#[derive(Clone, Copy, Debug)]
pub struct TailLoopEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Node being left.
    pub from: NodeId,
    /// Child being entered.
    pub to: NodeId,
    /// Which rule triggered the loop.
    pub reason: TailReason,
}

/// Emitted after the viewport is rebuilt.
#[derive(Clone, Copy, Debug)]
pub struct ViewportEvent {
    /// New viewport epoch.
    pub epoch: u64,
    /// Screen width.
    pub width: i32,
    /// Screen height.
    pub height: i32,
    /// Orientation.
    pub orientation: Orientation,
}

/// Per-frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame counter.
    pub frame_index: u64,
    /// Rectangles drawn.
    pub rects: u32,
    /// Labels drawn.
    pub labels: u32,
    /// `Collapse` notifications.
    pub collapsed: u32,
    /// Terminal nodes pushed to the expansion policy.
    pub terminals: u32,
    /// Collapsible nodes pushed to the expansion policy.
    pub collapsibles: u32,
    /// Loop continuations instead of recursive calls.
    pub tail_loops: u32,
    /// Tail loops taken straight from the fast-path cache.
    pub fast_path_hits: u32,
    /// Deepest native recursion reached (the root is depth 0).
    pub max_depth: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the renderer.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a render pass starts.
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        _ = e;
    }

    /// Called when a node rectangle is drawn.
    fn on_node_drawn(&mut self, e: &NodeDrawnEvent) {
        _ = e;
    }

    /// Called for each collapse notification.
    fn on_collapse(&mut self, e: &CollapseEvent) {
        _ = e;
    }

    /// Called for each output notification.
    fn on_output(&mut self, e: &OutputEvent) {
        _ = e;
    }

    /// Called when the loop continues into a child.
    fn on_tail_loop(&mut self, e: &TailLoopEvent) {
        _ = e;
    }

    /// Called after the viewport is rebuilt.
    fn on_viewport(&mut self, e: &ViewportEvent) {
        _ = e;
    }

    /// Called with the counters at the end of a pass.
    fn on_frame_summary(&mut self, s: &FrameStats) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameBeginEvent`].
    #[inline]
    pub fn frame_begin(&mut self, e: &FrameBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeDrawnEvent`].
    #[inline]
    pub fn node_drawn(&mut self, e: &NodeDrawnEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_drawn(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CollapseEvent`].
    #[inline]
    pub fn collapse(&mut self, e: &CollapseEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_collapse(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OutputEvent`].
    #[inline]
    pub fn output(&mut self, e: &OutputEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_output(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TailLoopEvent`].
    #[inline]
    pub fn tail_loop(&mut self, e: &TailLoopEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tail_loop(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewportEvent`].
    #[inline]
    pub fn viewport(&mut self, e: &ViewportEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_viewport(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits the end-of-frame [`FrameStats`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameStats) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}
