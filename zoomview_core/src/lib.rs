// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooming renderer for prediction trees.
//!
//! `zoomview_core` draws a tree of nested probability intervals as boxes
//! on a 2D screen. Each node owns a slice of its parent's span; the user
//! zooms towards a crosshair, and whichever node ends up under it becomes
//! the committed output. The crate owns the model-to-screen mapping, the
//! per-frame tree walk, and the callbacks that let a prediction model grow
//! and prune the tree around what is visible.
//!
//! # Architecture
//!
//! ```text
//!   ViewConfig + ScreenSize + Orientation
//!       │
//!       ▼
//!   CoordinateMapper ──► ViewportState (visible region, crosshair)
//!                               │
//!                 ┌─────────────┘
//!                 ▼
//!   NodeStore ──► RecursiveRenderer::render_frame() ──► Screen
//!                               │
//!                 ┌─────────────┼───────────────┐
//!                 ▼             ▼               ▼
//!         TreeModel     ExpansionPolicy      TraceSink
//!     (collapse/output)  (terminal/collapsible)
//! ```
//!
//! **[`tree`]**: Struct-of-arrays node store with generational handles.
//! Bounds, colour, label, and flags per node; ordered sibling lists.
//!
//! **[`mapping`]**: The bidirectional model/device transform, including the
//! logarithmic X warp, optional Y edge compression, and the four screen
//! orientations.
//!
//! **[`viewport`]**: Geometry derived from the mapper (visible model region,
//! crosshair segments, "fills the screen" test), rebuilt wholesale on any
//! screen or configuration change.
//!
//! **[`render`]**: [`RecursiveRenderer`](render::RecursiveRenderer), the
//! per-frame walk with its bounded recursion and fast-path cache.
//!
//! **[`policy`]**: The [`ExpansionPolicy`](policy::ExpansionPolicy) seam and
//! a budget-based implementation.
//!
//! **[`screen`]** / **[`model`]**: The drawing backend and prediction model
//! contracts.
//!
//! **[`font`]**: Font size tiers by on-screen extent.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! render-pass instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `tracing` (disabled by default): Emits `tracing` events on viewport
//!   rebuilds, configuration changes, and frame completion.
//! - `serde` (disabled by default): `Serialize`/`Deserialize` for
//!   [`ViewConfig`](config::ViewConfig) and
//!   [`Orientation`](config::Orientation).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod font;
pub mod geometry;
pub mod mapping;
pub mod model;
pub mod policy;
pub mod render;
pub mod screen;
pub mod trace;
pub mod tree;
pub mod viewport;
