// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and export tools for zoomview diagnostics.
//!
//! This crate provides [`TraceSink`](zoomview_core::trace::TraceSink)
//! implementations, test doubles, and exporters for development and
//! post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded bytes as a JSON event array.
//! - [`screen::RecordingScreen`] / [`screen::RecordingModel`]: collaborators
//!   that log every draw call and callback, with [`screen::record_frame`] to
//!   capture a whole frame.
//! - [`svg::frame_to_svg`]: an SVG snapshot of recorded draw calls.
//! - [`config::load_config`]: JSON view configuration loading.

pub mod config;
pub mod json;
pub mod pretty;
pub mod recorder;
pub mod screen;
pub mod svg;
