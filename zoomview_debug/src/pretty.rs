// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Per-node
//! events (draws, collapses, tail loops) are only written in verbose mode;
//! a typical frame produces hundreds of them.

use std::io::Write;

use zoomview_core::trace::{
    CollapseEvent, FrameBeginEvent, FrameStats, NodeDrawnEvent, OutputEvent, TailLoopEvent,
    TailReason, TraceSink, ViewportEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            verbose: false,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also writes per-node events.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn reason_name(reason: TailReason) -> &'static str {
    match reason {
        TailReason::FastPath => "fast-path",
        TailReason::CoveringChild => "covering",
        TailReason::DominantChild => "dominant",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] #{} root={:?} span=[{}, {}] epoch={}",
            e.frame_index, e.root, e.y1, e.y2, e.viewport_epoch,
        );
    }

    fn on_node_drawn(&mut self, e: &NodeDrawnEvent) {
        if !self.verbose {
            return;
        }
        let r = e.rect;
        let _ = writeln!(
            self.writer,
            "[draw] frame={} {:?} ({}, {})..({}, {}) depth={}",
            e.frame_index, e.node, r.left, r.top, r.right, r.bottom, e.depth,
        );
    }

    fn on_collapse(&mut self, e: &CollapseEvent) {
        if !self.verbose {
            return;
        }
        let _ = writeln!(self.writer, "[collapse] frame={} {:?}", e.frame_index, e.node);
    }

    fn on_output(&mut self, e: &OutputEvent) {
        let _ = writeln!(self.writer, "[output] frame={} {:?}", e.frame_index, e.node);
    }

    fn on_tail_loop(&mut self, e: &TailLoopEvent) {
        if !self.verbose {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[tail] frame={} {:?} -> {:?} ({})",
            e.frame_index,
            e.from,
            e.to,
            reason_name(e.reason),
        );
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        let _ = writeln!(
            self.writer,
            "[viewport] epoch={} {}x{} {}",
            e.epoch, e.width, e.height, e.orientation,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameStats) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} rects={} labels={} collapsed={} terminal={} \
             collapsible={} tail={} fast={} depth={}",
            s.frame_index,
            s.rects,
            s.labels,
            s.collapsed,
            s.terminals,
            s.collapsibles,
            s.tail_loops,
            s.fast_path_hits,
            s.max_depth,
        );
    }
}
