// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use zoomview_core::config::Orientation;
use zoomview_core::geometry::DeviceRect;
use zoomview_core::trace::{
    CollapseEvent, FrameBeginEvent, FrameStats, NodeDrawnEvent, OutputEvent, TailLoopEvent,
    TailReason, TraceSink, ViewportEvent,
};
use zoomview_core::tree::NodeId;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_BEGIN: u8 = 1;
const TAG_NODE_DRAWN: u8 = 2;
const TAG_COLLAPSE: u8 = 3;
const TAG_OUTPUT: u8 = 4;
const TAG_TAIL_LOOP: u8 = 5;
const TAG_VIEWPORT: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_node(&mut self, id: NodeId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_rect(&mut self, r: DeviceRect) {
        self.write_i32(r.left);
        self.write_i32(r.top);
        self.write_i32(r.right);
        self.write_i32(r.bottom);
    }

    fn write_reason(&mut self, r: TailReason) {
        self.write_u8(match r {
            TailReason::FastPath => 0,
            TailReason::CoveringChild => 1,
            TailReason::DominantChild => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.write_u8(TAG_FRAME_BEGIN);
        self.write_u64(e.frame_index);
        self.write_node(e.root);
        self.write_i64(e.y1);
        self.write_i64(e.y2);
        self.write_u64(e.viewport_epoch);
    }

    fn on_node_drawn(&mut self, e: &NodeDrawnEvent) {
        self.write_u8(TAG_NODE_DRAWN);
        self.write_u64(e.frame_index);
        self.write_node(e.node);
        self.write_rect(e.rect);
        self.write_u32(e.depth);
    }

    fn on_collapse(&mut self, e: &CollapseEvent) {
        self.write_u8(TAG_COLLAPSE);
        self.write_u64(e.frame_index);
        self.write_node(e.node);
    }

    fn on_output(&mut self, e: &OutputEvent) {
        self.write_u8(TAG_OUTPUT);
        self.write_u64(e.frame_index);
        self.write_node(e.node);
    }

    fn on_tail_loop(&mut self, e: &TailLoopEvent) {
        self.write_u8(TAG_TAIL_LOOP);
        self.write_u64(e.frame_index);
        self.write_node(e.from);
        self.write_node(e.to);
        self.write_reason(e.reason);
    }

    fn on_viewport(&mut self, e: &ViewportEvent) {
        self.write_u8(TAG_VIEWPORT);
        self.write_u64(e.epoch);
        self.write_i32(e.width);
        self.write_i32(e.height);
        self.write_u8(e.orientation.code());
    }

    fn on_frame_summary(&mut self, s: &FrameStats) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u32(s.rects);
        self.write_u32(s.labels);
        self.write_u32(s.collapsed);
        self.write_u32(s.terminals);
        self.write_u32(s.collapsibles);
        self.write_u32(s.tail_loops);
        self.write_u32(s.fast_path_hits);
        self.write_u32(s.max_depth);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameBeginEvent`].
    FrameBegin(FrameBeginEvent),
    /// A [`NodeDrawnEvent`].
    NodeDrawn(NodeDrawnEvent),
    /// A [`CollapseEvent`].
    Collapse(CollapseEvent),
    /// An [`OutputEvent`].
    Output(OutputEvent),
    /// A [`TailLoopEvent`].
    TailLoop(TailLoopEvent),
    /// A [`ViewportEvent`].
    Viewport(ViewportEvent),
    /// End-of-frame [`FrameStats`].
    FrameSummary(FrameStats),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_i64(&mut self) -> Option<i64> {
        self.take().map(i64::from_le_bytes)
    }

    fn read_node(&mut self) -> Option<NodeId> {
        let idx = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(NodeId::from_raw(idx, generation))
    }

    fn read_rect(&mut self) -> Option<DeviceRect> {
        Some(DeviceRect {
            left: self.read_i32()?,
            top: self.read_i32()?,
            right: self.read_i32()?,
            bottom: self.read_i32()?,
        })
    }

    fn read_reason(&mut self) -> Option<TailReason> {
        Some(match self.read_u8()? {
            0 => TailReason::FastPath,
            1 => TailReason::CoveringChild,
            _ => TailReason::DominantChild,
        })
    }

    fn decode_frame_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBegin(FrameBeginEvent {
            frame_index: self.read_u64()?,
            root: self.read_node()?,
            y1: self.read_i64()?,
            y2: self.read_i64()?,
            viewport_epoch: self.read_u64()?,
        }))
    }

    fn decode_node_drawn(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NodeDrawn(NodeDrawnEvent {
            frame_index: self.read_u64()?,
            node: self.read_node()?,
            rect: self.read_rect()?,
            depth: self.read_u32()?,
        }))
    }

    fn decode_collapse(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Collapse(CollapseEvent {
            frame_index: self.read_u64()?,
            node: self.read_node()?,
        }))
    }

    fn decode_output(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Output(OutputEvent {
            frame_index: self.read_u64()?,
            node: self.read_node()?,
        }))
    }

    fn decode_tail_loop(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TailLoop(TailLoopEvent {
            frame_index: self.read_u64()?,
            from: self.read_node()?,
            to: self.read_node()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_viewport(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Viewport(ViewportEvent {
            epoch: self.read_u64()?,
            width: self.read_i32()?,
            height: self.read_i32()?,
            orientation: Orientation::try_from(self.read_u8()?).ok()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameStats {
            frame_index: self.read_u64()?,
            rects: self.read_u32()?,
            labels: self.read_u32()?,
            collapsed: self.read_u32()?,
            terminals: self.read_u32()?,
            collapsibles: self.read_u32()?,
            tail_loops: self.read_u32()?,
            fast_path_hits: self.read_u32()?,
            max_depth: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_BEGIN => self.decode_frame_begin(),
            TAG_NODE_DRAWN => self.decode_node_drawn(),
            TAG_COLLAPSE => self.decode_collapse(),
            TAG_OUTPUT => self.decode_output(),
            TAG_TAIL_LOOP => self.decode_tail_loop(),
            TAG_VIEWPORT => self.decode_viewport(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
