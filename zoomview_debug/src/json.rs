// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON event exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes them as a JSON array in [Chrome Trace Event Format][format]
//! shape. Render passes carry no wall-clock time, so the frame index is
//! used as the timestamp; each frame becomes one tick on the timeline.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use zoomview_core::tree::NodeId;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array of trace event objects.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": "Frame",
                    "cat": "Render",
                    "ts": e.frame_index,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "root": node_label(e.root),
                        "y1": e.y1,
                        "y2": e.y2,
                        "viewport_epoch": e.viewport_epoch,
                    }
                }));
            }
            RecordedEvent::NodeDrawn(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "NodeDrawn",
                    "cat": "Render",
                    "ts": e.frame_index,
                    "pid": 0,
                    "tid": e.depth,
                    "s": "t",
                    "args": {
                        "node": node_label(e.node),
                        "rect": [e.rect.left, e.rect.top, e.rect.right, e.rect.bottom],
                    }
                }));
            }
            RecordedEvent::Collapse(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Collapse",
                    "cat": "Model",
                    "ts": e.frame_index,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": { "node": node_label(e.node) }
                }));
            }
            RecordedEvent::Output(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Output",
                    "cat": "Model",
                    "ts": e.frame_index,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": { "node": node_label(e.node) }
                }));
            }
            RecordedEvent::TailLoop(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "TailLoop",
                    "cat": "Render",
                    "ts": e.frame_index,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "from": node_label(e.from),
                        "to": node_label(e.to),
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::Viewport(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Viewport",
                    "cat": "Viewport",
                    "ts": 0,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "epoch": e.epoch,
                        "width": e.width,
                        "height": e.height,
                        "orientation": e.orientation.name(),
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Frame",
                    "cat": "Render",
                    "ts": s.frame_index,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "rects": s.rects,
                        "labels": s.labels,
                        "collapsed": s.collapsed,
                        "terminals": s.terminals,
                        "collapsibles": s.collapsibles,
                        "tail_loops": s.tail_loops,
                        "fast_path_hits": s.fast_path_hits,
                        "max_depth": s.max_depth,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn node_label(id: NodeId) -> String {
    format!("{}@{}", id.index(), id.generation())
}
