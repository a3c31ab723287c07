// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording test doubles for the renderer's collaborators.
//!
//! [`RecordingScreen`] stores every draw call as a [`DrawCommand`].
//! [`RecordingModel`] implements both [`TreeModel`] and [`ExpansionPolicy`]
//! and appends every callback to one shared, ordered log; clone it to get a
//! second handle for the policy slot. [`record_frame`] wires the three
//! together for a single frame.

use std::cell::RefCell;
use std::rc::Rc;

use zoomview_core::geometry::{DevicePoint, DeviceRect};
use zoomview_core::model::TreeModel;
use zoomview_core::policy::{ExpansionPolicy, NodeClass};
use zoomview_core::render::{FrameReport, RecursiveRenderer, RenderTargets, RootSpan};
use zoomview_core::screen::{ColorIndex, Label, Screen};
use zoomview_core::trace::{TraceSink, Tracer};
use zoomview_core::tree::{NodeId, NodeStore};

// ---------------------------------------------------------------------------
// RecordingScreen
// ---------------------------------------------------------------------------

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    /// The surface was cleared.
    Blank,
    /// A filled rectangle.
    Rect {
        /// Device rectangle.
        rect: DeviceRect,
        /// Fill colour.
        fill: Option<ColorIndex>,
        /// Outline colour (`None` for the default).
        outline: Option<ColorIndex>,
        /// Outline thickness; zero means none.
        thickness: u32,
    },
    /// A text label.
    Label {
        /// The text.
        text: String,
        /// Rectangle of the owning node.
        rect: DeviceRect,
        /// Requested minimum start.
        min_left: i32,
        /// Font size.
        font_size: u32,
        /// Where the text was placed.
        left: i32,
        /// Right edge reported back to the renderer.
        right: i32,
    },
    /// A polyline.
    Polyline {
        /// Points in order.
        points: Vec<DevicePoint>,
        /// Line width.
        width: u32,
        /// Colour (`None` for the default).
        color: Option<ColorIndex>,
    },
}

/// A [`Screen`] that records draw calls instead of drawing.
///
/// Text is measured as `font_size / 2` pixels per character (at least one)
/// and placed one pixel after the later of the node's left edge and the
/// requested minimum.
#[derive(Clone, Debug)]
pub struct RecordingScreen {
    width: i32,
    height: i32,
    commands: Vec<DrawCommand>,
}

impl RecordingScreen {
    /// Creates an empty recording surface.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Every draw call so far, in order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the screen empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Number of rectangles drawn.
    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count()
    }

    /// Texts of all labels drawn, in order.
    #[must_use]
    pub fn label_texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn text_width(text: &str, font_size: u32) -> i32 {
        let per_char = i32::try_from(font_size / 2).unwrap_or(i32::MAX).max(1);
        let chars = i32::try_from(text.chars().count()).unwrap_or(i32::MAX);
        chars.saturating_mul(per_char)
    }
}

impl Screen for RecordingScreen {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn blank(&mut self) {
        self.commands.push(DrawCommand::Blank);
    }

    fn draw_rect(
        &mut self,
        rect: DeviceRect,
        fill: Option<ColorIndex>,
        outline: Option<ColorIndex>,
        thickness: u32,
    ) {
        self.commands.push(DrawCommand::Rect {
            rect,
            fill,
            outline,
            thickness,
        });
    }

    fn draw_label(&mut self, label: &Label<'_>) -> i32 {
        let left = label.rect.left.max(label.min_left).saturating_add(1);
        let right = left.saturating_add(Self::text_width(label.text, label.font_size));
        self.commands.push(DrawCommand::Label {
            text: label.text.to_owned(),
            rect: label.rect,
            min_left: label.min_left,
            font_size: label.font_size,
            left,
            right,
        });
        right
    }

    fn draw_polyline(&mut self, points: &[DevicePoint], width: u32, color: Option<ColorIndex>) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            width,
            color,
        });
    }
}

// ---------------------------------------------------------------------------
// RecordingModel
// ---------------------------------------------------------------------------

/// One recorded model or policy callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    /// `TreeModel::collapse`.
    Collapse(NodeId),
    /// `TreeModel::output`.
    Output(NodeId),
    /// `ExpansionPolicy::push_node`.
    Push {
        /// The node.
        node: NodeId,
        /// Span start.
        y1: i64,
        /// Span end.
        y2: i64,
        /// Classification.
        class: NodeClass,
    },
}

/// A [`TreeModel`] and [`ExpansionPolicy`] that logs every callback.
///
/// Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct RecordingModel {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingModel {
    /// Creates a model with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the log.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    /// Takes the log, leaving it empty.
    pub fn take(&self) -> Vec<Notification> {
        core::mem::take(&mut *self.log.borrow_mut())
    }

    /// Nodes passed to `collapse`, in order.
    #[must_use]
    pub fn collapsed(&self) -> Vec<NodeId> {
        self.log
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::Collapse(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Nodes pushed with the given class, in order.
    #[must_use]
    pub fn pushed(&self, class: NodeClass) -> Vec<NodeId> {
        self.log
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::Push { node, class: c, .. } if *c == class => Some(*node),
                _ => None,
            })
            .collect()
    }

    fn record(&self, n: Notification) {
        self.log.borrow_mut().push(n);
    }
}

impl TreeModel for RecordingModel {
    fn collapse(&mut self, node: NodeId) {
        self.record(Notification::Collapse(node));
    }

    fn output(&mut self, node: NodeId) {
        self.record(Notification::Output(node));
    }
}

impl ExpansionPolicy for RecordingModel {
    fn push_node(&mut self, tree: &NodeStore, node: NodeId, y1: i64, y2: i64, class: NodeClass) {
        _ = tree;
        self.record(Notification::Push {
            node,
            y1,
            y2,
            class,
        });
    }
}

// ---------------------------------------------------------------------------
// One-shot frame recording
// ---------------------------------------------------------------------------

/// Everything one frame produced.
#[derive(Clone, Debug)]
pub struct FrameRecording {
    /// Draw calls in order.
    pub commands: Vec<DrawCommand>,
    /// Model and policy callbacks in order.
    pub notifications: Vec<Notification>,
    /// The renderer's report.
    pub report: FrameReport,
}

/// Renders one frame onto a fresh [`RecordingScreen`] sized like the
/// renderer's viewport, logging callbacks with a fresh [`RecordingModel`].
pub fn record_frame(
    renderer: &mut RecursiveRenderer,
    tree: &NodeStore,
    root: RootSpan,
) -> FrameRecording {
    record_frame_with(renderer, tree, root, None)
}

/// Like [`record_frame`], also sending trace events to `sink`.
pub fn record_frame_traced(
    renderer: &mut RecursiveRenderer,
    tree: &NodeStore,
    root: RootSpan,
    sink: &mut dyn TraceSink,
) -> FrameRecording {
    record_frame_with(renderer, tree, root, Some(sink))
}

fn record_frame_with(
    renderer: &mut RecursiveRenderer,
    tree: &NodeStore,
    root: RootSpan,
    sink: Option<&mut dyn TraceSink>,
) -> FrameRecording {
    let size = renderer.viewport().screen();
    let mut screen = RecordingScreen::new(size.width(), size.height());
    let mut model = RecordingModel::new();
    let mut policy = model.clone();
    let report = {
        let tracer = match sink {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        let mut targets =
            RenderTargets::new(&mut screen, &mut model, &mut policy).with_tracer(tracer);
        renderer.render_frame(tree, root, &mut targets)
    };
    FrameRecording {
        commands: screen.take_commands(),
        notifications: model.take(),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_pushed_past_min_left() {
        let mut screen = RecordingScreen::new(100, 100);
        let rect = DeviceRect {
            left: 10,
            top: 0,
            right: 90,
            bottom: 50,
        };
        let right = screen.draw_label(&Label {
            text: "abc",
            rect,
            min_left: 40,
            font_size: 14,
        });
        // 41 + 3 chars * 7px.
        assert_eq!(right, 62);
        assert_eq!(screen.label_texts(), vec!["abc"]);
    }

    #[test]
    fn tiny_fonts_still_advance() {
        assert_eq!(RecordingScreen::text_width("ab", 1), 2);
    }

    #[test]
    fn clones_share_one_log() {
        let mut model = RecordingModel::new();
        let mut policy = model.clone();
        let mut tree = NodeStore::new(10);
        let a = tree.create_node(zoomview_core::tree::NodeData::new(0, 10));

        model.collapse(a);
        policy.push_node(&tree, a, 0, 5, NodeClass::Terminal);
        model.output(a);

        assert_eq!(
            model.notifications(),
            vec![
                Notification::Collapse(a),
                Notification::Push {
                    node: a,
                    y1: 0,
                    y2: 5,
                    class: NodeClass::Terminal,
                },
                Notification::Output(a),
            ]
        );
        assert_eq!(policy.collapsed(), vec![a]);
        assert_eq!(model.pushed(NodeClass::Terminal), vec![a]);
        assert!(model.pushed(NodeClass::Collapsible).is_empty());
    }
}
