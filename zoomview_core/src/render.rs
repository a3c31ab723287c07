// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame tree walk.
//!
//! [`RecursiveRenderer::render_frame`] walks the prediction tree from a root
//! span, drawing each visible node, classifying it for the expansion policy,
//! and telling the model which subtrees are off-screen. The walk is a loop
//! carrying `(node, y1, y2, min_left, parent_color)`; it only recurses for
//! children that are big enough to read and do not end the walk, so native
//! stack depth is bounded by how many large nodes can share the screen, not
//! by tree depth.
//!
//! # Per node
//!
//! 1. Draw its rectangle (clipped to the visible region) unless it has the
//!    same colour as its parent, then its label.
//! 2. If its parent is the current output node and the crosshair lies inside
//!    its span, it becomes the output. Otherwise leaves are pushed as
//!    [`Terminal`](NodeClass::Terminal) and the branch ends; interior nodes
//!    are pushed as [`Collapsible`](NodeClass::Collapsible).
//! 3. If the fast-path cache holds a child that still covers the screen, all
//!    other children are collapsed and the loop continues into it.
//! 4. Otherwise children are scanned in order. Children ending above the
//!    screen are collapsed. Readable children are rendered; one that reaches
//!    the bottom edge ends the scan (and becomes the cached child if it also
//!    covers the top). Among unreadable children only the widest one wider
//!    than a third of the parent is kept; the others are collapsed.
//! 5. Children after the scan stopped are collapsed. If no readable child
//!    was rendered, the loop continues into the kept unreadable child.
//!
//! The fast path in step 3 is taken only when the full scan in step 4 would
//! produce exactly the same draws and notifications, so turning it off
//! changes performance but never output.

use crate::config::{ConfigError, Orientation, ViewConfig};
use crate::font::FontSizeSelector;
use crate::geometry::{DeviceRect, ModelPoint, ModelRect, ScreenSize};
use crate::model::TreeModel;
use crate::policy::{ExpansionPolicy, NodeClass};
use crate::screen::{ColorIndex, Label, Screen};
use crate::trace::{
    CollapseEvent, FrameBeginEvent, FrameStats, NodeDrawnEvent, OutputEvent, TailLoopEvent,
    TailReason, Tracer, ViewportEvent,
};
use crate::tree::{NodeId, NodeStore};
use crate::viewport::ViewportState;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A node together with its span in model space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RootSpan {
    /// The node.
    pub node: NodeId,
    /// Span start.
    pub y1: i64,
    /// Span end.
    pub y2: i64,
}

impl RootSpan {
    /// Creates a span.
    #[inline]
    #[must_use]
    pub const fn new(node: NodeId, y1: i64, y2: i64) -> Self {
        Self { node, y1, y2 }
    }
}

/// Everything a frame writes to.
pub struct RenderTargets<'a> {
    /// Drawing surface.
    pub screen: &'a mut dyn Screen,
    /// Receives `Collapse` and `Output` notifications.
    pub model: &'a mut dyn TreeModel,
    /// Receives classified nodes.
    pub policy: &'a mut dyn ExpansionPolicy,
    /// Optional event sink.
    pub tracer: Tracer<'a>,
}

impl core::fmt::Debug for RenderTargets<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderTargets")
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl<'a> RenderTargets<'a> {
    /// Bundles the targets with tracing disabled.
    #[must_use]
    pub fn new(
        screen: &'a mut dyn Screen,
        model: &'a mut dyn TreeModel,
        policy: &'a mut dyn ExpansionPolicy,
    ) -> Self {
        Self {
            screen,
            model,
            policy,
            tracer: Tracer::none(),
        }
    }

    /// Routes trace events through `tracer`.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Tracer<'a>) -> Self {
        self.tracer = tracer;
        self
    }
}

/// What a frame produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// The output node after the frame (the root's parent if nothing was
    /// selected).
    pub output: Option<NodeId>,
    /// Counters for the frame.
    pub stats: FrameStats,
}

// ---------------------------------------------------------------------------
// Fast-path cache
// ---------------------------------------------------------------------------

/// Renderer-owned side table: parent slot → (parent generation, child).
#[derive(Debug, Default)]
struct FastPathCache {
    entries: Vec<Option<(u32, NodeId)>>,
}

impl FastPathCache {
    fn get(&self, parent: NodeId) -> Option<NodeId> {
        match self.entries.get(parent.index() as usize) {
            Some(Some((generation, child))) if *generation == parent.generation() => Some(*child),
            _ => None,
        }
    }

    fn remember(&mut self, parent: NodeId, child: NodeId) {
        let idx = parent.index() as usize;
        if idx >= self.entries.len() {
            self.entries.resize(idx + 1, None);
        }
        self.entries[idx] = Some((parent.generation(), child));
    }

    fn forget(&mut self, parent: NodeId) {
        if let Some(slot) = self.entries.get_mut(parent.index() as usize) {
            *slot = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// RecursiveRenderer
// ---------------------------------------------------------------------------

/// Draws a prediction tree frame by frame.
#[derive(Debug)]
pub struct RecursiveRenderer {
    config: ViewConfig,
    viewport: ViewportState,
    fonts: FontSizeSelector,
    cache: FastPathCache,
    frame_index: u64,
    traced_epoch: Option<u64>,
}

impl RecursiveRenderer {
    /// Creates a renderer for the given screen.
    pub fn new(
        config: ViewConfig,
        screen: ScreenSize,
        orientation: Orientation,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            viewport: ViewportState::new(screen, orientation, &config),
            fonts: FontSizeSelector::new(config.font_size, config.max_y),
            cache: FastPathCache::default(),
            frame_index: 0,
            traced_epoch: None,
        })
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Current viewport geometry.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    /// Number of frames rendered so far.
    #[inline]
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Rebuilds the viewport for a resized or rotated screen.
    pub fn on_screen_changed(&mut self, screen: ScreenSize, orientation: Orientation) {
        self.viewport.recompute(screen, orientation, &self.config);
    }

    /// Reads the size of `screen` and rebuilds the viewport for it.
    pub fn bind_screen(&mut self, screen: &dyn Screen, orientation: Orientation) {
        self.on_screen_changed(ScreenSize::new(screen.width(), screen.height()), orientation);
    }

    /// Replaces the configuration and rebuilds all derived state.
    ///
    /// On error the previous configuration stays in effect.
    pub fn on_config_changed(&mut self, config: ViewConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.fonts = FontSizeSelector::new(config.font_size, config.max_y);
        self.cache.clear();
        let (screen, orientation) = (self.viewport.screen(), self.viewport.orientation());
        self.viewport.recompute(screen, orientation, &self.config);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            margin = config.margin,
            non_linearity = config.non_linearity,
            fast_path = config.fast_path,
            "view config changed"
        );
        Ok(())
    }

    /// The child remembered for `node`, if it is still a live child of it.
    #[must_use]
    pub fn fast_path_child(&self, tree: &NodeStore, node: NodeId) -> Option<NodeId> {
        let child = self.cache.get(node)?;
        (tree.is_alive(child) && tree.parent(child) == Some(node)).then_some(child)
    }

    /// Number of nodes with a remembered child.
    #[must_use]
    pub fn fast_path_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops the remembered child of `node`.
    pub fn forget(&mut self, node: NodeId) {
        self.cache.forget(node);
    }

    /// Drops every remembered child.
    pub fn clear_fast_path(&mut self) {
        self.cache.clear();
    }

    /// Follows remembered children down from `root` while each one alone
    /// still fills the screen, and returns the deepest such span.
    ///
    /// Hosts use this after a frame to re-root their model, keeping span
    /// coordinates small as the user zooms in.
    ///
    /// # Panics
    ///
    /// Panics if a followed span is inverted or wider than `i64::MAX`.
    #[must_use]
    pub fn promote_root(&self, tree: &NodeStore, root: RootSpan) -> RootSpan {
        let norm = i64::from(tree.normalization());
        let mut span = root;
        while let Some(child) = self.fast_path_child(tree, span.node) {
            let size = span_size(span.node, span.y1, span.y2);
            let (n1, n2) = child_span(tree, child, span.y1, size, norm);
            if !self.viewport.node_fills_screen(n1, n2) {
                break;
            }
            span = RootSpan::new(child, n1, n2);
        }
        span
    }

    /// Renders one frame starting from `root`.
    ///
    /// # Panics
    ///
    /// Panics if the tree's normalization differs from the configured one,
    /// or if any span is inverted or wider than `i64::MAX`.
    pub fn render_frame(
        &mut self,
        tree: &NodeStore,
        root: RootSpan,
        targets: &mut RenderTargets<'_>,
    ) -> FrameReport {
        assert_eq!(
            tree.normalization(),
            self.config.normalization,
            "tree normalization does not match view config"
        );
        let frame_index = self.frame_index;
        self.frame_index += 1;

        let epoch = self.viewport.epoch();
        if self.traced_epoch != Some(epoch) {
            self.traced_epoch = Some(epoch);
            let screen = self.viewport.screen();
            targets.tracer.viewport(&ViewportEvent {
                epoch,
                width: screen.width(),
                height: screen.height(),
                orientation: self.viewport.orientation(),
            });
        }
        targets.tracer.frame_begin(&FrameBeginEvent {
            frame_index,
            root: root.node,
            y1: root.y1,
            y2: root.y2,
            viewport_epoch: epoch,
        });

        targets.screen.blank();

        let mut walk = Walk {
            tree,
            config: &self.config,
            viewport: &self.viewport,
            fonts: self.fonts,
            cache: &mut self.cache,
            targets: &mut *targets,
            vis: self.viewport.visible_region(),
            norm: i64::from(tree.normalization()),
            output: tree.parent(root.node),
            stats: FrameStats {
                frame_index,
                ..FrameStats::default()
            },
            frame_index,
        };
        walk.render(root.node, root.y1, root.y2, 0, None, 0);
        let (output, stats) = (walk.output, walk.stats);

        let crosshair = self.viewport.crosshair();
        let color = self.config.colour_mode.then_some(ColorIndex::CROSSHAIR);
        targets
            .screen
            .draw_polyline(&crosshair.vertical, self.config.line_width, color);
        targets
            .screen
            .draw_polyline(&crosshair.horizontal, self.config.line_width, color);

        targets.tracer.frame_summary(&stats);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            frame = frame_index,
            rects = stats.rects,
            collapsed = stats.collapsed,
            tail_loops = stats.tail_loops,
            max_depth = stats.max_depth,
            "frame rendered"
        );

        FrameReport { output, stats }
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// State for one render pass.
struct Walk<'r, 'a> {
    tree: &'r NodeStore,
    config: &'r ViewConfig,
    viewport: &'r ViewportState,
    fonts: FontSizeSelector,
    cache: &'r mut FastPathCache,
    targets: &'r mut RenderTargets<'a>,
    vis: ModelRect,
    norm: i64,
    output: Option<NodeId>,
    stats: FrameStats,
    frame_index: u64,
}

impl Walk<'_, '_> {
    fn render(
        &mut self,
        node: NodeId,
        y1: i64,
        y2: i64,
        min_left: i32,
        parent_color: Option<ColorIndex>,
        depth: u32,
    ) {
        let tree = self.tree;
        let vis = self.vis;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let (mut node, mut y1, mut y2) = (node, y1, y2);
        let (mut min_left, mut parent_color) = (min_left, parent_color);

        loop {
            let size = span_size(node, y1, y2);
            let color = tree.color(node);
            let flags = tree.flags(node);
            let rect = self.node_rect(y1, y2, size);

            if parent_color != Some(color) {
                let thickness = u32::from(self.config.outline && flags.outline);
                self.targets
                    .screen
                    .draw_rect(rect, Some(color), None, thickness);
                self.stats.rects += 1;
                self.targets.tracer.node_drawn(&NodeDrawnEvent {
                    frame_index: self.frame_index,
                    node,
                    rect,
                    depth,
                });
            }

            let text = tree.text(node);
            if !text.is_empty() {
                let edge = self.targets.screen.draw_label(&Label {
                    text,
                    rect,
                    min_left,
                    font_size: self.fonts.select(size),
                });
                self.stats.labels += 1;
                if flags.shove {
                    min_left = edge;
                }
            }

            if self.is_newly_selected(node, y1, y2) {
                self.output = Some(node);
                self.targets.model.output(node);
                self.targets.tracer.output(&OutputEvent {
                    frame_index: self.frame_index,
                    node,
                });
            } else if tree.child_count(node) == 0 {
                self.push(node, y1, y2, NodeClass::Terminal);
                return;
            } else {
                self.push(node, y1, y2, NodeClass::Collapsible);
            }

            if self.config.fast_path {
                if let Some(child) = self.cached_child(node) {
                    let (n1, n2) = child_span(tree, child, y1, size, self.norm);
                    if self.fast_path_valid(child, n1, n2) {
                        for sibling in tree.children(node) {
                            if sibling != child {
                                self.collapse(sibling);
                            }
                        }
                        self.stats.fast_path_hits += 1;
                        self.tail(node, child, TailReason::FastPath);
                        (node, y1, y2, parent_color) = (child, n1, n2, Some(color));
                        continue;
                    }
                }
                self.cache.forget(node);
            }

            let mut best: Option<(NodeId, i64, i64)> = None;
            let mut best_range = self.norm / 3;
            let mut rendered_big = false;
            let mut next: Option<(NodeId, i64, i64, TailReason)> = None;

            let mut children = tree.children(node);
            for child in children.by_ref() {
                let (n1, n2) = child_span(tree, child, y1, size, self.norm);
                if n2 < vis.min_y {
                    self.collapse(child);
                } else if n2 - n1 > self.config.min_node_size_text {
                    if n2 >= vis.max_y {
                        if n1 <= vis.min_y {
                            self.cache.remember(node, child);
                        }
                        if best.is_none() {
                            next = Some((child, n1, n2, TailReason::CoveringChild));
                        } else {
                            self.render(child, n1, n2, min_left, Some(color), depth + 1);
                        }
                        break;
                    }
                    self.render(child, n1, n2, min_left, Some(color), depth + 1);
                    rendered_big = true;
                } else {
                    let range = i64::from(tree.range(child));
                    if !rendered_big && range > best_range {
                        if let Some((displaced, _, _)) = best.replace((child, n1, n2)) {
                            self.collapse(displaced);
                        }
                        best_range = range;
                    } else {
                        self.collapse(child);
                    }
                    if n2 > vis.max_y {
                        break;
                    }
                }
            }
            for rest in children {
                self.collapse(rest);
            }

            if next.is_none() {
                if let Some((child, n1, n2)) = best {
                    if rendered_big {
                        self.collapse(child);
                    } else {
                        self.cache.remember(node, child);
                        next = Some((child, n1, n2, TailReason::DominantChild));
                    }
                }
            }

            match next {
                Some((child, n1, n2, reason)) => {
                    self.tail(node, child, reason);
                    (node, y1, y2, parent_color) = (child, n1, n2, Some(color));
                }
                None => return,
            }
        }
    }

    /// Device rectangle of a span, clipped to the visible region.
    fn node_rect(&self, y1: i64, y2: i64, size: i64) -> DeviceRect {
        let vis = self.vis;
        let far = self
            .viewport
            .model_to_device(ModelPoint::new(size.min(vis.max_x), y2.min(vis.max_y)));
        let near = self
            .viewport
            .model_to_device(ModelPoint::new(0, y1.max(vis.min_y)));
        DeviceRect::from_corners(far, near)
    }

    fn is_newly_selected(&self, node: NodeId, y1: i64, y2: i64) -> bool {
        let oy = self.config.origin_y;
        self.output == self.tree.parent(node)
            && y1 < oy
            && y2 > oy
            && y2 - y1 > self.config.min_selection_width
    }

    fn cached_child(&self, node: NodeId) -> Option<NodeId> {
        let child = self.cache.get(node)?;
        (self.tree.is_alive(child) && self.tree.parent(child) == Some(node)).then_some(child)
    }

    /// Whether a full child scan would collapse every sibling of `child`
    /// and continue straight into it.
    fn fast_path_valid(&self, child: NodeId, n1: i64, n2: i64) -> bool {
        let vis = self.vis;
        if n1 >= vis.min_y || n2 < vis.max_y {
            return false;
        }
        n2 - n1 > self.config.min_node_size_text
            || (n2 > vis.max_y && i64::from(self.tree.range(child)) > self.norm / 3)
    }

    fn push(&mut self, node: NodeId, y1: i64, y2: i64, class: NodeClass) {
        match class {
            NodeClass::Terminal => self.stats.terminals += 1,
            NodeClass::Collapsible => self.stats.collapsibles += 1,
        }
        self.targets
            .policy
            .push_node(self.tree, node, y1, y2, class);
    }

    fn collapse(&mut self, node: NodeId) {
        self.stats.collapsed += 1;
        self.targets.model.collapse(node);
        self.targets.tracer.collapse(&CollapseEvent {
            frame_index: self.frame_index,
            node,
        });
    }

    fn tail(&mut self, from: NodeId, to: NodeId, reason: TailReason) {
        self.stats.tail_loops += 1;
        self.targets.tracer.tail_loop(&TailLoopEvent {
            frame_index: self.frame_index,
            from,
            to,
            reason,
        });
    }
}

/// Height of `[y1, y2]`.
///
/// # Panics
///
/// Panics if the span is inverted or its height overflows `i64`.
fn span_size(node: NodeId, y1: i64, y2: i64) -> i64 {
    assert!(y2 >= y1, "node span inverted: {node:?} [{y1}, {y2}]");
    let Some(size) = y2.checked_sub(y1) else {
        panic!("node span too wide: {node:?} [{y1}, {y2}]");
    };
    size
}

/// Maps `child`'s bounds into its parent's span `[y1, y1 + size]`.
fn child_span(tree: &NodeStore, child: NodeId, y1: i64, size: i64, norm: i64) -> (i64, i64) {
    let scale = |bound: u32| {
        let v = i128::from(size) * i128::from(bound) / i128::from(norm);
        i64::try_from(v).unwrap_or(i64::MAX)
    };
    (
        y1.saturating_add(scale(tree.low_bound(child))),
        y1.saturating_add(scale(tree.high_bound(child))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DevicePoint;
    use crate::policy::NoExpansion;
    use crate::tree::NodeData;

    #[derive(Default)]
    struct CountingScreen {
        rects: u32,
        labels: Vec<(String, i32)>,
        polylines: u32,
        blanks: u32,
    }

    impl Screen for CountingScreen {
        fn width(&self) -> i32 {
            600
        }

        fn height(&self) -> i32 {
            500
        }

        fn blank(&mut self) {
            self.blanks += 1;
        }

        fn draw_rect(
            &mut self,
            _rect: DeviceRect,
            _fill: Option<ColorIndex>,
            _outline: Option<ColorIndex>,
            _thickness: u32,
        ) {
            self.rects += 1;
        }

        fn draw_label(&mut self, label: &Label<'_>) -> i32 {
            self.labels.push((label.text.to_owned(), label.min_left));
            label.rect.left.max(label.min_left) + 10
        }

        fn draw_polyline(&mut self, _points: &[DevicePoint], _width: u32, _c: Option<ColorIndex>) {
            self.polylines += 1;
        }
    }

    #[derive(Default)]
    struct Notes {
        collapsed: Vec<NodeId>,
        output: Vec<NodeId>,
    }

    impl TreeModel for Notes {
        fn collapse(&mut self, node: NodeId) {
            self.collapsed.push(node);
        }

        fn output(&mut self, node: NodeId) {
            self.output.push(node);
        }
    }

    /// Visible span axis is exactly `[0, 1000]`; only spans wider than 2000
    /// around y = 500 get selected.
    fn config() -> ViewConfig {
        let mut c = ViewConfig::new()
            .with_max_y(1000)
            .with_normalization(1000)
            .with_margin(100)
            .with_y_compression(1);
        c.min_selection_width = 2000;
        c
    }

    fn renderer() -> RecursiveRenderer {
        RecursiveRenderer::new(config(), ScreenSize::new(600, 500), Orientation::LeftToRight)
            .expect("valid config")
    }

    fn frame(
        r: &mut RecursiveRenderer,
        tree: &NodeStore,
        root: RootSpan,
    ) -> (FrameReport, CountingScreen, Notes) {
        let mut screen = CountingScreen::default();
        let mut notes = Notes::default();
        let mut policy = NoExpansion;
        let report = {
            let mut targets = RenderTargets::new(&mut screen, &mut notes, &mut policy);
            r.render_frame(tree, root, &mut targets)
        };
        (report, screen, notes)
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = RecursiveRenderer::new(
            config().with_normalization(0),
            ScreenSize::new(10, 10),
            Orientation::LeftToRight,
        );
        assert!(err.is_err());
    }

    #[test]
    fn oversized_world_is_rejected() {
        let err = RecursiveRenderer::new(
            config().with_max_y(1_000_000_000_000_000_000),
            ScreenSize::new(640, 480),
            Orientation::LeftToRight,
        );
        assert!(matches!(
            err,
            Err(ConfigError::OutOfRange { field: "max_y", .. })
        ));
    }

    #[test]
    fn single_leaf_draws_rect_label_and_crosshair() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000).with_text("r"));
        let mut r = renderer();
        let (report, screen, notes) = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert_eq!(screen.blanks, 1);
        assert_eq!(screen.rects, 1);
        assert_eq!(screen.labels.len(), 1);
        assert_eq!(screen.polylines, 2);
        assert!(notes.collapsed.is_empty());
        assert_eq!(report.stats.terminals, 1);
        assert_eq!(r.frame_index(), 1);
    }

    #[test]
    fn same_colour_child_is_not_redrawn() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000).with_color(ColorIndex(1)));
        let a = tree.create_node(NodeData::new(0, 500).with_color(ColorIndex(1)));
        let b = tree.create_node(NodeData::new(500, 1000).with_color(ColorIndex(2)));
        tree.add_child(root, a);
        tree.add_child(root, b);
        let mut r = renderer();
        let (report, screen, _) = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert_eq!(screen.rects, 2, "root and b only");
        assert_eq!(report.stats.terminals, 2);
        assert_eq!(report.stats.max_depth, 1);
    }

    #[test]
    fn shove_moves_min_left_for_descendants() {
        let mut tree = NodeStore::new(1000);
        let shove = crate::tree::NodeFlags {
            outline: false,
            shove: true,
        };
        let root = tree.create_node(NodeData::new(0, 1000).with_text("a").with_flags(shove));
        let child = tree.create_node(NodeData::new(0, 1000).with_text("b"));
        tree.add_child(root, child);
        let mut r = renderer();
        let (_, screen, _) = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert_eq!(screen.labels[0].1, 0);
        assert!(screen.labels[1].1 > 0, "child label starts after parent's");
    }

    #[test]
    fn crosshair_selects_child_of_output() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let child = tree.create_node(NodeData::new(0, 1000));
        tree.add_child(root, child);
        let mut r = renderer();
        // Root's parent is None, so the root itself is eligible; its span
        // [-1000, 2000] straddles the crosshair at 500 and is wider than 2000.
        let (report, _, notes) = frame(&mut r, &tree, RootSpan::new(root, -1000, 2000));
        assert_eq!(notes.output, vec![root, child]);
        assert_eq!(report.output, Some(child));
    }

    #[test]
    fn output_starts_at_root_parent() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let mut r = renderer();
        // Narrow span: nothing selected.
        let (report, _, notes) = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert!(notes.output.is_empty());
        assert_eq!(report.output, None);
    }

    #[test]
    #[should_panic(expected = "node span inverted")]
    fn inverted_span_panics() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let mut r = renderer();
        let _ = frame(&mut r, &tree, RootSpan::new(root, 10, 0));
    }

    #[test]
    #[should_panic(expected = "node span too wide")]
    fn overflowing_span_panics() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let mut r = renderer();
        let _ = frame(&mut r, &tree, RootSpan::new(root, -(1 << 62) - 10, (1 << 62) + 10));
    }

    #[test]
    #[should_panic(expected = "node span too wide")]
    fn promote_root_rejects_overflowing_span() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let child = tree.create_node(NodeData::new(0, 1000));
        tree.add_child(root, child);
        let mut r = renderer();
        let _ = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        let _ = r.promote_root(&tree, RootSpan::new(root, i64::MIN, i64::MAX));
    }

    #[test]
    #[should_panic(expected = "tree normalization does not match")]
    fn mismatched_normalization_panics() {
        let mut tree = NodeStore::new(999);
        let root = tree.create_node(NodeData::new(0, 999));
        let mut r = renderer();
        let _ = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
    }

    #[test]
    fn stale_cache_entry_is_ignored() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let child = tree.create_node(NodeData::new(0, 1000));
        tree.add_child(root, child);
        let mut r = renderer();
        let _ = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert_eq!(r.fast_path_child(&tree, root), Some(child));

        tree.destroy_node(child);
        assert_eq!(r.fast_path_child(&tree, root), None);
        let (report, _, _) = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert_eq!(report.stats.terminals, 1);
    }

    #[test]
    fn config_change_clears_cache_and_recomputes() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let child = tree.create_node(NodeData::new(0, 1000));
        tree.add_child(root, child);
        let mut r = renderer();
        let _ = frame(&mut r, &tree, RootSpan::new(root, 0, 1000));
        assert_eq!(r.fast_path_len(), 1);

        let epoch = r.viewport().epoch();
        r.on_config_changed(config().with_margin(200)).expect("valid");
        assert_eq!(r.fast_path_len(), 0);
        assert_eq!(r.viewport().epoch(), epoch + 1);
        assert!(r.on_config_changed(config().with_margin(-5)).is_err());
        assert_eq!(r.config().margin, 200, "failed change keeps old config");
    }

    #[test]
    fn promote_root_follows_covering_children() {
        let mut tree = NodeStore::new(1000);
        let root = tree.create_node(NodeData::new(0, 1000));
        let mid = tree.create_node(NodeData::new(0, 1000));
        let leaf = tree.create_node(NodeData::new(0, 1000));
        tree.add_child(root, mid);
        tree.add_child(mid, leaf);
        let mut r = renderer();
        let vis = r.viewport().visible_region();
        // Wide enough on both axes to fill the screen.
        let span = RootSpan::new(root, -vis.max_x, 2 * vis.max_x);
        let _ = frame(&mut r, &tree, span);

        let promoted = r.promote_root(&tree, span);
        assert_eq!(promoted.node, leaf);
        assert_eq!((promoted.y1, promoted.y2), (span.y1, span.y2));
    }
}
