// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the renderer on random trees.
//!
//! 1. Turning the fast-path cache off changes nothing a frame draws or
//!    reports, across a sequence of zooming frames.
//! 2. Every child of a visited node is visited or collapsed exactly once,
//!    and nothing below a collapsed node is touched.
//! 3. Frame counters agree with what the collaborators saw.

use std::collections::HashSet;

use proptest::prelude::*;
use zoomview_core::config::{Orientation, ViewConfig};
use zoomview_core::geometry::ScreenSize;
use zoomview_core::policy::NodeClass;
use zoomview_core::render::{RecursiveRenderer, RootSpan};
use zoomview_core::screen::ColorIndex;
use zoomview_core::tree::{NodeData, NodeFlags, NodeId, NodeStore};
use zoomview_debug::screen::{DrawCommand, FrameRecording, Notification, record_frame};

// ── Helpers ─────────────────────────────────────────────────────────────

const NORM: u32 = 1 << 16;

/// Small deterministic generator so one `u64` describes a whole tree.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        u32::try_from(self.0 >> 33).unwrap()
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next() % n
    }
}

/// Builds a tree of up to `max_depth` levels. Children partition their
/// parent's range at random cut points; about one slot in eight is left
/// empty so gaps are covered too.
fn random_tree(seed: u64, max_depth: u32) -> (NodeStore, NodeId) {
    let mut rng = Lcg(seed);
    let mut tree = NodeStore::new(NORM);
    let root = tree.create_node(NodeData::new(0, NORM).with_text("root"));
    let mut frontier = vec![(root, 0)];

    while let Some((node, depth)) = frontier.pop() {
        if depth >= max_depth {
            continue;
        }
        let n = rng.below(4);
        if n == 0 {
            continue;
        }
        let mut cuts: Vec<u32> = (0..n - 1).map(|_| 1 + rng.below(NORM - 1)).collect();
        cuts.push(0);
        cuts.push(NORM);
        cuts.sort_unstable();
        cuts.dedup();

        for pair in cuts.windows(2) {
            if rng.below(8) == 0 {
                continue;
            }
            let text = if rng.below(2) == 0 {
                String::new()
            } else {
                format!("n{}", tree.live_count())
            };
            let flags = NodeFlags {
                outline: rng.below(2) == 0,
                shove: rng.below(3) == 0,
            };
            let child = tree.create_node(
                NodeData::new(pair[0], pair[1])
                    .with_color(ColorIndex(rng.below(3)))
                    .with_text(text)
                    .with_flags(flags),
            );
            tree.add_child(node, child);
            frontier.push((child, depth + 1));
        }
    }
    (tree, root)
}

/// Root spans that zoom towards `target` by 8/5 per frame.
fn zoom_spans(root: NodeId, target: i64, max_y: i64, frames: usize) -> Vec<RootSpan> {
    let mut spans = Vec::with_capacity(frames);
    let (mut y1, mut y2) = (0, max_y);
    for _ in 0..frames {
        spans.push(RootSpan::new(root, y1, y2));
        y1 = target - (target - y1) * 8 / 5;
        y2 = target + (y2 - target) * 8 / 5;
    }
    spans
}

fn renderer(fast_path: bool, screen: ScreenSize, o: Orientation) -> RecursiveRenderer {
    let config = ViewConfig::new()
        .with_normalization(NORM)
        .with_fast_path(fast_path);
    RecursiveRenderer::new(config, screen, o).unwrap()
}

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop::sample::select(Orientation::ALL.to_vec())
}

fn screen_strategy() -> impl Strategy<Value = ScreenSize> {
    (100i32..=900, 100i32..=900).prop_map(|(w, h)| ScreenSize::new(w, h))
}

/// Checks the visit/collapse partition for one frame.
fn check_partition(tree: &NodeStore, root: NodeId, rec: &FrameRecording) -> Result<(), String> {
    let mut visited = HashSet::new();
    let mut collapsed = HashSet::new();
    for n in &rec.notifications {
        match *n {
            Notification::Push { node, .. } | Notification::Output(node) => {
                // A selected node may not be pushed, but it is never pushed
                // and selected in the same visit, so duplicates are errors.
                if !visited.insert(node) {
                    return Err(format!("{node:?} visited twice"));
                }
            }
            Notification::Collapse(node) => {
                if !collapsed.insert(node) {
                    return Err(format!("{node:?} collapsed twice"));
                }
            }
        }
    }

    if !visited.contains(&root) {
        return Err("root not visited".into());
    }
    if let Some(both) = visited.intersection(&collapsed).next() {
        return Err(format!("{both:?} both visited and collapsed"));
    }
    for &node in &visited {
        for child in tree.children(node) {
            if !visited.contains(&child) && !collapsed.contains(&child) {
                return Err(format!("{child:?} of visited {node:?} skipped"));
            }
        }
    }
    for &node in &collapsed {
        for below in tree.descendants(node).skip(1) {
            if visited.contains(&below) || collapsed.contains(&below) {
                return Err(format!("{below:?} touched below collapsed {node:?}"));
            }
        }
    }
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Fast-path equivalence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fast_path_never_changes_output(
        seed in any::<u64>(),
        screen in screen_strategy(),
        o in orientation_strategy(),
        target in 0i64..=4096,
    ) {
        let (tree, root) = random_tree(seed, 6);
        let mut fast = renderer(true, screen, o);
        let mut slow = renderer(false, screen, o);

        for span in zoom_spans(root, target, 4096, 8) {
            let a = record_frame(&mut fast, &tree, span);
            let b = record_frame(&mut slow, &tree, span);
            prop_assert_eq!(&a.commands, &b.commands, "draws differ at {:?}", span);
            prop_assert_eq!(&a.notifications, &b.notifications, "callbacks differ at {:?}", span);
            prop_assert_eq!(a.report.output, b.report.output);
            prop_assert_eq!(b.report.stats.fast_path_hits, 0);
        }
    }

    #[test]
    fn repeated_frames_hit_the_cache_without_changing_output(
        seed in any::<u64>(),
        o in orientation_strategy(),
    ) {
        let (tree, root) = random_tree(seed, 6);
        let mut r = renderer(true, ScreenSize::new(640, 480), o);
        // Wider than the screen on every side so covering children exist.
        let span = RootSpan::new(root, -40_000, 80_000);

        let first = record_frame(&mut r, &tree, span);
        let second = record_frame(&mut r, &tree, span);
        prop_assert_eq!(&first.commands, &second.commands);
        prop_assert_eq!(&first.notifications, &second.notifications);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Coverage partition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn visits_and_collapses_partition_the_tree(
        seed in any::<u64>(),
        screen in screen_strategy(),
        o in orientation_strategy(),
        target in 0i64..=4096,
    ) {
        let (tree, root) = random_tree(seed, 6);
        let mut r = renderer(true, screen, o);
        for span in zoom_spans(root, target, 4096, 6) {
            let rec = record_frame(&mut r, &tree, span);
            if let Err(msg) = check_partition(&tree, root, &rec) {
                prop_assert!(false, "{} at {:?}", msg, span);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Counters
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stats_match_recorded_calls(
        seed in any::<u64>(),
        o in orientation_strategy(),
        target in 0i64..=4096,
    ) {
        let (tree, root) = random_tree(seed, 5);
        let mut r = renderer(true, ScreenSize::new(500, 400), o);
        for span in zoom_spans(root, target, 4096, 4) {
            let rec = record_frame(&mut r, &tree, span);
            let stats = rec.report.stats;

            let rects = rec
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Rect { .. }))
                .count();
            let labels = rec
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Label { .. }))
                .count();
            let count = |class| {
                rec.notifications
                    .iter()
                    .filter(|n| matches!(n, Notification::Push { class: c, .. } if *c == class))
                    .count()
            };
            let collapses = rec
                .notifications
                .iter()
                .filter(|n| matches!(n, Notification::Collapse(_)))
                .count();

            prop_assert_eq!(stats.rects as usize, rects);
            prop_assert_eq!(stats.labels as usize, labels);
            prop_assert_eq!(stats.terminals as usize, count(NodeClass::Terminal));
            prop_assert_eq!(stats.collapsibles as usize, count(NodeClass::Collapsible));
            prop_assert_eq!(stats.collapsed as usize, collapses);
            prop_assert_eq!(rec.commands.first(), Some(&DrawCommand::Blank));
            prop_assert!(
                matches!(rec.commands.last(), Some(DrawCommand::Polyline { .. })),
                "last command is not the crosshair"
            );
        }
    }
}
