// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callbacks from the renderer into the prediction model.

use crate::tree::NodeId;

/// Receives per-frame notifications about nodes.
///
/// Both callbacks run synchronously in the middle of a render pass, while
/// the renderer holds a shared borrow of the [`NodeStore`](crate::tree::NodeStore).
/// Implementations record what they need and apply structural changes
/// after [`render_frame`](crate::render::RecursiveRenderer::render_frame)
/// returns.
pub trait TreeModel {
    /// `node`'s subtree is off-screen or too small this frame; any
    /// incremental state kept for it may be released.
    fn collapse(&mut self, node: NodeId);

    /// `node` has moved under the crosshair and is now the committed output.
    fn output(&mut self, node: NodeId);
}

/// A [`TreeModel`] that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullModel;

impl TreeModel for NullModel {
    fn collapse(&mut self, node: NodeId) {
        _ = node;
    }

    fn output(&mut self, node: NodeId) {
        _ = node;
    }
}
