// Copyright 2026 the Zoomview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Prediction tree arena.
//!
//! A *node* is one prediction: a symbol (or group) whose probability is
//! expressed as a fractional span `[low, high)` of its parent's span. Each
//! node has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: a parent handle plus an ordered child list. Children are
//!   appended in increasing bound order and never overlap.
//! - Display properties: colour, label text, and [`NodeFlags`].
//!
//! The store belongs to the host's prediction model. The renderer borrows it
//! immutably for the duration of a frame and never keeps handles except in
//! its own fast-path side table, which checks generations before use.

mod id;
mod store;
mod traverse;

pub use id::{INVALID, NodeId};
pub use store::{NodeData, NodeFlags, NodeStore};
pub use traverse::{Children, Descendants};
