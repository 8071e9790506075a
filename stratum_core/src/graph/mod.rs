// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph: node registry, dirty tracking, recomputation and extraction.
//!
//! Nodes live in a slot arena owned by [`SceneGraph`]. Applications address
//! them by [`NodeId`]; the graph internally caches parent and child
//! resolutions as [`NodeRef`]s tagged with the slot generation, so a
//! destroyed-and-reused slot is never mistaken for the node it replaced.
//!
//! Each frame proceeds in two steps:
//!
//! 1. [`SceneGraph::recompute_dirty`] brings every dirty node's derived state
//!    (transforms, world alpha, clip rect, child order, child bounds) up to
//!    date, parents before children.
//! 2. [`SceneGraph::extract`] walks the tree in z-order and hands one
//!    [`Quad`] per visible node to a [`QuadSink`](crate::backend::QuadSink).

mod clip;
mod evaluate;
mod event;
mod extract;
mod id;
mod node;
mod property;
mod store;
mod traverse;

pub use evaluate::FrameChanges;
pub use event::NodeEvent;
pub use extract::Quad;
pub use id::{NodeId, NodeRef};
pub use node::{CORNER_BL, CORNER_BR, CORNER_UL, CORNER_UR, NodeProps, SceneNode};
pub use property::{Property, PropertyValue};
pub use store::SceneGraph;
pub use traverse::Children;
