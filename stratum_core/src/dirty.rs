// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking flag sets and tracker channels.
//!
//! Each node carries two independent masks:
//!
//! - [`Recalc`]: which derived state is stale (transform, clip, stacking
//!   order, aggregate bounds).
//! - [`UpdateMask`]: which cached registry references (children list,
//!   parent) must be re-resolved before recomputation.
//!
//! A node whose own mask changed is also put in the graph's dirty set, the
//! id-keyed working set behind
//! [`dirty_nodes`](crate::graph::SceneGraph::dirty_nodes).
//!
//! Propagation is handled by a multi-channel [`understory_dirty`] tracker
//! keyed by arena slot, one channel per kind of recomputation.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`TRANSFORM`], [`CLIP`] and [`ALPHA`] are marked with
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent. Marking a node marks every descendant,
//!   because global transforms, clip rects and world alpha are inherited.
//!   A transform change marks [`CLIP`] as well, since the clip rect is
//!   derived from the global transform.
//!
//! - **Local-only**: [`Z_ORDER`], [`BOUNDS`] and [`CONTENT`] are marked with
//!   the default policy. Only the marked node appears in the drain output.
//!   Position, size and scale/rotation changes mark the *parent*
//!   [`BOUNDS`]; z-index changes mark the parent [`Z_ORDER`].
//!
//! - **Structural**: reparenting marks the moved node
//!   [`UpdateMask::PARENT`] and both parents [`UpdateMask::CHILDREN`], and
//!   moves the node's dependency edges to the new parent.
//!
//! # Consumption
//!
//! [`SceneGraph::recompute_dirty`](crate::graph::SceneGraph::recompute_dirty)
//! drains every channel. Propagating channels drain in dependency order, so
//! parents are finished before their children read them. Inherited channel
//! membership is folded into each node's [`Recalc`] before the node is
//! visited; afterwards both masks are cleared and the dirty set emptied.

use bitflags::bitflags;
use understory_dirty::Channel;

/// Global transform must be rebuilt: propagates to descendants.
pub const TRANSFORM: Channel = Channel::new(0);

/// Clip rect must be rebuilt: propagates to descendants.
pub const CLIP: Channel = Channel::new(1);

/// World alpha must be rebuilt: propagates to descendants.
pub const ALPHA: Channel = Channel::new(2);

/// Children must be re-sorted.
pub const Z_ORDER: Channel = Channel::new(3);

/// Aggregate child bounds must be refreshed.
pub const BOUNDS: Channel = Channel::new(4);

/// Colors, texture or shader changed, or the node was marked explicitly.
pub const CONTENT: Channel = Channel::new(5);

/// Channels that carry child-to-parent dependency edges.
pub const PROPAGATING: [Channel; 3] = [TRANSFORM, CLIP, ALPHA];

/// Every channel.
pub const ALL: [Channel; 6] = [TRANSFORM, ALPHA, CLIP, Z_ORDER, BOUNDS, CONTENT];

bitflags! {
    /// Derived state a node must recompute on the next frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Recalc: u16 {
        /// Position, size, mount or pivot changed: rebuild the local matrix.
        const TRANSLATE = 1 << 0;
        /// Scale or rotation changed: rebuild the scale-rotate sub-matrix
        /// and then the local matrix.
        const SCALE_ROTATE = 1 << 1;
        /// An ancestor's transform changed: rebuild the global matrix.
        const GLOBAL = 1 << 2;
        /// Clip flag, geometry or an inherited clip changed.
        const CLIP = 1 << 3;
        /// Child stacking order must be re-sorted.
        const Z_ORDER = 1 << 4;
        /// Own or inherited opacity changed.
        const ALPHA = 1 << 5;
        /// A child's extent changed: refresh the aggregate child bounds.
        const BOUNDS = 1 << 6;
    }
}

bitflags! {
    /// Cached registry references a node must re-resolve.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct UpdateMask: u8 {
        /// The child list changed.
        const CHILDREN = 1 << 0;
        /// The parent changed.
        const PARENT = 1 << 1;
    }
}

impl Recalc {
    /// Bits that force the global matrix to be rebuilt.
    pub const TRANSFORM: Self = Self::TRANSLATE
        .union(Self::SCALE_ROTATE)
        .union(Self::GLOBAL);
}
