// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity types.

use core::fmt;

/// Application-assigned node identifier.
///
/// Ids are chosen by the caller at creation and stay unique for as long as
/// the node is registered. After a node is destroyed its id may be reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// A cached reference to a registered node.
///
/// Carries the arena slot and the slot generation it was resolved against.
/// A reference whose generation no longer matches the slot is stale and must
/// be resolved again through the id.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// The node's id.
    pub id: NodeId,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl NodeRef {
    /// Returns the arena slot (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Returns the generation the reference was resolved against.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NodeRef({}@{}:gen{})",
            self.id.0, self.slot, self.generation
        )
    }
}
