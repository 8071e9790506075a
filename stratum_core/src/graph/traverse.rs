// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use core::slice;

use super::id::{NodeId, NodeRef};

/// An iterator over the children of a node in drawing order.
///
/// Created by [`SceneGraph::children`](super::SceneGraph::children).
#[derive(Debug, Clone)]
pub struct Children<'a> {
    inner: slice::Iter<'a, NodeRef>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(refs: &'a [NodeRef]) -> Self {
        Self { inner: refs.iter() }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.inner.next().map(|r| r.id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}
