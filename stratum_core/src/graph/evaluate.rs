// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame recomputation of derived node state.
//!
//! [`SceneGraph::recompute_dirty`] drains every tracker channel (see
//! [`dirty`](crate::dirty)) and folds inherited work into each node's
//! [`Recalc`] mask. Propagating channels drain in dependency order, so a
//! parent's global transform, world alpha and clip rect are final before any
//! of its children read them. The drained nodes are then processed in
//! passes, each derived value at most once per node:
//!
//! 1. Re-resolve the cached children and parent references if the update
//!    mask says so, or if a cached reference's generation has diverged.
//! 2. In transform order: rebuild the scale-rotate sub-matrix on
//!    [`SCALE_ROTATE`](Recalc::SCALE_ROTATE), the local matrix on
//!    [`TRANSLATE`](Recalc::TRANSLATE) or `SCALE_ROTATE`, then the global
//!    matrix.
//! 3. In alpha order: rebuild world alpha.
//! 4. In clip order: rebuild the clip rect, short-circuiting when the node
//!    was not transformed and the parent clip and own clip flag match what
//!    the cached rect was computed from.
//! 5. Re-sort children by effective z-index on
//!    [`Z_ORDER`](Recalc::Z_ORDER).
//!
//! A final, deepest-first pass refreshes aggregate child bounds for nodes
//! marked [`BOUNDS`](Recalc::BOUNDS), walking upwards while the bounds keep
//! changing. Both masks are then cleared and the dirty set emptied.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::cmp::Reverse;

use kurbo::Rect;
use understory_dirty::Channel;

use super::clip::compute_clip;
use super::id::{NodeId, NodeRef};
use super::node::SceneNode;
use super::store::SceneGraph;
use crate::dirty::{self, Recalc, UpdateMask};
use crate::matrix::Matrix;

/// What a single [`SceneGraph::recompute_dirty`] call did.
///
/// Each list holds ids in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameChanges {
    /// Every node visited.
    pub recomputed: Vec<NodeId>,
    /// Nodes whose global transform was rebuilt.
    pub transforms: Vec<NodeId>,
    /// Nodes whose world alpha was rebuilt.
    pub alphas: Vec<NodeId>,
    /// Nodes whose clip rect changed value.
    pub clips: Vec<NodeId>,
    /// Nodes whose children were re-sorted.
    pub reordered: Vec<NodeId>,
    /// Nodes whose aggregate child bounds changed value.
    pub bounds: Vec<NodeId>,
    /// Nodes whose colors, texture or shader changed.
    pub content: Vec<NodeId>,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.recomputed.clear();
        self.transforms.clear();
        self.alphas.clear();
        self.clips.clear();
        self.reordered.clear();
        self.bounds.clear();
        self.content.clear();
    }

    /// Whether nothing was recomputed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recomputed.is_empty()
    }
}

impl SceneGraph {
    /// Recomputes every dirty node once, parents before children, and
    /// empties the dirty set.
    ///
    /// Calling this again without intervening mutations processes no nodes.
    ///
    /// # Panics
    ///
    /// Panics if a dirty node's parent is not registered, or no longer lists
    /// the node as a child.
    pub fn recompute_dirty(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.recompute_dirty_into(&mut changes);
        changes
    }

    /// Like [`recompute_dirty`](Self::recompute_dirty), but reuses a
    /// caller-provided buffer.
    pub fn recompute_dirty_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        let transforms = self.drain_ordered(dirty::TRANSFORM, Recalc::GLOBAL);
        let alphas = self.drain_ordered(dirty::ALPHA, Recalc::ALPHA);
        let clips = self.drain_ordered(dirty::CLIP, Recalc::CLIP);
        let stacking = self.drain_local(dirty::Z_ORDER);
        let bounds = self.drain_local(dirty::BOUNDS);
        let content = self.drain_local(dirty::CONTENT);

        let marked = core::mem::take(&mut self.marked);
        let marked_slots = marked.iter().filter_map(|id| self.index.get(id).copied());
        let mut seen = BTreeSet::new();
        let visit: Vec<u32> = transforms
            .iter()
            .chain(&alphas)
            .chain(&clips)
            .chain(&stacking)
            .chain(&content)
            .copied()
            .chain(marked_slots)
            .filter(|&slot| seen.insert(slot))
            .collect();
        if visit.is_empty() && bounds.is_empty() {
            return;
        }

        for &slot in &visit {
            self.resolve_references(slot);
            changes.recomputed.push(self.at(slot).id);
        }
        for &slot in &transforms {
            self.recompute_transform(slot, changes);
        }
        for &slot in &alphas {
            let parent_alpha = self.parent_slot(slot).map_or(1.0, |ps| self.at(ps).world_alpha);
            let node = self.at_mut(slot);
            node.world_alpha = node.alpha * parent_alpha;
            changes.alphas.push(node.id);
        }
        for &slot in &clips {
            self.recompute_clip(slot, changes);
        }
        for &slot in &visit {
            if self.at(slot).recalc.contains(Recalc::Z_ORDER) {
                self.sort_children(slot);
                changes.reordered.push(self.at(slot).id);
            }
        }
        changes.content = content.iter().map(|&slot| self.at(slot).id).collect();

        let mut bounds_work: BTreeSet<(Reverse<u32>, NodeId)> = bounds
            .iter()
            .map(|&slot| {
                let node = self.at(slot);
                (Reverse(node.depth), node.id)
            })
            .collect();
        while let Some((_, id)) = bounds_work.pop_first() {
            let Some(&slot) = self.index.get(&id) else {
                continue;
            };
            let aggregate = self.aggregate_child_bounds(slot);
            let node = self.at_mut(slot);
            node.recalc.remove(Recalc::BOUNDS);
            if node.children_bounds == aggregate {
                continue;
            }
            node.children_bounds = aggregate;
            let parent_ref = node.parent_ref;
            changes.bounds.push(id);
            if let Some(parent) = parent_ref.filter(|r| self.is_live(*r)) {
                let depth = self.at(parent.slot).depth;
                bounds_work.insert((Reverse(depth), parent.id));
            }
        }

        for slot in visit.into_iter().chain(bounds) {
            let node = self.at_mut(slot);
            node.recalc = Recalc::empty();
            node.update = UpdateMask::empty();
        }
    }

    /// Drains a propagating channel in dependency order and ORs `bit` into
    /// every drained node.
    fn drain_ordered(&mut self, channel: Channel, bit: Recalc) -> Vec<u32> {
        let mut slots: Vec<u32> = self
            .dirty
            .drain(channel)
            .affected()
            .deterministic()
            .run()
            .collect();
        slots.retain(|&slot| self.is_occupied(slot));
        for &slot in &slots {
            self.at_mut(slot).recalc |= bit;
        }
        slots
    }

    fn drain_local(&mut self, channel: Channel) -> Vec<u32> {
        let mut slots: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        slots.retain(|&slot| self.is_occupied(slot));
        slots
    }

    fn is_occupied(&self, slot: u32) -> bool {
        self.slots
            .get(slot as usize)
            .is_some_and(|s| s.node.is_some())
    }

    /// Step 1: cached children and parent references.
    fn resolve_references(&mut self, slot: u32) {
        let node = self.at(slot);
        let stale_children = node.update.contains(UpdateMask::CHILDREN)
            || node.children.iter().any(|r| !self.is_live(*r));
        if stale_children {
            let children = self.resolve_children(&node.child_ids);
            let node = self.at_mut(slot);
            node.children = children;
            node.recalc |= Recalc::Z_ORDER;
        }
        let _ = self.resolve_parent(slot);
    }

    /// Parent slot as resolved by [`resolve_references`](Self::resolve_references).
    fn parent_slot(&self, slot: u32) -> Option<u32> {
        let node = self.at(slot);
        node.parent?;
        node.parent_ref.map(|r| r.slot)
    }

    fn recompute_transform(&mut self, slot: u32, changes: &mut FrameChanges) {
        let parent_global = self.parent_slot(slot).map(|ps| self.at(ps).global);
        let node = self.at_mut(slot);
        let recalc = node.recalc;
        if recalc.contains(Recalc::SCALE_ROTATE) {
            node.scale_rotate =
                Matrix::from_rotation(node.rotation) * Matrix::from_scale(node.scale_x, node.scale_y);
        }
        if recalc.intersects(Recalc::TRANSLATE | Recalc::SCALE_ROTATE) {
            node.local = local_matrix(node);
        }
        node.global = match parent_global {
            Some(parent_global) => parent_global * node.local,
            None => node.local,
        };
        changes.transforms.push(node.id);
    }

    fn recompute_clip(&mut self, slot: u32, changes: &mut FrameChanges) {
        let parent_clip = self.parent_slot(slot).and_then(|ps| self.at(ps).clip_rect);
        let node = self.at_mut(slot);
        let transformed = node.recalc.intersects(Recalc::TRANSFORM);
        let input = (parent_clip, node.clipping);
        if !transformed && node.clip_input == Some(input) {
            return;
        }
        let clip = compute_clip(
            &node.global,
            node.width,
            node.height,
            node.clipping,
            parent_clip,
        );
        node.clip_input = Some(input);
        if node.clip_rect != clip {
            node.clip_rect = clip;
            changes.clips.push(node.id);
        }
    }

    /// Returns the parent's slot, re-resolving the cached reference when it
    /// is missing, flagged, or stale.
    fn resolve_parent(&mut self, slot: u32) -> Option<u32> {
        let node = self.at(slot);
        let parent = node.parent?;
        if !node.update.contains(UpdateMask::PARENT)
            && let Some(r) = node.parent_ref
            && r.id == parent
            && self.is_live(r)
        {
            return Some(r.slot);
        }

        let id = node.id;
        let Some(&ps) = self.index.get(&parent) else {
            panic!("parent {parent:?} of node {id:?} is not registered");
        };
        assert!(
            self.at(ps).child_ids.contains(&id),
            "parent {parent:?} of node {id:?} does not list it as a child"
        );
        let generation = self.slots[ps as usize].generation;
        self.at_mut(slot).parent_ref = Some(NodeRef {
            id: parent,
            slot: ps,
            generation,
        });
        Some(ps)
    }

    /// Sorts the resolved children by effective z-index, ties by id.
    fn sort_children(&mut self, slot: u32) {
        let node = self.at(slot);
        let cap = node.z_lock.then(|| self.effective_z_at(slot));
        let mut keyed: Vec<(i32, NodeId, NodeRef)> = node
            .children
            .iter()
            .map(|&r| {
                let z = self.live_slot(r).map_or(0, |cs| self.at(cs).z_index);
                let z = cap.map_or(z, |cap| z.min(cap));
                (z, r.id, r)
            })
            .collect();
        keyed.sort_unstable_by_key(|&(z, id, _)| (z, id));
        self.at_mut(slot).children = keyed.into_iter().map(|(.., r)| r).collect();
    }

    /// Union of each child's rect and descendant bounds, in this node's
    /// local space.
    fn aggregate_child_bounds(&self, slot: u32) -> Option<Rect> {
        self.at(slot)
            .children
            .iter()
            .filter_map(|&r| self.live_slot(r))
            .map(|cs| {
                let child = self.at(cs);
                let own = child.local.transform_rect_bbox(child.local_rect());
                match child.children_bounds {
                    Some(inner) => own.union(child.local.transform_rect_bbox(inner)),
                    None => own,
                }
            })
            .reduce(|a, b| a.union(b))
    }
}

/// `T(pivot - mount + position) · SR · T(-pivot)`, with pivot and mount
/// offsets scaled by the node size.
fn local_matrix(node: &SceneNode) -> Matrix {
    let px = node.pivot_x * node.width;
    let py = node.pivot_y * node.height;
    let mx = node.mount_x * node.width;
    let my = node.mount_y * node.height;
    Matrix::from_translation(px - mx + node.x, py - my + node.y)
        * node.scale_rotate
        * Matrix::from_translation(-px, -py)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::backend::NullLoader;
    use crate::graph::NodeProps;

    const EPS: f64 = 1e-9;

    fn assert_matrix_eq(a: Matrix, b: Matrix) {
        let pairs = [
            (a.ta, b.ta),
            (a.tb, b.tb),
            (a.tc, b.tc),
            (a.td, b.td),
            (a.tx, b.tx),
            (a.ty, b.ty),
        ];
        for (x, y) in pairs {
            assert!((x - y).abs() < EPS, "{a:?} != {b:?}");
        }
    }

    /// Root `1` at (0, 0, 100, 100) with child `2`.
    fn two_level() -> SceneGraph {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default().with_rect(0.0, 0.0, 100.0, 100.0));
        graph.create_node(
            NodeId(2),
            NodeProps::default()
                .with_parent(NodeId(1))
                .with_rect(10.0, 20.0, 30.0, 40.0),
        );
        graph
    }

    #[test]
    fn moving_a_node_moves_its_translation() {
        let mut graph = two_level();
        let _ = graph.recompute_dirty();
        graph.set_x(NodeId(1), 50.0);
        let _ = graph.recompute_dirty();
        let g = graph.node(NodeId(1)).global_transform();
        assert!((g.tx - 50.0).abs() < EPS, "tx = {}", g.tx);
        assert!((g.ty - 0.0).abs() < EPS);
    }

    #[test]
    fn global_is_parent_times_local() {
        let mut graph = two_level();
        graph.set_rotation(NodeId(1), 0.4);
        graph.set_scale(NodeId(2), 1.5);
        graph.set_mount_x(NodeId(2), 1.0);
        graph.set_pivot_y(NodeId(2), 0.0);
        let _ = graph.recompute_dirty();

        for _ in 0..3 {
            graph.set_x(NodeId(1), graph.node(NodeId(1)).x() + 7.0);
            graph.set_rotation(NodeId(2), graph.node(NodeId(2)).rotation() - 0.3);
            let _ = graph.recompute_dirty();
            let parent = graph.node(NodeId(1)).global_transform();
            let child = graph.node(NodeId(2));
            assert_matrix_eq(child.global_transform(), parent * child.local_transform());
        }
        let root = graph.node(NodeId(1));
        assert_eq!(root.global_transform(), root.local_transform());
    }

    #[test]
    fn pivot_rotation_keeps_center_fixed() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(0.0, 0.0, 100.0, 50.0)
                .with_rotation(core::f64::consts::FRAC_PI_2),
        );
        let _ = graph.recompute_dirty();
        let g = graph.node(NodeId(1)).global_transform();
        let center = g.apply(kurbo::Point::new(50.0, 25.0));
        assert!((center.x - 50.0).abs() < EPS && (center.y - 25.0).abs() < EPS);
    }

    #[test]
    fn mount_offsets_by_size() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(100.0, 100.0, 40.0, 20.0)
                .with_mount(0.5, 1.0),
        );
        let _ = graph.recompute_dirty();
        let g = graph.node(NodeId(1)).global_transform();
        assert!((g.tx - 80.0).abs() < EPS);
        assert!((g.ty - 80.0).abs() < EPS);
    }

    #[test]
    fn second_recompute_processes_nothing() {
        let mut graph = two_level();
        let first = graph.recompute_dirty();
        assert_eq!(first.recomputed, vec![NodeId(1), NodeId(2)]);
        let second = graph.recompute_dirty();
        assert!(second.is_empty(), "{second:?}");
        assert!(!graph.has_dirty_nodes());
    }

    #[test]
    fn each_node_recomputed_once_per_frame() {
        let mut graph = two_level();
        let _ = graph.recompute_dirty();
        graph.set_x(NodeId(2), 1.0);
        graph.set_y(NodeId(2), 2.0);
        graph.set_scale_x(NodeId(2), 2.0);
        graph.set_rotation(NodeId(1), 0.5);
        graph.set_alpha(NodeId(1), 0.5);
        let changes = graph.recompute_dirty();
        assert_eq!(changes.recomputed, vec![NodeId(1), NodeId(2)]);
        assert_eq!(changes.transforms, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn parents_before_children_regardless_of_id() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(9), NodeProps::default().with_position(5.0, 0.0));
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_parent(NodeId(9))
                .with_position(1.0, 0.0),
        );
        let changes = graph.recompute_dirty();
        assert_eq!(changes.recomputed, vec![NodeId(9), NodeId(1)]);
        assert!((graph.node(NodeId(1)).global_transform().tx - 6.0).abs() < EPS);
    }

    #[test]
    fn nested_clip_intersects() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(0.0, 0.0, 200.0, 200.0)
                .with_clipping(true),
        );
        graph.create_node(
            NodeId(2),
            NodeProps::default()
                .with_parent(NodeId(1))
                .with_rect(150.0, 0.0, 100.0, 100.0)
                .with_clipping(true),
        );
        let _ = graph.recompute_dirty();
        let clip = graph.node(NodeId(2)).clip_rect();
        assert_eq!(clip, Some(Rect::new(150.0, 0.0, 200.0, 100.0)));
        assert_eq!(clip.map(|r| r.width()), Some(50.0));
    }

    #[test]
    fn clip_follows_parent_changes() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(0.0, 0.0, 100.0, 100.0)
                .with_clipping(true),
        );
        graph.create_node(
            NodeId(2),
            NodeProps::default()
                .with_parent(NodeId(1))
                .with_rect(0.0, 0.0, 10.0, 10.0),
        );
        let _ = graph.recompute_dirty();
        assert_eq!(
            graph.node(NodeId(2)).clip_rect(),
            Some(Rect::new(0.0, 0.0, 100.0, 100.0)),
            "non-clipping child inherits"
        );

        graph.set_width(NodeId(1), 50.0);
        let changes = graph.recompute_dirty();
        assert!(changes.clips.contains(&NodeId(2)));
        assert_eq!(
            graph.node(NodeId(2)).clip_rect(),
            Some(Rect::new(0.0, 0.0, 50.0, 100.0))
        );

        graph.set_clipping(NodeId(1), false);
        let _ = graph.recompute_dirty();
        assert_eq!(graph.node(NodeId(2)).clip_rect(), None);
    }

    #[test]
    fn unchanged_parent_clip_short_circuits() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(0.0, 0.0, 100.0, 100.0)
                .with_clipping(true),
        );
        graph.create_node(NodeId(2), NodeProps::default().with_parent(NodeId(1)));
        let _ = graph.recompute_dirty();

        // Toggling the child's flag on and off again leaves its inputs equal.
        graph.set_clipping(NodeId(2), true);
        graph.set_clipping(NodeId(2), false);
        let changes = graph.recompute_dirty();
        assert_eq!(changes.recomputed, vec![NodeId(2)]);
        assert!(changes.clips.is_empty());
    }

    #[test]
    fn rotated_node_has_no_clip() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(0.0, 0.0, 100.0, 100.0)
                .with_clipping(true),
        );
        let _ = graph.recompute_dirty();
        assert!(graph.node(NodeId(1)).clip_rect().is_some());
        graph.set_rotation(NodeId(1), 0.2);
        let _ = graph.recompute_dirty();
        assert_eq!(graph.node(NodeId(1)).clip_rect(), None);
    }

    #[test]
    fn world_alpha_multiplies_down() {
        let mut graph = two_level();
        graph.set_alpha(NodeId(1), 0.5);
        graph.set_alpha(NodeId(2), 0.4);
        let _ = graph.recompute_dirty();
        assert!((graph.node(NodeId(2)).world_alpha() - 0.2).abs() < EPS);
        assert!((graph.world_alpha(NodeId(2)) - 0.2).abs() < EPS);
    }

    #[test]
    fn children_sorted_by_effective_z() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default());
        for (id, z) in [(2, 5), (3, -1), (4, 5), (5, 0)] {
            graph.create_node(
                NodeId(id),
                NodeProps::default().with_parent(NodeId(1)).with_z_index(z),
            );
        }
        let _ = graph.recompute_dirty();
        let order: Vec<_> = graph.children(NodeId(1)).collect();
        assert_eq!(order, vec![NodeId(3), NodeId(5), NodeId(2), NodeId(4)]);

        graph.set_z_index(NodeId(3), 10);
        let changes = graph.recompute_dirty();
        assert_eq!(changes.reordered, vec![NodeId(1)]);
        let order: Vec<_> = graph.children(NodeId(1)).collect();
        assert_eq!(order, vec![NodeId(5), NodeId(2), NodeId(4), NodeId(3)]);
    }

    #[test]
    fn locked_parent_clamps_sort_keys() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default().with_z_index(1).with_z_lock(true),
        );
        graph.create_node(
            NodeId(2),
            NodeProps::default().with_parent(NodeId(1)).with_z_index(9),
        );
        graph.create_node(
            NodeId(3),
            NodeProps::default().with_parent(NodeId(1)).with_z_index(0),
        );
        let _ = graph.recompute_dirty();
        // Both clamp to <= 1: keys (1, 2) and (0, 3).
        let order: Vec<_> = graph.children(NodeId(1)).collect();
        assert_eq!(order, vec![NodeId(3), NodeId(2)]);

        graph.set_z_index(NodeId(1), -5);
        let _ = graph.recompute_dirty();
        // Both clamp to -5: tie broken by id.
        let order: Vec<_> = graph.children(NodeId(1)).collect();
        assert_eq!(order, vec![NodeId(2), NodeId(3)]);
    }

    #[test]
    fn reparent_recomputes_subtree_under_new_parent() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default().with_position(10.0, 0.0));
        graph.create_node(NodeId(2), NodeProps::default().with_position(0.0, 100.0));
        graph.create_node(NodeId(3), NodeProps::default().with_parent(NodeId(1)));
        graph.create_node(
            NodeId(4),
            NodeProps::default()
                .with_parent(NodeId(3))
                .with_position(1.0, 1.0),
        );
        let _ = graph.recompute_dirty();
        assert!((graph.node(NodeId(4)).global_transform().tx - 11.0).abs() < EPS);

        graph.set_parent(NodeId(3), Some(NodeId(2)));
        let _ = graph.recompute_dirty();
        let g = graph.node(NodeId(4)).global_transform();
        assert!((g.tx - 1.0).abs() < EPS && (g.ty - 101.0).abs() < EPS);
        assert_eq!(graph.children(NodeId(1)).count(), 0);
        assert_eq!(graph.children(NodeId(2)).collect::<Vec<_>>(), vec![NodeId(3)]);
    }

    #[test]
    fn children_bounds_aggregate_upwards() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default().with_rect(0.0, 0.0, 10.0, 10.0));
        graph.create_node(
            NodeId(2),
            NodeProps::default()
                .with_parent(NodeId(1))
                .with_rect(5.0, 5.0, 10.0, 10.0),
        );
        graph.create_node(
            NodeId(3),
            NodeProps::default()
                .with_parent(NodeId(2))
                .with_rect(20.0, 0.0, 5.0, 5.0),
        );
        let _ = graph.recompute_dirty();
        assert_eq!(
            graph.node(NodeId(2)).children_bounds(),
            Some(Rect::new(20.0, 0.0, 25.0, 5.0))
        );
        assert_eq!(
            graph.node(NodeId(1)).children_bounds(),
            Some(Rect::new(5.0, 5.0, 30.0, 15.0))
        );

        graph.set_x(NodeId(3), 0.0);
        let changes = graph.recompute_dirty();
        assert_eq!(changes.bounds, vec![NodeId(2), NodeId(1)]);
        assert_eq!(
            graph.node(NodeId(1)).children_bounds(),
            Some(Rect::new(5.0, 5.0, 15.0, 15.0))
        );
    }

    #[test]
    fn destroyed_child_is_dropped_from_render_order() {
        let mut graph = two_level();
        let mut loader = NullLoader::new();
        let _ = graph.recompute_dirty();
        graph.destroy_node(NodeId(2), &mut loader);
        let _ = graph.recompute_dirty();
        assert_eq!(graph.children(NodeId(1)).count(), 0);
        assert_eq!(graph.node(NodeId(1)).children_bounds(), None);
    }

    #[test]
    #[should_panic(expected = "parent NodeId(1) of node NodeId(2) is not registered")]
    fn dangling_parent_panics() {
        let mut graph = two_level();
        let mut loader = NullLoader::new();
        let _ = graph.recompute_dirty();
        graph.destroy_node(NodeId(1), &mut loader);
        let _ = graph.recompute_dirty();
    }

    #[test]
    fn orphan_can_be_rescued_before_recompute() {
        let mut graph = two_level();
        let mut loader = NullLoader::new();
        let _ = graph.recompute_dirty();
        graph.destroy_node(NodeId(1), &mut loader);
        graph.set_parent(NodeId(2), None);
        let _ = graph.recompute_dirty();
        assert!((graph.node(NodeId(2)).global_transform().tx - 10.0).abs() < EPS);
    }

    #[test]
    #[should_panic(expected = "does not list it as a child")]
    fn reused_parent_id_is_rejected() {
        let mut graph = two_level();
        let mut loader = NullLoader::new();
        graph.destroy_node(NodeId(1), &mut loader);
        graph.create_node(NodeId(1), NodeProps::default());
        let _ = graph.recompute_dirty();
    }
}
