// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node registry with slot allocation, topology, and property setters.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::event::NodeEvent;
use super::id::{NodeId, NodeRef};
use super::node::{CORNER_BL, CORNER_BR, CORNER_UL, CORNER_UR, NodeProps, SceneNode};
use super::traverse::Children;
use crate::backend::ResourceLoader;
use crate::color::Color;
use crate::dirty::{self, Recalc, UpdateMask};
use crate::resource::{
    ResourceError, ShaderHandle, ShaderKind, TextureHandle, TextureKind, TextureOptions,
    TextureRef,
};

/// One arena slot. The generation is bumped every time the slot is freed.
#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<SceneNode>,
}

/// The scene graph: node arena, id index, dirty set and dependency tracker.
///
/// Nodes are addressed by caller-chosen [`NodeId`]s. Internally each node
/// occupies an arena slot; freed slots are recycled through a free list and
/// their generation counter is bumped so cached [`NodeRef`]s can detect
/// reuse.
///
/// Property setters compare against the current value and do nothing when it
/// is unchanged. Otherwise they record what derived state is owed (see
/// [`dirty`](crate::dirty)), put the node in the dirty set and mark the
/// matching tracker channel, which carries the work to descendants.
/// [`recompute_dirty`](Self::recompute_dirty) drains both once per frame.
#[derive(Debug)]
pub struct SceneGraph {
    // -- Allocation --
    pub(crate) slots: Vec<Slot>,
    pub(crate) free_list: Vec<u32>,

    // -- Lookup --
    pub(crate) index: BTreeMap<NodeId, u32>,

    // -- Frame working set --
    pub(crate) marked: BTreeSet<NodeId>,
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Notifications --
    pub(crate) events: Vec<NodeEvent>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            index: BTreeMap::new(),
            marked: BTreeSet::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            events: Vec::new(),
        }
    }

    // -- Registry API --

    /// Creates and registers a node.
    ///
    /// The node is appended to its parent's child list (if `props.parent` is
    /// set) and owes a full recomputation on the next frame.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered or the parent is not.
    pub fn create_node(&mut self, id: NodeId, props: NodeProps) -> NodeRef {
        assert!(
            !self.index.contains_key(&id),
            "node {id:?} is already registered"
        );
        let depth = match props.parent {
            Some(parent) => self.at(self.slot_of(parent)).depth + 1,
            None => 0,
        };

        let node = SceneNode::new(id, &props, depth);
        let slot = if let Some(slot) = self.free_list.pop() {
            self.slots[slot as usize].node = Some(node);
            slot
        } else {
            let slot = u32::try_from(self.slots.len()).unwrap_or_else(|_| {
                panic!("scene graph exceeded {} slots", u32::MAX);
            });
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            slot
        };
        self.index.insert(id, slot);

        if let Some(parent) = props.parent {
            let ps = self.slot_of(parent);
            self.at_mut(ps).child_ids.push(id);
            self.link(slot, ps);
            self.touch_update(ps, UpdateMask::CHILDREN, Recalc::Z_ORDER | Recalc::BOUNDS);
        }
        self.touch(slot, Recalc::all());

        NodeRef {
            id,
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    /// Destroys a node.
    ///
    /// The node is removed from its parent's child list, its texture and
    /// shader are handed back to `loader`, and it is deregistered. Its
    /// children are neither destroyed nor reparented: they keep the now
    /// dangling parent id and must be reparented or destroyed before the next
    /// [`recompute_dirty`](Self::recompute_dirty).
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn destroy_node(&mut self, id: NodeId, loader: &mut dyn ResourceLoader) {
        let slot = self.slot_of(id);

        if let Some(parent) = self.at(slot).parent
            && let Some(&ps) = self.index.get(&parent)
        {
            self.at_mut(ps).child_ids.retain(|&c| c != id);
            self.touch_update(ps, UpdateMask::CHILDREN, Recalc::Z_ORDER | Recalc::BOUNDS);
        }

        let orphans = core::mem::take(&mut self.at_mut(slot).child_ids);
        for child in orphans {
            if let Some(&cs) = self.index.get(&child) {
                self.touch_update(cs, UpdateMask::PARENT, Recalc::GLOBAL | Recalc::CLIP);
            }
        }

        let entry = &mut self.slots[slot as usize];
        if let Some(node) = entry.node.take() {
            if let Some(texture) = node.texture {
                loader.unload_texture(texture.handle);
            }
            if let Some(shader) = node.shader {
                loader.unload_shader(shader);
            }
        }
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(slot);
        self.index.remove(&id);
        self.marked.remove(&id);
        self.dirty.remove_key(slot);
    }

    /// Returns the node registered under `id`.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.index.get(&id).map(|&slot| self.at(slot))
    }

    /// Returns the node registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SceneNode {
        self.at(self.slot_of(id))
    }

    /// Returns whether `id` is registered.
    #[must_use]
    pub fn is_registered(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Returns a generation-checked reference to a registered node.
    #[must_use]
    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef> {
        self.index.get(&id).map(|&slot| NodeRef {
            id,
            slot,
            generation: self.slots[slot as usize].generation,
        })
    }

    /// Returns whether a cached reference still points at the node it was
    /// resolved against.
    #[must_use]
    pub fn is_live(&self, r: NodeRef) -> bool {
        self.slots
            .get(r.slot as usize)
            .is_some_and(|s| s.generation == r.generation && s.node.is_some())
    }

    /// Resolves each id to a live reference, silently dropping ids that are
    /// not registered. Order is preserved.
    #[must_use]
    pub fn resolve_children(&self, ids: &[NodeId]) -> Vec<NodeRef> {
        ids.iter().filter_map(|&id| self.node_ref(id)).collect()
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no nodes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All registered ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        self.index.keys().copied().collect()
    }

    /// Parentless nodes in drawing order (z-index, then id).
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<(i32, NodeId)> = self
            .index
            .values()
            .map(|&slot| self.at(slot))
            .filter(|node| node.parent.is_none())
            .map(|node| (node.z_index, node.id))
            .collect();
        roots.sort_unstable();
        roots.into_iter().map(|(_, id)| id).collect()
    }

    /// Children of `id` in drawing order, as of the last
    /// [`recompute_dirty`](Self::recompute_dirty).
    ///
    /// Use [`SceneNode::child_ids`] for the current insertion-order list.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children::new(&self.node(id).children)
    }

    // -- Dirty set API --

    /// Adds `id` to the dirty set without owing any specific recomputation.
    ///
    /// The node is visited by the next
    /// [`recompute_dirty`](Self::recompute_dirty) and reported as changed
    /// content.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let slot = self.slot_of(id);
        self.touch(slot, Recalc::empty());
    }

    /// Ids in the dirty set, ascending.
    ///
    /// These are the nodes mutated since the last recompute. Descendants that
    /// only inherit work from them are not listed, but are recomputed too.
    pub fn dirty_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.marked.iter().copied()
    }

    /// Number of nodes in the dirty set.
    #[must_use]
    pub fn dirty_node_count(&self) -> usize {
        self.marked.len()
    }

    /// Whether any node awaits recomputation.
    ///
    /// Inherited work only ever starts at a node in the dirty set, so an
    /// empty set means the next recompute has nothing to do.
    #[must_use]
    pub fn has_dirty_nodes(&self) -> bool {
        !self.marked.is_empty()
    }

    /// Discards all pending work: drains every tracker channel, empties the
    /// dirty set and clears the masks of the nodes it contained.
    pub fn clear_dirty(&mut self) {
        for channel in dirty::ALL {
            let _: Vec<u32> = self.dirty.drain(channel).deterministic().run().collect();
        }
        let marked = core::mem::take(&mut self.marked);
        for id in marked {
            if let Some(&slot) = self.index.get(&id) {
                let node = self.at_mut(slot);
                node.recalc = Recalc::empty();
                node.update = UpdateMask::empty();
            }
        }
    }

    // -- Topology API --

    /// Moves `id` under `parent`, or makes it a root when `parent` is `None`.
    ///
    /// Removal from the old parent's child list and insertion into the new
    /// one happen together; the node is appended last among its new
    /// siblings.
    ///
    /// # Panics
    ///
    /// Panics if either node is not registered, or if `parent` is `id` itself
    /// or one of its descendants.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        let slot = self.slot_of(id);
        let old = self.at(slot).parent;
        if old == parent {
            return;
        }

        let new_parent_slot = parent.map(|p| {
            let ps = self.slot_of(p);
            let mut cursor = Some(p);
            while let Some(c) = cursor {
                assert!(
                    c != id,
                    "reparenting {id:?} under {p:?} would create a cycle"
                );
                cursor = self.index.get(&c).and_then(|&s| self.at(s).parent);
            }
            ps
        });

        if let Some(o) = old
            && let Some(&os) = self.index.get(&o)
        {
            self.at_mut(os).child_ids.retain(|&c| c != id);
            self.unlink(slot, os);
            self.touch_update(os, UpdateMask::CHILDREN, Recalc::Z_ORDER | Recalc::BOUNDS);
        }
        let depth = match new_parent_slot {
            Some(ps) => {
                self.at_mut(ps).child_ids.push(id);
                self.link(slot, ps);
                self.touch_update(ps, UpdateMask::CHILDREN, Recalc::Z_ORDER | Recalc::BOUNDS);
                self.at(ps).depth + 1
            }
            None => 0,
        };

        let node = self.at_mut(slot);
        node.parent = parent;
        node.parent_ref = None;
        // Marks the whole moved subtree through the new edges.
        self.touch_update(
            slot,
            UpdateMask::PARENT,
            Recalc::GLOBAL | Recalc::CLIP | Recalc::ALPHA,
        );
        self.set_subtree_depth(slot, depth);
        if self.at(slot).z_lock {
            self.z_children_changed(slot);
        }
    }

    /// Makes `id` a root.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered or has no parent.
    pub fn detach(&mut self, id: NodeId) {
        assert!(
            self.node(id).parent.is_some(),
            "node {id:?} has no parent to detach from"
        );
        self.set_parent(id, None);
    }

    // -- Derived queries --

    /// Z-index after clamping by every locked ancestor in the parent chain.
    ///
    /// When a node's parent has z-locking enabled, the node's effective
    /// z-index is no greater than the parent's effective z-index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn effective_z_index(&self, id: NodeId) -> i32 {
        self.effective_z_at(self.slot_of(id))
    }

    /// Product of the node's opacity and all its ancestors', computed now.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn world_alpha(&self, id: NodeId) -> f64 {
        let mut node = self.node(id);
        let mut alpha = node.alpha;
        while let Some(parent) = node.parent.and_then(|p| self.get(p)) {
            alpha *= parent.alpha;
            node = parent;
        }
        alpha
    }

    // -- Geometry setters --

    /// Sets the x position.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn set_x(&mut self, id: NodeId, x: f64) {
        if let Some(slot) = self.replace_f64(id, x, |n| &mut n.x) {
            self.translated(slot);
        }
    }

    /// Sets the y position.
    pub fn set_y(&mut self, id: NodeId, y: f64) {
        if let Some(slot) = self.replace_f64(id, y, |n| &mut n.y) {
            self.translated(slot);
        }
    }

    /// Sets both position coordinates.
    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
        self.set_x(id, x);
        self.set_y(id, y);
    }

    /// Sets the width.
    pub fn set_width(&mut self, id: NodeId, width: f64) {
        if let Some(slot) = self.replace_f64(id, width, |n| &mut n.width) {
            self.translated(slot);
        }
    }

    /// Sets the height.
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        if let Some(slot) = self.replace_f64(id, height, |n| &mut n.height) {
            self.translated(slot);
        }
    }

    /// Sets width and height.
    pub fn set_size(&mut self, id: NodeId, width: f64, height: f64) {
        self.set_width(id, width);
        self.set_height(id, height);
    }

    /// Sets the horizontal scale.
    pub fn set_scale_x(&mut self, id: NodeId, scale_x: f64) {
        if let Some(slot) = self.replace_f64(id, scale_x, |n| &mut n.scale_x) {
            self.scaled_or_rotated(slot);
        }
    }

    /// Sets the vertical scale.
    pub fn set_scale_y(&mut self, id: NodeId, scale_y: f64) {
        if let Some(slot) = self.replace_f64(id, scale_y, |n| &mut n.scale_y) {
            self.scaled_or_rotated(slot);
        }
    }

    /// Sets a uniform scale.
    pub fn set_scale(&mut self, id: NodeId, scale: f64) {
        self.set_scale_x(id, scale);
        self.set_scale_y(id, scale);
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&mut self, id: NodeId, rotation: f64) {
        if let Some(slot) = self.replace_f64(id, rotation, |n| &mut n.rotation) {
            self.scaled_or_rotated(slot);
        }
    }

    /// Sets the normalized horizontal mount point.
    pub fn set_mount_x(&mut self, id: NodeId, mount_x: f64) {
        if let Some(slot) = self.replace_f64(id, mount_x, |n| &mut n.mount_x) {
            self.translated(slot);
        }
    }

    /// Sets the normalized vertical mount point.
    pub fn set_mount_y(&mut self, id: NodeId, mount_y: f64) {
        if let Some(slot) = self.replace_f64(id, mount_y, |n| &mut n.mount_y) {
            self.translated(slot);
        }
    }

    /// Sets the normalized horizontal pivot point.
    pub fn set_pivot_x(&mut self, id: NodeId, pivot_x: f64) {
        if let Some(slot) = self.replace_f64(id, pivot_x, |n| &mut n.pivot_x) {
            self.translated(slot);
        }
    }

    /// Sets the normalized vertical pivot point.
    pub fn set_pivot_y(&mut self, id: NodeId, pivot_y: f64) {
        if let Some(slot) = self.replace_f64(id, pivot_y, |n| &mut n.pivot_y) {
            self.translated(slot);
        }
    }

    // -- Visual setters --

    /// Sets the opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        if let Some(slot) = self.replace_f64(id, alpha.clamp(0.0, 1.0), |n| &mut n.alpha) {
            self.touch(slot, Recalc::ALPHA);
        }
    }

    /// Enables or disables clipping of descendants.
    pub fn set_clipping(&mut self, id: NodeId, clipping: bool) {
        let slot = self.slot_of(id);
        if self.at(slot).clipping == clipping {
            return;
        }
        self.at_mut(slot).clipping = clipping;
        self.touch(slot, Recalc::CLIP);
    }

    /// Sets all four corner colors.
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        self.set_corners(id, &[CORNER_UL, CORNER_UR, CORNER_BL, CORNER_BR], color);
    }

    /// Sets the two upper corner colors.
    pub fn set_color_top(&mut self, id: NodeId, color: Color) {
        self.set_corners(id, &[CORNER_UL, CORNER_UR], color);
    }

    /// Sets the two lower corner colors.
    pub fn set_color_bottom(&mut self, id: NodeId, color: Color) {
        self.set_corners(id, &[CORNER_BL, CORNER_BR], color);
    }

    /// Sets the two left corner colors.
    pub fn set_color_left(&mut self, id: NodeId, color: Color) {
        self.set_corners(id, &[CORNER_UL, CORNER_BL], color);
    }

    /// Sets the two right corner colors.
    pub fn set_color_right(&mut self, id: NodeId, color: Color) {
        self.set_corners(id, &[CORNER_UR, CORNER_BR], color);
    }

    /// Sets one corner color by `CORNER_*` index.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered or `corner > 3`.
    pub fn set_corner_color(&mut self, id: NodeId, corner: usize, color: Color) {
        assert!(corner < 4, "corner index {corner} out of range");
        self.set_corners(id, &[corner], color);
    }

    // -- Stacking setters --

    /// Sets the z-index.
    pub fn set_z_index(&mut self, id: NodeId, z_index: i32) {
        let slot = self.slot_of(id);
        if self.at(slot).z_index == z_index {
            return;
        }
        self.at_mut(slot).z_index = z_index;
        // Register the node itself even if nothing of its own is owed.
        self.touch(slot, Recalc::empty());
        self.z_changed(slot);
    }

    /// Enables or disables clamping of children to this node's effective
    /// z-index.
    pub fn set_z_lock(&mut self, id: NodeId, z_lock: bool) {
        let slot = self.slot_of(id);
        if self.at(slot).z_lock == z_lock {
            return;
        }
        self.at_mut(slot).z_lock = z_lock;
        self.z_children_changed(slot);
    }

    // -- Resource setters --

    /// Requests a texture from `loader` and attaches it, releasing the
    /// previous one afterwards.
    pub fn set_texture(
        &mut self,
        id: NodeId,
        kind: TextureKind,
        params: &str,
        options: TextureOptions,
        loader: &mut dyn ResourceLoader,
    ) -> TextureHandle {
        let slot = self.slot_of(id);
        let handle = loader.load_texture(kind, params, &options);
        let previous = self
            .at_mut(slot)
            .texture
            .replace(TextureRef { handle, options });
        if let Some(previous) = previous {
            loader.unload_texture(previous.handle);
        }
        self.touch(slot, Recalc::empty());
        handle
    }

    /// Changes the render-time options of the current texture.
    pub fn set_texture_options(&mut self, id: NodeId, options: TextureOptions) {
        let slot = self.slot_of(id);
        let node = self.at_mut(slot);
        match &mut node.texture {
            Some(texture) if texture.options != options => texture.options = options,
            _ => return,
        }
        self.touch(slot, Recalc::empty());
    }

    /// Detaches and releases the current texture.
    pub fn clear_texture(&mut self, id: NodeId, loader: &mut dyn ResourceLoader) {
        let slot = self.slot_of(id);
        if let Some(previous) = self.at_mut(slot).texture.take() {
            loader.unload_texture(previous.handle);
            self.touch(slot, Recalc::empty());
        }
    }

    /// Requests a shader from `loader` and attaches it, releasing the
    /// previous one afterwards.
    pub fn set_shader(
        &mut self,
        id: NodeId,
        kind: ShaderKind,
        params: &[f32],
        loader: &mut dyn ResourceLoader,
    ) -> ShaderHandle {
        let slot = self.slot_of(id);
        let handle = loader.load_shader(kind, params);
        if let Some(previous) = self.at_mut(slot).shader.replace(handle) {
            loader.unload_shader(previous);
        }
        self.touch(slot, Recalc::empty());
        handle
    }

    /// Detaches and releases the current shader.
    pub fn clear_shader(&mut self, id: NodeId, loader: &mut dyn ResourceLoader) {
        let slot = self.slot_of(id);
        if let Some(previous) = self.at_mut(slot).shader.take() {
            loader.unload_shader(previous);
            self.touch(slot, Recalc::empty());
        }
    }

    // -- Resource notifications --

    /// Reports that `texture` finished loading with the given pixel size.
    ///
    /// Every node using the texture is redrawn; nodes with zero width and
    /// height adopt the texture's size. A
    /// [`TextureLoaded`](NodeEvent::TextureLoaded) event is queued per node.
    pub fn notify_texture_loaded(&mut self, texture: TextureHandle, width: u32, height: u32) {
        for slot in self.slots_using_texture(texture) {
            let node = self.at(slot);
            let id = node.id;
            if node.width == 0.0 && node.height == 0.0 {
                self.set_size(id, f64::from(width), f64::from(height));
            } else {
                self.touch(slot, Recalc::empty());
            }
            self.events.push(NodeEvent::TextureLoaded {
                node: id,
                texture,
                width,
                height,
            });
        }
    }

    /// Reports that `texture` could not be loaded.
    ///
    /// Nodes using it drop the reference, hand it back to `loader` and
    /// render untextured.
    pub fn notify_texture_failed(
        &mut self,
        texture: TextureHandle,
        error: &ResourceError,
        loader: &mut dyn ResourceLoader,
    ) {
        for slot in self.slots_using_texture(texture) {
            let node = self.at_mut(slot);
            node.texture = None;
            let id = node.id;
            loader.unload_texture(texture);
            self.touch(slot, Recalc::empty());
            self.events.push(NodeEvent::TextureFailed {
                node: id,
                texture,
                error: error.clone(),
            });
        }
    }

    /// Reports that `shader` could not be compiled.
    ///
    /// Nodes using it hand it back to `loader` and fall back to the default
    /// shader.
    pub fn notify_shader_failed(
        &mut self,
        shader: ShaderHandle,
        error: &ResourceError,
        loader: &mut dyn ResourceLoader,
    ) {
        let slots: Vec<u32> = self
            .index
            .values()
            .copied()
            .filter(|&s| self.at(s).shader == Some(shader))
            .collect();
        for slot in slots {
            let node = self.at_mut(slot);
            node.shader = None;
            let id = node.id;
            loader.unload_shader(shader);
            self.touch(slot, Recalc::empty());
            self.events.push(NodeEvent::ShaderFailed {
                node: id,
                shader,
                error: error.clone(),
            });
        }
    }

    /// Node events queued since the last [`drain_events`](Self::drain_events).
    #[must_use]
    pub fn pending_events(&self) -> &[NodeEvent] {
        &self.events
    }

    /// Takes all queued node events, oldest first.
    ///
    /// Nothing else empties the queue, so call this once per frame.
    pub fn drain_events(&mut self) -> Vec<NodeEvent> {
        core::mem::take(&mut self.events)
    }

    // -- Internal helpers --

    /// Returns the slot for `id`, panicking if it is not registered.
    pub(crate) fn slot_of(&self, id: NodeId) -> u32 {
        match self.index.get(&id) {
            Some(&slot) => slot,
            None => panic!("node {id:?} is not registered"),
        }
    }

    pub(crate) fn at(&self, slot: u32) -> &SceneNode {
        match &self.slots[slot as usize].node {
            Some(node) => node,
            None => unreachable!("slot {slot} is vacant"),
        }
    }

    pub(crate) fn at_mut(&mut self, slot: u32) -> &mut SceneNode {
        match &mut self.slots[slot as usize].node {
            Some(node) => node,
            None => unreachable!("slot {slot} is vacant"),
        }
    }

    /// Resolves a cached reference to a slot, falling back to the id when
    /// the generation has diverged.
    pub(crate) fn live_slot(&self, r: NodeRef) -> Option<u32> {
        if self.is_live(r) {
            Some(r.slot)
        } else {
            self.index.get(&r.id).copied()
        }
    }

    pub(crate) fn effective_z_at(&self, slot: u32) -> i32 {
        let node = self.at(slot);
        match node.parent.and_then(|p| self.index.get(&p)) {
            Some(&ps) if self.at(ps).z_lock => node.z_index.min(self.effective_z_at(ps)),
            _ => node.z_index,
        }
    }

    /// Writes `value` into the field selected by `field` if it differs,
    /// returning the node's slot when a write happened.
    fn replace_f64(
        &mut self,
        id: NodeId,
        value: f64,
        field: fn(&mut SceneNode) -> &mut f64,
    ) -> Option<u32> {
        let slot = self.slot_of(id);
        let current = field(self.at_mut(slot));
        // Bitwise, so a repeated NaN is still recognized as unchanged.
        if current.to_bits() == value.to_bits() {
            return None;
        }
        *current = value;
        Some(slot)
    }

    fn set_corners(&mut self, id: NodeId, corners: &[usize], color: Color) {
        let slot = self.slot_of(id);
        let node = self.at_mut(slot);
        let mut changed = false;
        for &corner in corners {
            if node.colors[corner] != color {
                node.colors[corner] = color;
                changed = true;
            }
        }
        if changed {
            self.touch(slot, Recalc::empty());
        }
    }

    fn slots_using_texture(&self, texture: TextureHandle) -> Vec<u32> {
        self.index
            .values()
            .copied()
            .filter(|&s| self.at(s).texture.is_some_and(|t| t.handle == texture))
            .collect()
    }

    /// ORs `bits` into the node, adds it to the dirty set and marks the
    /// tracker channel of each owed kind.
    pub(crate) fn touch(&mut self, slot: u32, bits: Recalc) {
        let node = self.at_mut(slot);
        node.recalc |= bits;
        let id = node.id;
        self.marked.insert(id);

        if bits.intersects(Recalc::TRANSFORM) {
            self.dirty.mark_with(slot, dirty::TRANSFORM, &EagerPolicy);
            self.dirty.mark_with(slot, dirty::CLIP, &EagerPolicy);
        } else if bits.contains(Recalc::CLIP) {
            self.dirty.mark_with(slot, dirty::CLIP, &EagerPolicy);
        }
        if bits.contains(Recalc::ALPHA) {
            self.dirty.mark_with(slot, dirty::ALPHA, &EagerPolicy);
        }
        if bits.contains(Recalc::Z_ORDER) {
            self.dirty.mark(slot, dirty::Z_ORDER);
        }
        if bits.contains(Recalc::BOUNDS) {
            self.dirty.mark(slot, dirty::BOUNDS);
        }
        if bits.is_empty() {
            self.dirty.mark(slot, dirty::CONTENT);
        }
    }

    /// Makes `child` depend on `parent` for every inherited channel.
    fn link(&mut self, child: u32, parent: u32) {
        for channel in dirty::PROPAGATING {
            let _ = self.dirty.add_dependency(child, parent, channel);
        }
    }

    fn unlink(&mut self, child: u32, parent: u32) {
        for channel in dirty::PROPAGATING {
            self.dirty.remove_dependency(child, parent, channel);
        }
    }

    fn touch_update(&mut self, slot: u32, mask: UpdateMask, bits: Recalc) {
        self.at_mut(slot).update |= mask;
        self.touch(slot, bits);
    }

    fn touch_parent(&mut self, slot: u32, bits: Recalc) {
        if let Some(parent) = self.at(slot).parent
            && let Some(&ps) = self.index.get(&parent)
        {
            self.touch(ps, bits);
        }
    }

    /// Position, size, mount or pivot changed.
    fn translated(&mut self, slot: u32) {
        self.touch(slot, Recalc::TRANSLATE);
        self.touch_parent(slot, Recalc::BOUNDS);
    }

    /// Scale or rotation changed.
    fn scaled_or_rotated(&mut self, slot: u32) {
        self.touch(slot, Recalc::SCALE_ROTATE);
        self.touch_parent(slot, Recalc::BOUNDS);
    }

    /// The node's effective z-index may have changed: its siblings need
    /// re-sorting, and so do its children if it locks them.
    fn z_changed(&mut self, slot: u32) {
        self.touch_parent(slot, Recalc::Z_ORDER);
        if self.at(slot).z_lock {
            self.z_children_changed(slot);
        }
    }

    /// The effective z-index of every child of `slot` may have changed.
    fn z_children_changed(&mut self, slot: u32) {
        self.touch(slot, Recalc::Z_ORDER);
        let children = self.at(slot).child_ids.clone();
        for child in children {
            if let Some(&cs) = self.index.get(&child)
                && self.at(cs).z_lock
            {
                self.z_children_changed(cs);
            }
        }
    }

    fn set_subtree_depth(&mut self, slot: u32, depth: u32) {
        let mut stack = alloc::vec![(slot, depth)];
        while let Some((s, d)) = stack.pop() {
            let node = self.at_mut(s);
            node.depth = d;
            let children = node.child_ids.clone();
            for child in children {
                if let Some(&cs) = self.index.get(&child) {
                    stack.push((cs, d + 1));
                }
            }
        }
    }
}
