// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node state.

use alloc::vec::Vec;

use kurbo::Rect;

use super::id::{NodeId, NodeRef};
use crate::color::Color;
use crate::dirty::{Recalc, UpdateMask};
use crate::matrix::Matrix;
use crate::resource::{ShaderHandle, TextureRef};

/// Index of the upper-left corner in a node's color array.
pub const CORNER_UL: usize = 0;
/// Index of the upper-right corner in a node's color array.
pub const CORNER_UR: usize = 1;
/// Index of the bottom-left corner in a node's color array.
pub const CORNER_BL: usize = 2;
/// Index of the bottom-right corner in a node's color array.
pub const CORNER_BR: usize = 3;

/// Initial property set for [`SceneGraph::create_node`](super::SceneGraph::create_node).
///
/// Defaults: origin position, zero size, unit scale, no rotation, mount at
/// the top-left corner, pivot at the center, opaque white, fully opaque, no
/// clipping, z-index 0, unlocked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeProps {
    /// Parent node, or `None` for a root.
    pub parent: Option<NodeId>,
    /// X position in parent space.
    pub x: f64,
    /// Y position in parent space.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Normalized horizontal mount point.
    pub mount_x: f64,
    /// Normalized vertical mount point.
    pub mount_y: f64,
    /// Normalized horizontal pivot point.
    pub pivot_x: f64,
    /// Normalized vertical pivot point.
    pub pivot_y: f64,
    /// Uniform color applied to all four corners.
    pub color: Color,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Whether the node clips its descendants.
    pub clipping: bool,
    /// Stacking order among siblings.
    pub z_index: i32,
    /// Whether children are clamped to this node's effective z-index.
    pub z_lock: bool,
}

impl Default for NodeProps {
    fn default() -> Self {
        Self {
            parent: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            mount_x: 0.0,
            mount_y: 0.0,
            pivot_x: 0.5,
            pivot_y: 0.5,
            color: Color::WHITE,
            alpha: 1.0,
            clipping: false,
            z_index: 0,
            z_lock: false,
        }
    }
}

impl NodeProps {
    /// Sets the parent.
    #[must_use]
    pub const fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the position.
    #[must_use]
    pub const fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the size.
    #[must_use]
    pub const fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets position and size at once.
    #[must_use]
    pub const fn with_rect(self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.with_position(x, y).with_size(width, height)
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Sets the rotation in radians.
    #[must_use]
    pub const fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the mount point.
    #[must_use]
    pub const fn with_mount(mut self, mount_x: f64, mount_y: f64) -> Self {
        self.mount_x = mount_x;
        self.mount_y = mount_y;
        self
    }

    /// Sets the pivot point.
    #[must_use]
    pub const fn with_pivot(mut self, pivot_x: f64, pivot_y: f64) -> Self {
        self.pivot_x = pivot_x;
        self.pivot_y = pivot_y;
        self
    }

    /// Sets the uniform color.
    #[must_use]
    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the opacity.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Enables or disables clipping.
    #[must_use]
    pub const fn with_clipping(mut self, clipping: bool) -> Self {
        self.clipping = clipping;
        self
    }

    /// Sets the z-index.
    #[must_use]
    pub const fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Enables or disables z-index locking for children.
    #[must_use]
    pub const fn with_z_lock(mut self, z_lock: bool) -> Self {
        self.z_lock = z_lock;
        self
    }
}

/// A drawable node.
///
/// Obtained read-only from [`SceneGraph::get`](super::SceneGraph::get);
/// all mutation goes through `SceneGraph` setters so dirty state stays
/// consistent.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub(crate) id: NodeId,

    // -- Topology (authoritative) --
    pub(crate) parent: Option<NodeId>,
    pub(crate) child_ids: Vec<NodeId>,
    pub(crate) depth: u32,

    // -- Cached resolution --
    pub(crate) parent_ref: Option<NodeRef>,
    pub(crate) children: Vec<NodeRef>,

    // -- Properties --
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
    pub(crate) rotation: f64,
    pub(crate) mount_x: f64,
    pub(crate) mount_y: f64,
    pub(crate) pivot_x: f64,
    pub(crate) pivot_y: f64,
    pub(crate) colors: [Color; 4],
    pub(crate) alpha: f64,
    pub(crate) clipping: bool,
    pub(crate) z_index: i32,
    pub(crate) z_lock: bool,
    pub(crate) texture: Option<TextureRef>,
    pub(crate) shader: Option<ShaderHandle>,

    // -- Derived (written by recompute) --
    pub(crate) local: Matrix,
    pub(crate) scale_rotate: Matrix,
    pub(crate) global: Matrix,
    pub(crate) world_alpha: f64,
    pub(crate) clip_rect: Option<Rect>,
    pub(crate) clip_input: Option<(Option<Rect>, bool)>,
    pub(crate) children_bounds: Option<Rect>,

    // -- Dirty state --
    pub(crate) recalc: Recalc,
    pub(crate) update: UpdateMask,
}

impl SceneNode {
    pub(crate) fn new(id: NodeId, props: &NodeProps, depth: u32) -> Self {
        Self {
            id,
            parent: props.parent,
            child_ids: Vec::new(),
            depth,
            parent_ref: None,
            children: Vec::new(),
            x: props.x,
            y: props.y,
            width: props.width,
            height: props.height,
            scale_x: props.scale_x,
            scale_y: props.scale_y,
            rotation: props.rotation,
            mount_x: props.mount_x,
            mount_y: props.mount_y,
            pivot_x: props.pivot_x,
            pivot_y: props.pivot_y,
            colors: [props.color; 4],
            alpha: props.alpha.clamp(0.0, 1.0),
            clipping: props.clipping,
            z_index: props.z_index,
            z_lock: props.z_lock,
            texture: None,
            shader: None,
            local: Matrix::IDENTITY,
            scale_rotate: Matrix::IDENTITY,
            global: Matrix::IDENTITY,
            world_alpha: 1.0,
            clip_rect: None,
            clip_input: None,
            children_bounds: None,
            recalc: Recalc::all(),
            update: UpdateMask::all(),
        }
    }

    /// The node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The parent id, if any.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order.
    #[must_use]
    pub fn child_ids(&self) -> &[NodeId] {
        &self.child_ids
    }

    /// Distance from the root (roots are at depth 0).
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// X position in parent space.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y position in parent space.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Horizontal scale.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    /// Vertical scale.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Normalized mount point.
    #[must_use]
    pub fn mount(&self) -> (f64, f64) {
        (self.mount_x, self.mount_y)
    }

    /// Normalized pivot point.
    #[must_use]
    pub fn pivot(&self) -> (f64, f64) {
        (self.pivot_x, self.pivot_y)
    }

    /// Corner colors, indexed by the `CORNER_*` constants.
    #[must_use]
    pub fn colors(&self) -> [Color; 4] {
        self.colors
    }

    /// Own opacity.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether the node clips its descendants.
    #[must_use]
    pub fn clipping(&self) -> bool {
        self.clipping
    }

    /// Own z-index, before any clamping by a locked parent.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Whether children are clamped to this node's effective z-index.
    #[must_use]
    pub fn z_lock(&self) -> bool {
        self.z_lock
    }

    /// Current texture reference.
    #[must_use]
    pub fn texture(&self) -> Option<TextureRef> {
        self.texture
    }

    /// Current shader.
    #[must_use]
    pub fn shader(&self) -> Option<ShaderHandle> {
        self.shader
    }

    /// Local transform as of the last recompute.
    #[must_use]
    pub fn local_transform(&self) -> Matrix {
        self.local
    }

    /// Global transform as of the last recompute.
    #[must_use]
    pub fn global_transform(&self) -> Matrix {
        self.global
    }

    /// Product of own and ancestor opacities as of the last recompute.
    #[must_use]
    pub fn world_alpha(&self) -> f64 {
        self.world_alpha
    }

    /// Effective clip rectangle in global space, if clipped.
    #[must_use]
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_rect
    }

    /// Union of the children's extents in this node's local space.
    #[must_use]
    pub fn children_bounds(&self) -> Option<Rect> {
        self.children_bounds
    }

    /// Pending recomputation bits set on this node by its own mutations.
    ///
    /// Inherited work (an ancestor moved, faded or toggled clipping) is held
    /// by the graph's dependency tracker and folded in during
    /// [`recompute_dirty`](super::SceneGraph::recompute_dirty).
    #[must_use]
    pub fn recalc(&self) -> Recalc {
        self.recalc
    }

    /// Pending reference re-resolution bits.
    #[must_use]
    pub fn update_mask(&self) -> UpdateMask {
        self.update
    }

    /// The node's own rectangle in local space.
    #[must_use]
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn props_builder_chain() {
        let p = NodeProps::default()
            .with_parent(NodeId(1))
            .with_rect(1.0, 2.0, 3.0, 4.0)
            .with_z_index(5)
            .with_clipping(true);
        assert_eq!(p.parent, Some(NodeId(1)));
        assert_eq!((p.x, p.y, p.width, p.height), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(p.z_index, 5);
        assert!(p.clipping, "clipping set through builder");
        assert_eq!((p.pivot_x, p.pivot_y), (0.5, 0.5));
    }

    #[test]
    fn new_node_owes_everything() {
        let n = SceneNode::new(NodeId(3), &NodeProps::default().with_alpha(4.0), 0);
        assert_eq!(n.recalc(), Recalc::all());
        assert_eq!(n.update_mask(), UpdateMask::all());
        assert_eq!(n.alpha(), 1.0, "alpha is clamped on creation");
        assert_eq!(n.colors(), [Color::WHITE; 4]);
    }
}
