// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening the recomputed tree into draw primitives.

use alloc::vec::Vec;

use kurbo::Rect;

use super::id::NodeId;
use super::store::SceneGraph;
use crate::backend::QuadSink;
use crate::color::Color;
use crate::resource::{ShaderHandle, TextureRef};

/// A single draw primitive.
///
/// Geometry is the node's local rectangle `(0, 0, width, height)` mapped
/// through the transform coefficients, which follow
/// [`Matrix`](crate::matrix::Matrix) naming.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// The node that produced this quad.
    pub node: NodeId,
    /// Width in local space.
    pub width: f32,
    /// Height in local space.
    pub height: f32,
    /// Corner colors, indexed by the `CORNER_*` constants.
    pub colors: [Color; 4],
    /// Texture and its render options.
    pub texture: Option<TextureRef>,
    /// Shader, or `None` for the backend's default.
    pub shader: Option<ShaderHandle>,
    /// Product of own and ancestor opacities.
    pub alpha: f32,
    /// Global-space clip rectangle.
    pub clip: Option<Rect>,
    /// Linear coefficient `ta`.
    pub ta: f32,
    /// Linear coefficient `tb`.
    pub tb: f32,
    /// Linear coefficient `tc`.
    pub tc: f32,
    /// Linear coefficient `td`.
    pub td: f32,
    /// X translation.
    pub tx: f32,
    /// Y translation.
    pub ty: f32,
}

impl SceneGraph {
    /// Submits one [`Quad`] per visible node to `sink`, in z-order, and
    /// returns how many were submitted.
    ///
    /// Roots are visited by `(z_index, id)` and children in the order
    /// established by the last [`recompute_dirty`](Self::recompute_dirty).
    /// A node with zero accumulated alpha is skipped along with its whole
    /// subtree. A node with zero width or height, or whose clip rect has zero
    /// area, produces no quad but its children are still visited.
    pub fn extract(&self, sink: &mut dyn QuadSink) -> usize {
        let mut count = 0;
        let mut stack: Vec<(u32, f64)> = self
            .roots()
            .into_iter()
            .rev()
            .map(|id| (self.slot_of(id), 1.0))
            .collect();

        while let Some((slot, parent_alpha)) = stack.pop() {
            let node = self.at(slot);
            let alpha = parent_alpha * node.alpha;
            if alpha <= 0.0 {
                continue;
            }

            let clipped_away = node.clip_rect.is_some_and(|r| r.is_zero_area());
            if node.width > 0.0 && node.height > 0.0 && !clipped_away {
                let g = node.global;
                sink.submit_quad(&Quad {
                    node: node.id,
                    width: narrow(node.width),
                    height: narrow(node.height),
                    colors: node.colors,
                    texture: node.texture,
                    shader: node.shader,
                    alpha: narrow(alpha),
                    clip: node.clip_rect,
                    ta: narrow(g.ta),
                    tb: narrow(g.tb),
                    tc: narrow(g.tc),
                    td: narrow(g.td),
                    tx: narrow(g.tx),
                    ty: narrow(g.ty),
                });
                count += 1;
            }

            for &child in node.children.iter().rev() {
                if let Some(cs) = self.live_slot(child) {
                    stack.push((cs, alpha));
                }
            }
        }
        count
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "backends consume single-precision geometry"
)]
fn narrow(v: f64) -> f32 {
    v as f32
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::graph::NodeProps;

    fn drawn(graph: &SceneGraph) -> Vec<NodeId> {
        let mut quads: Vec<Quad> = Vec::new();
        let n = graph.extract(&mut quads);
        assert_eq!(n, quads.len());
        quads.iter().map(|q| q.node).collect()
    }

    #[test]
    fn depth_first_in_z_order() {
        let mut graph = SceneGraph::new();
        let sized = NodeProps::default().with_size(10.0, 10.0);
        graph.create_node(NodeId(1), sized.with_z_index(1));
        graph.create_node(NodeId(2), sized);
        graph.create_node(NodeId(3), sized.with_parent(NodeId(1)).with_z_index(2));
        graph.create_node(NodeId(4), sized.with_parent(NodeId(1)).with_z_index(-2));
        graph.create_node(NodeId(5), sized.with_parent(NodeId(4)));
        let _ = graph.recompute_dirty();
        assert_eq!(
            drawn(&graph),
            vec![NodeId(2), NodeId(1), NodeId(4), NodeId(5), NodeId(3)]
        );
    }

    #[test]
    fn zero_size_emits_nothing_but_children_draw() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default());
        graph.create_node(
            NodeId(2),
            NodeProps::default()
                .with_parent(NodeId(1))
                .with_size(4.0, 4.0),
        );
        let _ = graph.recompute_dirty();
        assert_eq!(drawn(&graph), vec![NodeId(2)]);
    }

    #[test]
    fn transparent_subtree_is_skipped() {
        let mut graph = SceneGraph::new();
        let sized = NodeProps::default().with_size(10.0, 10.0);
        graph.create_node(NodeId(1), sized.with_alpha(0.0));
        graph.create_node(NodeId(2), sized.with_parent(NodeId(1)));
        graph.create_node(NodeId(3), sized);
        let _ = graph.recompute_dirty();
        assert_eq!(drawn(&graph), vec![NodeId(3)]);
    }

    #[test]
    fn alpha_accumulates() {
        let mut graph = SceneGraph::new();
        let sized = NodeProps::default().with_size(10.0, 10.0);
        graph.create_node(NodeId(1), sized.with_alpha(0.5));
        graph.create_node(NodeId(2), sized.with_parent(NodeId(1)).with_alpha(0.5));
        let _ = graph.recompute_dirty();
        let mut quads: Vec<Quad> = Vec::new();
        let _ = graph.extract(&mut quads);
        assert!((quads[1].alpha - 0.25).abs() < 1e-6, "{}", quads[1].alpha);
    }

    #[test]
    fn fully_clipped_node_is_not_drawn() {
        let mut graph = SceneGraph::new();
        graph.create_node(
            NodeId(1),
            NodeProps::default()
                .with_rect(0.0, 0.0, 10.0, 10.0)
                .with_clipping(true),
        );
        graph.create_node(
            NodeId(2),
            NodeProps::default()
                .with_parent(NodeId(1))
                .with_rect(50.0, 50.0, 5.0, 5.0)
                .with_clipping(true),
        );
        let _ = graph.recompute_dirty();
        assert_eq!(drawn(&graph), vec![NodeId(1)]);
    }

    #[test]
    fn quad_carries_transform_and_clip() {
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
                .with_clipping(true)
                .with_color(Color(0xFF11_2233)),
        );
        let _ = graph.recompute_dirty();
        let mut quads: Vec<Quad> = Vec::new();
        let _ = graph.extract(&mut quads);
        let q = quads[1];
        assert_eq!(q.node, NodeId(2));
        assert_eq!((q.tx, q.ty), (150.0, 0.0));
        assert_eq!((q.ta, q.tb, q.tc, q.td), (1.0, 0.0, 0.0, 1.0));
        assert_eq!((q.width, q.height), (100.0, 100.0));
        assert_eq!(q.clip, Some(Rect::new(150.0, 0.0, 200.0, 100.0)));
        assert_eq!(q.colors, [Color(0xFF11_2233); 4]);
    }
}
