// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text dump of a scene graph.
//!
//! [`dump_tree`] writes one line per node, indented by depth, in drawing
//! order. Derived values (global translation, world alpha, clip) are those of
//! the last [`recompute_dirty`](stratum_core::graph::SceneGraph::recompute_dirty);
//! nodes still waiting for recomputation are flagged with `*`.

use std::io::{self, Write};

use stratum_core::graph::{NodeId, SceneGraph};

/// Writes the whole graph, roots first, children indented under parents.
pub fn dump_tree(graph: &SceneGraph, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(
        writer,
        "scene: {} nodes, {} dirty",
        graph.len(),
        graph.dirty_node_count()
    )?;
    for root in graph.roots() {
        dump_node(graph, root, 1, writer)?;
    }
    Ok(())
}

fn dump_node(
    graph: &SceneGraph,
    id: NodeId,
    indent: usize,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let Some(node) = graph.get(id) else {
        return writeln!(writer, "{:indent$}{id:?} <destroyed>", "", indent = indent * 2);
    };
    let g = node.global_transform();
    write!(
        writer,
        "{:indent$}{id:?}{} pos=({}, {}) size={}x{} at=({:.1}, {:.1}) alpha={:.2} z={}",
        "",
        if node.recalc().is_empty() { "" } else { "*" },
        node.x(),
        node.y(),
        node.width(),
        node.height(),
        g.tx,
        g.ty,
        node.world_alpha(),
        graph.effective_z_index(id),
        indent = indent * 2,
    )?;
    if let Some(clip) = node.clip_rect() {
        write!(
            writer,
            " clip=[{}, {}, {}, {}]",
            clip.x0, clip.y0, clip.x1, clip.y1
        )?;
    }
    if node.clipping() {
        write!(writer, " clipping")?;
    }
    writeln!(writer)?;
    for child in graph.children(id) {
        dump_node(graph, child, indent + 1, writer)?;
    }
    Ok(())
}
