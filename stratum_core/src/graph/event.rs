// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asynchronous resource notifications delivered to nodes.

use super::id::NodeId;
use crate::resource::{ResourceError, ShaderHandle, TextureHandle};

/// Something the application may want to react to, queued on the graph and
/// collected with [`SceneGraph::drain_events`](super::SceneGraph::drain_events).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeEvent {
    /// A node's texture finished loading.
    TextureLoaded {
        /// The node using the texture.
        node: NodeId,
        /// The texture.
        texture: TextureHandle,
        /// Pixel width.
        width: u32,
        /// Pixel height.
        height: u32,
    },
    /// A node's texture failed; the node now renders without it.
    TextureFailed {
        /// The node that was using the texture.
        node: NodeId,
        /// The texture.
        texture: TextureHandle,
        /// What went wrong.
        error: ResourceError,
    },
    /// A node's shader failed; the node now renders with the default shader.
    ShaderFailed {
        /// The node that was using the shader.
        node: NodeId,
        /// The shader.
        shader: ShaderHandle,
        /// What went wrong.
        error: ResourceError,
    },
}

impl NodeEvent {
    /// The node the event concerns.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            Self::TextureLoaded { node, .. }
            | Self::TextureFailed { node, .. }
            | Self::ShaderFailed { node, .. } => *node,
        }
    }
}
