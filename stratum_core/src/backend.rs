// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract between the scene graph and the rendering side.
//!
//! The graph depends on two collaborators it does not implement:
//!
//! - **Resource loader**: Implements [`ResourceLoader`] to turn texture and
//!   shader descriptions into handles. Loading is usually asynchronous; the
//!   loader reports the outcome later through
//!   [`SceneGraph::notify_texture_loaded`],
//!   [`SceneGraph::notify_texture_failed`] and
//!   [`SceneGraph::notify_shader_failed`].
//!
//! - **Quad sink**: Implements [`QuadSink`] to receive the flattened
//!   [`Quad`] batch produced by [`SceneGraph::extract`], in z-order.
//!
//! # Crate boundaries
//!
//! `stratum_core` owns the node model, recomputation and animation. Renderer
//! crates depend on `stratum_core`, implement both traits, and call
//! [`FrameDriver::run_frame`](crate::driver::FrameDriver::run_frame) from
//! their display callback.
//!
//! [`SceneGraph::notify_texture_loaded`]: crate::graph::SceneGraph::notify_texture_loaded
//! [`SceneGraph::notify_texture_failed`]: crate::graph::SceneGraph::notify_texture_failed
//! [`SceneGraph::notify_shader_failed`]: crate::graph::SceneGraph::notify_shader_failed
//! [`SceneGraph::extract`]: crate::graph::SceneGraph::extract

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::graph::Quad;
use crate::resource::{ShaderHandle, ShaderKind, TextureHandle, TextureKind, TextureOptions};

/// Issues and releases texture and shader handles.
///
/// Every handle returned by a `load_*` call is passed back exactly once to
/// the matching `unload_*` call when the node stops using it. That includes
/// handles whose load was reported as failed.
pub trait ResourceLoader {
    /// Requests a texture.
    fn load_texture(
        &mut self,
        kind: TextureKind,
        params: &str,
        options: &TextureOptions,
    ) -> TextureHandle;

    /// Requests a shader program.
    fn load_shader(&mut self, kind: ShaderKind, params: &[f32]) -> ShaderHandle;

    /// Releases a texture handle.
    fn unload_texture(&mut self, handle: TextureHandle);

    /// Releases a shader handle.
    fn unload_shader(&mut self, handle: ShaderHandle);
}

/// Receives draw primitives.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(renderer: &mut Renderer) {
///     // Animate: interpolated values are written through graph setters.
///     animator.advance(&mut graph, dt_ms);
///
///     // Recompute: each dirty node once, parents first.
///     graph.recompute_dirty();
///
///     // Extract: quads arrive in z-order.
///     graph.extract(renderer);
///     renderer.flush();
/// }
/// ```
pub trait QuadSink {
    /// Accepts one quad.
    fn submit_quad(&mut self, quad: &Quad);
}

impl QuadSink for Vec<Quad> {
    fn submit_quad(&mut self, quad: &Quad) {
        self.push(*quad);
    }
}

/// A [`ResourceLoader`] that issues sequential handles without loading
/// anything.
///
/// Useful for headless runs and tests: it tracks which handles are live so
/// load/unload pairing can be checked.
#[derive(Debug, Default)]
pub struct NullLoader {
    next: u64,
    live_textures: BTreeSet<TextureHandle>,
    live_shaders: BTreeSet<ShaderHandle>,
}

impl NullLoader {
    /// Creates a loader with no live handles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of texture handles issued and not yet unloaded.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.live_textures.len()
    }

    /// Number of shader handles issued and not yet unloaded.
    #[must_use]
    pub fn live_shaders(&self) -> usize {
        self.live_shaders.len()
    }

    fn issue(&mut self) -> u64 {
        self.next += 1;
        self.next
    }
}

impl ResourceLoader for NullLoader {
    fn load_texture(
        &mut self,
        _kind: TextureKind,
        _params: &str,
        _options: &TextureOptions,
    ) -> TextureHandle {
        let handle = TextureHandle(self.issue());
        self.live_textures.insert(handle);
        handle
    }

    fn load_shader(&mut self, _kind: ShaderKind, _params: &[f32]) -> ShaderHandle {
        let handle = ShaderHandle(self.issue());
        self.live_shaders.insert(handle);
        handle
    }

    /// # Panics
    ///
    /// Panics if the handle is not live.
    fn unload_texture(&mut self, handle: TextureHandle) {
        assert!(
            self.live_textures.remove(&handle),
            "unload of unknown {handle:?}"
        );
    }

    /// # Panics
    ///
    /// Panics if the handle is not live.
    fn unload_shader(&mut self, handle: ShaderHandle) {
        assert!(
            self.live_shaders.remove(&handle),
            "unload of unknown {handle:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_loader_pairs_handles() {
        let mut loader = NullLoader::new();
        let t = loader.load_texture(TextureKind::Image, "a.png", &TextureOptions::default());
        let s = loader.load_shader(ShaderKind::Rounded, &[4.0]);
        assert_ne!(t.0, s.0, "handles are unique across kinds");
        assert_eq!((loader.live_textures(), loader.live_shaders()), (1, 1));
        loader.unload_texture(t);
        loader.unload_shader(s);
        assert_eq!((loader.live_textures(), loader.live_shaders()), (0, 0));
    }

    #[test]
    #[should_panic(expected = "unload of unknown TextureHandle(9)")]
    fn double_unload_panics() {
        let mut loader = NullLoader::new();
        loader.unload_texture(TextureHandle(9));
    }
}
