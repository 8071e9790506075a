// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Texture and shader references held by nodes.
//!
//! Nodes never own GPU resources. They hold a handle issued by a
//! [`ResourceLoader`](crate::backend::ResourceLoader) together with the
//! render-time options the renderer needs, and hand the handle back through
//! `unload_*` once they stop using it.

use alloc::string::String;
use core::fmt;

/// Opaque handle to a loaded (or loading) texture.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(pub u64);

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureHandle({})", self.0)
    }
}

/// Opaque handle to a compiled (or compiling) shader.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderHandle(pub u64);

impl fmt::Debug for ShaderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShaderHandle({})", self.0)
    }
}

/// Where a texture's pixels come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Decoded image; `params` is the source locator.
    Image,
    /// Single-color fill; `params` is ignored.
    Solid,
    /// Procedural noise; `params` is the seed.
    Noise,
    /// Rasterized text; `params` is the string to lay out.
    Text,
    /// Region of another texture; `params` names the atlas entry.
    SubTexture,
}

/// How a texture is fitted to a node whose size differs from the texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResizeMode {
    /// Stretch to fill the node.
    #[default]
    Stretch,
    /// Scale uniformly to cover the node, cropping overflow.
    Cover,
    /// Scale uniformly to fit inside the node.
    Contain,
}

/// Render-time options attached to a node's texture reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureOptions {
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Fit behaviour.
    pub resize_mode: ResizeMode,
}

/// Built-in shader programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Plain textured/colored quad.
    Default,
    /// Rounded corners; params are per-corner radii.
    Rounded,
    /// Solid border; params are width followed by ARGB channels.
    Border,
    /// Drop shadow; params are offset x/y, blur, spread.
    Shadow,
    /// Application-supplied program identified by the loader.
    Custom,
}

/// A texture reference stored on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureRef {
    /// Loader-issued handle.
    pub handle: TextureHandle,
    /// Render-time options.
    pub options: TextureOptions,
}

/// Why a resource could not be made available.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// The source locator did not resolve.
    #[error("resource source not found")]
    NotFound,
    /// The data was found but could not be decoded.
    #[error("resource data could not be decoded")]
    Decode,
    /// The shader failed to compile or link.
    #[error("shader compilation failed: {0}")]
    Compile(String),
    /// The rendering context was lost before the upload finished.
    #[error("rendering context lost")]
    ContextLost,
    /// Backend-specific failure.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn error_messages() {
        assert_eq!(
            ResourceError::NotFound.to_string(),
            "resource source not found"
        );
        assert_eq!(
            ResourceError::Compile("missing main".into()).to_string(),
            "shader compilation failed: missing main"
        );
    }

    #[test]
    fn default_options() {
        let o = TextureOptions::default();
        assert!(!o.flip_x && !o.flip_y, "no flipping by default");
        assert_eq!(o.resize_mode, ResizeMode::Stretch);
    }
}
