// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph with incremental recomputation.
//!
//! `stratum_core` keeps a tree of drawable nodes, recomputes their derived
//! state (transforms, clip rects, stacking order) only when something they
//! depend on has changed, animates node properties over time, and flattens
//! the tree into a batch of draw quads for an external renderer. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Clock ──► FrameDriver::run_frame()
//!                 │
//!                 ├──► Animator::advance(dt) ──► SceneGraph setters
//!                 │                                   │ mark dirty
//!                 │                                   ▼
//!                 ├──► SceneGraph::recompute_dirty() ──► FrameChanges
//!                 │
//!                 └──► SceneGraph::extract() ──► QuadSink::submit_quad()
//! ```
//!
//! **[`graph`]**: Node registry, property setters with dirty propagation,
//! per-frame recomputation (local/global transform, clip, z-order) and quad
//! extraction.
//!
//! **[`dirty`]**: The [`Recalc`](dirty::Recalc) and
//! [`UpdateMask`](dirty::UpdateMask) flag sets describing what derived state
//! a node owes, and the [`understory_dirty`] channels that carry it to
//! descendants.
//!
//! **[`animation`]**: Time-driven property interpolation with easing,
//! delays, looping, reversal and stop behaviours.
//!
//! **[`driver`]**: [`FrameDriver`](driver::FrameDriver) running the
//! animate → recompute → extract sequence once per tick.
//!
//! **[`backend`]**: [`ResourceLoader`](backend::ResourceLoader) and
//! [`QuadSink`](backend::QuadSink), the seams to the renderer and resource
//! caches.
//!
//! **[`matrix`]**: 2D affine transform type for node positioning.
//!
//! **[`color`]**: Packed ARGB colors and premultiplied interpolation.
//!
//! **[`resource`]**: Texture and shader handles, options, and load errors.
//!
//! **[`time`]**: Host ticks, timebase conversion and the
//! [`Clock`](time::Clock) abstraction.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   change and animation lifecycle events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod backend;
pub mod color;
pub mod dirty;
pub mod driver;
pub mod graph;
pub mod matrix;
pub mod resource;
pub mod time;
pub mod trace;
