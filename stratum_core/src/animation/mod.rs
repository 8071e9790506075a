// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-driven property animation.
//!
//! An [`Animation`] interpolates a small set of node properties from the
//! values they had when it was created to target values. It writes through
//! [`SceneGraph::set_property`](crate::graph::SceneGraph::set_property), so
//! animated nodes are marked dirty like any other mutation and picked up by
//! the next [`recompute_dirty`](crate::graph::SceneGraph::recompute_dirty).
//!
//! [`Animator`] owns the live animations, advances them once per frame and
//! queues [`AnimationEvent`]s for the application.
//!
//! ```text
//!             advance                       progress > 1
//!   Initial ──────────► Running ─────────────────────────► Completed
//!      ▲                 │  ▲  │ looping                       │
//!      │ reset()         │  └──┘ progress := 0                 │ reverse()
//!      └─────────────────┘                                     ▼
//!                                                           Running
//! ```

mod animator;
mod easing;
mod tween;

pub use animator::{AnimationEvent, AnimationId, Animator};
pub use easing::Easing;
pub use tween::{AnimatedProperty, Animation, AnimationState, Tick};

/// What [`Animator::stop`] does with a running animation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopMethod {
    /// Freeze at the current values.
    #[default]
    None,
    /// Animate back to the start values, then finish.
    Reverse,
    /// Jump back to the start values.
    Reset,
}

/// Timing and behaviour of an [`Animation`].
#[derive(Clone, Copy, Debug)]
pub struct AnimationSettings {
    /// Length of one run in milliseconds. Zero completes on the first tick.
    pub duration_ms: f64,
    /// Time to wait before the first run starts, in milliseconds.
    pub delay_ms: f64,
    /// Easing curve applied to progress.
    pub easing: Easing,
    /// Whether to start over after each run instead of finishing.
    pub looping: bool,
    /// Behaviour of [`Animator::stop`].
    pub stop_method: StopMethod,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration_ms: 0.0,
            delay_ms: 0.0,
            easing: Easing::Linear,
            looping: false,
            stop_method: StopMethod::None,
        }
    }
}

impl AnimationSettings {
    /// Settings for a linear, non-looping run of `duration_ms`.
    #[must_use]
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the start delay.
    #[must_use]
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Enables or disables looping.
    #[must_use]
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Sets the stop behaviour.
    #[must_use]
    pub fn with_stop_method(mut self, stop_method: StopMethod) -> Self {
        self.stop_method = stop_method;
        self
    }
}
