// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Once-per-tick orchestration of animate → recompute → extract.
//!
//! [`FrameDriver`] is the piece a renderer calls from its display callback.
//! It measures elapsed time from a [`Clock`], advances animations, brings
//! dirty nodes up to date and hands the resulting quads to a
//! [`QuadSink`], emitting trace events for each phase along the way.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use crate::animation::Animator;
use crate::backend::QuadSink;
use crate::graph::{FrameChanges, SceneGraph};
use crate::time::{Clock, HostTime, Timebase};
use crate::trace::{
    FrameBeginEvent, FrameSummaryBuilder, PhaseBeginEvent, PhaseEndEvent, PhaseKind, Tracer,
};

/// Frame driver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDriverConfig {
    /// Upper bound on the elapsed time fed to animations, in milliseconds.
    ///
    /// Keeps animations from jumping after a long stall (suspend, debugger).
    pub max_delta_ms: f64,
    /// Skip recompute and extraction when no node is dirty.
    ///
    /// Animations still advance. The sink receives nothing, so the backend
    /// should keep presenting its previous frame.
    pub skip_clean_frames: bool,
    /// Tick conversion for elapsed time. `None` uses
    /// [`Clock::timebase`].
    pub timebase: Option<Timebase>,
}

impl FrameDriverConfig {
    /// Preset for constrained, long-running screens: short stall clamp and
    /// clean-frame skipping.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            max_delta_ms: 100.0,
            skip_clean_frames: true,
            timebase: None,
        }
    }

    /// Preset for desktop hosts that redraw every frame.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            max_delta_ms: 250.0,
            skip_clean_frames: false,
            timebase: None,
        }
    }
}

impl Default for FrameDriverConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// What one [`FrameDriver::run_frame`] call did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Frame counter, starting at 0.
    pub frame_index: u64,
    /// Elapsed time fed to animations, after clamping.
    pub delta_ms: f64,
    /// Animations advanced.
    pub animations: usize,
    /// Nodes recomputed.
    pub nodes_recomputed: usize,
    /// Quads submitted.
    pub quads: usize,
    /// Whether recompute and extraction were skipped for a clean graph.
    pub skipped: bool,
    /// Animation events queued and not yet drained, this frame's included.
    pub pending_animation_events: usize,
    /// Node events queued and not yet drained.
    pub pending_node_events: usize,
}

/// Runs the per-frame pipeline.
#[derive(Debug, Default)]
pub struct FrameDriver {
    config: FrameDriverConfig,
    frame_index: u64,
    last_time: Option<HostTime>,
    changes: FrameChanges,
}

impl FrameDriver {
    /// Creates a driver.
    #[must_use]
    pub fn new(config: FrameDriverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &FrameDriverConfig {
        &self.config
    }

    /// Index the next frame will get.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// What the last recompute changed.
    #[must_use]
    pub fn last_changes(&self) -> &FrameChanges {
        &self.changes
    }

    /// Forgets the previous frame time, so the next frame advances
    /// animations by zero. Call after the host resumes from a pause.
    pub fn reset_clock(&mut self) {
        self.last_time = None;
    }

    /// Runs one frame.
    ///
    /// The first frame (and the first after [`reset_clock`](Self::reset_clock))
    /// advances animations by zero.
    ///
    /// The driver never drains the event queues. Call
    /// [`Animator::drain_events`] and
    /// [`SceneGraph::drain_events`] after each frame; a looping animation
    /// queues a [`Looped`](crate::animation::AnimationEvent::Looped) event
    /// per cycle, so an undrained queue grows without bound. The report's
    /// `pending_*` counts show what is waiting.
    ///
    /// # Panics
    ///
    /// Panics if an animation targets a destroyed node, or a dirty node's
    /// parent has been destroyed without reparenting the node.
    pub fn run_frame(
        &mut self,
        clock: &dyn Clock,
        graph: &mut SceneGraph,
        animator: &mut Animator,
        sink: &mut dyn QuadSink,
        tracer: &mut Tracer<'_>,
    ) -> FrameReport {
        let now = clock.now();
        let timebase = self.config.timebase.unwrap_or_else(|| clock.timebase());
        let delta_ms = match self.last_time {
            Some(prev) => now
                .saturating_duration_since(prev)
                .as_millis_f64(timebase)
                .min(self.config.max_delta_ms),
            None => 0.0,
        };
        self.last_time = Some(now);

        let frame_index = self.frame_index;
        self.frame_index += 1;

        let begin = FrameBeginEvent {
            frame_index,
            now,
            delta_ms,
        };
        tracer.frame_begin(&begin);
        let mut summary = FrameSummaryBuilder::new(&begin);

        // -- Animate --
        phase_begin(tracer, &mut summary, frame_index, PhaseKind::Animate, clock);
        #[cfg(feature = "trace-rich")]
        let first_event = animator.pending_events().len();
        let animations = animator.advance(graph, delta_ms);
        #[cfg(feature = "trace-rich")]
        if tracer.is_enabled() {
            let records = animation_records(&animator.pending_events()[first_event..]);
            if !records.is_empty() {
                tracer.animation_events(frame_index, &records);
            }
        }
        phase_end(tracer, &mut summary, frame_index, PhaseKind::Animate, clock);

        let skipped = self.config.skip_clean_frames && !graph.has_dirty_nodes();
        let mut quads = 0;
        if skipped {
            self.changes.clear();
        } else {
            // -- Recompute --
            phase_begin(tracer, &mut summary, frame_index, PhaseKind::Recompute, clock);
            graph.recompute_dirty_into(&mut self.changes);
            #[cfg(feature = "trace-rich")]
            if tracer.is_enabled() && !self.changes.is_empty() {
                tracer.node_changes(frame_index, &node_changes(&self.changes));
            }
            phase_end(tracer, &mut summary, frame_index, PhaseKind::Recompute, clock);

            // -- Extract --
            phase_begin(tracer, &mut summary, frame_index, PhaseKind::Extract, clock);
            quads = graph.extract(sink);
            phase_end(tracer, &mut summary, frame_index, PhaseKind::Extract, clock);
        }

        let nodes_recomputed = self.changes.recomputed.len();
        summary.set_animations(saturating_u32(animations));
        summary.set_nodes_recomputed(saturating_u32(nodes_recomputed));
        summary.set_quads(saturating_u32(quads));
        summary.set_skipped(skipped);
        tracer.frame_summary(&summary.finish());

        FrameReport {
            frame_index,
            delta_ms,
            animations,
            nodes_recomputed,
            quads,
            skipped,
            pending_animation_events: animator.pending_events().len(),
            pending_node_events: graph.pending_events().len(),
        }
    }
}

fn phase_begin(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
    clock: &dyn Clock,
) {
    let timestamp = clock.now();
    summary.phase_begin(phase, timestamp);
    tracer.phase_begin(&PhaseBeginEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn phase_end(
    tracer: &mut Tracer<'_>,
    summary: &mut FrameSummaryBuilder,
    frame_index: u64,
    phase: PhaseKind,
    clock: &dyn Clock,
) {
    let timestamp = clock.now();
    summary.phase_end(phase, timestamp);
    tracer.phase_end(&PhaseEndEvent {
        frame_index,
        phase,
        timestamp,
    });
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(feature = "trace-rich")]
fn animation_records(
    events: &[crate::animation::AnimationEvent],
) -> Vec<crate::trace::AnimationRecord> {
    use crate::animation::AnimationEvent;
    use crate::trace::{AnimationRecord, AnimationTransition};

    events
        .iter()
        .map(|e| AnimationRecord {
            animation: e.animation().0,
            node: e.node().0,
            transition: match e {
                AnimationEvent::Started { .. } => AnimationTransition::Started,
                AnimationEvent::Looped { .. } => AnimationTransition::Looped,
                AnimationEvent::Finished { .. } => AnimationTransition::Finished,
                AnimationEvent::Stopped { .. } => AnimationTransition::Stopped,
            },
        })
        .collect()
}

#[cfg(feature = "trace-rich")]
fn node_changes(changes: &FrameChanges) -> Vec<crate::trace::NodeChange> {
    use crate::trace::{NodeChange, NodeField};

    let lists = [
        (&changes.transforms, NodeField::Transform),
        (&changes.alphas, NodeField::Alpha),
        (&changes.clips, NodeField::Clip),
        (&changes.reordered, NodeField::Order),
        (&changes.bounds, NodeField::Bounds),
        (&changes.content, NodeField::Content),
    ];
    let mut out = Vec::new();
    for (ids, field) in lists {
        out.extend(ids.iter().map(|id| NodeChange { node: id.0, field }));
    }
    out
}
