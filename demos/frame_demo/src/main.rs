// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless frame loop that exercises the scene graph, the animation engine
//! and the tracing pipeline.
//!
//! Builds a small clipped scene, starts a few animations and runs 120
//! synthetic frames through a [`FrameDriver`], recording events to both a
//! [`PrettyPrintSink`] and a [`RecorderSink`]. Afterwards it writes a Chrome
//! trace to `trace.json` and dumps the final tree to stdout.

use std::f64::consts::TAU;
use std::fs::File;
use std::io::BufWriter;

use stratum_core::animation::{AnimationSettings, Animator, Easing, StopMethod};
use stratum_core::color::Color;
use stratum_core::driver::{FrameDriver, FrameDriverConfig};
use stratum_core::graph::{NodeId, NodeProps, Property, PropertyValue, Quad, SceneGraph};
use stratum_core::time::{Clock, Duration, HostTime, ManualClock, Timebase};
use stratum_core::trace::{
    AnimationRecord, FrameBeginEvent, FrameSummary, NodeChange, PhaseBeginEvent, PhaseEndEvent,
    TraceSink, Tracer,
};

use stratum_debug::pretty::PrettyPrintSink;
use stratum_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 120;
const FRAME_INTERVAL_MS: u64 = 16;
/// Frame at which the fade is stopped (and plays back).
const STOP_FADE_AT: u64 = 90;

const STAGE: NodeId = NodeId(1);
const PANEL: NodeId = NodeId(2);
const SLIDER: NodeId = NodeId(3);
const SPINNER: NodeId = NodeId(4);
const BADGE: NodeId = NodeId(5);

/// A clock that moves a little on every read, so phases get a visible
/// duration in the trace.
#[derive(Debug)]
struct SteppingClock {
    inner: ManualClock,
    step: Duration,
}

impl Clock for SteppingClock {
    fn now(&self) -> HostTime {
        self.inner.advance(self.step);
        self.inner.now()
    }

    fn timebase(&self) -> Timebase {
        self.inner.timebase()
    }
}

/// Forwards every event to two sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.pretty.on_frame_begin(e);
        self.recorder.on_frame_begin(e);
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.pretty.on_phase_begin(e);
        self.recorder.on_phase_begin(e);
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.pretty.on_phase_end(e);
        self.recorder.on_phase_end(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.pretty.on_frame_summary(s);
        self.recorder.on_frame_summary(s);
    }

    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        self.pretty.on_node_changes(frame_index, changes);
        self.recorder.on_node_changes(frame_index, changes);
    }

    fn on_animation_events(&mut self, frame_index: u64, events: &[AnimationRecord]) {
        self.pretty.on_animation_events(frame_index, events);
        self.recorder.on_animation_events(frame_index, events);
    }
}

fn build_scene() -> SceneGraph {
    let mut graph = SceneGraph::new();
    graph.create_node(
        STAGE,
        NodeProps::default()
            .with_size(800.0, 600.0)
            .with_color(Color::from_argb(0xFF, 0x10, 0x10, 0x18)),
    );
    graph.create_node(
        PANEL,
        NodeProps::default()
            .with_parent(STAGE)
            .with_rect(100.0, 100.0, 400.0, 200.0)
            .with_clipping(true)
            .with_color(Color::from_argb(0xFF, 0x30, 0x40, 0x60)),
    );
    graph.create_node(
        SLIDER,
        NodeProps::default()
            .with_parent(PANEL)
            .with_rect(-40.0, 80.0, 40.0, 40.0)
            .with_color(Color::from_argb(0xFF, 0xE0, 0x80, 0x20)),
    );
    graph.create_node(
        SPINNER,
        NodeProps::default()
            .with_parent(STAGE)
            .with_rect(600.0, 300.0, 64.0, 64.0)
            .with_pivot(0.5, 0.5)
            .with_color(Color::WHITE),
    );
    graph.create_node(
        BADGE,
        NodeProps::default()
            .with_parent(PANEL)
            .with_rect(360.0, -10.0, 24.0, 24.0)
            .with_z_index(10)
            .with_color(Color::from_argb(0xFF, 0xD0, 0x20, 0x20)),
    );
    graph
}

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let mut recorder = RecorderSink::new();

    // -- scene + animations ------------------------------------------------
    let mut graph = build_scene();
    let mut animator = Animator::new();
    let _ = animator.create(
        &graph,
        SLIDER,
        &[(Property::X, PropertyValue::Number(420.0))],
        AnimationSettings::new(1000.0)
            .with_easing(Easing::EaseInOut)
            .with_looping(true),
    );
    let _ = animator.create(
        &graph,
        SPINNER,
        &[(Property::Rotation, PropertyValue::Number(TAU))],
        AnimationSettings::new(800.0).with_looping(true),
    );
    let fade = animator.create(
        &graph,
        PANEL,
        &[
            (Property::Alpha, PropertyValue::Number(0.25)),
            (Property::Color, PropertyValue::Color(Color::from_argb(0xFF, 0x60, 0x20, 0x80))),
        ],
        AnimationSettings::new(1200.0)
            .with_delay(300.0)
            .with_easing(Easing::EaseOutCubic)
            .with_stop_method(StopMethod::Reverse),
    );

    // -- frame loop --------------------------------------------------------
    let clock = SteppingClock {
        inner: ManualClock::new(timebase),
        step: Duration::from_nanos(40_000, timebase),
    };
    clock.inner.set(HostTime(1_000_000_000));
    let mut driver = FrameDriver::new(FrameDriverConfig::embedded());
    let mut quads: Vec<Quad> = Vec::new();
    let mut skipped = 0;
    let mut animation_events = 0;

    for frame in 0..FRAME_COUNT {
        if frame == STOP_FADE_AT {
            let _ = animator.stop(fade, &mut graph);
        }
        quads.clear();
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);
        let report = driver.run_frame(&clock, &mut graph, &mut animator, &mut quads, &mut tracer);
        if report.skipped {
            skipped += 1;
        }
        animation_events += animator.drain_events().len();
        for event in graph.drain_events() {
            eprintln!("node event: {event:?}");
        }
        clock.inner.advance_millis(FRAME_INTERVAL_MS);
    }

    println!(
        "{FRAME_COUNT} frames, {skipped} skipped, {animation_events} animation events, {} quads in last frame",
        quads.len(),
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    stratum_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");
    println!("Wrote {path}");

    // -- final tree --------------------------------------------------------
    stratum_debug::dump::dump_tree(&graph, &mut std::io::stdout().lock())
        .expect("failed to dump scene");
}
