// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use stratum_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Phases become duration slices; frame starts, summaries and rich counts
/// become instant events.
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Count records carry no timestamp of their own and are placed at the start
/// of the most recent frame.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut frame_start_us = 0.0;

    for recorded in decode(bytes) {
        let event = match recorded {
            RecordedEvent::FrameBegin(e) => {
                frame_start_us = ticks_to_us(e.now.ticks(), timebase);
                json!({
                    "ph": "i",
                    "name": "FrameBegin",
                    "cat": "Driver",
                    "ts": frame_start_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "delta_ms": e.delta_ms,
                    }
                })
            }
            RecordedEvent::PhaseBegin(e) => json!({
                "ph": "B",
                "name": format!("{:?}", e.phase),
                "cat": "Frame",
                "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_index": e.frame_index,
                }
            }),
            RecordedEvent::PhaseEnd(e) => json!({
                "ph": "E",
                "name": format!("{:?}", e.phase),
                "cat": "Frame",
                "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                "pid": 0,
                "tid": 0,
                "args": {
                    "frame_index": e.frame_index,
                }
            }),
            RecordedEvent::FrameSummary(s) => json!({
                "ph": "i",
                "name": "FrameSummary",
                "cat": "Summary",
                "ts": ticks_to_us(s.now.ticks(), timebase),
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": {
                    "frame_index": s.frame_index,
                    "delta_ms": s.delta_ms,
                    "animate_us": ticks_to_us(s.animate_ticks, timebase),
                    "recompute_us": ticks_to_us(s.recompute_ticks, timebase),
                    "extract_us": ticks_to_us(s.extract_ticks, timebase),
                    "animations": s.animations,
                    "nodes_recomputed": s.nodes_recomputed,
                    "quads": s.quads,
                    "skipped": s.skipped,
                }
            }),
            RecordedEvent::NodeChangesCount { frame_index, count } => {
                count_event("NodeChanges", frame_start_us, frame_index, count)
            }
            RecordedEvent::AnimationEventsCount { frame_index, count } => {
                count_event("AnimationEvents", frame_start_us, frame_index, count)
            }
        };
        events.push(event);
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn count_event(name: &str, ts: f64, frame_index: u64, count: u32) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": "Rich",
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "p",
        "args": {
            "frame_index": frame_index,
            "count": count,
        }
    })
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
