// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single property animation.

use smallvec::SmallVec;

use super::{AnimationSettings, StopMethod};
use crate::color::Color;
use crate::graph::{NodeId, Property, PropertyValue, SceneGraph};

/// One animated property with its captured start and target values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatedProperty {
    /// The property.
    pub property: Property,
    /// Value at progress 0.
    pub start: PropertyValue,
    /// Value at progress 1.
    pub end: PropertyValue,
}

impl AnimatedProperty {
    /// Value at eased progress `e`.
    fn value_at(&self, e: f64) -> PropertyValue {
        if self.start == self.end {
            return self.end;
        }
        match (self.start, self.end) {
            (PropertyValue::Number(a), PropertyValue::Number(b)) => {
                PropertyValue::Number(a + (b - a) * e)
            }
            (PropertyValue::Color(a), PropertyValue::Color(b)) => {
                PropertyValue::Color(Color::mix_premultiplied(a, b, e))
            }
            _ => unreachable!("start and end kinds are checked on creation"),
        }
    }
}

/// Lifecycle state of an [`Animation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationState {
    /// Created or reset; not yet advanced past its delay.
    Initial,
    /// Advancing.
    Running,
    /// Finished or stopped; no longer advanced.
    Completed,
}

/// Outcome of one [`Animation::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Already completed; nothing written.
    Idle,
    /// Still inside the start delay; nothing written.
    Delayed,
    /// First tick past the delay; values written.
    Started,
    /// Values written.
    Running,
    /// Wrapped around in loop mode; start values written.
    Looped,
    /// Reached the end; target values written.
    Finished,
}

/// Interpolates properties of one node over time.
#[derive(Clone, Debug)]
pub struct Animation {
    node: NodeId,
    targets: SmallVec<[AnimatedProperty; 4]>,
    settings: AnimationSettings,
    progress: f64,
    delay_remaining: f64,
    state: AnimationState,
}

impl Animation {
    /// Creates an animation of `node` towards `targets`, capturing the
    /// current values as start values.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not registered or a target value's kind does not
    /// match its property.
    #[must_use]
    pub fn new(
        graph: &SceneGraph,
        node: NodeId,
        targets: &[(Property, PropertyValue)],
        settings: AnimationSettings,
    ) -> Self {
        let targets = targets
            .iter()
            .map(|&(property, end)| {
                let start = graph.property(node, property);
                assert!(
                    property.is_color() == matches!(end, PropertyValue::Color(_)),
                    "{property:?} cannot be animated to {end:?}"
                );
                AnimatedProperty {
                    property,
                    start,
                    end,
                }
            })
            .collect();
        Self {
            node,
            targets,
            settings,
            progress: 0.0,
            delay_remaining: settings.delay_ms.max(0.0),
            state: AnimationState::Initial,
        }
    }

    /// The animated node.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Animated properties with their start and target values.
    #[must_use]
    pub fn targets(&self) -> &[AnimatedProperty] {
        &self.targets
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Whether the animation is no longer advanced.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == AnimationState::Completed
    }

    /// Advances by `dt_ms` milliseconds and writes interpolated values to the
    /// node.
    ///
    /// # Panics
    ///
    /// Panics if the node has been destroyed.
    pub fn advance(&mut self, graph: &mut SceneGraph, dt_ms: f64) -> Tick {
        if self.state == AnimationState::Completed {
            return Tick::Idle;
        }

        let mut dt = dt_ms.max(0.0);
        if self.delay_remaining > 0.0 {
            if dt < self.delay_remaining {
                self.delay_remaining -= dt;
                return Tick::Delayed;
            }
            dt -= self.delay_remaining;
            self.delay_remaining = 0.0;
        }

        let started = self.state == AnimationState::Initial;
        self.state = AnimationState::Running;

        if self.settings.duration_ms <= 0.0 {
            self.progress = 1.0;
            self.write(graph);
            self.state = AnimationState::Completed;
            return Tick::Finished;
        }

        self.progress += dt / self.settings.duration_ms;
        let mut tick = if started { Tick::Started } else { Tick::Running };
        if self.progress > 1.0 {
            if self.settings.looping {
                self.progress = 0.0;
                tick = Tick::Looped;
            } else {
                self.progress = 1.0;
                self.state = AnimationState::Completed;
                tick = Tick::Finished;
            }
        }
        self.write(graph);
        tick
    }

    /// Swaps start and target values and restarts from progress 0.
    ///
    /// A non-looping animation that has been reversed no longer reverses
    /// again when stopped.
    pub fn reverse(&mut self) {
        for t in &mut self.targets {
            core::mem::swap(&mut t.start, &mut t.end);
        }
        self.progress = 0.0;
        self.state = AnimationState::Running;
        if !self.settings.looping {
            self.settings.stop_method = StopMethod::None;
        }
    }

    /// Rewinds to progress 0 and re-arms the delay without touching the
    /// node.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.delay_remaining = self.settings.delay_ms.max(0.0);
        self.state = AnimationState::Initial;
    }

    /// Rewinds and writes the start values back to the node.
    ///
    /// # Panics
    ///
    /// Panics if the node has been destroyed.
    pub fn restore(&mut self, graph: &mut SceneGraph) {
        self.reset();
        for t in &self.targets {
            graph.set_property(self.node, t.property, t.start);
        }
    }

    /// Applies the stop method. Returns `true` if the animation keeps
    /// running (reversing back to its start values).
    ///
    /// # Panics
    ///
    /// Panics if the node has been destroyed and the stop method writes to
    /// it.
    pub fn stop(&mut self, graph: &mut SceneGraph) -> bool {
        match self.settings.stop_method {
            StopMethod::None => {
                self.state = AnimationState::Completed;
                false
            }
            StopMethod::Reset => {
                self.restore(graph);
                self.state = AnimationState::Completed;
                false
            }
            StopMethod::Reverse => {
                // Play back from the current value, then finish.
                let current = self.settings.easing.apply(self.progress);
                for t in &mut self.targets {
                    t.end = t.value_at(current);
                    core::mem::swap(&mut t.start, &mut t.end);
                }
                self.settings.looping = false;
                self.progress = 0.0;
                self.delay_remaining = 0.0;
                self.state = AnimationState::Running;
                self.settings.stop_method = StopMethod::None;
                true
            }
        }
    }

    fn write(&self, graph: &mut SceneGraph) {
        let e = self.settings.easing.apply(self.progress);
        for t in &self.targets {
            graph.set_property(self.node, t.property, t.value_at(e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Easing;
    use crate::graph::NodeProps;

    const EPS: f64 = 1e-9;

    fn graph_with_node() -> SceneGraph {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default().with_size(100.0, 100.0));
        graph
    }

    fn x_of(graph: &SceneGraph) -> f64 {
        graph.node(NodeId(1)).x()
    }

    #[test]
    fn linear_halfway() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(1000.0),
        );
        assert_eq!(anim.advance(&mut graph, 500.0), Tick::Started);
        assert!((x_of(&graph) - 50.0).abs() < EPS, "x = {}", x_of(&graph));
        assert_eq!(anim.state(), AnimationState::Running);
    }

    #[test]
    fn completes_and_clamps() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(1000.0),
        );
        let _ = anim.advance(&mut graph, 600.0);
        assert_eq!(anim.advance(&mut graph, 600.0), Tick::Finished);
        assert!((x_of(&graph) - 100.0).abs() < EPS);
        assert!(anim.is_completed());
        assert_eq!(anim.advance(&mut graph, 600.0), Tick::Idle);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::Alpha, PropertyValue::Number(0.25))],
            AnimationSettings::default(),
        );
        assert_eq!(anim.advance(&mut graph, 0.0), Tick::Finished);
        assert!((graph.node(NodeId(1)).alpha() - 0.25).abs() < EPS);
    }

    #[test]
    fn round_trip_restores_original() {
        let mut graph = graph_with_node();
        graph.set_y(NodeId(1), 7.0);
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::Y, PropertyValue::Number(-40.0))],
            AnimationSettings::new(300.0).with_easing(Easing::EaseInOut),
        );
        while !anim.is_completed() {
            let _ = anim.advance(&mut graph, 16.0);
        }
        assert!((graph.node(NodeId(1)).y() + 40.0).abs() < EPS);
        anim.reverse();
        while !anim.is_completed() {
            let _ = anim.advance(&mut graph, 16.0);
        }
        assert!((graph.node(NodeId(1)).y() - 7.0).abs() < EPS);
    }

    #[test]
    fn loop_wraps_to_start() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(10.0))],
            AnimationSettings::new(100.0).with_looping(true),
        );
        let _ = anim.advance(&mut graph, 90.0);
        assert_eq!(anim.advance(&mut graph, 20.0), Tick::Looped);
        assert_eq!(anim.progress(), 0.0);
        assert!(x_of(&graph).abs() < EPS);
        assert!(!anim.is_completed());
    }

    #[test]
    fn delay_holds_back_first_write() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0).with_delay(50.0),
        );
        assert_eq!(anim.advance(&mut graph, 30.0), Tick::Delayed);
        assert!(x_of(&graph).abs() < EPS);
        // 20ms of delay left; the remaining 30ms counts as progress.
        assert_eq!(anim.advance(&mut graph, 50.0), Tick::Started);
        assert!((x_of(&graph) - 30.0).abs() < EPS);
    }

    #[test]
    fn colors_stay_in_range() {
        let mut graph = graph_with_node();
        graph.set_color(NodeId(1), Color(0x0000_00FF));
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::Color, PropertyValue::Color(Color(0xFFFF_0000)))],
            AnimationSettings::new(100.0).with_easing(Easing::CubicBezier(0.3, -0.8, 0.7, 1.8)),
        );
        for _ in 0..12 {
            let _ = anim.advance(&mut graph, 10.0);
            let c = graph.node(NodeId(1)).colors()[0];
            // Fully transparent blue contributes nothing once premultiplied.
            assert!(c.a() == 0 || (c.b() == 0 && c.g() == 0), "{c:?}");
        }
        assert_eq!(graph.node(NodeId(1)).colors()[0], Color(0xFFFF_0000));
    }

    #[test]
    fn equal_start_and_end_writes_directly() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::Width, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0),
        );
        graph.clear_dirty();
        let _ = anim.advance(&mut graph, 10.0);
        assert!(!graph.has_dirty_nodes(), "equal value is a no-op write");
    }

    #[test]
    fn stop_reverse_plays_back_then_finishes() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0)
                .with_looping(true)
                .with_stop_method(StopMethod::Reverse),
        );
        let _ = anim.advance(&mut graph, 40.0);
        assert!(anim.stop(&mut graph), "reverse keeps running");
        // Back from 40 to 0 over a full duration.
        let _ = anim.advance(&mut graph, 50.0);
        assert!((x_of(&graph) - 20.0).abs() < EPS);
        assert_eq!(anim.advance(&mut graph, 60.0), Tick::Finished);
        assert!(x_of(&graph).abs() < EPS);
    }

    #[test]
    fn stop_reset_restores() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0).with_stop_method(StopMethod::Reset),
        );
        let _ = anim.advance(&mut graph, 40.0);
        assert!(!anim.stop(&mut graph));
        assert!(x_of(&graph).abs() < EPS);
        assert!(anim.is_completed());
    }

    #[test]
    fn reverse_disables_stop_reversal() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0).with_stop_method(StopMethod::Reverse),
        );
        anim.reverse();
        assert_eq!(anim.settings().stop_method, StopMethod::None);
    }

    #[test]
    #[should_panic(expected = "cannot be animated to")]
    fn kind_mismatch_panics() {
        let graph = graph_with_node();
        let _ = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Color(Color::BLACK))],
            AnimationSettings::new(100.0),
        );
    }

    #[test]
    #[should_panic(expected = "node NodeId(1) is not registered")]
    fn advancing_destroyed_node_panics() {
        let mut graph = graph_with_node();
        let mut anim = Animation::new(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0),
        );
        graph.destroy_node(NodeId(1), &mut crate::backend::NullLoader::new());
        let _ = anim.advance(&mut graph, 10.0);
    }
}
