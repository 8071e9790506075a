// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ownership and per-frame advancement of animations.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use super::AnimationSettings;
use super::tween::{Animation, Tick};
use crate::graph::{NodeId, Property, PropertyValue, SceneGraph};

/// Handle to an animation owned by an [`Animator`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(pub u64);

impl fmt::Debug for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimationId({})", self.0)
    }
}

/// A lifecycle transition, queued by [`Animator`] and collected with
/// [`Animator::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationEvent {
    /// First tick past the start delay.
    Started {
        /// The animation.
        animation: AnimationId,
        /// The animated node.
        node: NodeId,
    },
    /// Wrapped around in loop mode.
    Looped {
        /// The animation.
        animation: AnimationId,
        /// The animated node.
        node: NodeId,
    },
    /// Reached its end.
    Finished {
        /// The animation.
        animation: AnimationId,
        /// The animated node.
        node: NodeId,
    },
    /// Stopped through [`Animator::stop`].
    Stopped {
        /// The animation.
        animation: AnimationId,
        /// The animated node.
        node: NodeId,
    },
}

impl AnimationEvent {
    /// The animation the event concerns.
    #[must_use]
    pub fn animation(&self) -> AnimationId {
        match *self {
            Self::Started { animation, .. }
            | Self::Looped { animation, .. }
            | Self::Finished { animation, .. }
            | Self::Stopped { animation, .. } => animation,
        }
    }

    /// The animated node.
    #[must_use]
    pub fn node(&self) -> NodeId {
        match *self {
            Self::Started { node, .. }
            | Self::Looped { node, .. }
            | Self::Finished { node, .. }
            | Self::Stopped { node, .. } => node,
        }
    }
}

/// Owns animations and advances them once per frame.
///
/// Completed animations stay registered so they can be reversed or reset;
/// [`remove`](Self::remove) them when done.
#[derive(Debug, Default)]
pub struct Animator {
    animations: BTreeMap<AnimationId, Animation>,
    next_id: u64,
    events: Vec<AnimationEvent>,
}

impl Animator {
    /// Creates an empty animator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an animation of `node` towards `targets`, capturing the
    /// node's current values as start values.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not registered or a target value's kind does not
    /// match its property.
    pub fn create(
        &mut self,
        graph: &SceneGraph,
        node: NodeId,
        targets: &[(Property, PropertyValue)],
        settings: AnimationSettings,
    ) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.animations
            .insert(id, Animation::new(graph, node, targets, settings));
        id
    }

    /// Advances every non-completed animation by `dt_ms` and returns how many
    /// were advanced.
    ///
    /// Animations advance in creation order, so when two animate the same
    /// property the newer one wins.
    ///
    /// # Panics
    ///
    /// Panics if an advancing animation's node has been destroyed.
    pub fn advance(&mut self, graph: &mut SceneGraph, dt_ms: f64) -> usize {
        let mut advanced = 0;
        for (&animation, anim) in &mut self.animations {
            let node = anim.node();
            let event = match anim.advance(graph, dt_ms) {
                Tick::Idle => continue,
                Tick::Delayed | Tick::Running => None,
                Tick::Started => Some(AnimationEvent::Started { animation, node }),
                Tick::Looped => Some(AnimationEvent::Looped { animation, node }),
                Tick::Finished => Some(AnimationEvent::Finished { animation, node }),
            };
            advanced += 1;
            self.events.extend(event);
        }
        advanced
    }

    /// Returns an animation.
    #[must_use]
    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(&id)
    }

    /// Returns an animation mutably, e.g. to [`reverse`](Animation::reverse)
    /// or [`reset`](Animation::reset) it.
    pub fn get_mut(&mut self, id: AnimationId) -> Option<&mut Animation> {
        self.animations.get_mut(&id)
    }

    /// Stops an animation according to its stop method and queues
    /// [`AnimationEvent::Stopped`]. Returns `false` if `id` is unknown or
    /// already completed.
    ///
    /// # Panics
    ///
    /// Panics if the stop method writes to a destroyed node.
    pub fn stop(&mut self, id: AnimationId, graph: &mut SceneGraph) -> bool {
        let Some(anim) = self.animations.get_mut(&id) else {
            return false;
        };
        if anim.is_completed() {
            return false;
        }
        let _ = anim.stop(graph);
        self.events.push(AnimationEvent::Stopped {
            animation: id,
            node: anim.node(),
        });
        true
    }

    /// Removes an animation without touching its node.
    pub fn remove(&mut self, id: AnimationId) -> Option<Animation> {
        self.animations.remove(&id)
    }

    /// Removes every animation of `node` and returns how many there were.
    ///
    /// Call this before destroying a node that may still be animated.
    pub fn remove_for_node(&mut self, node: NodeId) -> usize {
        let before = self.animations.len();
        self.animations.retain(|_, a| a.node() != node);
        before - self.animations.len()
    }

    /// Number of registered animations that are not completed.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.animations.values().filter(|a| !a.is_completed()).count()
    }

    /// Number of registered animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.animations.len()
    }

    /// Whether no animations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Queued events, oldest first, without removing them.
    #[must_use]
    pub fn pending_events(&self) -> &[AnimationEvent] {
        &self.events
    }

    /// Removes and returns queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<AnimationEvent> {
        core::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::animation::StopMethod;
    use crate::backend::NullLoader;
    use crate::graph::NodeProps;

    fn setup() -> (SceneGraph, Animator) {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default().with_size(10.0, 10.0));
        graph.create_node(NodeId(2), NodeProps::default().with_size(10.0, 10.0));
        (graph, Animator::new())
    }

    #[test]
    fn lifecycle_events_in_order() {
        let (mut graph, mut animator) = setup();
        let id = animator.create(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0),
        );
        assert_eq!(animator.advance(&mut graph, 60.0), 1);
        assert_eq!(animator.advance(&mut graph, 60.0), 1);
        assert_eq!(animator.advance(&mut graph, 60.0), 0, "completed is idle");
        assert_eq!(
            animator.drain_events(),
            vec![
                AnimationEvent::Started {
                    animation: id,
                    node: NodeId(1)
                },
                AnimationEvent::Finished {
                    animation: id,
                    node: NodeId(1)
                },
            ]
        );
        assert!(animator.drain_events().is_empty());
        assert_eq!(animator.active_count(), 0);
        assert_eq!(animator.len(), 1);
    }

    #[test]
    fn x_reaches_halfway() {
        let (mut graph, mut animator) = setup();
        let _ = animator.create(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(1000.0),
        );
        let _ = animator.advance(&mut graph, 500.0);
        assert!((graph.node(NodeId(1)).x() - 50.0).abs() < 1e-9);
        assert!(graph.has_dirty_nodes());
    }

    #[test]
    fn looping_emits_looped() {
        let (mut graph, mut animator) = setup();
        let id = animator.create(
            &graph,
            NodeId(1),
            &[(Property::Rotation, PropertyValue::Number(1.0))],
            AnimationSettings::new(50.0).with_looping(true),
        );
        for _ in 0..4 {
            let _ = animator.advance(&mut graph, 20.0);
        }
        let looped = animator
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, AnimationEvent::Looped { .. }))
            .count();
        assert_eq!(looped, 1);
        assert_eq!(animator.active_count(), 1);
        assert!(animator.get(id).is_some_and(|a| a.progress() < 1.0));
    }

    #[test]
    fn stop_queues_event_once() {
        let (mut graph, mut animator) = setup();
        let id = animator.create(
            &graph,
            NodeId(1),
            &[(Property::X, PropertyValue::Number(100.0))],
            AnimationSettings::new(100.0).with_stop_method(StopMethod::Reset),
        );
        let _ = animator.advance(&mut graph, 30.0);
        let _ = animator.drain_events();
        assert!(animator.stop(id, &mut graph));
        assert!(!animator.stop(id, &mut graph), "already completed");
        assert_eq!(graph.node(NodeId(1)).x(), 0.0);
        assert_eq!(
            animator.drain_events(),
            vec![AnimationEvent::Stopped {
                animation: id,
                node: NodeId(1)
            }]
        );
    }

    #[test]
    fn reverse_through_get_mut() {
        let (mut graph, mut animator) = setup();
        let id = animator.create(
            &graph,
            NodeId(2),
            &[(Property::Alpha, PropertyValue::Number(0.0))],
            AnimationSettings::new(100.0),
        );
        let _ = animator.advance(&mut graph, 200.0);
        assert_eq!(graph.node(NodeId(2)).alpha(), 0.0);
        if let Some(anim) = animator.get_mut(id) {
            anim.reverse();
        }
        let _ = animator.advance(&mut graph, 200.0);
        assert_eq!(graph.node(NodeId(2)).alpha(), 1.0);
    }

    #[test]
    fn remove_for_node_before_destroy() {
        let (mut graph, mut animator) = setup();
        for target in [10.0, 20.0] {
            let _ = animator.create(
                &graph,
                NodeId(1),
                &[(Property::Y, PropertyValue::Number(target))],
                AnimationSettings::new(100.0),
            );
        }
        let keep = animator.create(
            &graph,
            NodeId(2),
            &[(Property::Y, PropertyValue::Number(5.0))],
            AnimationSettings::new(100.0),
        );
        assert_eq!(animator.remove_for_node(NodeId(1)), 2);
        graph.destroy_node(NodeId(1), &mut NullLoader::new());
        assert_eq!(animator.advance(&mut graph, 10.0), 1);
        assert!(animator.get(keep).is_some());
    }

    #[test]
    fn newer_animation_wins() {
        let (mut graph, mut animator) = setup();
        for target in [10.0, 20.0] {
            let _ = animator.create(
                &graph,
                NodeId(1),
                &[(Property::X, PropertyValue::Number(target))],
                AnimationSettings::default(),
            );
        }
        let _ = animator.advance(&mut graph, 0.0);
        assert_eq!(graph.node(NodeId(1)).x(), 20.0);
    }
}
