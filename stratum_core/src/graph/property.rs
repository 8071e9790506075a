// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name-addressed property access.
//!
//! [`Property`] names every animatable node property so that callers such as
//! the animation engine can read and write them generically. Writes go
//! through the regular setters and therefore mark the node dirty exactly as
//! a direct setter call would.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use super::id::NodeId;
use super::node::{CORNER_BL, CORNER_BR, CORNER_UL, CORNER_UR};
use super::store::SceneGraph;
use crate::color::Color;

/// An animatable node property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// X position.
    X,
    /// Y position.
    Y,
    /// Width.
    Width,
    /// Height.
    Height,
    /// Horizontal scale.
    ScaleX,
    /// Vertical scale.
    ScaleY,
    /// Rotation in radians.
    Rotation,
    /// Horizontal mount point.
    MountX,
    /// Vertical mount point.
    MountY,
    /// Horizontal pivot point.
    PivotX,
    /// Vertical pivot point.
    PivotY,
    /// Opacity.
    Alpha,
    /// Z-index. Written values are rounded to the nearest integer.
    ZIndex,
    /// All four corners. Reads return the upper-left corner.
    Color,
    /// Both upper corners. Reads return the upper-left corner.
    ColorTop,
    /// Both bottom corners. Reads return the bottom-left corner.
    ColorBottom,
    /// Both left corners. Reads return the upper-left corner.
    ColorLeft,
    /// Both right corners. Reads return the upper-right corner.
    ColorRight,
    /// Upper-left corner.
    ColorUl,
    /// Upper-right corner.
    ColorUr,
    /// Bottom-left corner.
    ColorBl,
    /// Bottom-right corner.
    ColorBr,
}

impl Property {
    /// Whether the property holds a [`Color`] rather than a number.
    #[must_use]
    pub const fn is_color(self) -> bool {
        matches!(
            self,
            Self::Color
                | Self::ColorTop
                | Self::ColorBottom
                | Self::ColorLeft
                | Self::ColorRight
                | Self::ColorUl
                | Self::ColorUr
                | Self::ColorBl
                | Self::ColorBr
        )
    }
}

/// A property value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    /// A numeric property.
    Number(f64),
    /// A color property.
    Color(Color),
}

impl PropertyValue {
    /// The number, if this is one.
    #[must_use]
    pub const fn as_number(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n),
            Self::Color(_) => None,
        }
    }

    /// The color, if this is one.
    #[must_use]
    pub const fn as_color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<Color> for PropertyValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

impl SceneGraph {
    /// Reads a property.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn property(&self, id: NodeId, property: Property) -> PropertyValue {
        let node = self.node(id);
        let n = PropertyValue::Number;
        let c = |corner: usize| PropertyValue::Color(node.colors[corner]);
        match property {
            Property::X => n(node.x),
            Property::Y => n(node.y),
            Property::Width => n(node.width),
            Property::Height => n(node.height),
            Property::ScaleX => n(node.scale_x),
            Property::ScaleY => n(node.scale_y),
            Property::Rotation => n(node.rotation),
            Property::MountX => n(node.mount_x),
            Property::MountY => n(node.mount_y),
            Property::PivotX => n(node.pivot_x),
            Property::PivotY => n(node.pivot_y),
            Property::Alpha => n(node.alpha),
            Property::ZIndex => n(f64::from(node.z_index)),
            Property::Color | Property::ColorTop | Property::ColorLeft | Property::ColorUl => {
                c(CORNER_UL)
            }
            Property::ColorRight | Property::ColorUr => c(CORNER_UR),
            Property::ColorBottom | Property::ColorBl => c(CORNER_BL),
            Property::ColorBr => c(CORNER_BR),
        }
    }

    /// Writes a property through its setter.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered, or if `value` is a color for a
    /// numeric property or vice versa.
    pub fn set_property(&mut self, id: NodeId, property: Property, value: PropertyValue) {
        if property.is_color() {
            let Some(color) = value.as_color() else {
                panic!("{property:?} expects a color, got {value:?}");
            };
            match property {
                Property::ColorTop => self.set_color_top(id, color),
                Property::ColorBottom => self.set_color_bottom(id, color),
                Property::ColorLeft => self.set_color_left(id, color),
                Property::ColorRight => self.set_color_right(id, color),
                Property::ColorUl => self.set_corner_color(id, CORNER_UL, color),
                Property::ColorUr => self.set_corner_color(id, CORNER_UR, color),
                Property::ColorBl => self.set_corner_color(id, CORNER_BL, color),
                Property::ColorBr => self.set_corner_color(id, CORNER_BR, color),
                _ => self.set_color(id, color),
            }
            return;
        }

        let Some(v) = value.as_number() else {
            panic!("{property:?} expects a number, got {value:?}");
        };
        match property {
            Property::X => self.set_x(id, v),
            Property::Y => self.set_y(id, v),
            Property::Width => self.set_width(id, v),
            Property::Height => self.set_height(id, v),
            Property::ScaleX => self.set_scale_x(id, v),
            Property::ScaleY => self.set_scale_y(id, v),
            Property::Rotation => self.set_rotation(id, v),
            Property::MountX => self.set_mount_x(id, v),
            Property::MountY => self.set_mount_y(id, v),
            Property::PivotX => self.set_pivot_x(id, v),
            Property::PivotY => self.set_pivot_y(id, v),
            Property::Alpha => self.set_alpha(id, v),
            Property::ZIndex => self.set_z_index(id, z_from_f64(v)),
            _ => unreachable!("color properties handled above"),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "z-indices are small integers; out-of-range values saturate"
)]
fn z_from_f64(v: f64) -> i32 {
    v.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::Recalc;
    use crate::graph::NodeProps;

    #[test]
    fn numeric_round_trip_through_setters() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default());
        graph.clear_dirty();

        graph.set_property(NodeId(1), Property::X, PropertyValue::Number(12.5));
        assert_eq!(graph.property(NodeId(1), Property::X), PropertyValue::Number(12.5));
        assert!(
            graph.node(NodeId(1)).recalc().contains(Recalc::TRANSLATE),
            "write went through the setter"
        );
        assert!(graph.has_dirty_nodes());
    }

    #[test]
    fn z_index_rounds() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default());
        graph.set_property(NodeId(1), Property::ZIndex, PropertyValue::Number(2.6));
        assert_eq!(graph.node(NodeId(1)).z_index(), 3);
        graph.set_property(NodeId(1), Property::ZIndex, PropertyValue::Number(-1.4));
        assert_eq!(graph.node(NodeId(1)).z_index(), -1);
    }

    #[test]
    fn color_groups() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default().with_color(Color::BLACK));
        let red = Color(0xFFFF_0000);
        graph.set_property(NodeId(1), Property::ColorRight, red.into());
        assert_eq!(
            graph.node(NodeId(1)).colors(),
            [Color::BLACK, red, Color::BLACK, red]
        );
        assert_eq!(graph.property(NodeId(1), Property::ColorUr), red.into());
        assert_eq!(graph.property(NodeId(1), Property::ColorTop), Color::BLACK.into());
    }

    #[test]
    #[should_panic(expected = "Alpha expects a number")]
    fn kind_mismatch_panics() {
        let mut graph = SceneGraph::new();
        graph.create_node(NodeId(1), NodeProps::default());
        graph.set_property(NodeId(1), Property::Alpha, Color::WHITE.into());
    }

    #[test]
    fn is_color_partitions() {
        assert!(Property::ColorBl.is_color());
        assert!(!Property::Rotation.is_color());
    }
}
