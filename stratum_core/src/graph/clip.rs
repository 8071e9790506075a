// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned clip rectangle computation.

use kurbo::Rect;

use crate::matrix::Matrix;

/// Computes a node's effective clip rectangle in global space.
///
/// - Neither clipping nor inheriting a clip: `None`.
/// - Rotated in global space: `None`; rotated clip regions are not
///   representable as a rectangle, so clipping is disabled for the node.
/// - Clipping: the node's own global rect, intersected with `parent_clip`.
/// - Otherwise: `parent_clip` is inherited unchanged.
pub(crate) fn compute_clip(
    global: &Matrix,
    width: f64,
    height: f64,
    clipping: bool,
    parent_clip: Option<Rect>,
) -> Option<Rect> {
    if !clipping && parent_clip.is_none() {
        return None;
    }
    if global.is_rotated() {
        return None;
    }
    if !clipping {
        return parent_clip;
    }
    let own = Rect::new(
        global.tx,
        global.ty,
        global.tx + width * global.ta,
        global.ty + height * global.td,
    )
    .abs();
    Some(match parent_clip {
        Some(parent) => own.intersect(parent),
        None => own,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_clip_without_flag_or_parent() {
        let m = Matrix::from_translation(5.0, 5.0);
        assert_eq!(compute_clip(&m, 10.0, 10.0, false, None), None);
    }

    #[test]
    fn own_rect_when_clipping_root() {
        let m = Matrix::from_translation(5.0, 6.0);
        assert_eq!(
            compute_clip(&m, 10.0, 20.0, true, None),
            Some(Rect::new(5.0, 6.0, 15.0, 26.0))
        );
    }

    #[test]
    fn intersects_parent() {
        let m = Matrix::from_translation(150.0, 0.0);
        let parent = Some(Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(
            compute_clip(&m, 100.0, 100.0, true, parent),
            Some(Rect::new(150.0, 0.0, 200.0, 100.0))
        );
    }

    #[test]
    fn inherits_parent_when_not_clipping() {
        let m = Matrix::from_translation(500.0, 500.0);
        let parent = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(compute_clip(&m, 1.0, 1.0, false, parent), parent);
    }

    #[test]
    fn rotation_disables_clip() {
        let m = Matrix::from_rotation(0.1);
        let parent = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(compute_clip(&m, 5.0, 5.0, true, parent), None);
        assert_eq!(compute_clip(&m, 5.0, 5.0, false, parent), None);
    }

    #[test]
    fn negative_scale_normalizes() {
        let m = Matrix::from_translation(10.0, 0.0) * Matrix::from_scale(-1.0, 1.0);
        assert_eq!(
            compute_clip(&m, 4.0, 4.0, true, None),
            Some(Rect::new(6.0, 0.0, 10.0, 4.0))
        );
    }

    #[test]
    fn disjoint_parent_gives_empty_rect() {
        let m = Matrix::from_translation(50.0, 50.0);
        let parent = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        let clip = compute_clip(&m, 5.0, 5.0, true, parent);
        assert!(clip.is_some_and(|r| r.is_zero_area()), "{clip:?}");
    }
}
