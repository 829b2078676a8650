//! Backend-agnostic visual trees produced by shape utils.
//!
//! A [`Visual`] is expressed in shape-local coordinates (origin at the
//! shape's top-left corner). Hosts place it on the page with the shape's
//! point and rotation, see [`placement`].

use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};
use peniko::Color;

/// Opacity applied to ghosted shapes.
pub const GHOSTED_OPACITY: f64 = 0.3;

/// How far the binding indicator extends past a shape's edges.
pub const BINDING_DISTANCE: f64 = 16.0;

/// Default color for selection indicators.
pub const INDICATOR_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);

/// Rendering context shared by every shape in a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderMeta {
    pub is_dark_mode: bool,
}

/// Per-shape rendering flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderProps {
    pub meta: RenderMeta,
    pub is_ghost: bool,
    /// The shape is the live target of an in-progress binding.
    pub is_binding: bool,
    pub is_hovered: bool,
    pub is_selected: bool,
}

/// A node in a shape's visual tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// Transformed group with an opacity applied to all children.
    Group {
        transform: Affine,
        opacity: f64,
        children: Vec<Visual>,
    },
    /// A filled path.
    Fill { path: BezPath, color: Color },
    /// A stroked path.
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        dashes: Vec<f64>,
    },
    /// A soft drop shadow under a rounded box.
    Shadow {
        rect: Rect,
        radius: f64,
        color: Color,
        offset: Vec2,
        blur: f64,
    },
    /// Highlight drawn behind a shape that an arrow is about to bind to.
    BindingIndicator { rect: Rect },
}

impl Visual {
    /// Identity group around `children`.
    pub fn group(children: Vec<Visual>) -> Self {
        Visual::Group {
            transform: Affine::IDENTITY,
            opacity: 1.0,
            children,
        }
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn walk(&self) -> Vec<&Visual> {
        let mut out = vec![self];
        if let Visual::Group { children, .. } = self {
            for child in children {
                out.extend(child.walk());
            }
        }
        out
    }

    /// Whether the tree contains a binding indicator.
    pub fn has_binding_indicator(&self) -> bool {
        self.walk()
            .iter()
            .any(|v| matches!(v, Visual::BindingIndicator { .. }))
    }
}

/// Placement transform for a shape with the given point, size and rotation.
pub fn placement(point: Point, size: Size, rotation: f64) -> Affine {
    let translate = Affine::translate(point.to_vec2());
    if rotation == 0.0 {
        translate
    } else {
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        translate * Affine::rotate_about(rotation, center)
    }
}

/// The binding highlight rect for a shape of `size`.
pub fn binding_rect(size: Size) -> Rect {
    Rect::from_origin_size(Point::ZERO, size).inflate(BINDING_DISTANCE, BINDING_DISTANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_visits_nested_children() {
        let tree = Visual::group(vec![
            Visual::BindingIndicator {
                rect: Rect::ZERO,
            },
            Visual::group(vec![Visual::Fill {
                path: BezPath::new(),
                color: Color::WHITE,
            }]),
        ]);
        assert_eq!(tree.walk().len(), 4);
        assert!(tree.has_binding_indicator());
    }

    #[test]
    fn test_placement_rotates_about_center() {
        let affine = placement(Point::new(10.0, 20.0), Size::new(10.0, 10.0), std::f64::consts::PI);
        let corner = affine * Point::ZERO;
        assert!((corner.x - 20.0).abs() < 1e-9);
        assert!((corner.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_binding_rect_inflates() {
        let rect = binding_rect(Size::new(70.0, 70.0));
        assert_eq!(rect, Rect::new(-16.0, -16.0, 86.0, 86.0));
    }
}
