//! Rectangle shape.

use super::bounds::{BoundsCache, bounds_rectangle};
use super::style::{ShapeStyle, shape_style, to_hex};
use super::transform::transform_rectangle;
use super::{
    PAGE_PARENT, ShapeCapabilities, ShapeError, ShapeId, ShapeKind, ShapePartial, ShapeUtil,
    TransformInfo,
};
use crate::svg::{SvgElement, fmt_num};
use crate::visual::{GHOSTED_OPACITY, INDICATOR_COLOR, RenderProps, Visual, binding_rect};
use kurbo::{Affine, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned box, optionally rotated about its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    pub name: String,
    pub parent_id: String,
    pub child_index: f64,
    /// Top-left corner.
    pub point: Point,
    pub size: Size,
    #[serde(default)]
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    fn template() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Rectangle".to_string(),
            parent_id: PAGE_PARENT.to_string(),
            child_index: 1.0,
            point: Point::ZERO,
            size: Size::new(1.0, 1.0),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Result<Self, ShapeError> {
        let rect = Rect::from_points(p1, p2);
        RectangleUtil::new().get_shape(&ShapePartial {
            point: Some(rect.origin()),
            size: Some(Size::new(rect.width().max(1.0), rect.height().max(1.0))),
            ..ShapePartial::default()
        })
    }

    pub(crate) fn apply(&mut self, patch: &ShapePartial) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(parent_id) = &patch.parent_id {
            self.parent_id = parent_id.clone();
        }
        if let Some(child_index) = patch.child_index {
            self.child_index = child_index;
        }
        if let Some(point) = patch.point {
            self.point = point;
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(style) = &patch.style {
            self.style = self.style.merged(style);
        }
    }

    /// The stroked outline in local coordinates, inset so the stroke stays inside the box.
    fn outline(&self, stroke_width: f64) -> Rect {
        let inset = (stroke_width / 2.0)
            .min(self.size.width / 2.0)
            .min(self.size.height / 2.0);
        Rect::from_origin_size(Point::ZERO, self.size).inset(-inset)
    }
}

/// Util for [`Rectangle`] shapes.
#[derive(Debug, Default)]
pub struct RectangleUtil {
    bounds_cache: BoundsCache,
}

impl RectangleUtil {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShapeUtil for RectangleUtil {
    type Shape = Rectangle;

    const KIND: ShapeKind = ShapeKind::Rectangle;
    const CAPABILITIES: ShapeCapabilities = ShapeCapabilities {
        can_bind: true,
        can_edit: false,
        can_clone: true,
        hide_resize_handles: false,
        show_clone_handles: false,
        is_aspect_ratio_locked: false,
    };

    fn get_shape(&self, partial: &ShapePartial) -> Result<Rectangle, ShapeError> {
        partial.validate()?;
        partial.expect_kind(Self::KIND)?;
        let mut rect = Rectangle::template();
        rect.apply(partial);
        if let Some(id) = partial.id {
            rect.id = id;
        }
        Ok(rect)
    }

    fn render(&self, shape: &Rectangle, props: &RenderProps) -> Visual {
        let style = shape_style(&shape.style, props.meta.is_dark_mode);
        let outline = shape.outline(style.stroke_width).to_path(0.1);

        let mut children = Vec::with_capacity(3);
        if props.is_binding {
            children.push(Visual::BindingIndicator {
                rect: binding_rect(shape.size),
            });
        }
        if shape.style.is_filled {
            children.push(Visual::Fill {
                path: outline.clone(),
                color: style.fill,
            });
        }
        children.push(Visual::Stroke {
            path: outline,
            color: style.stroke,
            width: style.stroke_width,
            dashes: shape.style.dash.dashes(style.stroke_width),
        });

        Visual::Group {
            transform: Affine::IDENTITY,
            opacity: if props.is_ghost { GHOSTED_OPACITY } else { 1.0 },
            children,
        }
    }

    fn indicator(&self, shape: &Rectangle) -> Visual {
        let rect = Rect::new(0.0, 0.0, shape.size.width.max(1.0), shape.size.height.max(1.0));
        Visual::Stroke {
            path: rect.to_path(0.1),
            color: INDICATOR_COLOR,
            width: 1.5,
            dashes: Vec::new(),
        }
    }

    fn bounds(&self, shape: &Rectangle) -> Rect {
        bounds_rectangle(&self.bounds_cache, shape.id, shape.point, shape.size)
    }

    fn should_skip_rerender(&self, prev: &Rectangle, next: &Rectangle) -> bool {
        prev.size == next.size && prev.style == next.style
    }

    fn transform(
        &self,
        shape: &Rectangle,
        bounds: Rect,
        info: &TransformInfo<'_, Rectangle>,
    ) -> ShapePartial {
        transform_rectangle(
            shape.size,
            shape.rotation,
            info.initial_shape.size,
            info.initial_shape.rotation,
            Self::CAPABILITIES.is_aspect_ratio_locked,
            bounds,
            info,
        )
    }

    fn to_svg(&self, shape: &Rectangle, is_dark_mode: bool) -> Option<SvgElement> {
        let style = shape_style(&shape.style, is_dark_mode);
        let outline = shape.outline(style.stroke_width);
        let mut rect = SvgElement::new("rect")
            .attr("x", fmt_num(outline.x0))
            .attr("y", fmt_num(outline.y0))
            .attr("width", fmt_num(outline.width()))
            .attr("height", fmt_num(outline.height()))
            .attr("stroke", to_hex(style.stroke))
            .attr("stroke-width", fmt_num(style.stroke_width))
            .attr(
                "fill",
                if shape.style.is_filled {
                    to_hex(style.fill)
                } else {
                    "none".to_string()
                },
            );
        let dashes = shape.style.dash.dashes(style.stroke_width);
        if !dashes.is_empty() {
            let joined: Vec<String> = dashes.into_iter().map(fmt_num).collect();
            rect.set_attr("stroke-dasharray", joined.join(" "));
        }
        Some(rect)
    }

    fn forget(&self, id: ShapeId) {
        self.bounds_cache.remove(id);
    }

    fn cached_bounds(&self) -> usize {
        self.bounds_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::style::{DashStyle, StylePartial};
    use kurbo::Vec2;

    fn rect(point: Point, size: Size) -> Rectangle {
        RectangleUtil::new()
            .get_shape(&ShapePartial {
                point: Some(point),
                size: Some(size),
                ..ShapePartial::default()
            })
            .unwrap()
    }

    #[test]
    fn test_template_defaults() {
        let r = RectangleUtil::new().get_shape(&ShapePartial::default()).unwrap();
        assert_eq!(r.name, "Rectangle");
        assert_eq!(r.size, Size::new(1.0, 1.0));
        assert_eq!(r.style, ShapeStyle::default());
    }

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rectangle::from_corners(Point::new(100.0, 80.0), Point::new(20.0, 30.0)).unwrap();
        assert_eq!(r.point, Point::new(20.0, 30.0));
        assert_eq!(r.size, Size::new(80.0, 50.0));
    }

    #[test]
    fn test_transform_takes_target_box() {
        let util = RectangleUtil::new();
        let r = rect(Point::ZERO, Size::new(10.0, 10.0));
        let info = TransformInfo::new(&r, 3.0, 2.0, Vec2::ZERO);
        let patch = util.transform(&r, Rect::new(1.0, 2.0, 31.0, 22.0), &info);
        assert_eq!(patch.point, Some(Point::new(1.0, 2.0)));
        assert_eq!(patch.size, Some(Size::new(30.0, 20.0)));
    }

    #[test]
    fn test_transform_single_matches_transform() {
        let util = RectangleUtil::new();
        let r = rect(Point::ZERO, Size::new(10.0, 10.0));
        let info = TransformInfo::new(&r, 2.0, 2.0, Vec2::ZERO);
        let bounds = Rect::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(
            util.transform(&r, bounds, &info),
            util.transform_single(&r, bounds, &info)
        );
    }

    #[test]
    fn test_render_fill_only_when_filled() {
        let util = RectangleUtil::new();
        let mut r = rect(Point::ZERO, Size::new(40.0, 20.0));
        let has_fill = |v: &Visual| v.walk().iter().any(|n| matches!(n, Visual::Fill { .. }));
        assert!(!has_fill(&util.render(&r, &RenderProps::default())));
        r.style = r.style.merged(&StylePartial {
            is_filled: Some(true),
            ..StylePartial::default()
        });
        assert!(has_fill(&util.render(&r, &RenderProps::default())));
    }

    #[test]
    fn test_svg_export_dashes() {
        let util = RectangleUtil::new();
        let mut r = rect(Point::ZERO, Size::new(40.0, 20.0));
        let svg = util.to_svg(&r, false).unwrap();
        assert_eq!(svg.tag, "rect");
        assert_eq!(svg.get_attr("fill"), Some("none"));
        assert!(svg.get_attr("stroke-dasharray").is_none());

        r.style.dash = DashStyle::Dashed;
        let svg = util.to_svg(&r, false).unwrap();
        assert!(svg.get_attr("stroke-dasharray").is_some());
    }

    #[test]
    fn test_skip_rerender_ignores_position() {
        let util = RectangleUtil::new();
        let a = rect(Point::ZERO, Size::new(40.0, 20.0));
        let mut b = a.clone();
        b.point = Point::new(5.0, 5.0);
        assert!(util.should_skip_rerender(&a, &b));
        b.size = Size::new(41.0, 20.0);
        assert!(!util.should_skip_rerender(&a, &b));
    }
}
