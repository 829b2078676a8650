//! Ellipse shape.

use super::bounds::{BoundsCache, bounds_rectangle};
use super::style::{ShapeStyle, shape_style, to_hex};
use super::transform::transform_rectangle;
use super::{
    PAGE_PARENT, ShapeCapabilities, ShapeError, ShapeId, ShapeKind, ShapePartial, ShapeUtil,
    TransformInfo,
};
use crate::svg::{SvgElement, fmt_num};
use crate::visual::{GHOSTED_OPACITY, INDICATOR_COLOR, RenderProps, Visual, binding_rect};
use kurbo::{Affine, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in the box at `point` with size `2 * radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    pub name: String,
    pub parent_id: String,
    pub child_index: f64,
    /// Top-left corner of the bounding box.
    pub point: Point,
    /// Horizontal and vertical radii.
    pub radius: Vec2,
    #[serde(default)]
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Ellipse {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn size(&self) -> Size {
        Size::new(self.radius.x * 2.0, self.radius.y * 2.0)
    }

    pub fn center(&self) -> Point {
        self.point + self.radius
    }

    fn template() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Ellipse".to_string(),
            parent_id: PAGE_PARENT.to_string(),
            child_index: 1.0,
            point: Point::ZERO,
            radius: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            style: ShapeStyle::default(),
        }
    }

    /// Create an ellipse filling a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Result<Self, ShapeError> {
        EllipseUtil::new().get_shape(&ShapePartial {
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
            self.radius = Vec2::new(size.width / 2.0, size.height / 2.0);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(style) = &patch.style {
            self.style = self.style.merged(style);
        }
    }

    /// Local-space outline, shrunk so the stroke stays inside the box.
    fn outline(&self, stroke_width: f64) -> KurboEllipse {
        let inset = stroke_width / 2.0;
        let rx = (self.radius.x - inset).max(self.radius.x / 2.0);
        let ry = (self.radius.y - inset).max(self.radius.y / 2.0);
        KurboEllipse::new(self.radius.to_point(), (rx, ry), 0.0)
    }
}

/// Util for [`Ellipse`] shapes.
#[derive(Debug, Default)]
pub struct EllipseUtil {
    bounds_cache: BoundsCache,
}

impl EllipseUtil {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShapeUtil for EllipseUtil {
    type Shape = Ellipse;

    const KIND: ShapeKind = ShapeKind::Ellipse;
    const CAPABILITIES: ShapeCapabilities = ShapeCapabilities {
        can_bind: true,
        can_edit: false,
        can_clone: true,
        hide_resize_handles: false,
        show_clone_handles: false,
        is_aspect_ratio_locked: false,
    };

    fn get_shape(&self, partial: &ShapePartial) -> Result<Ellipse, ShapeError> {
        partial.validate()?;
        partial.expect_kind(Self::KIND)?;
        let mut ellipse = Ellipse::template();
        ellipse.apply(partial);
        if let Some(id) = partial.id {
            ellipse.id = id;
        }
        Ok(ellipse)
    }

    fn render(&self, shape: &Ellipse, props: &RenderProps) -> Visual {
        let style = shape_style(&shape.style, props.meta.is_dark_mode);
        let outline = shape.outline(style.stroke_width).to_path(0.1);

        let mut children = Vec::with_capacity(3);
        if props.is_binding {
            children.push(Visual::BindingIndicator {
                rect: binding_rect(shape.size()),
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

    fn indicator(&self, shape: &Ellipse) -> Visual {
        let radii = Vec2::new(shape.radius.x.max(0.5), shape.radius.y.max(0.5));
        Visual::Stroke {
            path: KurboEllipse::new(radii.to_point(), radii, 0.0).to_path(0.1),
            color: INDICATOR_COLOR,
            width: 1.5,
            dashes: Vec::new(),
        }
    }

    fn bounds(&self, shape: &Ellipse) -> Rect {
        bounds_rectangle(&self.bounds_cache, shape.id, shape.point, shape.size())
    }

    fn should_skip_rerender(&self, prev: &Ellipse, next: &Ellipse) -> bool {
        prev.radius == next.radius && prev.style == next.style
    }

    fn transform(&self, shape: &Ellipse, bounds: Rect, info: &TransformInfo<'_, Ellipse>) -> ShapePartial {
        transform_rectangle(
            shape.size(),
            shape.rotation,
            info.initial_shape.size(),
            info.initial_shape.rotation,
            Self::CAPABILITIES.is_aspect_ratio_locked,
            bounds,
            info,
        )
    }

    fn to_svg(&self, shape: &Ellipse, is_dark_mode: bool) -> Option<SvgElement> {
        let style = shape_style(&shape.style, is_dark_mode);
        let outline = shape.outline(style.stroke_width);
        let mut el = SvgElement::new("ellipse")
            .attr("cx", fmt_num(outline.center().x))
            .attr("cy", fmt_num(outline.center().y))
            .attr("rx", fmt_num(outline.radii().x))
            .attr("ry", fmt_num(outline.radii().y))
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
            el.set_attr("stroke-dasharray", joined.join(" "));
        }
        Some(el)
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

    #[test]
    fn test_size_patch_sets_radius() {
        let ellipse = EllipseUtil::new()
            .get_shape(&ShapePartial {
                size: Some(Size::new(60.0, 40.0)),
                ..ShapePartial::default()
            })
            .unwrap();
        assert_eq!(ellipse.radius, Vec2::new(30.0, 20.0));
        assert_eq!(ellipse.size(), Size::new(60.0, 40.0));
        assert_eq!(ellipse.center(), Point::new(30.0, 20.0));
    }

    #[test]
    fn test_from_rect() {
        let ellipse = Ellipse::from_rect(Rect::new(10.0, 10.0, 50.0, 30.0)).unwrap();
        assert_eq!(ellipse.point, Point::new(10.0, 10.0));
        assert_eq!(ellipse.radius, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_bounds() {
        let util = EllipseUtil::new();
        let ellipse = Ellipse::from_rect(Rect::new(10.0, 10.0, 50.0, 30.0)).unwrap();
        assert_eq!(util.bounds(&ellipse), Rect::new(10.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn test_transform_resizes_radius() {
        let util = EllipseUtil::new();
        let mut ellipse = Ellipse::from_rect(Rect::new(0.0, 0.0, 20.0, 20.0)).unwrap();
        let initial = ellipse.clone();
        let info = TransformInfo::new(&initial, 2.0, 1.0, Vec2::ZERO);
        let patch = util.transform(&ellipse, Rect::new(0.0, 0.0, 40.0, 20.0), &info);
        ellipse.apply(&patch);
        assert_eq!(ellipse.radius, Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_svg_export() {
        let util = EllipseUtil::new();
        let ellipse = Ellipse::from_rect(Rect::new(0.0, 0.0, 40.0, 20.0)).unwrap();
        let svg = util.to_svg(&ellipse, true).unwrap();
        assert_eq!(svg.tag, "ellipse");
        assert_eq!(svg.get_attr("cx"), Some("20"));
        assert_eq!(svg.get_attr("cy"), Some("10"));
    }
}
