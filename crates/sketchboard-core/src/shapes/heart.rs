//! Heart shape: a sticky-like rounded card showing a heart glyph.

use super::bounds::{BoundsCache, bounds_rectangle};
use super::style::{ShapeStyle, sticky_shape_style, to_hex};
use super::transform::anchored_point;
use super::{
    PAGE_PARENT, ShapeCapabilities, ShapeError, ShapeId, ShapeKind, ShapePartial, ShapeUtil,
    TransformInfo,
};
use crate::svg::SvgElement;
use crate::visual::{GHOSTED_OPACITY, INDICATOR_COLOR, RenderProps, Visual, binding_rect};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape as KurboShape, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// Heart glyph outline on a 15×15 grid.
pub const HEART_PATH_DATA: &str = "M1.35248 4.90532C1.35248 2.94498 2.936 1.35248 4.89346 1.35248C6.25769 1.35248 6.86058 1.92336 7.50002 2.93545C8.13946 1.92336 8.74235 1.35248 10.1066 1.35248C12.064 1.35248 13.6476 2.94498 13.6476 4.90532C13.6476 6.74041 12.6013 8.50508 11.4008 9.96927C10.2636 11.3562 8.92194 12.5508 8.00601 13.3664C7.94645 13.4194 7.88869 13.4709 7.83291 13.5206C7.64324 13.6899 7.3568 13.6899 7.16713 13.5206C7.11135 13.4709 7.05359 13.4194 6.99403 13.3664C6.0781 12.5508 4.73641 11.3562 3.59926 9.96927C2.39872 8.50508 1.35248 6.74041 1.35248 4.90532Z";

const GLYPH_GRID: f64 = 15.0;
const GLYPH_SCALE: f64 = 4.0;
const GLYPH_COLOR: Color = Color::from_rgba8(0xff, 0x8a, 0x8a, 0xff);
const CARD_COLOR: Color = Color::WHITE;
const EXPORT_CORNER_RADIUS: f64 = 3.0;

fn heart_glyph() -> &'static BezPath {
    static GLYPH: OnceLock<BezPath> = OnceLock::new();
    GLYPH.get_or_init(|| {
        BezPath::from_svg(HEART_PATH_DATA).unwrap_or_else(|e| {
            log::error!("Heart glyph failed to parse: {}", e);
            BezPath::new()
        })
    })
}

/// A heart card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heart {
    pub(crate) id: ShapeId,
    pub name: String,
    pub parent_id: String,
    pub child_index: f64,
    /// Top-left corner.
    pub point: Point,
    pub size: Size,
    /// Rotation in radians around the center.
    pub rotation: f64,
    pub style: ShapeStyle,
}

impl Heart {
    pub fn id(&self) -> ShapeId {
        self.id
    }

    fn template() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: "Heart".to_string(),
            parent_id: PAGE_PARENT.to_string(),
            child_index: 1.0,
            point: Point::ZERO,
            size: Size::new(70.0, 70.0),
            rotation: 0.0,
            style: ShapeStyle::text(),
        }
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
}

/// Util for [`Heart`] shapes.
#[derive(Debug, Default)]
pub struct HeartUtil {
    bounds_cache: BoundsCache,
}

impl HeartUtil {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShapeUtil for HeartUtil {
    type Shape = Heart;

    const KIND: ShapeKind = ShapeKind::Heart;
    const CAPABILITIES: ShapeCapabilities = ShapeCapabilities {
        can_bind: true,
        can_edit: true,
        can_clone: true,
        hide_resize_handles: true,
        show_clone_handles: true,
        is_aspect_ratio_locked: false,
    };

    fn get_shape(&self, partial: &ShapePartial) -> Result<Heart, ShapeError> {
        partial.validate()?;
        partial.expect_kind(Self::KIND)?;
        let mut heart = Heart::template();
        heart.apply(partial);
        if let Some(id) = partial.id {
            heart.id = id;
        }
        Ok(heart)
    }

    fn render(&self, shape: &Heart, props: &RenderProps) -> Visual {
        let size = shape.size;
        let card = Rect::from_origin_size(Point::ZERO, size);
        let radius = size.width.min(size.height) / 2.0;
        let shadow_alpha: f32 = if props.meta.is_dark_mode { 0.3 } else { 0.2 };

        let mut children = Vec::with_capacity(4);
        if props.is_binding {
            children.push(Visual::BindingIndicator {
                rect: binding_rect(size),
            });
        }
        children.push(Visual::Shadow {
            rect: card,
            radius,
            color: Color::BLACK.multiply_alpha(shadow_alpha),
            offset: Vec2::new(2.0, 3.0),
            blur: 12.0,
        });
        children.push(Visual::Fill {
            path: RoundedRect::from_rect(card, radius).to_path(0.1),
            color: CARD_COLOR,
        });

        let center = card.center().to_vec2();
        let glyph_transform = Affine::translate(center)
            * Affine::scale(GLYPH_SCALE)
            * Affine::translate(Vec2::new(-GLYPH_GRID / 2.0, -GLYPH_GRID / 2.0));
        children.push(Visual::Fill {
            path: glyph_transform * heart_glyph().clone(),
            color: GLYPH_COLOR,
        });

        Visual::Group {
            transform: Affine::IDENTITY,
            opacity: if props.is_ghost { GHOSTED_OPACITY } else { 1.0 },
            children,
        }
    }

    fn indicator(&self, shape: &Heart) -> Visual {
        let rect = Rect::new(0.0, 0.0, shape.size.width.max(1.0), shape.size.height.max(1.0));
        Visual::Stroke {
            path: RoundedRect::from_rect(rect, 3.0).to_path(0.1),
            color: INDICATOR_COLOR,
            width: 1.5,
            dashes: Vec::new(),
        }
    }

    fn bounds(&self, shape: &Heart) -> Rect {
        bounds_rectangle(&self.bounds_cache, shape.id, shape.point, shape.size)
    }

    fn should_skip_rerender(&self, prev: &Heart, next: &Heart) -> bool {
        prev.size == next.size && prev.style == next.style
    }

    fn transform(&self, shape: &Heart, bounds: Rect, info: &TransformInfo<'_, Heart>) -> ShapePartial {
        ShapePartial::point(anchored_point(shape.size, bounds, info))
    }

    fn transform_single(
        &self,
        _shape: &Heart,
        _bounds: Rect,
        _info: &TransformInfo<'_, Heart>,
    ) -> ShapePartial {
        ShapePartial::default()
    }

    fn to_svg(&self, shape: &Heart, is_dark_mode: bool) -> Option<SvgElement> {
        let bounds = self.bounds(shape);
        let style = sticky_shape_style(&shape.style, is_dark_mode);
        let rect = SvgElement::new("rect")
            .attr("width", bounds.width())
            .attr("height", bounds.height())
            .attr("fill", to_hex(style.fill))
            .attr("rx", EXPORT_CORNER_RADIUS)
            .attr("ry", EXPORT_CORNER_RADIUS);
        Some(SvgElement::new("g").child(rect))
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
    use crate::shapes::style::{ColorStyle, StylePartial};
    use crate::visual::RenderMeta;

    fn heart_at(point: Point) -> Heart {
        HeartUtil::new()
            .get_shape(&ShapePartial::point(point))
            .unwrap()
    }

    #[test]
    fn test_default_heart_with_point() {
        let heart = heart_at(Point::new(5.0, 5.0));
        assert_eq!(heart.point, Point::new(5.0, 5.0));
        assert_eq!(heart.size, Size::new(70.0, 70.0));
        assert_eq!(heart.name, "Heart");
        assert_eq!(heart.parent_id, "page");
        assert!((heart.child_index - 1.0).abs() < f64::EPSILON);
        assert!(heart.rotation.abs() < f64::EPSILON);
        assert_eq!(heart.style, ShapeStyle::text());
    }

    #[test]
    fn test_partial_overrides_and_style_deep_merge() {
        let util = HeartUtil::new();
        let id = Uuid::new_v4();
        let heart = util
            .get_shape(&ShapePartial {
                id: Some(id),
                size: Some(Size::new(30.0, 40.0)),
                style: Some(StylePartial {
                    color: Some(ColorStyle::Red),
                    ..StylePartial::default()
                }),
                ..ShapePartial::default()
            })
            .unwrap();
        assert_eq!(heart.id(), id);
        assert_eq!(heart.size, Size::new(30.0, 40.0));
        assert_eq!(heart.point, Point::ZERO);
        assert_eq!(heart.style.color, ColorStyle::Red);
        assert_eq!(heart.style.font, ShapeStyle::text().font);
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let result = HeartUtil::new().get_shape(&ShapePartial {
            kind: Some(ShapeKind::Rectangle),
            ..ShapePartial::default()
        });
        assert!(matches!(result, Err(ShapeError::KindMismatch { .. })));
    }

    #[test]
    fn test_transform_wider_box_anchors_left() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::new(10.0, 10.0));
        let info = TransformInfo::new(&heart, 1.0, 1.0, Vec2::ZERO);
        let patch = util.transform(&heart, Rect::new(0.0, 0.0, 140.0, 70.0), &info);
        assert_eq!(patch.point, Some(Point::new(0.0, 0.0)));
        assert!(patch.size.is_none());
    }

    #[test]
    fn test_transform_negative_scale_mirrors_origin() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::ZERO);
        let bounds = Rect::new(3.0, 7.0, 143.0, 107.0);
        for origin in [0.0, 0.25, 0.5, 1.0] {
            let flipped = TransformInfo::new(&heart, -1.0, 1.0, Vec2::new(origin, 0.3));
            let mirrored = TransformInfo::new(&heart, 1.0, 1.0, Vec2::new(1.0 - origin, 0.3));
            assert_eq!(
                util.transform(&heart, bounds, &flipped).point,
                util.transform(&heart, bounds, &mirrored).point
            );
        }
    }

    #[test]
    fn test_transform_right_origin() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::ZERO);
        let info = TransformInfo::new(&heart, 1.0, 1.0, Vec2::new(1.0, 1.0));
        let patch = util.transform(&heart, Rect::new(0.0, 0.0, 140.0, 100.0), &info);
        assert_eq!(patch.point, Some(Point::new(70.0, 30.0)));
    }

    #[test]
    fn test_transform_single_is_identity() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::new(1.0, 2.0));
        let info = TransformInfo::new(&heart, 2.0, 2.0, Vec2::ZERO);
        assert!(util.transform_single(&heart, Rect::new(0.0, 0.0, 10.0, 10.0), &info).is_empty());
    }

    #[test]
    fn test_skip_rerender_only_looks_at_size_and_style() {
        let util = HeartUtil::new();
        let a = heart_at(Point::ZERO);
        let mut b = a.clone();
        b.point = Point::new(100.0, 100.0);
        b.rotation = 1.0;
        b.name = "Moved".to_string();
        assert!(util.should_skip_rerender(&a, &b));

        let mut c = a.clone();
        c.size = Size::new(71.0, 70.0);
        assert!(!util.should_skip_rerender(&a, &c));

        let mut d = a.clone();
        d.style.color = ColorStyle::Blue;
        assert!(!util.should_skip_rerender(&a, &d));
    }

    #[test]
    fn test_bounds_follow_point_and_size() {
        let util = HeartUtil::new();
        let mut heart = heart_at(Point::new(5.0, 5.0));
        assert_eq!(util.bounds(&heart), Rect::new(5.0, 5.0, 75.0, 75.0));
        heart.size = Size::new(10.0, 20.0);
        assert_eq!(util.bounds(&heart), Rect::new(5.0, 5.0, 15.0, 25.0));
        util.forget(heart.id());
        assert!(util.bounds_cache.is_empty());
    }

    #[test]
    fn test_binding_indicator_only_when_binding() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::ZERO);
        let idle = util.render(&heart, &RenderProps::default());
        assert!(!idle.has_binding_indicator());

        let binding = util.render(
            &heart,
            &RenderProps {
                is_binding: true,
                ..RenderProps::default()
            },
        );
        assert!(binding.has_binding_indicator());
        let indicator = binding
            .walk()
            .into_iter()
            .find_map(|v| match v {
                Visual::BindingIndicator { rect } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!(indicator, Rect::new(-16.0, -16.0, 86.0, 86.0));
    }

    #[test]
    fn test_ghost_opacity_and_dark_shadow() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::ZERO);
        let visual = util.render(
            &heart,
            &RenderProps {
                is_ghost: true,
                meta: RenderMeta { is_dark_mode: true },
                ..RenderProps::default()
            },
        );
        match &visual {
            Visual::Group { opacity, .. } => assert!((opacity - GHOSTED_OPACITY).abs() < f64::EPSILON),
            other => panic!("expected group, got {:?}", other),
        }
        let shadow_alpha = visual.walk().into_iter().find_map(|v| match v {
            Visual::Shadow { color, .. } => Some(color.components[3]),
            _ => None,
        });
        assert!((shadow_alpha.unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_glyph_parses() {
        assert!(!heart_glyph().elements().is_empty());
        let bbox = heart_glyph().bounding_box();
        assert!(bbox.x0 > 0.0 && bbox.x1 < GLYPH_GRID);
    }

    #[test]
    fn test_indicator_has_minimum_size() {
        let util = HeartUtil::new();
        let mut heart = heart_at(Point::ZERO);
        heart.size = Size::new(0.2, 0.5);
        match util.indicator(&heart) {
            Visual::Stroke { path, .. } => {
                let bbox = path.bounding_box();
                assert!((bbox.width() - 1.0).abs() < 1e-6);
                assert!((bbox.height() - 1.0).abs() < 1e-6);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn test_svg_export_is_rounded_rect_group() {
        let util = HeartUtil::new();
        let heart = heart_at(Point::new(20.0, 30.0));
        let g = util.to_svg(&heart, false).unwrap();
        assert_eq!(g.tag, "g");
        assert_eq!(g.children.len(), 1);
        let rect = &g.children[0];
        assert_eq!(rect.tag, "rect");
        assert_eq!(rect.get_attr("width"), Some("70"));
        assert_eq!(rect.get_attr("height"), Some("70"));
        assert_eq!(rect.get_attr("fill"), Some("#fddf8e"));
        assert_eq!(rect.get_attr("rx"), Some("3"));
        assert_eq!(rect.get_attr("ry"), Some("3"));
    }
}
