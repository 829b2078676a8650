//! Shape records and the shape util interface.
//!
//! Every shape kind is a variant of the closed [`Shape`] enum and has a
//! matching util implementing [`ShapeUtil`]. Hosts never inspect shapes at
//! runtime beyond the variant tag: [`ShapeUtils`] dispatches each operation
//! to the util for that tag.

mod bounds;
mod ellipse;
mod heart;
mod partial;
mod rectangle;
pub mod style;
mod transform;

pub use bounds::{BoundsCache, bounds_rectangle, rotated_bounds};
pub use ellipse::{Ellipse, EllipseUtil};
pub use heart::{HEART_PATH_DATA, Heart, HeartUtil};
pub use partial::ShapePartial;
pub use rectangle::{Rectangle, RectangleUtil};
pub use style::{
    AlignStyle, ColorStyle, DashStyle, FontStyle, ShapeStyle, SizeStyle, StylePartial,
};
pub use transform::{TransformInfo, anchored_point, to_fixed, transform_rectangle};

use crate::svg::SvgElement;
use crate::visual::{RenderProps, Visual};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Parent id used for shapes placed directly on a page.
pub const PAGE_PARENT: &str = "page";

/// Errors raised when building or patching shapes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("non-finite value for `{0}`")]
    NonFinite(&'static str),
    #[error("size must be positive, got {width}x{height}")]
    DegenerateSize { width: f64, height: f64 },
    #[error("style scale must be positive, got {0}")]
    NonPositiveScale(f64),
    #[error("partial describes a {found} shape, expected {expected}")]
    KindMismatch { expected: ShapeKind, found: ShapeKind },
    #[error("malformed shape partial: {0}")]
    Malformed(String),
    #[error("unknown shape type: {0}")]
    UnknownKind(String),
    #[error("a shape with id {0} already exists")]
    DuplicateId(ShapeId),
}

/// Type tag for every shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Heart,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Rectangle, ShapeKind::Ellipse, ShapeKind::Heart];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Heart => "heart",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ShapeError::UnknownKind(s.to_string()))
    }
}

/// Interactions a host may offer for a shape kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeCapabilities {
    /// Arrows may bind to this shape.
    pub can_bind: bool,
    /// Double click enters editing.
    pub can_edit: bool,
    /// Clone handles may duplicate the shape.
    pub can_clone: bool,
    pub hide_resize_handles: bool,
    pub show_clone_handles: bool,
    pub is_aspect_ratio_locked: bool,
}

/// The fixed set of operations every shape kind implements.
pub trait ShapeUtil {
    type Shape: Clone;

    const KIND: ShapeKind;
    const CAPABILITIES: ShapeCapabilities;

    /// Build a complete shape from the kind's template overlaid with `partial`.
    fn get_shape(&self, partial: &ShapePartial) -> Result<Self::Shape, ShapeError>;

    /// Full on-canvas visual in shape-local coordinates.
    fn render(&self, shape: &Self::Shape, props: &RenderProps) -> Visual;

    /// Lightweight selection / hover outline.
    fn indicator(&self, shape: &Self::Shape) -> Visual;

    /// Axis-aligned page bounds, ignoring rotation.
    fn bounds(&self, shape: &Self::Shape) -> Rect;

    /// True when `next` would render identically to `prev`.
    fn should_skip_rerender(&self, prev: &Self::Shape, next: &Self::Shape) -> bool;

    /// Patch produced by resizing the shape into `bounds`.
    fn transform(
        &self,
        shape: &Self::Shape,
        bounds: Rect,
        info: &TransformInfo<'_, Self::Shape>,
    ) -> ShapePartial;

    /// Patch produced when the shape is the only one being resized.
    fn transform_single(
        &self,
        shape: &Self::Shape,
        bounds: Rect,
        info: &TransformInfo<'_, Self::Shape>,
    ) -> ShapePartial {
        self.transform(shape, bounds, info)
    }

    /// Standalone vector fragment in shape-local coordinates.
    fn to_svg(&self, shape: &Self::Shape, is_dark_mode: bool) -> Option<SvgElement>;

    /// Forget cached data for a removed shape.
    fn forget(&self, _id: ShapeId) {}

    /// Number of shapes with cached bounds.
    fn cached_bounds(&self) -> usize {
        0
    }
}

/// A shape in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Heart(Heart),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id,
            Shape::Ellipse(s) => s.id,
            Shape::Heart(s) => s.id,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Heart(_) => ShapeKind::Heart,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Shape::Rectangle(s) => &s.name,
            Shape::Ellipse(s) => &s.name,
            Shape::Heart(s) => &s.name,
        }
    }

    pub fn point(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.point,
            Shape::Ellipse(s) => s.point,
            Shape::Heart(s) => s.point,
        }
    }

    /// Width and height of the shape's box.
    pub fn size(&self) -> Size {
        match self {
            Shape::Rectangle(s) => s.size,
            Shape::Ellipse(s) => s.size(),
            Shape::Heart(s) => s.size,
        }
    }

    pub fn rotation(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.rotation,
            Shape::Ellipse(s) => s.rotation,
            Shape::Heart(s) => s.rotation,
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => &s.style,
            Shape::Ellipse(s) => &s.style,
            Shape::Heart(s) => &s.style,
        }
    }

    pub fn child_index(&self) -> f64 {
        match self {
            Shape::Rectangle(s) => s.child_index,
            Shape::Ellipse(s) => s.child_index,
            Shape::Heart(s) => s.child_index,
        }
    }

    pub fn set_child_index(&mut self, index: f64) {
        match self {
            Shape::Rectangle(s) => s.child_index = index,
            Shape::Ellipse(s) => s.child_index = index,
            Shape::Heart(s) => s.child_index = index,
        }
    }

    /// Apply a validated patch. `id` and `type` in the patch are ignored.
    pub fn apply(&mut self, patch: &ShapePartial) -> Result<(), ShapeError> {
        patch.validate()?;
        match self {
            Shape::Rectangle(s) => s.apply(patch),
            Shape::Ellipse(s) => s.apply(patch),
            Shape::Heart(s) => s.apply(patch),
        }
        Ok(())
    }

    /// Check a complete shape against the same rules as patches, e.g. after
    /// loading it from storage.
    pub fn validate(&self) -> Result<(), ShapeError> {
        ShapePartial {
            point: Some(self.point()),
            size: Some(self.size()),
            rotation: Some(self.rotation()),
            child_index: Some(self.child_index()),
            style: Some(StylePartial {
                scale: Some(self.style().scale),
                ..StylePartial::default()
            }),
            ..ShapePartial::default()
        }
        .validate()
    }
}

/// Registry dispatching operations to the util for each shape kind.
#[derive(Debug, Default)]
pub struct ShapeUtils {
    pub rectangle: RectangleUtil,
    pub ellipse: EllipseUtil,
    pub heart: HeartUtil,
}

impl ShapeUtils {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capabilities(&self, kind: ShapeKind) -> ShapeCapabilities {
        match kind {
            ShapeKind::Rectangle => RectangleUtil::CAPABILITIES,
            ShapeKind::Ellipse => EllipseUtil::CAPABILITIES,
            ShapeKind::Heart => HeartUtil::CAPABILITIES,
        }
    }

    pub fn get_shape(&self, kind: ShapeKind, partial: &ShapePartial) -> Result<Shape, ShapeError> {
        Ok(match kind {
            ShapeKind::Rectangle => Shape::Rectangle(self.rectangle.get_shape(partial)?),
            ShapeKind::Ellipse => Shape::Ellipse(self.ellipse.get_shape(partial)?),
            ShapeKind::Heart => Shape::Heart(self.heart.get_shape(partial)?),
        })
    }

    pub fn render(&self, shape: &Shape, props: &RenderProps) -> Visual {
        match shape {
            Shape::Rectangle(s) => self.rectangle.render(s, props),
            Shape::Ellipse(s) => self.ellipse.render(s, props),
            Shape::Heart(s) => self.heart.render(s, props),
        }
    }

    pub fn indicator(&self, shape: &Shape) -> Visual {
        match shape {
            Shape::Rectangle(s) => self.rectangle.indicator(s),
            Shape::Ellipse(s) => self.ellipse.indicator(s),
            Shape::Heart(s) => self.heart.indicator(s),
        }
    }

    pub fn bounds(&self, shape: &Shape) -> Rect {
        match shape {
            Shape::Rectangle(s) => self.rectangle.bounds(s),
            Shape::Ellipse(s) => self.ellipse.bounds(s),
            Shape::Heart(s) => self.heart.bounds(s),
        }
    }

    /// Bounds of the shape after its rotation is applied.
    pub fn rotated_bounds(&self, shape: &Shape) -> Rect {
        rotated_bounds(self.bounds(shape), shape.rotation())
    }

    /// Shapes of different kinds never skip.
    pub fn should_skip_rerender(&self, prev: &Shape, next: &Shape) -> bool {
        match (prev, next) {
            (Shape::Rectangle(a), Shape::Rectangle(b)) => self.rectangle.should_skip_rerender(a, b),
            (Shape::Ellipse(a), Shape::Ellipse(b)) => self.ellipse.should_skip_rerender(a, b),
            (Shape::Heart(a), Shape::Heart(b)) => self.heart.should_skip_rerender(a, b),
            _ => false,
        }
    }

    /// Resize `shape` into `bounds`. When `initial` is of another kind the
    /// current shape stands in for it.
    pub fn transform(
        &self,
        shape: &Shape,
        initial: &Shape,
        bounds: Rect,
        scale: Vec2,
        origin: Vec2,
    ) -> ShapePartial {
        self.dispatch_transform(shape, initial, bounds, scale, origin, false)
    }

    pub fn transform_single(
        &self,
        shape: &Shape,
        initial: &Shape,
        bounds: Rect,
        scale: Vec2,
        origin: Vec2,
    ) -> ShapePartial {
        self.dispatch_transform(shape, initial, bounds, scale, origin, true)
    }

    fn dispatch_transform(
        &self,
        shape: &Shape,
        initial: &Shape,
        bounds: Rect,
        scale: Vec2,
        origin: Vec2,
        single: bool,
    ) -> ShapePartial {
        fn run<U: ShapeUtil>(
            util: &U,
            shape: &U::Shape,
            initial: &U::Shape,
            bounds: Rect,
            scale: Vec2,
            origin: Vec2,
            single: bool,
        ) -> ShapePartial {
            let info = TransformInfo::new(initial, scale.x, scale.y, origin);
            if single {
                util.transform_single(shape, bounds, &info)
            } else {
                util.transform(shape, bounds, &info)
            }
        }

        match (shape, initial) {
            (Shape::Rectangle(s), Shape::Rectangle(i)) => {
                run(&self.rectangle, s, i, bounds, scale, origin, single)
            }
            (Shape::Rectangle(s), _) => run(&self.rectangle, s, s, bounds, scale, origin, single),
            (Shape::Ellipse(s), Shape::Ellipse(i)) => {
                run(&self.ellipse, s, i, bounds, scale, origin, single)
            }
            (Shape::Ellipse(s), _) => run(&self.ellipse, s, s, bounds, scale, origin, single),
            (Shape::Heart(s), Shape::Heart(i)) => run(&self.heart, s, i, bounds, scale, origin, single),
            (Shape::Heart(s), _) => run(&self.heart, s, s, bounds, scale, origin, single),
        }
    }

    pub fn to_svg(&self, shape: &Shape, is_dark_mode: bool) -> Option<SvgElement> {
        match shape {
            Shape::Rectangle(s) => self.rectangle.to_svg(s, is_dark_mode),
            Shape::Ellipse(s) => self.ellipse.to_svg(s, is_dark_mode),
            Shape::Heart(s) => self.heart.to_svg(s, is_dark_mode),
        }
    }

    /// Forget cached data for a removed shape.
    pub fn forget(&self, shape: &Shape) {
        match shape {
            Shape::Rectangle(_) => self.rectangle.forget(shape.id()),
            Shape::Ellipse(_) => self.ellipse.forget(shape.id()),
            Shape::Heart(_) => self.heart.forget(shape.id()),
        }
    }

    /// Cached bounds entries across all utils.
    pub fn cached_bounds(&self) -> usize {
        self.rectangle.cached_bounds() + self.ellipse.cached_bounds() + self.heart.cached_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("heart".parse::<ShapeKind>(), Ok(ShapeKind::Heart));
        assert!(matches!(
            "hexagon".parse::<ShapeKind>(),
            Err(ShapeError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_serde_type_tag() {
        let utils = ShapeUtils::new();
        let shape = utils.get_shape(ShapeKind::Heart, &ShapePartial::default()).unwrap();
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "heart");
        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_capabilities_dispatch() {
        let utils = ShapeUtils::new();
        assert!(utils.capabilities(ShapeKind::Heart).can_bind);
        assert!(utils.capabilities(ShapeKind::Heart).hide_resize_handles);
        assert!(!utils.capabilities(ShapeKind::Rectangle).hide_resize_handles);
    }

    #[test]
    fn test_skip_rerender_across_kinds_is_false() {
        let utils = ShapeUtils::new();
        let heart = utils.get_shape(ShapeKind::Heart, &ShapePartial::default()).unwrap();
        let rect = utils.get_shape(ShapeKind::Rectangle, &ShapePartial::default()).unwrap();
        assert!(!utils.should_skip_rerender(&heart, &rect));
        assert!(utils.should_skip_rerender(&heart, &heart.clone()));
    }

    #[test]
    fn test_apply_rejects_invalid_patch() {
        let utils = ShapeUtils::new();
        let mut shape = utils.get_shape(ShapeKind::Rectangle, &ShapePartial::default()).unwrap();
        let before = shape.clone();
        let bad = ShapePartial {
            size: Some(Size::new(-1.0, 5.0)),
            ..ShapePartial::default()
        };
        assert!(shape.apply(&bad).is_err());
        assert_eq!(shape, before);
    }

    #[test]
    fn test_rotated_bounds_dispatch() {
        let utils = ShapeUtils::new();
        let shape = utils
            .get_shape(
                ShapeKind::Rectangle,
                &ShapePartial {
                    size: Some(Size::new(100.0, 20.0)),
                    rotation: Some(std::f64::consts::FRAC_PI_2),
                    ..ShapePartial::default()
                },
            )
            .unwrap();
        let rotated = utils.rotated_bounds(&shape);
        assert!((rotated.height() - 100.0).abs() < 1e-9);
    }
}
