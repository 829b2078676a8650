//! Resize / scale math shared by shape utils.

use super::ShapePartial;
use kurbo::{Point, Rect, Size, Vec2};

/// Information about an in-progress resize.
#[derive(Debug, Clone, Copy)]
pub struct TransformInfo<'a, S> {
    /// The shape as it was when the resize began.
    pub initial_shape: &'a S,
    /// Horizontal scale factor; negative when flipped.
    pub scale_x: f64,
    /// Vertical scale factor; negative when flipped.
    pub scale_y: f64,
    /// Anchor of the resize as a fraction (0..1) of the shape per axis.
    pub transform_origin: Vec2,
}

impl<'a, S> TransformInfo<'a, S> {
    pub fn new(initial_shape: &'a S, scale_x: f64, scale_y: f64, transform_origin: Vec2) -> Self {
        Self {
            initial_shape,
            scale_x,
            scale_y,
            transform_origin,
        }
    }

    /// Origin fraction per axis, mirrored on axes with a negative scale.
    pub fn effective_origin(&self) -> Vec2 {
        Vec2::new(
            if self.scale_x < 0.0 {
                1.0 - self.transform_origin.x
            } else {
                self.transform_origin.x
            },
            if self.scale_y < 0.0 {
                1.0 - self.transform_origin.y
            } else {
                self.transform_origin.y
            },
        )
    }
}

/// Round to two decimals.
pub fn to_fixed(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn point_to_fixed(p: Point) -> Point {
    Point::new(to_fixed(p.x), to_fixed(p.y))
}

pub fn size_to_fixed(s: Size) -> Size {
    Size::new(to_fixed(s.width), to_fixed(s.height))
}

/// Anchor a fixed-size box of `size` inside `bounds` at the (flip-aware) origin.
pub fn anchored_point<S>(size: Size, bounds: Rect, info: &TransformInfo<'_, S>) -> Point {
    let origin = info.effective_origin();
    point_to_fixed(Point::new(
        bounds.x0 + (bounds.width() - size.width) * origin.x,
        bounds.y0 + (bounds.height() - size.height) * origin.y,
    ))
}

/// Resize a box-like shape into `bounds`.
///
/// Unrotated, unlocked shapes take the target box verbatim. Rotated or
/// aspect-locked shapes scale uniformly by the smaller factor, are anchored
/// like fixed-size shapes, and mirror their rotation on a single-axis flip.
pub fn transform_rectangle<S>(
    size: Size,
    rotation: f64,
    initial_size: Size,
    initial_rotation: f64,
    is_aspect_ratio_locked: bool,
    bounds: Rect,
    info: &TransformInfo<'_, S>,
) -> ShapePartial {
    if rotation != 0.0 || is_aspect_ratio_locked {
        let factor = info.scale_x.abs().min(info.scale_y.abs());
        let new_size = size_to_fixed(Size::new(
            initial_size.width * factor,
            initial_size.height * factor,
        ));
        let point = anchored_point(size, bounds, info);
        let single_flip = (info.scale_x < 0.0) != (info.scale_y < 0.0);
        let rotation = if single_flip {
            -initial_rotation
        } else {
            initial_rotation
        };
        ShapePartial {
            point: Some(point),
            size: Some(new_size),
            rotation: Some(rotation),
            ..ShapePartial::default()
        }
    } else {
        ShapePartial {
            point: Some(point_to_fixed(bounds.origin())),
            size: Some(size_to_fixed(bounds.size())),
            ..ShapePartial::default()
        }
    }
}
