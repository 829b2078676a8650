//! Partial shape records used for defaults overlays and patches.

use super::style::StylePartial;
use super::{ShapeError, ShapeId, ShapeKind};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// A shape record where every field is optional.
///
/// Used both as the overlay for [`ShapeUtil::get_shape`](super::ShapeUtil::get_shape)
/// and as the patch returned by transforms. Style is merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ShapePartial {
    pub id: Option<ShapeId>,
    #[serde(rename = "type")]
    pub kind: Option<ShapeKind>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
    pub child_index: Option<f64>,
    pub point: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub style: Option<StylePartial>,
}

impl ShapePartial {
    /// Parse and validate a partial from JSON.
    pub fn from_json(json: &str) -> Result<Self, ShapeError> {
        let partial: Self =
            serde_json::from_str(json).map_err(|e| ShapeError::Malformed(e.to_string()))?;
        partial.validate()?;
        Ok(partial)
    }

    /// A patch that only moves the shape.
    pub fn point(point: Point) -> Self {
        Self {
            point: Some(point),
            ..Self::default()
        }
    }

    /// Check that every present number is finite and sizes are not degenerate.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if let Some(point) = self.point {
            finite("point", point.x)?;
            finite("point", point.y)?;
        }
        if let Some(size) = self.size {
            finite("size", size.width)?;
            finite("size", size.height)?;
            if size.width <= 0.0 || size.height <= 0.0 {
                return Err(ShapeError::DegenerateSize {
                    width: size.width,
                    height: size.height,
                });
            }
        }
        if let Some(rotation) = self.rotation {
            finite("rotation", rotation)?;
        }
        if let Some(child_index) = self.child_index {
            finite("childIndex", child_index)?;
        }
        if let Some(scale) = self.style.and_then(|s| s.scale) {
            finite("style.scale", scale)?;
            if scale <= 0.0 {
                return Err(ShapeError::NonPositiveScale(scale));
            }
        }
        Ok(())
    }

    /// Check that the partial does not name a different shape kind.
    pub(crate) fn expect_kind(&self, expected: ShapeKind) -> Result<(), ShapeError> {
        match self.kind {
            Some(found) if found != expected => Err(ShapeError::KindMismatch { expected, found }),
            _ => Ok(()),
        }
    }

    /// True when applying the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ShapeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ShapeError::NonFinite(field))
    }
}
