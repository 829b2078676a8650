//! Bounds helpers and the per-util bounds cache.

use super::ShapeId;
use kurbo::{Affine, Point, Rect, Size};
use std::cell::RefCell;
use std::collections::HashMap;

/// Memoizes shape-local bounds per shape id.
///
/// An entry is reused only while the shape's size is unchanged; any other
/// size is a miss and replaces the entry.
#[derive(Debug, Default)]
pub struct BoundsCache {
    entries: RefCell<HashMap<ShapeId, (Size, Rect)>>,
}

impl BoundsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local bounds (origin at the shape's point) for `id` at `size`.
    pub fn local(&self, id: ShapeId, size: Size, compute: impl FnOnce() -> Rect) -> Rect {
        let mut entries = self.entries.borrow_mut();
        match entries.get(&id) {
            Some((cached_size, rect)) if *cached_size == size => *rect,
            _ => {
                let rect = compute();
                entries.insert(id, (size, rect));
                rect
            }
        }
    }

    /// Drop the entry for a removed shape.
    pub fn remove(&self, id: ShapeId) {
        self.entries.borrow_mut().remove(&id);
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Axis-aligned bounds of a `size` box placed at `point`, cached by id.
pub fn bounds_rectangle(cache: &BoundsCache, id: ShapeId, point: Point, size: Size) -> Rect {
    let local = cache.local(id, size, || Rect::from_origin_size(Point::ZERO, size));
    local + point.to_vec2()
}

/// Axis-aligned box around `bounds` rotated by `rotation` radians about its center.
pub fn rotated_bounds(bounds: Rect, rotation: f64) -> Rect {
    if rotation == 0.0 {
        return bounds;
    }
    let rotate = Affine::rotate_about(rotation, bounds.center());
    let corners = [
        Point::new(bounds.x0, bounds.y0),
        Point::new(bounds.x1, bounds.y0),
        Point::new(bounds.x1, bounds.y1),
        Point::new(bounds.x0, bounds.y1),
    ];
    corners
        .iter()
        .map(|&p| rotate * p)
        .fold(Rect::from_points(rotate * corners[0], rotate * corners[0]), |r, p| {
            r.union_pt(p)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_bounds_rectangle_translates() {
        let cache = BoundsCache::new();
        let bounds = bounds_rectangle(&cache, Uuid::new_v4(), Point::new(10.0, 20.0), Size::new(70.0, 30.0));
        assert_eq!(bounds, Rect::new(10.0, 20.0, 80.0, 50.0));
    }

    #[test]
    fn test_cache_reused_for_same_size() {
        let cache = BoundsCache::new();
        let id = Uuid::new_v4();
        let size = Size::new(10.0, 10.0);
        cache.local(id, size, || Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut recomputed = false;
        cache.local(id, size, || {
            recomputed = true;
            Rect::ZERO
        });
        assert!(!recomputed);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_invalidated_on_resize() {
        let cache = BoundsCache::new();
        let id = Uuid::new_v4();
        bounds_rectangle(&cache, id, Point::ZERO, Size::new(10.0, 10.0));
        let bounds = bounds_rectangle(&cache, id, Point::ZERO, Size::new(20.0, 5.0));
        assert_eq!(bounds, Rect::new(0.0, 0.0, 20.0, 5.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rotated_bounds_quarter_turn() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        let rotated = rotated_bounds(rect, std::f64::consts::FRAC_PI_2);
        assert!((rotated.width() - 50.0).abs() < 1e-9);
        assert!((rotated.height() - 100.0).abs() < 1e-9);
        assert!((rotated.center().x - 50.0).abs() < 1e-9);
    }
}
