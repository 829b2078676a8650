//! The page document: shapes, stacking order and undo history.

use crate::shapes::{Shape, ShapeError, ShapeId, ShapePartial, ShapeUtils};
use crate::visual::placement;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DocumentSnapshot {
    shapes: HashMap<ShapeId, Shape>,
    z_order: Vec<ShapeId>,
}

/// A page of shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    /// All shapes in the document, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
    #[serde(skip)]
    redo_stack: Vec<DocumentSnapshot>,
}

impl PartialEq for Document {
    /// History is not part of a document's identity.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.shapes == other.shapes
            && self.z_order == other.z_order
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            shapes: HashMap::new(),
            z_order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            shapes: self.shapes.clone(),
            z_order: self.z_order.clone(),
        }
    }

    fn restore(&mut self, snapshot: DocumentSnapshot) {
        self.shapes = snapshot.shapes;
        self.z_order = snapshot.z_order;
    }

    /// Record the current state for undo (call before making changes).
    pub fn push_undo(&mut self) {
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.redo_stack.push(self.snapshot());
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                self.undo_stack.push(self.snapshot());
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Add a shape on top of the stack. Its child index is moved above every
    /// existing shape so that sorting by child index matches the z-order.
    ///
    /// A shape with the same id is replaced; use [`Document::contains`] to
    /// refuse duplicates.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        if let Some(top) = self
            .shapes_ordered()
            .map(Shape::child_index)
            .reduce(f64::max)
        {
            if shape.child_index() <= top {
                shape.set_child_index(top + 1.0);
            }
        }
        let id = shape.id();
        self.z_order.retain(|&existing| existing != id);
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Apply a patch to a shape. Returns `Ok(false)` when the shape does not exist.
    pub fn update_shape(&mut self, id: ShapeId, patch: &ShapePartial) -> Result<bool, ShapeError> {
        match self.shapes.get_mut(&id) {
            Some(shape) => {
                shape.apply(patch)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Shapes back to front.
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn z_order(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Union of the rotated bounds of all shapes.
    pub fn bounds(&self, utils: &ShapeUtils) -> Option<Rect> {
        self.shapes_ordered()
            .map(|shape| utils.rotated_bounds(shape))
            .reduce(|a, b| a.union(b))
    }

    /// Shapes whose (rotated) box contains `point`, front to back.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.shapes.get(id))
            .filter(|shape| {
                let size = shape.size();
                let local = placement(shape.point(), size, shape.rotation()).inverse() * point;
                Rect::from_origin_size(Point::ZERO, size)
                    .inflate(tolerance, tolerance)
                    .contains(local)
            })
            .map(Shape::id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document; z-order entries without a shape are dropped.
    ///
    /// Every shape must pass [`Shape::validate`], so a stored shape with a
    /// negative size or non-finite geometry fails the whole load.
    pub fn from_json(json: &str) -> Result<Self, ShapeError> {
        let mut doc: Self =
            serde_json::from_str(json).map_err(|e| ShapeError::Malformed(e.to_string()))?;
        for shape in doc.shapes.values() {
            shape.validate()?;
        }
        let Document { shapes, z_order, .. } = &mut doc;
        z_order.retain(|id| shapes.contains_key(id));
        for id in shapes.keys() {
            if !z_order.contains(id) {
                z_order.push(*id);
            }
        }
        Ok(doc)
    }
}
