//! Object store: the ordered shape sequence and the current selection.
//!
//! Every transition takes `&self` and returns a new state. Shapes are held
//! behind [`Arc`] and never mutated in place, so a state and any copy of it
//! share untouched shapes while staying observably independent.

use crate::error::{CanvasError, CanvasResult};
use crate::shapes::{Shape, ShapeId, ShapePatch};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Shapes in paint order (index 0 is at the back) plus the selected ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreRepr")]
pub struct ObjectStoreState {
    objects: Vec<Arc<Shape>>,
    selection: Vec<ShapeId>,
}

/// Unvalidated wire form; converted through [`ObjectStoreState::from_parts`].
#[derive(Deserialize)]
struct StoreRepr {
    objects: Vec<Shape>,
    #[serde(default)]
    selection: Vec<ShapeId>,
}

impl TryFrom<StoreRepr> for ObjectStoreState {
    type Error = CanvasError;

    fn try_from(repr: StoreRepr) -> CanvasResult<Self> {
        Self::from_parts(repr.objects, repr.selection)
    }
}

impl ObjectStoreState {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from shapes and a selection, normalizing every shape.
    ///
    /// Fails with [`CanvasError::DuplicateIdentifier`] if two shapes share an id.
    pub fn from_parts(shapes: Vec<Shape>, selection: Vec<ShapeId>) -> CanvasResult<Self> {
        let mut seen = HashSet::with_capacity(shapes.len());
        let mut objects = Vec::with_capacity(shapes.len());
        for shape in shapes {
            if !seen.insert(shape.id()) {
                return Err(CanvasError::DuplicateIdentifier(shape.id()));
            }
            objects.push(Arc::new(shape.normalized()));
        }
        Ok(Self {
            objects,
            selection: dedup_ids(&selection),
        })
    }

    /// Shapes in paint order.
    pub fn objects(&self) -> &[Arc<Shape>] {
        &self.objects
    }

    /// Iterate shapes back to front.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.objects.iter().map(|s| s.as_ref())
    }

    /// Selected ids in selection order.
    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.index_of(id).map(|i| self.objects[i].as_ref())
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Z-order position of a shape.
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.objects.iter().position(|s| s.id() == id)
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected shapes that are present, in paint order.
    pub fn selected_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.iter().filter(|s| self.is_selected(s.id()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.iter().map(Shape::bounds).reduce(|acc, b| acc.union(b))
    }

    /// Append a shape at the front of the paint order.
    pub fn add_object(&self, shape: Shape) -> CanvasResult<Self> {
        let id = shape.id();
        if self.contains(id) {
            return Err(CanvasError::DuplicateIdentifier(id));
        }
        let mut next = self.clone();
        next.objects.push(Arc::new(shape.normalized()));
        Ok(next)
    }

    /// Replace the shape `id` with `patch` merged over it.
    ///
    /// An unknown `id` is a deliberate no-op: the returned state equals `self`.
    pub fn update_object(&self, id: ShapeId, patch: &ShapePatch) -> Self {
        let Some(index) = self.index_of(id) else {
            log::debug!("update_object: no shape {id}, state unchanged");
            return self.clone();
        };
        let mut next = self.clone();
        next.objects[index] = Arc::new(patch.apply(&self.objects[index]));
        next
    }

    /// Remove every shape whose id is in `ids` and drop those ids from the
    /// selection. Unknown ids are ignored.
    pub fn delete_objects(&self, ids: &[ShapeId]) -> Self {
        let doomed: HashSet<ShapeId> = ids.iter().copied().collect();
        Self {
            objects: self
                .objects
                .iter()
                .filter(|s| !doomed.contains(&s.id()))
                .cloned()
                .collect(),
            selection: self
                .selection
                .iter()
                .copied()
                .filter(|id| !doomed.contains(id))
                .collect(),
        }
    }

    /// Replace the selection. Ids are deduplicated but not checked against
    /// the shapes; stale ids are pruned when those shapes are deleted.
    pub fn set_selection(&self, ids: &[ShapeId]) -> Self {
        Self {
            objects: self.objects.clone(),
            selection: dedup_ids(ids),
        }
    }

    /// Select every shape, in paint order.
    pub fn select_all(&self) -> Self {
        Self {
            objects: self.objects.clone(),
            selection: self.objects.iter().map(|s| s.id()).collect(),
        }
    }

    /// Replace the whole shape sequence, keeping the selection as is.
    ///
    /// Used by history restore. Shapes after the first with a given id are
    /// dropped so the result never holds duplicate identifiers. Shapes that
    /// are already normalized keep their allocation.
    pub fn replace_objects(&self, objects: Vec<Arc<Shape>>) -> Self {
        let mut seen = HashSet::with_capacity(objects.len());
        let before = objects.len();
        let objects: Vec<Arc<Shape>> = objects
            .into_iter()
            .filter(|s| seen.insert(s.id()))
            .map(normalized_arc)
            .collect();
        if objects.len() != before {
            log::warn!(
                "replace_objects: dropped {} shapes with duplicate ids",
                before - objects.len()
            );
        }
        Self {
            objects,
            selection: self.selection.clone(),
        }
    }

    /// Remove all shapes and clear the selection.
    pub fn clear(&self) -> Self {
        Self::default()
    }

    /// Bring a shape to the front (topmost).
    pub fn bring_to_front(&self, id: ShapeId) -> Self {
        self.reorder(id, |objects, index| {
            let shape = objects.remove(index);
            objects.push(shape);
        })
    }

    /// Send a shape to the back (bottommost).
    pub fn send_to_back(&self, id: ShapeId) -> Self {
        self.reorder(id, |objects, index| {
            let shape = objects.remove(index);
            objects.insert(0, shape);
        })
    }

    /// Move a shape one layer forward (towards front).
    pub fn bring_forward(&self, id: ShapeId) -> Self {
        self.reorder(id, |objects, index| {
            if index + 1 < objects.len() {
                objects.swap(index, index + 1);
            }
        })
    }

    /// Move a shape one layer backward (towards back).
    pub fn send_backward(&self, id: ShapeId) -> Self {
        self.reorder(id, |objects, index| {
            if index > 0 {
                objects.swap(index, index - 1);
            }
        })
    }

    fn reorder(&self, id: ShapeId, f: impl FnOnce(&mut Vec<Arc<Shape>>, usize)) -> Self {
        let mut next = self.clone();
        if let Some(index) = self.index_of(id) {
            f(&mut next.objects, index);
        }
        next
    }

    /// Serialize the store to JSON.
    pub fn to_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a store from JSON, normalizing shapes and rejecting
    /// duplicate identifiers.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let repr: StoreRepr = serde_json::from_str(json)?;
        Self::try_from(repr)
    }
}

fn normalized_arc(shape: Arc<Shape>) -> Arc<Shape> {
    let normalized = shape.as_ref().clone().normalized();
    if normalized == *shape {
        shape
    } else {
        Arc::new(normalized)
    }
}

fn dedup_ids(ids: &[ShapeId]) -> Vec<ShapeId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
