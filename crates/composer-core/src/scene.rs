//! Ordered element store with selection and canvas metadata.

use crate::background::{Background, CanvasSize};
use crate::element::{Element, ElementId, ElementPatch, MIN_ELEMENT_SIZE};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable copy of the element sequence.
///
/// Snapshots share nothing with the live scene, so later edits never alter a
/// snapshot that was already handed to history.
#[derive(Debug, Clone)]
pub struct Snapshot(Arc<[Element]>);

impl Snapshot {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Element> {
        self.0.to_vec()
    }
}

impl From<Vec<Element>> for Snapshot {
    fn from(elements: Vec<Element>) -> Self {
        Self(Arc::from(elements))
    }
}

impl Deref for Snapshot {
    type Target = [Element];

    fn deref(&self) -> &[Element] {
        &self.0
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

/// Z-order moves for a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderAction {
    /// Move to the end of the order (drawn last).
    Top,
    /// Move to the start of the order (drawn first).
    Bottom,
    /// Swap with the next element up.
    Up,
    /// Swap with the next element down.
    Down,
}

/// The document being edited: elements in z-order (index 0 is bottom-most),
/// the selection, and page metadata.
#[derive(Debug, Clone)]
pub struct Scene {
    elements: Vec<Element>,
    /// Selected ids in selection order. Always a subset of `elements`.
    selection: Vec<ElementId>,
    canvas_size: CanvasSize,
    background: Background,
    min_element_size: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CanvasSize::default())
    }
}

impl Scene {
    pub fn new(canvas_size: CanvasSize) -> Self {
        Self {
            elements: Vec::new(),
            selection: Vec::new(),
            canvas_size,
            background: Background::default(),
            min_element_size: MIN_ELEMENT_SIZE,
        }
    }

    /// Use a different size floor for element geometry (never below the default floor).
    pub fn with_min_element_size(mut self, min: f64) -> Self {
        self.min_element_size = min.max(MIN_ELEMENT_SIZE);
        self
    }

    pub fn min_element_size(&self) -> f64 {
        self.min_element_size
    }

    // --- Queries ---

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| &e.id == id)
    }

    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Topmost visible element under `point` (canvas coordinates).
    pub fn element_at(&self, point: Point) -> Option<&Element> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.visible && e.contains(point))
    }

    /// Visible elements whose bounds lie entirely inside `rect`.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.visible)
            .filter(|e| {
                let b = e.rotated_bounds();
                b.x0 >= rect.x0 && b.y0 >= rect.y0 && b.x1 <= rect.x1 && b.y1 <= rect.y1
            })
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self.elements.clone())
    }

    // --- Selection (never committed to history) ---

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    /// Selected elements in z-order.
    pub fn selected_elements(&self) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .collect()
    }

    /// Replace the selection, keeping only ids present in the scene.
    pub fn set_selection<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        let mut seen = HashSet::new();
        self.selection = ids
            .into_iter()
            .filter(|id| self.contains(id) && seen.insert(id.clone()))
            .collect();
    }

    /// Add `id` to the selection, or remove it if already selected.
    pub fn toggle_selection(&mut self, id: &ElementId) {
        if let Some(pos) = self.selection.iter().position(|s| s == id) {
            self.selection.remove(pos);
        } else if self.contains(id) {
            self.selection.push(id.clone());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn prune_selection(&mut self) {
        let live: HashSet<&ElementId> = self.elements.iter().map(|e| &e.id).collect();
        self.selection.retain(|id| live.contains(id));
    }

    // --- Element mutations (each returns the new sequence for history) ---

    /// Append on top of the z-order. A colliding id is replaced by a fresh one.
    pub fn add_element(&mut self, mut element: Element) -> Snapshot {
        self.insert_normalized(&mut element);
        self.elements.push(element);
        self.snapshot()
    }

    /// Append several elements in order, as one mutation.
    pub fn add_elements(&mut self, elements: Vec<Element>) -> Snapshot {
        for mut element in elements {
            self.insert_normalized(&mut element);
            self.elements.push(element);
        }
        self.snapshot()
    }

    fn insert_normalized(&self, element: &mut Element) {
        if self.contains(&element.id) {
            let fresh = ElementId::new();
            log::warn!("Element id {} already in scene, reassigned to {}", element.id, fresh);
            element.id = fresh;
        }
        element.normalize_with(self.min_element_size);
    }

    /// Merge `patch` into the element with `id`. Unknown ids are ignored.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> Snapshot {
        let min = self.min_element_size;
        if let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) {
            patch.apply_to(element, min);
        }
        self.snapshot()
    }

    /// Apply several patches as one mutation.
    pub fn update_elements(&mut self, patches: &[(ElementId, ElementPatch)]) -> Snapshot {
        let min = self.min_element_size;
        for (id, patch) in patches {
            if let Some(element) = self.elements.iter_mut().find(|e| &e.id == id) {
                patch.apply_to(element, min);
            }
        }
        self.snapshot()
    }

    /// Remove the given ids and any selection entries pointing at them.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> Snapshot {
        self.elements.retain(|e| !ids.contains(&e.id));
        self.prune_selection();
        self.snapshot()
    }

    /// Move one element in the z-order. Moves past either end do nothing.
    pub fn reorder(&mut self, id: &ElementId, action: ReorderAction) -> Snapshot {
        if let Some(idx) = self.index_of(id) {
            let last = self.elements.len() - 1;
            match action {
                ReorderAction::Top => {
                    let element = self.elements.remove(idx);
                    self.elements.push(element);
                }
                ReorderAction::Bottom => {
                    let element = self.elements.remove(idx);
                    self.elements.insert(0, element);
                }
                ReorderAction::Up if idx < last => self.elements.swap(idx, idx + 1),
                ReorderAction::Down if idx > 0 => self.elements.swap(idx, idx - 1),
                ReorderAction::Up | ReorderAction::Down => {}
            }
        }
        self.snapshot()
    }

    /// Replace the element sequence with a stored snapshot.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.elements = snapshot.to_vec();
        self.prune_selection();
    }

    /// Drop every element and the selection. Returns how many elements were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.elements.len();
        self.elements.clear();
        self.selection.clear();
        discarded
    }

    /// Swap in a whole new document.
    pub fn replace_document(
        &mut self,
        elements: Vec<Element>,
        canvas_size: CanvasSize,
        background: Background,
    ) {
        self.elements = elements;
        self.selection.clear();
        self.canvas_size = canvas_size;
        self.background = background;
    }

    pub(crate) fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas_size = size;
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }
}
