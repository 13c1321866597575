//! Element store - the ordered document and the current selection.
//!
//! Every operation is total: an unknown id is a silent no-op and the
//! return value tells the caller whether anything changed.

use serde::{Deserialize, Serialize};

use crate::{CanvasElement, ElementId, ElementPatch};

/// Direction for [`ElementStore::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the start of the sequence.
    Up,
    /// Towards the end of the sequence.
    Down,
}

/// One row of the layers panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    /// Position in render order.
    pub index: usize,
    /// Element identifier.
    pub id: ElementId,
    /// Display name, e.g. `Heading 1`.
    pub label: String,
    /// Single-glyph icon.
    pub icon: String,
    /// Whether this is the selected element.
    pub selected: bool,
}

/// Ordered canvas elements plus the selected element id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementStore {
    /// Elements in render order.
    elements: Vec<CanvasElement>,
    /// Selected element; a lookup key only, may be stale.
    #[serde(skip)]
    selected: Option<ElementId>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole document and clear the selection.
    ///
    /// Ids are not validated; callers must guarantee uniqueness.
    pub fn set_elements(&mut self, elements: Vec<CanvasElement>) {
        self.elements = elements;
        self.selected = None;
    }

    /// Append an element. Returns `false` if its id is already present.
    pub fn add_element(&mut self, element: CanvasElement) -> bool {
        if self.contains(element.id) {
            tracing::debug!("Ignoring add of duplicate element id {}", element.id);
            return false;
        }
        self.elements.push(element);
        true
    }

    /// Insert an element right after `anchor`, or at the end if the anchor
    /// is missing. Returns `false` if the element's id is already present.
    pub fn insert_after(&mut self, anchor: ElementId, element: CanvasElement) -> bool {
        if self.contains(element.id) {
            return false;
        }
        let index = self
            .position(anchor)
            .map_or(self.elements.len(), |i| i + 1);
        self.elements.insert(index, element);
        true
    }

    /// Apply a patch to the matching element. Returns `false` if not found.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the matching element, clearing the selection if it pointed
    /// at it.
    pub fn delete_element(&mut self, id: ElementId) -> Option<CanvasElement> {
        let index = self.position(id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.elements.remove(index))
    }

    /// Set the selection without validating that the id exists.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    /// Swap the element with its neighbour. No-op at the boundaries.
    pub fn reorder(&mut self, id: ElementId, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let neighbour = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.elements.len() => index + 1,
            _ => return false,
        };
        self.elements.swap(index, neighbour);
        true
    }

    /// All elements in render order.
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Index of an element in render order.
    #[must_use]
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Whether an element with this id exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    /// The raw selection key, possibly stale.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    /// The selected element, or `None` if nothing (or a stale id) is
    /// selected.
    #[must_use]
    pub fn selected(&self) -> Option<&CanvasElement> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Layers panel rows in render order.
    #[must_use]
    pub fn layers(&self) -> Vec<LayerSummary> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| LayerSummary {
                index,
                id: element.id,
                label: format!("{} {}", element.tag.label(), index + 1),
                icon: element.tag.icon().to_string(),
                selected: self.selected == Some(element.id),
            })
            .collect()
    }
}
