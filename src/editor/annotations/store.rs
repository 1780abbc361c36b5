//! The ordered annotation collection with its selection and hover state.

use bevy::prelude::*;

use crate::constants::MAX_ANNOTATIONS;

/// A note pinned to the model surface
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub position: Vec3,
    pub title: String,
    pub info: String,
}

impl Annotation {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            title: String::new(),
            info: String::new(),
        }
    }
}

/// Result of [`AnnotationStore::place`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// Appended at this index, which is now selected
    Placed(usize),
    /// Collection is full, nothing changed
    AtCapacity,
}

/// Owner of all annotations.
///
/// Order is insertion order and is shown to the user (index + 1). Selection is
/// an explicit index that only changes through [`place`](Self::place),
/// [`select`](Self::select) and [`delete`](Self::delete). Out-of-range
/// indices are ignored everywhere.
#[derive(Resource, Debug)]
pub struct AnnotationStore {
    entries: Vec<Annotation>,
    capacity: usize,
    selected: Option<usize>,
    hovered: Option<usize>,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::with_capacity(MAX_ANNOTATIONS)
    }
}

impl AnnotationStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            selected: None,
            hovered: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the bound. Existing entries beyond a lowered bound are kept.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&Annotation> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter()
    }

    pub fn place(&mut self, position: Vec3) -> PlaceOutcome {
        if self.is_full() {
            return PlaceOutcome::AtCapacity;
        }
        self.entries.push(Annotation::new(position));
        let index = self.entries.len() - 1;
        self.selected = Some(index);
        PlaceOutcome::Placed(index)
    }

    /// Remove the annotation at `index`, keeping the relative order of the rest.
    ///
    /// Deleting the selected entry clears the selection; a selection after
    /// the removed entry follows its annotation down by one.
    pub fn delete(&mut self, index: usize) -> Option<Annotation> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        self.selected = shift_after_removal(self.selected, index);
        self.hovered = shift_after_removal(self.hovered, index);
        Some(removed)
    }

    /// Remove every annotation
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected = None;
        self.hovered = None;
    }

    pub fn set_title(&mut self, index: usize, title: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.title = title.into();
                true
            }
            None => false,
        }
    }

    pub fn set_info(&mut self, index: usize, info: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.info = info.into();
                true
            }
            None => false,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hover_enter(&mut self, index: usize) {
        if index < self.entries.len() {
            self.hovered = Some(index);
        }
    }

    /// Leaving an entry other than the hovered one changes nothing
    pub fn hover_leave(&mut self, index: usize) {
        if self.hovered == Some(index) {
            self.hovered = None;
        }
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Whether the text panel of entry `index` should be shown this frame
    pub fn is_panel_visible(&self, index: usize, drag_in_progress: bool, annotating: bool) -> bool {
        !drag_in_progress && annotating && self.selected == Some(index)
    }

    /// List highlight: hovered entries are highlighted unless already selected
    pub fn is_highlighted_in_list(&self, index: usize) -> bool {
        self.hovered == Some(index) && self.selected != Some(index)
    }
}

fn shift_after_removal(slot: Option<usize>, removed: usize) -> Option<usize> {
    match slot {
        Some(i) if i == removed => None,
        Some(i) if i > removed => Some(i - 1),
        other => other,
    }
}
