//! Ordered note collection with single selection.
//!
//! # Responsibility
//! - Own every note of the session in display (insertion) order.
//! - Track the selected index and keep it valid across deletions.
//! - Produce label-only list snapshots for rendering and filtering.
//!
//! # Invariants
//! - `selected` is `None` or `< notes.len()`.
//! - Removing the selected note clears selection instead of shifting it.

use super::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

/// One rendered list row. Carries a label, never a note copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// Position of the note in the collection.
    pub index: usize,
    pub note_id: NoteId,
    /// Title plus dirty marker.
    pub label: String,
}

/// Label-only view of the collection handed to the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
    pub rows: Vec<ListRow>,
    pub selected: Option<usize>,
}

impl ListSnapshot {
    /// Rows whose label contains `query`, compared case-insensitively.
    ///
    /// A blank query keeps every row.
    pub fn filtered(&self, query: &str) -> Vec<ListRow> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.rows.clone();
        }
        self.rows
            .iter()
            .filter(|row| row.label.to_lowercase().contains(needle.as_str()))
            .cloned()
            .collect()
    }
}

/// Backing model of the list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Vec<Note>,
    selected: Option<usize>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from restored notes with nothing selected.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self {
            notes,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_selection_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected.and_then(|index| self.notes.get(index))
    }

    pub fn selected_mut(&mut self) -> Option<&mut Note> {
        self.selected.and_then(|index| self.notes.get_mut(index))
    }

    /// Appends a note and selects it. Returns its index.
    pub fn push_and_select(&mut self, note: Note) -> usize {
        self.notes.push(note);
        let index = self.notes.len() - 1;
        self.selected = Some(index);
        index
    }

    /// Selects `index` when it is in range.
    ///
    /// Out-of-range requests leave the current selection untouched and
    /// return `false`.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.notes.len() {
            return false;
        }
        self.selected = Some(index);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Removes the selected note and clears selection.
    ///
    /// Returns `None` when nothing is selected.
    pub fn remove_selected(&mut self) -> Option<Note> {
        let index = self.selected.take()?;
        if index < self.notes.len() {
            Some(self.notes.remove(index))
        } else {
            None
        }
    }

    /// Overwrites the stored note with the same ID.
    ///
    /// Returns `false` when no note with that ID exists anymore.
    pub fn replace(&mut self, note: Note) -> bool {
        match self.notes.iter_mut().find(|current| current.id == note.id) {
            Some(current) => {
                *current = note;
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            rows: self
                .notes
                .iter()
                .enumerate()
                .map(|(index, note)| ListRow {
                    index,
                    note_id: note.id,
                    label: note.display_label(),
                })
                .collect(),
            selected: self.selected,
        }
    }
}

/// The collection lock was poisoned by a panicking writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelPoisoned;

impl Display for ModelPoisoned {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "note collection lock poisoned")
    }
}

impl Error for ModelPoisoned {}

/// Collection handle shared by the list view, its watcher and the mediator.
#[derive(Debug, Clone, Default)]
pub struct SharedCollection {
    inner: Arc<Mutex<NoteCollection>>,
}

impl SharedCollection {
    pub fn new(collection: NoteCollection) -> Self {
        Self {
            inner: Arc::new(Mutex::new(collection)),
        }
    }

    /// Locks the collection.
    ///
    /// A poisoned lock is reported instead of recovered: a writer panicked
    /// mid-update and the selection invariant may no longer hold.
    pub fn lock(&self) -> Result<MutexGuard<'_, NoteCollection>, ModelPoisoned> {
        self.inner.lock().map_err(|_| ModelPoisoned)
    }

    /// Runs `f` with exclusive access to the collection.
    pub fn with<R>(&self, f: impl FnOnce(&mut NoteCollection) -> R) -> Result<R, ModelPoisoned> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }
}
