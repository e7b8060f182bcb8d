//! Note record.
//!
//! # Responsibility
//! - Hold title/content text and the unsaved-edits (dirty) marker.
//! - Provide the display label rendered by list rows.
//!
//! # Invariants
//! - `id` is generated once and never reused for another note.
//! - `dirty` is set by edits and cleared only by a successful save.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one note.
pub type NoteId = Uuid;

/// Title given to notes created from the add control.
pub const NEW_NOTE_TITLE: &str = "New note";

/// Suffix appended to the display label of a note with unsaved edits.
pub const DIRTY_MARKER: char = '*';

/// One note in the editor collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable ID used by the persistence sink.
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Unsaved edits since the last successful save.
    pub dirty: bool,
}

impl Note {
    /// Creates an empty note with the default title.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4(), NEW_NOTE_TITLE, "")
    }

    /// Creates a clean note with a caller-provided ID.
    ///
    /// Used when restoring notes that already exist in storage.
    pub fn with_id(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            dirty: false,
        }
    }

    /// Marks the note as having unsaved edits.
    ///
    /// Returns `true` when the flag flipped.
    pub fn mark_dirty(&mut self) -> bool {
        let changed = !self.dirty;
        self.dirty = true;
        changed
    }

    /// Clears the unsaved-edits flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Label shown in list rows: the title, suffixed while dirty.
    pub fn display_label(&self) -> String {
        if self.dirty {
            format!("{}{}", self.title, DIRTY_MARKER)
        } else {
            self.title.clone()
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NEW_NOTE_TITLE};

    #[test]
    fn new_note_is_clean_and_titled() {
        let note = Note::new();
        assert_eq!(note.title, NEW_NOTE_TITLE);
        assert!(note.content.is_empty());
        assert!(!note.dirty);
    }

    #[test]
    fn new_notes_get_distinct_ids() {
        assert_ne!(Note::new().id, Note::new().id);
    }

    #[test]
    fn mark_dirty_reports_flip_only_once() {
        let mut note = Note::new();
        assert!(note.mark_dirty());
        assert!(!note.mark_dirty());
        note.mark_saved();
        assert!(!note.dirty);
    }

    #[test]
    fn display_label_carries_dirty_marker() {
        let mut note = Note::new();
        assert_eq!(note.display_label(), "New note");
        note.mark_dirty();
        assert_eq!(note.display_label(), "New note*");
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let mut note = Note::new();
        note.mark_dirty();
        let value = serde_json::to_value(&note).expect("note should serialize");
        assert_eq!(value["title"], "New note");
        assert_eq!(value["dirty"], true);
        assert_eq!(value["id"], note.id.to_string());
    }
}
