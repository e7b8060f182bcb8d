//! Mediator contract and the note editor implementation.
//!
//! # Responsibility
//! - Define the single interface widgets use to request cross-widget effects.
//! - Host the editor mediator and its selection-driven visibility machine.
//!
//! # Invariants
//! - Widgets only ever call into `Mediator`; they never reach each other.
//! - Only `save_changes` reports an error outward; every other operation
//!   degrades to a logged no-op.

use crate::model::collection::ListSnapshot;
use crate::model::note::NoteId;
use crate::repo::SinkError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod editor;
mod visibility;

pub use editor::{ComposeError, Editor};
pub use visibility::{Visibility, SELECTION_DEPENDENT_WIDGETS};

/// Coordination interface shared by every widget.
///
/// Implementations are invoked from the caller thread and from the
/// selection watcher, so every method must tolerate concurrent calls.
pub trait Mediator: Send + Sync {
    /// Creates an empty note, appends it and selects it.
    fn add_new_note(&self);
    /// Removes the selected note. No-op without a selection.
    fn delete_current_note(&self);
    /// Persists the selected note when it has unsaved edits.
    fn save_changes(&self) -> Result<SaveOutcome, MediatorError>;
    /// Flags the selected note as edited. No-op without a selection.
    fn mark_note_dirty(&self);
    /// Refreshes visible list rows from `snapshot` through the active filter.
    fn send_to_filter(&self, snapshot: ListSnapshot);
    /// Shows or hides selection-dependent widgets. Idempotent.
    fn hide_elements(&self, should_hide: bool);
    /// Loads the selected note into the title/content editors.
    fn load_selected_note(&self);
    /// Narrows visible rows to titles containing `query`.
    fn apply_filter(&self, query: &str);
}

/// Result of a save request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The note was persisted and is clean again.
    Saved(NoteId),
    /// The selected note has no unsaved edits; nothing was persisted.
    Clean,
    /// Nothing is selected; nothing was persisted.
    NoSelection,
}

/// Errors surfaced by mediator operations.
#[derive(Debug)]
pub enum MediatorError {
    /// The persistence sink rejected the note. Its dirty flag is unchanged.
    Persistence(SinkError),
    /// The note collection lock was poisoned by a panicking writer.
    StatePoisoned,
    /// The widget has no live mediator to forward to.
    Detached,
}

impl Display for MediatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "failed to persist note: {err}"),
            Self::StatePoisoned => write!(f, "note collection is unavailable after a panic"),
            Self::Detached => write!(f, "widget is not bound to a mediator"),
        }
    }
}

impl Error for MediatorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::StatePoisoned | Self::Detached => None,
        }
    }
}

impl From<SinkError> for MediatorError {
    fn from(value: SinkError) -> Self {
        Self::Persistence(value)
    }
}
