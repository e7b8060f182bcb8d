//! Persistence sinks consumed by `save_changes`.
//!
//! # Responsibility
//! - Define the single persistence contract the mediator needs.
//! - Provide a SQLite-backed store and an in-memory recording sink.
//!
//! # Invariants
//! - `persist` either stores the whole note or reports an error; callers
//!   keep the note dirty on error.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod note_store;

pub type SinkResult<T> = Result<T, SinkError>;

/// Persistence failures.
#[derive(Debug)]
pub enum SinkError {
    Db(DbError),
    /// The store connection is unusable after a panic.
    Unavailable,
    /// Required schema object is missing from the connection.
    MissingRequiredTable(&'static str),
    /// Stored row cannot be mapped back to a note.
    InvalidData(String),
    /// The sink refused the note.
    Rejected(String),
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable => write!(f, "note store is unavailable"),
            Self::MissingRequiredTable(table) => write!(f, "required table missing: {table}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::Rejected(message) => write!(f, "note rejected: {message}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SinkError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SinkError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator for saved notes.
pub trait NoteSink: Send + Sync {
    fn persist(&self, note: &Note) -> SinkResult<()>;
}

/// Sink keeping persisted notes in memory, in call order.
///
/// Can be switched into a failing mode to exercise save-failure paths.
#[derive(Debug, Default)]
pub struct MemorySink {
    persisted: Mutex<Vec<Note>>,
    failing: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `persist` calls fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every successfully persisted note, oldest first.
    pub fn persisted(&self) -> Vec<Note> {
        self.lock().clone()
    }

    pub fn persist_count(&self) -> usize {
        self.lock().len()
    }

    pub fn last_persisted(&self, id: NoteId) -> Option<Note> {
        self.lock().iter().rev().find(|note| note.id == id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Note>> {
        self.persisted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl NoteSink for MemorySink {
    fn persist(&self, note: &Note) -> SinkResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::Rejected("memory sink is in failing mode".to_string()));
        }
        self.lock().push(note.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySink, NoteSink, SinkError};
    use crate::model::note::Note;

    #[test]
    fn memory_sink_records_in_call_order() {
        let sink = MemorySink::new();
        let first = Note::new();
        let second = Note::new();
        sink.persist(&first).expect("persist first");
        sink.persist(&second).expect("persist second");

        let persisted = sink.persisted();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].id, first.id);
        assert_eq!(sink.last_persisted(second.id), Some(second));
    }

    #[test]
    fn failing_mode_rejects_without_recording() {
        let sink = MemorySink::new();
        sink.set_failing(true);
        let err = sink.persist(&Note::new()).expect_err("failing sink");
        assert!(matches!(err, SinkError::Rejected(_)));
        assert_eq!(sink.persist_count(), 0);
    }
}
