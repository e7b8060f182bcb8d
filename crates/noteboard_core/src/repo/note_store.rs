//! SQLite-backed note store.
//!
//! # Responsibility
//! - Upsert saved notes keyed by their stable ID.
//! - Load saved notes back in first-save order to restore a session.
//!
//! # Invariants
//! - Stored notes are always clean: the dirty flag is never persisted.
//! - Re-saving a note keeps its original position.

use super::{NoteSink, SinkError, SinkResult};
use crate::model::note::{Note, NoteId};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Note store over a migrated connection.
///
/// The connection sits behind a mutex because saves may race with reads
/// issued from another thread.
#[derive(Debug)]
pub struct SqliteNoteStore {
    conn: Mutex<Connection>,
}

impl SqliteNoteStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: Connection) -> SinkResult<Self> {
        if !table_exists(&conn, "notes")? {
            return Err(SinkError::MissingRequiredTable("notes"));
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Gets one saved note by ID.
    pub fn get_note(&self, id: NoteId) -> SinkResult<Option<Note>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT uuid, title, content FROM notes WHERE uuid = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(note_from_row(row)?));
        }
        Ok(None)
    }

    /// Lists saved notes in the order they were first saved.
    pub fn list_notes(&self) -> SinkResult<Vec<Note>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT uuid, title, content FROM notes ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(note_from_row(row)?);
        }
        Ok(notes)
    }

    pub fn count(&self) -> SinkResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| SinkError::InvalidData(format!("note count {count}")))
    }

    fn lock(&self) -> SinkResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SinkError::Unavailable)
    }
}

impl NoteSink for SqliteNoteStore {
    fn persist(&self, note: &Note) -> SinkResult<()> {
        let conn = self.lock()?;
        let result = conn.execute(
            "INSERT INTO notes (uuid, title, content)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(uuid) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                saved_at = (strftime('%s', 'now') * 1000);",
            params![note.id.to_string(), note.title, note.content],
        );

        match result {
            Ok(_) => {
                debug!(
                    "event=note_persist module=repo status=ok note_id={}",
                    note.id
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=note_persist module=repo status=error note_id={} error={}",
                    note.id, err
                );
                Err(err.into())
            }
        }
    }
}

fn note_from_row(row: &Row<'_>) -> SinkResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text)
        .map_err(|_| SinkError::InvalidData(format!("invalid uuid value `{uuid_text}`")))?;
    let title: String = row.get("title")?;
    let content: String = row.get("content")?;
    Ok(Note::with_id(id, title, content))
}

fn table_exists(conn: &Connection, table: &str) -> SinkResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
