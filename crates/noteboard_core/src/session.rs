//! One-call wiring of an editor session from configuration.
//!
//! # Responsibility
//! - Open the note store, restore saved notes and compose the editor.
//! - Keep startup order explicit: storage, widgets, mediator.

use crate::component::{EditorWidgets, ListView, RegistryError};
use crate::config::SessionConfig;
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::mediator::{ComposeError, Editor};
use crate::repo::note_store::SqliteNoteStore;
use crate::repo::SinkError;
use crate::surface::RenderSurface;
use crate::watcher::WatcherError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Session startup failures.
#[derive(Debug)]
pub enum SessionError {
    Db(DbError),
    Store(SinkError),
    Watcher(WatcherError),
    Compose(ComposeError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "failed to open note database: {err}"),
            Self::Store(err) => write!(f, "failed to load notes: {err}"),
            Self::Watcher(err) => write!(f, "{err}"),
            Self::Compose(err) => write!(f, "failed to compose editor: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Watcher(err) => Some(err),
            Self::Compose(err) => Some(err),
        }
    }
}

impl From<DbError> for SessionError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<SinkError> for SessionError {
    fn from(value: SinkError) -> Self {
        Self::Store(value)
    }
}

impl From<WatcherError> for SessionError {
    fn from(value: WatcherError) -> Self {
        Self::Watcher(value)
    }
}

impl From<ComposeError> for SessionError {
    fn from(value: ComposeError) -> Self {
        Self::Compose(value)
    }
}

impl From<RegistryError> for SessionError {
    fn from(value: RegistryError) -> Self {
        Self::Compose(ComposeError::Registry(value))
    }
}

/// A composed editor together with the store it saves into.
pub struct Session {
    pub editor: Arc<Editor>,
    pub store: Arc<SqliteNoteStore>,
}

impl Session {
    /// Opens storage per `config`, restores saved notes and composes the
    /// editor against `surface`.
    pub fn open(
        config: &SessionConfig,
        surface: Arc<dyn RenderSurface>,
    ) -> Result<Self, SessionError> {
        let conn = match config.db_path.as_ref() {
            Some(path) => open_db(path)?,
            None => open_db_in_memory()?,
        };
        let store = Arc::new(SqliteNoteStore::try_new(conn)?);
        let restored = store.list_notes()?;
        let restored_count = restored.len();

        let list = ListView::with_notes(restored, config.poll_interval())?;
        let registry = EditorWidgets::create(list).into_registry()?;
        let editor = Editor::compose(&registry, store.clone(), surface)?;

        info!(
            "event=session_open module=session status=ok restored={} poll_interval_ms={}",
            restored_count,
            config.poll_interval().as_millis()
        );
        Ok(Self { editor, store })
    }

    /// Stops background work. The editor remains usable for inspection.
    pub fn close(&self) {
        self.editor.shutdown();
    }
}
