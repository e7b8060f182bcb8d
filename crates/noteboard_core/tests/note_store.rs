use noteboard_core::db::migrations::latest_version;
use noteboard_core::db::{open_db, open_db_in_memory, DbError};
use noteboard_core::{
    HeadlessSurface, Note, NoteSink, SaveOutcome, Session, SessionConfig, SinkError,
    SqliteNoteStore, WidgetKind,
};
use rusqlite::Connection;
use std::sync::Arc;

#[test]
fn persist_upserts_by_note_id() {
    let store = SqliteNoteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let mut note = Note::new();
    note.title = "Draft".to_string();
    store.persist(&note).unwrap();

    note.title = "Final".to_string();
    note.content = "body".to_string();
    store.persist(&note).unwrap();

    assert_eq!(store.count().unwrap(), 1);
    let loaded = store.get_note(note.id).unwrap().unwrap();
    assert_eq!(loaded.title, "Final");
    assert_eq!(loaded.content, "body");
    assert!(!loaded.dirty);
}

#[test]
fn list_notes_keeps_first_save_order() {
    let store = SqliteNoteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let first = Note::new();
    let second = Note::new();
    store.persist(&first).unwrap();
    store.persist(&second).unwrap();
    store.persist(&first).unwrap();

    let ids: Vec<_> = store.list_notes().unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn store_requires_migrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteStore::try_new(conn).unwrap_err();
    assert!(matches!(err, SinkError::MissingRequiredTable("notes")));
}

#[test]
fn open_db_refuses_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn session_restores_saved_notes_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = SessionConfig {
        poll_interval_ms: 50,
        db_path: Some(dir.path().join("notes.sqlite3")),
        ..SessionConfig::default()
    };

    {
        let session = Session::open(&config, Arc::new(HeadlessSurface::new())).unwrap();
        let widgets = session.editor.widgets();
        widgets.add.click();
        widgets.title.type_text("Kept");
        assert!(matches!(
            widgets.save.click().unwrap(),
            SaveOutcome::Saved(_)
        ));
        widgets.add.click();
        widgets.title.type_text("Unsaved");
        session.close();
    }

    let surface = Arc::new(HeadlessSurface::new());
    let session = Session::open(&config, surface.clone()).unwrap();
    assert_eq!(surface.row_labels(), vec!["Kept".to_string()]);
    assert_eq!(session.editor.widgets().list.selected_index().unwrap(), None);
    assert_eq!(surface.is_visible(WidgetKind::TitleEditor), Some(false));
    assert_eq!(session.store.count().unwrap(), 1);
    session.close();
}
