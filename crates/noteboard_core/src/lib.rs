//! Coordination core of the noteboard note editor.
//!
//! Widgets never talk to each other: every user action is forwarded to the
//! `Editor` mediator, which owns all cross-widget effects. A background
//! selection watcher feeds the same mediator on a fixed cadence.

pub mod component;
pub mod config;
pub mod db;
pub mod logging;
pub mod mediator;
pub mod model;
pub mod repo;
pub mod session;
pub mod surface;
pub mod watcher;

pub use component::{
    AddControl, Component, ComponentError, ComponentRegistry, ContentEditor, DeleteControl,
    EditorWidgets, FilterBox, ListView, MediatorSlot, RegistryError, SaveControl, TitleEditor,
    Widget,
};
pub use config::{default_log_level, SessionConfig};
pub use logging::{init_logging, logging_status};
pub use mediator::{ComposeError, Editor, Mediator, MediatorError, SaveOutcome, Visibility};
pub use model::collection::{ListRow, ListSnapshot, NoteCollection, SharedCollection};
pub use model::note::{Note, NoteId};
pub use repo::note_store::SqliteNoteStore;
pub use repo::{MemorySink, NoteSink, SinkError, SinkResult};
pub use session::{Session, SessionError};
pub use surface::{HeadlessSurface, RenderSurface, WidgetKind};
pub use watcher::{SelectionSource, SelectionWatcher, WatcherError, WatcherExit};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
