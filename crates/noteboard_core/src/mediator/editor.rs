//! Note editor mediator.
//!
//! # Responsibility
//! - Implement every cross-widget effect of the note editor.
//! - Own the visibility state of selection-dependent widgets.
//! - Hand saved notes to the persistence sink.
//!
//! # Invariants
//! - The collection lock is never held while the visibility lock is taken
//!   or while another widget is called.
//! - Visibility transitions are rendered entirely under the visibility lock.
//! - A failed save leaves the stored note untouched and dirty.
//! - Titles and contents never reach the log; only note IDs and counts do.

use super::visibility::Visibility;
use super::{Mediator, MediatorError, SaveOutcome};
use crate::component::{ComponentError, ComponentRegistry, EditorWidgets, RegistryError};
use crate::model::collection::{ListSnapshot, ModelPoisoned};
use crate::model::note::Note;
use crate::repo::NoteSink;
use crate::surface::{RenderSurface, WidgetKind};
use crate::watcher::WatcherExit;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Editor composition failures.
#[derive(Debug)]
pub enum ComposeError {
    Registry(RegistryError),
    Component(ComponentError),
    StatePoisoned,
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Component(err) => write!(f, "{err}"),
            Self::StatePoisoned => write!(f, "note collection is unavailable after a panic"),
        }
    }
}

impl Error for ComposeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Component(err) => Some(err),
            Self::StatePoisoned => None,
        }
    }
}

impl From<RegistryError> for ComposeError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<ComponentError> for ComposeError {
    fn from(value: ComponentError) -> Self {
        Self::Component(value)
    }
}

impl From<ModelPoisoned> for ComposeError {
    fn from(_: ModelPoisoned) -> Self {
        Self::StatePoisoned
    }
}

enum SaveCandidate {
    Ready(Note),
    Skip(SaveOutcome),
}

/// Mediator coordinating the note editor widgets.
pub struct Editor {
    widgets: EditorWidgets,
    sink: Arc<dyn NoteSink>,
    surface: Arc<dyn RenderSurface>,
    visibility: Mutex<Visibility>,
}

impl Editor {
    /// Builds the mediator from a complete registry and binds every widget.
    ///
    /// The surface receives the initial (hidden) state and the list rows of
    /// any restored notes before this returns.
    pub fn compose(
        registry: &ComponentRegistry,
        sink: Arc<dyn NoteSink>,
        surface: Arc<dyn RenderSurface>,
    ) -> Result<Arc<Self>, ComposeError> {
        let widgets = registry.resolve()?;
        let editor = Arc::new(Self {
            widgets,
            sink,
            surface,
            visibility: Mutex::new(Visibility::INITIAL),
        });

        let weak_editor = Arc::downgrade(&editor);
        let mediator: Weak<dyn Mediator> = weak_editor;
        for widget in registry.widgets() {
            widget.as_component().set_mediator(mediator.clone())?;
            debug!(
                "event=component_bind module=mediator status=ok component={}",
                widget.name()
            );
        }

        editor.render_initial()?;
        info!(
            "event=editor_compose module=mediator status=ok components={}",
            registry.len()
        );
        Ok(editor)
    }

    pub fn widgets(&self) -> &EditorWidgets {
        &self.widgets
    }

    /// Current state of the selection-dependent widgets.
    pub fn visibility(&self) -> Visibility {
        *self.lock_visibility()
    }

    /// Stops the selection watcher; the editor stays usable afterwards.
    pub fn shutdown(&self) -> Option<WatcherExit> {
        let exit = self.widgets.list.stop_watcher();
        info!(
            "event=editor_shutdown module=mediator status=ok watcher_exit={:?}",
            exit
        );
        exit
    }

    fn render_initial(&self) -> Result<(), ModelPoisoned> {
        Visibility::INITIAL.render(self.surface.as_ref());
        self.fill_editors("", "");
        let snapshot = self.widgets.list.snapshot()?;
        self.send_to_filter(snapshot);
        Ok(())
    }

    fn lock_visibility(&self) -> std::sync::MutexGuard<'_, Visibility> {
        // The guarded value is a plain enum; a panicking renderer cannot tear it.
        self.visibility
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn fill_editors(&self, title: &str, content: &str) {
        self.widgets.title.set_text(title);
        self.widgets.content.set_text(content);
        self.surface.set_text(WidgetKind::TitleEditor, title);
        self.surface.set_text(WidgetKind::ContentEditor, content);
    }

    fn refresh_list(&self) {
        match self.widgets.list.snapshot() {
            Ok(snapshot) => self.send_to_filter(snapshot),
            Err(err) => error!(
                "event=list_refresh module=mediator status=error error={}",
                err
            ),
        }
    }

    fn prepare_save(&self) -> Result<SaveCandidate, MediatorError> {
        let title = self.widgets.title.text();
        let content = self.widgets.content.text();
        self.widgets
            .list
            .model()
            .with(|collection| match collection.selected() {
                None => SaveCandidate::Skip(SaveOutcome::NoSelection),
                Some(note) if !note.dirty => SaveCandidate::Skip(SaveOutcome::Clean),
                Some(note) => {
                    let mut candidate = note.clone();
                    candidate.title = title;
                    candidate.content = content;
                    candidate.mark_saved();
                    SaveCandidate::Ready(candidate)
                }
            })
            .map_err(|_| MediatorError::StatePoisoned)
    }
}

impl Mediator for Editor {
    fn add_new_note(&self) {
        let note = Note::new();
        let note_id = note.id;
        let title = note.title.clone();
        let content = note.content.clone();

        self.fill_editors("", "");
        match self.widgets.list.add_element(note) {
            Ok(index) => {
                self.fill_editors(&title, &content);
                self.hide_elements(false);
                info!(
                    "event=note_add module=mediator status=ok note_id={} index={}",
                    note_id, index
                );
            }
            Err(err) => error!(
                "event=note_add module=mediator status=error note_id={} error={}",
                note_id, err
            ),
        }
    }

    fn delete_current_note(&self) {
        match self.widgets.list.delete_element() {
            Ok(Some(note)) => {
                self.fill_editors("", "");
                self.hide_elements(true);
                info!(
                    "event=note_delete module=mediator status=ok note_id={}",
                    note.id
                );
            }
            Ok(None) => debug!(
                "event=note_delete module=mediator status=skip reason=no_selection"
            ),
            Err(err) => error!(
                "event=note_delete module=mediator status=error error={}",
                err
            ),
        }
    }

    fn save_changes(&self) -> Result<SaveOutcome, MediatorError> {
        let candidate = match self.prepare_save()? {
            SaveCandidate::Ready(candidate) => candidate,
            SaveCandidate::Skip(outcome) => {
                debug!(
                    "event=note_save module=mediator status=skip reason={:?}",
                    outcome
                );
                return Ok(outcome);
            }
        };

        let note_id = candidate.id;
        if let Err(err) = self.sink.persist(&candidate) {
            warn!(
                "event=note_save module=mediator status=error note_id={} error={}",
                note_id, err
            );
            return Err(err.into());
        }

        let stored = self
            .widgets
            .list
            .model()
            .with(|collection| collection.replace(candidate))
            .map_err(|_| MediatorError::StatePoisoned)?;
        if !stored {
            warn!(
                "event=note_save module=mediator status=ok note_id={} detail=removed_before_writeback",
                note_id
            );
        }

        self.refresh_list();
        info!(
            "event=note_save module=mediator status=ok note_id={}",
            note_id
        );
        Ok(SaveOutcome::Saved(note_id))
    }

    fn mark_note_dirty(&self) {
        let flipped = self
            .widgets
            .list
            .model()
            .with(|collection| collection.selected_mut().map(Note::mark_dirty));
        match flipped {
            Ok(Some(true)) => {
                self.refresh_list();
                debug!("event=note_dirty module=mediator status=ok");
            }
            Ok(Some(false)) => {}
            Ok(None) => debug!("event=note_dirty module=mediator status=skip reason=no_selection"),
            Err(err) => error!(
                "event=note_dirty module=mediator status=error error={}",
                err
            ),
        }
    }

    fn send_to_filter(&self, snapshot: ListSnapshot) {
        let query = self.widgets.filter.query();
        let rows = snapshot.filtered(&query);
        self.surface.show_rows(&rows, snapshot.selected);
        debug!(
            "event=list_refresh module=mediator status=ok total={} visible={}",
            snapshot.rows.len(),
            rows.len()
        );
        self.widgets.filter.set_source(snapshot);
    }

    fn hide_elements(&self, should_hide: bool) {
        let target = Visibility::from_should_hide(should_hide);
        let mut current = self.lock_visibility();
        if *current == target {
            return;
        }
        target.render(self.surface.as_ref());
        *current = target;
        debug!(
            "event=visibility_change module=mediator status=ok state={}",
            target.as_str()
        );
    }

    fn load_selected_note(&self) {
        let selected = self.widgets.list.model().with(|collection| {
            collection
                .selected()
                .map(|note| (note.title.clone(), note.content.clone()))
        });
        match selected {
            Ok(Some((title, content))) => {
                self.fill_editors(&title, &content);
                self.hide_elements(false);
                self.refresh_list();
            }
            Ok(None) => {
                self.fill_editors("", "");
                self.hide_elements(true);
            }
            Err(err) => error!(
                "event=note_load module=mediator status=error error={}",
                err
            ),
        }
    }

    fn apply_filter(&self, query: &str) {
        self.widgets.filter.set_query(query);
        let snapshot = self.widgets.filter.source();
        let rows = snapshot.filtered(query);
        self.surface.show_rows(&rows, snapshot.selected);
        debug!(
            "event=list_filter module=mediator status=ok total={} visible={}",
            snapshot.rows.len(),
            rows.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::Editor;
    use crate::component::{ComponentRegistry, EditorWidgets, ListView, RegistryError, Widget};
    use crate::mediator::{ComposeError, Mediator, Visibility};
    use crate::repo::MemorySink;
    use crate::surface::{HeadlessSurface, WidgetKind};
    use std::sync::Arc;
    use std::time::Duration;

    fn compose() -> (Arc<Editor>, Arc<MemorySink>, Arc<HeadlessSurface>) {
        let list = ListView::new(Duration::from_secs(60)).expect("list should start");
        let registry = EditorWidgets::create(list)
            .into_registry()
            .expect("registry should build");
        let sink = Arc::new(MemorySink::new());
        let surface = Arc::new(HeadlessSurface::new());
        let editor = Editor::compose(&registry, sink.clone(), surface.clone())
            .expect("editor should compose");
        (editor, sink, surface)
    }

    #[test]
    fn compose_renders_hidden_initial_state() {
        let (editor, _sink, surface) = compose();
        assert_eq!(editor.visibility(), Visibility::Hidden);
        assert_eq!(surface.is_visible(WidgetKind::SaveControl), Some(false));
        assert_eq!(surface.is_visible(WidgetKind::EmptyPlaceholder), Some(true));
        assert!(surface.rows().is_empty());
    }

    #[test]
    fn compose_rejects_incomplete_registry() {
        let mut registry = ComponentRegistry::new();
        let list = ListView::new(Duration::from_secs(60)).expect("list should start");
        registry
            .register(Widget::List(Arc::new(list)))
            .expect("list should register");

        let result = Editor::compose(
            &registry,
            Arc::new(MemorySink::new()),
            Arc::new(HeadlessSurface::new()),
        );
        assert!(matches!(
            result,
            Err(ComposeError::Registry(RegistryError::MissingComponent(_)))
        ));
    }

    #[test]
    fn hide_elements_only_renders_transitions() {
        let (editor, _sink, surface) = compose();
        let baseline = surface.visibility_updates();

        editor.hide_elements(true);
        assert_eq!(surface.visibility_updates(), baseline);

        editor.hide_elements(false);
        let after_show = surface.visibility_updates();
        assert!(after_show > baseline);

        editor.hide_elements(false);
        assert_eq!(surface.visibility_updates(), after_show);
    }

    #[test]
    fn apply_filter_keeps_query_for_later_refreshes() {
        let (editor, _sink, surface) = compose();
        editor.add_new_note();
        editor.apply_filter("zzz");
        assert!(surface.rows().is_empty());

        editor.add_new_note();
        assert!(surface.rows().is_empty());
        assert_eq!(editor.widgets().list.len().expect("len"), 2);

        editor.apply_filter("");
        assert_eq!(surface.rows().len(), 2);
    }
}
