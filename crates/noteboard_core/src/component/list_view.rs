//! Selectable note list and owner of the note collection.
//!
//! # Responsibility
//! - Own the session's note collection (shared with the mediator by handle).
//! - Forward user selection to the mediator.
//! - Run the selection watcher for as long as the view lives.
//!
//! # Invariants
//! - The watcher starts in `ListView::new` and stops when the view stops or
//!   drops.
//! - No collection lock is held while calling into the mediator.

use super::{Component, ComponentError, MediatorSlot};
use crate::mediator::Mediator;
use crate::model::collection::{ListSnapshot, ModelPoisoned, NoteCollection, SharedCollection};
use crate::model::note::Note;
use crate::watcher::{SelectionSource, SelectionWatcher, WatcherError, WatcherExit};
use log::warn;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

/// List widget backed by the note collection.
#[derive(Debug)]
pub struct ListView {
    mediator: Arc<MediatorSlot>,
    model: SharedCollection,
    watcher: Mutex<Option<SelectionWatcher>>,
}

impl ListView {
    pub const NAME: &'static str = "ListView";

    /// Creates an empty list and starts its selection watcher.
    pub fn new(poll_interval: Duration) -> Result<Self, WatcherError> {
        Self::with_notes(Vec::new(), poll_interval)
    }

    /// Creates a list over restored notes, nothing selected.
    pub fn with_notes(notes: Vec<Note>, poll_interval: Duration) -> Result<Self, WatcherError> {
        let mediator = Arc::new(MediatorSlot::new());
        let model = SharedCollection::new(NoteCollection::from_notes(notes));
        let source: Arc<dyn SelectionSource> = Arc::new(model.clone());
        let watcher = SelectionWatcher::start(source, Arc::clone(&mediator), poll_interval)?;
        Ok(Self {
            mediator,
            model,
            watcher: Mutex::new(Some(watcher)),
        })
    }

    /// User picked the row for collection `index`.
    ///
    /// Out-of-range indexes are ignored.
    pub fn select(&self, index: usize) {
        match self.model.with(|collection| collection.select(index)) {
            Ok(true) => {
                self.mediator
                    .dispatch(Self::NAME, "select", |mediator| mediator.load_selected_note());
            }
            Ok(false) => warn!(
                "event=list_select module=component status=skip index={} reason=out_of_range",
                index
            ),
            Err(err) => warn!(
                "event=list_select module=component status=error error={}",
                err
            ),
        }
    }

    /// Selection cleared by the platform (e.g. click on empty space).
    ///
    /// The mediator is not called; the watcher reports it on its next cycle.
    pub fn clear_selection(&self) {
        if let Err(err) = self.model.with(NoteCollection::clear_selection) {
            warn!(
                "event=list_clear_selection module=component status=error error={}",
                err
            );
        }
    }

    /// Appends `note`, selects it and pushes the new rows to the filter.
    pub fn add_element(&self, note: Note) -> Result<usize, ModelPoisoned> {
        let (index, snapshot) = self.model.with(|collection| {
            let index = collection.push_and_select(note);
            (index, collection.snapshot())
        })?;
        self.mediator
            .dispatch(Self::NAME, "add_element", |mediator| {
                mediator.send_to_filter(snapshot)
            });
        Ok(index)
    }

    /// Removes the selected note, if any, and pushes the new rows.
    pub fn delete_element(&self) -> Result<Option<Note>, ModelPoisoned> {
        let removed = self.model.with(|collection| {
            collection
                .remove_selected()
                .map(|note| (note, collection.snapshot()))
        })?;
        let Some((note, snapshot)) = removed else {
            return Ok(None);
        };
        self.mediator
            .dispatch(Self::NAME, "delete_element", |mediator| {
                mediator.send_to_filter(snapshot)
            });
        Ok(Some(note))
    }

    /// Collection handle for mediator-side reads and writes.
    pub fn model(&self) -> &SharedCollection {
        &self.model
    }

    pub fn snapshot(&self) -> Result<ListSnapshot, ModelPoisoned> {
        self.model.with(|collection| collection.snapshot())
    }

    pub fn len(&self) -> Result<usize, ModelPoisoned> {
        self.model.with(|collection| collection.len())
    }

    pub fn is_empty(&self) -> Result<bool, ModelPoisoned> {
        self.model.with(|collection| collection.is_empty())
    }

    pub fn selected_index(&self) -> Result<Option<usize>, ModelPoisoned> {
        self.model.with(|collection| collection.selected_index())
    }

    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(SelectionWatcher::is_running)
    }

    /// Stops the selection watcher. Safe to call more than once.
    pub fn stop_watcher(&self) -> Option<WatcherExit> {
        let watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        watcher.and_then(|mut watcher| watcher.stop())
    }
}

impl Component for ListView {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::ListView;
    use crate::model::note::Note;
    use crate::watcher::WatcherExit;
    use std::time::Duration;

    #[test]
    fn unbound_list_still_maintains_collection() {
        let list = ListView::new(Duration::from_millis(20)).expect("list should start");
        list.add_element(Note::new()).expect("add should succeed");
        list.add_element(Note::new()).expect("add should succeed");
        assert_eq!(list.len().expect("len"), 2);
        assert_eq!(list.selected_index().expect("selection"), Some(1));

        list.select(0);
        assert_eq!(list.selected_index().expect("selection"), Some(0));

        list.select(9);
        assert_eq!(list.selected_index().expect("selection"), Some(0));

        list.delete_element().expect("delete should succeed");
        assert_eq!(list.len().expect("len"), 1);
        assert_eq!(list.selected_index().expect("selection"), None);
    }

    #[test]
    fn watcher_runs_until_stopped() {
        let list = ListView::new(Duration::from_millis(20)).expect("list should start");
        assert!(list.is_watching());
        assert_eq!(list.stop_watcher(), Some(WatcherExit::Stopped));
        assert!(!list.is_watching());
        assert_eq!(list.stop_watcher(), None);
    }

    #[test]
    fn restored_notes_start_unselected() {
        let notes = vec![Note::new(), Note::new()];
        let list = ListView::with_notes(notes, Duration::from_millis(20)).expect("list");
        assert_eq!(list.len().expect("len"), 2);
        assert_eq!(list.selected_index().expect("selection"), None);
    }
}
