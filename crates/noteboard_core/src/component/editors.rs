//! Text-entry widgets: title, content and list filter.
//!
//! Each keeps its own input buffer. Buffers are widget-local display state;
//! the mediator decides what, if anything, they mean for the notes.

use super::{Component, ComponentError, MediatorSlot};
use crate::mediator::Mediator;
use crate::model::collection::ListSnapshot;
use std::sync::{Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Default)]
struct TextBuffer {
    text: Mutex<String>,
}

impl TextBuffer {
    fn get(&self) -> String {
        self.lock().clone()
    }

    fn set(&self, value: &str) {
        let mut text = self.lock();
        text.clear();
        text.push_str(value);
    }

    // Replacing a `String` cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-line editor for the selected note's title.
#[derive(Debug, Default)]
pub struct TitleEditor {
    mediator: MediatorSlot,
    buffer: TextBuffer,
}

impl TitleEditor {
    pub const NAME: &'static str = "TitleEditor";

    pub fn new() -> Self {
        Self::default()
    }

    /// Keystroke path: the buffer takes the new text, the mediator is told
    /// the note changed.
    pub fn type_text(&self, text: &str) {
        self.buffer.set(text);
        self.mediator
            .dispatch(Self::NAME, "type_text", |mediator| mediator.mark_note_dirty());
    }

    pub fn text(&self) -> String {
        self.buffer.get()
    }

    /// Replaces the buffer without notifying the mediator.
    pub fn set_text(&self, text: &str) {
        self.buffer.set(text);
    }
}

impl Component for TitleEditor {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Multi-line editor for the selected note's body.
#[derive(Debug, Default)]
pub struct ContentEditor {
    mediator: MediatorSlot,
    buffer: TextBuffer,
}

impl ContentEditor {
    pub const NAME: &'static str = "ContentEditor";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_text(&self, text: &str) {
        self.buffer.set(text);
        self.mediator
            .dispatch(Self::NAME, "type_text", |mediator| mediator.mark_note_dirty());
    }

    pub fn text(&self) -> String {
        self.buffer.get()
    }

    pub fn set_text(&self, text: &str) {
        self.buffer.set(text);
    }
}

impl Component for ContentEditor {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Search box narrowing the rows shown by the list view.
///
/// Holds the last list snapshot the mediator handed over, so a new query
/// can be applied without touching the collection.
#[derive(Debug, Default)]
pub struct FilterBox {
    mediator: MediatorSlot,
    query: TextBuffer,
    source: Mutex<ListSnapshot>,
}

impl FilterBox {
    pub const NAME: &'static str = "FilterBox";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_query(&self, query: &str) {
        self.query.set(query);
        self.mediator
            .dispatch(Self::NAME, "type_query", |mediator| mediator.apply_filter(query));
    }

    pub fn query(&self) -> String {
        self.query.get()
    }

    /// Replaces the query without notifying the mediator.
    pub fn set_query(&self, query: &str) {
        self.query.set(query);
    }

    pub fn set_source(&self, snapshot: ListSnapshot) {
        *self.source.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    pub fn source(&self) -> ListSnapshot {
        self.source
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Component for FilterBox {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterBox, TitleEditor};

    #[test]
    fn unbound_editor_still_keeps_typed_text() {
        let title = TitleEditor::new();
        title.type_text("draft title");
        assert_eq!(title.text(), "draft title");
    }

    #[test]
    fn set_text_replaces_buffer() {
        let title = TitleEditor::new();
        title.set_text("first");
        title.set_text("second");
        assert_eq!(title.text(), "second");
    }

    #[test]
    fn filter_box_remembers_query_and_source() {
        let filter = FilterBox::new();
        filter.type_query("groc");
        assert_eq!(filter.query(), "groc");
        assert!(filter.source().rows.is_empty());
    }
}
