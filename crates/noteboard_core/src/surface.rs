//! Rendering collaborator consumed by the mediator.
//!
//! # Responsibility
//! - Define what the coordination core asks of a rendering layer.
//! - Provide a recording headless surface for tests and the demo binary.
//!
//! Layout, painting and input decoding live outside this crate.

use crate::model::collection::ListRow;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Addressable parts of the note editor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidgetKind {
    AddControl,
    DeleteControl,
    SaveControl,
    TitleEditor,
    ContentEditor,
    FilterBox,
    ListView,
    /// Label shown instead of the editors while nothing is selected.
    EmptyPlaceholder,
}

impl WidgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddControl => "add_control",
            Self::DeleteControl => "delete_control",
            Self::SaveControl => "save_control",
            Self::TitleEditor => "title_editor",
            Self::ContentEditor => "content_editor",
            Self::FilterBox => "filter_box",
            Self::ListView => "list_view",
            Self::EmptyPlaceholder => "empty_placeholder",
        }
    }
}

/// Rendering sink driven by the mediator.
///
/// Implementations must be callable from the selection watcher thread.
pub trait RenderSurface: Send + Sync {
    fn set_visible(&self, widget: WidgetKind, visible: bool);
    fn set_text(&self, widget: WidgetKind, text: &str);
    /// Replaces the visible list rows. `selected` is a collection index.
    fn show_rows(&self, rows: &[ListRow], selected: Option<usize>);
}

#[derive(Debug, Default)]
struct SurfaceState {
    visible: BTreeMap<WidgetKind, bool>,
    texts: BTreeMap<WidgetKind, String>,
    rows: Vec<ListRow>,
    selected: Option<usize>,
    visibility_updates: usize,
}

/// In-memory surface that keeps the latest rendered state.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    state: Mutex<SurfaceState>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last visibility pushed for `widget`; `None` if never rendered.
    pub fn is_visible(&self, widget: WidgetKind) -> Option<bool> {
        self.lock().visible.get(&widget).copied()
    }

    pub fn text(&self, widget: WidgetKind) -> Option<String> {
        self.lock().texts.get(&widget).cloned()
    }

    pub fn rows(&self) -> Vec<ListRow> {
        self.lock().rows.clone()
    }

    pub fn row_labels(&self) -> Vec<String> {
        self.lock().rows.iter().map(|row| row.label.clone()).collect()
    }

    pub fn selected(&self) -> Option<usize> {
        self.lock().selected
    }

    /// Number of `set_visible` calls received so far.
    pub fn visibility_updates(&self) -> usize {
        self.lock().visibility_updates
    }

    // Recording only; a panicked writer cannot leave a half-applied entry.
    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderSurface for HeadlessSurface {
    fn set_visible(&self, widget: WidgetKind, visible: bool) {
        let mut state = self.lock();
        state.visible.insert(widget, visible);
        state.visibility_updates += 1;
    }

    fn set_text(&self, widget: WidgetKind, text: &str) {
        self.lock().texts.insert(widget, text.to_string());
    }

    fn show_rows(&self, rows: &[ListRow], selected: Option<usize>) {
        let mut state = self.lock();
        state.rows = rows.to_vec();
        state.selected = selected;
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadlessSurface, RenderSurface, WidgetKind};

    #[test]
    fn records_latest_visibility_and_counts_updates() {
        let surface = HeadlessSurface::new();
        assert_eq!(surface.is_visible(WidgetKind::SaveControl), None);

        surface.set_visible(WidgetKind::SaveControl, true);
        surface.set_visible(WidgetKind::SaveControl, false);
        assert_eq!(surface.is_visible(WidgetKind::SaveControl), Some(false));
        assert_eq!(surface.visibility_updates(), 2);
    }

    #[test]
    fn records_text_per_widget() {
        let surface = HeadlessSurface::new();
        surface.set_text(WidgetKind::TitleEditor, "draft");
        assert_eq!(
            surface.text(WidgetKind::TitleEditor).as_deref(),
            Some("draft")
        );
        assert_eq!(surface.text(WidgetKind::ContentEditor), None);
    }
}
