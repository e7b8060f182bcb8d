//! Visibility state machine for selection-dependent widgets.

use crate::surface::{RenderSurface, WidgetKind};

/// Widgets shown only while a note is selected.
pub const SELECTION_DEPENDENT_WIDGETS: [WidgetKind; 3] = [
    WidgetKind::SaveControl,
    WidgetKind::TitleEditor,
    WidgetKind::ContentEditor,
];

/// Shared visibility of the selection-dependent widgets.
///
/// The empty-selection placeholder is always rendered inversely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    /// Session start state: nothing is selected yet.
    pub const INITIAL: Self = Self::Hidden;

    pub fn from_should_hide(should_hide: bool) -> Self {
        if should_hide {
            Self::Hidden
        } else {
            Self::Visible
        }
    }

    pub fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }

    /// Pushes this state to every affected widget on `surface`.
    pub(crate) fn render(self, surface: &dyn RenderSurface) {
        let visible = self.is_visible();
        for widget in SELECTION_DEPENDENT_WIDGETS {
            surface.set_visible(widget, visible);
        }
        surface.set_visible(WidgetKind::EmptyPlaceholder, !visible);
    }
}
