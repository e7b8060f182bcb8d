//! Startup-time component registry.
//!
//! Widgets are registered once by whatever composes the editor; the mediator
//! resolves its typed widget set from it and never mutates it afterwards.

use super::{
    AddControl, Component, ContentEditor, DeleteControl, FilterBox, ListView, SaveControl,
    TitleEditor,
};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// One registered widget.
#[derive(Debug, Clone)]
pub enum Widget {
    Add(Arc<AddControl>),
    Delete(Arc<DeleteControl>),
    Save(Arc<SaveControl>),
    Title(Arc<TitleEditor>),
    Content(Arc<ContentEditor>),
    Filter(Arc<FilterBox>),
    List(Arc<ListView>),
}

impl Widget {
    pub fn as_component(&self) -> &dyn Component {
        match self {
            Self::Add(widget) => &**widget,
            Self::Delete(widget) => &**widget,
            Self::Save(widget) => &**widget,
            Self::Title(widget) => &**widget,
            Self::Content(widget) => &**widget,
            Self::Filter(widget) => &**widget,
            Self::List(widget) => &**widget,
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_component().name()
    }
}

/// Registration and resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateComponent(&'static str),
    MissingComponent(&'static str),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateComponent(name) => write!(f, "component already registered: {name}"),
            Self::MissingComponent(name) => write!(f, "required component missing: {name}"),
        }
    }
}

impl Error for RegistryError {}

/// Name -> widget mapping assembled at startup.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: BTreeMap<&'static str, Widget>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one widget under its component name.
    pub fn register(&mut self, widget: Widget) -> Result<(), RegistryError> {
        let name = widget.name();
        if self.components.contains_key(name) {
            return Err(RegistryError::DuplicateComponent(name));
        }
        self.components.insert(name, widget);
        Ok(())
    }

    /// Builder-style `register` for startup wiring.
    pub fn with(mut self, widget: Widget) -> Result<Self, RegistryError> {
        self.register(widget)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns sorted component names.
    pub fn names(&self) -> Vec<&'static str> {
        self.components.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<&Widget> {
        self.components.get(name.trim())
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.components.values()
    }

    /// Resolves the full widget set the editor mediator needs.
    pub fn resolve(&self) -> Result<EditorWidgets, RegistryError> {
        let mut add = None;
        let mut delete = None;
        let mut save = None;
        let mut title = None;
        let mut content = None;
        let mut filter = None;
        let mut list = None;

        for widget in self.components.values() {
            match widget {
                Widget::Add(w) => add = Some(Arc::clone(w)),
                Widget::Delete(w) => delete = Some(Arc::clone(w)),
                Widget::Save(w) => save = Some(Arc::clone(w)),
                Widget::Title(w) => title = Some(Arc::clone(w)),
                Widget::Content(w) => content = Some(Arc::clone(w)),
                Widget::Filter(w) => filter = Some(Arc::clone(w)),
                Widget::List(w) => list = Some(Arc::clone(w)),
            }
        }

        Ok(EditorWidgets {
            add: add.ok_or(RegistryError::MissingComponent(AddControl::NAME))?,
            delete: delete.ok_or(RegistryError::MissingComponent(DeleteControl::NAME))?,
            save: save.ok_or(RegistryError::MissingComponent(SaveControl::NAME))?,
            title: title.ok_or(RegistryError::MissingComponent(TitleEditor::NAME))?,
            content: content.ok_or(RegistryError::MissingComponent(ContentEditor::NAME))?,
            filter: filter.ok_or(RegistryError::MissingComponent(FilterBox::NAME))?,
            list: list.ok_or(RegistryError::MissingComponent(ListView::NAME))?,
        })
    }
}

/// Typed widget set resolved from a registry.
#[derive(Debug, Clone)]
pub struct EditorWidgets {
    pub add: Arc<AddControl>,
    pub delete: Arc<DeleteControl>,
    pub save: Arc<SaveControl>,
    pub title: Arc<TitleEditor>,
    pub content: Arc<ContentEditor>,
    pub filter: Arc<FilterBox>,
    pub list: Arc<ListView>,
}

impl EditorWidgets {
    /// Creates fresh controls and editors around an existing list view.
    pub fn create(list: ListView) -> Self {
        Self {
            add: Arc::new(AddControl::new()),
            delete: Arc::new(DeleteControl::new()),
            save: Arc::new(SaveControl::new()),
            title: Arc::new(TitleEditor::new()),
            content: Arc::new(ContentEditor::new()),
            filter: Arc::new(FilterBox::new()),
            list: Arc::new(list),
        }
    }

    /// Registry holding every widget of this set.
    pub fn into_registry(self) -> Result<ComponentRegistry, RegistryError> {
        ComponentRegistry::new()
            .with(Widget::Add(self.add))?
            .with(Widget::Delete(self.delete))?
            .with(Widget::Save(self.save))?
            .with(Widget::Title(self.title))?
            .with(Widget::Content(self.content))?
            .with(Widget::Filter(self.filter))?
            .with(Widget::List(self.list))
    }
}

#[cfg(test)]
mod tests {
    use super::{ComponentRegistry, EditorWidgets, RegistryError, Widget};
    use crate::component::{AddControl, ListView};
    use std::sync::Arc;
    use std::time::Duration;

    fn list() -> ListView {
        ListView::new(Duration::from_millis(50)).expect("list should start")
    }

    #[test]
    fn full_widget_set_resolves() {
        let registry = EditorWidgets::create(list())
            .into_registry()
            .expect("registry should build");
        assert_eq!(registry.len(), 7);
        assert!(registry.get(" ListView ").is_some());
        registry.resolve().expect("all widgets present");
    }

    #[test]
    fn rejects_duplicate_component() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Widget::Add(Arc::new(AddControl::new())))
            .expect("first add control should register");
        let err = registry
            .register(Widget::Add(Arc::new(AddControl::new())))
            .expect_err("duplicate must fail");
        assert_eq!(err, RegistryError::DuplicateComponent("AddControl"));
    }

    #[test]
    fn resolve_reports_missing_component() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Widget::Add(Arc::new(AddControl::new())))
            .expect("add control should register");
        let err = registry.resolve().expect_err("incomplete registry");
        assert!(matches!(err, RegistryError::MissingComponent(_)));
    }
}
