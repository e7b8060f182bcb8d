//! Widget participation in mediator coordination.
//!
//! # Responsibility
//! - Define the capability every widget implements (bind, name).
//! - Provide the widgets of the note editor as thin action forwarders.
//! - Assemble widgets into a registry the mediator is composed from.
//!
//! # Invariants
//! - A widget binds to a mediator at most once.
//! - Widgets hold a `Weak` back-reference; the mediator owns the widgets.
//! - Each user action results in at most one mediator call.

use crate::mediator::Mediator;
use log::warn;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Weak};

mod controls;
mod editors;
mod list_view;
mod registry;

pub use controls::{AddControl, DeleteControl, SaveControl};
pub use editors::{ContentEditor, FilterBox, TitleEditor};
pub use list_view::ListView;
pub use registry::{ComponentRegistry, EditorWidgets, RegistryError, Widget};

/// Capability required from every widget taking part in coordination.
pub trait Component: Send + Sync {
    /// Binds the widget to its mediator. Rebinding is rejected.
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError>;
    /// Stable, non-empty identifier for logs and registry keys.
    fn name(&self) -> &'static str;
}

/// Component binding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    AlreadyBound(&'static str),
}

impl Display for ComponentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyBound(name) => write!(f, "component `{name}` is already bound"),
        }
    }
}

impl Error for ComponentError {}

/// Write-once back-reference from a widget to its mediator.
#[derive(Debug, Default)]
pub struct MediatorSlot {
    mediator: OnceCell<Weak<dyn Mediator>>,
}

impl MediatorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        mediator: Weak<dyn Mediator>,
        owner: &'static str,
    ) -> Result<(), ComponentError> {
        self.mediator
            .set(mediator)
            .map_err(|_| ComponentError::AlreadyBound(owner))
    }

    pub fn is_bound(&self) -> bool {
        self.mediator.get().is_some()
    }

    /// Returns the mediator while it is still alive.
    pub fn get(&self) -> Option<Arc<dyn Mediator>> {
        self.mediator.get().and_then(Weak::upgrade)
    }

    /// Forwards one widget action to the mediator.
    ///
    /// Returns `None` and logs when the widget is unbound or the mediator
    /// has already been dropped.
    pub(crate) fn dispatch<T>(
        &self,
        owner: &'static str,
        action: &'static str,
        call: impl FnOnce(&dyn Mediator) -> T,
    ) -> Option<T> {
        match self.get() {
            Some(mediator) => Some(call(mediator.as_ref())),
            None => {
                warn!(
                    "event=widget_action module=component status=skip widget={} action={} reason=no_mediator",
                    owner, action
                );
                None
            }
        }
    }
}
