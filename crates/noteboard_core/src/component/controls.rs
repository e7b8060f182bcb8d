//! Button-like widgets: add, delete and save.

use super::{Component, ComponentError, MediatorSlot};
use crate::mediator::{Mediator, MediatorError, SaveOutcome};
use std::sync::Weak;

/// Creates a new note.
#[derive(Debug, Default)]
pub struct AddControl {
    mediator: MediatorSlot,
}

impl AddControl {
    pub const NAME: &'static str = "AddControl";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&self) {
        self.mediator
            .dispatch(Self::NAME, "click", |mediator| mediator.add_new_note());
    }
}

impl Component for AddControl {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Deletes the selected note.
#[derive(Debug, Default)]
pub struct DeleteControl {
    mediator: MediatorSlot,
}

impl DeleteControl {
    pub const NAME: &'static str = "DeleteControl";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&self) {
        self.mediator.dispatch(Self::NAME, "click", |mediator| {
            mediator.delete_current_note()
        });
    }
}

impl Component for DeleteControl {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Saves the selected note.
///
/// The save result flows back to the caller so persistence failures can be
/// reported to the user.
#[derive(Debug, Default)]
pub struct SaveControl {
    mediator: MediatorSlot,
}

impl SaveControl {
    pub const NAME: &'static str = "SaveControl";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&self) -> Result<SaveOutcome, MediatorError> {
        self.mediator
            .dispatch(Self::NAME, "click", |mediator| mediator.save_changes())
            .unwrap_or(Err(MediatorError::Detached))
    }
}

impl Component for SaveControl {
    fn set_mediator(&self, mediator: Weak<dyn Mediator>) -> Result<(), ComponentError> {
        self.mediator.bind(mediator, Self::NAME)
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::{AddControl, SaveControl};
    use crate::component::{Component, ComponentError};
    use crate::mediator::{Mediator, MediatorError, SaveOutcome};
    use crate::model::collection::ListSnapshot;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Weak};

    #[derive(Default)]
    struct CountingMediator {
        adds: AtomicUsize,
        saves: AtomicUsize,
    }

    impl Mediator for CountingMediator {
        fn add_new_note(&self) {
            self.adds.fetch_add(1, Ordering::SeqCst);
        }
        fn delete_current_note(&self) {}
        fn save_changes(&self) -> Result<SaveOutcome, MediatorError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(SaveOutcome::Clean)
        }
        fn mark_note_dirty(&self) {}
        fn send_to_filter(&self, _snapshot: ListSnapshot) {}
        fn hide_elements(&self, _should_hide: bool) {}
        fn load_selected_note(&self) {}
        fn apply_filter(&self, _query: &str) {}
    }

    #[test]
    fn click_forwards_exactly_one_call() {
        let mediator = Arc::new(CountingMediator::default());
        let weak: Weak<dyn Mediator> = Arc::downgrade(&mediator) as Weak<dyn Mediator>;
        let add = AddControl::new();
        add.set_mediator(weak).expect("first bind should succeed");

        add.click();
        assert_eq!(mediator.adds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rebinding_is_rejected() {
        let mediator = Arc::new(CountingMediator::default());
        let weak: Weak<dyn Mediator> = Arc::downgrade(&mediator) as Weak<dyn Mediator>;
        let add = AddControl::new();
        add.set_mediator(weak.clone()).expect("first bind should succeed");

        let err = add.set_mediator(weak).expect_err("second bind must fail");
        assert_eq!(err, ComponentError::AlreadyBound("AddControl"));
    }

    #[test]
    fn unbound_save_reports_detached() {
        let save = SaveControl::new();
        assert!(matches!(save.click(), Err(MediatorError::Detached)));
    }

    #[test]
    fn save_after_mediator_drop_reports_detached() {
        let mediator = Arc::new(CountingMediator::default());
        let weak: Weak<dyn Mediator> = Arc::downgrade(&mediator) as Weak<dyn Mediator>;
        let save = SaveControl::new();
        save.set_mediator(weak).expect("bind should succeed");
        drop(mediator);

        assert!(matches!(save.click(), Err(MediatorError::Detached)));
    }
}
