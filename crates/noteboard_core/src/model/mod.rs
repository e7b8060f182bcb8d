//! Note domain model shared by the mediator and its widgets.
//!
//! # Responsibility
//! - Define the note record and the ordered, selectable note collection.
//! - Keep selection bookkeeping next to the data it indexes.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Selection is either empty or a valid index into the collection.

pub mod collection;
pub mod note;
