//! Domain model for the note store.
//!
//! # Responsibility
//! - Define the canonical note record used by core business logic.
//! - Own the timestamp formatting contract shared with persistence.
//!
//! # Invariants
//! - Every note is identified by a store-unique integer `NoteId`.
//! - Deletion is a hard removal from the collection, not a tombstone.

pub mod note;
