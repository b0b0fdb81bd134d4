//! Note store use-case layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into user-facing note operations.
//! - Keep the in-memory collection and the backing file reconciled.
//!
//! # Invariants
//! - Every mutating operation rewrites the backing file before returning.
//! - Ids are unique within the store at all times.

pub mod note_store;
