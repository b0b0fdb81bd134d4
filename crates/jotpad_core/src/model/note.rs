//! Note domain model.
//!
//! # Responsibility
//! - Define the note record persisted by the flat-file store.
//! - Own the second-precision timestamp format shared with the file codec.
//!
//! # Invariants
//! - `id` is immutable for the lifetime of a note.
//! - `created_at` is refreshed on every update; it is a last-touched
//!   timestamp, not a pure creation marker.

use chrono::NaiveDateTime;
use std::fmt::{Display, Formatter};

/// Store-unique identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = u64;

/// On-disk and display timestamp format, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single user-authored note.
///
/// Plain data holder: constructors perform no validation. The store is
/// responsible for id uniqueness and delimiter-safe text; the shell is
/// responsible for non-empty titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Store-unique id, assigned once at creation.
    pub id: NoteId,
    /// Short heading. Non-empty by caller contract.
    pub title: String,
    /// Free text.
    pub body: String,
    /// Last-touched timestamp: set at creation, overwritten on update.
    pub created_at: NaiveDateTime,
}

impl Note {
    /// Creates a note from already-validated parts.
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            created_at,
        }
    }

    /// Renders `created_at` in the on-disk timestamp format.
    pub fn created_at_text(&self) -> String {
        format_timestamp(self.created_at)
    }
}

impl Display for Note {
    /// Multi-line human-readable rendering: id, title, body and timestamp,
    /// each on its own line, in that fixed order.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}\nTitle: {}\nBody: {}\nCreated At: {}",
            self.id,
            self.title,
            self.body,
            self.created_at_text()
        )
    }
}

/// Formats a timestamp in the shared second-precision format.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp in the shared second-precision format.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, parse_timestamp, Note};

    #[test]
    fn timestamp_round_trips_through_text() {
        let parsed = parse_timestamp("2024-03-01 09:15:42").unwrap();
        assert_eq!(format_timestamp(parsed), "2024-03-01 09:15:42");
    }

    #[test]
    fn timestamp_rejects_date_only_input() {
        assert!(parse_timestamp("2024-03-01").is_err());
    }

    #[test]
    fn display_lists_fields_in_fixed_order() {
        let note = Note::new(
            7,
            "Groceries",
            "milk, eggs",
            parse_timestamp("2024-03-01 09:15:42").unwrap(),
        );
        assert_eq!(
            note.to_string(),
            "ID: 7\nTitle: Groceries\nBody: milk, eggs\nCreated At: 2024-03-01 09:15:42"
        );
    }
}
