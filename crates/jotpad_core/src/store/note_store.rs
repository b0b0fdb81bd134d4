//! Note store facade over the repository seam.
//!
//! # Responsibility
//! - Own the ordered in-memory note collection.
//! - Implement create/read/update/delete plus id and date-range lookups.
//! - Mirror every mutation to the backing file via the repository.
//!
//! # Invariants
//! - Collection order is creation order; display order is derived, never
//!   written back.
//! - New ids are one past the maximum id currently in the store.
//! - `created_at` is refreshed on update; it is a last-touched timestamp.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError, FIELD_DELIMITER};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

const SEPARATOR_WIDTH: usize = 30;
const DATE_FORMAT: &str = "%Y-%m-%d";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for note operations.
#[derive(Debug)]
pub enum StoreError {
    /// Persistence-layer failure. Fatal at startup, propagated otherwise.
    Repo(RepoError),
    /// No note carries the requested id. Non-fatal; the operation is a
    /// no-op.
    NotFound(NoteId),
    /// A date-range bound is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// Title or body text cannot be represented in the backing file.
    InvalidText { field: &'static str },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::InvalidDate(value) => {
                write!(f, "invalid calendar date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidText { field } => {
                write!(f, "invalid {field}: must not contain `;` or line breaks")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// In-memory note collection mirrored to a backing file.
#[derive(Debug)]
pub struct NoteStore<R: NoteRepository> {
    repo: R,
    notes: Vec<Note>,
}

impl<R: NoteRepository> NoteStore<R> {
    /// Opens a store by loading every note from the repository.
    ///
    /// A missing backing file yields an empty store; an unreadable or
    /// malformed one fails the open.
    pub fn open(repo: R) -> StoreResult<Self> {
        let notes = repo.load()?;
        Ok(Self { repo, notes })
    }

    /// Read access to the collection in creation order. Used by shells
    /// for existence checks before prompting update input.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Replaces the in-memory collection with a fresh load from disk.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.notes = self.repo.load()?;
        Ok(())
    }

    /// Creates a note with the next free id and the current wall-clock
    /// time, then rewrites the backing file.
    ///
    /// Non-empty titles are the caller's contract; the store only rejects
    /// text the file format cannot hold.
    pub fn create(&mut self, title: &str, body: &str) -> StoreResult<NoteId> {
        validate_text("title", title)?;
        validate_text("body", body)?;

        let id = self.next_id();
        self.notes.push(Note::new(id, title, body, now()));
        self.save()?;
        info!("event=note_create module=store status=ok id={id}");
        Ok(id)
    }

    /// Pure display query: all notes sorted by `created_at` descending.
    /// Notes sharing a timestamp keep their original relative order.
    pub fn list_recent(&self) -> Vec<&Note> {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// Writes every note in display order, framed by fixed-width
    /// separator lines, with a blank line between notes.
    pub fn render_all(&self, out: &mut impl Write) -> std::io::Result<()> {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        for note in self.list_recent() {
            writeln!(out, "{separator}")?;
            writeln!(out, "{note}")?;
            writeln!(out, "{separator}")?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Returns the first note with the given id, if any.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Returns notes whose timestamp lies in `[start 00:00:00,
    /// end 00:00:00]`, both bounds inclusive. The collection is re-read
    /// from disk first so the query never serves stale rows.
    ///
    /// The upper bound is midnight of the end date: notes created later
    /// that day fall outside the range.
    pub fn read_by_date_range(&mut self, start: &str, end: &str) -> StoreResult<Vec<Note>> {
        let lower = parse_day(start)?.and_time(NaiveTime::MIN);
        let upper = parse_day(end)?.and_time(NaiveTime::MIN);

        self.reload()?;
        Ok(self
            .notes
            .iter()
            .filter(|note| note.created_at >= lower && note.created_at <= upper)
            .cloned()
            .collect())
    }

    /// Overwrites title and body of the matching note (no partial
    /// update), refreshes its timestamp and rewrites the backing file.
    pub fn update(&mut self, id: NoteId, new_title: &str, new_body: &str) -> StoreResult<()> {
        validate_text("title", new_title)?;
        validate_text("body", new_body)?;

        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            warn!("event=note_update module=store status=not_found id={id}");
            return Err(StoreError::NotFound(id));
        };
        note.title = new_title.to_string();
        note.body = new_body.to_string();
        note.created_at = now();

        self.save()?;
        info!("event=note_update module=store status=ok id={id}");
        Ok(())
    }

    /// Removes the first note with the given id and rewrites the backing
    /// file. A missing id leaves the file untouched.
    pub fn delete(&mut self, id: NoteId) -> StoreResult<()> {
        let Some(position) = self.notes.iter().position(|note| note.id == id) else {
            warn!("event=note_delete module=store status=not_found id={id}");
            return Err(StoreError::NotFound(id));
        };
        self.notes.remove(position);

        self.save()?;
        info!("event=note_delete module=store status=ok id={id}");
        Ok(())
    }

    /// Rewrites the entire backing file from current in-memory order.
    pub fn save(&self) -> StoreResult<()> {
        self.repo.save(&self.notes)?;
        Ok(())
    }

    fn next_id(&self) -> NoteId {
        self.notes
            .iter()
            .map(|note| note.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}

/// Current wall-clock time truncated to second precision, matching the
/// persisted resolution.
fn now() -> NaiveDateTime {
    let current = Local::now().naive_local();
    current.with_nanosecond(0).unwrap_or(current)
}

fn parse_day(value: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| StoreError::InvalidDate(value.to_string()))
}

fn validate_text(field: &'static str, value: &str) -> StoreResult<()> {
    if value.contains(FIELD_DELIMITER) || value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidText { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_day, validate_text, StoreError};

    #[test]
    fn parse_day_accepts_calendar_dates() {
        let day = parse_day("2024-03-01").unwrap();
        assert_eq!(day.to_string(), "2024-03-01");
    }

    #[test]
    fn parse_day_trims_surrounding_whitespace() {
        assert!(parse_day(" 2024-03-01 ").is_ok());
    }

    #[test]
    fn parse_day_rejects_impossible_dates() {
        assert!(matches!(
            parse_day("2024-13-01"),
            Err(StoreError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_day("soon"),
            Err(StoreError::InvalidDate(_))
        ));
    }

    #[test]
    fn validate_text_rejects_delimiter_and_line_breaks() {
        assert!(matches!(
            validate_text("body", "a;b"),
            Err(StoreError::InvalidText { field: "body" })
        ));
        assert!(matches!(
            validate_text("title", "two\nlines"),
            Err(StoreError::InvalidText { field: "title" })
        ));
        assert!(validate_text("body", "plain text, commas ok").is_ok());
    }
}
