//! Note repository contract and flat-file implementation.
//!
//! # Responsibility
//! - Provide the load/save persistence seam used by the note store.
//! - Own the `;`-delimited file format: header row, one row per note.
//!
//! # Invariants
//! - A missing backing file is bootstrapped with only the header row.
//! - A row with the wrong column count, a non-numeric id or an
//!   unparseable timestamp fails the whole load.
//! - Saves rewrite the entire file through a temporary sibling, then
//!   rename it over the target.

use crate::model::note::{parse_timestamp, Note};
use log::{error, info};
use std::error::Error;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed header row of the backing file.
pub const FILE_HEADER: &str = "ID;Title;Body;Created At";

/// Field delimiter of the backing file. No quoting or escaping exists,
/// so persisted titles and bodies must never contain it.
pub const FIELD_DELIMITER: char = ';';

const FIELDS_PER_ROW: usize = 4;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for note load/save operations.
#[derive(Debug)]
pub enum RepoError {
    /// Backing file could not be read or written.
    Io(std::io::Error),
    /// A persisted row violates the file format. Fatal for the load.
    MalformedRow { line: usize, reason: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "notes file i/o failed: {err}"),
            Self::MalformedRow { line, reason } => {
                write!(f, "malformed note row at line {line}: {reason}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::MalformedRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Repository interface between the note store and its backing medium.
pub trait NoteRepository {
    /// Loads every note in file order. Bootstraps an empty store when the
    /// backing medium does not exist yet.
    fn load(&self) -> RepoResult<Vec<Note>>;
    /// Replaces the backing medium with the given notes, in order.
    fn save(&self, notes: &[Note]) -> RepoResult<()>;
}

/// `;`-delimited flat-file repository.
#[derive(Debug)]
pub struct FlatFileRepository {
    path: PathBuf,
}

impl FlatFileRepository {
    /// Creates a repository over the given file path. The file itself is
    /// only touched by `load`/`save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn bootstrap(&self) -> RepoResult<()> {
        fs::write(&self.path, format!("{FILE_HEADER}\n"))?;
        info!(
            "event=store_bootstrap module=repo status=ok path={}",
            self.path.display()
        );
        Ok(())
    }
}

impl NoteRepository for FlatFileRepository {
    fn load(&self) -> RepoResult<Vec<Note>> {
        if !self.path.exists() {
            self.bootstrap()?;
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let mut notes = Vec::new();
        // Line 1 is the header row; it is skipped, not validated, so a
        // hand-edited header does not brick the store.
        for (index, line) in contents.lines().enumerate().skip(1) {
            match parse_row(index + 1, line) {
                Ok(note) => notes.push(note),
                Err(err) => {
                    error!(
                        "event=store_load module=repo status=error path={} error={}",
                        self.path.display(),
                        err
                    );
                    return Err(err);
                }
            }
        }

        info!(
            "event=store_load module=repo status=ok path={} count={}",
            self.path.display(),
            notes.len()
        );
        Ok(notes)
    }

    fn save(&self, notes: &[Note]) -> RepoResult<()> {
        let mut contents = String::from(FILE_HEADER);
        contents.push('\n');
        for note in notes {
            contents.push_str(&encode_row(note));
            contents.push('\n');
        }

        // Write-then-rename so an interrupted save leaves the previous
        // file intact.
        let tmp_path = tmp_sibling(&self.path);
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;

        info!(
            "event=store_save module=repo status=ok path={} count={}",
            self.path.display(),
            notes.len()
        );
        Ok(())
    }
}

/// Encodes one note as a `;`-delimited row, fields in header order.
fn encode_row(note: &Note) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}",
        note.id,
        note.title,
        note.body,
        note.created_at_text(),
        d = FIELD_DELIMITER
    )
}

/// Parses one `;`-delimited row. `line` is the 1-based line number used in
/// error messages.
fn parse_row(line: usize, text: &str) -> RepoResult<Note> {
    let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();
    if fields.len() != FIELDS_PER_ROW {
        return Err(RepoError::MalformedRow {
            line,
            reason: format!(
                "expected {FIELDS_PER_ROW} fields, found {}",
                fields.len()
            ),
        });
    }

    let id = fields[0].parse().map_err(|_| RepoError::MalformedRow {
        line,
        reason: format!("invalid id `{}`", fields[0]),
    })?;
    let created_at = parse_timestamp(fields[3]).map_err(|_| RepoError::MalformedRow {
        line,
        reason: format!("invalid timestamp `{}`", fields[3]),
    })?;

    Ok(Note::new(id, fields[1], fields[2], created_at))
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
