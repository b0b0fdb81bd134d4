use chrono::NaiveDateTime;
use jotpad_core::{
    FlatFileRepository, Note, NoteRepository, NoteStore, RepoError, StoreError, FILE_HEADER,
    TIMESTAMP_FORMAT,
};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn opening_missing_file_bootstraps_header_only_store() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);

    let store = NoteStore::open(FlatFileRepository::new(&path)).unwrap();

    assert!(store.notes().is_empty());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        format!("{FILE_HEADER}\n")
    );
}

#[test]
fn save_then_load_reproduces_identical_sequence() {
    let dir = TempDir::new().unwrap();
    let repo = FlatFileRepository::new(notes_path(&dir));
    let notes = vec![
        note(1, "first", "plain body", "2024-03-01 08:00:00"),
        note(2, "second", "commas, are fine", "2024-03-01 09:30:15"),
        note(5, "fifth", "", "2024-03-02 23:59:59"),
    ];

    repo.save(&notes).unwrap();

    assert_eq!(repo.load().unwrap(), notes);
}

#[test]
fn load_preserves_file_order_without_sorting() {
    let dir = TempDir::new().unwrap();
    let repo = FlatFileRepository::new(notes_path(&dir));
    let notes = vec![
        note(3, "newest", "x", "2024-03-03 10:00:00"),
        note(1, "oldest", "y", "2024-03-01 10:00:00"),
        note(2, "middle", "z", "2024-03-02 10:00:00"),
    ];
    repo.save(&notes).unwrap();

    let ids: Vec<_> = repo.load().unwrap().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[test]
fn save_writes_header_and_one_row_per_note() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);
    let repo = FlatFileRepository::new(&path);
    repo.save(&[
        note(1, "Groceries", "milk, eggs", "2024-03-01 09:00:00"),
        note(2, "Work", "finish report", "2024-03-01 17:30:00"),
    ])
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "ID;Title;Body;Created At\n\
         1;Groceries;milk, eggs;2024-03-01 09:00:00\n\
         2;Work;finish report;2024-03-01 17:30:00\n"
    );
}

#[test]
fn save_leaves_no_temporary_sibling_behind() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);
    FlatFileRepository::new(&path)
        .save(&[note(1, "only", "note", "2024-03-01 09:00:00")])
        .unwrap();

    let mut tmp = path.clone().into_os_string();
    tmp.push(".tmp");
    assert!(!PathBuf::from(tmp).exists());
}

#[test]
fn delete_rewrites_file_without_removed_row() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);
    let mut store = NoteStore::open(FlatFileRepository::new(&path)).unwrap();
    store.create("first", "a").unwrap();
    store.create("second", "b").unwrap();

    store.delete(1).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(!contents.contains(";first;"));
    assert_eq!(contents.lines().count(), 2);
}

#[test]
fn wrong_column_count_fails_the_open() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);
    std::fs::write(
        &path,
        "ID;Title;Body;Created At\n\
         1;ok;body;2024-03-01 09:00:00\n\
         2;missing-fields\n",
    )
    .unwrap();

    let err = NoteStore::open(FlatFileRepository::new(&path)).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Repo(RepoError::MalformedRow { line: 3, .. })
    ));
}

#[test]
fn non_numeric_id_fails_the_load() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);
    std::fs::write(
        &path,
        "ID;Title;Body;Created At\nfirst;t;b;2024-03-01 09:00:00\n",
    )
    .unwrap();

    let err = FlatFileRepository::new(&path).load().unwrap_err();
    assert!(matches!(err, RepoError::MalformedRow { line: 2, .. }));
}

#[test]
fn unparseable_timestamp_fails_the_load() {
    let dir = TempDir::new().unwrap();
    let path = notes_path(&dir);
    std::fs::write(&path, "ID;Title;Body;Created At\n1;t;b;last tuesday\n").unwrap();

    let err = FlatFileRepository::new(&path).load().unwrap_err();
    assert!(matches!(err, RepoError::MalformedRow { line: 2, .. }));
}

fn notes_path(dir: &TempDir) -> PathBuf {
    dir.path().join("notes.csv")
}

fn note(id: u64, title: &str, body: &str, stamp: &str) -> Note {
    let created_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).unwrap();
    Note::new(id, title, body, created_at)
}
