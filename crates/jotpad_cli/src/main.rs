//! Interactive menu shell for the JotPad note store.
//!
//! # Responsibility
//! - Parse startup options and open the store.
//! - Run the numbered menu loop: prompt, call into `jotpad_core`, print.
//!
//! All state lives in the core crate; this binary keeps none of its own.

use clap::Parser;
use jotpad_core::{
    default_log_level, init_logging, FlatFileRepository, NoteId, NoteStore, StoreError,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jotpad", version, about = "Single-user flat-file note manager")]
struct Args {
    /// Backing notes file.
    #[arg(long, default_value = "notes.csv")]
    file: PathBuf,

    /// Absolute directory for rolling log files. File logging is off when
    /// not given.
    #[arg(long)]
    log_dir: Option<String>,

    /// Log level for file logging.
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = init_logging(&args.log_level, log_dir) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let store = match NoteStore::open(FlatFileRepository::new(&args.file)) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run_menu(store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_menu(mut store: NoteStore<FlatFileRepository>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!();
        println!("Choose an action:");
        println!("1. Create a note");
        println!("2. Read all notes");
        println!("3. Read notes by date range");
        println!("4. Read a note by id");
        println!("5. Update a note");
        println!("6. Delete a note");
        println!("7. Exit");

        let Some(choice) = prompt(&mut input, "Enter the action number: ")? else {
            return Ok(());
        };
        match choice.trim() {
            "1" => create_note(&mut store, &mut input)?,
            "2" => {
                let stdout = io::stdout();
                store.render_all(&mut stdout.lock())?;
            }
            "3" => read_by_date_range(&mut store, &mut input)?,
            "4" => read_by_id(&store, &mut input)?,
            "5" => update_note(&mut store, &mut input)?,
            "6" => delete_note(&mut store, &mut input)?,
            "7" => {
                println!("Exiting.");
                return Ok(());
            }
            _ => println!("Invalid choice. Please pick a listed action number."),
        }
    }
}

fn create_note(
    store: &mut NoteStore<FlatFileRepository>,
    input: &mut impl BufRead,
) -> io::Result<()> {
    let Some(title) = prompt_nonempty(input, "Enter the note title: ")? else {
        return Ok(());
    };
    let Some(body) = prompt(input, "Enter the note body: ")? else {
        return Ok(());
    };
    match store.create(&title, &body) {
        Ok(id) => println!("Note {id} created."),
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

fn read_by_date_range(
    store: &mut NoteStore<FlatFileRepository>,
    input: &mut impl BufRead,
) -> io::Result<()> {
    loop {
        let Some(start) = prompt(input, "Start date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        let Some(end) = prompt(input, "End date (YYYY-MM-DD): ")? else {
            return Ok(());
        };
        match store.read_by_date_range(&start, &end) {
            Ok(notes) if notes.is_empty() => {
                println!("No notes in the given range.");
                return Ok(());
            }
            Ok(notes) => {
                for note in &notes {
                    println!();
                    println!("{note}");
                }
                return Ok(());
            }
            // Bad date input re-prompts; anything else returns to the menu.
            Err(err @ StoreError::InvalidDate(_)) => println!("Error: {err}"),
            Err(err) => {
                println!("Error: {err}");
                return Ok(());
            }
        }
    }
}

fn read_by_id(store: &NoteStore<FlatFileRepository>, input: &mut impl BufRead) -> io::Result<()> {
    let Some(id) = prompt_id(input, "Enter the note id: ")? else {
        return Ok(());
    };
    match store.get(id) {
        Some(note) => {
            println!();
            println!("{note}");
        }
        None => println!("Error: no note with id {id}."),
    }
    Ok(())
}

fn update_note(
    store: &mut NoteStore<FlatFileRepository>,
    input: &mut impl BufRead,
) -> io::Result<()> {
    let Some(id) = prompt_id(input, "Enter the id of the note to update: ")? else {
        return Ok(());
    };
    if store.notes().iter().all(|note| note.id != id) {
        println!("Error: no note with id {id}. Please enter another id.");
        return Ok(());
    }

    let Some(title) = prompt_nonempty(input, "Enter the new title: ")? else {
        return Ok(());
    };
    let Some(body) = prompt(input, "Enter the new body: ")? else {
        return Ok(());
    };
    match store.update(id, &title, &body) {
        Ok(()) => println!("Note updated."),
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

fn delete_note(
    store: &mut NoteStore<FlatFileRepository>,
    input: &mut impl BufRead,
) -> io::Result<()> {
    let Some(id) = prompt_id(input, "Enter the id of the note to delete: ")? else {
        return Ok(());
    };
    match store.delete(id) {
        Ok(()) => println!("Note deleted."),
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

/// Prints a prompt and reads one line. Returns `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Re-prompts until the line is non-blank. Returns `None` on end of input.
fn prompt_nonempty(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    loop {
        let Some(value) = prompt(input, label)? else {
            return Ok(None);
        };
        if !value.trim().is_empty() {
            return Ok(Some(value));
        }
        println!("Input cannot be empty.");
    }
}

/// Re-prompts until the line parses as a note id. Returns `None` on end of
/// input.
fn prompt_id(input: &mut impl BufRead, label: &str) -> io::Result<Option<NoteId>> {
    loop {
        let Some(value) = prompt(input, label)? else {
            return Ok(None);
        };
        match value.trim().parse() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => println!("Ids are positive numbers. Try again."),
        }
    }
}
