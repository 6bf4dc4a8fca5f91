use clap::{Parser, Subcommand};
use nav_core::{highlight_note, note_offsets, read_document_str, AnnotationIndex, Document};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nav")]
#[command(about = "Note annotation viewer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pretty-print a document JSON file
    ViewJson {
        /// Path to the document JSON file
        file: PathBuf,
        /// Indentation width for pretty printing
        #[arg(long, default_value_t = 2)]
        indent: usize,
    },
    /// List a document's annotations grouped by code
    Codes {
        /// Path to the document JSON file
        file: PathBuf,
    },
    /// Print note text with the selected codes highlighted
    Show {
        /// Path to the document JSON file
        file: PathBuf,
        /// Code to highlight (repeatable)
        #[arg(long = "code")]
        codes: Vec<String>,
        /// Disable colour output
        #[arg(long)]
        plain: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::ViewJson { file, indent } => view_json(&file, indent),
        Commands::Codes { file } => codes(&file),
        Commands::Show { file, codes, plain } => show(&file, &codes, plain),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Loads and pretty-prints any JSON file, preceded by file information.
fn view_json(path: &Path, indent: usize) -> Result<(), Box<dyn std::error::Error>> {
    let raw = read_file(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))?;

    let size = fs::metadata(path)?.len();
    println!("File: {}", path.display());
    println!("Size: {}", format_size(size));
    println!();
    println!("{}", render_pretty_json(&value, indent)?);
    Ok(())
}

/// Prints the document summary and one line per annotation group.
fn codes(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(path)?;
    let index = AnnotationIndex::build(&document);

    println!("File: {}", path.display());
    println!(
        "HADM ID: {}",
        if document.hadm_id.is_empty() {
            "unknown"
        } else {
            document.hadm_id.as_str()
        }
    );
    println!("Notes: {}", document.notes.len());
    println!("Unique codes: {}", index.len());
    println!("Annotations: {}", index.total_instances());
    println!();

    for (note, range) in document.notes.iter().zip(note_offsets(&document)) {
        println!(
            "Note {} - {}: {} (chars {}..{})",
            note.note_id, note.category, note.description, range.start, range.end
        );
    }
    println!();

    if index.is_empty() {
        println!("No annotations found.");
        return Ok(());
    }

    for group in index.groups() {
        println!(
            "{} ({}): {} ({})",
            group.code,
            group.code_system,
            truncate_label(&group.description, 50),
            group.count()
        );
    }
    Ok(())
}

/// Prints every note, highlighting the spans of the selected codes.
fn show(path: &Path, codes: &[String], plain: bool) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document(path)?;
    let active: HashSet<String> = codes.iter().cloned().collect();

    for (i, note) in document.notes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if plain {
            println!("Note {} - {}: {}", note.note_id, note.category, note.description);
        } else {
            println!(
                "{} - {}: {}",
                format!("Note {}", note.note_id).bold().cyan(),
                note.category.yellow(),
                note.description
            );
        }

        for segment in highlight_note(&note.text, &note.annotations, &active) {
            if segment.highlighted && !plain {
                print!("{}", segment.content.yellow().on_blue().bold());
            } else {
                print!("{}", segment.content);
            }
        }
        println!();
    }
    Ok(())
}

fn load_document(path: &Path) -> Result<Document, Box<dyn std::error::Error>> {
    let json = read_file(path)?;
    Ok(read_document_str(&json)?)
}

fn read_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("file not found: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("not a file: {}", path.display()).into());
    }
    Ok(fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?)
}

/// Formats a byte count as a human-readable size with two decimal places.
fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} TB", size)
}

/// Truncates a label to `max_chars` characters, appending `...` when cut.
fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        format!("{}...", label.chars().take(max_chars).collect::<String>())
    }
}

/// Serialises a JSON value with a configurable indentation width.
fn render_pretty_json(value: &serde_json::Value, indent: usize) -> serde_json::Result<String> {
    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer).expect("serde_json output is UTF-8"))
}
