//! Document boundary parsing.
//!
//! Translates the JSON wire format produced by the annotation pipeline into
//! the `nav_types` model. Parsing is tolerant of missing note and annotation
//! fields (they default) but rejects a document without a `notes` field, so
//! downstream consumers can assume the list exists.

use crate::error::{DocumentError, DocumentResult};
use nav_types::{wire, Document, Note};
use serde::Deserialize;
use std::ops::Range;

/// Wire form of a document file.
///
/// `notes` stays optional here so its absence surfaces as
/// [`DocumentError::MissingNotes`] rather than a generic schema error.
#[derive(Debug, Deserialize)]
struct DocumentFile {
    #[serde(default, deserialize_with = "wire::id_string_opt")]
    hadm_id: Option<String>,
    #[serde(default)]
    notes: Option<Vec<Note>>,
}

/// Parse a document from JSON text.
///
/// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
/// `notes[0].annotations`) to the failing field when the JSON does not match
/// the document wire schema.
///
/// # Arguments
///
/// * `json` - JSON text expected to represent a document mapping.
///
/// # Returns
///
/// Returns a [`Document`] with in-order notes on success.
///
/// # Errors
///
/// Returns [`DocumentError`] if:
/// - the text is not valid JSON or a field has an unexpected type,
/// - the `notes` field is absent.
pub fn read_document_str(json: &str) -> DocumentResult<Document> {
    let deserializer = &mut serde_json::Deserializer::from_str(json);

    let file: DocumentFile = match serde_path_to_error::deserialize(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let path = if path.is_empty() {
                "<root>".to_string()
            } else {
                path
            };
            return Err(DocumentError::Parse {
                path,
                source: err.into_inner(),
            });
        }
    };

    let notes = file.notes.ok_or(DocumentError::MissingNotes)?;

    Ok(Document {
        hadm_id: file.hadm_id.unwrap_or_default(),
        notes,
    })
}

/// Character range of each note's text within the in-order concatenation of
/// all note texts.
///
/// Annotation offsets remain relative to each note's own text; these ranges
/// only position a note inside a combined single-scroll view.
pub fn note_offsets(document: &Document) -> Vec<Range<usize>> {
    let mut offset = 0usize;
    document
        .notes
        .iter()
        .map(|note| {
            let start = offset;
            offset += note.text.chars().count();
            start..offset
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_document_parses_full_wire_format() {
        let document = read_document_str(
            r#"{
                "hadm_id": "100035",
                "notes": [
                    {
                        "note_id": 1,
                        "category": "Discharge summary",
                        "description": "Report",
                        "text": "Patient admitted with chest pain.",
                        "annotations": [
                            {"code": "R07.9", "code_system": "ICD-10-CM",
                             "description": "Chest pain, unspecified",
                             "begin": 22, "end": 32, "covered_text": "chest pain"}
                        ]
                    }
                ]
            }"#,
        )
        .expect("valid document");

        assert_eq!(document.hadm_id, "100035");
        assert_eq!(document.notes.len(), 1);
        assert_eq!(document.notes[0].annotations[0].code, "R07.9");
    }

    #[test]
    fn read_document_rejects_missing_notes() {
        let err = read_document_str(r#"{"hadm_id": "100035"}"#).expect_err("missing notes");
        assert!(matches!(err, DocumentError::MissingNotes));
    }

    #[test]
    fn read_document_accepts_numeric_hadm_id() {
        let document = read_document_str(r#"{"hadm_id": 100035, "notes": []}"#).unwrap();
        assert_eq!(document.hadm_id, "100035");
    }

    #[test]
    fn read_document_defaults_absent_hadm_id() {
        let document = read_document_str(r#"{"notes": []}"#).unwrap();
        assert_eq!(document.hadm_id, "");
    }

    #[test]
    fn read_document_reports_path_on_schema_mismatch() {
        let err = read_document_str(r#"{"notes": "not a list"}"#).expect_err("schema mismatch");
        match err {
            DocumentError::Parse { path, .. } => assert!(path.contains("notes")),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn read_document_rejects_invalid_json() {
        let err = read_document_str("{not json").expect_err("invalid JSON");
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn note_offsets_cover_concatenation_in_order() {
        let document = read_document_str(
            r#"{"notes": [{"text": "first"}, {"text": ""}, {"text": "third"}]}"#,
        )
        .unwrap();
        let offsets = note_offsets(&document);
        assert_eq!(offsets, vec![0..5, 5..5, 5..10]);
    }

    #[test]
    fn note_offsets_count_characters_not_bytes() {
        let document = read_document_str(r#"{"notes": [{"text": "naïve"}, {"text": "x"}]}"#).unwrap();
        let offsets = note_offsets(&document);
        assert_eq!(offsets, vec![0..5, 5..6]);
    }
}
