//! Data model for ICD-10 annotated clinical note documents.
//!
//! This crate defines the document/note/annotation carrier types shared by
//! `nav-core` and its front-end adapters. Deserialisation is deliberately
//! tolerant: every field inside a note or annotation is optional and falls
//! back to an empty string, empty list, or zero, so a partially populated
//! wire file still loads. The one structural requirement, that a document
//! carries `notes`, is enforced at the boundary in `nav-core`, not here.

use serde::{Deserialize, Serialize};

/// One tagged span within a note's text.
///
/// Constructed once from parsed wire input and immutable thereafter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    /// Classification identifier, e.g. an ICD-10-CM code such as "E11.9".
    ///
    /// The empty string is a valid code: uncoded annotations group together
    /// under it.
    pub code: String,

    /// Vocabulary the code belongs to, e.g. "ICD-10-CM" or "ICD-10-PCS".
    pub code_system: String,

    /// Human-readable label for the code.
    pub description: String,

    /// Start of the span as a 0-based character offset into the note text.
    ///
    /// Offsets are untrusted until validated against the note text. Signed
    /// so that out-of-range wire input survives deserialisation and can be
    /// dropped at the point of use instead of failing the whole document.
    pub begin: i64,

    /// End of the span (exclusive), in characters. Untrusted, as `begin`.
    pub end: i64,

    /// Advisory copy of the spanned text. Untrusted; never used for
    /// correctness.
    pub covered_text: String,
}

/// One clinical text unit with its annotations.
///
/// Annotation offsets are relative to this note's own `text`, never to any
/// concatenation of notes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    /// Note identifier. Not necessarily unique across documents; wire files
    /// carry it as a JSON string or number interchangeably.
    #[serde(deserialize_with = "wire::id_string")]
    pub note_id: String,

    /// Note category, e.g. "Discharge summary" or "Radiology".
    pub category: String,

    /// Free-text description of the note.
    pub description: String,

    /// The full text body.
    pub text: String,

    /// Annotations belonging to this note, in encounter order.
    pub annotations: Vec<Annotation>,
}

/// An admission's worth of notes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// Opaque admission identifier. Empty when the wire file omits it.
    pub hadm_id: String,

    /// Notes in document order.
    pub notes: Vec<Note>,
}

/// Serde helpers for fields whose wire form varies across producing
/// pipelines.
pub mod wire {
    use serde::{Deserialize, Deserializer};

    /// Identifier as it appears on the wire: some pipelines emit ids as
    /// JSON strings, others as numbers, and a few leave them null.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    impl RawId {
        fn into_string(self) -> String {
            match self {
                RawId::Text(text) => text,
                RawId::Int(n) => n.to_string(),
                RawId::Float(x) => x.to_string(),
                RawId::Null(()) => String::new(),
            }
        }
    }

    /// Deserialises a `String` from a JSON string, number, or null.
    pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(RawId::into_string)
    }

    /// As [`id_string`], for optional fields paired with `#[serde(default)]`.
    pub fn id_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        id_string(deserializer).map(Some)
    }
}
