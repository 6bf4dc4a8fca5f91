//! Error taxonomy for the document boundary.
//!
//! Only the boundary fails: once a [`nav_types::Document`] exists, the
//! indexing and highlighting operations never return an error under any
//! input, so rendering layers need no error-handling paths around them.

/// Errors returned when reading a document from its JSON wire format.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The input did not match the document wire schema. `path` is a
    /// best-effort pointer to the failing field (e.g. `notes[2].annotations`).
    #[error("invalid document JSON at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document is missing the required `notes` field.
    #[error("invalid document: missing 'notes' field")]
    MissingNotes,
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;
