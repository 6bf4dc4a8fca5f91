//! # NAV Core
//!
//! Core logic for the NAV note annotation viewer.
//!
//! This crate contains pure transforms over ICD-10 annotated clinical note
//! documents:
//! - JSON boundary parsing of document files (`document`)
//! - grouping annotations by code for selection UIs (`index`)
//! - deriving highlighted text segmentations (`highlight`)
//!
//! Both `AnnotationIndex::build` and `highlight_note` are side-effect free
//! and hold no state between calls; they may run concurrently over
//! different documents or notes with no coordination. The active code
//! selection is owned by the calling surface and passed in on every call.
//!
//! **No rendering concerns**: terminal or web presentation belongs to
//! front-end adapters such as `nav-cli`.

pub mod document;
pub mod error;
pub mod highlight;
pub mod index;

pub use document::{note_offsets, read_document_str};
pub use error::{DocumentError, DocumentResult};
pub use highlight::{highlight_note, Segment};
pub use index::{AnnotationGroup, AnnotationIndex, AnnotationInstance};

// The shared data model lives in `nav-types`; re-exported so adapters only
// need one dependency.
pub use nav_types::{Annotation, Document, Note};
