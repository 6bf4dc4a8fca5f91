//! Annotation grouping by code.
//!
//! Builds the per-document aggregate behind code-selection UIs: one group
//! per distinct code, ordered lexicographically, each holding
//! back-references to its occurrences in the source document.

use nav_types::{Annotation, Document};
use std::collections::HashMap;

/// Back-reference to one annotation occurrence within a document.
///
/// Groups never copy annotation data; an instance addresses its annotation
/// by position and must be resolved against the same document the index was
/// built from. An index over a rebuilt document must itself be rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotationInstance {
    /// Position of the owning note within the document.
    pub note_index: usize,
    /// Position of the annotation within that note's annotation list.
    pub annotation_index: usize,
}

impl AnnotationInstance {
    /// Looks up the referenced annotation in `document`.
    ///
    /// Returns `None` when the document does not contain the referenced
    /// position, i.e. the index was built from a different document shape.
    pub fn resolve<'a>(&self, document: &'a Document) -> Option<&'a Annotation> {
        document
            .notes
            .get(self.note_index)?
            .annotations
            .get(self.annotation_index)
    }
}

/// Aggregate of every annotation sharing one code within a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationGroup {
    /// The shared code (group key). May be empty: uncoded annotations
    /// collapse into a single group.
    pub code: String,

    /// Code system of the first instance encountered. Later instances are
    /// not checked for agreement.
    pub code_system: String,

    /// Description of the first instance encountered.
    pub description: String,

    /// Occurrences in document encounter order.
    pub instances: Vec<AnnotationInstance>,
}

impl AnnotationGroup {
    /// Number of occurrences of this code in the document.
    pub fn count(&self) -> usize {
        self.instances.len()
    }
}

/// Per-document code index: annotation groups ordered by code, plus a
/// code-to-group lookup.
#[derive(Clone, Debug, Default)]
pub struct AnnotationIndex {
    groups: Vec<AnnotationGroup>,
    by_code: HashMap<String, usize>,
}

impl AnnotationIndex {
    /// Groups `document`'s annotations by code.
    ///
    /// Iterates notes in document order and each note's annotations in
    /// encounter order; the first sighting of a code creates its group,
    /// seeded with that annotation's `code_system` and `description`, and
    /// every occurrence appends a back-reference. Grouping is purely by
    /// `code` string equality and performs no offset validation, so
    /// annotations the highlighter would drop still count here.
    ///
    /// Pure transform over its input; never fails.
    pub fn build(document: &Document) -> Self {
        let mut groups: Vec<AnnotationGroup> = Vec::new();
        let mut by_code: HashMap<String, usize> = HashMap::new();

        for (note_index, note) in document.notes.iter().enumerate() {
            for (annotation_index, annotation) in note.annotations.iter().enumerate() {
                let slot = *by_code.entry(annotation.code.clone()).or_insert_with(|| {
                    groups.push(AnnotationGroup {
                        code: annotation.code.clone(),
                        code_system: annotation.code_system.clone(),
                        description: annotation.description.clone(),
                        instances: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].instances.push(AnnotationInstance {
                    note_index,
                    annotation_index,
                });
            }
        }

        // Plain lexicographic order; codes are unique so ties cannot occur.
        groups.sort_by(|a, b| a.code.cmp(&b.code));
        let by_code = groups
            .iter()
            .enumerate()
            .map(|(slot, group)| (group.code.clone(), slot))
            .collect();

        Self { groups, by_code }
    }

    /// Groups ordered lexicographically by code.
    pub fn groups(&self) -> &[AnnotationGroup] {
        &self.groups
    }

    /// Looks up the group for `code`.
    pub fn group(&self, code: &str) -> Option<&AnnotationGroup> {
        self.by_code.get(code).map(|&slot| &self.groups[slot])
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total annotation occurrences across all groups.
    pub fn total_instances(&self) -> usize {
        self.groups.iter().map(AnnotationGroup::count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_types::Note;

    fn annotation(code: &str, code_system: &str, description: &str) -> Annotation {
        Annotation {
            code: code.to_string(),
            code_system: code_system.to_string(),
            description: description.to_string(),
            ..Annotation::default()
        }
    }

    fn document(notes: Vec<Note>) -> Document {
        Document {
            hadm_id: "100035".to_string(),
            notes,
        }
    }

    #[test]
    fn build_orders_groups_lexicographically() {
        let doc = document(vec![Note {
            annotations: vec![
                annotation("Z51.11", "ICD-10-CM", "Encounter for chemotherapy"),
                annotation("E11.9", "ICD-10-CM", "Type 2 diabetes"),
                annotation("I10", "ICD-10-CM", "Essential hypertension"),
            ],
            ..Note::default()
        }]);

        let index = AnnotationIndex::build(&doc);
        let codes: Vec<&str> = index.groups().iter().map(|g| g.code.as_str()).collect();
        assert_eq!(codes, vec!["E11.9", "I10", "Z51.11"]);
    }

    #[test]
    fn same_code_across_notes_yields_one_group_in_document_order() {
        let doc = document(vec![
            Note {
                annotations: vec![annotation("A", "ICD-10-CM", "first")],
                ..Note::default()
            },
            Note {
                annotations: vec![annotation("A", "ICD-10-CM", "second")],
                ..Note::default()
            },
        ]);

        let index = AnnotationIndex::build(&doc);
        assert_eq!(index.len(), 1);

        let group = index.group("A").expect("group for code A");
        assert_eq!(group.count(), 2);
        assert_eq!(
            group.instances,
            vec![
                AnnotationInstance {
                    note_index: 0,
                    annotation_index: 0
                },
                AnnotationInstance {
                    note_index: 1,
                    annotation_index: 0
                },
            ]
        );
        assert_eq!(
            group.instances[1].resolve(&doc).unwrap().description,
            "second"
        );
    }

    #[test]
    fn group_metadata_comes_from_first_instance() {
        let doc = document(vec![Note {
            annotations: vec![
                annotation("E11.9", "ICD-10-CM", "Type 2 diabetes"),
                annotation("E11.9", "ICD-10-PCS", "a disagreeing description"),
            ],
            ..Note::default()
        }]);

        let index = AnnotationIndex::build(&doc);
        let group = index.group("E11.9").unwrap();
        assert_eq!(group.code_system, "ICD-10-CM");
        assert_eq!(group.description, "Type 2 diabetes");
        assert_eq!(group.count(), 2);
    }

    #[test]
    fn empty_code_is_a_valid_group_key() {
        let doc = document(vec![Note {
            annotations: vec![
                annotation("", "", "uncoded"),
                annotation("", "", "also uncoded"),
                annotation("B99", "ICD-10-CM", "coded"),
            ],
            ..Note::default()
        }]);

        let index = AnnotationIndex::build(&doc);
        assert_eq!(index.len(), 2);
        // Empty string sorts before any non-empty code.
        assert_eq!(index.groups()[0].code, "");
        assert_eq!(index.groups()[0].count(), 2);
    }

    #[test]
    fn counts_sum_to_total_annotation_count() {
        let doc = document(vec![
            Note {
                annotations: vec![
                    annotation("A", "", ""),
                    annotation("B", "", ""),
                    annotation("A", "", ""),
                ],
                ..Note::default()
            },
            Note {
                annotations: vec![annotation("C", "", "")],
                ..Note::default()
            },
            Note::default(),
        ]);

        let index = AnnotationIndex::build(&doc);
        let total: usize = doc.notes.iter().map(|n| n.annotations.len()).sum();
        assert_eq!(index.total_instances(), total);
    }

    #[test]
    fn malformed_offsets_still_count() {
        let doc = document(vec![Note {
            text: "short".to_string(),
            annotations: vec![Annotation {
                code: "E11.9".to_string(),
                begin: 40,
                end: 3,
                ..Annotation::default()
            }],
            ..Note::default()
        }]);

        let index = AnnotationIndex::build(&doc);
        assert_eq!(index.group("E11.9").unwrap().count(), 1);
    }

    #[test]
    fn lookup_is_consistent_after_sorting() {
        let doc = document(vec![Note {
            annotations: vec![
                annotation("Z00", "", ""),
                annotation("A00", "", ""),
                annotation("M54.5", "", ""),
            ],
            ..Note::default()
        }]);

        let index = AnnotationIndex::build(&doc);
        for group in index.groups() {
            assert_eq!(index.group(&group.code).unwrap().code, group.code);
        }
        assert!(index.group("missing").is_none());
    }

    #[test]
    fn empty_document_builds_empty_index() {
        let index = AnnotationIndex::build(&document(vec![]));
        assert!(index.is_empty());
        assert_eq!(index.total_instances(), 0);
    }
}
