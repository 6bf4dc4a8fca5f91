//! Span highlighting over note text.
//!
//! Derives the ordered plain/highlighted segmentation a rendering surface
//! draws for one note, given the note's annotations and the currently
//! selected codes. The selection is passed in on every call and never
//! retained, so re-rendering after a selection change is just another call.

use nav_types::Annotation;
use std::collections::HashSet;

/// One contiguous piece of rendered output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The slice of the note text this segment covers.
    pub content: &'a str,
    /// Whether this segment carries a selected annotation.
    pub highlighted: bool,
}

/// Segments `text` into plain and highlighted pieces.
///
/// With no active codes this is the plain-rendering fast path: the whole
/// text comes back as a single unhighlighted segment. Otherwise annotations
/// carrying an active code are validated against the text, sorted by start
/// position (stable, so spans sharing a start keep encounter order), and
/// walked left to right emitting alternating plain and highlighted
/// segments.
///
/// Offsets are character offsets; they are mapped to UTF-8 byte boundaries
/// internally so non-ASCII text slices correctly. A span is dropped, never
/// clamped, when `begin < 0`, `begin >= len(text)`, `end <= begin`, or
/// `end > len(text)` (lengths in characters).
///
/// Overlapping active spans are emitted as-is, each contributing its full
/// `text[begin..end)` slice: the walk does not merge or reject overlap, so
/// overlapping selections duplicate the shared characters in the output.
/// Callers needing strict non-overlap must pre-merge their spans. For
/// non-overlapping spans, concatenating the returned segment contents
/// reproduces `text` exactly.
///
/// Never fails; invalid input degenerates to more unhighlighted text.
pub fn highlight_note<'a>(
    text: &'a str,
    annotations: &[Annotation],
    active_codes: &HashSet<String>,
) -> Vec<Segment<'a>> {
    if active_codes.is_empty() {
        return vec![Segment {
            content: text,
            highlighted: false,
        }];
    }

    // boundaries[c] is the byte offset of character c; the final entry is
    // text.len(), so a char range a..b slices bytes boundaries[a]..boundaries[b].
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    let mut spans: Vec<(usize, usize)> = Vec::new();
    for annotation in annotations {
        if !active_codes.contains(&annotation.code) {
            continue;
        }
        match checked_span(annotation, char_count) {
            Some(span) => spans.push(span),
            None => tracing::warn!(
                "dropping annotation {} with invalid span {}..{}",
                annotation.code,
                annotation.begin,
                annotation.end
            ),
        }
    }

    spans.sort_by_key(|&(begin, _)| begin);

    let mut segments = Vec::with_capacity(2 * spans.len() + 1);
    let mut last_pos = 0usize;

    for (begin, end) in spans {
        if begin > last_pos {
            segments.push(Segment {
                content: &text[boundaries[last_pos]..boundaries[begin]],
                highlighted: false,
            });
        }
        segments.push(Segment {
            content: &text[boundaries[begin]..boundaries[end]],
            highlighted: true,
        });
        last_pos = end;
    }

    if last_pos < char_count {
        segments.push(Segment {
            content: &text[boundaries[last_pos]..],
            highlighted: false,
        });
    }

    segments
}

/// Validates an annotation's offsets against the text length (characters),
/// returning the span as unsigned character positions.
fn checked_span(annotation: &Annotation, char_count: usize) -> Option<(usize, usize)> {
    if annotation.begin < 0 || annotation.end <= annotation.begin {
        return None;
    }
    let begin = annotation.begin as usize;
    let end = annotation.end as usize;
    if begin >= char_count || end > char_count {
        return None;
    }
    Some((begin, end))
}
