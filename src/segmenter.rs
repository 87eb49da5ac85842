//! Splits feedback text into opinion-bearing segments around contrast words.
//!
//! Each segment is treated downstream as an independently opinionated unit
//! ("aspect"). The scan walks the text once and cuts directly at marker
//! positions, so no sentinel separator ever touches the input.

/// Contrast/conjunction markers, in priority order. Case-sensitive, space
/// delimited so mid-word hits ("band", "butter") cannot split.
const MARKERS: [&str; 3] = [" but ", " however ", " and "];

/// Fragments at or below this trimmed length are discarded as noise.
const MIN_FRAGMENT_CHARS: usize = 5;

/// Split `text` into trimmed segments around the contrast markers.
///
/// Segments appear in left-to-right order of the original text. A text with
/// no marker yields a single segment equal to the trimmed input; an empty
/// result means "no aspects", not an error.
pub fn segment(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        if let Some(width) = marker_at(text, i) {
            push_retained(&mut segments, &text[start..i]);
            start = i + width;
            i = start;
        } else {
            i += text[i..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
        }
    }
    push_retained(&mut segments, &text[start..]);

    segments
}

fn marker_at(text: &str, pos: usize) -> Option<usize> {
    MARKERS
        .iter()
        .find(|m| text[pos..].starts_with(*m))
        .map(|m| m.len())
}

fn push_retained(segments: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if trimmed.chars().count() > MIN_FRAGMENT_CHARS {
        segments.push(trimmed.to_string());
    }
}
