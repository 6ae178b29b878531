//! Whitespace word scanning shared by the catalog and synthesis backends.

use crate::narration::HighlightRange;

/// Next whitespace-delimited word at or after byte `cursor`, with the byte cursor
/// just past it.
pub fn next_word_at(text: &str, cursor: usize) -> Option<(&str, usize)> {
    let rest = text.get(cursor..)?;
    let (lead, _) = rest.char_indices().find(|(_, ch)| !ch.is_whitespace())?;
    let start = cursor + lead;
    let end = text[start..]
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(text.len(), |(offset, _)| start + offset);

    Some((&text[start..end], end))
}

/// Words of `text` with their character (not byte) spans.
pub fn word_spans(text: &str) -> Vec<(&str, HighlightRange)> {
    let mut spans = Vec::new();
    let mut cursor = 0usize;
    let mut char_offset = 0usize;
    let mut byte_mark = 0usize;

    while let Some((word, next_cursor)) = next_word_at(text, cursor) {
        let word_start = next_cursor - word.len();
        char_offset += text[byte_mark..word_start].chars().count();
        let length = word.chars().count();
        spans.push((word, HighlightRange::new(char_offset as u32, length as u32)));
        char_offset += length;
        byte_mark = next_cursor;
        cursor = next_cursor;
    }

    spans
}

pub fn ends_sentence(word: &str) -> bool {
    word.ends_with('.') || word.ends_with('!') || word.ends_with('?')
}

pub fn ends_clause(word: &str) -> bool {
    word.ends_with(',') || word.ends_with(';') || word.ends_with(':')
}

/// Slice of `text` covered by a character span, if the span is in bounds.
pub fn slice_chars(text: &str, range: HighlightRange) -> Option<&str> {
    if range.is_empty() {
        return None;
    }

    let mut indices = text.char_indices().map(|(idx, _)| idx).chain([text.len()]);
    let start = indices.nth(range.offset as usize)?;
    let end = indices.nth(range.length as usize - 1)?;
    text.get(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_words_across_runs_of_whitespace() {
        let text = "  Once   upon\ta time ";
        let mut cursor = 0;
        let mut words = Vec::new();
        while let Some((word, next)) = next_word_at(text, cursor) {
            words.push(word);
            cursor = next;
        }
        assert_eq!(words, ["Once", "upon", "a", "time"]);
        assert_eq!(next_word_at("", 0), None);
    }

    #[test]
    fn non_breaking_space_separates_words() {
        let spans = word_spans("tiny\u{a0}Bell sang");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], ("tiny", HighlightRange::new(0, 4)));
        assert_eq!(spans[1], ("Bell", HighlightRange::new(5, 4)));
        assert_eq!(spans[2], ("sang", HighlightRange::new(10, 4)));
    }

    #[test]
    fn word_spans_use_character_offsets() {
        let spans = word_spans("Olá  fada boa");
        assert_eq!(spans[0], ("Olá", HighlightRange::new(0, 3)));
        assert_eq!(spans[1], ("fada", HighlightRange::new(5, 4)));
        assert_eq!(spans[2], ("boa", HighlightRange::new(10, 3)));
    }

    #[test]
    fn slices_by_character_span() {
        let text = "Olá fada";
        assert_eq!(slice_chars(text, HighlightRange::new(4, 4)), Some("fada"));
        assert_eq!(slice_chars(text, HighlightRange::new(0, 3)), Some("Olá"));
        assert_eq!(slice_chars(text, HighlightRange::new(6, 4)), None);
        assert_eq!(slice_chars(text, HighlightRange::EMPTY), None);
    }
}
